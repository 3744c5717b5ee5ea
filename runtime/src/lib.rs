//! # Checkout Upsell Runtime
//!
//! Runtime implementation for the checkout upsell widget.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Cancellation registry**: Tracks running [`Effect::Cancellable`] effects by id
//!
//! ## Example
//!
//! ```ignore
//! use checkout_upsell_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::Activate).await?;
//!
//! // Read state
//! let loading = store.state(|s| s.loading).await;
//! ```

use checkout_upsell_core::{
    effect::{Effect, EffectId},
    reducer::Reducer,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::AbortHandle;

/// Metric descriptions for store activity
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// Returned when `send()` is called after shutdown was initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects started by
/// one action. Actions fed back by those effects get their own handles and
/// are not tracked here.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Activate).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };
        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Runs on completion, panic, and abort of the owning task alike.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Internal: running cancellable effects keyed by id
///
/// Each registration carries a token so a finishing task only removes its
/// own entry, never a newer one registered under the same id.
#[derive(Default)]
struct CancellationRegistry {
    next_token: u64,
    running: HashMap<EffectId, (u64, AbortHandle)>,
}

impl CancellationRegistry {
    fn issue_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    fn cancel(&mut self, id: &EffectId) -> bool {
        self.running.remove(id).is_some_and(|(_, handle)| {
            handle.abort();
            true
        })
    }

    fn finish(&mut self, id: &EffectId, token: u64) {
        if self.running.get(id).is_some_and(|(t, _)| *t == token) {
            self.running.remove(id);
        }
    }

    fn cancel_all(&mut self) -> usize {
        let count = self.running.len();
        for (_, (_, handle)) in self.running.drain() {
            handle.abort();
        }
        count
    }
}

fn lock_registry(registry: &Mutex<CancellationRegistry>) -> MutexGuard<'_, CancellationRegistry> {
    // The registry holds no invariants a panicking holder could break.
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        lock_registry, Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, CancellationRegistry,
        DecrementGuard, Duration, Effect, EffectHandle, EffectId, EffectTracking, Mutex, Ordering,
        Reducer, RwLock, StoreError,
    };
    use std::future::Future;
    use std::pin::Pin;
    use tokio::sync::broadcast;
    use tokio::task::AbortHandle;

    type RunFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop and cancellation)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Actions produced by effects, broadcast to observers before they
        /// are fed back into the reducer.
        action_broadcast: broadcast::Sender<A>,
        cancellations: Arc<Mutex<CancellationRegistry>>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The action broadcast keeps up to 16 unread actions per observer;
        /// use [`Store::with_broadcast_capacity`] for chattier observers.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Create a new store with a custom action broadcast capacity
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
                cancellations: Arc::new(Mutex::new(CancellationRegistry::default())),
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Releases the lock and starts the returned effects
        ///
        /// Returns after starting effect execution, not completion. Concurrent
        /// `send()` calls serialize at the reducer.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.commands.total").increment(1);
            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect(effect, &tracking);
            }

            Ok(handle)
        }

        /// Send an action and wait for a matching action produced by an effect
        ///
        /// Subscribes to the action broadcast before sending, so a fast
        /// effect cannot slip its result past the observer.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action before the timeout
        /// - [`StoreError::ChannelClosed`]: action broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();
            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to actions produced by effects
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read from the current state
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Whether a cancellable effect is currently registered under `id`
        #[must_use]
        pub fn is_running(&self, id: &EffectId) -> bool {
            lock_registry(&self.cancellations).running.contains_key(id)
        }

        /// Number of effects currently executing across all actions
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::SeqCst)
        }

        /// Stop accepting actions, abort cancellable effects, and wait for the rest
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] with the number of effects
        /// still running when the timeout elapses.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            self.shutdown.store(true, Ordering::Release);
            let aborted = lock_registry(&self.cancellations).cancel_all();
            tracing::info!(aborted, "Store shutdown initiated");

            let deadline = tokio::time::Instant::now() + timeout;
            loop {
                let pending = self.pending_effects.load(Ordering::SeqCst);
                if pending == 0 {
                    tracing::info!("Store shutdown complete");
                    return Ok(());
                }
                if tokio::time::Instant::now() >= deadline {
                    tracing::warn!(pending, "Store shutdown timed out");
                    return Err(StoreError::ShutdownTimeout(pending));
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }

        /// Execute an effect with tracking
        ///
        /// `None` and `Cancel` complete synchronously, `Parallel` fans out,
        /// and every other variant runs in a spawned task guarded by
        /// [`DecrementGuard`].
        fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Cancel(id) => {
                    metrics::counter!("store.effects.executed", "type" => "cancel").increment(1);
                    if lock_registry(&self.cancellations).cancel(&id) {
                        tracing::trace!(%id, "Cancelled running effect");
                        metrics::counter!("store.effects.cancelled").increment(1);
                    }
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect, tracking);
                    }
                },
                Effect::Cancellable { id, effect } => {
                    metrics::counter!("store.effects.executed", "type" => "cancellable")
                        .increment(1);
                    self.spawn_cancellable(id, *effect, tracking);
                },
                effect => {
                    let kind = match &effect {
                        Effect::Future(_) => "future",
                        Effect::Delay { .. } => "delay",
                        _ => "sequential",
                    };
                    metrics::counter!("store.effects.executed", "type" => kind).increment(1);
                    let run = self.clone().run_effect(effect, tracking.clone());
                    let _ = self.spawn_tracked(run, tracking);
                },
            }
        }

        fn spawn_tracked(&self, run: RunFuture, tracking: &EffectTracking) -> AbortHandle {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            let guard = DecrementGuard(tracking.clone());
            let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

            let task = tokio::spawn(async move {
                let _guard = guard;
                let _pending_guard = pending_guard;
                run.await;
            });
            task.abort_handle()
        }

        fn spawn_cancellable(&self, id: EffectId, effect: Effect<A>, tracking: &EffectTracking) {
            // The registry lock is held across spawn so the task cannot
            // finish and deregister before it has been registered.
            let mut registry = lock_registry(&self.cancellations);
            if registry.cancel(&id) {
                tracing::trace!(%id, "Replacing running cancellable effect");
                metrics::counter!("store.effects.cancelled").increment(1);
            }

            let token = registry.issue_token();
            let store = self.clone();
            let task_id = id.clone();
            let inner = self.clone().run_effect(effect, tracking.clone());
            let run: RunFuture = Box::pin(async move {
                inner.await;
                lock_registry(&store.cancellations).finish(&task_id, token);
            });

            let handle = self.spawn_tracked(run, tracking);
            registry.running.insert(id, (token, handle));
        }

        /// Run an effect to completion inside the current task
        fn run_effect(self, effect: Effect<A>, tracking: EffectTracking) -> RunFuture {
            Box::pin(async move {
                match effect {
                    Effect::None => {},
                    Effect::Future(fut) => {
                        if let Some(action) = fut.await {
                            self.feed(action).await;
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    },
                    Effect::Delay { duration, action } => {
                        tokio::time::sleep(duration).await;
                        tracing::trace!("Effect::Delay completed, sending action");
                        self.feed(*action).await;
                    },
                    Effect::Parallel(effects) => {
                        let runs = effects
                            .into_iter()
                            .map(|effect| self.clone().run_effect(effect, tracking.clone()));
                        futures::future::join_all(runs).await;
                    },
                    Effect::Sequential(effects) => {
                        for effect in effects {
                            self.clone().run_effect(effect, tracking.clone()).await;
                        }
                    },
                    effect @ (Effect::Cancellable { .. } | Effect::Cancel(_)) => {
                        self.execute_effect(effect, &tracking);
                    },
                }
            })
        }

        async fn feed(&self, action: A) {
            let _ = self.action_broadcast.send(action.clone());
            if let Err(error) = self.send(action).await {
                tracing::debug!(%error, "Dropped effect action");
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
                cancellations: Arc::clone(&self.cancellations),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_upsell_core::{smallvec, SmallVec};

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Increment,
        Decrement,
        ProduceEffect,
        ProduceDelayedAction,
        ProduceParallelEffects,
        ProduceSequentialEffects,
        ProducePanickingEffect,
        StartTimer,
        StopTimer,
    }

    #[derive(Debug, Clone)]
    struct TestEnv;

    #[derive(Debug, Clone)]
    struct TestReducer;

    fn timer_id() -> EffectId {
        EffectId::from_static("timer")
    }

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    smallvec![Effect::None]
                },
                TestAction::ProduceEffect => {
                    smallvec![Effect::Future(Box::pin(async {
                        Some(TestAction::Increment)
                    }))]
                },
                TestAction::ProduceDelayedAction => smallvec![Effect::Delay {
                    duration: Duration::from_millis(10),
                    action: Box::new(TestAction::Increment),
                }],
                TestAction::ProduceParallelEffects => smallvec![Effect::Parallel(vec![
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                ])],
                TestAction::ProduceSequentialEffects => smallvec![Effect::Sequential(vec![
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Decrement) })),
                ])],
                TestAction::ProducePanickingEffect => {
                    #[allow(clippy::panic)] // Intentional panic for testing error handling
                    {
                        smallvec![Effect::Future(Box::pin(async {
                            panic!("Intentional panic in effect for testing");
                        }))]
                    }
                },
                TestAction::StartTimer => smallvec![Effect::Delay {
                    duration: Duration::from_millis(100),
                    action: Box::new(TestAction::Increment),
                }
                .cancellable(timer_id())],
                TestAction::StopTimer => smallvec![Effect::Cancel(timer_id())],
            }
        }
    }

    fn store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState { value: 0 }, TestReducer, TestEnv)
    }

    #[tokio::test]
    async fn test_send_action() -> Result<(), StoreError> {
        let store = store();

        store.send(TestAction::Increment).await?;
        store.send(TestAction::Increment).await?;
        store.send(TestAction::Decrement).await?;

        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_future_feeds_back() -> Result<(), StoreError> {
        let store = store();

        let action = store
            .send_and_wait_for(
                TestAction::ProduceEffect,
                |a| *a == TestAction::Increment,
                Duration::from_secs(1),
            )
            .await?;

        assert_eq!(action, TestAction::Increment);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_effect_delay() -> Result<(), StoreError> {
        let store = store();

        store.send(TestAction::ProduceDelayedAction).await?;
        assert_eq!(store.state(|s| s.value).await, 0);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_parallel_and_sequential() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProduceParallelEffects).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;
        let mut handle = store.send(TestAction::ProduceSequentialEffects).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;
        tokio::time::sleep(Duration::from_millis(50)).await;

        // +3, then +1 +1 -1
        assert_eq!(store.state(|s| s.value).await, 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_panic_isolation() -> Result<(), StoreError> {
        let store = store();

        let mut handle = store.send(TestAction::ProducePanickingEffect).await?;
        handle.wait_with_timeout(Duration::from_secs(1)).await?;

        store.send(TestAction::Increment).await?;
        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_running_effect() -> Result<(), StoreError> {
        let store = store();

        store.send(TestAction::StartTimer).await?;
        assert!(store.is_running(&timer_id()));

        store.send(TestAction::StopTimer).await?;
        assert!(!store.is_running(&timer_id()));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(store.state(|s| s.value).await, 0);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_restarting_cancellable_replaces_previous() -> Result<(), StoreError> {
        let store = store();

        store.send(TestAction::StartTimer).await?;
        tokio::time::sleep(Duration::from_millis(60)).await;
        store.send(TestAction::StartTimer).await?;

        // The first timer would have fired at 100ms.
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(store.state(|s| s.value).await, 0);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(store.state(|s| s.value).await, 1);
        assert!(!store.is_running(&timer_id()));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_aborts_timers_and_rejects_actions() -> Result<(), StoreError> {
        let store = store();

        store.send(TestAction::StartTimer).await?;
        store.shutdown(Duration::from_secs(1)).await?;

        assert_eq!(store.pending_effects(), 0);
        assert!(matches!(
            store.send(TestAction::Increment).await,
            Err(StoreError::ShutdownInProgress)
        ));
        assert_eq!(store.state(|s| s.value).await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_completed_handle() {
        let mut handle = EffectHandle::completed();
        assert_eq!(handle.pending(), 0);
        handle.wait().await;
    }
}
