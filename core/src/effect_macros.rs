//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants that wrap
//! async service calls and timers.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use checkout_upsell_core::async_effect;
///
/// async_effect! {
///     match catalog.fetch_offers(&query).await {
///         Ok(candidates) => Some(UpsellAction::CandidatesLoaded { request, candidates }),
///         Err(error) => Some(UpsellAction::CandidatesFailed { request, error }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use checkout_upsell_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_secs(3),
///     action: UpsellAction::DismissError { generation: 1 }
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

/// Create an `Effect::Cancellable` around another effect
///
/// # Example
///
/// ```rust,ignore
/// use checkout_upsell_core::{cancellable, delay};
///
/// cancellable! {
///     id: EffectId::from_static("banner"),
///     effect: delay! { duration: Duration::from_secs(3), action: Action::Hide }
/// }
/// ```
#[macro_export]
macro_rules! cancellable {
    (
        id: $id:expr,
        effect: $effect:expr
    ) => {
        $crate::effect::Effect::Cancellable {
            id: $id,
            effect: ::std::boxed::Box::new($effect),
        }
    };
}
