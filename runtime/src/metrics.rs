//! Metric descriptions for store activity.
//!
//! The store records through the `metrics` facade, which is a no-op until the
//! host installs a recorder. Hosts that export metrics call
//! [`register_metrics`] once after installing their recorder so exporters
//! carry units and help text.

use metrics::{describe_counter, describe_histogram, Unit};

// Re-export metrics macros for use in other crates
pub use metrics::{counter, gauge, histogram};

/// Store metric names
pub mod names {
    /// Actions accepted by the store
    pub const COMMANDS_TOTAL: &str = "store.commands.total";
    /// Actions rejected because the store is shutting down
    pub const SHUTDOWN_REJECTED: &str = "store.shutdown.rejected_actions";
    /// Reducer execution time
    pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";
    /// Effects started, labelled by `type`
    pub const EFFECTS_EXECUTED: &str = "store.effects.executed";
    /// Running effects aborted through cancellation
    pub const EFFECTS_CANCELLED: &str = "store.effects.cancelled";
}

/// Register descriptions for all store metrics
pub fn register_metrics() {
    describe_counter!(names::COMMANDS_TOTAL, Unit::Count, "Actions accepted by the store");
    describe_counter!(
        names::SHUTDOWN_REJECTED,
        Unit::Count,
        "Actions rejected while the store was shutting down"
    );
    describe_histogram!(
        names::REDUCER_DURATION,
        Unit::Seconds,
        "Time spent inside the reducer per action"
    );
    describe_counter!(
        names::EFFECTS_EXECUTED,
        Unit::Count,
        "Effects started by the store, by effect type"
    );
    describe_counter!(
        names::EFFECTS_CANCELLED,
        Unit::Count,
        "Running effects aborted by cancellation or replacement"
    );
}
