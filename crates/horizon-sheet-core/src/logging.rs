//! Logging facilities for Horizon Sheet.
//!
//! Horizon Sheet uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in the host application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_sheet=debug")
//!         .init();
//!
//!     // Mount spreadsheets here...
//! }
//! ```
//!
//! The library never installs a subscriber itself.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_sheet_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_sheet_core::signal";
    /// State store target.
    pub const STORE: &str = "horizon_sheet_core::store";
    /// Widget-level target.
    pub const SHEET: &str = "horizon_sheet";
    /// Keyboard/mouse navigation reducer.
    pub const NAVIGATION: &str = "horizon_sheet::navigation";
    /// Copy/cut/paste pipeline and platform clipboard.
    pub const CLIPBOARD: &str = "horizon_sheet::clipboard";
    /// Formula detection and delegation.
    pub const FORMULA: &str = "horizon_sheet::formula";
    /// Commit coordinator.
    pub const COMMIT: &str = "horizon_sheet::commit";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations such as a single
/// event dispatch.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_sheet::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are thin wrappers around the `tracing` crate macros with a
/// consistent target naming.
#[macro_export]
macro_rules! sheet_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_sheet", $($arg)*)
    };
}

#[macro_export]
macro_rules! sheet_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_sheet", $($arg)*)
    };
}

#[macro_export]
macro_rules! sheet_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_sheet", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        // Just ensure it doesn't panic without a subscriber
        let _span = PerfSpan::new("test_operation");
    }

    #[test]
    fn test_targets_are_namespaced() {
        for target in [
            targets::NAVIGATION,
            targets::CLIPBOARD,
            targets::FORMULA,
            targets::COMMIT,
        ] {
            assert!(target.starts_with(targets::SHEET));
        }
        assert!(targets::STORE.starts_with(targets::CORE));
    }
}
