//! Core systems for Horizon Sheet.
//!
//! This crate provides the plumbing shared by the spreadsheet grid widget:
//!
//! - **Signal/Slot System**: Type-safe, synchronous notifications with
//!   scoped connections for mount/unmount teardown
//! - **State Store**: A single-value store with whole-state replacement and
//!   synchronous subscriber notification
//! - **Logging**: `tracing` targets and helpers
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_sheet_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;
pub mod store;

pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use store::{StateChange, Store};
