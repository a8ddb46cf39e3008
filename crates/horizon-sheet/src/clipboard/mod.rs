//! Copy, cut and paste.
//!
//! - [`pipeline`]: pure text serialization and paste composition
//! - [`ClipboardBackend`]: where text is read from and written to
//! - [`ClipboardEvents`]: the host's source of clipboard gestures

mod events;
pub mod pipeline;
mod platform;

pub use events::{ClipboardEvent, ClipboardEvents, Permission};
pub use platform::{ClipboardBackend, ClipboardError, MemoryClipboard, SystemClipboard};
