//! Clipboard event sources.
//!
//! Platforms deliver copy, cut and paste as document-level events. Instead
//! of global listeners, the host owns a [`ClipboardEvents`] source and hands
//! it to each spreadsheet; a mounted spreadsheet holds scoped connections to
//! it and releases them when it unmounts.

use horizon_sheet_core::{ConnectionGuard, Signal};

/// A clipboard gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardEvent {
    Copy,
    Cut,
    /// Paste, optionally carrying the text delivered with the event. Without
    /// text, the spreadsheet reads its clipboard backend.
    Paste(Option<String>),
}

/// Outcome of an asynchronous clipboard permission query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// A shared source of clipboard events.
#[derive(Default)]
pub struct ClipboardEvents {
    signal: Signal<ClipboardEvent>,
}

impl ClipboardEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers an event to every listener.
    pub fn emit(&self, event: ClipboardEvent) {
        self.signal.emit(event);
    }

    /// Listens until the returned guard is dropped.
    pub fn listen<F>(&self, f: F) -> ConnectionGuard
    where
        F: Fn(&ClipboardEvent) + Send + Sync + 'static,
    {
        self.signal.connect_scoped(f)
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.signal.connection_count()
    }
}

impl std::fmt::Debug for ClipboardEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardEvents")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

static_assertions::assert_impl_all!(ClipboardEvents: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_listen_and_release() {
        let events = ClipboardEvents::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let guard = {
            let seen = seen.clone();
            events.listen(move |event| seen.lock().push(event.clone()))
        };
        assert_eq!(events.listener_count(), 1);

        events.emit(ClipboardEvent::Copy);
        drop(guard);
        events.emit(ClipboardEvent::Cut);

        assert_eq!(*seen.lock(), vec![ClipboardEvent::Copy]);
        assert_eq!(events.listener_count(), 0);
    }
}
