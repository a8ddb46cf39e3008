//! Clipboard backends.
//!
//! The grid reads and writes plain text through [`ClipboardBackend`]. The
//! [`SystemClipboard`] is a thin wrapper around the `arboard` crate; the
//! [`MemoryClipboard`] keeps the text in process, for tests and for hosts
//! that manage the platform clipboard themselves.
//!
//! # Platform Notes
//!
//! - **Windows**: Uses the Win32 clipboard API
//! - **macOS**: Uses NSPasteboard
//! - **Linux**: Uses X11 selections or Wayland data-control protocol

use std::sync::Arc;

use parking_lot::Mutex;

/// Error type for clipboard operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    /// The platform clipboard could not be reached.
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    /// The clipboard holds no text.
    #[error("clipboard is empty")]
    Empty,
    /// The user or platform refused clipboard access.
    #[error("clipboard permission denied")]
    PermissionDenied,
}

impl From<arboard::Error> for ClipboardError {
    fn from(err: arboard::Error) -> Self {
        match err {
            arboard::Error::ContentNotAvailable => Self::Empty,
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// Plain-text clipboard access.
pub trait ClipboardBackend: Send {
    /// Reads the current text content.
    fn read_text(&mut self) -> Result<String, ClipboardError>;

    /// Replaces the clipboard content with `text`.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Cross-platform system clipboard access.
///
/// The underlying `arboard` handle is opened lazily on first use and kept
/// afterwards, so constructing a [`SystemClipboard`] never fails.
///
/// # Thread Safety
///
/// While `SystemClipboard` is `Send`, it's recommended to perform clipboard
/// operations on the main/UI thread for best compatibility across platforms.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new()?);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard not initialized".into()))
    }
}

impl ClipboardBackend for SystemClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        self.handle()?.get_text().map_err(Into::into)
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.handle()?.set_text(text).map_err(Into::into)
    }
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("open", &self.inner.is_some())
            .finish()
    }
}

/// An in-process clipboard.
///
/// Clones share the same contents, so a test can keep one handle while the
/// spreadsheet owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that already holds `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        let clipboard = Self::new();
        clipboard.set(text);
        clipboard
    }

    /// The current contents.
    pub fn contents(&self) -> Option<String> {
        self.text.lock().clone()
    }

    /// Replaces the contents, as another application would.
    pub fn set(&self, text: impl Into<String>) {
        *self.text.lock() = Some(text.into());
    }

    pub fn clear(&self) {
        *self.text.lock() = None;
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        self.contents().ok_or(ClipboardError::Empty)
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.set(text);
        Ok(())
    }
}

static_assertions::assert_impl_all!(MemoryClipboard: Send, Sync);
