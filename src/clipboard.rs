/*!
 * Clipboard access.
 *
 * The monitor reads and writes the clipboard through the `Clipboard` trait
 * so tests can run against an in-memory buffer. The system implementation
 * opens a fresh platform handle per call, which keeps the type `Send` on
 * every platform and tolerates clipboard managers restarting underneath us.
 */

use std::sync::Arc;

use parking_lot::Mutex;

use crate::errors::ClipboardError;

/// Text register abstraction over the OS clipboard
pub trait Clipboard: Send {
    /// Current clipboard text; empty string when the clipboard holds no text
    fn get_text(&mut self) -> Result<String, ClipboardError>;

    /// Replace the clipboard contents
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard backed by the platform clipboard via arboard
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    /// Create a new system clipboard accessor
    pub fn new() -> Self {
        Self
    }
}

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        match clipboard.get_text() {
            Ok(text) => Ok(text),
            // Non-text contents (images, files) count as "nothing to translate"
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(ClipboardError::ReadFailed(e.to_string())),
        }
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
    }
}

/// In-memory clipboard for tests
///
/// Clones share one buffer, so a test can hold onto a handle, hand a clone
/// to the monitor, and then inspect or replace the contents mid-run the way
/// a user copying text would.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    buffer: Arc<Mutex<String>>,
}

impl MemoryClipboard {
    /// Create an empty in-memory clipboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an in-memory clipboard holding the given text
    pub fn with_text(text: &str) -> Self {
        let clipboard = Self::new();
        clipboard.put(text);
        clipboard
    }

    /// Replace the buffer directly, simulating a user copy
    pub fn put(&self, text: &str) {
        *self.buffer.lock() = text.to_string();
    }

    /// Read the buffer without going through the trait
    pub fn snapshot(&self) -> String {
        self.buffer.lock().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        Ok(self.buffer.lock().clone())
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        *self.buffer.lock() = text.to_string();
        Ok(())
    }
}
