use crate::error::Result;

/// Destination for copied transcripts
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The desktop clipboard
#[cfg(feature = "clipboard")]
pub struct SystemClipboard(arboard::Clipboard);

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    /// Open the system clipboard
    ///
    /// # Errors
    ///
    /// Returns an error if no clipboard is available, e.g. on a headless host
    pub fn new() -> Result<Self> {
        arboard::Clipboard::new()
            .map(Self)
            .map_err(|e| crate::ClientError::Clipboard(e.to_string()))
    }
}

#[cfg(feature = "clipboard")]
impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.0
            .set_text(text)
            .map_err(|e| crate::ClientError::Clipboard(e.to_string()))
    }
}
