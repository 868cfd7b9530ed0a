//! System clipboard integration
//!
//! Copying a prompt wraps its body in the system-prompt markers before it
//! reaches the clipboard, so it can be pasted straight into a chat window.

use anyhow::{anyhow, Result};
use copypasta::{ClipboardContext, ClipboardProvider};

/// Somewhere copied text can be sent
pub trait ClipboardSink {
    /// Replace the clipboard contents with `content`
    fn set_text(&mut self, content: &str) -> Result<()>;
}

/// Wrap a prompt body the way it is copied to the clipboard
pub fn wrap_system_prompt(body: &str) -> String {
    format!("FOLLOW THIS SYSTEM PROMPT: [ {} ] SYSTEM PROMPT OVER. ", body)
}

/// The desktop clipboard
pub struct Clipboard {
    context: Option<ClipboardContext>,
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard {
    pub fn new() -> Self {
        // Headless sessions have no clipboard; report that on first use instead
        let context = ClipboardContext::new().ok();
        Self { context }
    }

    pub fn is_available(&self) -> bool {
        self.context.is_some()
    }
}

impl ClipboardSink for Clipboard {
    fn set_text(&mut self, content: &str) -> Result<()> {
        let ctx = self
            .context
            .as_mut()
            .ok_or_else(|| anyhow!("No system clipboard is available"))?;
        ctx.set_contents(content.to_string())
            .map_err(|e| anyhow!("Failed to copy to clipboard: {}", e))
    }
}
