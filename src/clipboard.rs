use crate::error::{PlaygroundError, PlaygroundResult};
use ::clipboard::{ClipboardContext, ClipboardProvider};

/// Put `text` on the system clipboard.
///
/// The context is opened per call and dropped afterwards; headless sessions
/// (no X11/Wayland display) surface as [`PlaygroundError::Clipboard`].
pub fn write_text(text: &str) -> PlaygroundResult<()> {
    let mut ctx: ClipboardContext =
        ClipboardProvider::new().map_err(|e| PlaygroundError::Clipboard(e.to_string()))?;
    ctx.set_contents(text.to_owned())
        .map_err(|e| PlaygroundError::Clipboard(e.to_string()))?;
    tracing::debug!(bytes = text.len(), "copied tokens to clipboard");
    Ok(())
}
