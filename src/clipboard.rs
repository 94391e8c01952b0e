//! Clipboard integration

use crate::timeline::Cue;
use crate::{CuebindError, Result};
use arboard::Clipboard;
use log::debug;

/// Put a cue's text on the system clipboard
///
/// Empty cues leave the clipboard untouched.
pub fn copy_cue(cue: &Cue) -> Result<()> {
    if cue.text.is_empty() {
        debug!("Cue at {} has no text to copy", cue.start);
        return Ok(());
    }

    Clipboard::new()
        .and_then(|mut clipboard| clipboard.set_text(cue.text.as_str()))
        .map_err(|e| CuebindError::Clipboard(format!("cue at {}ms: {}", cue.start, e)))?;

    debug!("Copied cue at {} ({} chars)", cue.start, cue.text.chars().count());
    Ok(())
}
