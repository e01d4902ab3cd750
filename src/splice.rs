use tracing::debug;

use crate::error::ReorderError;
use crate::render::LINE_END;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub start: String,
    pub end: String,
}

impl Default for Markers {
    fn default() -> Self {
        Markers {
            start: "-- ===========================================\r\n-- EJECUCIÓN DEL SEED DATA".to_string(),
            end: "-- Asegurar que la columna features".to_string(),
        }
    }
}

/// Byte offsets of the start marker and of the end marker found at or after it.
pub fn locate_block(text: &str, markers: &Markers) -> Result<(usize, usize), ReorderError> {
    let start = text
        .find(&markers.start)
        .ok_or(ReorderError::StartMarkerMissing)?;
    let end = text[start..]
        .find(&markers.end)
        .map(|off| start + off)
        .ok_or(ReorderError::EndMarkerMissing)?;
    Ok((start, end))
}

/// Replace everything from the start marker up to (not including) the end marker.
pub fn splice(text: &str, markers: &Markers, block: &str) -> Result<String, ReorderError> {
    let (start, end) = locate_block(text, markers)?;
    debug!(start, end, replaced = end - start, "splicing model block");

    let mut out = String::with_capacity(start + block.len() + LINE_END.len() + text.len() - end);
    out.push_str(&text[..start]);
    out.push_str(block);
    out.push_str(LINE_END);
    out.push_str(&text[end..]);
    Ok(out)
}
