//! `data:<mime>;base64,<payload>` parsing.
//!
//! Browsers hand over pasted or uploaded images in this form. Only the part
//! after the first comma is forwarded to the recognition service.

use base64::{engine::general_purpose::STANDARD, Engine};
use textlift_core::{ImagePayload, RecognizeError, DEFAULT_MIME_TYPE};
use tracing::debug;

use crate::MediaError;
use crate::mime_detect::{is_generic, is_image, sniff_image_mime};

/// Enough base64 characters to cover the longest magic number we sniff.
const SNIFF_PREFIX_CHARS: usize = 24;

/// Parse a data URL (or a bare base64 string) into an [`ImagePayload`].
///
/// - `data:` prefix without a comma, or an empty payload: `AcquisitionMissing`.
/// - non-base64 data URLs: [`MediaError::NotBase64`].
/// - non-image declared types: [`MediaError::UnsupportedMedia`].
pub fn parse_data_url(input: &str) -> Result<ImagePayload, MediaError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(RecognizeError::AcquisitionMissing.into());
    }

    let (header, payload) = match input.split_once(',') {
        Some((header, payload)) => (Some(header), payload),
        None if input.starts_with("data:") => return Err(RecognizeError::AcquisitionMissing.into()),
        None => (None, input),
    };

    let declared = match header {
        Some(header) => {
            let meta = header.strip_prefix("data:").unwrap_or(header);
            let mut parts = meta.split(';');
            let mime = parts.next().unwrap_or("").trim().to_ascii_lowercase();
            if !parts.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
                return Err(MediaError::NotBase64);
            }
            mime
        }
        None => String::new(),
    };

    let payload = payload.trim();
    if payload.is_empty() {
        return Err(RecognizeError::AcquisitionMissing.into());
    }

    let mime = if is_generic(&declared) {
        sniff_payload(payload).unwrap_or(DEFAULT_MIME_TYPE).to_string()
    } else if is_image(&declared) {
        declared
    } else {
        return Err(MediaError::UnsupportedMedia(declared));
    };

    debug!(mime = %mime, chars = payload.len(), "Parsed image data URL");
    Ok(ImagePayload::new(payload, mime)?)
}

fn sniff_payload(payload: &str) -> Option<&'static str> {
    let len = payload.len().min(SNIFF_PREFIX_CHARS) / 4 * 4;
    let prefix = payload.get(..len)?;
    let bytes = STANDARD.decode(prefix).ok()?;
    sniff_image_mime(&bytes)
}
