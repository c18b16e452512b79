//! Image acquisition: turns files, uploads and pasted data URLs into
//! [`ImagePayload`]s for the recognition client.

use std::path::{Path, PathBuf};

use textlift_core::{ImagePayload, RecognizeError, DEFAULT_MIME_TYPE};
use thiserror::Error;
use tracing::{debug, info};

pub mod data_url;
pub mod mime_detect;

pub use data_url::parse_data_url;
pub use mime_detect::{detect_mime_type, is_generic, is_image, sniff_image_mime};

#[derive(Debug, Error)]
pub enum MediaError {
    #[error(transparent)]
    Recognize(#[from] RecognizeError),

    #[error("unsupported media type '{0}'; expected an image")]
    UnsupportedMedia(String),

    #[error("data URL is not base64-encoded")]
    NotBase64,

    #[error("failed to read image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MediaError {
    /// True when the failure means "no image was supplied".
    pub fn is_missing(&self) -> bool {
        matches!(self, MediaError::Recognize(RecognizeError::AcquisitionMissing))
    }
}

/// Build a payload from raw image bytes (HTTP upload body, stdin).
///
/// The sniffed format wins; a declared image type is used when sniffing
/// fails; a declared non-image type is rejected.
pub fn payload_from_bytes(bytes: &[u8], declared_mime: Option<&str>) -> Result<ImagePayload, MediaError> {
    if bytes.is_empty() {
        return Err(RecognizeError::AcquisitionMissing.into());
    }
    let mime = resolve_mime(bytes, declared_mime, None)?;
    debug!(bytes = bytes.len(), mime = %mime, "Encoding image bytes");
    Ok(ImagePayload::from_bytes(bytes, mime)?)
}

/// Read an image file from disk and encode it.
pub async fn load_image_file(path: &Path) -> Result<ImagePayload, MediaError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| MediaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(RecognizeError::AcquisitionMissing.into());
    }
    let mime = resolve_mime(&bytes, None, detect_mime_type(path))?;
    info!(path = %path.display(), bytes = bytes.len(), mime = %mime, "Loaded image file");
    Ok(ImagePayload::from_bytes(&bytes, mime)?)
}

fn resolve_mime(
    bytes: &[u8],
    declared: Option<&str>,
    by_extension: Option<&'static str>,
) -> Result<String, MediaError> {
    if let Some(sniffed) = sniff_image_mime(bytes) {
        return Ok(sniffed.to_string());
    }
    if let Some(declared) = declared.filter(|d| !is_generic(d)) {
        let declared = declared.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        if is_image(&declared) {
            return Ok(declared);
        }
        return Err(MediaError::UnsupportedMedia(declared));
    }
    Ok(by_extension.unwrap_or(DEFAULT_MIME_TYPE).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn sniffed_type_beats_declared() {
        let payload = payload_from_bytes(&PNG_MAGIC, Some("image/jpeg")).unwrap();
        assert_eq!(payload.mime_type(), "image/png");
    }

    #[test]
    fn declared_image_type_used_when_unknown_bytes() {
        let payload = payload_from_bytes(b"not magic", Some("image/heic; q=1")).unwrap();
        assert_eq!(payload.mime_type(), "image/heic");
    }

    #[test]
    fn declared_non_image_rejected() {
        let err = payload_from_bytes(b"hello", Some("text/plain")).unwrap_err();
        assert!(matches!(err, MediaError::UnsupportedMedia(_)));
    }

    #[test]
    fn empty_bytes_are_missing() {
        assert!(payload_from_bytes(&[], Some("image/png")).unwrap_err().is_missing());
    }

    #[tokio::test]
    async fn loads_file_and_sniffs_type() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(&PNG_MAGIC).unwrap();
        let payload = load_image_file(file.path()).await.unwrap();
        assert_eq!(payload.mime_type(), "image/png");
        assert_eq!(payload.data(), "iVBORw0KGgo=");
    }

    #[tokio::test]
    async fn falls_back_to_extension() {
        let mut file = tempfile::Builder::new().suffix(".webp").tempfile().unwrap();
        file.write_all(b"opaque").unwrap();
        let payload = load_image_file(file.path()).await.unwrap();
        assert_eq!(payload.mime_type(), "image/webp");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = load_image_file(Path::new("/definitely/not/here.png")).await.unwrap_err();
        assert!(matches!(err, MediaError::Io { .. }));
    }
}
