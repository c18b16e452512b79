//! MIME type detection for acquired images.
//!
//! Magic bytes win over declared types, declared types win over file
//! extensions.

use std::path::Path;

/// Detect an image MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mime = match ext.as_str() {
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "png"                   => "image/png",
        "gif"                   => "image/gif",
        "webp"                  => "image/webp",
        "bmp"                   => "image/bmp",
        "tiff" | "tif"          => "image/tiff",
        "heic"                  => "image/heic",
        "heif"                  => "image/heif",
        "avif"                  => "image/avif",
        _                       => return None,
    };
    Some(mime)
}

/// Identify an image format from its leading bytes.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'B', b'M', ..] => Some("image/bmp"),
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => Some("image/tiff"),
        _ => None,
    }
}

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Whether a declared type carries no real information (`application/octet-stream`,
/// blank) and should be replaced by sniffing.
pub fn is_generic(mime: &str) -> bool {
    let mime = mime.trim();
    mime.is_empty() || mime.eq_ignore_ascii_case("application/octet-stream")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_jpeg_extension() {
        assert_eq!(detect_mime_type(&PathBuf::from("photo.JPG")), Some("image/jpeg"));
    }

    #[test]
    fn non_image_extension_is_none() {
        assert_eq!(detect_mime_type(&PathBuf::from("speech.mp3")), None);
        assert_eq!(detect_mime_type(&PathBuf::from("noext")), None);
    }

    #[test]
    fn sniffs_common_formats() {
        assert_eq!(
            sniff_image_mime(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0]),
            Some("image/png")
        );
        assert_eq!(sniff_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff_image_mime(b"GIF89a...."), Some("image/gif"));
        assert_eq!(sniff_image_mime(b"RIFF\x10\x00\x00\x00WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_image_mime(b"%PDF-1.7"), None);
        assert_eq!(sniff_image_mime(&[]), None);
    }

    #[test]
    fn generic_and_image_checks() {
        assert!(is_image("Image/PNG"));
        assert!(!is_image("text/plain"));
        assert!(is_generic("application/octet-stream"));
        assert!(is_generic(" "));
        assert!(!is_generic("image/png"));
    }
}
