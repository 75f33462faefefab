use anyhow::{Context, Result};
use base64::Engine as _;
use std::path::Path;

pub const FALLBACK_IMAGE_MIME: &str = "image/png";

pub fn detect_mime_type<P: AsRef<Path>>(path: P) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or(FALLBACK_IMAGE_MIME)
        .to_string()
}

pub fn encode_byte_to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
pub fn decode_base64_to_bytes(data: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .context("Base64 decoding failed")
}
pub fn current_timestamp_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_follows_extension() {
        assert_eq!(detect_mime_type("ref.jpg"), "image/jpeg");
        assert_eq!(detect_mime_type("ref.webp"), "image/webp");
        assert_eq!(detect_mime_type("ref"), FALLBACK_IMAGE_MIME);
        assert_eq!(detect_mime_type("notes.txt"), FALLBACK_IMAGE_MIME);
    }

    #[test]
    fn base64_helpers_agree() {
        let encoded = encode_byte_to_base64(b"\x89PNG");
        assert_eq!(decode_base64_to_bytes(&format!(" {encoded}\n")).unwrap(), b"\x89PNG");
        assert!(decode_base64_to_bytes("not base64!").is_err());
    }
}
