use std::path::{Path, PathBuf};

use image::ImageFormat;
use llmapi::utils::encode_byte_to_base64;
use llmapi::LLMMessageType;
use tokio::fs;
use tracing::info;

use crate::error::StartupError;

/// A character reference decoded once at startup and then sent as-is with every request.
#[derive(Debug, Clone)]
pub struct ReferenceImage {
    pub path: PathBuf,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    data_b64: String,
    slot: usize,
}

impl ReferenceImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn data_b64(&self) -> &str {
        &self.data_b64
    }

    pub fn to_message_part(&self) -> LLMMessageType {
        let extension = self.format.extensions_str().first().copied().unwrap_or("png");
        LLMMessageType::image_with_path(
            self.data_b64.clone(),
            format!("reference_{}.{}", self.slot, extension),
        )
    }
}

#[derive(Debug, Clone)]
pub struct ReferenceImages {
    pub first: ReferenceImage,
    pub second: ReferenceImage,
}

impl ReferenceImages {
    pub async fn load(paths: &[PathBuf; 2]) -> Result<Self, StartupError> {
        let first = load_reference_image(&paths[0], 1).await?;
        let second = load_reference_image(&paths[1], 2).await?;
        info!("Reference images loaded successfully.");
        Ok(Self { first, second })
    }

    pub fn message_parts(&self) -> [LLMMessageType; 2] {
        [self.first.to_message_part(), self.second.to_message_part()]
    }
}

pub async fn load_reference_image(
    path: &Path,
    slot: usize,
) -> Result<ReferenceImage, StartupError> {
    info!("Loading reference image {}: '{}'", slot, path.display());
    let fail = |reason: String| StartupError::ReferenceImage {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = fs::read(path).await.map_err(|err| fail(err.to_string()))?;
    let format = image::guess_format(&bytes).map_err(|err| fail(err.to_string()))?;
    let decoded = image::load_from_memory_with_format(&bytes, format)
        .map_err(|err| fail(err.to_string()))?;

    Ok(ReferenceImage {
        path: path.to_path_buf(),
        format,
        width: decoded.width(),
        height: decoded.height(),
        data_b64: encode_byte_to_base64(&bytes),
        slot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat};
    use tempfile::TempDir;

    fn write_image(dir: &TempDir, name: &str, format: ImageFormat) -> PathBuf {
        let path = dir.path().join(name);
        DynamicImage::new_rgb8(8, 6)
            .save_with_format(&path, format)
            .unwrap();
        path
    }

    #[tokio::test]
    async fn loads_png_and_jpeg_references() {
        let dir = TempDir::new().unwrap();
        let paths = [
            write_image(&dir, "a.png", ImageFormat::Png),
            write_image(&dir, "b.jpg", ImageFormat::Jpeg),
        ];

        let refs = ReferenceImages::load(&paths).await.unwrap();

        assert_eq!(refs.first.mime_type(), "image/png");
        assert_eq!(refs.second.mime_type(), "image/jpeg");
        assert_eq!((refs.first.width, refs.first.height), (8, 6));
        let original = std::fs::read(&paths[0]).unwrap();
        assert_eq!(refs.first.data_b64(), encode_byte_to_base64(&original));
    }

    #[tokio::test]
    async fn message_part_mime_follows_content_not_extension() {
        let dir = TempDir::new().unwrap();
        // JPEG bytes behind a .png name
        let path = write_image(&dir, "mislabelled.png", ImageFormat::Jpeg);

        let reference = load_reference_image(&path, 2).await.unwrap();

        match reference.to_message_part() {
            LLMMessageType::IMAGE { file_path, .. } => {
                assert_eq!(file_path.as_deref(), Some("reference_2.jpg"));
            }
            other => panic!("expected image part, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_reference_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = load_reference_image(&dir.path().join("nope.png"), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, StartupError::ReferenceImage { .. }));
    }

    #[tokio::test]
    async fn non_image_reference_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let err = load_reference_image(&path, 1).await.unwrap_err();
        assert!(matches!(err, StartupError::ReferenceImage { .. }));
    }
}
