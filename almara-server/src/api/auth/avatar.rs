//! Avatar upload processing
//!
//! Uploaded avatars are decoded, re-encoded as JPEG and stored under the
//! public images directory; the row keeps only the public path.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use uuid::Uuid;

use crate::core::Config;
use crate::utils::AppError;

/// Maximum accepted upload size (5MB).
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// JPEG quality for stored avatars.
const JPEG_QUALITY: u8 = 85;

/// An avatar file lifted out of a multipart form.
#[derive(Debug)]
pub struct AvatarUpload {
    pub original_name: String,
    pub data: Vec<u8>,
}

/// Validate, re-encode and store an avatar; returns its public path
/// (`/images/users/<uuid>.jpg`).
pub async fn save_avatar(config: &Config, upload: AvatarUpload) -> Result<String, AppError> {
    if upload.data.len() > MAX_AVATAR_BYTES {
        return Err(AppError::validation("Avatar exceeds the 5MB limit"));
    }

    let img = image::load_from_memory(&upload.data)
        .map_err(|e| AppError::validation(format!("Invalid image: {e}")))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        img.to_rgb8()
            .write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to encode avatar: {e}")))?;
    }

    let filename = format!("{}.jpg", Uuid::new_v4());
    let dir = Path::new(&config.public_dir).join("images").join("users");
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create avatar dir: {e}")))?;
    tokio::fs::write(dir.join(&filename), &buffer)
        .await
        .map_err(|e| AppError::internal(format!("Failed to store avatar: {e}")))?;

    Ok(format!("/images/users/{filename}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 30, 30]));
        let mut buffer = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[tokio::test]
    async fn stores_a_jpeg_under_the_public_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::with_overrides(":memory:", 0);
        config.public_dir = tmp.path().to_string_lossy().into_owned();

        let path = save_avatar(
            &config,
            AvatarUpload {
                original_name: "me.png".into(),
                data: png_bytes(),
            },
        )
        .await
        .unwrap();

        assert!(path.starts_with("/images/users/"));
        assert!(path.ends_with(".jpg"));
        let on_disk = tmp.path().join(path.trim_start_matches('/'));
        assert!(on_disk.exists());
    }

    #[tokio::test]
    async fn garbage_bytes_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::with_overrides(":memory:", 0);
        config.public_dir = tmp.path().to_string_lossy().into_owned();

        let err = save_avatar(
            &config,
            AvatarUpload {
                original_name: "me.png".into(),
                data: vec![0, 1, 2, 3],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
