//! Event image storage.
//!
//! Uploaded images are validated, re-encoded to JPEG and stored under the
//! work directory with a generated name. A content-hash symlink tree
//! de-duplicates identical uploads.

use std::path::{Path, PathBuf};
use std::{fs, io::Cursor};

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::utils::AppError;

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for stored images
const JPEG_QUALITY: u8 = 85;

#[derive(Clone)]
pub struct ImageStore {
    images_dir: PathBuf,
}

impl ImageStore {
    pub fn new(images_dir: PathBuf) -> Self {
        Self { images_dir }
    }

    /// Validate, compress and persist an uploaded image. Returns the stored
    /// filename (`<uuid>.jpg`).
    pub fn save(&self, data: &[u8], original_name: &str) -> Result<String, AppError> {
        fs::create_dir_all(&self.images_dir)
            .map_err(|e| AppError::internal(format!("Failed to create images directory: {}", e)))?;

        if data.is_empty() {
            return Err(AppError::validation("Empty file provided"));
        }

        let ext = PathBuf::from(original_name)
            .extension()
            .and_then(|ext| ext.to_str().map(|s| s.to_lowercase()))
            .ok_or_else(|| {
                AppError::validation(format!("Invalid file extension for: {}", original_name))
            })?;

        validate_image(data, &ext)?;

        let compressed = compress_to_jpeg(data)?;
        let file_hash = calculate_hash(&compressed);

        if let Some(existing) = self.find_by_hash(&file_hash) {
            tracing::info!(
                original_name = %original_name,
                existing_file = %existing,
                "Duplicate image detected, reusing existing file"
            );
            return Ok(existing);
        }

        let filename = format!("{}.jpg", Uuid::new_v4());
        let file_path = self.images_dir.join(&filename);

        fs::write(&file_path, &compressed)
            .map_err(|e| AppError::internal(format!("Failed to save file: {}", e)))?;
        self.create_hash_symlink(&file_hash, &filename)?;

        tracing::info!(
            original_name = %original_name,
            stored = %filename,
            size = compressed.len(),
            "Image stored"
        );
        Ok(filename)
    }

    /// Resolve a stored filename to its on-disk path, rejecting traversal.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, AppError> {
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
        {
            return Err(AppError::validation("Invalid filename"));
        }
        Ok(self.images_dir.join(filename))
    }

    /// Best-effort removal of a stored image (event deletion).
    pub fn remove(&self, filename: &str) {
        match self.resolve(filename) {
            Ok(path) => {
                if let Err(e) = fs::remove_file(&path) {
                    tracing::warn!(file = %filename, error = %e, "Failed to remove image");
                }
            }
            Err(e) => tracing::warn!(file = %filename, error = %e, "Refusing to remove image"),
        }
    }

    fn find_by_hash(&self, hash: &str) -> Option<String> {
        let hash_dir = self.images_dir.join("by_hash");
        if !hash_dir.exists() {
            return None;
        }

        // Hash tree uses the first 2 chars as subdir (e.g. "ab/abc123...")
        let prefix = &hash[..2];
        let hash_path = hash_dir.join(format!("{}/{}", prefix, hash));

        if hash_path.exists()
            && let Ok(target) = fs::read_link(&hash_path)
        {
            return target.file_name().map(|s| s.to_string_lossy().to_string());
        }
        None
    }

    fn create_hash_symlink(&self, hash: &str, filename: &str) -> Result<(), AppError> {
        let hash_subdir = self.images_dir.join("by_hash").join(&hash[..2]);
        fs::create_dir_all(&hash_subdir)
            .map_err(|e| AppError::internal(format!("Failed to create hash dir: {}", e)))?;

        let hash_path = hash_subdir.join(hash);
        let target_path = PathBuf::from("../../").join(filename);

        symlink::symlink_auto(&target_path, &hash_path)
            .map_err(|e| AppError::internal(format!("Failed to create symlink: {}", e)))?;

        Ok(())
    }
}

fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    if !SUPPORTED_FORMATS.contains(&ext) {
        return Err(AppError::validation(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext,
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    if let Err(e) = image::load_from_memory(data) {
        return Err(AppError::validation(format!(
            "Invalid image file ({}): {}",
            ext, e
        )));
    }

    Ok(())
}

fn compress_to_jpeg(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {}", e)))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to compress image: {}", e)))?;
    }

    Ok(buffer)
}

/// Public URL for a stored image.
pub fn image_url(filename: &str) -> String {
    format!("/api/image/{}", filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn png_bytes() -> Vec<u8> {
        // 2x2 image encoded through the same codec stack we decode with
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 10, 10]));
        let mut buffer = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .expect("encode png");
        buffer
    }

    #[test]
    fn save_and_resolve_roundtrip() {
        let dir = tempdir().expect("tempdir");
        let store = ImageStore::new(dir.path().to_path_buf());

        let filename = store.save(&png_bytes(), "poster.png").expect("save");
        assert!(filename.ends_with(".jpg"));

        let path = store.resolve(&filename).expect("resolve");
        assert!(path.exists());
    }

    #[test]
    fn duplicate_content_reuses_the_stored_file() {
        let dir = tempdir().expect("tempdir");
        let store = ImageStore::new(dir.path().to_path_buf());

        let first = store.save(&png_bytes(), "a.png").expect("save");
        let second = store.save(&png_bytes(), "b.png").expect("save");
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_unsupported_format_and_traversal() {
        let dir = tempdir().expect("tempdir");
        let store = ImageStore::new(dir.path().to_path_buf());

        assert!(store.save(b"GIF89a...", "anim.gif").is_err());
        assert!(store.resolve("../etc/passwd").is_err());
        assert!(store.resolve("a/b.jpg").is_err());
    }
}
