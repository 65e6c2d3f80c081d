//! On-disk image storage: originals under `images/`, thumbnails under
//! `thumbnails/`, both named by content hash so repeated copies of the same
//! image never duplicate a file.

use super::error::{ClipboardError, Result};
use image::imageops::FilterType;
use image::GenericImageView;
use std::path::{Path, PathBuf};

pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 120;
pub const DEFAULT_THUMBNAIL_HEIGHT: u32 = 80;

#[derive(Debug, Clone)]
pub struct ImageStorageResult {
    pub image_path: PathBuf,
    pub thumbnail_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub file_size: u64,
}

pub struct ImageStore {
    images_dir: PathBuf,
    thumbnails_dir: PathBuf,
    thumbnail_size: (u32, u32),
}

impl ImageStore {
    pub fn new(base_dir: &Path) -> Result<Self> {
        let images_dir = base_dir.join("images");
        let thumbnails_dir = base_dir.join("thumbnails");
        std::fs::create_dir_all(&images_dir)?;
        std::fs::create_dir_all(&thumbnails_dir)?;
        Ok(Self {
            images_dir,
            thumbnails_dir,
            thumbnail_size: (DEFAULT_THUMBNAIL_WIDTH, DEFAULT_THUMBNAIL_HEIGHT),
        })
    }

    pub fn with_thumbnail_size(mut self, width: u32, height: u32) -> Self {
        self.thumbnail_size = (width, height);
        self
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn thumbnails_dir(&self) -> &Path {
        &self.thumbnails_dir
    }

    /// Reconstructs the path `save_image` would have written to, from the
    /// hash/format pair a [`super::store::ClipboardRecord`] carries.
    pub fn image_path_for(&self, hash: &str, format: &str) -> PathBuf {
        self.images_dir.join(format!("{hash}.{format}"))
    }

    pub fn thumbnail_path_for(&self, hash: &str) -> PathBuf {
        self.thumbnails_dir.join(format!("{hash}.png"))
    }

    /// Writes the original, decodes it, and writes a thumbnail scaled to fit
    /// within the configured bounds. An image already smaller than the
    /// thumbnail bounds is copied as-is rather than upscaled.
    pub fn save_image(&self, data: &[u8], format: &str, hash: &str) -> Result<ImageStorageResult> {
        let image_path = self.images_dir.join(format!("{hash}.{format}"));
        let thumbnail_path = self.thumbnails_dir.join(format!("{hash}.png"));

        std::fs::write(&image_path, data)?;

        let decoded = image::load_from_memory(data)
            .map_err(|e| ClipboardError::ImageDecodeError(e.to_string()))?;
        let (width, height) = decoded.dimensions();

        let (max_w, max_h) = self.thumbnail_size;
        let thumbnail = if width <= max_w && height <= max_h {
            decoded
        } else {
            decoded.resize(max_w, max_h, FilterType::Triangle)
        };
        thumbnail
            .save(&thumbnail_path)
            .map_err(|e| ClipboardError::ImageEncodeError(e.to_string()))?;

        let file_size = std::fs::metadata(&image_path)?.len();

        Ok(ImageStorageResult {
            image_path,
            thumbnail_path,
            width,
            height,
            file_size,
        })
    }

    pub fn load_image(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(ClipboardError::from)
    }

    pub fn delete_image(&self, image_path: &Path, thumbnail_path: &Path) -> Result<()> {
        if image_path.exists() {
            std::fs::remove_file(image_path)?;
        }
        if thumbnail_path.exists() {
            std::fs::remove_file(thumbnail_path)?;
        }
        Ok(())
    }

    pub fn image_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Total bytes occupied by originals and thumbnails combined.
    pub fn storage_size(&self) -> Result<u64> {
        let mut total = 0u64;
        for dir in [&self.images_dir, &self.thumbnails_dir] {
            for entry in std::fs::read_dir(dir)? {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    total += entry.metadata()?.len();
                }
            }
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        // 2x2 red PNG, small enough to never need downscaling.
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([255, 0, 0]));
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn save_image_writes_original_and_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path()).unwrap();
        let data = tiny_png();
        let result = store.save_image(&data, "png", "abcd").unwrap();
        assert!(result.image_path.exists());
        assert!(result.thumbnail_path.exists());
        assert_eq!(result.width, 2);
        assert_eq!(result.height, 2);
    }

    #[test]
    fn small_image_thumbnail_is_not_upscaled() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path()).unwrap();
        let data = tiny_png();
        let result = store.save_image(&data, "png", "abcd").unwrap();
        let thumb = image::open(&result.thumbnail_path).unwrap();
        assert_eq!(thumb.dimensions(), (2, 2));
    }

    #[test]
    fn delete_image_removes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path()).unwrap();
        let data = tiny_png();
        let result = store.save_image(&data, "png", "abcd").unwrap();
        store
            .delete_image(&result.image_path, &result.thumbnail_path)
            .unwrap();
        assert!(!result.image_path.exists());
        assert!(!result.thumbnail_path.exists());
    }

    #[test]
    fn storage_size_accounts_for_both_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path()).unwrap();
        assert_eq!(store.storage_size().unwrap(), 0);
        store.save_image(&tiny_png(), "png", "abcd").unwrap();
        assert!(store.storage_size().unwrap() > 0);
    }
}
