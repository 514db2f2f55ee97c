//! Icon artwork sources.

use std::fs;
use std::path::{Path, PathBuf};

use crate::resources::png;

/// An RGBA image, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Image {
    /// `None` unless `rgba` holds exactly `width * height` pixels.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || rgba.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Image {
            width,
            height,
            rgba,
        })
    }

    /// A square image of one colour.
    pub fn filled(size: u32, rgba: [u8; 4]) -> Self {
        Image {
            width: size,
            height: size,
            rgba: rgba.repeat(size as usize * size as usize),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// `[r, g, b, a]` at column `x` of row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.rgba[i..i + 4].copy_from_slice(&rgba);
    }
}

/// Supplies icon artwork for a requested size.
pub trait IconProvider {
    /// A square image exactly `size` pixels wide, if one is available.
    fn best_icon_for_size(&self, size: u32) -> Option<Image>;
}

/// Icon artwork read from PNG files on disk.
///
/// Unreadable or malformed files are skipped with a warning.
#[derive(Debug, Default)]
pub struct FileIconProvider {
    images: Vec<Image>,
}

impl FileIconProvider {
    pub fn load(paths: &[PathBuf]) -> Self {
        let images = paths
            .iter()
            .filter_map(|path| match load_png(path) {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::warn!("skipping icon image `{}`: {}", path.display(), e);
                    None
                }
            })
            .collect();

        FileIconProvider { images }
    }
}

fn load_png(path: &Path) -> Result<Image, png::PngError> {
    let bytes = fs::read(path)?;
    png::decode(&bytes)
}

impl IconProvider for FileIconProvider {
    fn best_icon_for_size(&self, size: u32) -> Option<Image> {
        self.images
            .iter()
            .find(|image| image.width() == size && image.height() == size)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_rejects_wrong_length() {
        assert!(Image::new(2, 2, vec![0; 15]).is_none());
        assert!(Image::new(0, 2, Vec::new()).is_none());
        assert!(Image::new(2, 2, vec![0; 16]).is_some());
    }

    #[test]
    fn test_pixels() {
        let mut image = Image::filled(3, [1, 2, 3, 4]);
        image.set_pixel(2, 1, [9, 9, 9, 9]);
        assert_eq!(image.pixel(0, 0), [1, 2, 3, 4]);
        assert_eq!(image.pixel(2, 1), [9, 9, 9, 9]);
    }

    #[test]
    fn test_file_provider_matches_exact_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();

        for size in [32u32, 256, 512] {
            let path = dir.path().join(format!("icon{}.png", size));
            fs::write(&path, png::encode(&Image::filled(size, [200, 10, 10, 255])).unwrap()).unwrap();
            paths.push(path);
        }
        let broken = dir.path().join("broken.png");
        fs::write(&broken, b"not a png").unwrap();
        paths.push(broken);

        let provider = FileIconProvider::load(&paths);

        assert!(provider.best_icon_for_size(16).is_none());
        assert_eq!(provider.best_icon_for_size(32).unwrap().width(), 32);
        assert!(provider.best_icon_for_size(48).is_none());
        assert_eq!(provider.best_icon_for_size(256).unwrap().width(), 256);
    }
}
