// Image asset loading for the scrolling-image effect
//
// Assets are loaded once at startup and resized to the canvas width with
// nearest-neighbor sampling. A missing or unreadable asset is logged and
// skipped; the effect engine degrades gracefully when none load.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{GenericImageView, RgbImage};
use tracing::{info, warn};

pub fn load_images(paths: &[PathBuf], canvas_width: u32) -> Vec<RgbImage> {
    let mut images = Vec::new();
    for path in paths {
        match load_resized(path, canvas_width) {
            Ok(img) => {
                info!(path = %path.display(), w = img.width(), h = img.height(), "asset loaded");
                images.push(img);
            }
            Err(e) => warn!(path = %path.display(), "skipping asset: {e}"),
        }
    }
    images
}

fn load_resized(path: &Path, width: u32) -> Result<RgbImage, image::ImageError> {
    let img = image::open(path)?;
    let (w, h) = (img.width().max(1), img.height());
    let height = ((h as u64 * width as u64) / w as u64).max(1) as u32;
    Ok(image::imageops::resize(
        &img.to_rgb8(),
        width.max(1),
        height,
        FilterType::Nearest,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_resizes_to_canvas_width() {
        let path = std::env::temp_dir().join("lightwall_asset_test.png");
        let mut img = RgbImage::new(100, 50);
        for p in img.pixels_mut() {
            *p = image::Rgb([200, 10, 10]);
        }
        img.save(&path).unwrap();

        let loaded = load_images(&[path.clone()], 400);
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].width(), 400);
        // Aspect ratio preserved: 100x50 -> 400x200
        assert_eq!(loaded[0].height(), 200);
        assert_eq!(loaded[0].get_pixel(0, 0).0, [200, 10, 10]);
    }

    #[test]
    fn test_missing_asset_is_skipped() {
        let loaded = load_images(&[PathBuf::from("/nonexistent/nowhere.png")], 400);
        assert!(loaded.is_empty());
    }
}
