use crate::crop::CropRect;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use usls::Image;

/// Loads an image from disk
///
/// An unreadable or undecodable path is a load failure, fatal for that image.
pub fn load_image(path: &Path) -> Result<Image> {
    let decoded = image::open(path)
        .with_context(|| format!("could not load image from {}", path.display()))?;
    Ok(Image::from(decoded.to_rgb8()))
}

/// Creates a new image containing only the pixels inside the crop rectangle
pub fn crop_to_rect(image: &Image, rect: &CropRect) -> Result<Image> {
    let mut rgb_image = image.to_rgb8();
    let cropped = image::imageops::crop(
        &mut rgb_image,
        rect.x_start,
        rect.y_top,
        rect.width(),
        rect.height(),
    )
    .to_image();
    Ok(Image::from(cropped))
}

/// Saves an image to disk, creating parent directories as needed
///
/// Returns the written (width, height) for logging.
pub fn save_image(image: &Image, path: &Path) -> Result<(u32, u32)> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("could not create directory {}", parent.display()))?;
        }
    }

    let rgb_image = image.to_rgb8();
    rgb_image
        .save(path)
        .with_context(|| format!("could not save image to {}", path.display()))?;
    Ok((rgb_image.width(), rgb_image.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn test_image(width: u32, height: u32) -> Image {
        let mut rgb_image = RgbImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let pixel = if (x + y) % 2 == 0 {
                    image::Rgb([255, 255, 255]) // White
                } else {
                    image::Rgb([0, 0, 0]) // Black
                };
                rgb_image.put_pixel(x, y, pixel);
            }
        }
        Image::from(rgb_image)
    }

    #[test]
    fn test_crop_to_rect_dimensions() {
        let img = test_image(1000, 800);
        let rect = CropRect::new(50, 0, 350, 800);

        let cropped = crop_to_rect(&img, &rect).unwrap();
        assert_eq!(cropped.width(), 300);
        assert_eq!(cropped.height(), 800);
    }

    #[test]
    fn test_crop_to_rect_preserves_pixels() {
        let img = test_image(100, 100);
        let rect = CropRect::new(10, 20, 60, 70);

        let cropped = crop_to_rect(&img, &rect).unwrap().to_rgb8();
        let original = img.to_rgb8();
        for y in 0..50 {
            for x in 0..50 {
                assert_eq!(cropped.get_pixel(x, y), original.get_pixel(x + 10, y + 20));
            }
        }
    }

    #[test]
    fn test_crop_full_frame_is_identity_sized() {
        let img = test_image(640, 480);
        let rect = CropRect::new(0, 0, 640, 480);

        let cropped = crop_to_rect(&img, &rect).unwrap();
        assert_eq!(cropped.width(), 640);
        assert_eq!(cropped.height(), 480);
    }

    #[test]
    fn test_save_reports_written_dimensions() {
        let img = test_image(320, 240);
        let dir = std::env::temp_dir().join("shouldercrop_image_save_test");
        let path = dir.join("nested").join("out.png");

        let (width, height) = save_image(&img, &path).unwrap();
        assert_eq!((width, height), (320, 240));
        assert!(path.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let result = load_image(Path::new("/nonexistent/definitely_missing.jpg"));
        assert!(result.is_err());
    }
}
