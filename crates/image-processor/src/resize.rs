//! Resampling to a planned size.
//!
//! The planner has already chosen the exact output size, so these helpers
//! never recompute aspect ratios; they only resample.

use image::DynamicImage;
use image::imageops::FilterType;
use merge_layout::Size;
use tracing::debug;

/// Resample `img` to exactly `target` with `filter`.
///
/// Returns a clone when the image already has the target size.
pub fn resize_to(img: &DynamicImage, target: Size, filter: FilterType) -> DynamicImage {
    let (orig_w, orig_h) = (img.width(), img.height());

    if orig_w == target.width && orig_h == target.height {
        debug!(orig_w, orig_h, "Image already at target size, skipping resize");
        return img.clone();
    }

    debug!(
        orig_w,
        orig_h,
        new_width = target.width,
        new_height = target.height,
        ?filter,
        "Resizing image"
    );

    img.resize_exact(target.width, target.height, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// Create a test DynamicImage with given dimensions.
    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        let gray = GrayImage::from_pixel(width, height, Luma([128]));
        DynamicImage::ImageLuma8(gray)
    }

    #[test]
    fn test_resize_downscale() {
        let img = create_test_image(800, 600);
        let result = resize_to(&img, Size::new(400, 300), FilterType::Lanczos3);
        assert_eq!(result.width(), 400);
        assert_eq!(result.height(), 300);
    }

    #[test]
    fn test_resize_upscale() {
        let img = create_test_image(200, 100);
        let result = resize_to(&img, Size::new(400, 200), FilterType::Triangle);
        assert_eq!(result.width(), 400);
        assert_eq!(result.height(), 200);
    }

    #[test]
    fn test_resize_same_size() {
        let img = create_test_image(384, 500);
        let result = resize_to(&img, Size::new(384, 500), FilterType::Lanczos3);
        assert_eq!(result.width(), 384);
        assert_eq!(result.height(), 500);
    }

    #[test]
    fn test_resize_keeps_uniform_color() {
        let img = create_test_image(64, 64);
        let result = resize_to(&img, Size::new(16, 16), FilterType::Triangle);
        assert_eq!(result.to_luma8().get_pixel(8, 8).0[0], 128);
    }

    #[test]
    fn test_resize_to_one_pixel_row() {
        // Very wide, very short image
        let img = create_test_image(1000, 1);
        let result = resize_to(&img, Size::new(10, 1), FilterType::Lanczos3);
        assert_eq!(result.width(), 10);
        assert_eq!(result.height(), 1);
    }
}
