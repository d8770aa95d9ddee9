//! Canvas creation and compositing.

use image::{DynamicImage, Rgba, RgbaImage, imageops};
use merge_layout::Size;

/// Fully transparent background for every merge canvas.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Allocate a transparent RGBA canvas.
pub fn new_canvas(size: Size) -> RgbaImage {
    RgbaImage::from_pixel(size.width, size.height, TRANSPARENT)
}

/// Composite `top` onto `base` with its top-left corner at (`x`, `y`).
///
/// Pixels are copied as-is, alpha included, so fully transparent source
/// pixels keep their color channels. Placements never overlap, so nothing is
/// blended. Pixels falling outside `base` are dropped.
pub fn composite(base: &mut RgbaImage, top: &DynamicImage, x: u32, y: u32) {
    imageops::replace(base, top, i64::from(x), i64::from(y));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    #[test]
    fn new_canvas_is_transparent() {
        let canvas = new_canvas(Size::new(4, 3));
        assert_eq!(canvas.dimensions(), (4, 3));
        assert!(canvas.pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn composite_copies_opaque_pixels_at_offset() {
        let mut canvas = new_canvas(Size::new(10, 10));
        composite(&mut canvas, &solid(3, 2, [255, 0, 0, 255]), 4, 5);

        assert_eq!(*canvas.get_pixel(4, 5), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(6, 6), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(3, 5), TRANSPARENT);
        assert_eq!(*canvas.get_pixel(7, 5), TRANSPARENT);
        assert_eq!(*canvas.get_pixel(4, 7), TRANSPARENT);
    }

    #[test]
    fn later_images_draw_over_earlier_ones() {
        let mut canvas = new_canvas(Size::new(4, 4));
        composite(&mut canvas, &solid(4, 4, [255, 0, 0, 255]), 0, 0);
        composite(&mut canvas, &solid(2, 2, [0, 0, 255, 255]), 0, 0);

        assert_eq!(*canvas.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(*canvas.get_pixel(3, 3), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn composite_keeps_transparent_and_translucent_pixels_exact() {
        let mut top = RgbaImage::from_pixel(2, 1, Rgba([250, 9, 99, 0]));
        top.put_pixel(1, 0, Rgba([17, 34, 51, 128]));
        let mut canvas = new_canvas(Size::new(3, 1));
        composite(&mut canvas, &DynamicImage::ImageRgba8(top), 1, 0);

        assert_eq!(*canvas.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*canvas.get_pixel(1, 0), Rgba([250, 9, 99, 0]));
        assert_eq!(*canvas.get_pixel(2, 0), Rgba([17, 34, 51, 128]));
    }

    #[test]
    fn composite_converts_grayscale_sources() {
        let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(2, 2, image::Luma([200])));
        let mut canvas = new_canvas(Size::new(2, 2));
        composite(&mut canvas, &gray, 0, 0);
        assert_eq!(*canvas.get_pixel(1, 1), Rgba([200, 200, 200, 255]));
    }

    #[test]
    fn composite_does_not_panic_on_out_of_bounds() {
        let mut base = new_canvas(Size::new(100, 100));
        let top = solid(50, 50, [1, 2, 3, 255]);
        composite(&mut base, &top, 80, 80); // partially out of bounds
        assert_eq!(*base.get_pixel(99, 99), Rgba([1, 2, 3, 255]));
    }
}
