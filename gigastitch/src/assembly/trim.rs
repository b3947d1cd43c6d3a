//! Border trimming by uniform edge color.

use image::{Rgb, RgbImage};

/// Region of an image that survives trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TrimBounds {
    /// Bounds covering the whole image.
    pub fn full(image: &RgbImage) -> Self {
        Self {
            x: 0,
            y: 0,
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Finds the region left after stripping uniform borders.
///
/// The bottom and right edges are compared against the bottom-right corner
/// color, the top and left edges against the top-left corner color. A line
/// is stripped while every pixel in it is within `fuzz` of that color on
/// each channel. Edges are stripped in the order bottom, right, top, left.
/// An image that would be stripped entirely is returned whole.
pub fn trim_bounds(image: &RgbImage, fuzz: u8) -> TrimBounds {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return TrimBounds::full(image);
    }

    let top_left = *image.get_pixel(0, 0);
    let bottom_right = *image.get_pixel(width - 1, height - 1);

    let (mut top, mut bottom, mut left, mut right) = (0, height, 0, width);

    while bottom > top && row_matches(image, bottom - 1, left, right, bottom_right, fuzz) {
        bottom -= 1;
    }
    while right > left && column_matches(image, right - 1, top, bottom, bottom_right, fuzz) {
        right -= 1;
    }
    while top < bottom && row_matches(image, top, left, right, top_left, fuzz) {
        top += 1;
    }
    while left < right && column_matches(image, left, top, bottom, top_left, fuzz) {
        left += 1;
    }

    if top >= bottom || left >= right {
        return TrimBounds::full(image);
    }

    TrimBounds {
        x: left,
        y: top,
        width: right - left,
        height: bottom - top,
    }
}

fn within(pixel: &Rgb<u8>, background: Rgb<u8>, fuzz: u8) -> bool {
    pixel
        .0
        .iter()
        .zip(background.0.iter())
        .all(|(a, b)| a.abs_diff(*b) <= fuzz)
}

fn row_matches(image: &RgbImage, y: u32, from: u32, to: u32, bg: Rgb<u8>, fuzz: u8) -> bool {
    (from..to).all(|x| within(image.get_pixel(x, y), bg, fuzz))
}

fn column_matches(image: &RgbImage, x: u32, from: u32, to: u32, bg: Rgb<u8>, fuzz: u8) -> bool {
    (from..to).all(|y| within(image.get_pixel(x, y), bg, fuzz))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    /// Black canvas with a non-uniform picture at the given region.
    fn padded(width: u32, height: u32, region: TrimBounds) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let inside = x >= region.x
                && x < region.x + region.width
                && y >= region.y
                && y < region.y + region.height;
            if inside {
                Rgb([(x * 7 % 200 + 30) as u8, (y * 13 % 200 + 30) as u8, 90])
            } else {
                BLACK
            }
        })
    }

    #[test]
    fn test_strips_bottom_right_padding() {
        let region = TrimBounds {
            x: 0,
            y: 0,
            width: 20,
            height: 12,
        };
        let image = padded(32, 16, region);
        assert_eq!(trim_bounds(&image, 0), region);
    }

    #[test]
    fn test_strips_all_sides() {
        let region = TrimBounds {
            x: 3,
            y: 2,
            width: 10,
            height: 5,
        };
        let image = padded(16, 16, region);
        assert_eq!(trim_bounds(&image, 0), region);
    }

    #[test]
    fn test_uniform_image_unchanged() {
        let image = RgbImage::from_pixel(10, 6, WHITE);
        assert_eq!(trim_bounds(&image, 0), TrimBounds::full(&image));
    }

    #[test]
    fn test_fuzz_absorbs_noise() {
        let region = TrimBounds {
            x: 0,
            y: 0,
            width: 8,
            height: 8,
        };
        let mut image = padded(12, 12, region);
        // Compression noise in the padding
        image.put_pixel(10, 3, Rgb([6, 3, 8]));
        image.put_pixel(4, 11, Rgb([2, 9, 1]));
        image.put_pixel(11, 11, Rgb([3, 3, 3]));

        assert_eq!(trim_bounds(&image, 10), region);
        assert_ne!(trim_bounds(&image, 0), region);
    }

    #[test]
    fn test_no_padding_is_noop() {
        let image = padded(9, 7, TrimBounds {
            x: 0,
            y: 0,
            width: 9,
            height: 7,
        });
        assert_eq!(trim_bounds(&image, 10), TrimBounds::full(&image));
    }

    #[test]
    fn test_single_pixel() {
        let image = RgbImage::from_pixel(1, 1, BLACK);
        assert_eq!(trim_bounds(&image, 0), TrimBounds::full(&image));
    }
}
