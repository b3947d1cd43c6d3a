//! In-process compositor built on the `image` crate.

use super::compositor::{check_inputs, CompositionError, Compositor, MontageLayout};
use super::trim::trim_bounds;
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, RgbImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Largest side a baseline JPEG can encode.
const MAX_JPEG_DIMENSION: u64 = u16::MAX as u64;

/// Compositor that decodes, places and re-encodes images itself.
///
/// Working images are RGB: the output format is JPEG, which has no alpha.
#[derive(Debug, Clone)]
pub struct RasterCompositor {
    jpeg_quality: u8,
    trim_fuzz: u8,
}

impl RasterCompositor {
    pub fn new(jpeg_quality: u8, trim_fuzz: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
            trim_fuzz,
        }
    }
}

impl Compositor for RasterCompositor {
    fn name(&self) -> &str {
        "raster"
    }

    fn montage(
        &self,
        inputs: &[PathBuf],
        layout: MontageLayout,
        output: &Path,
    ) -> Result<(), CompositionError> {
        check_inputs(inputs, layout)?;

        let (width, height) = layout.output_size();
        if width > MAX_JPEG_DIMENSION || height > MAX_JPEG_DIMENSION {
            return Err(CompositionError::InvalidLayout(format!(
                "{}x{} exceeds the JPEG limit of {} pixels per side",
                width, height, MAX_JPEG_DIMENSION
            )));
        }

        let mut canvas = RgbImage::new(width as u32, height as u32);
        for (index, input) in inputs.iter().enumerate() {
            let cell = decode(input)?;
            let (x, y) = layout.cell_origin(index);
            place_cell(&mut canvas, &cell, x, y, layout);
            trace!(input = %input.display(), x, y, "Cell placed");
        }

        encode(&canvas, output, self.jpeg_quality)?;
        debug!(
            output = %output.display(),
            width,
            height,
            cells = inputs.len(),
            "Montage written"
        );
        Ok(())
    }

    fn trim(&self, input: &Path, output: &Path) -> Result<(u32, u32), CompositionError> {
        let image = decode(input)?;
        let bounds = trim_bounds(&image, self.trim_fuzz);
        let trimmed =
            imageops::crop_imm(&image, bounds.x, bounds.y, bounds.width, bounds.height).to_image();

        encode(&trimmed, output, self.jpeg_quality)?;
        debug!(
            output = %output.display(),
            x = bounds.x,
            y = bounds.y,
            width = bounds.width,
            height = bounds.height,
            "Trimmed image written"
        );
        Ok(trimmed.dimensions())
    }
}

/// Decodes an image file, detecting the format from its content.
fn decode(path: &Path) -> Result<RgbImage, CompositionError> {
    let data = std::fs::read(path).map_err(|source| CompositionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory(&data).map_err(|source| CompositionError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgb8())
}

/// Copies `cell` onto the canvas, clipped to its cell.
fn place_cell(canvas: &mut RgbImage, cell: &RgbImage, x: u32, y: u32, layout: MontageLayout) {
    let width = cell.width().min(layout.cell_width);
    let height = cell.height().min(layout.cell_height);
    let clipped = imageops::crop_imm(cell, 0, 0, width, height).to_image();
    imageops::replace(canvas, &clipped, x as i64, y as i64);
}

fn encode(image: &RgbImage, path: &Path, quality: u8) -> Result<(), CompositionError> {
    let file = File::create(path).map_err(|source| CompositionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);
        encoder
            .encode_image(image)
            .map_err(|source| CompositionError::Image {
                path: path.to_path_buf(),
                source,
            })?;
    }
    writer.flush().map_err(|source| CompositionError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::TempDir;

    fn write_png(path: &Path, image: &RgbImage) {
        image.save_with_format(path, image::ImageFormat::Png).unwrap();
    }

    fn solid(size: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(size, size, Rgb([value, value, value]))
    }

    fn close(pixel: &Rgb<u8>, value: u8) -> bool {
        pixel.0.iter().all(|c| c.abs_diff(value) <= 4)
    }

    #[test]
    fn test_montage_row() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("0000-0000.jpg");
        let b = temp_dir.path().join("0000-0001.jpg");
        // PNG content under a .jpg name: format comes from the bytes
        write_png(&a, &solid(16, 255));
        write_png(&b, &solid(16, 128));
        let output = temp_dir.path().join("line-0000.jpg");

        let compositor = RasterCompositor::new(100, 10);
        compositor
            .montage(&[a, b], MontageLayout::row(2, 16), &output)
            .unwrap();

        let row = image::open(&output).unwrap().to_rgb8();
        assert_eq!(row.dimensions(), (32, 16));
        assert!(close(row.get_pixel(4, 4), 255));
        assert!(close(row.get_pixel(20, 4), 128));
    }

    #[test]
    fn test_montage_clips_oversized_cell() {
        let temp_dir = TempDir::new().unwrap();
        let big = temp_dir.path().join("big.png");
        let small = temp_dir.path().join("small.png");
        write_png(&big, &solid(24, 255));
        write_png(&small, &solid(16, 0));
        let output = temp_dir.path().join("out.jpg");

        RasterCompositor::new(100, 10)
            .montage(&[big, small], MontageLayout::row(2, 16), &output)
            .unwrap();

        let row = image::open(&output).unwrap().to_rgb8();
        assert_eq!(row.dimensions(), (32, 16));
        assert!(close(row.get_pixel(20, 8), 0));
    }

    #[test]
    fn test_montage_rejects_wrong_input_count() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out.jpg");
        let result = RasterCompositor::new(90, 10).montage(
            &[temp_dir.path().join("a.jpg")],
            MontageLayout::row(3, 16),
            &output,
        );
        assert!(matches!(result, Err(CompositionError::InvalidLayout(_))));
    }

    #[test]
    fn test_montage_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out.jpg");
        let result = RasterCompositor::new(90, 10).montage(
            &[temp_dir.path().join("absent.jpg")],
            MontageLayout::row(1, 16),
            &output,
        );
        assert!(matches!(result, Err(CompositionError::Io { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn test_trim_removes_padding() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("stitched.png");
        // 24x16 picture in a 32x16 canvas; 8-pixel aligned blocks of gray
        let canvas = RgbImage::from_fn(32, 16, |x, y| {
            let value = match (x, y) {
                (24.., _) => 0,
                (0..=15, 0..=7) => 255,
                _ => 128,
            };
            Rgb([value, value, value])
        });
        write_png(&input, &canvas);
        let output = temp_dir.path().join("final.jpg");

        let size = RasterCompositor::new(100, 10).trim(&input, &output).unwrap();

        assert_eq!(size, (24, 16));
        assert_eq!(image::image_dimensions(&output).unwrap(), (24, 16));
    }
}
