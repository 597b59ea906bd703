use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use crate::vector::Vector3;

const GAMMA_POWER: f32 = 1.0 / 2.2;

fn gamma_correct(x: f32) -> f32 {
    x.powf(GAMMA_POWER).min(1.0)
}

/// Uncompressed row-major RGB accumulator. Each cell carries the sum of
/// all radiance estimates for its pixel, and `samples` counts how many
/// full-resolution passes have been folded in; cell / samples is the
/// displayable pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBuffer {
    width: u32,
    height: u32,
    samples: u32,
    buffer: Vec<Vector3>,
}

impl SampleBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0);
        Self {
            width,
            height,
            samples: 0,
            buffer: vec![Vector3::ZERO; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Record that one full pass over every pixel has been accumulated.
    pub fn inc(&mut self) {
        self.samples += 1;
    }

    pub fn get(&self, x: u32, y: u32) -> Vector3 {
        self.buffer[(y * self.width + x) as usize]
    }

    pub fn add(&mut self, x: u32, y: u32, v: Vector3) {
        self.buffer[(y * self.width + x) as usize] += v;
    }

    /// Fold another buffer of the same size into this one, summing both
    /// the radiance and the pass counts. This is the merge point for
    /// independent workers.
    pub fn append(&mut self, other: &SampleBuffer) {
        assert!(self.width == other.width && self.height == other.height);
        for (cell, other_cell) in self.buffer.iter_mut().zip(&other.buffer) {
            *cell += *other_cell;
        }
        self.samples += other.samples;
    }

    /// Write the averaged buffer as an 8-bit RGB PNG with gamma 1/2.2.
    pub fn write_png(&self, path: &Path) -> Result<(), image::ImageError> {
        let samples = self.samples as f32;
        let image = RgbImage::from_fn(self.width, self.height, |x, y| {
            let pixel = self.get(x, y) / samples;
            Rgb([
                (gamma_correct(pixel.x) * 255.0) as u8,
                (gamma_correct(pixel.y) * 255.0) as u8,
                (gamma_correct(pixel.z) * 255.0) as u8,
            ])
        });
        image.save_with_format(path, ImageFormat::Png)
    }
}
