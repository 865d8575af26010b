//! Image encoding and output.

use std::fs::{self, OpenOptions};
use std::io::{Cursor, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, Rgba};

use crate::error::{Error, Result};
use crate::models::{ChannelDepth, ChannelLayout, PixelBuffer};

/// JPEG quality (compression factor 0.8)
pub const JPEG_QUALITY: u8 = 80;

/// Container formats the sink can write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    /// Format from the destination extension (`png` or `jpg`, any case)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("png") => Ok(OutputFormat::Png),
            Some("jpg") => Ok(OutputFormat::Jpeg),
            _ => Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Writes averaged buffers to disk.
///
/// Callers check for an existing destination first; the sink still opens
/// with create-new so an existing file is never truncated.
#[derive(Debug, Clone)]
pub struct ImageSink {
    jpeg_quality: u8,
}

impl ImageSink {
    pub fn new() -> Self {
        Self {
            jpeg_quality: JPEG_QUALITY,
        }
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Encode `buffer` in full, then write it to `path`
    pub fn write(&self, buffer: &PixelBuffer, path: &Path) -> Result<()> {
        let format = OutputFormat::from_path(path)?;
        let bytes = self.encode(buffer, format, path)?;

        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        if let Err(err) = file.write_all(&bytes).and_then(|_| file.flush()) {
            drop(file);
            let _ = fs::remove_file(path);
            return Err(err.into());
        }

        log::info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Encode to an in-memory container
    pub fn encode(&self, buffer: &PixelBuffer, format: OutputFormat, path: &Path) -> Result<Vec<u8>> {
        let img = to_dynamic_image(buffer).ok_or_else(|| Error::Render {
            reason: "buffer does not match its geometry".to_string(),
        })?;
        let encode_error = |source| Error::Encode {
            path: path.to_path_buf(),
            source,
        };

        let mut bytes = Vec::new();
        match format {
            OutputFormat::Png => {
                img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                    .map_err(encode_error)?;
            }
            OutputFormat::Jpeg => {
                // JPEG carries neither alpha nor 16-bit samples
                let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
                let encoder = JpegEncoder::new_with_quality(&mut bytes, self.jpeg_quality);
                rgb.write_with_encoder(encoder).map_err(encode_error)?;
            }
        }

        Ok(bytes)
    }
}

impl Default for ImageSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap a buffer in the matching `image` type
#[allow(clippy::cast_possible_truncation)]
pub fn to_dynamic_image(buffer: &PixelBuffer) -> Option<DynamicImage> {
    let (width, height) = (buffer.width(), buffer.height());
    let samples = buffer.samples();

    match (buffer.depth(), buffer.layout()) {
        (ChannelDepth::Sixteen, ChannelLayout::Rgba) => {
            ImageBuffer::<Rgba<u16>, _>::from_raw(width, height, samples.to_vec())
                .map(DynamicImage::ImageRgba16)
        }
        (ChannelDepth::Sixteen, ChannelLayout::Rgb) => {
            ImageBuffer::<Rgb<u16>, _>::from_raw(width, height, samples.to_vec())
                .map(DynamicImage::ImageRgb16)
        }
        (ChannelDepth::Eight, ChannelLayout::Rgba) => {
            let bytes: Vec<u8> = samples.iter().map(|&s| s as u8).collect();
            ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, bytes).map(DynamicImage::ImageRgba8)
        }
        (ChannelDepth::Eight, ChannelLayout::Rgb) => {
            let bytes: Vec<u8> = samples.iter().map(|&s| s as u8).collect();
            ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, bytes).map(DynamicImage::ImageRgb8)
        }
    }
}
