use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};

use crate::error::{Error, Result};
use crate::models::{ChannelDepth, ChannelLayout, PixelBuffer, Resolution};

/// What to do with a frame whose size differs from the run resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizePolicy {
    /// Fail the run with `ResolutionMismatch`
    #[default]
    Reject,
    /// Scale the frame to the run resolution
    Resize,
}

/// Decodes one input file into a frame.
///
/// `Error::Decode` means the file is unreadable and should be skipped;
/// any other error is fatal for the run.
pub trait FrameLoader {
    fn load(&self, path: &Path) -> Result<PixelBuffer>;
}

/// Loader backed by the `image` crate. Frames are always RGBA.
#[derive(Debug, Clone)]
pub struct ImageFrameLoader {
    resolution: Resolution,
    depth: ChannelDepth,
    resize: ResizePolicy,
}

impl ImageFrameLoader {
    pub fn new(resolution: Resolution, depth: ChannelDepth, resize: ResizePolicy) -> Self {
        Self {
            resolution,
            depth,
            resize,
        }
    }

    fn fit(&self, img: DynamicImage) -> Result<DynamicImage> {
        let (width, height) = img.dimensions();
        let actual = Resolution::new(width, height);
        if actual == self.resolution {
            return Ok(img);
        }
        match self.resize {
            ResizePolicy::Reject => Err(Error::ResolutionMismatch {
                expected: self.resolution,
                actual,
            }),
            ResizePolicy::Resize => {
                log::debug!("Resizing {} -> {}", actual, self.resolution);
                Ok(img.resize_exact(
                    self.resolution.width,
                    self.resolution.height,
                    FilterType::Triangle,
                ))
            }
        }
    }
}

impl FrameLoader for ImageFrameLoader {
    fn load(&self, path: &Path) -> Result<PixelBuffer> {
        let decode_error = |source| Error::Decode {
            path: path.to_path_buf(),
            source,
        };

        let img = ImageReader::open(path)
            .map_err(|e| decode_error(image::ImageError::IoError(e)))?
            .with_guessed_format()
            .map_err(|e| decode_error(image::ImageError::IoError(e)))?
            .decode()
            .map_err(decode_error)?;

        let img = self.fit(img)?;
        to_pixel_buffer(&img, self.depth).ok_or_else(|| Error::Render {
            reason: format!("decoded {} has an unexpected sample count", path.display()),
        })
    }
}

/// Convert a decoded image to an RGBA frame at `depth`
pub fn to_pixel_buffer(img: &DynamicImage, depth: ChannelDepth) -> Option<PixelBuffer> {
    let (width, height) = img.dimensions();
    let resolution = Resolution::new(width, height);
    let samples: Vec<u16> = match depth {
        ChannelDepth::Sixteen => img.to_rgba16().into_raw(),
        ChannelDepth::Eight => img.to_rgba8().into_raw().into_iter().map(u16::from).collect(),
    };
    PixelBuffer::from_samples(resolution, depth, ChannelLayout::Rgba, samples)
}
