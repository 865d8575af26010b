use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Width and height shared by every frame of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = Error;

    /// Parse `"<width>x<height>"`, both positive
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidResolution { input: s.to_string() };
        let (w, h) = s.split_once('x').ok_or_else(invalid)?;
        let width: u32 = w.parse().map_err(|_| invalid())?;
        let height: u32 = h.parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

/// Bits per channel, fixed for the duration of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelDepth {
    Eight,
    #[default]
    Sixteen,
}

impl ChannelDepth {
    pub fn from_bits(bits: u8) -> Result<Self> {
        match bits {
            8 => Ok(ChannelDepth::Eight),
            16 => Ok(ChannelDepth::Sixteen),
            other => Err(Error::InvalidParameter {
                name: "channel depth",
                reason: format!("expected 8 or 16, got {}", other),
            }),
        }
    }

    pub fn bits(&self) -> u8 {
        match self {
            ChannelDepth::Eight => 8,
            ChannelDepth::Sixteen => 16,
        }
    }

    /// Peak sample value
    pub fn max_value(&self) -> u16 {
        match self {
            ChannelDepth::Eight => u8::MAX as u16,
            ChannelDepth::Sixteen => u16::MAX,
        }
    }
}

impl fmt::Display for ChannelDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelLayout {
    Rgb,
    #[default]
    Rgba,
}

impl ChannelLayout {
    pub fn channels(&self) -> usize {
        match self {
            ChannelLayout::Rgb => 3,
            ChannelLayout::Rgba => 4,
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, ChannelLayout::Rgba)
    }

    /// Whether the sample at `index` within a pixel is alpha
    pub fn is_alpha(&self, index: usize) -> bool {
        self.has_alpha() && index == 3
    }
}

/// Which values are averaged: stored (gamma encoded) samples or linear light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    Linear,
    #[default]
    Gamma,
}

impl FromStr for ColorSpace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(ColorSpace::Linear),
            "gamma" => Ok(ColorSpace::Gamma),
            other => Err(Error::InvalidParameter {
                name: "color space",
                reason: format!("expected linear or gamma, got \"{}\"", other),
            }),
        }
    }
}

/// Decoded or averaged image. Samples are interleaved, row-major,
/// each in `0..=depth.max_value()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    resolution: Resolution,
    depth: ChannelDepth,
    layout: ChannelLayout,
    samples: Vec<u16>,
}

impl PixelBuffer {
    /// Wrap raw samples; `None` if the length does not match the geometry
    /// or a sample exceeds the depth's peak value
    pub fn from_samples(
        resolution: Resolution,
        depth: ChannelDepth,
        layout: ChannelLayout,
        samples: Vec<u16>,
    ) -> Option<Self> {
        if samples.len() != resolution.pixel_count() * layout.channels() {
            return None;
        }
        let max = depth.max_value();
        if samples.iter().any(|&s| s > max) {
            return None;
        }
        Some(Self {
            resolution,
            depth,
            layout,
            samples,
        })
    }

    /// Every pixel set to `color` (one value per channel)
    pub fn filled(
        resolution: Resolution,
        depth: ChannelDepth,
        layout: ChannelLayout,
        color: &[u16],
    ) -> Self {
        let channels = layout.channels();
        let max = depth.max_value();
        let pixel: Vec<u16> = (0..channels)
            .map(|c| color.get(c).copied().unwrap_or(max).min(max))
            .collect();
        let samples = pixel
            .iter()
            .copied()
            .cycle()
            .take(resolution.pixel_count() * channels)
            .collect();
        Self {
            resolution,
            depth,
            layout,
            samples,
        }
    }

    /// Opaque black: color channels zero, alpha at peak
    pub fn black(resolution: Resolution, depth: ChannelDepth, layout: ChannelLayout) -> Self {
        let max = depth.max_value();
        Self::filled(resolution, depth, layout, &[0, 0, 0, max])
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn width(&self) -> u32 {
        self.resolution.width
    }

    pub fn height(&self) -> u32 {
        self.resolution.height
    }

    pub fn depth(&self) -> ChannelDepth {
        self.depth
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u16> {
        self.samples
    }

    /// New buffer of the same geometry with `f(channel, sample)` applied to
    /// every sample, clamped to the depth's peak
    pub fn map_samples<F: Fn(usize, u16) -> u16>(&self, f: F) -> Self {
        let channels = self.layout.channels();
        let max = self.depth.max_value();
        let samples = self
            .samples
            .iter()
            .enumerate()
            .map(|(i, &v)| f(i % channels, v).min(max))
            .collect();
        Self {
            resolution: self.resolution,
            depth: self.depth,
            layout: self.layout,
            samples,
        }
    }

    /// Samples of the pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> &[u16] {
        let channels = self.layout.channels();
        let start = (y as usize * self.resolution.width as usize + x as usize) * channels;
        &self.samples[start..start + channels]
    }
}
