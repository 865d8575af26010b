use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::models::{ChannelDepth, ChannelLayout, ColorSpace, PixelBuffer, Resolution};

/// One opaque black frame is always part of every average, so an N-frame
/// group lands at N/(N+1) of the plain mean.
pub const BACKGROUND_TERM: bool = true;

/// Engine configuration passed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSettings {
    pub channel_depth: ChannelDepth,
    pub color_space: ColorSpace,
}

/// The single compute resource used for every averaging call of a run
pub trait RenderEngine {
    /// Average `frames` together with the background term
    fn reduce_mean(&mut self, frames: &[PixelBuffer]) -> Result<PixelBuffer>;

    /// Human-readable name (used in log output)
    fn name(&self) -> &str;
}

/// CPU implementation of the render engine
#[derive(Debug, Clone)]
pub struct CpuEngine {
    resolution: Resolution,
    settings: RenderSettings,
}

impl CpuEngine {
    pub fn new(resolution: Resolution, settings: RenderSettings) -> Self {
        Self {
            resolution,
            settings,
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn settings(&self) -> RenderSettings {
        self.settings
    }
}

impl RenderEngine for CpuEngine {
    fn reduce_mean(&mut self, frames: &[PixelBuffer]) -> Result<PixelBuffer> {
        reduce_mean(self.resolution, &self.settings, frames)
    }

    fn name(&self) -> &str {
        "cpu"
    }
}

/// Per-pixel, per-channel mean of `frames` plus the black background.
///
/// Every frame must match `resolution`, the configured channel depth and a
/// common layout. Sums are exact (`u64`) in gamma space; linear space goes
/// through `f64`. Results are rounded half-up on store.
pub fn reduce_mean(
    resolution: Resolution,
    settings: &RenderSettings,
    frames: &[PixelBuffer],
) -> Result<PixelBuffer> {
    let depth = settings.channel_depth;
    let layout = check_frames(resolution, depth, frames)?;

    let background = PixelBuffer::black(resolution, depth, layout);
    let mut inputs: Vec<&PixelBuffer> = Vec::with_capacity(frames.len() + 1);
    if BACKGROUND_TERM {
        inputs.push(&background);
    }
    inputs.extend(frames.iter());

    if inputs.is_empty() {
        return Err(Error::Render {
            reason: "nothing to average".to_string(),
        });
    }

    let len = resolution.pixel_count() * layout.channels();
    let samples = match settings.color_space {
        ColorSpace::Gamma => mean_stored(&inputs, len),
        ColorSpace::Linear => mean_linear(&inputs, layout, depth, len),
    };

    PixelBuffer::from_samples(resolution, depth, layout, samples).ok_or_else(|| Error::Render {
        reason: format!("averaged samples do not fit {} {}", resolution, depth),
    })
}

/// Validate geometry and return the shared layout
fn check_frames(
    resolution: Resolution,
    depth: ChannelDepth,
    frames: &[PixelBuffer],
) -> Result<ChannelLayout> {
    let layout = frames
        .first()
        .map(|f| f.layout())
        .unwrap_or_default();

    for frame in frames {
        if frame.resolution() != resolution {
            return Err(Error::ResolutionMismatch {
                expected: resolution,
                actual: frame.resolution(),
            });
        }
        if frame.depth() != depth {
            return Err(Error::DepthMismatch {
                expected: depth,
                actual: frame.depth(),
            });
        }
        if frame.layout() != layout {
            return Err(Error::LayoutMismatch {
                expected: layout,
                actual: frame.layout(),
            });
        }
    }

    Ok(layout)
}

fn mean_stored(inputs: &[&PixelBuffer], len: usize) -> Vec<u16> {
    let count = inputs.len() as u64;
    (0..len)
        .into_par_iter()
        .map(|i| {
            let sum: u64 = inputs.iter().map(|b| u64::from(b.samples()[i])).sum();
            ((sum + count / 2) / count) as u16
        })
        .collect()
}

fn mean_linear(
    inputs: &[&PixelBuffer],
    layout: ChannelLayout,
    depth: ChannelDepth,
    len: usize,
) -> Vec<u16> {
    let curve = TransferCurve::new(depth);
    let channels = layout.channels();
    let count = inputs.len() as f64;
    let stored_count = inputs.len() as u64;

    (0..len)
        .into_par_iter()
        .map(|i| {
            if layout.is_alpha(i % channels) {
                let sum: u64 = inputs.iter().map(|b| u64::from(b.samples()[i])).sum();
                return ((sum + stored_count / 2) / stored_count) as u16;
            }
            let sum: f64 = inputs.iter().map(|b| curve.to_linear(b.samples()[i])).sum();
            curve.to_stored(sum / count)
        })
        .collect()
}

/// sRGB transfer function over one channel depth
struct TransferCurve {
    max: f64,
    linear: Vec<f64>,
}

impl TransferCurve {
    fn new(depth: ChannelDepth) -> Self {
        let max = f64::from(depth.max_value());
        let linear = (0..=depth.max_value())
            .map(|v| srgb_to_linear(f64::from(v) / max))
            .collect();
        Self { max, linear }
    }

    fn to_linear(&self, stored: u16) -> f64 {
        self.linear[stored as usize]
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn to_stored(&self, linear: f64) -> u16 {
        let encoded = linear_to_srgb(linear.clamp(0.0, 1.0));
        (encoded * self.max + 0.5).floor().clamp(0.0, self.max) as u16
    }
}

fn srgb_to_linear(v: f64) -> f64 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(v: f64) -> f64 {
    if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}
