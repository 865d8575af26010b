use crate::models::{ChannelDepth, PixelBuffer};

/// Exponent of the brightening curve applied to the final stack
pub const FINAL_GAMMA: f64 = 0.5;

/// Lookup table mapping every stored value to `round(max * (v / max) ^ exponent)`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn gamma_table(depth: ChannelDepth, exponent: f64) -> Vec<u16> {
    let max = f64::from(depth.max_value());
    (0..=depth.max_value())
        .map(|v| {
            let normalized = f64::from(v) / max;
            (normalized.powf(exponent) * max + 0.5).floor().clamp(0.0, max) as u16
        })
        .collect()
}

/// Raise every color channel to `exponent` within the buffer's value range.
/// Alpha is left untouched.
pub fn apply_gamma(buffer: &PixelBuffer, exponent: f64) -> PixelBuffer {
    let table = gamma_table(buffer.depth(), exponent);
    let layout = buffer.layout();
    buffer.map_samples(|channel, v| {
        if layout.is_alpha(channel) {
            v
        } else {
            table[v as usize]
        }
    })
}
