// ============================================================================
// TONE CURVE — logistic remap of the warm channel (the "lomo" color cast)
// ============================================================================
//
// The curve is a sigmoid centered at mid-gray. Smaller steepness values give
// a harder contrast boost; large values flatten it toward the identity line.
// Only the red channel is remapped, green and blue pass through untouched.
// ============================================================================

use image::RgbImage;
use rayon::prelude::*;

/// Smallest usable steepness. Below this the curve collapses into a step and
/// the exponent denominator approaches zero.
pub const MIN_COLOR_PARAM: f64 = 0.08;

/// Channel index the curve is applied to (red, in RGB order).
pub const WARM_CHANNEL: usize = 0;

/// Build the 256-entry remap table for `color_param`.
///
/// Entry `i` evaluates `256 / (1 + e^(-(i/256 - 0.5) / color_param))`, rounded
/// and saturated to the 8-bit range.
pub fn build_remap_table(color_param: f64) -> [u8; 256] {
    debug_assert!(
        color_param >= MIN_COLOR_PARAM,
        "color_param {color_param} below {MIN_COLOR_PARAM}"
    );
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        let x = i as f64 / 256.0;
        let v = 256.0 / (1.0 + (-(x - 0.5) / color_param).exp());
        *entry = v.round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Apply the tone curve to the warm channel of `source`, returning a new image.
pub fn apply_tone_curve(source: &RgbImage, color_param: f64) -> RgbImage {
    let lut = build_remap_table(color_param);
    remap_channel(source, &lut, WARM_CHANNEL)
}

/// Run one channel of every pixel through `lut`.
pub fn remap_channel(source: &RgbImage, lut: &[u8; 256], channel: usize) -> RgbImage {
    debug_assert!(channel < 3);
    let mut out = source.clone();
    let w = out.width() as usize;
    if w == 0 || out.height() == 0 {
        return out;
    }

    let stride = w * 3;
    let raw: &mut [u8] = &mut out;
    raw.par_chunks_mut(stride).for_each(|row| {
        for px in row.chunks_exact_mut(3) {
            px[channel] = lut[px[channel] as usize];
        }
    });
    out
}
