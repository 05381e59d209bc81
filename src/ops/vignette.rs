// ============================================================================
// VIGNETTE — soft radial halo multiplied over the tone-curved image
// ============================================================================
//
// The mask starts as a uniform 0.75 field with a full-weight disc in the
// middle. A box blur feathers the disc edge, and the result is multiplied
// into every channel. Row loops are rayon-parallel like the rest of `ops`.
// ============================================================================

use image::RgbImage;
use rayon::prelude::*;

/// Weight outside the disc before feathering.
pub const HALO_BASE_WEIGHT: f32 = 0.75;

/// Pixel radius of the unaffected disc for a `vignette_param` percentage.
///
/// The percentage is of half the smaller image dimension, rounded, and never
/// less than one pixel.
pub fn vignette_radius(width: u32, height: u32, vignette_param: u32) -> u32 {
    let max_radius = width.min(height) / 2;
    let r = (vignette_param as f64 * max_radius as f64 / 100.0).round() as u32;
    r.max(1)
}

/// Box-blur window for a given radius: at least 1, always odd.
pub fn blur_kernel_size(radius: u32) -> usize {
    radius.max(1) as usize | 1
}

/// Per-pixel multiplicative weights, one plane shared by all three channels.
#[derive(Clone, Debug, PartialEq)]
pub struct VignetteMask {
    width: u32,
    height: u32,
    weights: Vec<f32>,
}

impl VignetteMask {
    /// Rasterize the disc for `vignette_param` and feather it.
    pub fn build(width: u32, height: u32, vignette_param: u32) -> Self {
        let radius = vignette_radius(width, height, vignette_param);
        let w = width as usize;
        let h = height as usize;
        let mut weights = vec![HALO_BASE_WEIGHT; w * h];
        if w == 0 || h == 0 {
            return Self { width, height, weights };
        }

        let cx = (width / 2) as i64;
        let cy = (height / 2) as i64;
        let r2 = radius as i64 * radius as i64;
        weights.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
            let dy = y as i64 - cy;
            for (x, v) in row.iter_mut().enumerate() {
                let dx = x as i64 - cx;
                if dx * dx + dy * dy <= r2 {
                    *v = 1.0;
                }
            }
        });

        let weights = box_blur_plane(&weights, w, h, blur_kernel_size(radius));
        Self { width, height, weights }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn weight(&self, x: u32, y: u32) -> f32 {
        self.weights[y as usize * self.width as usize + x as usize]
    }

    /// Multiply `image` by the mask. Dimensions must match.
    pub fn apply(&self, image: &RgbImage) -> RgbImage {
        debug_assert_eq!(image.dimensions(), self.dimensions());
        let mut out = image.clone();
        let w = self.width as usize;
        if w == 0 || self.height == 0 {
            return out;
        }

        let raw: &mut [u8] = &mut out;
        raw.par_chunks_mut(w * 3)
            .zip(self.weights.par_chunks(w))
            .for_each(|(row, weights)| {
                for (px, &k) in row.chunks_exact_mut(3).zip(weights) {
                    for c in px.iter_mut() {
                        let v = *c as f32 / 255.0 * k;
                        *c = (v * 255.0).round().clamp(0.0, 255.0) as u8;
                    }
                }
            });
        out
    }
}

/// Apply the vignette for `vignette_param` to `image`, returning a new image.
pub fn apply_vignette(image: &RgbImage, vignette_param: u32) -> RgbImage {
    let (w, h) = image.dimensions();
    VignetteMask::build(w, h, vignette_param).apply(image)
}

// ---------------------------------------------------------------------------
//  Separable box blur over a single f32 plane
// ---------------------------------------------------------------------------

/// Mirror an out-of-range index back into `0..len` without repeating the
/// edge sample (`c b | a b c d | c b`).
#[inline]
fn reflect_101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let i = i.rem_euclid(period);
    if i >= len as isize {
        (period - i) as usize
    } else {
        i as usize
    }
}

/// Running-sum box filter along each row of a `w` x `h` plane.
///
/// The window sum is seeded once per row, then each step adds the sample
/// entering on the right and drops the one leaving on the left, so the cost
/// per pixel does not depend on `kernel_size`.
fn blur_rows(src: &[f32], w: usize, h: usize, kernel_size: usize) -> Vec<f32> {
    let half = (kernel_size / 2) as isize;
    let k = kernel_size as f64;
    let mut out = vec![0.0f32; w * h];
    out.par_chunks_mut(w).enumerate().for_each(|(y, row_out)| {
        let row_in = &src[y * w..(y + 1) * w];
        let mut sum: f64 = (-half..=half)
            .map(|o| row_in[reflect_101(o, w)] as f64)
            .sum();
        for (x, out) in row_out.iter_mut().enumerate() {
            *out = (sum / k) as f32;
            let x = x as isize;
            sum += row_in[reflect_101(x + half + 1, w)] as f64;
            sum -= row_in[reflect_101(x - half, w)] as f64;
        }
    });
    out
}

fn transpose(src: &[f32], w: usize, h: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; w * h];
    out.par_chunks_mut(h).enumerate().for_each(|(x, col)| {
        for (y, v) in col.iter_mut().enumerate() {
            *v = src[y * w + x];
        }
    });
    out
}

fn box_blur_plane(src: &[f32], w: usize, h: usize, kernel_size: usize) -> Vec<f32> {
    debug_assert!(kernel_size % 2 == 1, "box kernel must be odd");
    if kernel_size <= 1 {
        return src.to_vec();
    }

    // Horizontal pass
    let h_buf = blur_rows(src, w, h, kernel_size);

    // Vertical pass, run as rows of the transposed plane
    let t_buf = blur_rows(&transpose(&h_buf, w, h), h, w, kernel_size);
    transpose(&t_buf, h, w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use image::Rgb;
    use std::time::{Duration, Instant};

    /// Direct windowed average, the reference the running-sum blur must match.
    fn naive_box_blur(src: &[f32], w: usize, h: usize, kernel_size: usize) -> Vec<f32> {
        let half = (kernel_size / 2) as isize;
        let k = kernel_size as f32;
        let mut h_buf = vec![0.0f32; w * h];
        for y in 0..h {
            for x in 0..w {
                let sum: f32 = (-half..=half)
                    .map(|o| src[y * w + reflect_101(x as isize + o, w)])
                    .sum();
                h_buf[y * w + x] = sum / k;
            }
        }
        let mut out = vec![0.0f32; w * h];
        for y in 0..h {
            for x in 0..w {
                let sum: f32 = (-half..=half)
                    .map(|o| h_buf[reflect_101(y as isize + o, h) * w + x])
                    .sum();
                out[y * w + x] = sum / k;
            }
        }
        out
    }

    #[test]
    fn radius_is_clamped_to_one() {
        assert_eq!(vignette_radius(100, 80, 0), 1);
        assert_eq!(vignette_radius(3, 3, 0), 1);
        assert_eq!(vignette_radius(1, 1, 100), 1);
    }

    #[test]
    fn full_radius_on_square_is_half_width() {
        assert_eq!(vignette_radius(64, 64, 100), 32);
        assert_eq!(vignette_radius(10, 10, 100), 5);
    }

    #[test]
    fn radius_rounds_to_nearest() {
        // 50 * 3 / 100 = 1.5
        assert_eq!(vignette_radius(100, 101, 3), 2);
        // 50 * 33 / 100 = 16.5
        assert_eq!(vignette_radius(100, 100, 33), 17);
    }

    #[test]
    fn kernel_size_is_always_odd() {
        assert_eq!(blur_kernel_size(0), 1);
        assert_eq!(blur_kernel_size(1), 1);
        assert_eq!(blur_kernel_size(2), 3);
        assert_eq!(blur_kernel_size(5), 5);
        for r in 0..200 {
            assert_eq!(blur_kernel_size(r) % 2, 1);
        }
    }

    #[test]
    fn reflect_skips_edge_sample() {
        assert_eq!(reflect_101(-1, 4), 1);
        assert_eq!(reflect_101(-2, 4), 2);
        assert_eq!(reflect_101(4, 4), 2);
        assert_eq!(reflect_101(5, 4), 1);
        assert_eq!(reflect_101(-3, 1), 0);
    }

    #[test]
    fn center_is_full_weight() {
        for p in (1..=100).step_by(9).chain([100]) {
            let mask = VignetteMask::build(101, 101, p);
            assert_abs_diff_eq!(mask.weight(50, 50), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn corner_keeps_halo_weight_for_small_disc() {
        let mask = VignetteMask::build(101, 101, 10);
        assert_abs_diff_eq!(mask.weight(0, 0), HALO_BASE_WEIGHT, epsilon = 1e-5);
        assert_abs_diff_eq!(mask.weight(100, 100), HALO_BASE_WEIGHT, epsilon = 1e-5);
    }

    #[test]
    fn zero_param_does_not_panic() {
        let mask = VignetteMask::build(7, 5, 0);
        assert_abs_diff_eq!(mask.weight(3, 2), 1.0);
        assert_abs_diff_eq!(mask.weight(0, 0), HALO_BASE_WEIGHT);
        let img = RgbImage::from_pixel(7, 5, Rgb([200, 100, 40]));
        let out = apply_vignette(&img, 0);
        assert_eq!(out.get_pixel(3, 2), &Rgb([200, 100, 40]));
        assert_eq!(out.get_pixel(0, 0), &Rgb([150, 75, 30]));
    }

    #[test]
    fn mask_stays_in_unit_range() {
        let mask = VignetteMask::build(40, 25, 60);
        for y in 0..25 {
            for x in 0..40 {
                let w = mask.weight(x, y);
                assert!((HALO_BASE_WEIGHT - 1e-5..=1.0 + 1e-5).contains(&w));
            }
        }
    }

    #[test]
    fn feathered_corner_on_small_image() {
        // Disc of radius 2 on a 4x4 grid leaves the corner partly outside;
        // a 3x3 average around it lands at 7.75 / 9.
        let mask = VignetteMask::build(4, 4, 100);
        assert_abs_diff_eq!(mask.weight(0, 0), 7.75 / 9.0, epsilon = 1e-5);
        assert_abs_diff_eq!(mask.weight(2, 2), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn empty_image_passes_through() {
        let out = apply_vignette(&RgbImage::new(0, 3), 50);
        assert_eq!(out.dimensions(), (0, 3));
    }

    #[test]
    fn running_sum_blur_matches_direct_average() {
        for &(w, h) in &[(1, 1), (1, 7), (5, 3), (7, 9), (13, 4), (9, 9)] {
            let src: Vec<f32> = (0..w * h)
                .map(|i| ((i * 37 + 11) % 17) as f32 / 16.0)
                .collect();
            for kernel in [1, 3, 5, 7, 9, 15, 21] {
                let fast = box_blur_plane(&src, w, h, kernel);
                let slow = naive_box_blur(&src, w, h, kernel);
                for (a, b) in fast.iter().zip(&slow) {
                    assert_abs_diff_eq!(*a, *b, epsilon = 1e-5);
                }
            }
        }
    }

    #[test]
    fn transpose_round_trips() {
        let src: Vec<f32> = (0..12).map(|i| i as f32).collect();
        let t = transpose(&src, 4, 3);
        assert_eq!(t[1], src[4]);
        assert_eq!(transpose(&t, 3, 4), src);
    }

    #[test]
    fn two_megapixel_mask_builds_quickly() {
        let start = Instant::now();
        let mask = VignetteMask::build(1600, 1250, 100);
        let elapsed = start.elapsed();
        assert_abs_diff_eq!(mask.weight(800, 625), 1.0, epsilon = 1e-5);
        assert!(mask.weight(0, 0) < 1.0);
        assert!(mask.weight(0, 0) >= HALO_BASE_WEIGHT - 1e-5);
        // A per-pixel cost that grows with the kernel takes minutes here.
        assert!(elapsed < Duration::from_secs(20), "took {elapsed:?}");
    }
}
