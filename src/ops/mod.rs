// ============================================================================
// OPS — the two pixel stages of the lomography pipeline
// ============================================================================

pub mod tone_curve;
pub mod vignette;

pub use tone_curve::{MIN_COLOR_PARAM, apply_tone_curve, build_remap_table};
pub use vignette::{VignetteMask, apply_vignette, blur_kernel_size, vignette_radius};
