// ============================================================================
// CONFIG — runtime settings resolved from the command line
// ============================================================================

use std::path::PathBuf;

use crate::cli::CliArgs;

/// File written when the user presses the save key.
pub const DEFAULT_OUTPUT: &str = "lomography_result.jpg";
pub const DEFAULT_QUALITY: u8 = 95;
/// Color slider position; divided by 100 to get the curve steepness.
pub const DEFAULT_COLOR_SLIDER: i32 = 10;
pub const DEFAULT_VIGNETTE: i32 = 100;

pub const COLOR_SLIDER_MAX: i32 = 20;
pub const VIGNETTE_SLIDER_MAX: i32 = 100;

#[derive(Clone, Debug, PartialEq)]
pub struct LomoConfig {
    pub output_path: PathBuf,
    /// JPEG quality, 1–100.
    pub quality: u8,
    pub color_slider: i32,
    pub vignette: i32,
    /// Render once and save without opening a window.
    pub headless: bool,
}

impl Default for LomoConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            quality: DEFAULT_QUALITY,
            color_slider: DEFAULT_COLOR_SLIDER,
            vignette: DEFAULT_VIGNETTE,
            headless: false,
        }
    }
}

impl From<&CliArgs> for LomoConfig {
    fn from(args: &CliArgs) -> Self {
        Self {
            output_path: args.output.clone(),
            quality: args.quality,
            color_slider: args.color,
            vignette: args.vignette,
            headless: args.headless,
        }
    }
}
