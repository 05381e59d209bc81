// ============================================================================
// PARAMETER CONTROLLER — owns the parameters and the cached pipeline stages
// ============================================================================
//
// Each event is handled to completion before the next one is read. A color
// change reruns both stages; a vignette change reruns only the vignette,
// reusing the cached tone-curve output.
// ============================================================================

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::config::{COLOR_SLIDER_MAX, LomoConfig, VIGNETTE_SLIDER_MAX};
use crate::error::Result;
use crate::io::save_image;
use crate::ops::{MIN_COLOR_PARAM, apply_tone_curve, apply_vignette};

/// Key that quits without saving.
pub const QUIT_KEY: char = 'q';
/// Key that saves the current result and quits.
pub const SAVE_KEY: char = 's';

/// Input to [`ParameterController::handle`]. Slider values are raw positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    ColorChanged(i32),
    VignetteChanged(i32),
    KeyPressed(char),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// `final_output` changed and should be shown.
    Redraw,
    /// Nothing to do.
    Ignored,
    Quit,
    /// The result was written to this path; the session is over.
    Saved(PathBuf),
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Outcome::Quit | Outcome::Saved(_))
    }
}

/// Map a color slider position to the curve steepness.
pub fn color_param_from_slider(position: i32) -> f64 {
    (position as f64 / 100.0).max(MIN_COLOR_PARAM)
}

fn vignette_from_slider(position: i32) -> u32 {
    position.clamp(0, VIGNETTE_SLIDER_MAX) as u32
}

pub struct ParameterController {
    source: RgbImage,
    tone_curve_output: RgbImage,
    final_output: RgbImage,
    color_slider: i32,
    color_param: f64,
    vignette_param: u32,
    output_path: PathBuf,
    quality: u8,
}

impl ParameterController {
    /// Take ownership of `source` and run the pipeline once so both caches are
    /// populated before anything is displayed.
    pub fn new(source: RgbImage, config: &LomoConfig) -> Self {
        let color_slider = config.color_slider.clamp(0, COLOR_SLIDER_MAX);
        let color_param = color_param_from_slider(color_slider);
        let vignette_param = vignette_from_slider(config.vignette);
        let tone_curve_output = apply_tone_curve(&source, color_param);
        let final_output = apply_vignette(&tone_curve_output, vignette_param);
        log::debug!(
            "initial render: color_param={color_param:.2} vignette={vignette_param}%"
        );
        Self {
            source,
            tone_curve_output,
            final_output,
            color_slider,
            color_param,
            vignette_param,
            output_path: config.output_path.clone(),
            quality: config.quality,
        }
    }

    pub fn handle(&mut self, event: Event) -> Result<Outcome> {
        match event {
            Event::ColorChanged(v) => {
                self.color_slider = v.clamp(0, COLOR_SLIDER_MAX);
                self.color_param = color_param_from_slider(self.color_slider);
                self.tone_curve_output = apply_tone_curve(&self.source, self.color_param);
                self.final_output = apply_vignette(&self.tone_curve_output, self.vignette_param);
                log::debug!("color_param -> {:.2}", self.color_param);
                Ok(Outcome::Redraw)
            }
            Event::VignetteChanged(v) => {
                self.vignette_param = vignette_from_slider(v);
                self.final_output = apply_vignette(&self.tone_curve_output, self.vignette_param);
                log::debug!("vignette -> {}%", self.vignette_param);
                Ok(Outcome::Redraw)
            }
            Event::KeyPressed(QUIT_KEY) => {
                log::info!("quit requested");
                Ok(Outcome::Quit)
            }
            Event::KeyPressed(SAVE_KEY) => {
                self.save()?;
                Ok(Outcome::Saved(self.output_path.clone()))
            }
            Event::KeyPressed(_) => Ok(Outcome::Ignored),
        }
    }

    /// Write the current result to the configured output path.
    pub fn save(&self) -> Result<()> {
        save_image(&self.final_output, &self.output_path, self.quality)?;
        log::info!("result saved as {}", self.output_path.display());
        Ok(())
    }

    pub fn source(&self) -> &RgbImage {
        &self.source
    }

    pub fn tone_curve_output(&self) -> &RgbImage {
        &self.tone_curve_output
    }

    pub fn final_output(&self) -> &RgbImage {
        &self.final_output
    }

    pub fn color_param(&self) -> f64 {
        self.color_param
    }

    /// Last color slider position, before the steepness floor is applied.
    pub fn color_slider_position(&self) -> i32 {
        self.color_slider
    }

    pub fn vignette_param(&self) -> u32 {
        self.vignette_param
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}
