// ============================================================================
// DISPLAY SURFACE — the seam between the controller and whatever shows pixels
// ============================================================================
//
// The surface owns the window, the sliders and key polling. Slider callbacks
// are turned into `Event`s and handed back through `poll_event`; the pump
// feeds them to the controller one at a time and re-shows the image whenever
// the controller asks for a redraw.
// ============================================================================

use image::RgbImage;

use crate::config::{COLOR_SLIDER_MAX, VIGNETTE_SLIDER_MAX};
use crate::controller::{Event, Outcome, ParameterController};
use crate::error::Result;

pub const WINDOW_NAME: &str = "Lomography";
pub const COLOR_SLIDER_LABEL: &str = "Color Param (x0.01)";
pub const VIGNETTE_SLIDER_LABEL: &str = "Vignette Radius (%)";

pub trait DisplaySurface {
    fn show_image(&mut self, name: &str, image: &RgbImage);

    /// Register an integer slider spanning `min..=max`, starting at `default`.
    fn create_slider(&mut self, label: &str, min: i32, max: i32, default: i32);

    fn set_slider_value(&mut self, label: &str, value: i32);

    /// Next pending slider change or key press, if any.
    fn poll_event(&mut self) -> Option<Event>;

    fn center_window(&mut self, name: &str, width: u32, height: u32);
}

/// What the caller's loop should do after a [`pump`].
#[derive(Clone, Debug, PartialEq)]
pub enum LoopControl {
    Continue,
    /// The session ended with this terminal outcome.
    Exit(Outcome),
}

/// Create the sliders, center the window and show the first render.
pub fn install<S: DisplaySurface + ?Sized>(controller: &ParameterController, surface: &mut S) {
    let (w, h) = controller.source().dimensions();
    surface.center_window(WINDOW_NAME, w, h);

    surface.create_slider(
        COLOR_SLIDER_LABEL,
        0,
        COLOR_SLIDER_MAX,
        controller.color_slider_position(),
    );
    surface.set_slider_value(COLOR_SLIDER_LABEL, controller.color_slider_position());

    surface.create_slider(
        VIGNETTE_SLIDER_LABEL,
        0,
        VIGNETTE_SLIDER_MAX,
        controller.vignette_param() as i32,
    );
    surface.set_slider_value(VIGNETTE_SLIDER_LABEL, controller.vignette_param() as i32);

    surface.show_image(WINDOW_NAME, controller.final_output());
}

/// Drain every pending event through the controller.
///
/// Stops early on quit or save; events queued behind a terminal one are left
/// unread.
pub fn pump<S: DisplaySurface + ?Sized>(
    controller: &mut ParameterController,
    surface: &mut S,
) -> Result<LoopControl> {
    while let Some(event) = surface.poll_event() {
        let outcome = controller.handle(event)?;
        if outcome.is_terminal() {
            return Ok(LoopControl::Exit(outcome));
        }
        if outcome == Outcome::Redraw {
            surface.show_image(WINDOW_NAME, controller.final_output());
        }
    }
    Ok(LoopControl::Continue)
}
