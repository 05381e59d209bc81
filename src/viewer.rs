// ============================================================================
// VIEWER — eframe/egui display surface for the interactive session
// ============================================================================
//
// egui is immediate-mode, so the sliders are redrawn every frame and any
// change is queued as an `Event`. After drawing, `surface::pump` drains the
// queue through the controller and the texture is swapped when a new render
// comes back.
// ============================================================================

use std::collections::VecDeque;
use std::sync::mpsc;

use image::RgbImage;

use crate::controller::{Event, Outcome, ParameterController};
use crate::error::{LomoError, Result};
use crate::surface::{
    self, COLOR_SLIDER_LABEL, DisplaySurface, LoopControl, VIGNETTE_SLIDER_LABEL, WINDOW_NAME,
};

/// Height reserved below the image for the slider panel.
const SLIDER_PANEL_HEIGHT: f32 = 72.0;

struct Slider {
    label: String,
    min: i32,
    max: i32,
    value: i32,
}

pub struct EguiSurface {
    ctx: egui::Context,
    texture: Option<egui::TextureHandle>,
    sliders: Vec<Slider>,
    events: VecDeque<Event>,
    pending_size: Option<egui::Vec2>,
}

impl EguiSurface {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            texture: None,
            sliders: Vec::new(),
            events: VecDeque::new(),
            pending_size: None,
        }
    }

    /// Draw sliders and image for this frame, queueing slider and key events.
    pub fn draw(&mut self, ctx: &egui::Context) {
        if let Some(size) = self.pending_size.take() {
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(size));
        }

        let typed: Vec<char> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Text(t) => Some(t.chars().collect::<Vec<_>>()),
                    _ => None,
                })
                .flatten()
                .collect()
        });
        self.events.extend(typed.into_iter().map(Event::KeyPressed));

        let mut changed: Vec<(String, i32)> = Vec::new();
        egui::TopBottomPanel::bottom("sliders").show(ctx, |ui| {
            egui::Grid::new("lomo_params")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    for slider in &mut self.sliders {
                        ui.label(slider.label.as_str());
                        let r = ui.add(egui::Slider::new(&mut slider.value, slider.min..=slider.max));
                        if r.changed() {
                            changed.push((slider.label.clone(), slider.value));
                        }
                        ui.end_row();
                    }
                });
            ui.small("s: save and quit    q: quit");
        });
        for (label, value) in changed {
            match slider_event(&label, value) {
                Some(ev) => self.events.push_back(ev),
                None => log::warn!("no handler for slider '{label}'"),
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(tex) = &self.texture {
                egui::ScrollArea::both().show(ui, |ui| {
                    ui.add(egui::Image::new(egui::load::SizedTexture::from_handle(tex)));
                });
            }
        });
    }
}

fn slider_event(label: &str, value: i32) -> Option<Event> {
    match label {
        COLOR_SLIDER_LABEL => Some(Event::ColorChanged(value)),
        VIGNETTE_SLIDER_LABEL => Some(Event::VignetteChanged(value)),
        _ => None,
    }
}

impl DisplaySurface for EguiSurface {
    fn show_image(&mut self, name: &str, image: &RgbImage) {
        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgb(size, image.as_raw());
        match &mut self.texture {
            Some(tex) => tex.set(color_image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(self.ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR));
            }
        }
        self.ctx.request_repaint();
    }

    fn create_slider(&mut self, label: &str, min: i32, max: i32, default: i32) {
        self.sliders.push(Slider {
            label: label.to_string(),
            min,
            max,
            value: default.clamp(min, max),
        });
    }

    fn set_slider_value(&mut self, label: &str, value: i32) {
        if let Some(s) = self.sliders.iter_mut().find(|s| s.label == label) {
            s.value = value.clamp(s.min, s.max);
        }
    }

    fn poll_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    fn center_window(&mut self, _name: &str, width: u32, height: u32) {
        // The native window is centered by eframe at creation; this only
        // makes sure it is sized to the image.
        self.pending_size = Some(window_size(width, height));
    }
}

/// Inner window size for an image of `width` x `height`.
pub fn window_size(width: u32, height: u32) -> egui::Vec2 {
    egui::vec2(width as f32, height as f32 + SLIDER_PANEL_HEIGHT)
}

pub struct LomoApp {
    controller: ParameterController,
    surface: EguiSurface,
    done: mpsc::Sender<Result<Outcome>>,
    finished: bool,
}

impl LomoApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        controller: ParameterController,
        done: mpsc::Sender<Result<Outcome>>,
    ) -> Self {
        let mut surface = EguiSurface::new(cc.egui_ctx.clone());
        surface::install(&controller, &mut surface);
        Self {
            controller,
            surface,
            done,
            finished: false,
        }
    }

    fn finish(&mut self, ctx: &egui::Context, result: Result<Outcome>) {
        if let Err(e) = &result {
            log::error!("{e}");
        }
        let _ = self.done.send(result);
        self.finished = true;
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}

impl eframe::App for LomoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.finished {
            return;
        }
        self.surface.draw(ctx);
        match surface::pump(&mut self.controller, &mut self.surface) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit(outcome)) => self.finish(ctx, Ok(outcome)),
            Err(e) => self.finish(ctx, Err(e)),
        }
    }
}

/// Open the window and run until the user quits, saves, or closes it.
/// Closing the window counts as quitting.
pub fn run(controller: ParameterController) -> Result<Outcome> {
    let (w, h) = controller.source().dimensions();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(window_size(w, h))
            .with_title(WINDOW_NAME),
        centered: true,
        ..Default::default()
    };

    let (tx, rx) = mpsc::channel();
    eframe::run_native(
        WINDOW_NAME,
        options,
        Box::new(move |cc| Box::new(LomoApp::new(cc, controller, tx))),
    )
    .map_err(LomoError::from)?;

    rx.try_recv().unwrap_or(Ok(Outcome::Quit))
}
