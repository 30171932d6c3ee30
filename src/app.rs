//! PPM viewer application
//!
//! Holds the decoded image, uploads it to an egui texture on the first
//! frame after a change, and paints it each frame stretched into a
//! fixed 800x600 destination over a black background. Resizing the
//! window does not rescale the draw target.

use crate::ppm::{self, PpmImage};
use egui::{Color32, ColorImage, Context, Key, Rect, TextureHandle, TextureOptions, Vec2};
use std::path::Path;

/// Initial window client size; also the destination rectangle the
/// image is stretched into.
pub const WINDOW_WIDTH: f32 = 800.0;
pub const WINDOW_HEIGHT: f32 = 600.0;

pub struct PpmViewerApp {
    /// Currently displayed image; replaced when a new file is dropped
    /// onto the window.
    image: PpmImage,
    /// Texture handle for egui rendering; rebuilt whenever `image`
    /// changes.
    texture: Option<TextureHandle>,
    /// Error message from the last drag-and-drop load attempt.
    error: Option<String>,
}

impl PpmViewerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, image: PpmImage) -> Self {
        Self {
            image,
            texture: None,
            error: None,
        }
    }

    fn ensure_texture(&mut self, ctx: &Context) {
        if self.texture.is_some() {
            return;
        }
        let color_image = ColorImage::from_rgb(
            [self.image.width as usize, self.image.height as usize],
            &self.image.pixels,
        );
        self.texture = Some(ctx.load_texture("ppm_image", color_image, TextureOptions::NEAREST));
    }

    /// Decode a dropped file and replace the displayed image. A failed
    /// decode keeps the current image and reports the error in-window.
    fn open_dropped(&mut self, path: &Path) {
        match ppm::decode(path) {
            Ok(image) => {
                self.texture = None; // drop old texture
                self.image = image;
                self.error = None;
            }
            Err(e) => {
                self.error = Some(format!("{}: {}", path.display(), e));
            }
        }
    }
}

impl eframe::App for PpmViewerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|f| f.path.clone()));
        if let Some(path) = dropped {
            self.open_dropped(&path);
        }

        self.ensure_texture(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| {
                if let Some(ref tex) = self.texture {
                    let dest = Rect::from_min_size(
                        ui.max_rect().min,
                        Vec2::new(WINDOW_WIDTH, WINDOW_HEIGHT),
                    );
                    ui.painter().image(
                        tex.id(),
                        dest,
                        Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }

                if let Some(ref err) = self.error {
                    ui.vertical_centered(|ui| {
                        ui.add_space(ui.available_height() / 3.0);
                        ui.colored_label(Color32::WHITE, format!("error: {}", err));
                    });
                }
            });
    }
}
