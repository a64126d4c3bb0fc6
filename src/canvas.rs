//! Canvas view — uploads the document image as a texture and letterbox-fits
//! it into the available rect.
//!
//! The texture is only re-uploaded when the document reports a change via
//! `take_changed`, so an idle frame costs nothing.

use eframe::egui;
use egui::{Align2, Color32, FontId, Rect, Sense};

use crate::document::Document;
use crate::settings;

pub struct CanvasView {
    texture: Option<egui::TextureHandle>,
}

impl CanvasView {
    pub fn new() -> Self {
        Self { texture: None }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, document: &mut Document) {
        if document.take_changed() {
            self.texture = document.image().map(|image| {
                let size = [image.width() as usize, image.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
                ui.ctx()
                    .load_texture("document", color_image, egui::TextureOptions::LINEAR)
            });
        }

        let (rect, _response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let painter = ui.painter_at(rect);
        let [r, g, b] = settings::CANVAS_BACKDROP;
        painter.rect_filled(rect, 0.0, Color32::from_rgb(r, g, b));

        match &self.texture {
            Some(texture) => {
                let tex_size = texture.size_vec2();
                // Shrink to fit; never scale small images up.
                let scale = (rect.width() / tex_size.x)
                    .min(rect.height() / tex_size.y)
                    .min(1.0);
                let image_rect = Rect::from_center_size(rect.center(), tex_size * scale);
                painter.image(
                    texture.id(),
                    image_rect,
                    Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            None => {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    "Load an image to begin",
                    FontId::proportional(16.0),
                    Color32::from_gray(190),
                );
            }
        }
    }
}
