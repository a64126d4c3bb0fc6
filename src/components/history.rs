//! History panel — cursor position and memory usage readout.

use eframe::egui;

use crate::document::Document;

#[derive(Default)]
pub struct HistoryPanel {
    show_memory_info: bool,
}

impl HistoryPanel {
    pub fn show(&mut self, ui: &mut egui::Ui, document: &Document) {
        if !document.is_loaded() {
            ui.weak("No image loaded");
            return;
        }

        ui.horizontal(|ui| {
            ui.label(format!(
                "State {} of {}",
                document.cursor() + 1,
                document.history_len()
            ));
            if ui
                .small_button("ℹ")
                .on_hover_text("Show memory info")
                .clicked()
            {
                self.show_memory_info = !self.show_memory_info;
            }
        });
        ui.label(format!(
            "Undo: {} | Redo: {}",
            document.cursor(),
            document.history_len() - document.cursor() - 1
        ));

        if self.show_memory_info {
            let mem_mb = document.history_memory_bytes() as f64 / (1024.0 * 1024.0);
            ui.label(format!("Memory: {:.2} MB", mem_mb));
        }
    }
}
