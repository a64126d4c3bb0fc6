//! Application controller: owns the document, routes UI events to menus,
//! executes the resulting commands and re-renders.

use eframe::egui;

use crate::canvas::CanvasView;
use crate::command::{CommandKind, EditCommand};
use crate::components::history::HistoryPanel;
use crate::components::sections::{CommandMenu, NumericField, Section};
use crate::document::Document;
use crate::error::EditError;
use crate::{io, log_err, log_info};

/// Which sidebar menu is open in the right-hand panel.
#[derive(Clone, Copy, PartialEq, Eq)]
enum MenuId {
    Resize,
    Filters,
    Color,
}

pub struct RetouchFEApp {
    document: Document,
    canvas: CanvasView,
    history_panel: HistoryPanel,

    resize_menu: CommandMenu,
    filters_menu: CommandMenu,
    color_menu: CommandMenu,
    current_menu: Option<MenuId>,

    /// Last user-visible message (errors and confirmations).
    status: Option<String>,
}

impl RetouchFEApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            document: Document::new(),
            canvas: CanvasView::new(),
            history_panel: HistoryPanel::default(),
            resize_menu: build_resize_menu(),
            filters_menu: build_filters_menu(),
            color_menu: build_color_menu(),
            current_menu: None,
            status: None,
        }
    }

    fn report(&mut self, error: EditError) {
        log_err!("{}", error);
        self.status = Some(error.to_string());
    }

    fn info(&mut self, message: String) {
        log_info!("{}", message);
        self.status = Some(message);
    }

    fn open_image(&mut self) {
        let Some(path) = io::pick_open_path() else {
            self.report(EditError::NoFileSelected);
            return;
        };
        match self.document.load(&path) {
            Ok(()) => self.info(format!("Loaded {}", path.display())),
            Err(e) => self.report(e),
        }
    }

    fn save_image(&mut self) {
        if !self.document.is_loaded() {
            self.report(EditError::NoImage);
            return;
        }
        let Some(path) = io::pick_save_path() else {
            self.report(EditError::NoFileSelected);
            return;
        };
        match self.document.save(&path) {
            Ok(()) => self.info(format!("Saved {}", path.display())),
            Err(e) => self.report(e),
        }
    }

    /// Execute every command fired by the menus this tick. Failures are
    /// reported and leave the document unchanged.
    fn run_commands(&mut self, commands: Vec<EditCommand>) {
        for command in commands {
            let label = command.kind.label();
            match self.document.execute(&command) {
                Ok(()) => self.info(format!("Applied {}", label)),
                Err(e) => self.report(e),
            }
        }
    }
}

impl eframe::App for RetouchFEApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keyboard shortcuts mirror the toolbar buttons.
        let (undo_pressed, redo_pressed) = ctx.input(|i| {
            (
                i.modifiers.ctrl && i.key_pressed(egui::Key::Z),
                i.modifiers.ctrl && i.key_pressed(egui::Key::Y),
            )
        });
        if undo_pressed {
            self.document.undo();
        }
        if redo_pressed {
            self.document.redo();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Load").clicked() {
                    self.open_image();
                }
                if ui.button("Save").clicked() {
                    self.save_image();
                }
                ui.separator();
                if ui
                    .add_enabled(self.document.can_undo(), egui::Button::new("Undo"))
                    .clicked()
                {
                    self.document.undo();
                }
                if ui
                    .add_enabled(self.document.can_redo(), egui::Button::new("Redo"))
                    .clicked()
                {
                    self.document.redo();
                }
            });
        });

        egui::SidePanel::left("menu_buttons")
            .exact_width(150.0)
            .resizable(false)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                for (id, label) in [
                    (MenuId::Resize, "Resize"),
                    (MenuId::Filters, "Filters"),
                    (MenuId::Color, "Color"),
                ] {
                    let selected = self.current_menu == Some(id);
                    if ui
                        .add_sized([130.0, 32.0], egui::SelectableLabel::new(selected, label))
                        .clicked()
                    {
                        self.current_menu = Some(id);
                    }
                    ui.add_space(4.0);
                }
            });

        let mut fired: Vec<EditCommand> = Vec::new();
        if let Some(id) = self.current_menu {
            egui::SidePanel::right("command_menu")
                .exact_width(230.0)
                .resizable(false)
                .show(ctx, |ui| {
                    let menu = match id {
                        MenuId::Resize => &mut self.resize_menu,
                        MenuId::Filters => &mut self.filters_menu,
                        MenuId::Color => &mut self.color_menu,
                    };
                    ui.add_space(6.0);
                    ui.heading(menu.title());
                    ui.separator();
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        fired = menu.ui(ui);
                    });
                    ui.separator();
                    self.history_panel.show(ui, &self.document);
                });
        }
        self.run_commands(fired);

        egui::TopBottomPanel::bottom("status_line").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match &self.status {
                    Some(message) => ui.label(message),
                    None => ui.weak("Ready"),
                };
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(path) = self.document.path() {
                        ui.weak(path.display().to_string());
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas.ui(ui, &mut self.document);
        });
    }
}

fn build_resize_menu() -> CommandMenu {
    let mut menu = CommandMenu::new("Resize");
    menu.push(Section::numeric(
        "Pixel size",
        CommandKind::Resize,
        vec![NumericField::new("x"), NumericField::new("y")],
    ));
    menu
}

fn build_filters_menu() -> CommandMenu {
    let mut menu = CommandMenu::new("Filters");
    menu.push(Section::toggle("Blur", CommandKind::Blur, "Simple Blur"));
    menu.push(Section::toggle(
        "Gaussian blur",
        CommandKind::GaussianBlur,
        "Gaussian Blur",
    ));
    menu.push(Section::toggle("Sharpen", CommandKind::Sharpen, "Sharpen"));
    menu.push(Section::toggle(
        "Edge enhance",
        CommandKind::EdgeEnhance,
        "Edge Enhance",
    ));
    menu.push(Section::toggle("Emboss", CommandKind::Emboss, "Emboss"));
    menu.push(Section::toggle("Contour", CommandKind::Contour, "Contour"));
    menu.push(Section::toggle("Detail", CommandKind::Detail, "Detail"));
    menu.push(Section::toggle("Smooth", CommandKind::Smooth, "Smooth"));
    menu
}

fn build_color_menu() -> CommandMenu {
    let mut menu = CommandMenu::new("Color");
    menu.push(Section::numeric(
        "Saturation",
        CommandKind::Saturation,
        vec![NumericField::new("level")],
    ));
    menu.push(Section::toggle(
        "Inversion of colors",
        CommandKind::Invert,
        "Invert",
    ));
    menu.push(Section::toggle(
        "Histogram equalization",
        CommandKind::Equalize,
        "Equalize",
    ));
    menu.push(Section::numeric(
        "Color balance",
        CommandKind::ColorBalance,
        vec![
            NumericField::new("r"),
            NumericField::new("g"),
            NumericField::new("b"),
        ],
    ));
    menu
}
