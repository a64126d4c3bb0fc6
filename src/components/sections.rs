//! Menu sections: gather numeric/toggle input for one command, then fire.
//!
//! Each input widget's update step *returns* its completion event instead
//! of raising a flag somewhere shared: a numeric field reports a value
//! exactly once per confirmed entry, a toggle button exactly once per
//! click. A section records all completions of the current tick into its
//! pending map before the ready flag is evaluated, and `take_ready` drains
//! both so nothing leaks into the next interaction cycle.

use eframe::egui;

use crate::command::{CommandKind, EditCommand, ParamMap};

/// A labelled numeric entry field. The value is committed when the user
/// confirms the entry with Enter.
pub struct NumericField {
    name: &'static str,
    buffer: String,
}

impl NumericField {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            buffer: String::new(),
        }
    }

    /// Draw the field; returns the committed value for this tick, if any.
    fn ui(&mut self, ui: &mut egui::Ui) -> Option<f64> {
        let mut committed = None;
        ui.horizontal(|ui| {
            ui.label(self.name);
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.buffer)
                    .desired_width(64.0)
                    .hint_text("0"),
            );
            let entered =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if entered {
                // Unparseable text stays in the field for the user to fix.
                if let Ok(value) = self.buffer.trim().parse::<f64>() {
                    committed = Some(value);
                }
            }
        });
        committed
    }
}

/// A push button used by toggle sections; reports one completion per click.
pub struct ToggleButton {
    label: &'static str,
}

impl ToggleButton {
    fn ui(&mut self, ui: &mut egui::Ui) -> bool {
        ui.add_sized([180.0, 26.0], egui::Button::new(self.label))
            .clicked()
    }
}

enum SectionInputs {
    Numeric(Vec<NumericField>),
    Toggle(ToggleButton),
}

/// A named group of inputs bound to one command kind.
pub struct Section {
    name: &'static str,
    kind: CommandKind,
    inputs: SectionInputs,
    pending: ParamMap,
    ready: bool,
}

impl Section {
    pub fn numeric(name: &'static str, kind: CommandKind, fields: Vec<NumericField>) -> Self {
        Self {
            name,
            kind,
            inputs: SectionInputs::Numeric(fields),
            pending: ParamMap::new(),
            ready: false,
        }
    }

    pub fn toggle(name: &'static str, kind: CommandKind, label: &'static str) -> Self {
        Self {
            name,
            kind,
            inputs: SectionInputs::Toggle(ToggleButton { label }),
            pending: ParamMap::new(),
            ready: false,
        }
    }

    /// Draw the section and fold this tick's completions into the pending
    /// map. All completions are recorded before ready is evaluated.
    fn ui(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new(self.name).strong());
        let mut completions: Vec<(&'static str, f64)> = Vec::new();
        let mut toggled = false;
        match &mut self.inputs {
            SectionInputs::Numeric(fields) => {
                for field in fields {
                    if let Some(value) = field.ui(ui) {
                        completions.push((field.name, value));
                    }
                }
            }
            SectionInputs::Toggle(button) => {
                toggled = button.ui(ui);
            }
        }
        for (name, value) in completions {
            self.record(name, value);
        }
        if toggled {
            self.ready = true;
        }
    }

    /// Record one completed numeric entry.
    fn record(&mut self, name: &str, value: f64) {
        self.pending.insert(name.to_string(), value);
        self.ready = true;
    }

    /// Drain the section if it is ready to fire. Both the ready flag and
    /// the pending map are cleared.
    fn take_ready(&mut self) -> Option<ParamMap> {
        if !self.ready {
            return None;
        }
        self.ready = false;
        Some(std::mem::take(&mut self.pending))
    }
}

/// A command menu: sections stacked in the side panel, each bound to its
/// command kind.
pub struct CommandMenu {
    title: &'static str,
    sections: Vec<Section>,
}

impl CommandMenu {
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    /// Draw all sections, then collect commands from the ones that are
    /// ready. A fresh command is built per firing; only numeric sections
    /// carry data.
    pub fn ui(&mut self, ui: &mut egui::Ui) -> Vec<EditCommand> {
        for section in &mut self.sections {
            section.ui(ui);
            ui.add_space(10.0);
        }

        let mut fired = Vec::new();
        for section in &mut self.sections {
            if let Some(params) = section.take_ready() {
                let mut command = EditCommand::new(section.kind);
                if section.kind.takes_params() {
                    command.assign_data(params);
                }
                fired.push(command);
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric_section() -> Section {
        Section::numeric(
            "Pixel size",
            CommandKind::Resize,
            vec![NumericField::new("x"), NumericField::new("y")],
        )
    }

    #[test]
    fn section_starts_not_ready() {
        let mut section = numeric_section();
        assert!(section.take_ready().is_none());
    }

    #[test]
    fn recorded_values_are_drained_together() {
        let mut section = numeric_section();
        section.record("x", 50.0);
        section.record("y", 75.0);

        let params = section.take_ready().expect("section should be ready");
        assert_eq!(params.get("x"), Some(&50.0));
        assert_eq!(params.get("y"), Some(&75.0));
    }

    #[test]
    fn drain_resets_ready_and_pending() {
        let mut section = numeric_section();
        section.record("x", 10.0);
        assert!(section.take_ready().is_some());

        // Nothing from the previous cycle leaks into the next one.
        assert!(section.take_ready().is_none());
        section.record("y", 20.0);
        let params = section.take_ready().expect("ready after new entry");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("y"), Some(&20.0));
    }

    #[test]
    fn repeated_entry_overwrites_pending_value() {
        let mut section = numeric_section();
        section.record("x", 10.0);
        section.record("x", 30.0);
        let params = section.take_ready().expect("ready");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("x"), Some(&30.0));
    }

    #[test]
    fn toggle_section_fires_with_empty_params() {
        let mut section = Section::toggle("Emboss", CommandKind::Emboss, "Emboss");
        section.ready = true;
        let params = section.take_ready().expect("ready");
        assert!(params.is_empty());
    }
}
