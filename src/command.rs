//! Editing commands: a closed set of filter kinds plus collected parameters.
//!
//! Every operation the editor can perform is one `CommandKind` variant
//! dispatched through `EditCommand::execute`. Parameterized kinds receive
//! their values via `assign_data` before execution; executing one without
//! assigned data is an error, never a silent default.

use std::collections::HashMap;

use image::RgbaImage;

use crate::error::EditError;
use crate::ops::{adjustments, filters, transform};

/// Parameter values collected by a menu section, keyed by field name.
pub type ParamMap = HashMap<String, f64>;

/// The closed set of editing operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    Resize,
    Blur,
    GaussianBlur,
    Sharpen,
    EdgeEnhance,
    Emboss,
    Contour,
    Detail,
    Smooth,
    Saturation,
    Invert,
    Equalize,
    ColorBalance,
}

impl CommandKind {
    pub fn all() -> &'static [CommandKind] {
        &[
            CommandKind::Resize,
            CommandKind::Blur,
            CommandKind::GaussianBlur,
            CommandKind::Sharpen,
            CommandKind::EdgeEnhance,
            CommandKind::Emboss,
            CommandKind::Contour,
            CommandKind::Detail,
            CommandKind::Smooth,
            CommandKind::Saturation,
            CommandKind::Invert,
            CommandKind::Equalize,
            CommandKind::ColorBalance,
        ]
    }

    /// True for kinds that carry numeric parameters from a menu section.
    pub fn takes_params(&self) -> bool {
        matches!(
            self,
            CommandKind::Resize | CommandKind::Saturation | CommandKind::ColorBalance
        )
    }

    /// Display name for menus, history readouts and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            CommandKind::Resize => "Resize",
            CommandKind::Blur => "Simple Blur",
            CommandKind::GaussianBlur => "Gaussian Blur",
            CommandKind::Sharpen => "Sharpen",
            CommandKind::EdgeEnhance => "Edge Enhance",
            CommandKind::Emboss => "Emboss",
            CommandKind::Contour => "Contour",
            CommandKind::Detail => "Detail",
            CommandKind::Smooth => "Smooth",
            CommandKind::Saturation => "Saturation",
            CommandKind::Invert => "Invert Colors",
            CommandKind::Equalize => "Histogram Equalization",
            CommandKind::ColorBalance => "Color Balance",
        }
    }

    /// CLI spelling of the operation (`--apply` specs).
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Resize => "resize",
            CommandKind::Blur => "blur",
            CommandKind::GaussianBlur => "gaussian-blur",
            CommandKind::Sharpen => "sharpen",
            CommandKind::EdgeEnhance => "edge-enhance",
            CommandKind::Emboss => "emboss",
            CommandKind::Contour => "contour",
            CommandKind::Detail => "detail",
            CommandKind::Smooth => "smooth",
            CommandKind::Saturation => "saturation",
            CommandKind::Invert => "invert",
            CommandKind::Equalize => "equalize",
            CommandKind::ColorBalance => "color-balance",
        }
    }
}

/// One parameterized, dispatch-ready editing operation. A fresh instance is
/// built per invocation with freshly collected parameters.
pub struct EditCommand {
    pub kind: CommandKind,
    params: Option<ParamMap>,
    /// Whether a successful execution is recorded into history.
    pub save_needed: bool,
}

impl EditCommand {
    pub fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            params: None,
            save_needed: true,
        }
    }

    /// A command whose result is shown but not committed to history.
    pub fn transient(kind: CommandKind) -> Self {
        Self {
            save_needed: false,
            ..Self::new(kind)
        }
    }

    /// Install the collected parameter values for this invocation.
    pub fn assign_data(&mut self, data: ParamMap) {
        self.params = Some(data);
    }

    fn param(&self, key: &str) -> Option<f64> {
        self.params.as_ref().and_then(|m| m.get(key).copied())
    }

    fn require_assigned(&self) -> Result<(), EditError> {
        if self.params.is_none() {
            return Err(EditError::InvalidParameter(format!(
                "{} requires parameters but none were assigned",
                self.kind.label()
            )));
        }
        Ok(())
    }

    /// Apply the operation, producing a new image. The source is never
    /// mutated, so a failure leaves the caller's state intact.
    pub fn execute(&self, image: &RgbaImage) -> Result<RgbaImage, EditError> {
        match self.kind {
            CommandKind::Resize => {
                self.require_assigned()?;
                let x = self.param("x");
                let y = self.param("y");
                if x.is_none() && y.is_none() {
                    return Err(EditError::InvalidParameter(
                        "resize needs a target width (x) or height (y)".into(),
                    ));
                }
                for (name, value) in [("x", x), ("y", y)] {
                    if let Some(v) = value {
                        if v < 1.0 {
                            return Err(EditError::InvalidParameter(format!(
                                "resize {} must be at least 1, got {}",
                                name, v
                            )));
                        }
                    }
                }
                let new_w = x.map_or(image.width(), |v| v as u32);
                let new_h = y.map_or(image.height(), |v| v as u32);
                Ok(transform::resize_box(image, new_w, new_h))
            }
            CommandKind::Blur => Ok(filters::blur(image)),
            CommandKind::GaussianBlur => Ok(filters::gaussian_blur(image)),
            CommandKind::Sharpen => Ok(filters::sharpen(image)),
            CommandKind::EdgeEnhance => Ok(filters::edge_enhance(image)),
            CommandKind::Emboss => Ok(filters::emboss(image)),
            CommandKind::Contour => Ok(filters::contour(image)),
            CommandKind::Detail => Ok(filters::detail(image)),
            CommandKind::Smooth => Ok(filters::smooth(image)),
            CommandKind::Saturation => {
                self.require_assigned()?;
                let level = self.param("level").ok_or_else(|| {
                    EditError::InvalidParameter("saturation needs a level value".into())
                })?;
                if level < 0.0 {
                    return Err(EditError::InvalidParameter(format!(
                        "saturation level must not be negative, got {}",
                        level
                    )));
                }
                Ok(adjustments::saturation(image, level as f32))
            }
            CommandKind::Invert => Ok(adjustments::invert(image)),
            CommandKind::Equalize => Ok(adjustments::equalize(image)),
            CommandKind::ColorBalance => {
                self.require_assigned()?;
                let r = self.param("r");
                let g = self.param("g");
                let b = self.param("b");
                if r.is_none() && g.is_none() && b.is_none() {
                    return Err(EditError::InvalidParameter(
                        "color balance needs at least one channel factor (r, g, b)".into(),
                    ));
                }
                for (name, value) in [("r", r), ("g", g), ("b", b)] {
                    if let Some(v) = value {
                        if v < 0.0 {
                            return Err(EditError::InvalidParameter(format!(
                                "color balance {} must not be negative, got {}",
                                name, v
                            )));
                        }
                    }
                }
                Ok(adjustments::color_balance(
                    image,
                    r.map(|v| v as f32),
                    g.map(|v| v as f32),
                    b.map(|v| v as f32),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([120, 40, 220, 255]))
    }

    fn params(pairs: &[(&str, f64)]) -> ParamMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn numeric_command_without_data_fails() {
        let img = sample(4, 4);
        for kind in [
            CommandKind::Resize,
            CommandKind::Saturation,
            CommandKind::ColorBalance,
        ] {
            let cmd = EditCommand::new(kind);
            assert!(matches!(
                cmd.execute(&img),
                Err(EditError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn resize_with_only_x_keeps_height() {
        let img = sample(100, 200);
        let mut cmd = EditCommand::new(CommandKind::Resize);
        cmd.assign_data(params(&[("x", 50.0)]));
        let out = cmd.execute(&img).unwrap();
        assert_eq!(out.dimensions(), (50, 200));
    }

    #[test]
    fn resize_with_only_y_keeps_width() {
        let img = sample(100, 200);
        let mut cmd = EditCommand::new(CommandKind::Resize);
        cmd.assign_data(params(&[("y", 50.0)]));
        let out = cmd.execute(&img).unwrap();
        assert_eq!(out.dimensions(), (100, 50));
    }

    #[test]
    fn resize_with_no_axis_fails() {
        let img = sample(10, 10);
        let mut cmd = EditCommand::new(CommandKind::Resize);
        cmd.assign_data(ParamMap::new());
        assert!(matches!(
            cmd.execute(&img),
            Err(EditError::InvalidParameter(_))
        ));
    }

    #[test]
    fn resize_rejects_zero_target() {
        let img = sample(10, 10);
        let mut cmd = EditCommand::new(CommandKind::Resize);
        cmd.assign_data(params(&[("x", 0.0)]));
        assert!(matches!(
            cmd.execute(&img),
            Err(EditError::InvalidParameter(_))
        ));
    }

    #[test]
    fn saturation_rejects_negative_level() {
        let img = sample(4, 4);
        let mut cmd = EditCommand::new(CommandKind::Saturation);
        cmd.assign_data(params(&[("level", -0.5)]));
        assert!(matches!(
            cmd.execute(&img),
            Err(EditError::InvalidParameter(_))
        ));
    }

    #[test]
    fn color_balance_needs_a_channel() {
        let img = sample(4, 4);
        let mut cmd = EditCommand::new(CommandKind::ColorBalance);
        cmd.assign_data(ParamMap::new());
        assert!(matches!(
            cmd.execute(&img),
            Err(EditError::InvalidParameter(_))
        ));
    }

    #[test]
    fn parameterless_kinds_execute_directly() {
        let img = sample(6, 6);
        for kind in CommandKind::all() {
            if kind.takes_params() {
                continue;
            }
            let cmd = EditCommand::new(*kind);
            let out = cmd.execute(&img).unwrap();
            assert_eq!(out.dimensions(), img.dimensions());
        }
    }

    #[test]
    fn cli_names_are_unique() {
        let mut names: Vec<&str> = CommandKind::all().iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), CommandKind::all().len());
    }
}
