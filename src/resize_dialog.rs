// src/resize_dialog.rs
use eframe::egui;

use crate::types::{AxisScale, PlotView};

/// Text-field contents of the Resize dialog.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeForm {
    pub left: String,
    pub right: String,
    pub top: String,
    pub bottom: String,
    pub log_x: bool,
    pub log_y: bool,
}

/// Which parts of a submitted form made it into the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeOutcome {
    pub x_applied: bool,
    pub y_applied: bool,
}

impl ResizeForm {
    pub fn from_view(view: &PlotView) -> Self {
        Self {
            left: view.x.min.to_string(),
            right: view.x.max.to_string(),
            top: view.y.max.to_string(),
            bottom: view.y.min.to_string(),
            log_x: view.x.scale == AxisScale::Log,
            log_y: view.y.scale == AxisScale::Log,
        }
    }

    /// Applies scales first, then limits. Each axis takes its limits only when
    /// both fields parse and suit the new scale; otherwise they are left alone.
    pub fn apply(&self, view: &mut PlotView) -> ResizeOutcome {
        view.x.set_scale(scale_of(self.log_x));
        view.y.set_scale(scale_of(self.log_y));
        let x_applied = parse_pair(&self.left, &self.right)
            .map(|(l, r)| view.x.set_limits(l, r).is_ok())
            .unwrap_or(false);
        let y_applied = parse_pair(&self.bottom, &self.top)
            .map(|(b, t)| view.y.set_limits(b, t).is_ok())
            .unwrap_or(false);
        ResizeOutcome {
            x_applied,
            y_applied,
        }
    }
}

fn scale_of(log: bool) -> AxisScale {
    if log {
        AxisScale::Log
    } else {
        AxisScale::Linear
    }
}

fn parse_pair(a: &str, b: &str) -> Option<(f64, f64)> {
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogAction {
    Accepted,
    Rejected,
}

pub struct ResizeDialog {
    pub form: ResizeForm,
}

impl ResizeDialog {
    pub fn new(view: &PlotView) -> Self {
        Self {
            form: ResizeForm::from_view(view),
        }
    }

    /// Draws the dialog; returns the button the user pressed, if any.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<DialogAction> {
        let mut action = None;
        let mut open = true;
        egui::Window::new("Resize")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_pos([100.0, 100.0])
            .default_width(400.0)
            .show(ctx, |ui| {
                ui.label("Axis X");
                egui::Grid::new("resize_axis_x")
                    .num_columns(4)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Left");
                        ui.text_edit_singleline(&mut self.form.left);
                        ui.label("Right");
                        ui.text_edit_singleline(&mut self.form.right);
                        ui.end_row();
                        ui.label("");
                        ui.checkbox(&mut self.form.log_x, "Log");
                        ui.end_row();
                    });
                ui.separator();
                ui.label("Axis Y");
                egui::Grid::new("resize_axis_y")
                    .num_columns(4)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Bottom");
                        ui.text_edit_singleline(&mut self.form.bottom);
                        ui.label("Top");
                        ui.text_edit_singleline(&mut self.form.top);
                        ui.end_row();
                        ui.label("");
                        ui.checkbox(&mut self.form.log_y, "Log");
                        ui.end_row();
                    });
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        action = Some(DialogAction::Accepted);
                    }
                    if ui.button("Cancel").clicked() {
                        action = Some(DialogAction::Rejected);
                    }
                });
            });
        if !open {
            action = Some(DialogAction::Rejected);
        }
        action
    }
}
