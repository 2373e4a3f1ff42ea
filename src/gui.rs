// src/gui.rs
use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Local;
use eframe::egui;
use egui::{Color32, RichText};
use egui_plot::{Line, Plot, PlotBounds, PlotPoints};

use crate::analysis::{
    render_spectrum_png, CollectionSettings, DbReference, GaussianNoise, PlotStyle,
    SpectrumPipeline, SpectrumTrace, ToneSynthesizer, WindowKind,
};
use crate::config::{AppConfig, SAMPLE_COUNTS};
use crate::display::readout_sections;
use crate::resize_dialog::{DialogAction, ResizeDialog};
use crate::status::StatusLog;
use crate::types::{AutoscaleAxis, PlotView};

const START_IDLE: Color32 = Color32::from_rgb(152, 251, 152);
const START_BUSY: Color32 = Color32::from_rgb(219, 112, 147);
const TRACE_COLOR: Color32 = Color32::from_rgb(0, 200, 255);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PlotMenuAction {
    Resize,
    Autoscale(AutoscaleAxis),
    Save,
}

/// Parses the Msps field into a sample rate in Hz.
pub fn sample_rate_from_msps(text: &str) -> anyhow::Result<f64> {
    let msps: f64 = text
        .trim()
        .parse()
        .with_context(|| format!("invalid Msps value {text:?}"))?;
    if !msps.is_finite() || msps <= 0.0 {
        bail!("Msps must be positive, got {msps}");
    }
    Ok(msps * 1.0e6)
}

pub struct SpectrumViewerApp {
    // 分析管线
    pipeline: SpectrumPipeline<GaussianNoise>,
    full_scale: f64,
    export_dir: PathBuf,
    panel_width: f32,

    // 控制面板
    msps_text: String,
    sample_count_index: usize,
    window: WindowKind,
    repeat: bool,
    adc_full_scale: bool,
    is_collecting: bool,
    captures: usize,

    // 画布
    trace: Option<SpectrumTrace>,
    view: PlotView,
    push_view: bool,
    resize_dialog: Option<ResizeDialog>,

    status: StatusLog,
}

impl SpectrumViewerApp {
    pub fn new(config: &AppConfig) -> Self {
        let noise = match config.noise_seed {
            Some(seed) => GaussianNoise::reference_seeded(seed),
            None => GaussianNoise::reference(),
        };
        let mut status = StatusLog::with_capacity(config.status_capacity);
        status.push("Ready.");
        Self {
            pipeline: SpectrumPipeline::new(ToneSynthesizer::default(), noise),
            full_scale: config.full_scale,
            export_dir: config.export_dir.clone(),
            panel_width: config.panel_width,
            msps_text: config.msps.clone(),
            sample_count_index: config.sample_count_index.min(SAMPLE_COUNTS.len() - 1),
            window: config.window,
            repeat: config.repeat,
            adc_full_scale: config.adc_full_scale,
            is_collecting: false,
            captures: 0,
            trace: None,
            view: config.plot_view(),
            push_view: true,
            resize_dialog: None,
            status,
        }
    }

    fn settings(&self) -> anyhow::Result<CollectionSettings> {
        let reference = if self.adc_full_scale {
            DbReference::FullScale(self.full_scale)
        } else {
            DbReference::Carrier
        };
        Ok(CollectionSettings {
            num_samples: SAMPLE_COUNTS[self.sample_count_index],
            sample_rate_hz: sample_rate_from_msps(&self.msps_text)?,
            window: self.window,
            reference,
        })
    }

    fn start_clicked(&mut self) {
        if self.is_collecting {
            self.stop();
            return;
        }
        self.status.push("Starting collection...");
        self.captures = 0;
        if !self.collect_once() {
            return;
        }
        if self.repeat {
            self.is_collecting = true;
        } else {
            self.status.push("Data collection completed.");
        }
    }

    fn stop(&mut self) {
        self.is_collecting = false;
        self.status.push(&format!(
            "Data collection completed ({} captures).",
            self.captures
        ));
    }

    fn collect_once(&mut self) -> bool {
        let result = self
            .settings()
            .and_then(|settings| self.pipeline.collect(&settings).map_err(anyhow::Error::from));
        match result {
            Ok(trace) => {
                self.trace = Some(trace);
                self.captures += 1;
                true
            }
            Err(err) => {
                log::warn!("collection failed: {err:#}");
                self.is_collecting = false;
                self.status.push(&format!("Collection failed: {err:#}"));
                false
            }
        }
    }

    fn autoscale(&mut self, axis: AutoscaleAxis) {
        if let Some(trace) = &self.trace {
            if self.view.autoscale(axis, trace) {
                self.push_view = true;
            }
        }
        self.status.push(axis.status_text());
    }

    fn finish_resize(&mut self, action: DialogAction) {
        let Some(dialog) = self.resize_dialog.take() else {
            return;
        };
        if action == DialogAction::Rejected {
            return;
        }
        let outcome = dialog.form.apply(&mut self.view);
        log::debug!("resize applied: {outcome:?}");
        self.push_view = true;
    }

    fn save_png(&mut self) -> anyhow::Result<PathBuf> {
        let Some(trace) = &self.trace else {
            bail!("nothing to save yet; press Start first");
        };
        let png = render_spectrum_png(trace, &self.view, &PlotStyle::default())?;
        let name = format!("spectrum_{}.png", Local::now().format("%Y%m%d_%H%M%S"));
        let path = self.export_dir.join(name);
        std::fs::write(&path, png).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// New view bounds are only pushed into the plot on the next frame.
    fn needs_repaint(&self) -> bool {
        self.is_collecting || self.push_view
    }

    fn handle_menu_action(&mut self, action: PlotMenuAction) {
        match action {
            PlotMenuAction::Resize => self.resize_dialog = Some(ResizeDialog::new(&self.view)),
            PlotMenuAction::Autoscale(axis) => self.autoscale(axis),
            PlotMenuAction::Save => match self.save_png() {
                Ok(path) => self.status.push(&format!("Saved {}", path.display())),
                Err(err) => self.status.push(&format!("Save failed: {err:#}")),
            },
        }
    }

    fn show_readout(&self, ui: &mut egui::Ui) {
        let readout = self.trace.as_ref().map(|t| &t.readout);
        for section in readout_sections(readout) {
            ui.label(
                RichText::new(section.title)
                    .color(Color32::WHITE)
                    .background_color(Color32::GRAY),
            );
            egui::Grid::new(format!("readout_{}", section.rows[0].label))
                .num_columns(2)
                .spacing([12.0, 1.0])
                .striped(true)
                .show(ui, |ui| {
                    for row in section.rows {
                        ui.label(RichText::new(row.label).small());
                        ui.label(RichText::new(row.value).small().monospace());
                        ui.end_row();
                    }
                });
        }
    }

    fn show_control_panel(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.label("Set Label");
        self.show_readout(ui);
        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Msps:");
            ui.add(egui::TextEdit::singleline(&mut self.msps_text).desired_width(50.0));
            ui.label("Size:");
            egui::ComboBox::from_id_source("sample_count")
                .selected_text(SAMPLE_COUNTS[self.sample_count_index].to_string())
                .show_ui(ui, |ui| {
                    for (i, count) in SAMPLE_COUNTS.iter().enumerate() {
                        ui.selectable_value(&mut self.sample_count_index, i, count.to_string());
                    }
                });
        });
        ui.horizontal(|ui| {
            ui.label("Window:");
            egui::ComboBox::from_id_source("window_kind")
                .selected_text(self.window.label())
                .width(170.0)
                .show_ui(ui, |ui| {
                    for window in WindowKind::ALL {
                        ui.selectable_value(&mut self.window, window, window.label());
                    }
                });
        });
        ui.checkbox(&mut self.repeat, "Repeat");
        ui.checkbox(&mut self.adc_full_scale, "ADC Full Scale");

        ui.add_space(8.0);
        ui.label("Status Messages");
        egui::ScrollArea::both()
            .max_height(180.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for entry in self.status.entries() {
                    ui.label(RichText::new(entry).small().monospace());
                }
            });

        ui.add_space(8.0);
        let (text, fill) = if self.is_collecting {
            ("Stop", START_BUSY)
        } else {
            ("Start", START_IDLE)
        };
        let button = egui::Button::new(RichText::new(text).color(Color32::BLACK))
            .fill(fill)
            .min_size(egui::vec2(ui.available_width(), 28.0));
        if ui.add(button).clicked() {
            self.start_clicked();
        }
    }

    fn show_plot(&mut self, ui: &mut egui::Ui) {
        let x_axis = self.view.x;
        let y_axis = self.view.y;
        let points = self.trace.as_ref().map(|t| self.view.project(t));
        let (min, max) = self.view.plot_bounds();
        let push_view = std::mem::take(&mut self.push_view);

        let response = Plot::new("spectrum_plot")
            .x_axis_label("Frequency, Hz")
            .y_axis_label("Amplitude, dB")
            .x_axis_formatter(move |v, _max_chars, _range| x_axis.tick_label(v))
            .y_axis_formatter(move |v, _max_chars, _range| y_axis.tick_label(v))
            .label_formatter(move |_name, p| {
                format!(
                    "{} Hz\n{:.2} dB",
                    x_axis.tick_label(p.x),
                    y_axis.from_plot(p.y)
                )
            })
            .show(ui, |plot_ui| {
                if push_view {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(min, max));
                }
                if let Some(points) = points {
                    plot_ui.line(
                        Line::new(PlotPoints::new(points))
                            .name("Channel 1")
                            .color(TRACE_COLOR),
                    );
                }
                plot_ui.plot_bounds()
            });

        if !push_view {
            let bounds = response.inner;
            self.view.sync_from_plot(bounds.min(), bounds.max());
        }

        let mut action = None;
        response.response.context_menu(|ui| {
            if ui.button("Resize").clicked() {
                action = Some(PlotMenuAction::Resize);
                ui.close_menu();
            }
            ui.menu_button("Autoscale", |ui| {
                for (label, axis) in [
                    ("Axis X", AutoscaleAxis::X),
                    ("Axis Y", AutoscaleAxis::Y),
                    ("Both", AutoscaleAxis::Both),
                ] {
                    if ui.button(label).clicked() {
                        action = Some(PlotMenuAction::Autoscale(axis));
                        ui.close_menu();
                    }
                }
            });
            if ui.button("Save to File").clicked() {
                action = Some(PlotMenuAction::Save);
                ui.close_menu();
            }
        });
        if let Some(action) = action {
            self.handle_menu_action(action);
        }
    }
}

impl eframe::App for SpectrumViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.is_collecting {
            if self.repeat {
                self.collect_once();
            } else {
                self.stop();
            }
        }

        egui::SidePanel::left("control_panel")
            .exact_width(self.panel_width)
            .resizable(false)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.show_control_panel(ui));
            });

        egui::CentralPanel::default().show(ctx, |ui| self.show_plot(ui));

        if let Some(dialog) = self.resize_dialog.as_mut() {
            if let Some(action) = dialog.show(ctx) {
                self.finish_resize(action);
            }
        }

        if self.needs_repaint() {
            ctx.request_repaint();
        }
    }
}
