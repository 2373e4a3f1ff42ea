// src/types.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::SpectrumTrace;

/// Fraction of the data span added on each side by autoscale.
pub const AUTOSCALE_MARGIN: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    Linear,
    Log,
}

#[derive(Debug, Error, PartialEq)]
pub enum ViewError {
    #[error("axis limits must be finite numbers")]
    NotFinite,
    #[error("axis limits must differ")]
    EmptyRange,
    #[error("log axis limits must be positive, got {min}..{max}")]
    NonPositiveOnLog { min: f64, max: f64 },
}

/// Visible range of one axis, stored in data units (Hz or dB).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub scale: AxisScale,
}

impl AxisRange {
    pub fn new(min: f64, max: f64, scale: AxisScale) -> Result<Self, ViewError> {
        let mut range = Self {
            min: 0.0,
            max: 1.0,
            scale,
        };
        range.set_limits(min, max)?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<(), ViewError> {
        Self::new(self.min, self.max, self.scale).map(|_| ())
    }

    /// Data value → plot coordinate. `None` when a log axis cannot show the value.
    pub fn to_plot(&self, value: f64) -> Option<f64> {
        match self.scale {
            AxisScale::Linear if value.is_finite() => Some(value),
            AxisScale::Log if value.is_finite() && value > 0.0 => Some(value.log10()),
            _ => None,
        }
    }

    pub fn from_plot(&self, coord: f64) -> f64 {
        match self.scale {
            AxisScale::Linear => coord,
            AxisScale::Log => 10f64.powf(coord),
        }
    }

    /// Visible range in plot coordinates.
    pub fn plot_span(&self) -> (f64, f64) {
        match self.scale {
            AxisScale::Linear => (self.min, self.max),
            AxisScale::Log => (self.min.log10(), self.max.log10()),
        }
    }

    /// Sets new limits; reversed limits are swapped. Invalid limits leave the range untouched.
    pub fn set_limits(&mut self, a: f64, b: f64) -> Result<(), ViewError> {
        if !a.is_finite() || !b.is_finite() {
            return Err(ViewError::NotFinite);
        }
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        if min == max {
            return Err(ViewError::EmptyRange);
        }
        if self.scale == AxisScale::Log && min <= 0.0 {
            return Err(ViewError::NonPositiveOnLog { min, max });
        }
        self.min = min;
        self.max = max;
        Ok(())
    }

    /// Switches scale. A range that a log axis cannot show keeps its upper limit
    /// and gets a lower limit five decades below (or 1..10 if nothing is positive).
    pub fn set_scale(&mut self, scale: AxisScale) {
        self.scale = scale;
        if scale == AxisScale::Log && self.min <= 0.0 {
            if self.max > 0.0 {
                self.min = self.max * 1e-5;
            } else {
                self.min = 1.0;
                self.max = 10.0;
            }
        }
    }

    /// Restores limits from plot coordinates reported by the canvas.
    pub fn sync_from_plot(&mut self, lo: f64, hi: f64) {
        let (a, b) = (self.from_plot(lo), self.from_plot(hi));
        // Degenerate canvas states (zero size, first frame) are ignored.
        let _ = self.set_limits(a, b);
    }

    /// Fits the range to `values` plus [`AUTOSCALE_MARGIN`] on each side,
    /// measured in plot coordinates. Returns false when nothing is plottable.
    pub fn autoscale(&mut self, values: impl IntoIterator<Item = f64>) -> bool {
        let bounds = values
            .into_iter()
            .filter_map(|v| self.to_plot(v))
            .fold(None, |acc: Option<(f64, f64)>, p| match acc {
                None => Some((p, p)),
                Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
            });
        let Some((lo, hi)) = bounds else {
            return false;
        };
        let span = hi - lo;
        let (lo, hi) = if span > 0.0 {
            (lo - span * AUTOSCALE_MARGIN, hi + span * AUTOSCALE_MARGIN)
        } else {
            let pad = if lo == 0.0 { 1.0 } else { lo.abs() * AUTOSCALE_MARGIN };
            (lo - pad, hi + pad)
        };
        self.set_limits(self.from_plot(lo), self.from_plot(hi)).is_ok()
    }

    /// Tick text for a plot coordinate on this axis.
    pub fn tick_label(&self, coord: f64) -> String {
        format_si(self.from_plot(coord))
    }
}

/// Compact engineering notation: 1500 → "1.5k", 1e6 → "1M", -160 → "-160".
pub fn format_si(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs();
    let (scaled, suffix) = if magnitude >= 1.0e9 {
        (value / 1.0e9, "G")
    } else if magnitude >= 1.0e6 {
        (value / 1.0e6, "M")
    } else if magnitude >= 1.0e3 {
        (value / 1.0e3, "k")
    } else {
        (value, "")
    };
    let text = format!("{scaled:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    let text = if text == "-0" { "0" } else { text };
    format!("{text}{suffix}")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoscaleAxis {
    X,
    Y,
    Both,
}

impl AutoscaleAxis {
    pub fn status_text(self) -> &'static str {
        match self {
            AutoscaleAxis::X => "Autoscale X",
            AutoscaleAxis::Y => "Autoscale Y",
            AutoscaleAxis::Both => "Autoscale both",
        }
    }
}

/// Axis state of the spectrum canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotView {
    pub x: AxisRange,
    pub y: AxisRange,
}

impl Default for PlotView {
    fn default() -> Self {
        Self {
            x: AxisRange {
                min: 1.0,
                max: 100_000.0,
                scale: AxisScale::Log,
            },
            y: AxisRange {
                min: -160.0,
                max: 20.0,
                scale: AxisScale::Linear,
            },
        }
    }
}

impl PlotView {
    /// `[x_min, y_min], [x_max, y_max]` in plot coordinates.
    pub fn plot_bounds(&self) -> ([f64; 2], [f64; 2]) {
        let (x0, x1) = self.x.plot_span();
        let (y0, y1) = self.y.plot_span();
        ([x0, y0], [x1, y1])
    }

    pub fn sync_from_plot(&mut self, min: [f64; 2], max: [f64; 2]) {
        self.x.sync_from_plot(min[0], max[0]);
        self.y.sync_from_plot(min[1], max[1]);
    }

    pub fn autoscale(&mut self, axis: AutoscaleAxis, trace: &SpectrumTrace) -> bool {
        let mut changed = false;
        if matches!(axis, AutoscaleAxis::X | AutoscaleAxis::Both) {
            changed |= self.x.autoscale(trace.frequencies_hz.iter().copied());
        }
        if matches!(axis, AutoscaleAxis::Y | AutoscaleAxis::Both) {
            changed |= self.y.autoscale(trace.values_db.iter().copied());
        }
        changed
    }

    /// Trace points in plot coordinates; points a log axis cannot show are dropped.
    pub fn project(&self, trace: &SpectrumTrace) -> Vec<[f64; 2]> {
        trace
            .points()
            .filter_map(|(f, db)| Some([self.x.to_plot(f)?, self.y.to_plot(db)?]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ChannelReadout, WindowKind};
    use approx::assert_relative_eq;

    fn trace() -> SpectrumTrace {
        SpectrumTrace {
            frequencies_hz: vec![0.0, 100.0, 200.0, 300.0, 400.0],
            values_db: vec![-120.0, -3.0, -100.0, -90.0, -110.0],
            window: WindowKind::None,
            num_samples: 8,
            readout: ChannelReadout {
                sample_rate_hz: 800.0,
                nominal_fundamental_hz: 100.0,
                bin_width_hz: 100.0,
                fundamental_hz: 100.0,
                fundamental_db: -3.0,
            },
        }
    }

    #[test]
    fn default_view_matches_bench_layout() {
        let view = PlotView::default();
        let (min, max) = view.plot_bounds();
        assert_eq!(min, [0.0, -160.0]);
        assert_relative_eq!(max[0], 5.0);
        assert_eq!(max[1], 20.0);
    }

    #[test]
    fn log_axis_rejects_non_positive_limits() {
        let mut x = PlotView::default().x;
        assert_eq!(
            x.set_limits(0.0, 10.0),
            Err(ViewError::NonPositiveOnLog { min: 0.0, max: 10.0 })
        );
        assert_eq!((x.min, x.max), (1.0, 100_000.0));
        assert_eq!(x.set_limits(5.0, 5.0), Err(ViewError::EmptyRange));
        assert!(x.set_limits(50.0, 10.0).is_ok());
        assert_eq!((x.min, x.max), (10.0, 50.0));
    }

    #[test]
    fn switching_to_log_repairs_range() {
        let mut y = PlotView::default().y;
        y.set_scale(AxisScale::Log);
        assert_relative_eq!(y.min, 2.0e-4, epsilon = 1e-12);
        assert_eq!(y.max, 20.0);
        let mut y = AxisRange::new(-160.0, -10.0, AxisScale::Linear).unwrap();
        y.set_scale(AxisScale::Log);
        assert_eq!((y.min, y.max), (1.0, 10.0));
        let mut x = AxisRange::new(0.0, 1000.0, AxisScale::Linear).unwrap();
        x.set_scale(AxisScale::Log);
        assert_relative_eq!(x.min, 0.01, epsilon = 1e-12);
        assert_eq!(x.max, 1000.0);
    }

    #[test]
    fn autoscale_log_x_ignores_dc() {
        let mut view = PlotView::default();
        assert!(view.autoscale(AutoscaleAxis::X, &trace()));
        let (lo, hi) = view.x.plot_span();
        let span = 400f64.log10() - 2.0;
        assert_relative_eq!(lo, 2.0 - span * AUTOSCALE_MARGIN, epsilon = 1e-12);
        assert_relative_eq!(hi, 400f64.log10() + span * AUTOSCALE_MARGIN, epsilon = 1e-12);
        assert_eq!(view.y, PlotView::default().y);
    }

    #[test]
    fn autoscale_linear_y_adds_margin() {
        let mut view = PlotView::default();
        assert!(view.autoscale(AutoscaleAxis::Y, &trace()));
        assert_relative_eq!(view.y.min, -120.0 - 117.0 * 0.05);
        assert_relative_eq!(view.y.max, -3.0 + 117.0 * 0.05);
    }

    #[test]
    fn autoscale_without_plottable_values_keeps_range() {
        let mut view = PlotView::default();
        view.y.set_scale(AxisScale::Log);
        let before = view;
        assert!(!view.autoscale(AutoscaleAxis::Y, &trace()));
        assert_eq!(view, before);
    }

    #[test]
    fn projection_drops_dc_on_log_axis() {
        let view = PlotView::default();
        let points = view.project(&trace());
        assert_eq!(points.len(), 4);
        assert_relative_eq!(points[0][0], 2.0);
        assert_eq!(points[0][1], -3.0);
    }

    #[test]
    fn sync_round_trips_plot_coordinates() {
        let mut view = PlotView::default();
        view.sync_from_plot([1.0, -100.0], [4.0, 0.0]);
        assert_relative_eq!(view.x.min, 10.0, epsilon = 1e-9);
        assert_relative_eq!(view.x.max, 10_000.0, epsilon = 1e-6);
        assert_eq!((view.y.min, view.y.max), (-100.0, 0.0));
    }

    #[test]
    fn si_labels() {
        assert_eq!(format_si(1000.0), "1k");
        assert_eq!(format_si(1500.0), "1.5k");
        assert_eq!(format_si(1.0e6), "1M");
        assert_eq!(format_si(-160.0), "-160");
        assert_eq!(format_si(0.5), "0.5");
        assert_eq!(format_si(0.0), "0");
    }
}
