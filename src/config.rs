use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::analysis::WindowKind;
use crate::types::{AxisRange, PlotView};

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "ADC_FFT_VIEWER_CONFIG";

/// Capture sizes offered by the Size selector.
pub const SAMPLE_COUNTS: [usize; 8] = [1024, 2048, 4096, 8192, 16384, 32768, 65536, 131072];

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub window_size: [f32; 2],
    pub panel_width: f32,
    /// Initial text of the Msps field.
    pub msps: String,
    /// Index into [`SAMPLE_COUNTS`].
    pub sample_count_index: usize,
    pub window: WindowKind,
    pub repeat: bool,
    pub adc_full_scale: bool,
    /// Full-scale amplitude used for dBFS.
    pub full_scale: f64,
    pub x_axis: AxisRange,
    pub y_axis: AxisRange,
    /// Fixed noise seed; `None` seeds from the OS.
    pub noise_seed: Option<u64>,
    pub export_dir: PathBuf,
    pub status_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let view = PlotView::default();
        Self {
            window_size: [1200.0, 800.0],
            panel_width: 260.0,
            msps: "1".to_owned(),
            sample_count_index: 6,
            window: WindowKind::BlackmanHarris92,
            repeat: true,
            adc_full_scale: true,
            full_scale: 1.0,
            x_axis: view.x,
            y_axis: view.y,
            noise_seed: None,
            export_dir: PathBuf::from("."),
            status_capacity: 500,
        }
    }
}

impl AppConfig {
    /// Reads the file named by [`CONFIG_ENV`], falling back to defaults on any problem.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::from_file(Path::new(&path)) {
            Ok(config) => {
                log::info!("loaded config from {}", Path::new(&path).display());
                config
            }
            Err(err) => {
                log::warn!("ignoring config: {err:#}");
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_count_index >= SAMPLE_COUNTS.len() {
            bail!(
                "sample_count_index {} out of range (0..{})",
                self.sample_count_index,
                SAMPLE_COUNTS.len()
            );
        }
        if !self.full_scale.is_finite() || self.full_scale <= 0.0 {
            bail!("full_scale must be positive, got {}", self.full_scale);
        }
        self.x_axis.validate().context("x_axis")?;
        self.y_axis.validate().context("y_axis")?;
        Ok(())
    }

    pub fn plot_view(&self) -> PlotView {
        PlotView {
            x: self.x_axis,
            y: self.y_axis,
        }
    }
}
