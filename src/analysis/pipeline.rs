use std::f64::consts::SQRT_2;

use crate::analysis::fft::{DbSpectrum, SpectrumAnalyzer, SpectrumBuffer, MAGNITUDE_FLOOR};
use crate::analysis::synth::{NoiseSource, ToneSynthesizer};
use crate::analysis::{AnalysisError, WindowKind};

/// What the dB axis is measured against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DbReference {
    /// dBFS: relative to the ADC full-scale amplitude.
    FullScale(f64),
    /// dBc: relative to the fundamental, so the carrier sits at 0 dB.
    Carrier,
}

/// One request from the control panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollectionSettings {
    pub num_samples: usize,
    pub sample_rate_hz: f64,
    pub window: WindowKind,
    pub reference: DbReference,
}

/// Channel summary shown next to the plot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelReadout {
    pub sample_rate_hz: f64,
    pub nominal_fundamental_hz: f64,
    pub bin_width_hz: f64,
    pub fundamental_hz: f64,
    pub fundamental_db: f64,
}

/// Ready-to-plot result of one collection.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumTrace {
    pub frequencies_hz: Vec<f64>,
    pub values_db: Vec<f64>,
    pub window: WindowKind,
    pub num_samples: usize,
    pub readout: ChannelReadout,
}

impl SpectrumTrace {
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies_hz
            .iter()
            .copied()
            .zip(self.values_db.iter().copied())
    }
}

/// Synthesizer → analyzer → dB conversion, run synchronously per call.
pub struct SpectrumPipeline<N: NoiseSource> {
    synth: ToneSynthesizer,
    analyzer: SpectrumAnalyzer,
    noise: N,
}

impl<N: NoiseSource> SpectrumPipeline<N> {
    pub fn new(synth: ToneSynthesizer, noise: N) -> Self {
        Self {
            synth,
            analyzer: SpectrumAnalyzer::new(),
            noise,
        }
    }

    pub fn collect(
        &mut self,
        settings: &CollectionSettings,
    ) -> Result<SpectrumTrace, AnalysisError> {
        let buffer = self.synth.synthesize(
            settings.num_samples,
            settings.sample_rate_hz,
            &mut self.noise,
        )?;
        let spectrum = self.analyzer.analyze(&buffer, settings.window)?;
        let reference = match settings.reference {
            DbReference::FullScale(full_scale) => full_scale,
            DbReference::Carrier => carrier_reference(&spectrum),
        };
        let db = DbSpectrum::from_spectrum(&spectrum, reference)?;
        let readout = self.readout(&spectrum, &db);
        log::info!(
            "collected {} samples at {:.3} Msps ({}), F1 {:.1} Hz @ {:.2} dB",
            settings.num_samples,
            settings.sample_rate_hz / 1.0e6,
            settings.window,
            readout.fundamental_hz,
            readout.fundamental_db
        );
        Ok(SpectrumTrace {
            frequencies_hz: spectrum.frequencies_hz(),
            values_db: db.values_db,
            window: settings.window,
            num_samples: settings.num_samples,
            readout,
        })
    }

    fn readout(&self, spectrum: &SpectrumBuffer, db: &DbSpectrum) -> ChannelReadout {
        let peak = spectrum.peak_bin().unwrap_or(0);
        ChannelReadout {
            sample_rate_hz: spectrum.sample_rate_hz,
            nominal_fundamental_hz: self.synth.fundamental_hz(),
            bin_width_hz: spectrum.bin_width_hz(),
            fundamental_hz: peak as f64 * spectrum.bin_width_hz(),
            fundamental_db: db.values_db[peak],
        }
    }
}

fn carrier_reference(spectrum: &SpectrumBuffer) -> f64 {
    let peak = spectrum
        .peak_bin()
        .map(|k| spectrum.magnitudes[k])
        .unwrap_or(0.0);
    (peak * SQRT_2).max(MAGNITUDE_FLOOR)
}
