use std::f64::consts::SQRT_2;

use rustfft::{num_complex::Complex64, FftPlanner};

use crate::analysis::{AnalysisError, SampleBuffer, WindowKind};

/// Smallest ratio fed to `log10`; zero magnitudes are clamped here instead of
/// turning into `-inf` dB.
pub const MAGNITUDE_FLOOR: f64 = f64::MIN_POSITIVE;

/// Shortest block the analyzer accepts. A single sample has no spectrum to speak of.
pub const MIN_FFT_LEN: usize = 2;

/// One-sided magnitude spectrum, bins `0..=N/2`.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumBuffer {
    pub sample_rate_hz: f64,
    pub fft_len: usize,
    pub window: WindowKind,
    pub magnitudes: Vec<f64>,
}

impl SpectrumBuffer {
    pub fn bin_width_hz(&self) -> f64 {
        self.sample_rate_hz / self.fft_len as f64
    }

    /// Centre frequency of every bin, `k * fs / N`.
    pub fn frequencies_hz(&self) -> Vec<f64> {
        let width = self.bin_width_hz();
        (0..self.magnitudes.len()).map(|k| k as f64 * width).collect()
    }

    /// Index of the largest non-DC bin, if there is one.
    pub fn peak_bin(&self) -> Option<usize> {
        self.magnitudes
            .iter()
            .enumerate()
            .skip(1)
            .fold(None, |best: Option<(usize, f64)>, (k, &m)| match best {
                Some((_, top)) if top >= m => best,
                _ => Some((k, m)),
            })
            .map(|(k, _)| k)
    }
}

/// Spectrum expressed as `20·log10(magnitude·√2 / reference)`.
#[derive(Clone, Debug, PartialEq)]
pub struct DbSpectrum {
    pub reference: f64,
    pub values_db: Vec<f64>,
}

impl DbSpectrum {
    pub fn from_spectrum(spectrum: &SpectrumBuffer, reference: f64) -> Result<Self, AnalysisError> {
        if !reference.is_finite() || reference <= 0.0 {
            return Err(AnalysisError::InvalidFullScale(reference));
        }
        let values_db = spectrum
            .magnitudes
            .iter()
            .map(|&m| magnitude_to_db(m, reference))
            .collect();
        Ok(Self {
            reference,
            values_db,
        })
    }
}

/// RMS-referenced dB of a one-sided peak magnitude. Ratios below
/// [`MAGNITUDE_FLOOR`] are clamped to it before the logarithm.
pub fn magnitude_to_db(magnitude: f64, reference: f64) -> f64 {
    let ratio = (magnitude * SQRT_2 / reference).max(MAGNITUDE_FLOOR);
    20.0 * ratio.log10()
}

/// Windowed FFT front end. Holds a planner so repeated sizes reuse their plans.
pub struct SpectrumAnalyzer {
    planner: FftPlanner<f64>,
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Window, transform and fold a capture into its one-sided magnitude spectrum.
    ///
    /// Magnitudes are `|X[k]| / (N · a0)` where `a0` is the window's coherent gain,
    /// so a tone of peak amplitude A sitting on a bin reads A/2.
    pub fn analyze(
        &mut self,
        buffer: &SampleBuffer,
        window: WindowKind,
    ) -> Result<SpectrumBuffer, AnalysisError> {
        let n = buffer.len();
        if n == 0 {
            return Err(AnalysisError::EmptyBuffer);
        }
        if n < MIN_FFT_LEN {
            return Err(AnalysisError::TooFewSamples {
                min: MIN_FFT_LEN,
                actual: n,
            });
        }
        let fft = self.planner.plan_fft_forward(n);
        let coefficients = window.coefficients(n);
        let mut bins: Vec<Complex64> = buffer
            .samples()
            .iter()
            .zip(&coefficients)
            .map(|(&s, &w)| Complex64::new(s * w, 0.0))
            .collect();
        fft.process(&mut bins);
        let scale = 1.0 / (n as f64 * window.coherent_gain());
        let magnitudes = bins
            .iter()
            .take(n / 2 + 1)
            .map(|c| c.norm() * scale)
            .collect();
        log::debug!("analyzed {n} samples with {window} window");
        Ok(SpectrumBuffer {
            sample_rate_hz: buffer.sample_rate_hz(),
            fft_len: n,
            window,
            magnitudes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn on_bin_tone(n: usize, fs: f64, bin: usize, amplitude: f64) -> SampleBuffer {
        let f = bin as f64 * fs / n as f64;
        let samples = (0..n)
            .map(|i| amplitude * (2.0 * PI * f * i as f64 / fs).sin())
            .collect();
        SampleBuffer::new(samples, fs).unwrap()
    }

    #[test]
    fn one_sided_length() {
        let mut analyzer = SpectrumAnalyzer::new();
        for n in [2usize, 3, 8, 9, 1000, 1024] {
            let buffer = SampleBuffer::new(vec![0.5; n], 1.0e3).unwrap();
            let spectrum = analyzer.analyze(&buffer, WindowKind::Hann).unwrap();
            assert_eq!(spectrum.magnitudes.len(), n / 2 + 1);
            assert_eq!(spectrum.frequencies_hz().len(), n / 2 + 1);
        }
    }

    #[test]
    fn rectangular_on_bin_tone_reads_half_amplitude() {
        let n = 1024;
        let fs = 1.0e6;
        let buffer = on_bin_tone(n, fs, 1, 1.0);
        let spectrum = SpectrumAnalyzer::new()
            .analyze(&buffer, WindowKind::None)
            .unwrap();
        assert_eq!(spectrum.peak_bin(), Some(1));
        assert_relative_eq!(spectrum.magnitudes[1], 0.5, epsilon = 1e-12);
        for (k, &m) in spectrum.magnitudes.iter().enumerate() {
            if k != 1 {
                assert!(m < 1e-12, "bin {k} leaked {m}");
            }
        }
        let db = DbSpectrum::from_spectrum(&spectrum, 1.0).unwrap();
        assert_relative_eq!(db.values_db[1], 20.0 * (0.5 * SQRT_2).log10(), epsilon = 1e-9);
        assert_relative_eq!(db.values_db[1], -3.0103, epsilon = 1e-4);
    }

    #[test]
    fn every_window_is_calibrated_on_bin() {
        let mut analyzer = SpectrumAnalyzer::new();
        let buffer = on_bin_tone(4096, 1.0e6, 37, 1.0);
        for window in WindowKind::ALL {
            let spectrum = analyzer.analyze(&buffer, window).unwrap();
            assert_eq!(spectrum.peak_bin(), Some(37), "{window}");
            assert_relative_eq!(spectrum.magnitudes[37], 0.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn dc_reads_full_value() {
        let buffer = SampleBuffer::new(vec![0.25; 64], 100.0).unwrap();
        let spectrum = SpectrumAnalyzer::new()
            .analyze(&buffer, WindowKind::None)
            .unwrap();
        assert_relative_eq!(spectrum.magnitudes[0], 0.25, epsilon = 1e-15);
    }

    #[test]
    fn analysis_is_repeatable() {
        let buffer = on_bin_tone(2048, 48_000.0, 100, 0.7);
        let mut analyzer = SpectrumAnalyzer::new();
        let first = analyzer.analyze(&buffer, WindowKind::FlatTop).unwrap();
        let second = analyzer.analyze(&buffer, WindowKind::FlatTop).unwrap();
        let fresh = SpectrumAnalyzer::new()
            .analyze(&buffer, WindowKind::FlatTop)
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first, fresh);
    }

    #[test]
    fn single_sample_is_rejected() {
        let buffer = SampleBuffer::new(vec![1.0], 1.0).unwrap();
        let err = SpectrumAnalyzer::new()
            .analyze(&buffer, WindowKind::None)
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::TooFewSamples { min: 2, actual: 1 }
        ));
    }

    #[test]
    fn zero_magnitude_is_clamped_not_infinite() {
        let buffer = SampleBuffer::new(vec![0.0; 16], 16.0).unwrap();
        let spectrum = SpectrumAnalyzer::new()
            .analyze(&buffer, WindowKind::Hamming)
            .unwrap();
        let db = DbSpectrum::from_spectrum(&spectrum, 1.0).unwrap();
        let floor_db = 20.0 * MAGNITUDE_FLOOR.log10();
        assert!(db.values_db.iter().all(|v| v.is_finite()));
        assert!(db.values_db.iter().all(|&v| v == floor_db));
    }

    #[test]
    fn bad_reference_is_rejected() {
        let spectrum = SpectrumBuffer {
            sample_rate_hz: 1.0,
            fft_len: 2,
            window: WindowKind::None,
            magnitudes: vec![1.0, 0.0],
        };
        assert!(matches!(
            DbSpectrum::from_spectrum(&spectrum, 0.0),
            Err(AnalysisError::InvalidFullScale(_))
        ));
        assert!(DbSpectrum::from_spectrum(&spectrum, f64::NAN).is_err());
    }

    #[test]
    fn frequency_axis_spans_to_nyquist() {
        let buffer = SampleBuffer::new(vec![0.0; 1024], 1.0e6).unwrap();
        let spectrum = SpectrumAnalyzer::new()
            .analyze(&buffer, WindowKind::None)
            .unwrap();
        let freqs = spectrum.frequencies_hz();
        assert_eq!(freqs[0], 0.0);
        assert_relative_eq!(freqs[1], 976.5625, epsilon = 1e-9);
        assert_relative_eq!(*freqs.last().unwrap(), 500_000.0, epsilon = 1e-6);
    }
}
