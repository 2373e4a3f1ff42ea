//! Synthetic ADC capture: a single tone plus white Gaussian noise.
//!
//! The tone parameters mirror the reference bench setup (1 kHz, unit amplitude,
//! 1 mV RMS noise) and are deliberately not exposed through the UI.
use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::analysis::buffer::validate_sample_rate;
use crate::analysis::{AnalysisError, SampleBuffer};

/// Fundamental frequency of the synthesized tone (Hz).
pub const FUNDAMENTAL_HZ: f64 = 1.0e3;
/// Peak amplitude of the synthesized tone.
pub const TONE_AMPLITUDE: f64 = 1.0;
pub const NOISE_MEAN: f64 = 0.0;
pub const NOISE_STD_DEV: f64 = 0.001;

/// Anything that yields one additive noise value per sample.
pub trait NoiseSource {
    fn next_sample(&mut self) -> f64;
}

/// I.i.d. Gaussian noise drawn from an injectable RNG.
pub struct GaussianNoise<R: Rng = StdRng> {
    rng: R,
    mean: f64,
    std_dev: f64,
}

impl GaussianNoise<StdRng> {
    /// Reference noise (mean 0, sigma 0.001) seeded from the OS.
    pub fn reference() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            mean: NOISE_MEAN,
            std_dev: NOISE_STD_DEV,
        }
    }

    /// Reference noise with a fixed seed, for reproducible captures.
    pub fn reference_seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            mean: NOISE_MEAN,
            std_dev: NOISE_STD_DEV,
        }
    }
}

impl<R: Rng> NoiseSource for GaussianNoise<R> {
    fn next_sample(&mut self) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        self.mean + self.std_dev * z
    }
}

/// Noise source that contributes nothing; used for clean reference tones.
#[cfg(test)]
#[derive(Clone, Copy, Debug, Default)]
pub struct Silence;

#[cfg(test)]
impl NoiseSource for Silence {
    fn next_sample(&mut self) -> f64 {
        0.0
    }
}

/// Generates `amplitude * sin(2π f0 t) + noise(t)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneSynthesizer {
    fundamental_hz: f64,
    amplitude: f64,
}

impl Default for ToneSynthesizer {
    fn default() -> Self {
        Self {
            fundamental_hz: FUNDAMENTAL_HZ,
            amplitude: TONE_AMPLITUDE,
        }
    }
}

impl ToneSynthesizer {
    #[cfg(test)]
    pub fn new(fundamental_hz: f64, amplitude: f64) -> Self {
        Self {
            fundamental_hz,
            amplitude,
        }
    }

    pub fn fundamental_hz(&self) -> f64 {
        self.fundamental_hz
    }

    /// Produces `num_samples` values on the inclusive time axis `0..=num_samples/fs`.
    ///
    /// The axis has `num_samples` points including both end points, so the actual
    /// spacing is `(N / fs) / (N - 1)`. A one-sample capture is taken at t = 0.
    pub fn synthesize<N: NoiseSource + ?Sized>(
        &self,
        num_samples: usize,
        sample_rate_hz: f64,
        noise: &mut N,
    ) -> Result<SampleBuffer, AnalysisError> {
        if num_samples == 0 {
            return Err(AnalysisError::InvalidSampleCount);
        }
        validate_sample_rate(sample_rate_hz)?;
        let step = time_step(num_samples, sample_rate_hz);
        let omega = 2.0 * PI * self.fundamental_hz;
        let samples = (0..num_samples)
            .map(|i| {
                let t = i as f64 * step;
                self.amplitude * (omega * t).sin() + noise.next_sample()
            })
            .collect();
        SampleBuffer::new(samples, sample_rate_hz)
    }
}

fn time_step(num_samples: usize, sample_rate_hz: f64) -> f64 {
    if num_samples > 1 {
        (num_samples as f64 / sample_rate_hz) / (num_samples - 1) as f64
    } else {
        0.0
    }
}
