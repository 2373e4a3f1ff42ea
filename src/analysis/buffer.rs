use crate::analysis::AnalysisError;

/// Uniformly sampled real-valued time series for a single channel.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f64>,
    sample_rate_hz: f64,
}

impl SampleBuffer {
    /// Wraps owned samples. Rejects empty buffers, non-positive rates and NaN/inf samples.
    pub fn new(samples: Vec<f64>, sample_rate_hz: f64) -> Result<Self, AnalysisError> {
        validate_sample_rate(sample_rate_hz)?;
        if samples.is_empty() {
            return Err(AnalysisError::EmptyBuffer);
        }
        if let Some(index) = samples.iter().position(|v| !v.is_finite()) {
            return Err(AnalysisError::NonFiniteSample { index });
        }
        Ok(Self {
            samples,
            sample_rate_hz,
        })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

}

pub(crate) fn validate_sample_rate(sample_rate_hz: f64) -> Result<(), AnalysisError> {
    if sample_rate_hz.is_finite() && sample_rate_hz > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidSampleRate(sample_rate_hz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::error::ErrorKind;

    #[test]
    fn rejects_empty_and_bad_rate() {
        let err = SampleBuffer::new(Vec::new(), 1.0e6).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyBuffer));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = SampleBuffer::new(vec![0.0; 4], 0.0).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidSampleRate(_)));
        assert!(SampleBuffer::new(vec![0.0; 4], f64::NAN).is_err());
    }

    #[test]
    fn rejects_non_finite_samples() {
        let err = SampleBuffer::new(vec![0.0, f64::INFINITY, 1.0], 10.0).unwrap_err();
        assert!(matches!(err, AnalysisError::NonFiniteSample { index: 1 }));
    }

    #[test]
    fn keeps_samples_and_rate() {
        let buffer = SampleBuffer::new(vec![0.5; 1024], 1.0e6).unwrap();
        assert_eq!(buffer.len(), 1024);
        assert_eq!(buffer.sample_rate_hz(), 1.0e6);
        assert!(buffer.samples().iter().all(|&v| v == 0.5));
    }
}
