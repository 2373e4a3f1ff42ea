use thiserror::Error;

/// Broad classification of analysis failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller handed in something the pipeline cannot work with.
    InvalidArgument,
    /// Drawing or encoding an exported image failed.
    Render,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("sample count must be greater than zero")]
    InvalidSampleCount,
    #[error("sample rate must be a positive finite number, got {0}")]
    InvalidSampleRate(f64),
    #[error("spectrum analysis needs at least {min} samples, got {actual}")]
    TooFewSamples { min: usize, actual: usize },
    #[error("sample buffer is empty")]
    EmptyBuffer,
    #[error("sample {index} is not a finite number")]
    NonFiniteSample { index: usize },
    #[error("unrecognized window identifier: {0}")]
    UnknownWindow(String),
    #[error("full-scale reference must be a positive finite number, got {0}")]
    InvalidFullScale(f64),
    #[error("failed to render plot: {0}")]
    Plot(String),
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Plot(_) => ErrorKind::Render,
            _ => ErrorKind::InvalidArgument,
        }
    }
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for AnalysisError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        AnalysisError::Plot(format!("{value:?}"))
    }
}

impl From<image::ImageError> for AnalysisError {
    fn from(value: image::ImageError) -> Self {
        AnalysisError::Plot(value.to_string())
    }
}
