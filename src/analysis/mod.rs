// src/analysis/mod.rs
pub mod buffer;
pub mod error;
pub mod fft;
pub mod pipeline;
pub mod plot;
pub mod synth;
pub mod window;

pub use buffer::SampleBuffer;
pub use error::AnalysisError;
pub use pipeline::{
    ChannelReadout, CollectionSettings, DbReference, SpectrumPipeline, SpectrumTrace,
};
pub use plot::{render_spectrum_png, PlotStyle};
pub use synth::{GaussianNoise, ToneSynthesizer};
pub use window::WindowKind;
