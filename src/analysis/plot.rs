use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::*;

use crate::analysis::error::AnalysisError;
use crate::analysis::pipeline::SpectrumTrace;
use crate::types::PlotView;

#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub foreground: RGBColor,
    pub trace: RGBColor,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
            background: RGBColor(10, 10, 15),
            foreground: WHITE,
            trace: RGBColor(0, 200, 255),
        }
    }
}

/// Renders the trace as seen through `view` (limits and scales) into PNG bytes.
pub fn render_spectrum_png(
    trace: &SpectrumTrace,
    view: &PlotView,
    style: &PlotStyle,
) -> Result<Vec<u8>, AnalysisError> {
    if trace.values_db.is_empty() {
        return Err(AnalysisError::Plot("spectrum has no bins".into()));
    }
    let (min, max) = view.plot_bounds();
    let points: Vec<(f64, f64)> = view
        .project(trace)
        .into_iter()
        .filter(|p| p[0] >= min[0] && p[0] <= max[0])
        .map(|p| (p[0], p[1].clamp(min[1], max[1])))
        .collect();
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let text = ("sans-serif", 16).into_font().color(&style.foreground);
        let mut chart = ChartBuilder::on(&root)
            .margin(12)
            .caption(
                format!("FFT Magnitude ({}, N = {})", trace.window, trace.num_samples),
                ("sans-serif", 20).into_font().color(&style.foreground),
            )
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 45)
            .build_cartesian_2d(min[0]..max[0], min[1]..max[1])?;
        chart
            .configure_mesh()
            .light_line_style(&style.foreground.mix(0.1))
            .bold_line_style(&style.foreground.mix(0.25))
            .axis_style(&style.foreground.mix(0.6))
            .x_desc("Frequency, Hz")
            .y_desc("Amplitude, dB")
            .x_label_formatter(&|v| view.x.tick_label(*v))
            .y_label_formatter(&|v| view.y.tick_label(*v))
            .label_style(text.clone())
            .axis_desc_style(text)
            .draw()?;
        let color = style.trace;
        chart
            .draw_series(LineSeries::new(points, &color))?
            .label("Channel 1")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        chart
            .configure_series_labels()
            .label_font(("sans-serif", 14).into_font().color(&style.foreground))
            .border_style(&style.foreground.mix(0.2))
            .background_style(&style.background)
            .draw()?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}

fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, AnalysisError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| AnalysisError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::error::ErrorKind;
    use crate::analysis::synth::Silence;
    use crate::analysis::{
        CollectionSettings, DbReference, SpectrumPipeline, ToneSynthesizer, WindowKind,
    };

    #[test]
    fn renders_png_for_default_view() {
        let mut pipeline = SpectrumPipeline::new(ToneSynthesizer::default(), Silence);
        let trace = pipeline
            .collect(&CollectionSettings {
                num_samples: 4096,
                sample_rate_hz: 1.0e6,
                window: WindowKind::Hann,
                reference: DbReference::FullScale(1.0),
            })
            .unwrap();
        let style = PlotStyle {
            width: 320,
            height: 200,
            ..PlotStyle::default()
        };
        let png = render_spectrum_png(&trace, &PlotView::default(), &style).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn empty_trace_is_a_render_error() {
        let mut pipeline = SpectrumPipeline::new(ToneSynthesizer::default(), Silence);
        let mut trace = pipeline
            .collect(&CollectionSettings {
                num_samples: 16,
                sample_rate_hz: 1.0e3,
                window: WindowKind::None,
                reference: DbReference::FullScale(1.0),
            })
            .unwrap();
        trace.values_db.clear();
        let err = render_spectrum_png(&trace, &PlotView::default(), &PlotStyle::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Render);
    }
}
