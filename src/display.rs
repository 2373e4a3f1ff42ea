//! Label/value rows for the readout table in the control panel.
use crate::analysis::ChannelReadout;
use crate::types::format_si;

const PARAMETER_LABELS: [&str; 9] = [
    "SNR", "SINAD", "THD", "SFDR", "ENOB", "Maxcode", "Mincode", "DCLev", "Flor",
];

#[derive(Clone, Debug, PartialEq)]
pub struct ReadoutRow {
    pub label: String,
    pub value: String,
}

impl ReadoutRow {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReadoutSection {
    pub title: String,
    pub rows: Vec<ReadoutRow>,
}

/// Channel 1, Parameters and Harmonics sections. Only the channel block is
/// filled in; the metric rows stay blank.
pub fn readout_sections(readout: Option<&ChannelReadout>) -> Vec<ReadoutSection> {
    vec![
        channel_section(readout),
        ReadoutSection {
            title: "Parameters".to_owned(),
            rows: PARAMETER_LABELS
                .iter()
                .map(|label| ReadoutRow::new(*label, ""))
                .collect(),
        },
        ReadoutSection {
            title: "Harmonics".to_owned(),
            rows: (2..10)
                .map(|i| format!("F{i}"))
                .chain(std::iter::once("Nyq".to_owned()))
                .map(|label| ReadoutRow::new(label, ""))
                .collect(),
        },
    ]
}

fn channel_section(readout: Option<&ChannelReadout>) -> ReadoutSection {
    let values = match readout {
        Some(r) => [
            format!("{}sps", format_si(r.sample_rate_hz)),
            format!("{}Hz", format_si(r.nominal_fundamental_hz)),
            format!("{:.3} Hz", r.bin_width_hz),
            format!("{:.3} Hz", r.fundamental_hz),
            format!("{:.2} dB", r.fundamental_db),
        ],
        None => Default::default(),
    };
    let labels = ["fs", "F1", "Bin Width", "F1 Frequency", "F1 Amplitude"];
    ReadoutSection {
        title: "Channel 1".to_owned(),
        rows: labels
            .into_iter()
            .zip(values)
            .map(|(label, value)| ReadoutRow::new(label, value))
            .collect(),
    }
}
