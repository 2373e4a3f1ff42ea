//! Window functions offered by the bench UI.
//!
//! Every window is a periodic (DFT-even) cosine sum
//!
//! `w[n] = a0 - a1 cos(2πn/N) + a2 cos(4πn/N) - a3 cos(6πn/N) + ...`
//!
//! For such windows the mean of the coefficients is exactly `a0` once N exceeds the
//! number of terms, so `a0` doubles as the coherent gain used to normalize the
//! magnitude spectrum. An on-bin tone of peak amplitude A therefore reads A/2 in
//! every window.
//!
//! | Code | Window               | a0 .. ak                                               |
//! |------|----------------------|--------------------------------------------------------|
//! | 0x00 | No Windowing         | 1                                                      |
//! | 0x10 | Hamming              | 0.54, 0.46                                             |
//! | 0x20 | Hann                 | 0.5, 0.5                                               |
//! | 0x30 | Blackman             | 0.42, 0.5, 0.08                                        |
//! | 0x40 | Exact Blackman       | 7938/18608, 9240/18608, 1430/18608                     |
//! | 0x50 | Blackman-Harris 70dB | 0.42323, 0.49755, 0.07922                              |
//! | 0x60 | Blackman-Harris 92dB | 0.35875, 0.48829, 0.14128, 0.01168                     |
//! | 0x70 | Flat Top             | 0.21557895, 0.41663158, 0.277263158, 0.083578947, 0.006947368 |
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisError;

const RECTANGULAR: &[f64] = &[1.0];
const HAMMING: &[f64] = &[0.54, 0.46];
const HANN: &[f64] = &[0.5, 0.5];
const BLACKMAN: &[f64] = &[0.42, 0.5, 0.08];
const EXACT_BLACKMAN: &[f64] = &[7938.0 / 18608.0, 9240.0 / 18608.0, 1430.0 / 18608.0];
const BLACKMAN_HARRIS_70: &[f64] = &[0.42323, 0.49755, 0.07922];
const BLACKMAN_HARRIS_92: &[f64] = &[0.35875, 0.48829, 0.14128, 0.01168];
const FLAT_TOP: &[f64] = &[
    0.21557895,
    0.41663158,
    0.277263158,
    0.083578947,
    0.006947368,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WindowKind {
    None,
    Hamming,
    Hann,
    Blackman,
    ExactBlackman,
    BlackmanHarris70,
    BlackmanHarris92,
    FlatTop,
}

impl Default for WindowKind {
    fn default() -> Self {
        WindowKind::BlackmanHarris92
    }
}

impl WindowKind {
    /// All windows in the order the window selector lists them.
    pub const ALL: [WindowKind; 8] = [
        WindowKind::None,
        WindowKind::Hamming,
        WindowKind::Hann,
        WindowKind::Blackman,
        WindowKind::ExactBlackman,
        WindowKind::BlackmanHarris70,
        WindowKind::BlackmanHarris92,
        WindowKind::FlatTop,
    ];

    /// Numeric window identifier (upper nibble encodes the window).
    pub fn code(self) -> u8 {
        match self {
            WindowKind::None => 0x00,
            WindowKind::Hamming => 0x10,
            WindowKind::Hann => 0x20,
            WindowKind::Blackman => 0x30,
            WindowKind::ExactBlackman => 0x40,
            WindowKind::BlackmanHarris70 => 0x50,
            WindowKind::BlackmanHarris92 => 0x60,
            WindowKind::FlatTop => 0x70,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, AnalysisError> {
        Self::ALL
            .into_iter()
            .find(|w| w.code() == code)
            .ok_or_else(|| AnalysisError::UnknownWindow(format!("{code:#04x}")))
    }

    pub fn label(self) -> &'static str {
        match self {
            WindowKind::None => "No Windowing",
            WindowKind::Hamming => "Hamming",
            WindowKind::Hann => "Hann",
            WindowKind::Blackman => "Blackman",
            WindowKind::ExactBlackman => "Exact Blackman",
            WindowKind::BlackmanHarris70 => "Blackman-Harris 70dB",
            WindowKind::BlackmanHarris92 => "Blackman-Harris 92dB",
            WindowKind::FlatTop => "Flat Top",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            WindowKind::None => "none",
            WindowKind::Hamming => "hamming",
            WindowKind::Hann => "hann",
            WindowKind::Blackman => "blackman",
            WindowKind::ExactBlackman => "exact-blackman",
            WindowKind::BlackmanHarris70 => "blackman-harris-70",
            WindowKind::BlackmanHarris92 => "blackman-harris-92",
            WindowKind::FlatTop => "flat-top",
        }
    }

    /// Cosine-sum coefficients `a0..ak`.
    pub fn cosine_terms(self) -> &'static [f64] {
        match self {
            WindowKind::None => RECTANGULAR,
            WindowKind::Hamming => HAMMING,
            WindowKind::Hann => HANN,
            WindowKind::Blackman => BLACKMAN,
            WindowKind::ExactBlackman => EXACT_BLACKMAN,
            WindowKind::BlackmanHarris70 => BLACKMAN_HARRIS_70,
            WindowKind::BlackmanHarris92 => BLACKMAN_HARRIS_92,
            WindowKind::FlatTop => FLAT_TOP,
        }
    }

    /// Fixed normalization constant: the window's coherent gain `a0`.
    pub fn coherent_gain(self) -> f64 {
        self.cosine_terms()[0]
    }

    /// Window coefficients for a block of `len` samples.
    pub fn coefficients(self, len: usize) -> Vec<f64> {
        let terms = self.cosine_terms();
        if terms.len() == 1 {
            return vec![terms[0]; len];
        }
        let n = len as f64;
        (0..len)
            .map(|i| {
                let x = 2.0 * PI * i as f64 / n;
                terms
                    .iter()
                    .enumerate()
                    .map(|(k, a)| {
                        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                        sign * a * (k as f64 * x).cos()
                    })
                    .sum()
            })
            .collect()
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WindowKind {
    type Err = AnalysisError;

    /// Accepts the slug, the display label (case-insensitive) or a hex/decimal code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(found) = Self::ALL.into_iter().find(|w| {
            w.slug().eq_ignore_ascii_case(trimmed) || w.label().eq_ignore_ascii_case(trimmed)
        }) {
            return Ok(found);
        }
        let code = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
            Some(hex) => u8::from_str_radix(hex, 16).ok(),
            None => trimmed.parse::<u8>().ok(),
        };
        match code {
            Some(code) => Self::from_code(code),
            None => Err(AnalysisError::UnknownWindow(trimmed.to_owned())),
        }
    }
}

impl TryFrom<String> for WindowKind {
    type Error = AnalysisError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WindowKind> for String {
    fn from(value: WindowKind) -> Self {
        value.slug().to_owned()
    }
}
