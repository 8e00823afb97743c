//! Binary content heuristic.

use serde::{Deserialize, Serialize};

/// Default fraction of non-text bytes above which a sample is binary.
pub const DEFAULT_NON_PRINTABLE_THRESHOLD: f64 = 0.3;

/// Tuning for [`is_likely_binary`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BinaryCheckOptions {
    /// Any NUL byte marks the sample as binary
    pub treat_nul_as_binary: bool,
    /// Fraction of non-text bytes that must be exceeded
    pub non_printable_threshold: f64,
}

impl Default for BinaryCheckOptions {
    fn default() -> Self {
        Self {
            treat_nul_as_binary: true,
            non_printable_threshold: DEFAULT_NON_PRINTABLE_THRESHOLD,
        }
    }
}

/// Estimate whether a byte sample comes from a non-text file.
///
/// An empty sample is never binary. With `treat_nul_as_binary`, the first
/// NUL byte decides immediately. Otherwise the sample is binary when the
/// share of bytes outside printable ASCII (`0x20..=0x7E`) and outside
/// tab/LF/CR strictly exceeds `non_printable_threshold`.
pub fn is_likely_binary(sample: &[u8], options: &BinaryCheckOptions) -> bool {
    if sample.is_empty() {
        return false;
    }

    if options.treat_nul_as_binary && sample.contains(&0) {
        return true;
    }

    let non_text = sample.iter().filter(|&&b| !is_text_byte(b)).count();
    (non_text as f64 / sample.len() as f64) > options.non_printable_threshold
}

fn is_text_byte(b: u8) -> bool {
    matches!(b, 0x20..=0x7e | b'\t' | b'\n' | b'\r')
}
