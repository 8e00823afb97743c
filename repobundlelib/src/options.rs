//! Tunables for discovery and classification.
//!
//! This module contains the configuration types that control what the
//! pipeline scans and how strictly it classifies.

use serde::{Deserialize, Serialize};

use crate::binary::BinaryCheckOptions;
use crate::error::RepobundleError;
use crate::source::{ExclusionSet, FilterConfig};
use crate::Result;

/// Files larger than this many bytes are omitted without being read.
pub const DEFAULT_MAX_BYTES: u64 = 204_800;

/// Bytes sampled from the start of a file for the binary check.
pub const DEFAULT_HEAD_SAMPLE_BYTES: usize = 4096;

/// Classifications allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Options for a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanOptions {
    /// Size limit for classification
    pub max_bytes: u64,
    /// Length of the sample passed to the binary heuristic
    pub head_sample_bytes: usize,
    /// Upper bound on concurrent classifications
    pub concurrency: usize,
    /// Binary heuristic tuning
    pub binary: BinaryCheckOptions,
    /// Glob filter applied after discovery
    pub filter: FilterConfig,
    /// Names pruned during discovery (`dirs`, `files`) and the config
    /// tables used by the naming check
    #[serde(skip)]
    pub exclusions: ExclusionSet,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            head_sample_bytes: DEFAULT_HEAD_SAMPLE_BYTES,
            concurrency: DEFAULT_CONCURRENCY,
            binary: BinaryCheckOptions::default(),
            filter: FilterConfig::default(),
            exclusions: ExclusionSet::default(),
        }
    }
}

impl ScanOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the size limit.
    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Set the binary sample length.
    pub fn head_sample_bytes(mut self, bytes: usize) -> Self {
        self.head_sample_bytes = bytes;
        self
    }

    /// Set the concurrency bound. Values below 1 run sequentially.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the binary heuristic options.
    pub fn binary(mut self, binary: BinaryCheckOptions) -> Self {
        self.binary = binary;
        self
    }

    /// Set the glob filter.
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Set the exclusion tables.
    pub fn exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.head_sample_bytes == 0 {
            return Err(RepobundleError::InvalidOption(
                "head sample size must be at least 1 byte".to_string(),
            ));
        }
        let threshold = self.binary.non_printable_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(RepobundleError::InvalidOption(format!(
                "non-printable threshold must be between 0 and 1, got {threshold}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ScanOptions::new();
        assert_eq!(options.max_bytes, 204_800);
        assert_eq!(options.head_sample_bytes, 4096);
        assert_eq!(options.concurrency, 8);
        assert!(options.binary.treat_nul_as_binary);
        assert_eq!(options.binary.non_printable_threshold, 0.3);
        assert!(options.filter.is_empty());
        assert_eq!(&options.exclusions, ExclusionSet::builtin());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let options = ScanOptions::new()
            .max_bytes(10)
            .head_sample_bytes(16)
            .concurrency(1);
        assert_eq!(options.max_bytes, 10);
        assert_eq!(options.head_sample_bytes, 16);
        assert_eq!(options.concurrency, 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ScanOptions::new().head_sample_bytes(0).validate().is_err());

        let binary = BinaryCheckOptions {
            non_printable_threshold: 1.5,
            ..Default::default()
        };
        let err = ScanOptions::new().binary(binary).validate().unwrap_err();
        assert!(matches!(err, RepobundleError::InvalidOption(_)));

        let binary = BinaryCheckOptions {
            non_printable_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(ScanOptions::new().binary(binary).validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let options: ScanOptions =
            serde_json::from_str(r#"{"maxBytes":1024,"concurrency":2}"#).unwrap();
        assert_eq!(options.max_bytes, 1024);
        assert_eq!(options.concurrency, 2);
        assert_eq!(options.head_sample_bytes, DEFAULT_HEAD_SAMPLE_BYTES);
    }
}
