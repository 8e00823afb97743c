//! # repobundlelib
//!
//! Discovers the files of a repository and classifies each one as source
//! code, configuration, or omitted-with-reason, so documentation bundle
//! generators get a deterministic, complete file inventory.
//!
//! ## Overview
//!
//! The pipeline has two stages:
//!
//! - **Discovery**: an iterative walk from the root that prunes excluded
//!   directory and file names (`.git`, `node_modules`, `.DS_Store`, ...),
//!   never follows or reports symbolic links, and returns paths sorted in a
//!   numeric-aware, case-insensitive order.
//! - **Classification**: each file is checked for size, then for binary
//!   content, then by name. Classification runs with bounded concurrency and
//!   the result keeps discovery order.
//!
//! ## Features
//!
//! - **Deterministic output**: the same tree always yields the same report
//! - **Failure isolation**: one unreadable file becomes an `omit/READ_ERROR`
//!   entry instead of aborting the run
//! - **Injectable I/O**: discovery and content reading are traits with
//!   filesystem adapters, so both can be replaced
//! - **Pure Rust data types**: returns structured, serializable data and
//!   writes nothing
//!
//! ## Example
//!
//! ```rust
//! use repobundlelib::{scan_repository, Category, OmitReason, ScanOptions};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::create_dir(dir.path().join("src")).unwrap();
//! fs::write(dir.path().join("src/main.ts"), "export const x = 1;\n").unwrap();
//! fs::write(dir.path().join("package.json"), "{}\n").unwrap();
//! fs::write(dir.path().join("logo.bin"), [0u8, 1, 2, 3]).unwrap();
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let report = runtime
//!     .block_on(scan_repository(dir.path(), ScanOptions::new()))
//!     .unwrap();
//!
//! assert_eq!(report.files[0].relative_path, "logo.bin");
//! assert_eq!(report.files[0].decision.reason(), Some(OmitReason::LikelyBinary));
//! assert_eq!(report.files[1].decision.category(), Category::Config);
//! assert_eq!(report.files[2].decision.language_hint(), Some("ts"));
//! assert_eq!(report.summary.code, 1);
//! ```

pub mod binary;
pub mod classify;
pub mod concurrency;
pub mod error;
pub mod options;
pub mod path;
pub mod pipeline;
pub mod reader;
pub mod source;

pub use binary::{is_likely_binary, BinaryCheckOptions};
pub use classify::{
    classify_by_name, classify_by_name_with, classify_one, classify_one_with, language_hint,
    omit_reason_for, Category, ClassificationDecision, ClassifiedPath, OmitReason,
};
pub use concurrency::map_with_concurrency;
pub use error::{ReadError, RepobundleError};
pub use options::{
    ScanOptions, DEFAULT_CONCURRENCY, DEFAULT_HEAD_SAMPLE_BYTES, DEFAULT_MAX_BYTES,
};
pub use path::{compare_paths, normalize_path_str, relative_posix};
pub use pipeline::{scan_repository, Discoverer, FsDiscoverer, ScanPipeline, ScanReport, Summary};
pub use reader::{ContentReader, FileStat, FsContentReader, ReaderOptions};
pub use source::{
    discover, discover_with_report, DiscoveredEntry, DiscoveryOutcome, ExclusionSet,
    FilterConfig, SkippedDir,
};

/// Result type for repobundlelib operations
pub type Result<T> = std::result::Result<T, RepobundleError>;
