//! Source discovery: find files to classify.
//!
//! This module handles the first stage of the pipeline - discovering what
//! files exist under a repository root. It provides:
//!
//! - **Exclusion tables**: Directory/file names pruned during traversal
//! - **Directory walking**: Iterative, symlink-free traversal with a sorted result
//! - **File filtering**: Optional include/exclude glob patterns
//!
//! ## Example
//!
//! ```rust,ignore
//! use repobundlelib::source::{discover, ExclusionSet};
//!
//! let set = ExclusionSet::builtin();
//! let entries = discover("/path/to/repo", &set.dirs, &set.files)?;
//! ```

pub mod exclusion;
pub mod filter;
pub mod walker;

pub use exclusion::{
    is_excluded_dir, is_excluded_file, is_known_config_by_basename, is_under_known_config_dir,
    ExclusionSet,
};
pub use filter::FilterConfig;
pub use walker::{discover, discover_with_report, DiscoveredEntry, DiscoveryOutcome, SkippedDir};
