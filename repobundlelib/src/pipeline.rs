//! Discovery → classification orchestration.
//!
//! [`ScanPipeline`] composes the walker, the content reader and the
//! classifier. Both I/O ports are injected, so tests (or a future
//! Git-index discoverer) can swap them without touching classification.
//!
//! Failure isolation:
//! - A structurally invalid root aborts the scan.
//! - An unopenable directory is skipped and listed in [`ScanReport::skipped`].
//! - A file whose `stat`/read fails is reported as omitted; the rest of the
//!   batch is unaffected.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::binary::is_likely_binary;
use crate::classify::{classify_one_with, omit_reason_for, Category, ClassifiedPath, OmitReason};
use crate::concurrency::map_with_concurrency;
use crate::options::ScanOptions;
use crate::reader::{ContentReader, FsContentReader, ReaderOptions};
use crate::source::{discover_with_report, DiscoveryOutcome, ExclusionSet, SkippedDir};
use crate::Result;

/// Service responsible for turning a root into a sorted list of files.
pub trait Discoverer: Send + Sync + std::fmt::Debug {
    /// Discover files under `root`, pruning names from `exclusions`.
    fn discover(&self, root: &Path, exclusions: &ExclusionSet) -> Result<DiscoveryOutcome>;
}

/// Filesystem traversal via [`discover_with_report`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDiscoverer;

impl Discoverer for FsDiscoverer {
    fn discover(&self, root: &Path, exclusions: &ExclusionSet) -> Result<DiscoveryOutcome> {
        discover_with_report(root, &exclusions.dirs, &exclusions.files)
    }
}

/// Per-category totals for a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub code: usize,
    pub config: usize,
    pub omit: usize,
    /// Omitted files broken down by reason
    pub omitted_by_reason: BTreeMap<OmitReason, usize>,
}

impl Summary {
    /// Tally a list of classified paths.
    pub fn from_files(files: &[ClassifiedPath]) -> Self {
        let mut summary = Summary::default();
        for file in files {
            summary.add(file);
        }
        summary
    }

    fn add(&mut self, file: &ClassifiedPath) {
        self.total += 1;
        match file.decision.category() {
            Category::Code => self.code += 1,
            Category::Config => self.config += 1,
            Category::Omit => {
                self.omit += 1;
                if let Some(reason) = file.decision.reason() {
                    *self.omitted_by_reason.entry(reason).or_default() += 1;
                }
            }
        }
    }

    /// Count for one category.
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Code => self.code,
            Category::Config => self.config,
            Category::Omit => self.omit,
        }
    }
}

/// Result of scanning a repository.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Absolute root that was scanned
    pub root: PathBuf,
    /// One entry per discovered file, in discovery order
    pub files: Vec<ClassifiedPath>,
    /// Totals
    pub summary: Summary,
    /// Directories that could not be opened
    pub skipped: Vec<SkippedDir>,
    /// Names left out because they are not valid UTF-8 (lossy display form)
    pub invalid_names: Vec<String>,
}

impl ScanReport {
    /// Files in one category, in report order.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &ClassifiedPath> {
        self.files
            .iter()
            .filter(move |f| f.decision.category() == category)
    }
}

/// Discovery and classification with injectable ports.
#[derive(Debug, Clone)]
pub struct ScanPipeline {
    discoverer: Arc<dyn Discoverer>,
    reader: Arc<dyn ContentReader>,
    options: ScanOptions,
}

impl ScanPipeline {
    /// Pipeline over the real filesystem.
    pub fn new(options: ScanOptions) -> Self {
        Self {
            discoverer: Arc::new(FsDiscoverer),
            reader: Arc::new(FsContentReader),
            options,
        }
    }

    /// Replace the discovery port.
    pub fn with_discoverer(mut self, discoverer: Arc<dyn Discoverer>) -> Self {
        self.discoverer = discoverer;
        self
    }

    /// Replace the content reader port.
    pub fn with_reader(mut self, reader: Arc<dyn ContentReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Discover and classify every file under `root`.
    ///
    /// # Errors
    ///
    /// Invalid options, a symlinked or non-directory root, and a panicking
    /// discovery task. Individual file failures never surface here.
    pub async fn run(&self, root: impl AsRef<Path>) -> Result<ScanReport> {
        self.options.validate()?;
        let root = std::path::absolute(root.as_ref())?;

        let outcome = self.discover(&root).await?;
        for dir in &outcome.skipped {
            tracing::debug!(path = %dir.relative_path, reason = %dir.reason, "skipped unreadable directory");
        }
        for name in &outcome.invalid_names {
            tracing::debug!(path = %name, "skipped name that is not valid UTF-8");
        }

        let entries = self.options.filter.apply(outcome.entries);
        tracing::trace!(count = entries.len(), "discovery complete");

        let reader_options = ReaderOptions::new(&root).max_bytes(self.options.max_bytes);
        let reader = self.reader.as_ref();
        let binary = self.options.binary;
        let head_sample_bytes = self.options.head_sample_bytes;
        let tables = &self.options.exclusions;
        let reader_options = &reader_options;

        let files = map_with_concurrency(&entries, self.options.concurrency, |entry, _| {
            let path = entry.relative_path.clone();
            async move {
                let check = |sample: &[u8]| is_likely_binary(sample, &binary);
                let classified =
                    classify_one_with(&path, reader, reader_options, head_sample_bytes, check, tables);
                match classified.await {
                    Ok(classified) => classified,
                    Err(err) => {
                        tracing::debug!(path = %path, error = %err, "classification failed");
                        ClassifiedPath::omitted(path, omit_reason_for(&err))
                    }
                }
            }
        })
        .await;

        let summary = Summary::from_files(&files);
        tracing::trace!(?summary, "classification complete");

        Ok(ScanReport {
            root,
            files,
            summary,
            skipped: outcome.skipped,
            invalid_names: outcome.invalid_names,
        })
    }

    async fn discover(&self, root: &Path) -> Result<DiscoveryOutcome> {
        let discoverer = Arc::clone(&self.discoverer);
        let exclusions = self.options.exclusions.clone();
        let root = root.to_path_buf();

        tokio::task::spawn_blocking(move || discoverer.discover(&root, &exclusions)).await?
    }
}

/// Scan `root` on the real filesystem with the given options.
pub async fn scan_repository(root: impl AsRef<Path>, options: ScanOptions) -> Result<ScanReport> {
    ScanPipeline::new(options).run(root).await
}
