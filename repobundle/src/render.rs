//! Output rendering for scan reports: plain table, JSON and the Markdown
//! inventory written by `--out`.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use repobundlelib::{Category, ClassifiedPath, ScanReport};

/// Name of the inventory file written into the output directory.
pub const MARKDOWN_FILE_NAME: &str = "FILES.md";

const CATEGORIES: [Category; 3] = [Category::Code, Category::Config, Category::Omit];
const CELL_WIDTH: usize = 10;

/// Truncate a name to fit within max_len, adding ".." prefix if needed
fn truncate_name(name: &str, max_len: usize) -> String {
    let count = name.chars().count();
    if count > max_len {
        let keep = max_len.saturating_sub(2);
        let tail: String = name.chars().skip(count - keep).collect();
        format!("..{tail}")
    } else {
        name.to_string()
    }
}

/// The detail column for one file: language hint or omit reason.
fn detail(file: &ClassifiedPath) -> &str {
    match file.decision.reason() {
        Some(reason) => reason.as_str(),
        None => file.decision.language_hint().unwrap_or("-"),
    }
}

/// Render the report as a text table.
///
/// Without `by_file` the table lists per-category counts, with omitted files
/// broken down by reason. With `by_file` every file gets its own row.
pub fn render_table(report: &ScanReport, by_file: bool) -> String {
    let mut out = String::new();

    if by_file {
        let name_width = 60;
        let separator = "-".repeat(name_width + 2 * (CELL_WIDTH + 2));
        let _ = writeln!(
            out,
            "{:<name_width$}  {:<CELL_WIDTH$}  {}",
            "File", "Category", "Detail"
        );
        let _ = writeln!(out, "{separator}");
        for file in &report.files {
            let _ = writeln!(
                out,
                "{:<name_width$}  {:<CELL_WIDTH$}  {}",
                truncate_name(&file.relative_path, name_width - 2),
                file.decision.category(),
                detail(file)
            );
        }
        let _ = writeln!(out, "{separator}");
    } else {
        let name_width = 24;
        let separator = "-".repeat(name_width + CELL_WIDTH);
        let _ = writeln!(out, "{:<name_width$}{:>CELL_WIDTH$}", "Category", "Files");
        let _ = writeln!(out, "{separator}");
        for category in CATEGORIES {
            let _ = writeln!(
                out,
                "{:<name_width$}{:>CELL_WIDTH$}",
                category,
                report.summary.count(category)
            );
            if category == Category::Omit {
                for (reason, count) in &report.summary.omitted_by_reason {
                    let label = format!("  {reason}");
                    let _ = writeln!(out, "{label:<name_width$}{count:>CELL_WIDTH$}");
                }
            }
        }
        let _ = writeln!(out, "{separator}");
    }

    let _ = writeln!(out, "Total ({} files)", report.summary.total);
    if !report.skipped.is_empty() {
        let _ = writeln!(
            out,
            "Skipped {} unreadable director{}",
            report.skipped.len(),
            if report.skipped.len() == 1 { "y" } else { "ies" }
        );
    }
    if !report.invalid_names.is_empty() {
        let _ = writeln!(
            out,
            "Skipped {} name{} that are not valid UTF-8",
            report.invalid_names.len(),
            if report.invalid_names.len() == 1 { "" } else { "s" }
        );
    }
    out
}

/// Render the report as pretty-printed JSON.
pub fn render_json(report: &ScanReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

fn section_title(category: Category) -> &'static str {
    match category {
        Category::Code => "Code",
        Category::Config => "Config",
        Category::Omit => "Omitted",
    }
}

/// Render the Markdown file inventory.
pub fn render_markdown(report: &ScanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Repository files\n");
    let _ = writeln!(out, "| Category | Files |");
    let _ = writeln!(out, "|---|---:|");
    for category in CATEGORIES {
        let _ = writeln!(out, "| {category} | {} |", report.summary.count(category));
    }
    let _ = writeln!(out, "| **total** | {} |", report.summary.total);

    for category in CATEGORIES {
        let _ = writeln!(out, "\n## {}\n", section_title(category));
        let mut any = false;
        for file in report.in_category(category) {
            any = true;
            match (file.decision.reason(), file.decision.language_hint()) {
                (Some(reason), _) => {
                    let _ = writeln!(out, "- `{}`: {reason}", file.relative_path);
                }
                (None, Some(hint)) => {
                    let _ = writeln!(out, "- `{}` ({hint})", file.relative_path);
                }
                (None, None) => {
                    let _ = writeln!(out, "- `{}`", file.relative_path);
                }
            }
        }
        if !any {
            let _ = writeln!(out, "_None._");
        }
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(out, "\n## Skipped directories\n");
        for dir in &report.skipped {
            let _ = writeln!(out, "- `{}`: {}", dir.relative_path, dir.reason);
        }
    }

    if !report.invalid_names.is_empty() {
        let _ = writeln!(out, "\n## Names that are not valid UTF-8\n");
        for name in &report.invalid_names {
            let _ = writeln!(out, "- `{name}`");
        }
    }
    out
}

/// Write the Markdown inventory to `out_dir/FILES.md`, creating the directory.
pub fn write_markdown(out_dir: &Path, report: &ScanReport) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;
    let target = out_dir.join(MARKDOWN_FILE_NAME);
    fs::write(&target, render_markdown(report))
        .with_context(|| format!("failed to write {}", target.display()))?;
    Ok(target)
}
