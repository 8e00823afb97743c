//! # repobundle
//!
//! A CLI tool that inventories a repository for documentation bundles.
//!
//! ## Overview
//!
//! repobundle is built on top of repobundlelib. It walks a repository,
//! prunes dependency and VCS directories, and classifies every remaining file
//! as source code, configuration, or omitted (too large, binary, unreadable).
//!
//! ## Usage
//!
//! ```bash
//! # Summarize the current directory
//! repobundle
//!
//! # Per-file table for another checkout
//! repobundle --repo ../service --by-file
//!
//! # Machine-readable report
//! repobundle --output json
//!
//! # Write FILES.md into docs/bundle
//! repobundle --out docs/bundle
//!
//! # Tighter limits and extra exclusions
//! repobundle --max-bytes 65536 --exclude-dir fixtures --exclude "**/*.snap"
//! ```

mod logger;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use repobundlelib::{
    scan_repository, BinaryCheckOptions, ExclusionSet, FilterConfig, ScanOptions, ScanReport,
    DEFAULT_CONCURRENCY, DEFAULT_HEAD_SAMPLE_BYTES, DEFAULT_MAX_BYTES,
};
use tracing_subscriber::EnvFilter;

use crate::logger::{ConsoleLogger, Logger};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("repobundle")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Classify repository files into code, config, and omitted sets")
        .arg(
            Arg::new("repo")
                .short('r')
                .long("repo")
                .default_value(".")
                .help("Repository root to scan"),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Write FILES.md into this directory"),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Print debug output"),
        )
        .arg(
            Arg::new("max-bytes")
                .long("max-bytes")
                .value_parser(value_parser!(u64))
                .help("Omit files larger than this many bytes [default: 204800]"),
        )
        .arg(
            Arg::new("head-bytes")
                .long("head-bytes")
                .value_parser(value_parser!(usize))
                .help("Bytes sampled from each file for the binary check [default: 4096]"),
        )
        .arg(
            Arg::new("concurrency")
                .short('j')
                .long("concurrency")
                .value_parser(value_parser!(usize))
                .help("Files classified at once, 1 = sequential [default: 8]"),
        )
        .arg(
            Arg::new("threshold")
                .long("threshold")
                .value_parser(value_parser!(f64))
                .help("Non-printable ratio above which a sample counts as binary"),
        )
        .arg(
            Arg::new("exclude-dir")
                .long("exclude-dir")
                .action(ArgAction::Append)
                .help("Directory name to prune, in addition to the built-in list"),
        )
        .arg(
            Arg::new("exclude-file")
                .long("exclude-file")
                .action(ArgAction::Append)
                .help("File name to skip, in addition to the built-in list"),
        )
        .arg(
            Arg::new("include")
                .short('i')
                .long("include")
                .action(ArgAction::Append)
                .help("Include files matching glob pattern"),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Exclude files matching glob pattern"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["table", "json"])
                .default_value("table")
                .help("Output format"),
        )
        .arg(
            Arg::new("by-file")
                .short('f')
                .long("by-file")
                .action(ArgAction::SetTrue)
                .help("Show one row per file"),
        )
}

/// Values of a repeatable string flag
fn patterns<'a>(matches: &'a ArgMatches, id: &str) -> Vec<&'a str> {
    matches
        .get_many::<String>(id)
        .map(|v| v.map(|s| s.as_str()).collect())
        .unwrap_or_default()
}

/// Build filter config from matches
fn build_filter(matches: &ArgMatches) -> anyhow::Result<FilterConfig> {
    let filter = FilterConfig::new()
        .include_many(&patterns(matches, "include"))?
        .exclude_many(&patterns(matches, "exclude"))?;
    Ok(filter)
}

/// Built-in exclusions extended with the `--exclude-dir`/`--exclude-file` names
fn build_exclusions(matches: &ArgMatches) -> ExclusionSet {
    let dirs = matches
        .get_many::<String>("exclude-dir")
        .into_iter()
        .flatten()
        .cloned();
    let files = matches
        .get_many::<String>("exclude-file")
        .into_iter()
        .flatten()
        .cloned();
    ExclusionSet::builtin()
        .clone()
        .with_excluded_dirs(dirs)
        .with_excluded_files(files)
}

fn build_options(matches: &ArgMatches) -> anyhow::Result<ScanOptions> {
    let mut binary = BinaryCheckOptions::default();
    if let Some(threshold) = matches.get_one::<f64>("threshold") {
        binary.non_printable_threshold = *threshold;
    }

    let options = ScanOptions::new()
        .max_bytes(*matches.get_one::<u64>("max-bytes").unwrap_or(&DEFAULT_MAX_BYTES))
        .head_sample_bytes(
            *matches
                .get_one::<usize>("head-bytes")
                .unwrap_or(&DEFAULT_HEAD_SAMPLE_BYTES),
        )
        .concurrency(
            *matches
                .get_one::<usize>("concurrency")
                .unwrap_or(&DEFAULT_CONCURRENCY),
        )
        .binary(binary)
        .filter(build_filter(matches)?)
        .exclusions(build_exclusions(matches));
    options.validate()?;
    Ok(options)
}

/// Install the stderr tracing subscriber. `RUST_LOG` wins over `--debug`.
fn init_tracing(debug: bool) {
    let fallback = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn report_counts(report: &ScanReport, logger: &dyn Logger) {
    for file in &report.files {
        let detail = match (file.decision.reason(), file.decision.language_hint()) {
            (Some(reason), _) => format!(" ({reason})"),
            (None, Some(hint)) => format!(" ({hint})"),
            (None, None) => String::new(),
        };
        logger.debug(&format!(
            "{:<6} {}{detail}",
            file.decision.category(),
            file.relative_path
        ));
    }
    for dir in &report.skipped {
        logger.warn(&format!(
            "skipped unreadable directory {}: {}",
            if dir.relative_path.is_empty() { "." } else { &dir.relative_path },
            dir.reason
        ));
    }
    for name in &report.invalid_names {
        logger.warn(&format!("skipped name that is not valid UTF-8: {name}"));
    }

    let summary = &report.summary;
    logger.info(&format!(
        "{} files: {} code, {} config, {} omitted",
        summary.total, summary.code, summary.config, summary.omit
    ));
}

async fn run(matches: &ArgMatches, logger: &dyn Logger) -> anyhow::Result<()> {
    let repo = matches
        .get_one::<String>("repo")
        .map(|s| s.as_str())
        .unwrap_or(".");
    let options = build_options(matches)?;

    let scan_logger = logger.scoped("scan");
    scan_logger.debug(&format!(
        "scanning {repo} (max {} bytes, concurrency {})",
        options.max_bytes, options.concurrency
    ));
    let report = scan_repository(repo, options)
        .await
        .with_context(|| format!("failed to scan {repo}"))?;
    report_counts(&report, scan_logger.as_ref());

    let rendered = match matches
        .get_one::<String>("output")
        .map(|s| s.as_str())
        .unwrap_or("table")
    {
        "json" => render::render_json(&report)?,
        _ => render::render_table(&report, matches.get_flag("by-file")),
    };
    println!("{}", rendered.trim_end());

    if let Some(out_dir) = matches.get_one::<PathBuf>("out") {
        let written = render::write_markdown(out_dir, &report)?;
        logger
            .scoped("out")
            .success(&format!("wrote {}", written.display()));
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = build_command().get_matches();
    let debug = matches.get_flag("debug");
    init_tracing(debug);
    let logger = ConsoleLogger::new(debug);

    match run(&matches, &logger).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
