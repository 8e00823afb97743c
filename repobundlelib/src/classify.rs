//! Per-file classification.
//!
//! Each discovered file passes through at most three ordered checks and
//! stops at the first one that decides:
//!
//! 1. **Size**: larger than `max_bytes` → omitted (`SIZE_OVER_LIMIT`)
//! 2. **Binary**: head sample looks binary → omitted (`LIKELY_BINARY`)
//! 3. **Naming**: known config location or basename → `config`, else `code`
//!
//! Reader failures are returned to the caller untouched; turning them into
//! `READ_ERROR` decisions is the orchestrator's job (see [`omit_reason_for`]).

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::ReadError;
use crate::path::normalize_path_str;
use crate::reader::{ContentReader, ReaderOptions};
use crate::source::exclusion::ExclusionSet;

/// Reporting bucket for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Code,
    Config,
    Omit,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Code => "code",
            Category::Config => "config",
            Category::Omit => "omit",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Why a discovered file was left out of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OmitReason {
    SizeOverLimit,
    LikelyBinary,
    ReadError,
    UnknownEncoding,
}

impl OmitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            OmitReason::SizeOverLimit => "SIZE_OVER_LIMIT",
            OmitReason::LikelyBinary => "LIKELY_BINARY",
            OmitReason::ReadError => "READ_ERROR",
            OmitReason::UnknownEncoding => "UNKNOWN_ENCODING",
        }
    }
}

impl fmt::Display for OmitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The outcome of classifying one file.
///
/// A reason is present exactly when the category is [`Category::Omit`]; the
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationDecision {
    category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<OmitReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_hint: Option<String>,
}

impl ClassificationDecision {
    pub fn code(language_hint: Option<String>) -> Self {
        Self {
            category: Category::Code,
            reason: None,
            language_hint,
        }
    }

    pub fn config(language_hint: Option<String>) -> Self {
        Self {
            category: Category::Config,
            reason: None,
            language_hint,
        }
    }

    pub fn omit(reason: OmitReason) -> Self {
        Self {
            category: Category::Omit,
            reason: Some(reason),
            language_hint: None,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn reason(&self) -> Option<OmitReason> {
        self.reason
    }

    pub fn language_hint(&self) -> Option<&str> {
        self.language_hint.as_deref()
    }
}

/// A discovered path together with its decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedPath {
    pub relative_path: String,
    pub decision: ClassificationDecision,
}

impl ClassifiedPath {
    pub fn new(relative_path: impl Into<String>, decision: ClassificationDecision) -> Self {
        Self {
            relative_path: relative_path.into(),
            decision,
        }
    }

    /// Shorthand for an omitted path.
    pub fn omitted(relative_path: impl Into<String>, reason: OmitReason) -> Self {
        Self::new(relative_path, ClassificationDecision::omit(reason))
    }
}

/// Classify one file through the size, binary and naming checks.
///
/// `binary_check` receives at most `head_sample_bytes` bytes from the start
/// of the file. The naming check uses the builtin tables; see
/// [`classify_one_with`] to supply others.
///
/// # Errors
///
/// Any [`ReadError`] from `stat` or `read_head` is returned as-is.
pub async fn classify_one<R, F>(
    relative_path: &str,
    reader: &R,
    reader_options: &ReaderOptions,
    head_sample_bytes: usize,
    binary_check: F,
) -> Result<ClassifiedPath, ReadError>
where
    R: ContentReader + ?Sized,
    F: Fn(&[u8]) -> bool,
{
    classify_one_with(
        relative_path,
        reader,
        reader_options,
        head_sample_bytes,
        binary_check,
        ExclusionSet::builtin(),
    )
    .await
}

/// [`classify_one`] with explicit config tables for the naming check.
pub async fn classify_one_with<R, F>(
    relative_path: &str,
    reader: &R,
    reader_options: &ReaderOptions,
    head_sample_bytes: usize,
    binary_check: F,
    tables: &ExclusionSet,
) -> Result<ClassifiedPath, ReadError>
where
    R: ContentReader + ?Sized,
    F: Fn(&[u8]) -> bool,
{
    let stat = reader.stat(relative_path, reader_options).await?;
    if stat.size_bytes > reader_options.max_bytes {
        return Ok(ClassifiedPath::omitted(
            relative_path,
            OmitReason::SizeOverLimit,
        ));
    }

    let sample = reader
        .read_head(relative_path, head_sample_bytes, reader_options)
        .await?;
    if binary_check(&sample) {
        return Ok(ClassifiedPath::omitted(relative_path, OmitReason::LikelyBinary));
    }

    Ok(ClassifiedPath::new(
        relative_path,
        classify_by_name_with(relative_path, tables),
    ))
}

/// Decide between `config` and `code` from the path alone. Never omits.
pub fn classify_by_name(relative_path: &str) -> ClassificationDecision {
    classify_by_name_with(relative_path, ExclusionSet::builtin())
}

/// [`classify_by_name`] against the given config tables.
///
/// The path is normalized first, so `./.github/ci.yml` and
/// `.github\ci.yml` land in the same bucket as `.github/ci.yml`.
pub fn classify_by_name_with(relative_path: &str, tables: &ExclusionSet) -> ClassificationDecision {
    let normalized = normalize_path_str(relative_path);
    let lower = normalized.to_lowercase();
    let basename = lower.rsplit('/').next().unwrap_or(&lower);
    let hint = language_hint(&normalized).map(str::to_string);

    if tables.is_under_known_config_dir(&lower) || tables.is_known_config_by_basename(basename) {
        ClassificationDecision::config(hint)
    } else {
        ClassificationDecision::code(hint)
    }
}

/// Map a reader failure to the omit reason reported for it.
///
/// Decoding failures are `UNKNOWN_ENCODING`; everything else, including
/// paths that escape the root, is `READ_ERROR`.
pub fn omit_reason_for(err: &ReadError) -> OmitReason {
    if err.is_decode() {
        OmitReason::UnknownEncoding
    } else {
        OmitReason::ReadError
    }
}

/// Best-effort language hint from the file extension.
pub fn language_hint(relative_path: &str) -> Option<&'static str> {
    let basename = relative_path.rsplit('/').next().unwrap_or(relative_path);
    let ext = Path::new(basename).extension()?.to_str()?.to_ascii_lowercase();

    let hint = match ext.as_str() {
        "ts" | "mts" | "cts" => "ts",
        "tsx" => "tsx",
        "js" | "mjs" | "cjs" => "js",
        "jsx" => "jsx",
        "json" | "jsonc" => "json",
        "md" | "markdown" => "md",
        "mdx" => "mdx",
        "yml" | "yaml" => "yaml",
        "toml" => "toml",
        "ini" | "cfg" => "ini",
        "xml" => "xml",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "vue" => "vue",
        "svelte" => "svelte",
        "rs" => "rust",
        "py" => "python",
        "go" => "go",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "rb" => "ruby",
        "php" => "php",
        "swift" => "swift",
        "c" | "h" => "c",
        "cc" | "cpp" | "cxx" | "hpp" => "cpp",
        "cs" => "csharp",
        "lua" => "lua",
        "sh" | "bash" => "bash",
        "zsh" => "zsh",
        "ps1" => "powershell",
        "sql" => "sql",
        "graphql" | "gql" => "graphql",
        "proto" => "protobuf",
        _ => return None,
    };
    Some(hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::{is_likely_binary, BinaryCheckOptions};
    use crate::reader::mock::MemoryReader;
    use crate::reader::FsContentReader;

    fn default_check(sample: &[u8]) -> bool {
        is_likely_binary(sample, &BinaryCheckOptions::default())
    }

    async fn classify(reader: &MemoryReader, path: &str) -> Result<ClassifiedPath, ReadError> {
        let options = ReaderOptions::new("/repo");
        classify_one(path, reader, &options, 4096, default_check).await
    }

    #[test]
    fn test_decision_invariant() {
        let code = ClassificationDecision::code(Some("ts".to_string()));
        assert_eq!(code.category(), Category::Code);
        assert_eq!(code.reason(), None);
        assert_eq!(code.language_hint(), Some("ts"));

        let omit = ClassificationDecision::omit(OmitReason::LikelyBinary);
        assert_eq!(omit.category(), Category::Omit);
        assert_eq!(omit.reason(), Some(OmitReason::LikelyBinary));
        assert_eq!(omit.language_hint(), None);
    }

    #[tokio::test]
    async fn test_oversized_file_is_omitted_regardless_of_content() {
        let mut reader = MemoryReader::new();
        reader.add_file("big.ts", vec![b'a'; 204_801]);
        reader.add_file("big.bin", vec![0u8; 300_000]);

        for path in ["big.ts", "big.bin"] {
            let result = classify(&reader, path).await.unwrap();
            assert_eq!(result.decision.reason(), Some(OmitReason::SizeOverLimit));
        }
    }

    #[tokio::test]
    async fn test_file_at_limit_is_not_oversized() {
        let mut reader = MemoryReader::new();
        reader.add_file("edge.ts", vec![b'a'; 204_800]);

        let result = classify(&reader, "edge.ts").await.unwrap();
        assert_eq!(result.decision.category(), Category::Code);
    }

    #[tokio::test]
    async fn test_binary_sample_is_omitted() {
        let mut reader = MemoryReader::new();
        reader.add_file("logo.png", b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec());

        let result = classify(&reader, "logo.png").await.unwrap();
        assert_eq!(result.decision.reason(), Some(OmitReason::LikelyBinary));
    }

    #[tokio::test]
    async fn test_tab_text_is_never_binary() {
        let mut reader = MemoryReader::new();
        reader.add_file("notes.txt", "hello\tworld");

        let result = classify(&reader, "notes.txt").await.unwrap();
        assert_ne!(result.decision.reason(), Some(OmitReason::LikelyBinary));
        assert_eq!(result.decision.category(), Category::Code);
    }

    #[tokio::test]
    async fn test_binary_check_sees_only_head_sample() {
        let mut reader = MemoryReader::new();
        let mut content = vec![b'a'; 100];
        content.push(0);
        reader.add_file("late_nul.txt", content);

        let options = ReaderOptions::new("/repo");
        let result = classify_one("late_nul.txt", &reader, &options, 64, default_check)
            .await
            .unwrap();
        assert_eq!(result.decision.category(), Category::Code);
    }

    #[tokio::test]
    async fn test_config_by_directory_and_basename() {
        let mut reader = MemoryReader::new();
        reader.add_file(".github/workflows/ci.yml", "on: push\n");
        reader.add_file("web/Package.json", "{}");
        reader.add_file("Dockerfile", "FROM rust\n");

        let ci = classify(&reader, ".github/workflows/ci.yml").await.unwrap();
        assert_eq!(ci.decision.category(), Category::Config);
        assert_eq!(ci.decision.language_hint(), Some("yaml"));

        let pkg = classify(&reader, "web/Package.json").await.unwrap();
        assert_eq!(pkg.decision.category(), Category::Config);
        assert_eq!(pkg.decision.language_hint(), Some("json"));

        let docker = classify(&reader, "Dockerfile").await.unwrap();
        assert_eq!(docker.decision.category(), Category::Config);
        assert_eq!(docker.decision.language_hint(), None);
    }

    #[tokio::test]
    async fn test_source_file_is_code_with_hint() {
        let mut reader = MemoryReader::new();
        reader.add_file("src/main.ts", "export const x = 1;\n");

        let result = classify(&reader, "src/main.ts").await.unwrap();
        assert_eq!(result.relative_path, "src/main.ts");
        assert_eq!(result.decision, ClassificationDecision::code(Some("ts".into())));
    }

    #[tokio::test]
    async fn test_reader_errors_propagate() {
        let mut reader = MemoryReader::new();
        reader.add_failing("locked.ts");

        let err = classify(&reader, "locked.ts").await.unwrap_err();
        assert_eq!(omit_reason_for(&err), OmitReason::ReadError);
    }

    #[tokio::test]
    async fn test_classify_with_filesystem_reader() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("a.ts"), "let a = 1;\n").unwrap();
        let options = ReaderOptions::new(temp.path());

        let result = classify_one("a.ts", &FsContentReader, &options, 4096, default_check)
            .await
            .unwrap();
        assert_eq!(result.decision.category(), Category::Code);
    }

    #[test]
    fn test_name_check_normalizes_first() {
        for path in [
            ".github/workflows/ci.yml",
            "./.github/workflows/ci.yml",
            r".github\workflows\ci.yml",
        ] {
            let decision = classify_by_name(path);
            assert_eq!(decision.category(), Category::Config, "{path}");
            assert_eq!(decision.language_hint(), Some("yaml"), "{path}");
        }
        assert_eq!(classify_by_name(r"web\package.json").category(), Category::Config);
        assert_eq!(
            classify_by_name(r".\src\main.ts"),
            ClassificationDecision::code(Some("ts".into()))
        );
    }

    #[tokio::test]
    async fn test_custom_config_tables() {
        let mut reader = MemoryReader::new();
        reader.add_file("build.gradle", "plugins {}\n");
        let mut tables = ExclusionSet::default();
        tables.config_basenames.insert("build.gradle".to_string());

        assert_eq!(classify_by_name("build.gradle").category(), Category::Code);
        let options = ReaderOptions::new("/repo");
        let result = classify_one_with(
            "build.gradle",
            &reader,
            &options,
            4096,
            default_check,
            &tables,
        )
        .await
        .unwrap();
        assert_eq!(result.decision.category(), Category::Config);
    }

    #[test]
    fn test_omit_reason_for_decode_error() {
        let err = ReadError::Decode {
            path: "x".to_string(),
            source: String::from_utf8(vec![0xc3]).unwrap_err(),
        };
        assert_eq!(omit_reason_for(&err), OmitReason::UnknownEncoding);
    }

    #[test]
    fn test_language_hints() {
        assert_eq!(language_hint("src/main.ts"), Some("ts"));
        assert_eq!(language_hint("App.TSX"), Some("tsx"));
        assert_eq!(language_hint("config/settings.json"), Some("json"));
        assert_eq!(language_hint("lib.rs"), Some("rust"));
        assert_eq!(language_hint("archive.tar.gz"), None);
        assert_eq!(language_hint(".gitignore"), None);
        assert_eq!(language_hint("Makefile"), None);
        assert_eq!(language_hint("dir.ts/file"), None);
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_value(ClassifiedPath::omitted("big.bin", OmitReason::SizeOverLimit))
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "relativePath": "big.bin",
                "decision": { "category": "omit", "reason": "SIZE_OVER_LIMIT" }
            })
        );

        let json = serde_json::to_value(ClassificationDecision::code(Some("ts".into()))).unwrap();
        assert_eq!(json, serde_json::json!({ "category": "code", "languageHint": "ts" }));
    }
}
