//! Static exclusion and configuration-name tables.
//!
//! The tables are built once per process and never mutated afterwards, so a
//! single `&'static ExclusionSet` is shared by the walker and by every
//! concurrent classification task. All names are stored lowercase and
//! matched exactly.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Directory names pruned from traversal.
const EXCLUDED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "bower_components",
    "dist",
    "build",
    "out",
    "target",
    "coverage",
    ".next",
    ".nuxt",
    ".cache",
    ".turbo",
    ".parcel-cache",
    ".venv",
    "venv",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    ".gradle",
    ".idea",
];

/// File names dropped during traversal.
const EXCLUDED_FILES: &[&str] = &[
    ".ds_store",
    "thumbs.db",
    "ehthumbs.db",
    "desktop.ini",
    "package-lock.json",
    "npm-shrinkwrap.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
];

/// Basenames that are configuration wherever they appear.
const CONFIG_BASENAMES: &[&str] = &[
    "package.json",
    "tsconfig.json",
    "jsconfig.json",
    ".eslintrc",
    ".eslintrc.json",
    ".eslintrc.js",
    ".eslintrc.cjs",
    "eslint.config.js",
    "eslint.config.mjs",
    ".prettierrc",
    ".prettierrc.json",
    "prettier.config.js",
    ".editorconfig",
    ".gitignore",
    ".gitattributes",
    ".npmrc",
    ".nvmrc",
    ".dockerignore",
    "dockerfile",
    "docker-compose.yml",
    "docker-compose.yaml",
    "makefile",
    "cargo.toml",
    "pyproject.toml",
    "setup.cfg",
    "tox.ini",
    "go.mod",
    ".babelrc",
    "babel.config.js",
    "jest.config.js",
    "vite.config.ts",
    "vitest.config.ts",
    "webpack.config.js",
    "rollup.config.js",
    ".env.example",
];

/// Directory prefixes whose whole contents are configuration.
const CONFIG_DIR_PREFIXES: &[&str] = &[
    ".github/",
    ".gitlab/",
    ".circleci/",
    ".devcontainer/",
    ".husky/",
    ".vscode/",
    ".changeset/",
];

static BUILTIN: LazyLock<ExclusionSet> = LazyLock::new(ExclusionSet::from_tables);

/// Lowercase name tables consulted by discovery and classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    /// Directory names pruned from traversal
    pub dirs: HashSet<String>,
    /// File names dropped during traversal
    pub files: HashSet<String>,
    /// Basenames treated as configuration
    pub config_basenames: HashSet<String>,
    /// Relative path prefixes (with trailing `/`) treated as configuration
    pub config_dir_prefixes: Vec<String>,
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

impl ExclusionSet {
    /// The process-wide set built from the static tables.
    pub fn builtin() -> &'static ExclusionSet {
        &BUILTIN
    }

    fn from_tables() -> Self {
        Self {
            dirs: lowercase_set(EXCLUDED_DIRS.iter().copied()),
            files: lowercase_set(EXCLUDED_FILES.iter().copied()),
            config_basenames: lowercase_set(CONFIG_BASENAMES.iter().copied()),
            config_dir_prefixes: CONFIG_DIR_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Copy of this set with extra directory names excluded.
    pub fn with_excluded_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.dirs.extend(lowercase_set(names));
        self
    }

    /// Copy of this set with extra file names excluded.
    pub fn with_excluded_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.files.extend(lowercase_set(names));
        self
    }

    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.dirs.contains(&name.to_lowercase())
    }

    pub fn is_excluded_file(&self, name: &str) -> bool {
        self.files.contains(&name.to_lowercase())
    }

    /// `basename_lower` must already be lowercase.
    pub fn is_known_config_by_basename(&self, basename_lower: &str) -> bool {
        self.config_basenames.contains(basename_lower)
    }

    /// `rel_path_lower` must already be lowercase and POSIX-normalized.
    pub fn is_under_known_config_dir(&self, rel_path_lower: &str) -> bool {
        self.config_dir_prefixes
            .iter()
            .any(|prefix| rel_path_lower.starts_with(prefix.as_str()))
    }
}

fn lowercase_set<I, S>(names: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().to_lowercase())
        .collect()
}

/// Check a directory name against the builtin tables (case-insensitive).
pub fn is_excluded_dir(name: &str) -> bool {
    ExclusionSet::builtin().is_excluded_dir(name)
}

/// Check a file name against the builtin tables (case-insensitive).
pub fn is_excluded_file(name: &str) -> bool {
    ExclusionSet::builtin().is_excluded_file(name)
}

pub fn is_known_config_by_basename(basename_lower: &str) -> bool {
    ExclusionSet::builtin().is_known_config_by_basename(basename_lower)
}

pub fn is_under_known_config_dir(rel_path_lower: &str) -> bool {
    ExclusionSet::builtin().is_under_known_config_dir(rel_path_lower)
}
