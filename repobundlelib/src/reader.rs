//! Content reading capability.
//!
//! Classification never touches storage directly; it goes through the
//! [`ContentReader`] port so the filesystem can be swapped for an in-memory
//! or remote source. [`FsContentReader`] is the production adapter.
//!
//! ## Usage
//!
//! ```ignore
//! let reader = FsContentReader;
//! let options = ReaderOptions::new("/path/to/repo");
//! let stat = reader.stat("src/main.ts", &options).await?;
//! let head = reader.read_head("src/main.ts", 4096, &options).await?;
//! ```

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt;

use crate::error::ReadError;
use crate::options::DEFAULT_MAX_BYTES;

/// Options shared by every read against one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderOptions {
    /// Absolute path that relative paths are resolved against
    pub root: PathBuf,
    /// Largest file size, in bytes, that classification will accept
    pub max_bytes: u64,
}

impl ReaderOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

/// Metadata returned by [`ContentReader::stat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStat {
    pub size_bytes: u64,
}

/// Read access to files under a root, addressed by relative POSIX path.
#[async_trait]
pub trait ContentReader: Send + Sync + std::fmt::Debug {
    /// Size of the file.
    async fn stat(&self, rel_path: &str, options: &ReaderOptions) -> Result<FileStat, ReadError>;

    /// Up to `n` bytes from the start of the file; shorter only when the
    /// file itself is shorter.
    async fn read_head(
        &self,
        rel_path: &str,
        n: usize,
        options: &ReaderOptions,
    ) -> Result<Vec<u8>, ReadError>;

    /// Whole file as UTF-8 with every CRLF rewritten to LF.
    async fn read_text_normalized(
        &self,
        rel_path: &str,
        options: &ReaderOptions,
    ) -> Result<String, ReadError>;
}

/// Filesystem adapter built on `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsContentReader;

impl FsContentReader {
    fn resolve(rel_path: &str, options: &ReaderOptions) -> Result<PathBuf, ReadError> {
        let rel = Path::new(rel_path);
        let confined = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !confined {
            return Err(ReadError::OutsideRoot {
                path: rel_path.to_string(),
            });
        }
        Ok(options.root.join(rel))
    }
}

fn io_error(rel_path: &str) -> impl FnOnce(std::io::Error) -> ReadError + '_ {
    move |source| ReadError::Io {
        path: rel_path.to_string(),
        source,
    }
}

#[async_trait]
impl ContentReader for FsContentReader {
    async fn stat(&self, rel_path: &str, options: &ReaderOptions) -> Result<FileStat, ReadError> {
        let path = Self::resolve(rel_path, options)?;
        let meta = tokio::fs::metadata(&path).await.map_err(io_error(rel_path))?;
        Ok(FileStat {
            size_bytes: meta.len(),
        })
    }

    async fn read_head(
        &self,
        rel_path: &str,
        n: usize,
        options: &ReaderOptions,
    ) -> Result<Vec<u8>, ReadError> {
        let path = Self::resolve(rel_path, options)?;
        let file = tokio::fs::File::open(&path)
            .await
            .map_err(io_error(rel_path))?;

        let mut buf = Vec::with_capacity(n.min(64 * 1024));
        file.take(n as u64)
            .read_to_end(&mut buf)
            .await
            .map_err(io_error(rel_path))?;
        Ok(buf)
    }

    async fn read_text_normalized(
        &self,
        rel_path: &str,
        options: &ReaderOptions,
    ) -> Result<String, ReadError> {
        let path = Self::resolve(rel_path, options)?;
        let bytes = tokio::fs::read(&path).await.map_err(io_error(rel_path))?;
        let text = String::from_utf8(bytes).map_err(|source| ReadError::Decode {
            path: rel_path.to_string(),
            source,
        })?;

        if text.contains("\r\n") {
            Ok(text.replace("\r\n", "\n"))
        } else {
            Ok(text)
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! In-memory reader for exercising classification without a filesystem.

    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::io;
    use std::time::Duration;

    #[derive(Debug, Default)]
    pub struct MemoryReader {
        files: HashMap<String, Vec<u8>>,
        failing: HashSet<String>,
        undecodable: HashSet<String>,
        delays: HashMap<String, Duration>,
    }

    impl MemoryReader {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_file(&mut self, path: &str, content: impl Into<Vec<u8>>) {
            self.files.insert(path.to_string(), content.into());
        }

        /// Every operation on `path` fails with a permission error.
        pub fn add_failing(&mut self, path: &str) {
            self.failing.insert(path.to_string());
        }

        /// Every operation on `path` fails as if its bytes were not UTF-8.
        pub fn add_undecodable(&mut self, path: &str) {
            self.undecodable.insert(path.to_string());
        }

        /// Every operation on `path` sleeps before answering.
        pub fn add_delay(&mut self, path: &str, delay: Duration) {
            self.delays.insert(path.to_string(), delay);
        }

        async fn lookup(&self, path: &str) -> Result<&[u8], ReadError> {
            if let Some(delay) = self.delays.get(path) {
                tokio::time::sleep(*delay).await;
            }
            if self.failing.contains(path) {
                return Err(ReadError::Io {
                    path: path.to_string(),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                });
            }
            if self.undecodable.contains(path) {
                return Err(ReadError::Decode {
                    path: path.to_string(),
                    source: String::from_utf8(vec![0xff, 0xfe]).unwrap_err(),
                });
            }
            self.files
                .get(path)
                .map(Vec::as_slice)
                .ok_or_else(|| ReadError::Io {
                    path: path.to_string(),
                    source: io::Error::new(io::ErrorKind::NotFound, "not found"),
                })
        }
    }

    #[async_trait]
    impl ContentReader for MemoryReader {
        async fn stat(&self, rel_path: &str, _options: &ReaderOptions) -> Result<FileStat, ReadError> {
            let bytes = self.lookup(rel_path).await?;
            Ok(FileStat {
                size_bytes: bytes.len() as u64,
            })
        }

        async fn read_head(
            &self,
            rel_path: &str,
            n: usize,
            _options: &ReaderOptions,
        ) -> Result<Vec<u8>, ReadError> {
            let bytes = self.lookup(rel_path).await?;
            Ok(bytes[..n.min(bytes.len())].to_vec())
        }

        async fn read_text_normalized(
            &self,
            rel_path: &str,
            _options: &ReaderOptions,
        ) -> Result<String, ReadError> {
            let bytes = self.lookup(rel_path).await?;
            let text = String::from_utf8(bytes.to_vec()).map_err(|source| ReadError::Decode {
                path: rel_path.to_string(),
                source,
            })?;
            Ok(text.replace("\r\n", "\n"))
        }
    }
}
