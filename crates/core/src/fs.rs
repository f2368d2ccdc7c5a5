//! File-system collaborator used by the emitter and bootstrapper.
//!
//! Generation never touches the disk directly. Callers pass an implementation
//! of [`FileSystem`]; the CLI supplies one backed by `tokio::fs`, tests use
//! [`MemoryFs`].

use std::collections::BTreeMap;
use std::future::{Future, ready};
use std::sync::{Mutex, PoisonError};

use crate::error::CodegenError;

/// Injected file access. Paths are relative to the output directory.
pub trait FileSystem {
    /// Whether a file already exists at `path`.
    fn exists_file(&self, path: &str) -> bool;

    /// Read the whole file at `path`.
    fn read_file(&self, path: &str) -> impl Future<Output = Result<String, CodegenError>> + Send;

    /// Create or replace the file at `path`.
    fn write_file(
        &self,
        path: &str,
        content: &str,
    ) -> impl Future<Output = Result<(), CodegenError>> + Send;
}

/// In-memory file system that records the order of writes.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: Mutex<BTreeMap<String, String>>,
    writes: Mutex<Vec<String>>,
}

impl MemoryFs {
    /// Empty file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file without recording it as a write.
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), content.into());
        self
    }

    /// Paths written so far, in write order.
    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current content of a file.
    pub fn file(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }
}

impl FileSystem for MemoryFs {
    fn exists_file(&self, path: &str) -> bool {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    fn read_file(&self, path: &str) -> impl Future<Output = Result<String, CodegenError>> + Send {
        ready(
            self.file(path)
                .ok_or_else(|| CodegenError::io(path, "file not found")),
        )
    }

    fn write_file(
        &self,
        path: &str,
        content: &str,
    ) -> impl Future<Output = Result<(), CodegenError>> + Send {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), content.to_string());
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
        ready(Ok(()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_fs_records_writes_in_order() {
        let fs = MemoryFs::new().with_file("seed.ts", "seed");
        fs.write_file("b.ts", "b").await.unwrap();
        fs.write_file("a.ts", "a").await.unwrap();

        assert_eq!(fs.writes(), vec!["b.ts".to_string(), "a.ts".to_string()]);
        assert!(fs.exists_file("seed.ts"));
        assert_eq!(fs.read_file("a.ts").await.unwrap(), "a");
    }

    #[tokio::test]
    async fn test_memory_fs_missing_file() {
        let fs = MemoryFs::new();
        let err = fs.read_file("missing.ts").await.unwrap_err();
        assert!(matches!(err, CodegenError::Io { .. }));
    }
}
