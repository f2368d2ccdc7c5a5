//! Local file system backed by `tokio::fs`.

use std::future::Future;
use std::path::PathBuf;

use rqgen_core::{CodegenError, FileSystem};

/// Files relative to an output directory.
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileSystem for LocalFs {
    fn exists_file(&self, path: &str) -> bool {
        self.root.join(path).is_file()
    }

    fn read_file(&self, path: &str) -> impl Future<Output = Result<String, CodegenError>> + Send {
        let full = self.root.join(path);
        async move {
            tokio::fs::read_to_string(&full)
                .await
                .map_err(|err| CodegenError::io(full.display().to_string(), err))
        }
    }

    fn write_file(
        &self,
        path: &str,
        content: &str,
    ) -> impl Future<Output = Result<(), CodegenError>> + Send {
        let full = self.root.join(path);
        let content = content.to_string();
        async move {
            if let Some(parent) = full.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|err| CodegenError::io(parent.display().to_string(), err))?;
            }
            tokio::fs::write(&full, content)
                .await
                .map_err(|err| CodegenError::io(full.display().to_string(), err))
        }
    }
}
