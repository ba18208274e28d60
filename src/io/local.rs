use super::ReadSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Local file reader for bundle payloads
pub struct LocalFileReader {
    path: PathBuf,
}

impl LocalFileReader {
    pub fn new(path: &Path) -> Result<Self> {
        // Fail early on missing files, before any async work starts
        std::fs::metadata(path).with_context(|| format!("cannot open {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

#[async_trait]
impl ReadSource for LocalFileReader {
    async fn read_all(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))
    }
}
