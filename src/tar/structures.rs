use std::ops::Range;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use anyhow::{Context, Result};

/// Size of a TAR header or data block in bytes
pub const BLOCK_SIZE: usize = 512;

/// Byte range of the null-terminated name field within a header block
pub const NAME_FIELD: Range<usize> = 0..100;

/// Byte range of the ASCII octal size field within a header block
pub const SIZE_FIELD: Range<usize> = 124..136;

/// Pseudo-entry name used by GNU tar to carry a long file name
pub const GNU_LONG_NAME: &str = "././@LongLink";

/// Suffix identifying the primary document of a robot model bundle
pub const DEFAULT_PRIMARY_SUFFIX: &str = ".urdf";

/// Role of an entry within a model bundle.
///
/// A bundle has one primary document (the robot description the renderer
/// displays) and any number of resources it references by relative name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Primary,
    Resource,
}

impl EntryKind {
    pub fn classify(name: &str, primary_suffix: &str) -> Self {
        if name.ends_with(primary_suffix) {
            EntryKind::Primary
        } else {
            EntryKind::Resource
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Primary => "primary",
            EntryKind::Resource => "resource",
        }
    }
}

/// A single file recovered from a TAR archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarEntry {
    /// Path recorded in the archive header, trailing nulls stripped
    pub name: String,
    /// Exactly as many bytes as the header's size field declared
    pub content: Vec<u8>,
}

impl TarEntry {
    pub fn kind(&self, primary_suffix: &str) -> EntryKind {
        EntryKind::classify(&self.name, primary_suffix)
    }

    /// Decode the entry content as UTF-8 text
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.content.clone())
            .with_context(|| format!("entry {} is not valid UTF-8", self.name))
    }

    /// Write the entry content to disk, creating parent directories as needed
    pub async fn write_to(&self, output_path: &Path) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut file = fs::File::create(output_path).await?;
        file.write_all(&self.content).await?;

        Ok(())
    }

    /// Write the entry content to stdout
    pub async fn write_to_stdout(&self) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(&self.content).await?;

        Ok(())
    }
}
