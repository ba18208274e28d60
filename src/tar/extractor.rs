use std::io::Read;
use std::sync::Arc;

use flate2::read::GzDecoder;

use crate::io::ReadSource;
use anyhow::{Context, Result};

use super::parser::parse_tar;
use super::structures::{EntryKind, TarEntry};

/// Magic bytes at the start of a gzip stream
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// High-level bundle loader.
///
/// Ties a byte source to bundle decoding: fetches the complete payload,
/// decompresses it if gzip-compressed, and parses the archive.
pub struct BundleExtractor<R: ReadSource> {
    reader: Arc<R>,
}

impl<R: ReadSource> BundleExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self { reader }
    }

    /// Fetch and decode the bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be fetched, decompressed,
    /// or parsed as a TAR archive.
    pub async fn load(&self) -> Result<Bundle> {
        let raw = self.reader.read_all().await?;
        Bundle::from_bytes(&raw)
    }
}

/// A decoded model bundle: the ordered file entries of one archive.
///
/// Downstream code needs random access by name, so the whole entry list
/// is materialized up front. Decoding the same payload twice produces
/// value-equal bundles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    entries: Vec<TarEntry>,
}

impl Bundle {
    /// Decode a bundle payload, decompressing first when it is gzipped.
    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        if raw.starts_with(&GZIP_MAGIC) {
            let mut decompressed = Vec::new();
            GzDecoder::new(raw)
                .read_to_end(&mut decompressed)
                .context("failed to decompress gzip payload")?;
            Self::from_tar_bytes(&decompressed)
        } else {
            Self::from_tar_bytes(raw)
        }
    }

    /// Decode an already-decompressed TAR buffer.
    pub fn from_tar_bytes(buffer: &[u8]) -> Result<Self> {
        Ok(Self {
            entries: parse_tar(buffer)?,
        })
    }

    /// All file entries, in archive order.
    pub fn entries(&self) -> &[TarEntry] {
        &self.entries
    }

    /// Find the primary document: the first entry whose name carries the
    /// given suffix.
    ///
    /// `None` means the bundle simply does not contain such a document.
    /// That is a content property of the archive, not a transient fault,
    /// so callers report it rather than retry.
    pub fn primary(&self, suffix: &str) -> Option<&TarEntry> {
        self.entries
            .iter()
            .find(|e| e.kind(suffix) == EntryKind::Primary)
    }

    /// Resolve a reference from the primary document to a sibling entry.
    ///
    /// The primary document refers to its resources by relative path
    /// (e.g. a mesh file), which may sit under a directory prefix inside
    /// the archive, so matching is by name suffix.
    pub fn resolve(&self, path: &str) -> Option<&TarEntry> {
        self.entries.iter().find(|e| e.name.ends_with(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tar::structures::{BLOCK_SIZE, DEFAULT_PRIMARY_SUFFIX};
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn build_archive(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut archive = Vec::new();
        for (name, content) in files {
            let mut header = [0u8; BLOCK_SIZE];
            header[..name.len()].copy_from_slice(name.as_bytes());
            let size = format!("{:011o}", content.len());
            header[124..135].copy_from_slice(size.as_bytes());
            archive.extend_from_slice(&header);
            archive.extend_from_slice(content);
            let pad = content.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE - content.len();
            archive.resize(archive.len() + pad, 0);
        }
        archive.resize(archive.len() + 2 * BLOCK_SIZE, 0);
        archive
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn decodes_gzipped_payload() {
        let archive = build_archive(&[("robot.urdf", b"<robot/>".as_slice())]);
        let bundle = Bundle::from_bytes(&gzip(&archive)).unwrap();
        assert_eq!(bundle.entries().len(), 1);
        assert_eq!(bundle.entries()[0].content, b"<robot/>");
    }

    #[test]
    fn decodes_raw_tar_payload() {
        let archive = build_archive(&[("robot.urdf", b"<robot/>".as_slice())]);
        let bundle = Bundle::from_bytes(&archive).unwrap();
        assert_eq!(bundle.entries().len(), 1);
    }

    #[test]
    fn primary_returns_first_suffix_match() {
        let archive = build_archive(&[
            ("parts/arm.stl", b"solid arm".as_slice()),
            ("robot.urdf", b"<robot/>".as_slice()),
            ("backup.urdf", b"<robot/>".as_slice()),
        ]);
        let bundle = Bundle::from_bytes(&archive).unwrap();
        assert_eq!(
            bundle.primary(DEFAULT_PRIMARY_SUFFIX).unwrap().name,
            "robot.urdf"
        );
    }

    #[test]
    fn primary_not_found_is_none() {
        let archive = build_archive(&[("parts/arm.stl", b"solid arm".as_slice())]);
        let bundle = Bundle::from_bytes(&archive).unwrap();
        assert!(bundle.primary(DEFAULT_PRIMARY_SUFFIX).is_none());
    }

    #[test]
    fn resolve_matches_relative_reference() {
        let archive = build_archive(&[
            ("bundle/robot.urdf", b"<mesh filename=\"parts/arm.stl\"/>".as_slice()),
            ("bundle/parts/arm.stl", b"solid arm".as_slice()),
        ]);
        let bundle = Bundle::from_bytes(&archive).unwrap();

        // The reference inside the URDF is relative to the bundle root
        let mesh = bundle.resolve("parts/arm.stl").unwrap();
        assert_eq!(mesh.name, "bundle/parts/arm.stl");
        assert!(bundle.resolve("parts/missing.stl").is_none());
    }

    #[test]
    fn corrupt_gzip_is_an_error() {
        let mut payload = gzip(&build_archive(&[("robot.urdf", b"<robot/>".as_slice())]));
        payload.truncate(payload.len() / 2);
        assert!(Bundle::from_bytes(&payload).is_err());
    }
}
