//! TAR bundle parsing and extraction.
//!
//! This module provides functionality for reading gzip-compressed TAR
//! bundles, the packaging format used for robot model uploads (a URDF
//! description plus the mesh files it references).
//!
//! ## Architecture
//!
//! The module is organized into three main components:
//!
//! - [`structures`]: Data structures for archive entries and their
//!   classification within a bundle
//! - [`parser`]: Low-level parsing of TAR blocks from raw bytes
//! - [`extractor`]: High-level bundle API for end users
//!
//! ## TAR Format Overview
//!
//! A TAR archive is a flat run of 512-byte blocks:
//! 1. A header block per entry, holding the name (bytes 0-99) and the
//!    content length as ASCII octal (bytes 124-135)
//! 2. The entry content, padded with null bytes to a block boundary
//! 3. An all-zero header marking the end of the archive
//!
//! Unlike ZIP there is no central directory, so the archive is decoded
//! front to back in one pass. The whole payload is resident in memory
//! before decoding starts; bundles in this domain are kilobytes to low
//! megabytes.
//!
//! ## Supported Features
//!
//! - Plain file entries (name + content)
//! - GNU long-name records (`././@LongLink`)
//! - gzip-compressed payloads (detected by magic bytes)
//!
//! ## Limitations
//!
//! - Checksums, magic/version fields and type flags are not validated
//! - No multi-volume archive support
//! - PAX extended headers are skipped, not interpreted

mod extractor;
mod parser;
mod structures;

pub use extractor::{Bundle, BundleExtractor};
pub use parser::parse_tar;
pub use structures::*;
