//! # runtar
//!
//! A Rust untar utility for robot model bundles, with HTTP URL support.
//!
//! This library decodes gzip-compressed TAR bundles, the format robot
//! models are uploaded in: one URDF description file plus the mesh
//! resources it references by relative name. Bundles can be read from
//! the local filesystem or fetched from HTTP/HTTPS URLs.
//!
//! ## Features
//!
//! - Decode .tar and gzip-compressed .tgz bundles, local or remote
//! - Locate the bundle's primary document by name suffix
//! - Resolve the primary document's sibling references by entry name
//! - GNU long-name support; PAX metadata and directories are skipped
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use runtar::{BundleExtractor, HttpReader};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Fetch and decode a remote bundle
//!     let reader = Arc::new(HttpReader::new("https://example.com/model.tgz".to_string())?);
//!     let bundle = BundleExtractor::new(reader).load().await?;
//!
//!     // The URDF document is the bundle's primary entry
//!     if let Some(urdf) = bundle.primary(".urdf") {
//!         println!("{}", urdf.text()?);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod io;
pub mod tar;

pub use cli::Cli;
pub use io::{HttpReader, LocalFileReader, ReadSource};
pub use tar::{Bundle, BundleExtractor, EntryKind, TarEntry};
