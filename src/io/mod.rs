mod http;
mod local;

pub use http::HttpReader;
pub use local::LocalFileReader;

use anyhow::Result;
use async_trait::async_trait;

/// Trait for loading a complete payload from a data source.
///
/// Bundle decoding needs the whole buffer resident, so sources hand over
/// the full payload in one call rather than exposing random access.
#[async_trait]
pub trait ReadSource: Send + Sync {
    /// Read the entire payload into memory
    async fn read_all(&self) -> Result<Vec<u8>>;
}
