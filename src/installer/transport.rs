//! Transport collaborator: fetch the bytes behind a source descriptor
//!
//! A fetch is the installer's only suspension point. Implementations
//! classify failures as transient (worth retrying) or permanent.

use std::io;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{SourceDescriptor, TransportScheme};

/// Why a fetch failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("{0}")]
    Transient(String),

    #[error("{0}")]
    Permanent(String),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient(_))
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, source: &SourceDescriptor) -> Result<Vec<u8>, FetchError>;
}

/// Reads `file` locations from the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTransport;

/// Missing files and denied access will not fix themselves
fn classify(location: &str, err: &io::Error) -> FetchError {
    let reason = format!("{location}: {err}");
    match err.kind() {
        io::ErrorKind::NotFound
        | io::ErrorKind::PermissionDenied
        | io::ErrorKind::InvalidInput
        | io::ErrorKind::InvalidData => FetchError::Permanent(reason),
        _ => FetchError::Transient(reason),
    }
}

#[async_trait]
impl Transport for FileTransport {
    async fn fetch(&self, source: &SourceDescriptor) -> Result<Vec<u8>, FetchError> {
        match source.transport_scheme() {
            TransportScheme::File => {
                let path = source.local_path();
                tokio::fs::read(path)
                    .await
                    .map_err(|e| classify(&source.location, &e))
            }
            TransportScheme::Https => Err(FetchError::Permanent(format!(
                "{}: no transport configured for https sources",
                source.location
            ))),
        }
    }
}
