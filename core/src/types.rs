use std::io;

use thiserror::Error;

use crate::{
    compression::CompressionError,
    headers::HeaderError,
    session::{ConfigError, SessionError},
};

/// Unified store error covering I/O, header, engine, session and config failures.
/// - `From<T>` impls enable `?` across layers.
/// - `is_fatal` separates precondition violations (session still usable) from
///   I/O and engine failures (session must be closed).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl StoreError {
    /// Whether the failure leaves the session unusable.
    pub fn is_fatal(&self) -> bool {
        match self {
            StoreError::Io(_) | StoreError::Header(_) | StoreError::Compression(_) => true,
            StoreError::Session(e) => e.is_fatal(),
            StoreError::Config(_) => false,
        }
    }
}
