//! session/mod.rs
//! Open store files and the operations on them.
//!
//! A `Session` owns the file, the dictionary slot, one zstd engine and two
//! staging buffers. Layering:
//! - `context`: open/close lifecycle and guards.
//! - `read`: the streaming reader (load mode).
//! - `write`, `train`: the store path.
//! - `record`: mode-symmetric helpers over both.

pub mod types;
pub mod config;
pub mod buffer;
pub mod context;
pub mod read;
pub mod write;
pub mod train;
pub mod record;

pub use types::{Mode, SessionError};
pub use config::{ConfigError, SessionConfig};
pub use buffer::StagingBuffer;
pub use context::{close, Session};
