//! zstore-core
//!
//! Compressed binary store: payloads go to disk through a zstd stream,
//! optionally primed with a trained dictionary, and come back through a
//! caller-sized buffer regardless of how reads are chunked.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

pub mod compression;
pub mod headers;
pub mod telemetry;

// Session layer
pub mod session;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::session::{Mode, Session, SessionConfig};
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::StoreError;
}
