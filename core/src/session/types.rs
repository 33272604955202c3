//! session/types.rs
//! Session mode and session-level errors.

use std::fmt;

use num_enum::TryFromPrimitive;
use thiserror::Error;

/// Direction of a session. Fixed at open.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum Mode {
    Load  = 0x00,
    Store = 0x01,
}

impl Mode {
    /// Map a raw mode value, rejecting anything but the defined modes.
    pub fn verify(raw: u8) -> Result<Mode, SessionError> {
        Mode::try_from_primitive(raw).map_err(|_| SessionError::UnknownMode { raw })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Load  => f.write_str("load"),
            Mode::Store => f.write_str("store"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown session mode: 0x{raw:02x}")]
    UnknownMode { raw: u8 },

    #[error("{op} requires {required} mode, session is in {actual} mode")]
    WrongMode { op: &'static str, required: Mode, actual: Mode },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An immediate read was requested while decompressed bytes from an
    /// earlier buffered read are still waiting in the output window.
    #[error("immediate read needs a drained output window, {pending} bytes pending")]
    PendingOutput { pending: usize },

    #[error("dictionary training must precede the first write ({written} bytes written)")]
    TrainAfterWrite { written: u64 },

    #[error("compression level is fixed once data is written ({written} bytes written)")]
    LevelAfterWrite { written: u64 },

    #[error("compressed stream ended early: requested {requested} bytes, delivered {delivered}")]
    UnexpectedEof { requested: usize, delivered: usize },

    #[error("session is unusable after an earlier failure")]
    Poisoned,

    #[error("session is closed")]
    Closed,
}

impl SessionError {
    /// Precondition violations leave the session usable; a truncated stream does not.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::UnexpectedEof { .. })
    }
}
