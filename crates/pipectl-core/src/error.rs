//! # pipectl Error Handling
//!
//! Error types surfaced by command emitters.
//!
//! The synchronization logic itself has no failure modes: its inputs come
//! from trusted driver code. Every error here originates in an emitter and
//! is propagated unchanged to the caller of the barrier or flush.

use core::fmt;

// =============================================================================
// RESULT TYPE
// =============================================================================

/// pipectl Result type alias
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// ERROR ENUM
// =============================================================================

/// pipectl unified error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // Generic Errors
    // =========================================================================
    /// Invalid parameter provided
    InvalidParameter,
    /// Operation not supported on this hardware
    NotSupported,

    // =========================================================================
    // Hardware Errors
    // =========================================================================
    /// GPU device is in a bad state
    GpuFault,
    /// GPU hang detected
    GpuHang,
    /// Emitter does not handle this hardware generation
    InvalidGeneration,

    // =========================================================================
    // Command Emission Errors
    // =========================================================================
    /// No room left in the batch for another command
    CommandBufferFull,
    /// Flag combination the encoder refuses to encode
    InvalidCommand,
    /// Encoder failed to produce a command
    EncodeFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Generic
            Self::InvalidParameter => write!(f, "invalid parameter"),
            Self::NotSupported => write!(f, "operation not supported"),

            // Hardware
            Self::GpuFault => write!(f, "GPU fault detected"),
            Self::GpuHang => write!(f, "GPU hang detected"),
            Self::InvalidGeneration => write!(f, "invalid GPU generation"),

            // Command
            Self::CommandBufferFull => write!(f, "command buffer full"),
            Self::InvalidCommand => write!(f, "invalid command"),
            Self::EncodeFailed => write!(f, "command encoding failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::string::ToString;

    #[test]
    fn test_display_messages() {
        assert_eq!(Error::CommandBufferFull.to_string(), "command buffer full");
        assert_eq!(Error::GpuHang.to_string(), "GPU hang detected");
        assert_eq!(Error::EncodeFailed.to_string(), "command encoding failed");
    }
}
