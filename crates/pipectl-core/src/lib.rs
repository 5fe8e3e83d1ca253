//! # pipectl Core
//!
//! Vocabulary types for GPU pipe-control synchronization.
//!
//! This crate holds no behavior of its own. It names the actions a
//! synchronization command can carry, the resource kinds a memory barrier
//! can cover, and the handles and write targets those commands refer to.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      pipectl-core                           │
//! │  ┌─────────────────┐  ┌─────────────┐  ┌─────────────────┐  │
//! │  │     Flags       │  │   Types     │  │     Error       │  │
//! │  │ (PipeControl,   │  │ (Buffer,    │  │   Handling      │  │
//! │  │  BarrierScope)  │  │  WriteTgt)  │  │                 │  │
//! │  └─────────────────┘  └─────────────┘  └─────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]

#[cfg(feature = "std")]
extern crate std;

// =============================================================================
// MODULE EXPORTS
// =============================================================================

pub mod error;
pub mod flags;
pub mod types;

// Re-exports for convenience
pub use error::{Error, Result};
pub use flags::{BarrierScope, PipeControlFlags};
pub use types::*;
