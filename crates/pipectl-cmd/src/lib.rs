//! # pipectl Command Synchronization
//!
//! Decides which flush / invalidate / stall commands a GPU batch needs and
//! hands them to a hardware-specific emitter.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                    Synchronization Pipeline                       │
//! │                                                                   │
//! │  ┌──────────────┐    ┌──────────────┐    ┌──────────────────┐    │
//! │  │   Barrier    │    │    Flush     │    │   Raw Command    │    │
//! │  │ Coordinator  │───▶│   Issuer     │───▶│    Emitter       │    │
//! │  │ (per batch)  │    │ (hazard split│    │ (per generation) │    │
//! │  └──────┬───────┘    └──────┬───────┘    └──────────────────┘    │
//! │         │                   │                                     │
//! │  ┌──────▼───────┐    ┌──────▼───────┐                             │
//! │  │  BatchSet    │    │ End-of-pipe  │                             │
//! │  │  (snapshot)  │    │    sync      │                             │
//! │  └──────────────┘    └──────────────┘                             │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Flow
//!
//! 1. The driver asks for a texture or memory barrier
//! 2. The coordinator reads the batch snapshot and picks batches with work
//! 3. The flush issuer splits flush+invalidate requests around an
//!    end-of-pipe sync
//! 4. The emitter encodes each resulting command into its batch
//!
//! Batches are independent. Nothing here orders one batch against another;
//! that takes a fence or semaphore outside this crate.

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]

#[cfg(any(feature = "alloc", test))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod barrier;
pub mod batch;
pub mod emitter;
pub mod flush;
pub mod stats;

// Re-exports
pub use barrier::{memory_barrier_flags, BarrierCoordinator, PipeBarriers};
pub use batch::{BatchKind, BatchSet, BatchState, BATCH_COUNT};
pub use emitter::{PipeControl, RawCommandEmitter};
#[cfg(any(feature = "alloc", test))]
pub use emitter::RecordingEmitter;
pub use flush::{plan_flush, FlushIssuer, FlushPlan};
pub use stats::SyncStats;

pub use pipectl_core::{
    BarrierScope, BufferHandle, Error, PipeControlFlags, Result, WorkaroundBuffer, WriteTarget,
};
