//! # Flush Issuer
//!
//! Safe emission of pipe-control commands.
//!
//! A pipe control can flush write caches, invalidate read caches, stall and
//! write to memory, but not every combination is safe in one command. When
//! a request flushes and invalidates at once, the invalidation may happen
//! before the flushed lines reach memory, and a consumer reading through the
//! invalidated cache then sees stale data. Such requests are split:
//!
//! ```text
//!   requested:  RT_FLUSH | DC_FLUSH | TEX_INVALIDATE | CS_STALL
//!
//!   emitted:    1. RT_FLUSH | DC_FLUSH | CS_STALL | WRITE_IMMEDIATE -> workaround bo
//!               2. TEX_INVALIDATE
//! ```
//!
//! The first command is an end-of-pipe sync: the stall plus post-sync write
//! is what makes flushed data globally visible, the flush bits alone only
//! push it out of the cache.

use arrayvec::ArrayVec;
use pipectl_core::{BufferHandle, PipeControlFlags, Result, WorkaroundBuffer, WriteTarget};

use crate::batch::BatchKind;
use crate::emitter::{PipeControl, RawCommandEmitter};
use crate::stats::SyncStats;

// =============================================================================
// FLUSH PLAN
// =============================================================================

/// How a flush request is turned into commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushPlan {
    /// One command, flags unchanged
    Single(PipeControlFlags),
    /// End-of-pipe sync on the flush bits, then the remaining bits
    Split {
        /// Flush bits for the end-of-pipe sync
        sync_flush: PipeControlFlags,
        /// Everything else, minus the flushes and the CS stall
        remainder: PipeControlFlags,
    },
}

/// Decide whether `flags` must be split before emission
pub const fn plan_flush(flags: PipeControlFlags) -> FlushPlan {
    if flags.flushes_and_invalidates() {
        FlushPlan::Split {
            sync_flush: flags.flush_bits(),
            remainder: flags.difference(
                PipeControlFlags::CACHE_FLUSH_BITS.union(PipeControlFlags::CS_STALL),
            ),
        }
    } else {
        FlushPlan::Single(flags)
    }
}

/// Flags of an end-of-pipe sync on `flags`
#[inline]
pub const fn end_of_pipe_flags(flags: PipeControlFlags) -> PipeControlFlags {
    flags
        .union(PipeControlFlags::CS_STALL)
        .union(PipeControlFlags::WRITE_IMMEDIATE)
}

impl FlushPlan {
    /// The commands this plan produces for `batch`, in emission order
    pub fn commands(
        self,
        batch: BatchKind,
        workaround: WorkaroundBuffer,
    ) -> ArrayVec<PipeControl, 2> {
        let mut out = ArrayVec::new();
        match self {
            FlushPlan::Single(flags) => out.push(PipeControl::flush(batch, flags)),
            FlushPlan::Split {
                sync_flush,
                remainder,
            } => {
                out.push(PipeControl::write(
                    batch,
                    end_of_pipe_flags(sync_flush),
                    workaround.sync_target(),
                ));
                out.push(PipeControl::flush(batch, remainder));
            }
        }
        out
    }

    /// True when the request had to be split
    pub const fn is_split(&self) -> bool {
        matches!(self, FlushPlan::Split { .. })
    }
}

// =============================================================================
// FLUSH ISSUER
// =============================================================================

/// Hazard-aware front end to a [`RawCommandEmitter`]
///
/// Owns the emitter and a handle to the context's workaround buffer. Holds
/// no synchronization state between calls; the counters in [`SyncStats`]
/// are bookkeeping only.
#[derive(Debug)]
pub struct FlushIssuer<E> {
    emitter: E,
    workaround: WorkaroundBuffer,
    stats: SyncStats,
}

impl<E: RawCommandEmitter> FlushIssuer<E> {
    /// Create an issuer writing end-of-pipe syncs to `workaround`
    pub fn new(emitter: E, workaround: WorkaroundBuffer) -> Self {
        log::debug!(
            "pipectl: flush issuer on {} emitter, workaround bo {:?}",
            emitter.name(),
            workaround.buffer()
        );
        Self {
            emitter,
            workaround,
            stats: SyncStats::default(),
        }
    }

    /// Emit a pipe control with the given flags, splitting it if it both
    /// flushes and invalidates.
    ///
    /// The caller decides which flags are appropriate for the hardware.
    pub fn emit_flush(&mut self, batch: BatchKind, flags: PipeControlFlags) -> Result<()> {
        self.stats.flushes += 1;

        let flags = match plan_flush(flags) {
            FlushPlan::Single(flags) => flags,
            FlushPlan::Split {
                sync_flush,
                remainder,
            } => {
                log::debug!(
                    "pipectl: splitting {:?} on {} batch",
                    flags,
                    batch.name()
                );
                self.stats.split_flushes += 1;
                self.emit_end_of_pipe_sync(batch, sync_flush)?;
                remainder
            }
        };

        self.emit_raw(batch, flags, None)
    }

    /// Emit a pipe control that writes to `buffer` at `offset`.
    ///
    /// `flags` must carry exactly one of `WRITE_IMMEDIATE`,
    /// `WRITE_TIMESTAMP` or `WRITE_DEPTH_COUNT`. No splitting is done; a
    /// flush+invalidate combination here is the caller's race.
    pub fn emit_flush_write(
        &mut self,
        batch: BatchKind,
        flags: PipeControlFlags,
        buffer: BufferHandle,
        offset: u32,
        value: u64,
    ) -> Result<()> {
        check_write_purpose(flags);
        self.stats.write_flushes += 1;
        self.emit_raw(batch, flags, Some(WriteTarget::new(buffer, offset, value)))
    }

    /// Stall until everything in `flags` is flushed and globally visible.
    ///
    /// Emits `flags | CS_STALL | WRITE_IMMEDIATE` with a dummy write to the
    /// workaround buffer. The write is what lets later work (including the
    /// host) rely on the flushed data; the flush bits alone do not.
    pub fn emit_end_of_pipe_sync(
        &mut self,
        batch: BatchKind,
        flags: PipeControlFlags,
    ) -> Result<()> {
        self.stats.end_of_pipe_syncs += 1;
        self.emit_raw(
            batch,
            end_of_pipe_flags(flags),
            Some(self.workaround.sync_target()),
        )
    }

    fn emit_raw(
        &mut self,
        batch: BatchKind,
        flags: PipeControlFlags,
        write: Option<WriteTarget>,
    ) -> Result<()> {
        log::trace!(
            "pipectl: {} batch <- {:?} write={:?}",
            batch.name(),
            flags,
            write
        );
        self.emitter.emit_raw_pipe_control(batch, flags, write)?;
        self.stats.raw_commands += 1;
        Ok(())
    }

    /// Workaround buffer used for end-of-pipe syncs
    pub fn workaround(&self) -> WorkaroundBuffer {
        self.workaround
    }

    /// Get emitter reference
    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    /// Get mutable emitter reference
    pub fn emitter_mut(&mut self) -> &mut E {
        &mut self.emitter
    }

    /// Consume the issuer, returning its emitter
    pub fn into_emitter(self) -> E {
        self.emitter
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Zero statistics
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    pub(crate) fn note_skipped_batch(&mut self) {
        self.stats.skipped_batches += 1;
    }
}

#[inline]
fn check_write_purpose(flags: PipeControlFlags) {
    if cfg!(feature = "validation") {
        assert!(
            flags.has_single_write_purpose(),
            "pipe control write needs exactly one write purpose, got {:?}",
            flags
        );
    } else {
        debug_assert!(
            flags.has_single_write_purpose(),
            "pipe control write needs exactly one write purpose, got {:?}",
            flags
        );
    }
}
