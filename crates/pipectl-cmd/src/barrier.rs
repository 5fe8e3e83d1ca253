//! # Barriers
//!
//! Texture and memory barriers over every batch of a context.
//!
//! A barrier turns "what must become consistent" into concrete flush and
//! invalidate bits, then applies them only to batches that have recorded
//! work since their last flush. An idle batch is never touched.

use pipectl_core::{BarrierScope, BufferHandle, PipeControlFlags, Result, WorkaroundBuffer};

use crate::batch::{BatchKind, BatchSet};
use crate::emitter::RawCommandEmitter;
use crate::flush::FlushIssuer;
use crate::stats::SyncStats;

// =============================================================================
// BARRIER HOOKS
// =============================================================================

/// Barrier entry points a driver context installs
pub trait PipeBarriers {
    /// Make render and depth target writes visible to texture sampling
    fn texture_barrier(&mut self, batches: &BatchSet) -> Result<()>;

    /// Make shader memory writes visible to the consumers in `scope`
    fn memory_barrier(&mut self, batches: &BatchSet, scope: BarrierScope) -> Result<()>;
}

// =============================================================================
// SCOPE MAPPING
// =============================================================================

/// Flags a memory barrier emits for `scope`
///
/// Always flushes the data cache behind a CS stall; each consumer kind adds
/// the read caches it goes through.
pub const fn memory_barrier_flags(scope: BarrierScope) -> PipeControlFlags {
    let mut bits = PipeControlFlags::DATA_CACHE_FLUSH.union(PipeControlFlags::CS_STALL);

    if scope.intersects(BarrierScope::VERTEX_FETCH) {
        bits = bits.union(PipeControlFlags::VF_CACHE_INVALIDATE);
    }

    if scope.intersects(BarrierScope::CONSTANT_BUFFER) {
        bits = bits
            .union(PipeControlFlags::TEXTURE_CACHE_INVALIDATE)
            .union(PipeControlFlags::CONST_CACHE_INVALIDATE);
    }

    if scope.intersects(BarrierScope::TEXTURE.union(BarrierScope::FRAMEBUFFER)) {
        bits = bits
            .union(PipeControlFlags::TEXTURE_CACHE_INVALIDATE)
            .union(PipeControlFlags::RENDER_TARGET_FLUSH);
    }

    bits
}

// =============================================================================
// BARRIER COORDINATOR
// =============================================================================

/// Applies barriers to the batches of one context
///
/// Wraps a [`FlushIssuer`]; every command goes through its hazard split.
#[derive(Debug)]
pub struct BarrierCoordinator<E> {
    issuer: FlushIssuer<E>,
}

impl<E: RawCommandEmitter> BarrierCoordinator<E> {
    /// Create a coordinator over `emitter`
    pub fn new(emitter: E, workaround: WorkaroundBuffer) -> Self {
        Self {
            issuer: FlushIssuer::new(emitter, workaround),
        }
    }

    /// Wrap an existing issuer
    pub fn from_issuer(issuer: FlushIssuer<E>) -> Self {
        Self { issuer }
    }

    /// Texture barrier: a consumer is about to sample something a prior
    /// draw wrote as a color or depth/stencil target.
    ///
    /// The target flush and the texture invalidate go out as two separate
    /// flushes, so the invalidate cannot overtake the flush.
    pub fn texture_barrier(&mut self, batches: &BatchSet) -> Result<()> {
        let render = batches[BatchKind::Render];
        if render.has_pending_work()
            || render.has_render_cache_entries()
            || render.has_depth_cache_entries()
        {
            log::debug!("pipectl: texture barrier on render batch");
            self.issuer.emit_flush(
                BatchKind::Render,
                PipeControlFlags::DEPTH_CACHE_FLUSH
                    | PipeControlFlags::RENDER_TARGET_FLUSH
                    | PipeControlFlags::CS_STALL,
            )?;
            self.issuer
                .emit_flush(BatchKind::Render, PipeControlFlags::TEXTURE_CACHE_INVALIDATE)?;
        } else {
            self.skip(BatchKind::Render);
        }

        if batches[BatchKind::Compute].has_pending_work() {
            log::debug!("pipectl: texture barrier on compute batch");
            self.issuer
                .emit_flush(BatchKind::Compute, PipeControlFlags::CS_STALL)?;
            self.issuer
                .emit_flush(BatchKind::Compute, PipeControlFlags::TEXTURE_CACHE_INVALIDATE)?;
        } else {
            self.skip(BatchKind::Compute);
        }

        Ok(())
    }

    /// Memory barrier: shader writes must become visible to the consumers
    /// named in `scope`.
    ///
    /// One flush per batch with recorded work or render-cache entries.
    /// Depth-cache entries alone do not select a batch here, unlike
    /// [`texture_barrier`](Self::texture_barrier).
    pub fn memory_barrier(&mut self, batches: &BatchSet, scope: BarrierScope) -> Result<()> {
        let bits = memory_barrier_flags(scope);

        for (kind, state) in batches.iter() {
            if state.has_pending_work() || state.has_render_cache_entries() {
                log::debug!(
                    "pipectl: memory barrier {:?} on {} batch",
                    scope,
                    kind.name()
                );
                self.issuer.emit_flush(kind, bits)?;
            } else {
                self.skip(kind);
            }
        }

        Ok(())
    }

    /// See [`FlushIssuer::emit_flush`]
    pub fn emit_flush(&mut self, batch: BatchKind, flags: PipeControlFlags) -> Result<()> {
        self.issuer.emit_flush(batch, flags)
    }

    /// See [`FlushIssuer::emit_flush_write`]
    pub fn emit_flush_write(
        &mut self,
        batch: BatchKind,
        flags: PipeControlFlags,
        buffer: BufferHandle,
        offset: u32,
        value: u64,
    ) -> Result<()> {
        self.issuer
            .emit_flush_write(batch, flags, buffer, offset, value)
    }

    /// See [`FlushIssuer::emit_end_of_pipe_sync`]
    pub fn emit_end_of_pipe_sync(
        &mut self,
        batch: BatchKind,
        flags: PipeControlFlags,
    ) -> Result<()> {
        self.issuer.emit_end_of_pipe_sync(batch, flags)
    }

    fn skip(&mut self, kind: BatchKind) {
        log::trace!("pipectl: {} batch idle, no barrier", kind.name());
        self.issuer.note_skipped_batch();
    }

    /// Get the flush issuer
    pub fn issuer(&self) -> &FlushIssuer<E> {
        &self.issuer
    }

    /// Get the mutable flush issuer
    pub fn issuer_mut(&mut self) -> &mut FlushIssuer<E> {
        &mut self.issuer
    }

    /// Get emitter reference
    pub fn emitter(&self) -> &E {
        self.issuer.emitter()
    }

    /// Get mutable emitter reference
    pub fn emitter_mut(&mut self) -> &mut E {
        self.issuer.emitter_mut()
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        self.issuer.stats()
    }

    /// Consume the coordinator, returning its issuer
    pub fn into_issuer(self) -> FlushIssuer<E> {
        self.issuer
    }
}

impl<E: RawCommandEmitter> PipeBarriers for BarrierCoordinator<E> {
    fn texture_barrier(&mut self, batches: &BatchSet) -> Result<()> {
        BarrierCoordinator::texture_barrier(self, batches)
    }

    fn memory_barrier(&mut self, batches: &BatchSet, scope: BarrierScope) -> Result<()> {
        BarrierCoordinator::memory_barrier(self, batches, scope)
    }
}
