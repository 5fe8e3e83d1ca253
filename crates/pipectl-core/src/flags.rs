//! # Pipe-Control Flags
//!
//! Logical flush / invalidate / control bits carried by a GPU pipe-control
//! command, and the resource scopes a memory barrier can name.
//!
//! The bit values are logical, not hardware encodings. Emitters translate
//! them into whatever a given hardware generation expects. What matters to
//! the synchronization logic is the grouping:
//!
//! - **Flush** bits push dirty lines of a write cache out to memory.
//! - **Invalidate** bits discard read caches so later reads refetch.
//! - **Control** bits stall the pipeline or request a post-sync write.
//!
//! Mixing a flush and an invalidate in one command is racy, which is why
//! the groups are kept disjoint and exposed as named masks.

use static_assertions::const_assert_eq;

// =============================================================================
// PIPE CONTROL FLAGS
// =============================================================================

bitflags::bitflags! {
    /// Actions a single pipe-control command can request
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PipeControlFlags: u32 {
        // ---------------------------------------------------------------------
        // Write-cache flushes
        // ---------------------------------------------------------------------
        /// Flush the render target cache
        const RENDER_TARGET_FLUSH = 1 << 0;
        /// Flush the depth cache
        const DEPTH_CACHE_FLUSH = 1 << 1;
        /// Flush the data port cache (shader storage / image writes)
        const DATA_CACHE_FLUSH = 1 << 2;

        // ---------------------------------------------------------------------
        // Read-cache invalidations
        // ---------------------------------------------------------------------
        /// Invalidate the sampler / texture cache
        const TEXTURE_CACHE_INVALIDATE = 1 << 8;
        /// Invalidate the constant cache
        const CONST_CACHE_INVALIDATE = 1 << 9;
        /// Invalidate the vertex fetch cache
        const VF_CACHE_INVALIDATE = 1 << 10;
        /// Invalidate the state cache
        const STATE_CACHE_INVALIDATE = 1 << 11;
        /// Invalidate the instruction cache
        const INSTRUCTION_INVALIDATE = 1 << 12;

        // ---------------------------------------------------------------------
        // Stalls and post-sync operations
        // ---------------------------------------------------------------------
        /// Command streamer stall: wait for prior work to drain
        const CS_STALL = 1 << 16;
        /// Stall at the pixel scoreboard
        const STALL_AT_SCOREBOARD = 1 << 17;
        /// Stall until depth writes complete
        const DEPTH_STALL = 1 << 18;
        /// Raise a notify interrupt when the command completes
        const NOTIFY_ENABLE = 1 << 19;
        /// Invalidate the GPU TLB
        const TLB_INVALIDATE = 1 << 20;
        /// Post-sync: write an immediate 64-bit value
        const WRITE_IMMEDIATE = 1 << 24;
        /// Post-sync: write the GPU timestamp
        const WRITE_TIMESTAMP = 1 << 25;
        /// Post-sync: write the pixel depth count
        const WRITE_DEPTH_COUNT = 1 << 26;

        // ---------------------------------------------------------------------
        // Groups
        // ---------------------------------------------------------------------
        /// Every write-cache flush bit
        const CACHE_FLUSH_BITS = Self::RENDER_TARGET_FLUSH.bits()
            | Self::DEPTH_CACHE_FLUSH.bits()
            | Self::DATA_CACHE_FLUSH.bits();
        /// Every read-cache invalidate bit
        const CACHE_INVALIDATE_BITS = Self::TEXTURE_CACHE_INVALIDATE.bits()
            | Self::CONST_CACHE_INVALIDATE.bits()
            | Self::VF_CACHE_INVALIDATE.bits()
            | Self::STATE_CACHE_INVALIDATE.bits()
            | Self::INSTRUCTION_INVALIDATE.bits();
        /// Post-sync write purposes; a write target needs exactly one
        const WRITE_BITS = Self::WRITE_IMMEDIATE.bits()
            | Self::WRITE_TIMESTAMP.bits()
            | Self::WRITE_DEPTH_COUNT.bits();
    }
}

const_assert_eq!(
    PipeControlFlags::CACHE_FLUSH_BITS.bits() & PipeControlFlags::CACHE_INVALIDATE_BITS.bits(),
    0
);
const_assert_eq!(
    PipeControlFlags::CACHE_FLUSH_BITS.bits() & PipeControlFlags::WRITE_BITS.bits(),
    0
);
const_assert_eq!(
    PipeControlFlags::CACHE_INVALIDATE_BITS.bits() & PipeControlFlags::WRITE_BITS.bits(),
    0
);

impl PipeControlFlags {
    /// The flush bits of this set
    #[inline]
    pub const fn flush_bits(self) -> Self {
        self.intersection(Self::CACHE_FLUSH_BITS)
    }

    /// The invalidate bits of this set
    #[inline]
    pub const fn invalidate_bits(self) -> Self {
        self.intersection(Self::CACHE_INVALIDATE_BITS)
    }

    /// The post-sync write bits of this set
    #[inline]
    pub const fn write_bits(self) -> Self {
        self.intersection(Self::WRITE_BITS)
    }

    /// True when the set both flushes and invalidates.
    ///
    /// Such a command can invalidate a read cache before the flushed data
    /// has landed in memory, so it must be split before emission.
    #[inline]
    pub const fn flushes_and_invalidates(self) -> bool {
        self.intersects(Self::CACHE_FLUSH_BITS) && self.intersects(Self::CACHE_INVALIDATE_BITS)
    }

    /// True when exactly one post-sync write purpose is set
    #[inline]
    pub const fn has_single_write_purpose(self) -> bool {
        self.write_bits().bits().count_ones() == 1
    }
}

// =============================================================================
// BARRIER SCOPE
// =============================================================================

bitflags::bitflags! {
    /// Resource kinds that must observe prior shader writes after a memory
    /// barrier
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BarrierScope: u32 {
        /// Memory mapped by the host
        const MAPPED_BUFFER = 1 << 0;
        /// Vertex buffer reads
        const VERTEX_BUFFER = 1 << 1;
        /// Index buffer reads
        const INDEX_BUFFER = 1 << 2;
        /// Constant (uniform) buffer reads
        const CONSTANT_BUFFER = 1 << 3;
        /// Indirect draw / dispatch argument reads
        const INDIRECT_BUFFER = 1 << 4;
        /// Texture sampling
        const TEXTURE = 1 << 5;
        /// Shader image load/store
        const IMAGE = 1 << 6;
        /// Framebuffer attachment access
        const FRAMEBUFFER = 1 << 7;
        /// Shader storage buffer access
        const SHADER_BUFFER = 1 << 8;
        /// Query result buffers
        const QUERY_BUFFER = 1 << 9;
        /// Stream output targets
        const STREAMOUT_BUFFER = 1 << 10;
        /// Global (raw address) buffers
        const GLOBAL_BUFFER = 1 << 11;
        /// Buffer updates via copy or upload
        const UPDATE_BUFFER = 1 << 12;
        /// Texture updates via copy or upload
        const UPDATE_TEXTURE = 1 << 13;

        /// Everything a vertex fetch can read
        const VERTEX_FETCH = Self::VERTEX_BUFFER.bits()
            | Self::INDEX_BUFFER.bits()
            | Self::INDIRECT_BUFFER.bits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_are_disjoint() {
        assert!(!PipeControlFlags::CACHE_FLUSH_BITS.intersects(PipeControlFlags::CACHE_INVALIDATE_BITS));
        assert!(!PipeControlFlags::CACHE_FLUSH_BITS.intersects(PipeControlFlags::CS_STALL));
        assert!(!PipeControlFlags::WRITE_BITS.intersects(PipeControlFlags::CACHE_INVALIDATE_BITS));
    }

    #[test]
    fn test_flushes_and_invalidates() {
        let mixed = PipeControlFlags::DATA_CACHE_FLUSH | PipeControlFlags::TEXTURE_CACHE_INVALIDATE;
        assert!(mixed.flushes_and_invalidates());

        let flush_only = PipeControlFlags::RENDER_TARGET_FLUSH | PipeControlFlags::CS_STALL;
        assert!(!flush_only.flushes_and_invalidates());

        let invalidate_only =
            PipeControlFlags::VF_CACHE_INVALIDATE | PipeControlFlags::CONST_CACHE_INVALIDATE;
        assert!(!invalidate_only.flushes_and_invalidates());

        assert!(!PipeControlFlags::empty().flushes_and_invalidates());
    }

    #[test]
    fn test_group_extraction() {
        let flags = PipeControlFlags::DEPTH_CACHE_FLUSH
            | PipeControlFlags::TEXTURE_CACHE_INVALIDATE
            | PipeControlFlags::CS_STALL
            | PipeControlFlags::WRITE_TIMESTAMP;

        assert_eq!(flags.flush_bits(), PipeControlFlags::DEPTH_CACHE_FLUSH);
        assert_eq!(flags.invalidate_bits(), PipeControlFlags::TEXTURE_CACHE_INVALIDATE);
        assert_eq!(flags.write_bits(), PipeControlFlags::WRITE_TIMESTAMP);
    }

    #[test]
    fn test_single_write_purpose() {
        assert!(PipeControlFlags::WRITE_IMMEDIATE.has_single_write_purpose());
        assert!((PipeControlFlags::CS_STALL | PipeControlFlags::WRITE_DEPTH_COUNT)
            .has_single_write_purpose());
        assert!(!PipeControlFlags::CS_STALL.has_single_write_purpose());
        assert!(!(PipeControlFlags::WRITE_IMMEDIATE | PipeControlFlags::WRITE_TIMESTAMP)
            .has_single_write_purpose());
    }

    #[test]
    fn test_vertex_fetch_scope() {
        assert!(BarrierScope::VERTEX_FETCH.contains(BarrierScope::INDIRECT_BUFFER));
        assert!(!BarrierScope::VERTEX_FETCH.intersects(BarrierScope::CONSTANT_BUFFER));
    }
}
