//! # Batch State
//!
//! What the synchronization logic is allowed to know about a batch.
//!
//! A batch is one independently scheduled command stream. The driver
//! context owns the batches and updates their bookkeeping as it records
//! draws and dispatches; barriers only read a snapshot of it.

use core::ops::{Index, IndexMut};

// =============================================================================
// BATCH KIND
// =============================================================================

/// Number of batches per context
pub const BATCH_COUNT: usize = 2;

/// The independent command streams of a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(usize)]
pub enum BatchKind {
    /// 3D rendering stream
    Render = 0,
    /// Compute stream
    Compute = 1,
}

impl BatchKind {
    /// All batches, in index order
    pub const ALL: [BatchKind; BATCH_COUNT] = [BatchKind::Render, BatchKind::Compute];

    /// Index into per-batch arrays
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short name for logs
    pub const fn name(self) -> &'static str {
        match self {
            BatchKind::Render => "render",
            BatchKind::Compute => "compute",
        }
    }
}

// =============================================================================
// BATCH STATE
// =============================================================================

/// Outstanding work recorded into a batch since its last synchronization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchState {
    /// A draw or dispatch was recorded and not yet flushed
    pub contains_draw: bool,
    /// Surfaces with possibly dirty render-cache lines
    pub render_cache_entries: u32,
    /// Surfaces with possibly dirty depth-cache lines
    pub depth_cache_entries: u32,
}

impl BatchState {
    /// A batch with nothing outstanding
    pub const IDLE: Self = Self {
        contains_draw: false,
        render_cache_entries: 0,
        depth_cache_entries: 0,
    };

    /// A batch with an unflushed draw or dispatch and clean caches
    pub const fn with_draw() -> Self {
        Self {
            contains_draw: true,
            ..Self::IDLE
        }
    }

    /// True when a draw or dispatch is outstanding
    #[inline]
    pub const fn has_pending_work(&self) -> bool {
        self.contains_draw
    }

    /// True when the render cache may hold writes
    #[inline]
    pub const fn has_render_cache_entries(&self) -> bool {
        self.render_cache_entries != 0
    }

    /// True when the depth cache may hold writes
    #[inline]
    pub const fn has_depth_cache_entries(&self) -> bool {
        self.depth_cache_entries != 0
    }
}

// =============================================================================
// BATCH SET
// =============================================================================

/// Snapshot of every batch of a context, indexed by [`BatchKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSet {
    states: [BatchState; BATCH_COUNT],
}

impl BatchSet {
    /// All batches idle
    pub const fn idle() -> Self {
        Self {
            states: [BatchState::IDLE; BATCH_COUNT],
        }
    }

    /// Build from explicit render and compute states
    pub const fn new(render: BatchState, compute: BatchState) -> Self {
        Self {
            states: [render, compute],
        }
    }

    /// State of one batch
    #[inline]
    pub fn get(&self, kind: BatchKind) -> &BatchState {
        &self.states[kind.index()]
    }

    /// Iterate batches in index order
    pub fn iter(&self) -> impl Iterator<Item = (BatchKind, &BatchState)> + '_ {
        BatchKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

impl Index<BatchKind> for BatchSet {
    type Output = BatchState;

    fn index(&self, kind: BatchKind) -> &BatchState {
        &self.states[kind.index()]
    }
}

impl IndexMut<BatchKind> for BatchSet {
    fn index_mut(&mut self, kind: BatchKind) -> &mut BatchState {
        &mut self.states[kind.index()]
    }
}
