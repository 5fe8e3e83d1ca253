//! Synchronization statistics.

/// Counters kept by a flush issuer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStats {
    /// `emit_flush` calls
    pub flushes: u64,
    /// Flushes split around an end-of-pipe sync
    pub split_flushes: u64,
    /// End-of-pipe syncs, direct or from a split
    pub end_of_pipe_syncs: u64,
    /// `emit_flush_write` calls
    pub write_flushes: u64,
    /// Commands handed to the emitter
    pub raw_commands: u64,
    /// Batches a barrier left untouched
    pub skipped_batches: u64,
}

impl SyncStats {
    /// Zero every counter
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
