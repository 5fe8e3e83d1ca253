//! # Raw Command Emitter
//!
//! The seam between synchronization decisions and hardware encoding.
//!
//! An emitter receives one already-decided pipe-control request and writes
//! the corresponding hardware command into the batch. Generation-specific
//! workarounds (extra stalls, scoreboard bits, dummy commands) belong in the
//! emitter, never in the callers.

use pipectl_core::{PipeControlFlags, Result, WriteTarget};

use crate::batch::BatchKind;

// =============================================================================
// EMITTER TRAIT
// =============================================================================

/// Encoder for a single pipe-control command
pub trait RawCommandEmitter {
    /// Encode one command with `flags` into `batch`.
    ///
    /// `write` is `Some` exactly when the command carries a post-sync write.
    /// An error is fatal to the caller; the command is assumed not emitted.
    fn emit_raw_pipe_control(
        &mut self,
        batch: BatchKind,
        flags: PipeControlFlags,
        write: Option<WriteTarget>,
    ) -> Result<()>;

    /// Get emitter name
    fn name(&self) -> &'static str {
        "raw"
    }
}

impl<E: RawCommandEmitter + ?Sized> RawCommandEmitter for &mut E {
    fn emit_raw_pipe_control(
        &mut self,
        batch: BatchKind,
        flags: PipeControlFlags,
        write: Option<WriteTarget>,
    ) -> Result<()> {
        (**self).emit_raw_pipe_control(batch, flags, write)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[cfg(any(feature = "alloc", test))]
impl<E: RawCommandEmitter + ?Sized> RawCommandEmitter for alloc::boxed::Box<E> {
    fn emit_raw_pipe_control(
        &mut self,
        batch: BatchKind,
        flags: PipeControlFlags,
        write: Option<WriteTarget>,
    ) -> Result<()> {
        (**self).emit_raw_pipe_control(batch, flags, write)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

// =============================================================================
// PIPE CONTROL
// =============================================================================

/// One decided pipe-control command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipeControl {
    /// Target batch
    pub batch: BatchKind,
    /// Requested actions
    pub flags: PipeControlFlags,
    /// Post-sync write, if any
    pub write: Option<WriteTarget>,
}

impl PipeControl {
    /// A command with no post-sync write
    pub const fn flush(batch: BatchKind, flags: PipeControlFlags) -> Self {
        Self {
            batch,
            flags,
            write: None,
        }
    }

    /// A command carrying a post-sync write
    pub const fn write(batch: BatchKind, flags: PipeControlFlags, target: WriteTarget) -> Self {
        Self {
            batch,
            flags,
            write: Some(target),
        }
    }
}

// =============================================================================
// RECORDING EMITTER
// =============================================================================

#[cfg(any(feature = "alloc", test))]
pub use recording::RecordingEmitter;

#[cfg(any(feature = "alloc", test))]
mod recording {
    use alloc::vec::Vec;

    use pipectl_core::{Error, PipeControlFlags, Result, WriteTarget};

    use super::{PipeControl, RawCommandEmitter};
    use crate::batch::BatchKind;

    /// In-memory command stream
    ///
    /// Records every command in submission order instead of encoding it.
    /// Can be told to fail after a number of commands to exercise error paths.
    #[derive(Debug, Default)]
    pub struct RecordingEmitter {
        commands: Vec<PipeControl>,
        fail_after: Option<usize>,
    }

    impl RecordingEmitter {
        /// Create an empty recorder
        pub fn new() -> Self {
            Self::default()
        }

        /// Recorder that accepts `count` commands, then fails every
        /// following one with [`Error::CommandBufferFull`]
        pub fn failing_after(count: usize) -> Self {
            Self {
                commands: Vec::new(),
                fail_after: Some(count),
            }
        }

        /// Every recorded command, oldest first
        pub fn commands(&self) -> &[PipeControl] {
            &self.commands
        }

        /// Commands recorded into one batch, oldest first
        pub fn for_batch(&self, batch: BatchKind) -> impl Iterator<Item = &PipeControl> + '_ {
            self.commands.iter().filter(move |cmd| cmd.batch == batch)
        }

        /// Number of recorded commands
        pub fn len(&self) -> usize {
            self.commands.len()
        }

        /// True when nothing was recorded
        pub fn is_empty(&self) -> bool {
            self.commands.is_empty()
        }

        /// Drop recorded commands, keeping the failure setting
        pub fn clear(&mut self) {
            self.commands.clear();
        }

        /// Take the recorded commands
        pub fn take(&mut self) -> Vec<PipeControl> {
            core::mem::take(&mut self.commands)
        }
    }

    impl RawCommandEmitter for RecordingEmitter {
        fn emit_raw_pipe_control(
            &mut self,
            batch: BatchKind,
            flags: PipeControlFlags,
            write: Option<WriteTarget>,
        ) -> Result<()> {
            if self.fail_after.is_some_and(|limit| self.commands.len() >= limit) {
                return Err(Error::CommandBufferFull);
            }

            self.commands.push(PipeControl { batch, flags, write });
            Ok(())
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;
    use pipectl_core::{BufferHandle, Error};

    #[test]
    fn test_recording_order() {
        let mut rec = RecordingEmitter::new();
        rec.emit_raw_pipe_control(BatchKind::Render, PipeControlFlags::CS_STALL, None)
            .unwrap();
        rec.emit_raw_pipe_control(
            BatchKind::Compute,
            PipeControlFlags::TEXTURE_CACHE_INVALIDATE,
            None,
        )
        .unwrap();

        assert_eq!(rec.len(), 2);
        assert_eq!(
            rec.commands()[0],
            PipeControl::flush(BatchKind::Render, PipeControlFlags::CS_STALL)
        );
        assert_eq!(rec.for_batch(BatchKind::Compute).count(), 1);
    }

    #[test]
    fn test_failing_after() {
        let mut rec = RecordingEmitter::failing_after(1);
        assert!(rec
            .emit_raw_pipe_control(BatchKind::Render, PipeControlFlags::CS_STALL, None)
            .is_ok());
        assert_eq!(
            rec.emit_raw_pipe_control(BatchKind::Render, PipeControlFlags::CS_STALL, None),
            Err(Error::CommandBufferFull)
        );
        assert_eq!(rec.len(), 1);
    }

    fn emit_write<E: RawCommandEmitter>(mut emitter: E, target: WriteTarget) -> &'static str {
        emitter
            .emit_raw_pipe_control(BatchKind::Render, PipeControlFlags::WRITE_IMMEDIATE, Some(target))
            .unwrap();
        emitter.name()
    }

    #[test]
    fn test_forwarding_impls() {
        let target = WriteTarget::new(BufferHandle::new(7), 16, 99);

        let mut rec = RecordingEmitter::new();
        assert_eq!(emit_write(&mut rec, target), "recording");
        assert_eq!(rec.commands()[0].write, Some(target));

        let boxed: Box<dyn RawCommandEmitter> = Box::new(RecordingEmitter::new());
        assert_eq!(emit_write(boxed, target), "recording");
    }

    #[test]
    fn test_take_and_clear() {
        let mut rec = RecordingEmitter::new();
        rec.emit_raw_pipe_control(BatchKind::Render, PipeControlFlags::CS_STALL, None)
            .unwrap();
        let taken = rec.take();
        assert_eq!(taken.len(), 1);
        assert!(rec.is_empty());

        rec.emit_raw_pipe_control(BatchKind::Render, PipeControlFlags::CS_STALL, None)
            .unwrap();
        rec.clear();
        assert!(rec.is_empty());
    }
}
