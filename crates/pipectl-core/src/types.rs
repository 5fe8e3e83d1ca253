//! # pipectl Core Types
//!
//! Handles and write targets referenced by synchronization commands.
//!
//! Buffers are owned and allocated elsewhere; this crate only names them.

use core::fmt;

// =============================================================================
// HANDLE TYPES
// =============================================================================

/// Opaque handle to a GPU resource
///
/// Handles are type-safe wrappers that prevent mixing different resource types.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Handle<T> {
    id: u64,
    _marker: core::marker::PhantomData<T>,
}

impl<T> Handle<T> {
    /// Create a new handle
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self {
            id,
            _marker: core::marker::PhantomData,
        }
    }

    /// Get the raw ID
    #[inline]
    pub const fn id(self) -> u64 {
        self.id
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = core::any::type_name::<T>();
        let short = name.rsplit("::").next().unwrap_or(name);
        write!(f, "Handle<{}>(0x{:x})", short, self.id)
    }
}

/// Marker for buffer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferMarker;

/// Handle to a GPU buffer object
pub type BufferHandle = Handle<BufferMarker>;

// =============================================================================
// WRITE TARGET
// =============================================================================

/// Destination of a post-sync write
///
/// Only meaningful together with one of
/// [`PipeControlFlags::WRITE_BITS`](crate::flags::PipeControlFlags::WRITE_BITS).
/// For timestamp and depth-count writes the hardware supplies the data and
/// `value` is ignored by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriteTarget {
    /// Buffer receiving the write
    pub buffer: BufferHandle,
    /// Byte offset into the buffer
    pub offset: u32,
    /// Immediate value
    pub value: u64,
}

impl WriteTarget {
    /// Create a write target
    #[inline]
    pub const fn new(buffer: BufferHandle, offset: u32, value: u64) -> Self {
        Self {
            buffer,
            offset,
            value,
        }
    }
}

// =============================================================================
// WORKAROUND BUFFER
// =============================================================================

/// Always-resident scratch buffer owned by the device context
///
/// It only ever receives throwaway writes from end-of-pipe syncs. Nothing
/// reads it back, so a single buffer is shared by every batch of a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkaroundBuffer {
    buffer: BufferHandle,
}

impl WorkaroundBuffer {
    /// Wrap the context's scratch buffer
    #[inline]
    pub const fn new(buffer: BufferHandle) -> Self {
        Self { buffer }
    }

    /// Underlying buffer handle
    #[inline]
    pub const fn buffer(self) -> BufferHandle {
        self.buffer
    }

    /// The sacrificial write target: offset 0, value 0
    #[inline]
    pub const fn sync_target(self) -> WriteTarget {
        WriteTarget::new(self.buffer, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::format;

    #[test]
    fn test_sync_target_is_fixed() {
        let wa = WorkaroundBuffer::new(BufferHandle::new(0x42));
        let target = wa.sync_target();
        assert_eq!(target.buffer, BufferHandle::new(0x42));
        assert_eq!(target.offset, 0);
        assert_eq!(target.value, 0);
    }

    #[test]
    fn test_handle_debug() {
        let handle = BufferHandle::new(0x1f);
        assert_eq!(format!("{:?}", handle), "Handle<BufferMarker>(0x1f)");
    }
}
