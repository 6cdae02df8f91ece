//! Scoped leases over pooled buffers

use std::ops::{Deref, DerefMut};

use super::{buffer::PacketBuffer, pool::PacketBufferPool, segment::SegmentId};

/// Exclusive lease over one pooled [`PacketBuffer`]
///
/// The lease owns the buffer outright for its lifetime, so payload access
/// needs no further synchronization and no other lease can alias the same
/// buffer. The buffer flows back to its pool slot when the lease is dropped,
/// on every exit path; [`release`](Self::release) exists for call sites that
/// want the return to be explicit.
#[derive(Debug)]
pub struct BufferLease {
    pool: PacketBufferPool,
    segment_id: SegmentId,
    slot: usize,
    /// Always `Some` until drop or release takes it
    buffer: Option<PacketBuffer>,
}

impl BufferLease {
    pub(crate) fn new(
        pool: PacketBufferPool,
        segment_id: SegmentId,
        slot: usize,
        buffer: PacketBuffer,
    ) -> Self {
        Self {
            pool,
            segment_id,
            slot,
            buffer: Some(buffer),
        }
    }

    /// Return the buffer to its pool now instead of at end of scope
    pub fn release(self) {
        // Drop does the actual work.
    }

    /// The pool this lease was checked out of
    pub fn pool(&self) -> &PacketBufferPool {
        &self.pool
    }
}

impl Deref for BufferLease {
    type Target = PacketBuffer;

    fn deref(&self) -> &Self::Target {
        self.buffer.as_ref().unwrap()
    }
}

impl DerefMut for BufferLease {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.buffer.as_mut().unwrap()
    }
}

impl Drop for BufferLease {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.check_in(self.segment_id, self.slot, buffer);
        }
    }
}
