//! Fixed-size segments of pooled buffers

use std::time::Instant;

use super::buffer::PacketBuffer;

/// Identifier for a segment, assigned in creation order and never reused
pub(crate) type SegmentId = u64;

/// A fixed block of buffers allocated together and reclaimed together
///
/// A leased buffer is moved out of its slot for the duration of the lease, so
/// an empty slot is the lease marker; the segment never changes its slot
/// count. Buffers are only ever discarded by dropping the whole segment.
#[derive(Debug)]
pub(crate) struct Segment {
    id: SegmentId,
    /// One slot per buffer; `None` while that buffer is leased
    slots: Vec<Option<PacketBuffer>>,
    /// Most recent checkout or return touching this segment
    last_activity: Instant,
}

impl Segment {
    /// Allocate a segment of `items` buffers produced by `make_buffer`
    pub(crate) fn new<F>(id: SegmentId, items: usize, make_buffer: F) -> Self
    where
        F: Fn() -> PacketBuffer,
    {
        let mut slots = Vec::with_capacity(items);
        for _ in 0..items {
            slots.push(Some(make_buffer()));
        }

        Self {
            id,
            slots,
            last_activity: Instant::now(),
        }
    }

    pub(crate) fn id(&self) -> SegmentId {
        self.id
    }

    pub(crate) fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// True iff no buffer in this segment is currently leased
    pub(crate) fn all_free(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_some())
    }

    /// Take the first free buffer out of its slot, if any
    pub(crate) fn take_free(&mut self) -> Option<(usize, PacketBuffer)> {
        let slot_index = self.slots.iter().position(|slot| slot.is_some())?;
        let buffer = self.slots[slot_index].take();
        self.last_activity = Instant::now();
        buffer.map(|b| (slot_index, b))
    }

    /// Put a leased buffer back into its slot
    ///
    /// Panics if the slot is already occupied: that would mean two live leases
    /// referenced the same buffer, which the pool must never allow.
    pub(crate) fn put_back(&mut self, slot_index: usize, buffer: PacketBuffer) {
        let slot = &mut self.slots[slot_index];
        assert!(
            slot.is_none(),
            "double return of pooled buffer (segment {}, slot {})",
            self.id,
            slot_index
        );
        *slot = Some(buffer);
        self.last_activity = Instant::now();
    }
}
