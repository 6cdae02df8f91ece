//! Segmented packet buffer pool

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use crate::error::{GridlinkError, Result};

use super::{
    buffer::{PacketBuffer, UNSPECIFIED_REMOTE},
    config::PoolConfig,
    lease::BufferLease,
    segment::{Segment, SegmentId},
    stats::{AtomicPoolStats, PoolStats},
};

/// How newly allocated buffers are stamped with a remote endpoint
///
/// Chosen once at construction; replaces per-buffer decisions at checkout
/// time. A client pool talks to exactly one endpoint for its whole life, so
/// its buffers are stamped up front and never restamped by the pool. A server
/// pool cannot know the sender ahead of time, so its buffers carry the
/// unspecified sentinel until the network layer fills the address in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolMode {
    /// All buffers are stamped with this fixed remote endpoint
    Client(SocketAddr),
    /// Buffers are stamped with `0.0.0.0:0`; the receive path overwrites it
    Server,
}

#[derive(Debug)]
struct PoolInner {
    /// Segments in creation order; the first `min_segments` are never reaped
    segments: Vec<Segment>,
    /// Next segment id, monotonically increasing
    next_segment_id: SegmentId,
}

#[derive(Debug)]
struct Shared {
    config: PoolConfig,
    mode: PoolMode,
    inner: Mutex<PoolInner>,
    stats: AtomicPoolStats,
}

/// A pool of pre-allocated packet buffers, organized into fixed-size segments
///
/// Buffers are handed out as exclusive [`BufferLease`]s and flow back into
/// their slots when the lease is dropped. The pool grows by whole segments
/// under pressure (when `auto_grow` is set) and [`reap_idle`](Self::reap_idle)
/// shrinks it back toward the `min_segments` floor.
///
/// The pool is a cheap handle over shared state: clone it to hand it to the
/// receive thread, send paths, and the reaper. All structural state is
/// guarded by one mutex, held only while scanning and flipping lease state;
/// payload bytes are owned outright by the lease, so they are never touched
/// under the lock.
#[derive(Debug, Clone)]
pub struct PacketBufferPool {
    shared: Arc<Shared>,
}

impl PacketBufferPool {
    /// Create a pool whose buffers are all bound to one fixed remote endpoint
    pub fn client(remote: SocketAddr, config: PoolConfig) -> Result<Self> {
        Self::with_mode(PoolMode::Client(remote), config)
    }

    /// Create a pool for serving many remote endpoints
    ///
    /// Buffers start with the unspecified sentinel address; the network layer
    /// is responsible for setting the real address on every lease.
    pub fn server(config: PoolConfig) -> Result<Self> {
        Self::with_mode(PoolMode::Server, config)
    }

    fn with_mode(mode: PoolMode, config: PoolConfig) -> Result<Self> {
        config.validate()?;

        let shared = Shared {
            config,
            mode,
            inner: Mutex::new(PoolInner {
                segments: Vec::new(),
                next_segment_id: 0,
            }),
            stats: AtomicPoolStats::new(),
        };

        {
            let mut inner = shared.inner.lock().unwrap();
            while inner.segments.len() < shared.config.min_segments {
                let segment = shared.create_segment(&mut inner);
                inner.segments.push(segment);
            }
        }

        Ok(Self {
            shared: Arc::new(shared),
        })
    }

    /// Check a buffer out of the pool
    ///
    /// Scans segments oldest-first so that the newest segments drain toward
    /// fully free and stay eligible for reaping. If every buffer is leased,
    /// a growing pool appends a fresh segment and leases from it; a
    /// non-growing pool fails fast with [`GridlinkError::PoolExhausted`] and
    /// never blocks.
    ///
    /// The returned lease owns the buffer until it is dropped or explicitly
    /// [released](BufferLease::release); the payload length is reset to zero
    /// on every checkout.
    pub fn check_out(&self) -> Result<BufferLease> {
        let mut inner = self.shared.inner.lock().unwrap();

        let free = inner.segments.iter_mut().find_map(|segment| {
            let id = segment.id();
            segment.take_free().map(|(slot, buffer)| (id, slot, buffer))
        });

        if let Some((segment_id, slot, mut buffer)) = free {
            buffer.reset_length();
            drop(inner);

            self.shared.stats.record_checkout();
            return Ok(BufferLease::new(self.clone(), segment_id, slot, buffer));
        }

        if !self.shared.config.auto_grow {
            let capacity = self.shared.config.capacity_for(inner.segments.len());
            drop(inner);

            self.shared.stats.record_checkout_failure();
            trace!(capacity, "checkout failed: pool exhausted");
            return Err(GridlinkError::pool_exhausted(capacity));
        }

        let mut segment = self.shared.create_segment(&mut inner);
        let (slot, mut buffer) = segment
            .take_free()
            .expect("freshly allocated segment has free buffers");
        buffer.reset_length();
        let segment_id = segment.id();
        inner.segments.push(segment);
        drop(inner);

        self.shared.stats.record_checkout();
        Ok(BufferLease::new(self.clone(), segment_id, slot, buffer))
    }

    /// Put a leased buffer back into its slot. Only called by `BufferLease`.
    pub(crate) fn check_in(&self, segment_id: SegmentId, slot: usize, mut buffer: PacketBuffer) {
        buffer.reset_length();

        let mut inner = self.shared.inner.lock().unwrap();
        let segment = inner
            .segments
            .iter_mut()
            .find(|segment| segment.id() == segment_id)
            // A segment with an outstanding lease has an empty slot, so it can
            // never be reaped out from under its lease.
            .unwrap_or_else(|| panic!("returning buffer to missing segment {}", segment_id));

        segment.put_back(slot, buffer);
        drop(inner);

        self.shared.stats.record_return();
    }

    /// Reclaim idle capacity
    ///
    /// Removes every segment beyond the first `min_segments` (in creation
    /// order) whose buffers are all free and whose last checkout or return is
    /// older than `idle_timeout`. Returns the number of segments reclaimed;
    /// a pass that finds nothing eligible is a silent no-op.
    ///
    /// The scan and removal happen under the same lock acquisition as
    /// checkout and return, so a segment can never be reclaimed while a
    /// concurrent checkout is selecting a buffer from it.
    pub fn reap_idle(&self) -> usize {
        let min_segments = self.shared.config.min_segments;
        let idle_timeout = self.shared.config.idle_timeout;

        let mut inner = self.shared.inner.lock().unwrap();
        let mut position = 0;
        let mut reclaimed = 0;

        inner.segments.retain(|segment| {
            let pinned = position < min_segments;
            position += 1;

            if pinned || !segment.all_free() || segment.last_activity().elapsed() < idle_timeout {
                return true;
            }

            debug!(segment = segment.id(), "reclaiming idle buffer pool segment");
            reclaimed += 1;
            false
        });
        drop(inner);

        if reclaimed > 0 {
            self.shared
                .stats
                .record_reclaim(reclaimed, reclaimed * self.shared.config.items_per_segment);
        }
        reclaimed
    }

    /// Number of live segments
    pub fn segment_count(&self) -> usize {
        self.shared.inner.lock().unwrap().segments.len()
    }

    /// Total buffer count across all live segments
    pub fn capacity(&self) -> usize {
        self.shared.config.capacity_for(self.segment_count())
    }

    /// Number of buffers currently leased
    pub fn leased_count(&self) -> usize {
        self.shared.stats.snapshot().currently_leased
    }

    /// The pool's immutable configuration
    pub fn config(&self) -> &PoolConfig {
        &self.shared.config
    }

    /// The addressing mode chosen at construction
    pub fn mode(&self) -> PoolMode {
        self.shared.mode
    }

    /// Snapshot of the pool's activity counters
    pub fn stats(&self) -> PoolStats {
        self.shared.stats.snapshot()
    }
}

impl Shared {
    fn new_buffer(&self) -> PacketBuffer {
        match self.mode {
            PoolMode::Client(remote) => PacketBuffer::new(self.config.buffer_size, remote),
            PoolMode::Server => PacketBuffer::new(self.config.buffer_size, UNSPECIFIED_REMOTE),
        }
    }

    /// Allocate one segment's worth of buffers. Caller holds the pool lock.
    fn create_segment(&self, inner: &mut PoolInner) -> Segment {
        let id = inner.next_segment_id;
        inner.next_segment_id += 1;

        let segment = Segment::new(id, self.config.items_per_segment, || self.new_buffer());
        self.stats.record_growth(self.config.items_per_segment);
        debug!(
            segment = id,
            items = self.config.items_per_segment,
            "allocated buffer pool segment"
        );
        segment
    }
}
