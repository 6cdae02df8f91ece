//! # Gridlink - virtual-world UDP client substrate
//!
//! Gridlink provides the packet-buffer lifecycle management and core data
//! structures that a real-time virtual-world protocol client is built on.
//! The centerpiece is a segmented buffer pool: every inbound and outbound
//! datagram borrows a pre-allocated [`pool::PacketBuffer`] instead of hitting
//! the allocator per packet, which keeps sustained send/receive loops free of
//! heap churn.
//!
//! ## Features
//!
//! - **Segmented buffer pool**: buffers allocated in fixed-size segments,
//!   leased out through RAII guards, grown under pressure and reaped when idle
//! - **Client and server addressing modes**: buffers pre-stamped with a fixed
//!   endpoint, or left unaddressed for the receive path to fill in
//! - **Idle reaper**: owner-driven or background reclamation of unused
//!   segments, bounded below by a configured floor
//! - **Protocol data structures**: permission masks, a reversible two-key
//!   map, a parent/child inventory store, and traffic counters
//!
//! ## Example
//!
//! ```
//! use gridlink::pool::{PacketBufferPool, PoolConfig};
//!
//! let pool = PacketBufferPool::server(PoolConfig::new().with_items_per_segment(16))?;
//!
//! let mut lease = pool.check_out()?;
//! lease.raw_mut()[..3].copy_from_slice(b"hi!");
//! lease.set_data_length(3)?;
//! assert_eq!(lease.payload(), b"hi!");
//! // Dropping the lease returns the buffer to the pool.
//! # Ok::<(), gridlink::GridlinkError>(())
//! ```
//!
//! The socket loop, datagram framing, zero-run compaction codec, and session
//! handshake live outside this crate; they consume leased buffers through the
//! interfaces here.

pub mod dict;
pub mod error;
pub mod inventory;
pub mod math;
pub mod permissions;
pub mod pool;
pub mod traffic;

// Re-export main types
pub use dict::DoubleKeyMap;
pub use error::{GridlinkError, Result};
pub use inventory::InventoryStore;
pub use permissions::{PermissionMask, Permissions};
pub use pool::{
    BufferLease, IdleReaper, PacketBuffer, PacketBufferPool, PoolConfig, PoolMode, PoolStats,
    ReaperGuard, DEFAULT_BUFFER_SIZE,
};
pub use traffic::{TrafficSnapshot, TrafficStats};
