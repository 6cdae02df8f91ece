//! Pooled packet buffer management
//!
//! Every inbound and outbound datagram in the client is backed by a buffer
//! from this module, avoiding per-packet heap allocation under sustained
//! load. Buffers live in fixed-size, eagerly allocated segments; the pool
//! grows by whole segments when demand outstrips capacity and the idle
//! reaper releases whole segments back once they have gone unused long
//! enough, never dipping below the configured floor.

pub mod buffer;
pub mod config;
pub mod lease;
pub mod pool;
pub mod reaper;
pub mod stats;

mod segment;

// Re-export main types
pub use buffer::{PacketBuffer, UNSPECIFIED_REMOTE};
pub use config::{PoolConfig, DEFAULT_BUFFER_SIZE, DEFAULT_IDLE_TIMEOUT};
pub use lease::BufferLease;
pub use pool::{PacketBufferPool, PoolMode};
pub use reaper::{IdleReaper, ReaperGuard};
pub use stats::{AtomicPoolStats, PoolStats};
