//! Packet buffer pool configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default capacity of the payload and scratch regions, in bytes
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Default age a fully idle segment must reach before it is reclaimed
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Configuration for packet buffer pools
///
/// Immutable once the pool has been constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Capacity of each buffer's payload region (the scratch region is the same size)
    pub buffer_size: usize,
    /// Number of buffers allocated together per segment
    pub items_per_segment: usize,
    /// Number of segments allocated at construction; reaping never goes below this
    pub min_segments: usize,
    /// Whether checkout appends a new segment instead of failing when every
    /// buffer is leased
    pub auto_grow: bool,
    /// Age a fully free segment must reach before it is eligible for reclamation
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            items_per_segment: 32,
            min_segments: 1,
            auto_grow: true,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

impl PoolConfig {
    /// Create a configuration with the default geometry
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the buffer capacity
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Set the number of buffers per segment
    pub fn with_items_per_segment(mut self, count: usize) -> Self {
        self.items_per_segment = count;
        self
    }

    /// Set the minimum segment count
    pub fn with_min_segments(mut self, count: usize) -> Self {
        self.min_segments = count;
        self
    }

    /// Enable or disable growth on exhaustion
    pub fn with_auto_grow(mut self, auto_grow: bool) -> Self {
        self.auto_grow = auto_grow;
        self
    }

    /// Set the idle age required before a segment can be reclaimed
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::GridlinkError;

        if self.buffer_size == 0 {
            return Err(GridlinkError::invalid_parameter(
                "buffer_size",
                "Buffer size cannot be zero",
            ));
        }

        if self.items_per_segment == 0 {
            return Err(GridlinkError::invalid_parameter(
                "items_per_segment",
                "Segments must hold at least one buffer",
            ));
        }

        if self.min_segments == 0 {
            return Err(GridlinkError::invalid_parameter(
                "min_segments",
                "At least one segment must always exist",
            ));
        }

        Ok(())
    }

    /// Total buffer count for a given segment count
    pub fn capacity_for(&self, segment_count: usize) -> usize {
        segment_count * self.items_per_segment
    }
}
