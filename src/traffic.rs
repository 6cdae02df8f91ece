//! Connection traffic counters

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Point-in-time snapshot of a connection's traffic counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrafficSnapshot {
    pub sent_packets: u64,
    pub recv_packets: u64,
    pub sent_bytes: u64,
    pub recv_bytes: u64,
    /// Packets retransmitted after an ack timeout
    pub resent_packets: u64,
    /// Most recent measured round-trip time, in milliseconds
    pub last_ping_ms: u32,
}

impl TrafficSnapshot {
    /// Mean payload size of sent packets, in bytes
    pub fn mean_sent_size(&self) -> f64 {
        if self.sent_packets == 0 {
            return 0.0;
        }
        self.sent_bytes as f64 / self.sent_packets as f64
    }

    /// Fraction of sent packets that were retransmissions (0.0 to 1.0)
    pub fn resend_rate(&self) -> f64 {
        if self.sent_packets == 0 {
            return 0.0;
        }
        self.resent_packets as f64 / self.sent_packets as f64
    }
}

/// Thread-safe traffic counters, updated from the send and receive paths
#[derive(Debug, Default)]
pub struct TrafficStats {
    sent_packets: AtomicU64,
    recv_packets: AtomicU64,
    sent_bytes: AtomicU64,
    recv_bytes: AtomicU64,
    resent_packets: AtomicU64,
    last_ping_ms: AtomicU32,
}

impl TrafficStats {
    pub fn new() -> Self {
        Default::default()
    }

    /// Record a completed outbound send
    pub fn record_sent(&self, bytes: usize) {
        self.sent_packets.fetch_add(1, Ordering::Relaxed);
        self.sent_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Record an inbound datagram
    pub fn record_received(&self, bytes: usize) {
        self.recv_packets.fetch_add(1, Ordering::Relaxed);
        self.recv_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Record a retransmission (also counted as a send by the caller)
    pub fn record_resent(&self) {
        self.resent_packets.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a measured round-trip time
    pub fn record_ping(&self, round_trip_ms: u32) {
        self.last_ping_ms.store(round_trip_ms, Ordering::Relaxed);
    }

    /// Get a snapshot of the counters
    pub fn snapshot(&self) -> TrafficSnapshot {
        TrafficSnapshot {
            sent_packets: self.sent_packets.load(Ordering::Relaxed),
            recv_packets: self.recv_packets.load(Ordering::Relaxed),
            sent_bytes: self.sent_bytes.load(Ordering::Relaxed),
            recv_bytes: self.recv_bytes.load(Ordering::Relaxed),
            resent_packets: self.resent_packets.load(Ordering::Relaxed),
            last_ping_ms: self.last_ping_ms.load(Ordering::Relaxed),
        }
    }
}
