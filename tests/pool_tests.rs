//! Integration tests for the packet buffer pool lifecycle:
//! growth arithmetic, idle reclamation, and addressing modes.

use std::net::SocketAddr;
use std::time::Duration;

use gridlink::pool::{
    IdleReaper, PacketBufferPool, PoolConfig, PoolMode, UNSPECIFIED_REMOTE,
};
use gridlink::GridlinkError;

fn config(items_per_segment: usize, min_segments: usize) -> PoolConfig {
    PoolConfig::new()
        .with_buffer_size(256)
        .with_items_per_segment(items_per_segment)
        .with_min_segments(min_segments)
        .with_idle_timeout(Duration::ZERO)
}

#[test]
fn growing_pool_never_fails() {
    let pool = PacketBufferPool::server(config(8, 2)).unwrap();

    let mut leases = Vec::new();
    for _ in 0..50 {
        leases.push(pool.check_out().unwrap());
    }

    // ceil(50 / 8) = 7 segments, above the floor of 2
    assert_eq!(pool.segment_count(), 7);
    assert_eq!(pool.capacity(), 56);
    assert_eq!(pool.leased_count(), 50);
}

#[test]
fn growth_respects_minimum_floor() {
    // Fewer leases than the initial capacity: no growth happens.
    let pool = PacketBufferPool::server(config(8, 4)).unwrap();
    let _leases: Vec<_> = (0..10).map(|_| pool.check_out().unwrap()).collect();
    assert_eq!(pool.segment_count(), 4);
}

#[test]
fn seventeen_checkouts_make_two_segments_of_sixteen() {
    let pool = PacketBufferPool::server(config(16, 1)).unwrap();

    let leases: Vec<_> = (0..17).map(|_| pool.check_out().unwrap()).collect();
    assert_eq!(pool.segment_count(), 2);
    assert_eq!(pool.capacity(), 32);

    // Every lease references a distinct buffer: writing a marker through one
    // lease never shows up through another.
    let mut leases = leases;
    for (i, lease) in leases.iter_mut().enumerate() {
        lease.raw_mut()[0] = i as u8;
        lease.set_data_length(1).unwrap();
    }
    for (i, lease) in leases.iter().enumerate() {
        assert_eq!(lease.payload()[0], i as u8);
    }
}

#[test]
fn reap_shrinks_back_to_floor_without_leaks() {
    let pool = PacketBufferPool::server(config(16, 1)).unwrap();

    let leases: Vec<_> = (0..17).map(|_| pool.check_out().unwrap()).collect();
    assert_eq!(pool.segment_count(), 2);

    drop(leases);
    assert_eq!(pool.leased_count(), 0);

    // idle_timeout is zero, so one pass reclaims everything above the floor.
    assert_eq!(pool.reap_idle(), 1);
    assert_eq!(pool.segment_count(), 1);
    assert_eq!(pool.capacity(), 16);

    // Repeated reaping never digs below the floor.
    assert_eq!(pool.reap_idle(), 0);
    assert_eq!(pool.segment_count(), 1);
}

#[test]
fn reap_skips_segments_with_live_leases() {
    let pool = PacketBufferPool::server(config(1, 1)).unwrap();

    // Three segments: the floor, one fully free, one still leased.
    let a = pool.check_out().unwrap();
    let b = pool.check_out().unwrap();
    let c = pool.check_out().unwrap();
    assert_eq!(pool.segment_count(), 3);
    drop(b);

    assert_eq!(pool.reap_idle(), 1);
    assert_eq!(pool.segment_count(), 2);

    drop(a);
    drop(c);
    assert_eq!(pool.reap_idle(), 1);
    assert_eq!(pool.segment_count(), 1);
}

#[test]
fn non_growing_pool_fails_fast() {
    let pool = PacketBufferPool::server(config(2, 1).with_auto_grow(false)).unwrap();

    let _a = pool.check_out().unwrap();
    let _b = pool.check_out().unwrap();

    match pool.check_out() {
        Err(GridlinkError::PoolExhausted { capacity }) => assert_eq!(capacity, 2),
        other => panic!("expected PoolExhausted, got {:?}", other.map(|_| ())),
    }

    // A return makes checkout succeed again.
    drop(_a);
    assert!(pool.check_out().is_ok());
}

#[test]
fn client_mode_stamps_fixed_address_everywhere() {
    let remote: SocketAddr = "198.51.100.7:9000".parse().unwrap();
    let pool = PacketBufferPool::client(remote, config(2, 1)).unwrap();
    assert_eq!(pool.mode(), PoolMode::Client(remote));

    // Buffers from the initial segment and from growth segments alike carry
    // the fixed address.
    let leases: Vec<_> = (0..5).map(|_| pool.check_out().unwrap()).collect();
    assert!(pool.segment_count() > 1);
    for lease in &leases {
        assert_eq!(lease.remote(), remote);
    }
}

#[test]
fn server_mode_buffers_start_unspecified() {
    let pool = PacketBufferPool::server(config(2, 1)).unwrap();
    assert_eq!(pool.mode(), PoolMode::Server);

    let lease = pool.check_out().unwrap();
    assert_eq!(lease.remote(), UNSPECIFIED_REMOTE);
    assert!(lease.remote().ip().is_unspecified());
    assert_eq!(lease.remote().port(), 0);
}

#[test]
fn server_mode_reused_buffer_keeps_stale_address() {
    // One buffer total, so the second checkout reuses it.
    let pool = PacketBufferPool::server(config(1, 1).with_auto_grow(false)).unwrap();
    let sender: SocketAddr = "203.0.113.1:5000".parse().unwrap();

    {
        let mut lease = pool.check_out().unwrap();
        lease.set_remote(sender);
    }

    // The pool does not clear the address on return; overwriting it before
    // use is the network layer's contract.
    let lease = pool.check_out().unwrap();
    assert_eq!(lease.remote(), sender);
}

#[test]
fn reaper_tick_drives_pool_reclamation() {
    let pool = PacketBufferPool::server(config(4, 1)).unwrap();
    let leases: Vec<_> = (0..12).map(|_| pool.check_out().unwrap()).collect();
    assert_eq!(pool.segment_count(), 3);
    drop(leases);

    let reaper = IdleReaper::new(pool.clone(), Duration::from_secs(300));
    assert_eq!(reaper.tick(), 2);
    assert_eq!(pool.segment_count(), 1);

    let stats = pool.stats();
    assert_eq!(stats.segments_created, 3);
    assert_eq!(stats.segments_reclaimed, 2);
    assert_eq!(stats.currently_leased, 0);
}

#[test]
fn idle_timeout_is_honored() {
    let pool = PacketBufferPool::server(
        config(1, 1).with_idle_timeout(Duration::from_millis(80)),
    )
    .unwrap();

    let a = pool.check_out().unwrap();
    let b = pool.check_out().unwrap();
    drop(a);
    drop(b);

    // Too fresh to reap.
    assert_eq!(pool.reap_idle(), 0);
    assert_eq!(pool.segment_count(), 2);

    std::thread::sleep(Duration::from_millis(120));
    assert_eq!(pool.reap_idle(), 1);
    assert_eq!(pool.segment_count(), 1);
}

#[test]
fn construction_rejects_bad_geometry() {
    assert!(PacketBufferPool::server(PoolConfig::new().with_items_per_segment(0)).is_err());
    assert!(PacketBufferPool::server(PoolConfig::new().with_min_segments(0)).is_err());
}
