//! Concurrent stress tests for the packet buffer pool
//! Focused on lease exclusivity and reaping under contention.

use std::collections::HashSet;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Barrier, Mutex,
};
use std::thread;
use std::time::Duration;

use gridlink::pool::{IdleReaper, PacketBufferPool, PoolConfig};

/// Every live lease must reference a distinct buffer. Threads tag the buffer
/// they hold with a unique marker and verify nobody else scribbled over it
/// while they held the lease.
#[test]
fn stress_no_two_live_leases_share_a_buffer() {
    let pool = PacketBufferPool::server(
        PoolConfig::new()
            .with_buffer_size(64)
            .with_items_per_segment(4)
            .with_min_segments(1),
    )
    .unwrap();

    let thread_count = 8;
    let iterations = 200;
    let barrier = Arc::new(Barrier::new(thread_count));
    let collisions = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for thread_id in 0..thread_count {
        let pool = pool.clone();
        let barrier = Arc::clone(&barrier);
        let collisions = Arc::clone(&collisions);

        handles.push(thread::spawn(move || {
            let marker = thread_id as u8 + 1;
            barrier.wait();

            for i in 0..iterations {
                let mut lease = pool.check_out().unwrap();
                assert_eq!(lease.data_length(), 0, "checkout must reset length");

                lease.raw_mut()[..8].fill(marker);
                lease.set_data_length(8).unwrap();

                // Hold the lease briefly so leases overlap across threads.
                if i % 7 == 0 {
                    thread::sleep(Duration::from_micros(50));
                }

                if lease.payload().iter().any(|&b| b != marker) {
                    collisions.fetch_add(1, Ordering::Relaxed);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(collisions.load(Ordering::Relaxed), 0);
    assert_eq!(pool.leased_count(), 0);

    let stats = pool.stats();
    assert_eq!(stats.checkouts, (thread_count * iterations) as u64);
    assert_eq!(stats.checkouts, stats.returns);
}

/// Buffer payload pointers identify buffers uniquely; collect them from a
/// burst of simultaneous leases and confirm the set has no duplicates.
#[test]
fn stress_live_lease_identity_set_is_duplicate_free() {
    let pool = PacketBufferPool::server(
        PoolConfig::new()
            .with_buffer_size(32)
            .with_items_per_segment(8)
            .with_min_segments(1),
    )
    .unwrap();

    let thread_count = 6;
    let leases_per_thread = 40;
    let barrier = Arc::new(Barrier::new(thread_count));
    let identities = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for _ in 0..thread_count {
        let pool = pool.clone();
        let barrier = Arc::clone(&barrier);
        let identities = Arc::clone(&identities);

        handles.push(thread::spawn(move || {
            barrier.wait();

            // Hold all leases at once so they are simultaneously live.
            let mut held = Vec::new();
            for _ in 0..leases_per_thread {
                held.push(pool.check_out().unwrap());
            }

            let mut ids: Vec<usize> = held
                .iter_mut()
                .map(|lease| lease.raw_mut().as_ptr() as usize)
                .collect();
            identities.lock().unwrap().append(&mut ids);
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let identities = identities.lock().unwrap();
    let total = thread_count * leases_per_thread;
    assert_eq!(identities.len(), total);

    let unique: HashSet<usize> = identities.iter().copied().collect();
    assert_eq!(unique.len(), total, "two live leases shared a buffer");

    assert_eq!(pool.leased_count(), 0);
    assert_eq!(pool.capacity() % 8, 0);
}

/// Reaping runs concurrently with checkout/return traffic and never removes
/// a segment out from under a live lease.
#[test]
fn stress_reaping_races_checkout_safely() {
    let pool = PacketBufferPool::server(
        PoolConfig::new()
            .with_buffer_size(32)
            .with_items_per_segment(2)
            .with_min_segments(1)
            .with_idle_timeout(Duration::ZERO),
    )
    .unwrap();

    let reaper_guard = IdleReaper::new(pool.clone(), Duration::from_millis(1)).spawn();

    let thread_count = 4;
    let iterations = 300;
    let barrier = Arc::new(Barrier::new(thread_count));

    let mut handles = Vec::new();
    for thread_id in 0..thread_count {
        let pool = pool.clone();
        let barrier = Arc::clone(&barrier);

        handles.push(thread::spawn(move || {
            let marker = thread_id as u8 + 1;
            barrier.wait();

            for _ in 0..iterations {
                let mut lease = pool.check_out().unwrap();
                lease.raw_mut()[0] = marker;
                lease.set_data_length(1).unwrap();
                assert_eq!(lease.payload()[0], marker);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
    reaper_guard.stop();

    assert_eq!(pool.leased_count(), 0);
    pool.reap_idle();
    assert_eq!(pool.segment_count(), 1);

    let stats = pool.stats();
    assert_eq!(stats.checkouts, stats.returns);
    assert_eq!(stats.checkout_failures, 0);
}
