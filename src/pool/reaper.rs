//! Periodic reclamation of idle pool capacity

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use super::pool::PacketBufferPool;

/// Granularity at which a spawned reaper thread notices its stop flag
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Drives [`PacketBufferPool::reap_idle`] on a schedule
///
/// The reaper never schedules itself: the pool's owner either calls
/// [`tick`](Self::tick) from its own maintenance loop, or hands the reaper a
/// dedicated thread with [`spawn`](Self::spawn).
#[derive(Debug)]
pub struct IdleReaper {
    pool: PacketBufferPool,
    interval: Duration,
}

impl IdleReaper {
    /// Create a reaper that runs one reclamation pass per `interval`
    pub fn new(pool: PacketBufferPool, interval: Duration) -> Self {
        Self { pool, interval }
    }

    /// Run a single reclamation pass, returning the segments reclaimed
    pub fn tick(&self) -> usize {
        self.pool.reap_idle()
    }

    /// Run the reaper on its own thread until the returned guard is stopped
    /// or dropped
    pub fn spawn(self) -> ReaperGuard {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let thread = thread::spawn(move || {
            let mut next_pass = Instant::now() + self.interval;
            loop {
                if stop_flag.load(Ordering::Relaxed) {
                    return;
                }
                if Instant::now() >= next_pass {
                    let reclaimed = self.tick();
                    if reclaimed > 0 {
                        debug!(reclaimed, "idle reaper pass reclaimed segments");
                    }
                    next_pass = Instant::now() + self.interval;
                }
                thread::sleep(STOP_POLL_INTERVAL);
            }
        });

        ReaperGuard {
            stop,
            thread: Some(thread),
        }
    }
}

/// Stops and joins a spawned reaper thread when dropped
#[derive(Debug)]
pub struct ReaperGuard {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ReaperGuard {
    /// Stop the reaper thread and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ReaperGuard {
    fn drop(&mut self) {
        self.shutdown();
    }
}
