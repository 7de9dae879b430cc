//! # Worker Pool Module
//!
//! Background threads that keep the prefetch buffer topped up.
//!
//! ## Plain English
//!
//! Each worker does the same thing forever:
//! 1. Fetch a picture (the source already retries a few times)
//! 2. Put it in the buffer, waiting if the buffer is full
//! 3. If the fetch failed, shrug, log it, and go back to step 1
//!
//! One worker failing never bothers the others, and a source that panics
//! counts as one more failed fetch. A worker only quits on its own when the
//! source reports an error that can never heal (a closed buffer or a bad
//! configuration). Otherwise the pool stops when its owner shuts it down.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, info, warn};
use parking_lot::Mutex;

use crate::buffer::PrefetchBuffer;
use crate::error::{WurstballError, WurstballResult};
use crate::picture::Picture;
use crate::source::PictureSource;

// ============================================
// STATISTICS
// ============================================

/// Counters shared by all workers.
#[derive(Debug, Default)]
struct Counters {
    fetched: AtomicU64,
    failed_fetches: AtomicU64,
    delivered: AtomicU64,
}

/// Snapshot of what the pool has done so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Threads started
    pub workers: usize,
    /// Successful fetches
    pub fetched: u64,
    /// Fetch cycles that exhausted their retries
    pub failed_fetches: u64,
    /// Pictures that made it into the buffer
    pub delivered: u64,
}

// ============================================
// WORKER POOL
// ============================================

/// A fixed set of fetch threads feeding one buffer.
pub struct WorkerPool {
    buffer: Arc<PrefetchBuffer<Picture>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    running: Arc<AtomicBool>,
    counters: Arc<Counters>,
    worker_count: usize,
}

impl WorkerPool {
    /// Spawns `worker_count` threads, each looping fetch → put.
    ///
    /// ## Parameters
    /// - `source`: Shared by all workers
    /// - `buffer`: Where fetched pictures go
    /// - `failure_backoff`: Pause after a failed fetch cycle (zero = none)
    ///
    /// ## Errors
    /// Returns an I/O error if the OS refuses to spawn a thread; threads
    /// already started are stopped again.
    pub fn start(
        source: Arc<dyn PictureSource>,
        buffer: Arc<PrefetchBuffer<Picture>>,
        worker_count: usize,
        failure_backoff: Duration,
    ) -> WurstballResult<Self> {
        let pool = Self {
            buffer,
            handles: Mutex::new(Vec::with_capacity(worker_count)),
            running: Arc::new(AtomicBool::new(true)),
            counters: Arc::new(Counters::default()),
            worker_count,
        };

        for id in 0..worker_count {
            let worker = Worker {
                id,
                source: Arc::clone(&source),
                buffer: Arc::clone(&pool.buffer),
                running: Arc::clone(&pool.running),
                counters: Arc::clone(&pool.counters),
                failure_backoff,
            };

            let handle = thread::Builder::new()
                .name(format!("picture-worker-{}", id))
                .spawn(move || worker.run())?;
            pool.handles.lock().push(handle);
        }

        info!("Started {} picture worker(s)", worker_count);
        Ok(pool)
    }

    /// Number of threads this pool was started with.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Returns true until [`shutdown`](Self::shutdown) is called.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns a copy of the current counters.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            workers: self.worker_count,
            fetched: self.counters.fetched.load(Ordering::Relaxed),
            failed_fetches: self.counters.failed_fetches.load(Ordering::Relaxed),
            delivered: self.counters.delivered.load(Ordering::Relaxed),
        }
    }

    /// Stops every worker and waits for them to exit.
    ///
    /// Closes the buffer so workers blocked in `put` wake up. A worker in
    /// the middle of a fetch finishes that fetch first.
    pub fn shutdown(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        info!("Stopping {} picture worker(s)...", self.worker_count);
        self.buffer.close();

        let handles: Vec<_> = self.handles.lock().drain(..).collect();
        for handle in handles {
            let name = handle.thread().name().unwrap_or("picture-worker").to_string();
            if handle.join().is_err() {
                error!("{} panicked", name);
            }
        }

        info!("Picture workers stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ============================================
// WORKER LOOP
// ============================================

/// Everything one thread needs.
struct Worker {
    id: usize,
    source: Arc<dyn PictureSource>,
    buffer: Arc<PrefetchBuffer<Picture>>,
    running: Arc<AtomicBool>,
    counters: Arc<Counters>,
    failure_backoff: Duration,
}

impl Worker {
    fn run(self) {
        debug!("Worker {} started", self.id);

        while self.running.load(Ordering::SeqCst) {
            let picture = match self.fetch() {
                Ok(picture) => picture,
                Err(e) => {
                    self.counters.failed_fetches.fetch_add(1, Ordering::Relaxed);
                    error!("Worker {} fetch cycle failed: {}", self.id, e);
                    if !e.is_retryable() {
                        warn!("Worker {} giving up", self.id);
                        break;
                    }
                    if !self.failure_backoff.is_zero() {
                        thread::sleep(self.failure_backoff);
                    }
                    continue;
                }
            };

            self.counters.fetched.fetch_add(1, Ordering::Relaxed);
            let url = picture.url().to_string();

            match self.buffer.put(picture) {
                Ok(()) => {
                    self.counters.delivered.fetch_add(1, Ordering::Relaxed);
                    debug!("Worker {} buffered {}", self.id, url);
                }
                Err(WurstballError::BufferClosed) => break,
                Err(e) => warn!("Worker {} dropped {}: {}", self.id, url, e),
            }
        }

        debug!("Worker {} stopped", self.id);
    }

    /// One fetch cycle. A panicking source is reported as a failed fetch.
    fn fetch(&self) -> WurstballResult<Picture> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.source.fetch())) {
            Ok(result) => result,
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!("Worker {}: picture source panicked: {}", self.id, reason);
                Err(WurstballError::Resolve(format!("source panicked: {}", reason)))
            }
        }
    }
}

// ============================================
// TESTS
// ============================================
