//! # Wurstball
//!
//! A prefetching picture feed with a short, navigable history.
//!
//! ## Architecture Overview
//!
//! The library is structured into independent modules:
//!
//! - `picture`: The immutable picture payload + URL
//! - `source`: Where pictures come from (resolve URL, load bytes, retry)
//! - `worker`: Background threads fetching pictures
//! - `buffer`: Fair bounded blocking queue between workers and viewer
//! - `history`: Back/forward navigation over recently shown pictures
//! - `config`: Application configuration
//! - `error`: Error types

// ============================================
// MODULE DECLARATIONS
// ============================================

pub mod buffer;
pub mod config;
pub mod error;
pub mod history;
pub mod picture;
pub mod source;
pub mod worker;

// ============================================
// RE-EXPORTS
// ============================================

pub use buffer::{Interrupt, PrefetchBuffer};
pub use config::Config;
pub use error::{WurstballError, WurstballResult};
pub use history::SharedHistory;
pub use picture::Picture;
pub use source::{PictureLoader, PictureSource, RetryingSource, UrlResolver};
pub use worker::{PoolStats, WorkerPool};

// ============================================
// IMPORTS
// ============================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};

// ============================================
// APPLICATION STATE
// ============================================

/// The main Wurstball pipeline.
///
/// ## Plain English
///
/// This is the "control center" the viewer talks to:
/// - Owns the prefetch buffer and the workers filling it
/// - Hands out the next picture and remembers it
/// - Lets the viewer step back and forward through what it has seen
///
/// There is no global instance: whoever builds the application owns one,
/// and tests build their own with a fake source.
pub struct Wurstball {
    /// Pictures fetched and waiting to be shown
    buffer: Arc<PrefetchBuffer<Picture>>,

    /// Recently shown pictures
    history: SharedHistory,

    /// Threads filling the buffer
    pool: WorkerPool,

    /// Application configuration
    config: Config,

    /// Statistics about operation
    stats: Counters,
}

#[derive(Debug, Default)]
struct Counters {
    pictures_shown: AtomicU64,
    interrupted_requests: AtomicU64,
}

/// Runtime statistics for monitoring
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AppStats {
    /// Pictures handed out by `next_picture*`
    pub pictures_shown: u64,
    /// Requests that gave up after repeated interrupts
    pub interrupted_requests: u64,
    /// Worker pool counters
    pub pool: PoolStats,
}

impl Wurstball {
    /// Creates a pipeline with default configuration.
    pub fn new(source: impl PictureSource + 'static) -> WurstballResult<Self> {
        Self::with_config(Config::default(), source)
    }

    /// Creates a pipeline with custom configuration.
    ///
    /// The workers start fetching before this returns.
    ///
    /// ## Returns
    /// A running `Wurstball` instance, or the first configuration problem
    pub fn with_config(
        config: Config,
        source: impl PictureSource + 'static,
    ) -> WurstballResult<Self> {
        Self::with_shared_source(config, Arc::new(source))
    }

    /// Builds the retrying source from a URL resolver and a loader.
    ///
    /// Each fetch makes up to `config.max_retries` attempts, pausing
    /// `config.retry_delay` between them.
    pub fn from_collaborators<R, L>(config: Config, resolver: R, loader: L) -> WurstballResult<Self>
    where
        R: UrlResolver + 'static,
        L: PictureLoader + 'static,
    {
        let source = RetryingSource::new(resolver, loader, config.max_retries)
            .with_retry_delay(config.retry_delay);
        Self::with_config(config, source)
    }

    /// Like [`with_config`](Self::with_config) for a source that is already shared.
    pub fn with_shared_source(
        config: Config,
        source: Arc<dyn PictureSource>,
    ) -> WurstballResult<Self> {
        // Validate configuration
        if let Some(error) = config.validate().into_iter().next() {
            return Err(WurstballError::Config(error));
        }

        info!(
            "Initializing Wurstball: {} buffered, {} remembered, {} worker(s)",
            config.buffer_capacity, config.history_capacity, config.worker_count
        );

        let buffer = Arc::new(PrefetchBuffer::new(
            config.buffer_capacity,
            config.max_retries,
        ));
        let history = SharedHistory::new(config.history_capacity);
        let pool = WorkerPool::start(
            source,
            Arc::clone(&buffer),
            config.worker_count,
            config.failure_backoff,
        )?;

        info!("Wurstball initialized successfully");

        Ok(Self {
            buffer,
            history,
            pool,
            config,
            stats: Counters::default(),
        })
    }

    /// Waits for the next prefetched picture, remembers it and returns it.
    ///
    /// Returns `None` only after [`shutdown`](Self::shutdown) once the
    /// buffer has run dry.
    pub fn next_picture(&self) -> Option<Picture> {
        let taken = self.buffer.take();
        self.deliver(taken)
    }

    /// Like [`next_picture`](Self::next_picture), but can be interrupted.
    ///
    /// ## What Happens (Plain English)
    ///
    /// Each raise of `interrupt` while we wait is logged and we wait again.
    /// After `max_retries` raises we give up and return `None`: "no picture
    /// right now". Nothing is added to the history in that case.
    pub fn next_picture_interruptible(&self, interrupt: &Interrupt) -> Option<Picture> {
        let taken = self.buffer.take_interruptible(interrupt);
        self.deliver(taken)
    }

    fn deliver(&self, taken: WurstballResult<Picture>) -> Option<Picture> {
        match taken {
            Ok(picture) => {
                debug!("Showing {}", picture.url());
                self.history.append(picture.clone());
                self.stats.pictures_shown.fetch_add(1, Ordering::Relaxed);
                Some(picture)
            }
            Err(WurstballError::Interrupted { attempts }) => {
                warn!("No picture available after {} interrupt(s)", attempts);
                self.stats
                    .interrupted_requests
                    .fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(e) => {
                warn!("No picture available: {}", e);
                None
            }
        }
    }

    /// Steps back in the history. `None` at the oldest picture.
    pub fn back(&self) -> Option<Picture> {
        self.history.previous()
    }

    /// Steps forward in the history. `None` at the newest picture.
    pub fn forward(&self) -> Option<Picture> {
        self.history.next()
    }

    /// The picture the history cursor points at.
    pub fn current_picture(&self) -> Option<Picture> {
        self.history.current()
    }

    /// Returns the number of pictures waiting in the buffer.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the number of pictures remembered for back/forward.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Returns a copy of the current statistics.
    pub fn stats(&self) -> AppStats {
        AppStats {
            pictures_shown: self.stats.pictures_shown.load(Ordering::Relaxed),
            interrupted_requests: self.stats.interrupted_requests.load(Ordering::Relaxed),
            pool: self.pool.stats(),
        }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stops the workers. Pictures still buffered can be taken afterwards.
    pub fn shutdown(&self) {
        info!("Shutting down Wurstball...");
        self.pool.shutdown();
        info!("Shutdown complete");
    }
}

// ============================================
// LOGGING
// ============================================

/// Initialize logging for the platform.
pub fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}

// ============================================
// TESTS
// ============================================
