//! # Picture Source Module
//!
//! Where pictures come from.
//!
//! ## Plain English
//!
//! Getting a picture is two steps:
//! 1. Ask the remote page which picture it is showing right now (a URL)
//! 2. Download that URL
//!
//! Both steps belong to someone else (an HTML scraper, an HTTP client),
//! so they are traits here. [`RetryingSource`] glues them together and
//! tries a few times before admitting defeat.

mod local;

pub use local::{DirectoryResolver, FileLoader};

use std::thread;
use std::time::Duration;

use crate::error::{WurstballError, WurstballResult};
use crate::picture::Picture;

// ============================================
// TRAITS
// ============================================

/// Produces one picture per call.
///
/// Implementations are shared by every worker thread.
pub trait PictureSource: Send + Sync {
    fn fetch(&self) -> WurstballResult<Picture>;
}

/// Finds the URL of the picture currently on offer.
pub trait UrlResolver: Send + Sync {
    fn picture_url(&self) -> WurstballResult<String>;
}

/// Downloads the bytes behind a URL.
pub trait PictureLoader: Send + Sync {
    fn load(&self, url: &str) -> WurstballResult<Vec<u8>>;
}

impl<F> UrlResolver for F
where
    F: Fn() -> WurstballResult<String> + Send + Sync,
{
    fn picture_url(&self) -> WurstballResult<String> {
        self()
    }
}

impl<F> PictureLoader for F
where
    F: Fn(&str) -> WurstballResult<Vec<u8>> + Send + Sync,
{
    fn load(&self, url: &str) -> WurstballResult<Vec<u8>> {
        self(url)
    }
}

impl<S: PictureSource + ?Sized> PictureSource for Box<S> {
    fn fetch(&self) -> WurstballResult<Picture> {
        (**self).fetch()
    }
}

impl<S: PictureSource + ?Sized> PictureSource for std::sync::Arc<S> {
    fn fetch(&self) -> WurstballResult<Picture> {
        (**self).fetch()
    }
}

// ============================================
// RETRYING SOURCE
// ============================================

/// Resolve-then-load with a bounded number of attempts.
pub struct RetryingSource<R, L> {
    resolver: R,
    loader: L,
    max_retries: u32,
    retry_delay: Duration,
}

impl<R: UrlResolver, L: PictureLoader> RetryingSource<R, L> {
    /// Creates a source that makes up to `max_retries` attempts per fetch.
    pub fn new(resolver: R, loader: L, max_retries: u32) -> Self {
        Self {
            resolver,
            loader,
            max_retries: max_retries.max(1),
            retry_delay: Duration::ZERO,
        }
    }

    /// Sleeps `delay` between failed attempts (default: retry immediately).
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// One resolve + load round trip.
    fn attempt(&self) -> WurstballResult<Picture> {
        let url = self.resolver.picture_url()?;
        if url.trim().is_empty() {
            return Err(WurstballError::Resolve("page offered no picture".to_string()));
        }

        let payload = self.loader.load(&url)?;
        log::debug!("Loaded {} ({} bytes)", url, payload.len());
        Ok(Picture::new(url, payload))
    }
}

impl<R: UrlResolver, L: PictureLoader> PictureSource for RetryingSource<R, L> {
    fn fetch(&self) -> WurstballResult<Picture> {
        for attempt in 1..=self.max_retries {
            match self.attempt() {
                Ok(picture) => return Ok(picture),
                Err(e) => {
                    log::warn!("Picture not found. Attempt: {} ({})", attempt, e);
                    if attempt < self.max_retries && !self.retry_delay.is_zero() {
                        thread::sleep(self.retry_delay);
                    }
                }
            }
        }

        Err(WurstballError::NotFound {
            attempts: self.max_retries,
        })
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fixed_loader(url: &str) -> WurstballResult<Vec<u8>> {
        Ok(url.as_bytes().to_vec())
    }

    fn always(url: &'static str) -> impl Fn() -> WurstballResult<String> + Send + Sync {
        move || Ok(url.to_string())
    }

    #[test]
    fn test_first_attempt_succeeds() {
        let source = RetryingSource::new(always("http://example.org/1.jpg"), fixed_loader, 3);

        let picture = source.fetch().unwrap();
        assert_eq!(picture.url(), "http://example.org/1.jpg");
        assert_eq!(picture.payload(), b"http://example.org/1.jpg");
    }

    #[test]
    fn test_recovers_within_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let resolver = move || {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(WurstballError::Resolve("timeout".to_string()))
            } else {
                Ok("http://example.org/late.jpg".to_string())
            }
        };

        let source = RetryingSource::new(resolver, fixed_loader, 3);
        assert_eq!(source.fetch().unwrap().url(), "http://example.org/late.jpg");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let resolver = move || -> WurstballResult<String> {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(WurstballError::Resolve("down".to_string()))
        };

        let source = RetryingSource::new(resolver, fixed_loader, 4);
        match source.fetch() {
            Err(WurstballError::NotFound { attempts }) => assert_eq!(attempts, 4),
            other => panic!("Expected NotFound, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_load_failure_counts_as_attempt() {
        let loads = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&loads);
        let loader = move |url: &str| -> WurstballResult<Vec<u8>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(WurstballError::Load {
                url: url.to_string(),
                reason: "404".to_string(),
            })
        };

        let source = RetryingSource::new(always("http://x/y.png"), loader, 2);
        assert!(matches!(
            source.fetch(),
            Err(WurstballError::NotFound { attempts: 2 })
        ));
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_url_is_a_failure() {
        let source = RetryingSource::new(always("  "), fixed_loader, 2)
            .with_retry_delay(Duration::from_millis(1));
        assert!(source.fetch().is_err());
    }

    #[test]
    fn test_boxed_source() {
        let source: Box<dyn PictureSource> =
            Box::new(RetryingSource::new(always("a"), fixed_loader, 1));
        assert_eq!(source.fetch().unwrap().url(), "a");
    }
}
