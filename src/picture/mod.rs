//! # Picture Module
//!
//! The unit of work flowing through the pipeline.
//!
//! ## Plain English
//!
//! A picture is the downloaded bytes plus the URL they came from.
//! Once built it never changes, so the viewer and the history can both
//! hold on to it without stepping on each other.

mod probe;

pub use probe::PictureInfo;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local};

// ============================================
// PICTURE
// ============================================

/// A fetched picture: opaque payload plus its source URL.
///
/// Cloning is cheap: the payload and URL are reference counted and
/// immutable, so clones always see the same bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Picture {
    /// Where the payload was loaded from
    url: Arc<str>,

    /// Raw (still encoded) image bytes
    payload: Arc<[u8]>,

    /// When the payload finished loading
    fetched_at: DateTime<Local>,
}

impl Picture {
    /// Creates a new picture, stamped with the current local time.
    pub fn new(url: impl Into<String>, payload: Vec<u8>) -> Self {
        Self::with_timestamp(url, payload, Local::now())
    }

    /// Creates a picture with a specific fetch time.
    pub fn with_timestamp(
        url: impl Into<String>,
        payload: Vec<u8>,
        fetched_at: DateTime<Local>,
    ) -> Self {
        Self {
            url: Arc::from(url.into()),
            payload: Arc::from(payload),
            fetched_at,
        }
    }

    /// The URL the payload came from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The raw payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    /// When the picture was fetched.
    pub fn fetched_at(&self) -> DateTime<Local> {
        self.fetched_at
    }

    /// Probes the payload header for format and dimensions.
    ///
    /// Returns `None` when the bytes are not an image we recognise;
    /// the payload itself stays opaque either way.
    pub fn info(&self) -> Option<PictureInfo> {
        probe::probe(&self.payload)
    }
}

impl fmt::Debug for Picture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Picture")
            .field("url", &self.url)
            .field("size", &self.payload.len())
            .field("fetched_at", &self.fetched_at)
            .finish()
    }
}

// ============================================
// TESTS
// ============================================
