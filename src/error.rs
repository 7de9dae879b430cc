//! # Error Types Module
//!
//! This module defines all the error types used throughout Wurstball.
//!
//! ## Plain English Explanation
//!
//! When things go wrong, we need a way to describe WHAT went wrong.
//! Most problems in this crate are not fatal:
//!
//! - "NotFound: the page had no picture after 3 tries" - a worker shrugs
//!   and tries again
//! - "Interrupted: the viewer gave up waiting" - the viewer gets no picture
//!   this time
//!
//! Having specific error types lets every layer decide whether to retry,
//! absorb, or pass the problem on.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;

// ============================================
// MAIN APPLICATION ERROR
// ============================================

/// The main error type for Wurstball
#[derive(Debug, Error)]
pub enum WurstballError {
    /// The picture source gave up after exhausting its retries
    ///
    /// ## Who Sees This
    /// Only the worker pool. Workers log it and start a new fetch cycle.
    #[error("Picture not found after {attempts} attempt(s)")]
    NotFound { attempts: u32 },

    /// A wait for a buffered picture was interrupted too many times
    ///
    /// ## Who Sees This
    /// The facade, which turns it into "no picture available right now".
    #[error("Interrupted while waiting for a picture ({attempts} attempt(s))")]
    Interrupted { attempts: u32 },

    /// The prefetch buffer has been closed (pool shutting down)
    #[error("Prefetch buffer is closed")]
    BufferClosed,

    /// The URL resolver failed a single attempt
    #[error("Could not resolve picture URL: {0}")]
    Resolve(String),

    /// The picture at `url` could not be loaded
    #[error("Could not load picture from {url}: {reason}")]
    Load { url: String, reason: String },

    /// Something went wrong with configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl WurstballError {
    /// Returns true for errors that are worth another attempt.
    ///
    /// Closed buffers and bad configuration never heal on their own.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::BufferClosed | Self::Config(_))
    }
}

// ============================================
// RESULT TYPE ALIAS
// ============================================

/// A Result type that uses WurstballError
pub type WurstballResult<T> = Result<T, WurstballError>;

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WurstballError::NotFound { attempts: 3 };
        let message = format!("{}", err);
        assert!(message.contains("not found"));
        assert!(message.contains('3'));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_err: WurstballError = io_err.into();

        match app_err {
            WurstballError::Io(_) => {} // Expected
            _ => panic!("Expected Io error variant"),
        }
    }

    #[test]
    fn test_config_error_conversion() {
        let err: WurstballError = ConfigError::ZeroBufferCapacity.into();
        assert!(matches!(err, WurstballError::Config(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retryable() {
        assert!(WurstballError::NotFound { attempts: 1 }.is_retryable());
        assert!(WurstballError::Interrupted { attempts: 1 }.is_retryable());
        assert!(!WurstballError::BufferClosed.is_retryable());
    }
}
