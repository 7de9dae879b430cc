//! # Configuration Module
//!
//! This module handles all configurable settings for Wurstball.
//!
//! ## Plain English Explanation
//!
//! The pipeline has a handful of knobs: how many pictures to keep ready,
//! how many to remember for "back", how many workers go fetching and how
//! stubborn they are. They are all fixed when the pipeline is built; there
//! is no resizing at runtime.

use std::time::Duration;

use thiserror::Error;

/// Upper bound on worker threads; more than this is almost certainly a typo.
pub const MAX_WORKERS: usize = 64;

// ============================================
// MAIN CONFIGURATION
// ============================================

/// All configuration options for Wurstball
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    // ----------------------------------------
    // BUFFER SETTINGS
    // "How much to keep ready / remember"
    // ----------------------------------------
    /// How many fetched pictures wait in the prefetch buffer
    ///
    /// ## Plain English
    /// Workers stop (block) once this many pictures are ready and unseen.
    pub buffer_capacity: usize,

    /// How many shown pictures can be revisited with back/forward
    pub history_capacity: usize,

    // ----------------------------------------
    // WORKER SETTINGS
    // "Who does the fetching"
    // ----------------------------------------
    /// Number of background fetch threads
    pub worker_count: usize,

    /// Attempts per fetch, and interrupted waits per take, before giving up
    pub max_retries: u32,

    /// Pause between two failed fetch attempts inside one fetch
    pub retry_delay: Duration,

    /// Pause before a worker starts a new cycle after a failed fetch
    pub failure_backoff: Duration,
}

impl Config {
    /// Small capacities for tests and embedded use.
    pub fn small() -> Self {
        Self {
            buffer_capacity: 2,
            history_capacity: 3,
            worker_count: 1,
            ..Self::default()
        }
    }

    /// A bigger prefetch window for slow networks.
    pub fn eager() -> Self {
        Self {
            buffer_capacity: 15,
            history_capacity: 30,
            worker_count: 10,
            failure_backoff: Duration::from_millis(250),
            ..Self::default()
        }
    }

    /// Validates the configuration and returns errors if invalid
    ///
    /// ## Plain English
    /// Makes sure all settings are within reasonable bounds.
    /// Returns a list of problems, or empty if all is well.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.buffer_capacity == 0 {
            errors.push(ConfigError::ZeroBufferCapacity);
        }
        if self.history_capacity == 0 {
            errors.push(ConfigError::ZeroHistoryCapacity);
        }
        if self.worker_count == 0 || self.worker_count > MAX_WORKERS {
            errors.push(ConfigError::InvalidWorkerCount(self.worker_count));
        }
        if self.max_retries == 0 {
            errors.push(ConfigError::ZeroRetries);
        }

        errors
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            buffer_capacity: 5,
            history_capacity: 10,
            worker_count: 5,
            max_retries: 3,
            retry_delay: Duration::ZERO,
            failure_backoff: Duration::ZERO,
        }
    }
}

// ============================================
// CONFIGURATION ERRORS
// ============================================

/// Errors that can occur with configuration values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The prefetch buffer must hold at least one picture
    #[error("Buffer capacity must be at least 1")]
    ZeroBufferCapacity,

    /// The history must hold at least one picture
    #[error("History capacity must be at least 1")]
    ZeroHistoryCapacity,

    /// Worker count is outside 1..=MAX_WORKERS
    #[error("Worker count {0} is outside valid range (1-{max})", max = MAX_WORKERS)]
    InvalidWorkerCount(usize),

    /// At least one attempt is needed to fetch anything
    #[error("Max retries must be at least 1")]
    ZeroRetries,
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.buffer_capacity, 5);
        assert_eq!(config.history_capacity, 10);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(Config::small().validate().is_empty());
        assert!(Config::eager().validate().is_empty());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = Config::default();

        config.buffer_capacity = 0;
        assert_eq!(config.validate(), vec![ConfigError::ZeroBufferCapacity]);

        config.buffer_capacity = 5;
        config.worker_count = MAX_WORKERS + 1;
        assert_eq!(
            config.validate(),
            vec![ConfigError::InvalidWorkerCount(MAX_WORKERS + 1)]
        );

        config.worker_count = 0;
        config.max_retries = 0;
        config.history_capacity = 0;
        assert_eq!(config.validate().len(), 3);
    }

    #[test]
    fn test_error_message() {
        let message = ConfigError::InvalidWorkerCount(100).to_string();
        assert!(message.contains("100"));
        assert!(message.contains("64"));
    }
}
