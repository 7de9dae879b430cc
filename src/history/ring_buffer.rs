//! # Ring Buffer Implementation
//!
//! A fixed-size circular buffer that drops its oldest element when full.
//!
//! ## Plain English
//!
//! Picture a shelf with room for exactly N photos.
//! When the shelf is full and a new photo arrives, the one on the far
//! left falls off and everything slides over by one.

use std::collections::VecDeque;

/// A fixed-capacity ring buffer with index access.
///
/// ## Properties
/// - Fixed capacity (doesn't grow)
/// - O(1) push, evicting the oldest when full
/// - Index 0 is always the oldest item
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    /// The actual storage
    data: VecDeque<T>,

    /// Maximum number of items
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Creates a new ring buffer with the given capacity (at least 1).
    ///
    /// ## Example
    /// ```
    /// # use wurstball::history::RingBuffer;
    /// let buffer: RingBuffer<i32> = RingBuffer::new(10);
    /// assert_eq!(buffer.capacity(), 10);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds an item to the buffer.
    ///
    /// If the buffer is full, the oldest item is removed first and returned.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.data.len() >= self.capacity {
            self.data.pop_front()
        } else {
            None
        };
        self.data.push_back(item);
        evicted
    }

    /// Returns the item at `index` (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Returns the number of items currently stored.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if the buffer is at capacity.
    pub fn is_full(&self) -> bool {
        self.data.len() >= self.capacity
    }

    /// Returns the maximum capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the newest item without removing it.
    pub fn newest(&self) -> Option<&T> {
        self.data.back()
    }

    /// Returns an iterator over all items (oldest to newest).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

// ============================================
// TESTS
// ============================================
