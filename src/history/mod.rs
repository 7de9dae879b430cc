//! # History Module
//!
//! Remembers the last few pictures shown so the viewer can step back
//! and forward through them.
//!
//! ## Plain English Explanation
//!
//! Think of a browser's back/forward buttons, but with a short memory:
//! only the last N pictures are kept. A cursor points at the picture
//! currently on screen.
//!
//! - A new picture always goes on the end, and the cursor jumps to it
//! - "Back" moves the cursor one step towards older pictures
//! - "Forward" moves it one step towards newer ones
//! - At either end nothing happens and you get `None`

mod ring_buffer;

pub use ring_buffer::RingBuffer;

use parking_lot::Mutex;

use crate::picture::Picture;

// ============================================
// HISTORY
// ============================================

/// A bounded history with a navigation cursor.
///
/// The cursor is `None` only while the history is empty; otherwise it is
/// always a valid index into the ring.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: RingBuffer<T>,
    cursor: Option<usize>,
}

impl<T> History<T> {
    /// Creates an empty history holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RingBuffer::new(capacity),
            cursor: None,
        }
    }

    /// Appends an entry and moves the cursor to it.
    ///
    /// At capacity the oldest entry is evicted and returned.
    pub fn append(&mut self, entry: T) -> Option<T> {
        let evicted = self.entries.push(entry);
        self.cursor = Some(self.entries.len() - 1);
        evicted
    }

    /// Steps back one entry.
    ///
    /// Returns `None` (and leaves the cursor alone) when empty or already
    /// at the oldest entry.
    pub fn previous(&mut self) -> Option<&T> {
        match self.cursor {
            Some(current) if current > 0 => {
                self.cursor = Some(current - 1);
                self.entries.get(current - 1)
            }
            _ => None,
        }
    }

    /// Steps forward one entry.
    ///
    /// Returns `None` when empty or already at the newest entry.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&T> {
        match self.cursor {
            Some(current) if current + 1 < self.entries.len() => {
                self.cursor = Some(current + 1);
                self.entries.get(current + 1)
            }
            _ => None,
        }
    }

    /// The entry under the cursor.
    pub fn current(&self) -> Option<&T> {
        self.cursor.and_then(|i| self.entries.get(i))
    }

    /// Cursor position (0 = oldest), `None` while empty.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// True when the cursor sits on the most recent entry (or history is empty).
    pub fn at_newest(&self) -> bool {
        self.cursor.map_or(true, |i| i + 1 == self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Iterates entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

// ============================================
// SHARED HISTORY
// Thread-safe wrapper for the picture history
// ============================================

/// A thread-safe picture history that can be shared across threads
///
/// ## Plain English Explanation
///
/// Every navigation moves the cursor, so even "read" operations write.
/// One mutex serializes all callers; each operation is O(1) so there is
/// nothing to gain from finer locking.
///
/// Pictures are handed out as clones, which only bumps a reference count.
pub struct SharedHistory {
    inner: Mutex<History<Picture>>,
}

impl SharedHistory {
    /// Creates a shared history holding at most `capacity` pictures.
    pub fn new(capacity: usize) -> Self {
        log::info!("Creating picture history: {} entries", capacity);

        Self {
            inner: Mutex::new(History::new(capacity)),
        }
    }

    /// Records a delivered picture and points the cursor at it.
    pub fn append(&self, picture: Picture) {
        let mut history = self.inner.lock();
        if let Some(evicted) = history.append(picture) {
            log::debug!("History full, forgot {}", evicted.url());
        }
    }

    /// Moves one step back and returns that picture.
    pub fn previous(&self) -> Option<Picture> {
        self.inner.lock().previous().cloned()
    }

    /// Moves one step forward and returns that picture.
    pub fn next(&self) -> Option<Picture> {
        self.inner.lock().next().cloned()
    }

    /// The picture under the cursor.
    pub fn current(&self) -> Option<Picture> {
        self.inner.lock().current().cloned()
    }

    /// Cursor position, `None` while empty.
    pub fn cursor(&self) -> Option<usize> {
        self.inner.lock().cursor()
    }

    /// Number of pictures remembered.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Copies every remembered picture, oldest first.
    pub fn snapshot(&self) -> Vec<Picture> {
        self.inner.lock().iter().cloned().collect()
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(capacity: usize, items: &[char]) -> History<char> {
        let mut history = History::new(capacity);
        for &item in items {
            history.append(item);
        }
        history
    }

    #[test]
    fn test_empty_history() {
        let mut history: History<char> = History::new(3);

        assert_eq!(history.cursor(), None);
        assert_eq!(history.current(), None);
        assert_eq!(history.previous(), None);
        assert_eq!(history.next(), None);
        assert!(history.at_newest());
    }

    #[test]
    fn test_append_moves_cursor_to_newest() {
        let mut history = History::new(10);

        for (i, item) in ['a', 'b', 'c'].into_iter().enumerate() {
            history.append(item);
            assert_eq!(history.cursor(), Some(i));
            assert_eq!(history.current(), Some(&item));
        }

        // Even after navigating back, a new entry resets the cursor
        history.previous();
        history.previous();
        history.append('d');
        assert_eq!(history.cursor(), Some(3));
        assert_eq!(history.current(), Some(&'d'));
    }

    #[test]
    fn test_eviction_at_capacity() {
        let history = filled(3, &['a', 'b', 'c', 'd']);

        let all: Vec<_> = history.iter().copied().collect();
        assert_eq!(all, vec!['b', 'c', 'd']);
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), Some(2));
        assert_eq!(history.current(), Some(&'d'));
    }

    #[test]
    fn test_size_never_exceeds_capacity() {
        let mut history = History::new(4);
        for i in 0..50 {
            history.append(i);
            assert!(history.len() <= 4);
            assert_eq!(history.cursor(), Some(history.len() - 1));
        }
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let mut history = filled(0, &['a', 'b']);

        assert_eq!(history.capacity(), 1);
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), Some(0));
        assert_eq!(history.current(), Some(&'b'));
        assert_eq!(history.previous(), None);
    }

    #[test]
    fn test_walk_back_scenario() {
        let mut history = filled(3, &['a', 'b', 'c', 'd']);

        assert_eq!(history.previous(), Some(&'c'));
        assert_eq!(history.cursor(), Some(1));
        assert_eq!(history.previous(), Some(&'b'));
        assert_eq!(history.cursor(), Some(0));
        assert_eq!(history.previous(), None);
        assert_eq!(history.cursor(), Some(0));
    }

    #[test]
    fn test_previous_visits_each_once_in_reverse() {
        let items = ['a', 'b', 'c', 'd', 'e'];
        let mut history = filled(10, &items);

        let mut seen = Vec::new();
        while let Some(&item) = history.previous() {
            seen.push(item);
        }

        assert_eq!(seen, vec!['d', 'c', 'b', 'a']);
        assert_eq!(seen.len(), items.len() - 1);
    }

    #[test]
    fn test_next_returns_after_k_steps() {
        let mut history = filled(10, &['a', 'b', 'c', 'd', 'e']);

        for _ in 0..3 {
            history.previous();
        }
        assert_eq!(history.current(), Some(&'b'));

        assert_eq!(history.next(), Some(&'c'));
        assert_eq!(history.next(), Some(&'d'));
        assert_eq!(history.next(), Some(&'e'));
        assert!(history.at_newest());
        assert_eq!(history.next(), None);
        assert_eq!(history.current(), Some(&'e'));
    }

    #[test]
    fn test_single_entry() {
        let mut history = filled(1, &['a', 'b']);

        assert_eq!(history.current(), Some(&'b'));
        assert_eq!(history.previous(), None);
        assert_eq!(history.next(), None);
    }

    #[test]
    fn test_shared_history() {
        let shared = SharedHistory::new(2);
        assert!(shared.is_empty());
        assert_eq!(shared.previous(), None);

        for url in ["a", "b", "c"] {
            shared.append(Picture::new(url, Vec::new()));
        }

        assert_eq!(shared.len(), 2);
        assert_eq!(shared.capacity(), 2);
        assert_eq!(shared.current().unwrap().url(), "c");
        assert_eq!(shared.previous().unwrap().url(), "b");
        assert_eq!(shared.cursor(), Some(0));
        assert_eq!(shared.next().unwrap().url(), "c");

        let urls: Vec<_> = shared.snapshot().iter().map(|p| p.url().to_string()).collect();
        assert_eq!(urls, vec!["b", "c"]);
    }
}
