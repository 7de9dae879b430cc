//! # Prefetch Buffer Module
//!
//! This module provides the bounded blocking queue between the fetch
//! workers and the viewer.
//!
//! ## Plain English Explanation
//!
//! Imagine a small counter at a bakery with room for exactly 5 trays.
//! - Bakers (workers) put trays on the counter. If it is full, they stand
//!   in line until a spot opens.
//! - Customers (the viewer) take the oldest tray. If the counter is empty,
//!   they stand in line until a tray arrives.
//! - Both lines are first come, first served: nobody can cut in.
//!
//! A waiting customer can also be tapped on the shoulder (an [`Interrupt`]).
//! They look around, and go back to waiting, up to a fixed number of times
//! before giving up.

mod interrupt;

pub use interrupt::Interrupt;

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::error::{WurstballError, WurstballResult};
use interrupt::Wake;

// ============================================
// SHARED STATE
// ============================================

/// Everything behind the lock.
///
/// `producers` and `consumers` hold the tickets of blocked callers in
/// arrival order; only the ticket at the front may proceed.
struct State<T> {
    items: VecDeque<T>,
    producers: VecDeque<u64>,
    consumers: VecDeque<u64>,
    next_ticket: u64,
    closed: bool,
}

impl<T> State<T> {
    fn issue_ticket(&mut self) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket = self.next_ticket.wrapping_add(1);
        ticket
    }
}

struct Shared<T> {
    state: Mutex<State<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl<T: Send> Wake for Shared<T> {
    fn wake(&self) {
        // Taking the lock orders this after the waiter's flag check.
        let _state = self.state.lock();
        self.not_empty.notify_all();
    }
}

// ============================================
// PREFETCH BUFFER
// ============================================

/// A fixed-capacity, fair, blocking FIFO queue.
///
/// ## Guarantees
/// - `0 <= len() <= capacity()` at all times
/// - `put` blocks while full, `take` blocks while empty
/// - Blocked producers (and blocked consumers) are served in the order
///   they started waiting
pub struct PrefetchBuffer<T> {
    shared: Arc<Shared<T>>,

    /// How many interrupted waits `take_interruptible` tolerates
    interrupt_retries: u32,
}

impl<T: Send + 'static> PrefetchBuffer<T> {
    /// Creates an empty buffer.
    ///
    /// ## Parameters
    /// - `capacity`: Maximum number of queued items (at least 1)
    /// - `interrupt_retries`: Interrupted waits tolerated by
    ///   [`take_interruptible`](Self::take_interruptible) before it gives up
    pub fn new(capacity: usize, interrupt_retries: u32) -> Self {
        let capacity = capacity.max(1);

        log::info!(
            "Creating prefetch buffer: {} slots, {} interrupt retries",
            capacity,
            interrupt_retries
        );

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    items: VecDeque::with_capacity(capacity),
                    producers: VecDeque::new(),
                    consumers: VecDeque::new(),
                    next_ticket: 0,
                    closed: false,
                }),
                not_full: Condvar::new(),
                not_empty: Condvar::new(),
                capacity,
            }),
            interrupt_retries: interrupt_retries.max(1),
        }
    }

    /// Adds an item, blocking while the buffer is full.
    ///
    /// ## Errors
    /// [`WurstballError::BufferClosed`] if the buffer is (or becomes) closed
    /// before a slot opens. The item is dropped in that case.
    pub fn put(&self, item: T) -> WurstballResult<()> {
        let shared = &*self.shared;
        let mut state = shared.state.lock();

        if state.closed {
            return Err(WurstballError::BufferClosed);
        }

        // Fast path: nobody in line and there is room
        if state.producers.is_empty() && state.items.len() < shared.capacity {
            state.items.push_back(item);
            shared.not_empty.notify_all();
            return Ok(());
        }

        let ticket = state.issue_ticket();
        state.producers.push_back(ticket);

        let result = loop {
            if state.closed {
                break Err(WurstballError::BufferClosed);
            }
            if state.producers.front() == Some(&ticket) && state.items.len() < shared.capacity {
                state.items.push_back(item);
                break Ok(());
            }
            shared.not_full.wait(&mut state);
        };

        state.producers.retain(|&t| t != ticket);
        shared.not_empty.notify_all();
        // The next producer in line may fit too
        shared.not_full.notify_all();
        result
    }

    /// Removes the oldest item, blocking while the buffer is empty.
    ///
    /// ## Errors
    /// [`WurstballError::BufferClosed`] once the buffer is closed and drained.
    pub fn take(&self) -> WurstballResult<T> {
        self.take_inner(None)
    }

    /// Like [`take`](Self::take), but gives up after repeated interrupts.
    ///
    /// ## What Happens (Plain English)
    ///
    /// 1. If something is ready and nobody is ahead of us, take it
    /// 2. Otherwise wait in line
    /// 3. Each time `interrupt` is raised, the raise is consumed, logged,
    ///    and we go back to waiting (keeping our place in line)
    /// 4. After `interrupt_retries` interrupts we leave the line and return
    ///    [`WurstballError::Interrupted`]
    pub fn take_interruptible(&self, interrupt: &Interrupt) -> WurstballResult<T> {
        interrupt.register(self.shared.clone());
        let result = self.take_inner(Some(interrupt));
        interrupt.unregister();
        result
    }

    fn take_inner(&self, interrupt: Option<&Interrupt>) -> WurstballResult<T> {
        let shared = &*self.shared;
        let mut state = shared.state.lock();

        // Fast path: nobody in line and something to take
        if state.consumers.is_empty() {
            if let Some(item) = state.items.pop_front() {
                shared.not_full.notify_all();
                return Ok(item);
            }
        }

        let ticket = state.issue_ticket();
        state.consumers.push_back(ticket);
        let mut interrupted = 0u32;

        let result = loop {
            if state.consumers.front() == Some(&ticket) {
                if let Some(item) = state.items.pop_front() {
                    break Ok(item);
                }
            }
            if state.closed && state.items.is_empty() {
                break Err(WurstballError::BufferClosed);
            }
            if let Some(interrupt) = interrupt {
                if interrupt.clear() {
                    interrupted += 1;
                    log::error!(
                        "Interrupted while waiting for pictures (attempt {}/{})",
                        interrupted,
                        self.interrupt_retries
                    );
                    if interrupted >= self.interrupt_retries {
                        break Err(WurstballError::Interrupted {
                            attempts: interrupted,
                        });
                    }
                    continue;
                }
            }
            shared.not_empty.wait(&mut state);
        };

        state.consumers.retain(|&t| t != ticket);
        // Let the next consumer in line re-check
        shared.not_empty.notify_all();
        if result.is_ok() {
            shared.not_full.notify_all();
        }
        result
    }

    /// Closes the buffer and wakes every waiter.
    ///
    /// Blocked and future `put`s fail; `take`s drain what is left, then fail.
    pub fn close(&self) {
        let mut state = self.shared.state.lock();
        if !state.closed {
            state.closed = true;
            log::info!("Prefetch buffer closed with {} item(s) left", state.items.len());
        }
        self.shared.not_full.notify_all();
        self.shared.not_empty.notify_all();
    }

    /// Returns the number of queued items
    pub fn len(&self) -> usize {
        self.shared.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.state.lock().items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.shared.state.lock().items.len() >= self.shared.capacity
    }

    /// Returns the maximum number of queued items
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed
    }

    /// Producers currently blocked in `put`
    pub fn waiting_producers(&self) -> usize {
        self.shared.state.lock().producers.len()
    }

    /// Consumers currently blocked in `take`
    pub fn waiting_consumers(&self) -> usize {
        self.shared.state.lock().consumers.len()
    }
}

// ============================================
// TESTS
// ============================================
