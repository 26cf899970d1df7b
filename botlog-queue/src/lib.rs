//! The Botlog-Queue Crate

#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    missing_debug_implementations,
    non_ascii_idents,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    variant_size_differences
)]

#[macro_use]
extern crate log;

use std::time::{Duration, Instant};

/// A bounded FIFO of payloads awaiting a bulk flush.
/// When the queue is full, pushing evicts the oldest payload.
#[derive(Debug)]
pub struct BatchQueue<T> {
    slots: Box<[Option<T>]>,
    read: usize,
    write: usize,
    full: bool,
}

impl<T> BatchQueue<T> {
    /// Creates a new batch queue
    ///
    /// # Panics
    /// Panics if the specified capacity is non-positive
    pub fn new(capacity: usize) -> BatchQueue<T> {
        assert!(capacity > 0, "Batch queue capacity must be positive");

        let slots: Vec<Option<T>> = (0..capacity).map(|_| None).collect();
        BatchQueue {
            slots: slots.into_boxed_slice(),
            read: 0,
            write: 0,
            full: false,
        }
    }

    /// TRUE if the queue is completely full
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// TRUE if the queue is completely empty
    pub fn is_empty(&self) -> bool {
        return (self.read == self.write) && !self.full;
    }

    /// The maximal number of payloads the queue holds
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The number of payloads currently in the queue
    pub fn len(&self) -> usize {
        if self.is_full() {
            return self.capacity();
        }

        if self.write >= self.read {
            self.write - self.read
        } else {
            self.capacity() - self.read + self.write
        }
    }

    /// Appends a payload. Returns the evicted payload if the queue was full.
    pub fn push(&mut self, payload: T) -> Option<T> {
        let evicted = if self.full {
            let oldest = self.slots[self.read].take();
            self.read = (self.read + 1) % self.capacity();
            trace!("Batch queue full, evicting oldest payload");
            oldest
        } else {
            None
        };

        self.slots[self.write] = Some(payload);
        self.write = (self.write + 1) % self.capacity();
        self.full = self.write == self.read;
        evicted
    }

    /// The oldest payload, without removing it
    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.read].as_ref()
    }

    /// Removes every payload, oldest first
    pub fn flush(&mut self) -> Vec<T> {
        let mut batch = Vec::with_capacity(self.len());
        while !self.is_empty() {
            if let Some(payload) = self.slots[self.read].take() {
                batch.push(payload);
            }
            self.read = (self.read + 1) % self.capacity();
            self.full = false;
        }

        self.read = 0;
        self.write = 0;
        debug!("Flushed {} payloads", batch.len());
        batch
    }
}

/// Default interval between two batch flushes
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(250);

/// Tracks when the owner of a batch queue should flush it
#[derive(Debug, Clone, Copy)]
pub struct FlushTimer {
    interval: Duration,
    last_flush: Instant,
}

impl FlushTimer {
    pub fn new(interval: Duration) -> FlushTimer {
        FlushTimer {
            interval,
            last_flush: Instant::now(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// TRUE if at least one interval elapsed since the last flush
    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_flush) >= self.interval
    }

    /// Marks the queue as flushed at `now`
    pub fn reset(&mut self, now: Instant) {
        self.last_flush = now;
    }
}

impl Default for FlushTimer {
    fn default() -> Self {
        FlushTimer::new(DEFAULT_FLUSH_INTERVAL)
    }
}
