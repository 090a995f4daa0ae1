//! Single-producer, single-consumer byte ring buffer.
//!
//! Both directions of an instance are built on this type: the interrupt
//! handler produces into the receive buffer the foreground consumes, and
//! the foreground produces into the transmit buffer the interrupt handler
//! consumes.
//!
//! The buffer carries an explicit occupancy count, so `get == put` is
//! unambiguous and all `N` slots are usable. Each index has exactly one
//! writer: the producer advances `put`, the consumer advances `get`, and
//! both sides move `count` with atomic read-modify-writes.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU16, Ordering};

/// Fixed-capacity circular byte queue.
///
/// Callers must uphold the SPSC discipline: at most one execution context
/// pushes and at most one pops at any time. The driver enforces this
/// structurally (the interrupt handler is the sole receive producer and
/// transmit consumer; the foreground is the sole transmit producer and
/// receive consumer).
pub struct RingBuffer<const N: usize> {
    buf: UnsafeCell<[u8; N]>,
    /// Next slot to read. Advanced only by the consumer.
    get: AtomicU16,
    /// Next slot to write. Advanced only by the producer.
    put: AtomicU16,
    /// Occupied slots. Raised by the producer, lowered by the consumer.
    count: AtomicU16,
}

// SAFETY: the only non-atomic field is `buf`, and a slot is touched by at
// most one side at a time: the producer writes a slot strictly before its
// release increment of `count` publishes it, and the consumer reads it only
// after an acquire load observes that increment (and vice versa for slot
// reuse after the consumer's release decrement).
unsafe impl<const N: usize> Sync for RingBuffer<N> {}

impl<const N: usize> RingBuffer<N> {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        const { assert!(N > 0 && N <= u16::MAX as usize, "capacity must fit a u16 index") };
        Self {
            buf: UnsafeCell::new([0; N]),
            get: AtomicU16::new(0),
            put: AtomicU16::new(0),
            count: AtomicU16::new(0),
        }
    }

    /// Appends one byte. Returns `false`, storing nothing, when full.
    ///
    /// Never suspends; callable from interrupt context. The caller charges
    /// the direction's overrun counter on `false`.
    pub fn try_push(&self, byte: u8) -> bool {
        if self.count.load(Ordering::Acquire) as usize == N {
            return false;
        }
        let put = self.put.load(Ordering::Relaxed) as usize;
        // SAFETY: `count < N`, so slot `put` is outside the occupied region
        // and the consumer will not read it until `count` is raised below.
        unsafe { (*self.buf.get())[put] = byte };
        self.put.store(((put + 1) % N) as u16, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Release);
        true
    }

    /// Removes and returns the oldest byte, or `None` when empty.
    pub fn try_pop(&self) -> Option<u8> {
        if self.count.load(Ordering::Acquire) == 0 {
            return None;
        }
        let get = self.get.load(Ordering::Relaxed) as usize;
        // SAFETY: `count > 0`, so slot `get` holds a byte the producer
        // published before its release increment, and the producer will not
        // overwrite it until `count` is lowered below.
        let byte = unsafe { (*self.buf.get())[get] };
        self.get.store(((get + 1) % N) as u16, Ordering::Relaxed);
        self.count.fetch_sub(1, Ordering::Release);
        Some(byte)
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.count.load(Ordering::Acquire) as usize
    }

    /// True when no bytes are buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of free slots.
    ///
    /// From the producer side this is a lower bound: the consumer can only
    /// grow it concurrently.
    pub fn free(&self) -> usize {
        N - self.len()
    }

    /// Total capacity in bytes.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drops all contents and rewinds the indices.
    ///
    /// Only valid while the instance's interrupts are disabled, i.e. during
    /// `initialize`; there is no safe concurrent reset.
    pub fn reset(&self) {
        self.get.store(0, Ordering::Relaxed);
        self.put.store(0, Ordering::Relaxed);
        self.count.store(0, Ordering::Relaxed);
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let rb = RingBuffer::<16>::new();
        for byte in 1..=10u8 {
            assert!(rb.try_push(byte));
        }
        for byte in 1..=10u8 {
            assert_eq!(rb.try_pop(), Some(byte));
        }
        assert_eq!(rb.try_pop(), None);
    }

    #[test]
    fn test_all_slots_usable() {
        // Explicit occupancy count: no one-slot sacrifice.
        let rb = RingBuffer::<4>::new();
        for byte in 0..4u8 {
            assert!(rb.try_push(byte));
        }
        assert_eq!(rb.len(), 4);
        assert!(!rb.try_push(99));
    }

    #[test]
    fn test_push_on_full_preserves_contents() {
        let rb = RingBuffer::<4>::new();
        for byte in 10..14u8 {
            assert!(rb.try_push(byte));
        }
        assert!(!rb.try_push(99));
        assert_eq!(rb.len(), 4);
        for byte in 10..14u8 {
            assert_eq!(rb.try_pop(), Some(byte));
        }
        assert_eq!(rb.try_pop(), None);
    }

    #[test]
    fn test_wraparound() {
        let rb = RingBuffer::<4>::new();
        for round in 0..10u8 {
            assert!(rb.try_push(round));
            assert!(rb.try_push(round.wrapping_add(100)));
            assert_eq!(rb.try_pop(), Some(round));
            assert_eq!(rb.try_pop(), Some(round.wrapping_add(100)));
        }
        assert!(rb.is_empty());
    }

    #[test]
    fn test_len_and_free() {
        let rb = RingBuffer::<8>::new();
        assert_eq!(rb.free(), 8);
        rb.try_push(1);
        rb.try_push(2);
        assert_eq!(rb.len(), 2);
        assert_eq!(rb.free(), 6);
        assert_eq!(rb.capacity(), 8);
    }

    #[test]
    fn test_reset() {
        let rb = RingBuffer::<4>::new();
        rb.try_push(1);
        rb.try_push(2);
        rb.reset();
        assert!(rb.is_empty());
        assert!(rb.try_push(7));
        assert_eq!(rb.try_pop(), Some(7));
    }
}
