// This is the broadcast ring shared by one producer and any number of consumers

use super::layout::Slot;
use crossbeam_utils::CachePadded;
use std::sync::atomic::AtomicU64;

/// A wait-free, overwrite-on-full ring buffer with one writer and many readers.
///
/// ### Concurrency Design:
/// - **Writer**: claims the next sequence number from `writer_cursor`, copies the
///   payload into `slots[seq & mask]` and then publishes `seq` into the slot's
///   sequence word with a release store. It never waits for readers.
/// - **Readers**: each one owns a [`Cursor`](crate::Cursor) outside the buffer.
///   A reader expecting sequence `next` acquire-loads the sequence word of
///   `slots[next & mask]`: equal means ready, lower means not written yet,
///   higher means the slot has been overwritten since.
///
/// Exactly one thread may write at a time (see [`RingBuffer::write`]). Readers
/// never modify the buffer, so they cannot disturb each other.
pub struct RingBuffer<T> {
    /// Pre-allocated slots, never reallocated.
    pub(crate) slots: Box<[Slot<T>]>,

    /// A bitmask used to wrap sequence numbers around the buffer.
    /// Calculated as `capacity - 1`.
    pub(crate) mask: u64,

    /// Sequence number of the most recently claimed write (0 before the first).
    /// Padded so the writer's counter does not share a line with slot data.
    pub(crate) writer_cursor: CachePadded<AtomicU64>,
}

// SAFETY: readers only ever obtain bitwise copies of `T` after validating the
// slot's sequence number, and writes are serialised by the single-writer contract.
unsafe impl<T: Send> Send for RingBuffer<T> {}
unsafe impl<T: Send> Sync for RingBuffer<T> {}
