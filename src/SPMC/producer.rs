// In src/SPMC/producer.rs
use super::consumer::Consumer;
use crate::SPMC::Buffer::RingBuffer;
use crate::SPMC::Structs::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The single writer of a channel.
///
/// There is exactly one `Producer` per ring: it is not `Clone` and `send`
/// takes `&mut self`, which is what makes the unchecked single-writer
/// contract of [`RingBuffer::write`] hold.
pub struct Producer<T> {
    pub(crate) ring: Arc<RingBuffer<T>>,
    pub(crate) channel_id: u32,
    pub(crate) keep_alive: Arc<AtomicBool>,
    pub(crate) sent: u64,
}

impl<T: Copy> Producer<T> {
    pub(crate) fn new(ring: Arc<RingBuffer<T>>, channel_id: u32) -> Self {
        Self {
            ring,
            channel_id,
            keep_alive: Arc::new(AtomicBool::new(true)),
            sent: 0,
        }
    }

    /// Publishes `value` and returns its sequence number.
    ///
    /// Never blocks and never fails; when the ring is full the oldest entry is
    /// overwritten and slow consumers will observe a gap.
    #[inline]
    pub fn send(&mut self, value: T) -> u64 {
        // SAFETY: this is the only handle that writes, and `&mut self` keeps
        // calls on it sequential.
        let seq = unsafe { self.ring.write(value) };
        self.sent += 1;
        seq
    }

    /// A new consumer that starts from the beginning of the stream
    /// (cursor 0). Whatever is still resident can be read; older entries show
    /// up as a gap.
    pub fn subscribe(&self) -> Consumer<T> {
        self.subscribe_at(Cursor::new())
    }

    /// A new consumer that only sees entries written after this call.
    pub fn subscribe_from_latest(&self) -> Consumer<T> {
        self.subscribe_at(Cursor::at(self.ring.last_sequence()))
    }

    fn subscribe_at(&self, cursor: Cursor) -> Consumer<T> {
        Consumer::new(
            Arc::clone(&self.ring),
            cursor,
            self.channel_id,
            Arc::clone(&self.keep_alive),
        )
    }
}

impl<T> Producer<T> {
    /// Number of values sent through this handle.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn channel_id(&self) -> u32 {
        self.channel_id
    }

    pub fn capacity(&self) -> u64 {
        self.ring.capacity()
    }

    /// The ring this producer writes into. Reads through it are safe; writes
    /// must keep going through [`send`](Self::send).
    pub fn ring(&self) -> &RingBuffer<T> {
        &self.ring
    }
}

impl<T> Drop for Producer<T> {
    fn drop(&mut self) {
        self.keep_alive.store(false, Ordering::Release);
        log::debug!(
            "channel {}: producer closed after {} writes",
            self.channel_id,
            self.sent
        );
    }
}
