use crate::SPMC::Buffer::RingBuffer;
use crate::SPMC::{Consumer, Producer};
use std::fmt;
use std::sync::atomic::Ordering;

/// Debug function for RingBuffer
///
/// Shows the addressing parameters and the writer position. Payloads are
/// never read, so this is safe to call while the writer is active.
pub fn debug_ring_buffer<T>(buffer: &RingBuffer<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RingBuffer")
        .field("slots", &format_args!("{:p}", buffer.slots.as_ptr()))
        .field("capacity", &buffer.capacity())
        .field("mask", &format_args!("{:#x}", buffer.mask()))
        .field("writer_cursor", &buffer.writer_cursor.load(Ordering::Relaxed))
        .finish()
}

/// Debug function for Producer
pub fn debug_producer<T>(producer: &Producer<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Producer")
        .field("channel_id", &producer.channel_id())
        .field("sent", &producer.sent())
        .field("ring", producer.ring())
        .finish()
}

/// Debug function for Consumer
///
/// Shows the reader's own position next to the writer's, plus its counters.
pub fn debug_consumer<T>(consumer: &Consumer<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Consumer")
        .field("channel_id", &consumer.channel_id())
        .field("cursor", &consumer.cursor().position())
        .field("lag", &consumer.lag())
        .field("stats", &consumer.stats())
        .field("producer_alive", &consumer.is_producer_alive())
        .finish_non_exhaustive()
}
