use super::{Consumer, Producer};
use crate::error::RingError;
use crate::SPMC::Buffer::RingBuffer;
use std::sync::Arc;

/// Configuration for a channel: one producer, any number of consumers over a
/// shared [`RingBuffer`].
pub struct ChannelBuilder {
    capacity: u64,
    channel_id: u32,
}

impl Default for ChannelBuilder {
    fn default() -> Self {
        Self {
            capacity: 1024, // slots
            channel_id: 0,  // Default channel ID
        }
    }
}

impl ChannelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots. Must be a non-zero power of two.
    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Label carried by the handles and used in log output.
    pub fn with_channel_id(mut self, channel_id: u32) -> Self {
        self.channel_id = channel_id;
        self
    }

    pub fn build_producer<T: Copy>(self) -> Result<Producer<T>, RingError> {
        let ring = RingBuffer::new(self.capacity).map_err(|e| {
            log::debug!("channel {}: {}", self.channel_id, e);
            e
        })?;
        log::debug!(
            "channel {}: created ring with {} slots",
            self.channel_id,
            self.capacity
        );
        Ok(Producer::new(Arc::new(ring), self.channel_id))
    }

    /// Producer plus a first consumer starting at the beginning of the stream.
    /// More consumers come from [`Producer::subscribe`].
    pub fn build<T: Copy>(self) -> Result<(Producer<T>, Consumer<T>), RingError> {
        let producer = self.build_producer()?;
        let consumer = producer.subscribe();
        Ok((producer, consumer))
    }
}
