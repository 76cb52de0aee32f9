//! # seqring
//!
//! A fixed-capacity, lock-free ring buffer with one writer and any number of
//! independent readers. The writer never blocks: once the ring is full it
//! overwrites the oldest slot. Every reader owns a [`Cursor`] and uses the
//! per-slot sequence numbers to tell "nothing new yet" apart from "what I
//! wanted was overwritten" (a [`Gap`]).
//!
//! ```
//! use seqring::{ChannelBuilder, ReadOutcome};
//!
//! let (mut producer, mut consumer) = ChannelBuilder::new()
//!     .with_capacity(16)
//!     .build::<u64>()
//!     .unwrap();
//!
//! producer.send(7);
//! assert_eq!(consumer.try_recv(), Some(7));
//! assert!(matches!(consumer.try_recv_with_gap(), ReadOutcome::NotReady));
//! ```

// Module naming follows project convention (SPMC = Single-Producer Multi-Consumer)
#[allow(non_snake_case)]
pub mod SPMC;

#[allow(non_snake_case)]
pub mod Debug {
    pub mod StructDebug;
}

pub mod error;
pub mod ffi;

pub use error::RingError;
pub use SPMC::Buffer::RingBuffer;
pub use SPMC::Structs::{ConsumerStats, Cursor, Gap, ReadOutcome};
pub use SPMC::{ChannelBuilder, Consumer, GapRecovery, IgnoreGaps, Producer};
