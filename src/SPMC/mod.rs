mod builder;
mod consumer;
mod debug;
mod producer;

pub use builder::ChannelBuilder;
pub use consumer::{Consumer, GapRecovery, IgnoreGaps};
pub use producer::Producer;

pub mod Buffer {
    pub mod Buffer;
    pub mod Buffer_impl;
    pub mod layout;
    pub use Buffer::RingBuffer; // re-export for stable path
    pub use layout::{Slot, CACHE_LINE};
}

pub mod Structs {
    pub mod Channel_Structs;
    pub mod Read_Structs;
    pub use Channel_Structs::ConsumerStats; // re-export for stable path
    pub use Read_Structs::{Cursor, Gap, ReadOutcome};
}
