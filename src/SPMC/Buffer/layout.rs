use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::AtomicU64;

/// Cache line size the slot layout is padded to.
pub const CACHE_LINE: usize = 64;

/// Set in a slot's sequence word while the writer is copying a payload in.
/// The remaining bits carry the sequence number being written.
pub(crate) const WRITE_IN_PROGRESS: u64 = 1 << 63;

/// A single slot in the ring buffer.
///
/// Aligned to a cache line so the slot the writer is filling never shares a
/// line with the neighbouring slot a reader is loading.
#[repr(C, align(64))]
pub struct Slot<T> {
    /// The sequence number of the last write that targeted this slot.
    /// - `0` until the slot is written for the first time.
    /// - `seq | WRITE_IN_PROGRESS` while the writer copies the payload of `seq`.
    /// - `seq` once that payload is published (release store).
    pub sequence: AtomicU64,

    /// Payload of the last published write. Uninitialised while `sequence == 0`.
    pub(crate) payload: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    pub(crate) fn empty() -> Self {
        Self {
            sequence: AtomicU64::new(0),
            payload: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }
}
