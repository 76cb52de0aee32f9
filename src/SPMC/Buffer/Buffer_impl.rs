use std::mem::{size_of, MaybeUninit};
use std::ptr;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};
use std::sync::atomic::{fence, AtomicU64};

use super::layout::{Slot, WRITE_IN_PROGRESS};
use super::Buffer::RingBuffer;
use crate::error::RingError;
use crate::SPMC::Structs::Read_Structs::{Cursor, Gap, ReadOutcome};
use crossbeam_utils::CachePadded;

/// What the slot for an expected sequence number holds right now.
enum SlotState<T> {
    Ready(T),
    /// Not written yet (or being written with exactly the expected sequence).
    Behind,
    /// Overwritten; carries the newer sequence number occupying the slot.
    Ahead(u64),
}

impl<T> RingBuffer<T> {
    /// Number of slots. Fixed for the lifetime of the buffer.
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.slots.len() as u64
    }

    /// `capacity - 1`. External code can use it to compute slot indices the
    /// same way the buffer does (`seq & mask`).
    #[inline]
    pub fn mask(&self) -> u64 {
        self.mask
    }

    /// Sequence number of the last claimed write, 0 if nothing was written.
    #[inline]
    pub fn last_sequence(&self) -> u64 {
        self.writer_cursor.load(Acquire)
    }

    #[inline]
    fn slot(&self, seq: u64) -> &Slot<T> {
        // mask < slots.len(), so the index is always in bounds
        &self.slots[(seq & self.mask) as usize]
    }
}

impl<T: Copy> RingBuffer<T> {
    /// Allocates a ring with `capacity` slots.
    ///
    /// Returns `RingError::InvalidCapacity` if `capacity` is zero, not a power
    /// of two, or too large to allocate. All slots start with sequence 0 and
    /// the writer cursor at 0.
    pub fn new(capacity: u64) -> Result<Self, RingError> {
        if !capacity.is_power_of_two() {
            return Err(RingError::InvalidCapacity(capacity));
        }
        let len = usize::try_from(capacity).map_err(|_| RingError::InvalidCapacity(capacity))?;
        // The slot array must fit in a single allocation
        match len.checked_mul(size_of::<Slot<T>>()) {
            Some(bytes) if bytes <= isize::MAX as usize => {}
            _ => return Err(RingError::InvalidCapacity(capacity)),
        }

        let slots: Box<[Slot<T>]> = (0..len).map(|_| Slot::empty()).collect();

        Ok(Self {
            slots,
            mask: capacity - 1,
            writer_cursor: CachePadded::new(AtomicU64::new(0)),
        })
    }

    /// Appends `value`, overwriting the oldest slot once the ring is full.
    /// Returns the sequence number assigned to the write (the first is 1).
    ///
    /// Wait-free and allocation-free.
    ///
    /// # Safety
    /// At most one thread may be inside `write` at any time. Readers may run
    /// concurrently. [`Producer`](crate::Producer) upholds this by construction.
    #[inline]
    pub unsafe fn write(&self, value: T) -> u64 {
        let seq = self.writer_cursor.fetch_add(1, Relaxed) + 1;
        let slot = self.slot(seq);

        // Mark the slot busy before touching the payload so a reader that was
        // copying the previous occupant sees the sequence change.
        slot.sequence.store(seq | WRITE_IN_PROGRESS, Relaxed);
        fence(Release);

        ptr::write_volatile(slot.payload.get(), MaybeUninit::new(value));

        // Publish
        slot.sequence.store(seq, Release);
        seq
    }

    /// Reads the entry after `cursor` and advances the cursor on success.
    ///
    /// Returns `None` both when the entry has not been written yet and when it
    /// has already been overwritten. Use [`read_with_gap`](Self::read_with_gap)
    /// to tell the two apart.
    #[inline]
    pub fn read(&self, cursor: &mut Cursor) -> Option<T> {
        let next = cursor.next();
        match self.inspect(next) {
            SlotState::Ready(value) => {
                cursor.advance_to(next);
                Some(value)
            }
            SlotState::Behind | SlotState::Ahead(_) => None,
        }
    }

    /// Like [`read`](Self::read), but reports overwritten entries.
    ///
    /// On `ReadOutcome::Lost` the cursor is left where it was; the caller picks
    /// a recovery (usually [`Cursor::skip_past`]).
    #[inline]
    pub fn read_with_gap(&self, cursor: &mut Cursor) -> ReadOutcome<T> {
        let next = cursor.next();
        match self.inspect(next) {
            SlotState::Ready(value) => {
                cursor.advance_to(next);
                ReadOutcome::Data(value)
            }
            SlotState::Behind => ReadOutcome::NotReady,
            SlotState::Ahead(seen) => ReadOutcome::Lost(Gap::new(next, seen - 1)),
        }
    }

    fn inspect(&self, next: u64) -> SlotState<T> {
        // 0 marks a never-written slot and the top bit marks a busy one;
        // neither can be a published sequence number.
        if next == 0 || next & WRITE_IN_PROGRESS != 0 {
            return SlotState::Behind;
        }

        let slot = self.slot(next);
        let seen = slot.sequence.load(Acquire);

        if seen != next {
            let seen = seen & !WRITE_IN_PROGRESS;
            return if seen > next {
                SlotState::Ahead(seen)
            } else {
                SlotState::Behind
            };
        }

        // The copy may race with the writer lapping this slot; it stays inside
        // MaybeUninit until the sequence re-check below confirms it.
        let value = unsafe { ptr::read_volatile(slot.payload.get()) };
        fence(Acquire);
        let after = slot.sequence.load(Relaxed);

        if after == next {
            // SAFETY: `next` is non-zero, so it was published after its payload
            // was written, and the slot was not touched while we copied it.
            return SlotState::Ready(unsafe { value.assume_init() });
        }

        let after = after & !WRITE_IN_PROGRESS;
        if after > next {
            SlotState::Ahead(after)
        } else {
            SlotState::Behind
        }
    }
}
