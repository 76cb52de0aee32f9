// Reader-side values: the caller-owned cursor and what a read can return

/// A reader's position in the ring: the sequence number it consumed last.
///
/// A fresh cursor sits at 0, so the first expected sequence is 1. The buffer
/// never stores cursors; each reader keeps its own and passes it to every read.
/// Two readers must not advance the same cursor, or each will see only part
/// of the stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor(u64);

impl Cursor {
    pub const fn new() -> Self {
        Self(0)
    }

    /// A cursor that has already consumed everything up to `position`.
    pub const fn at(position: u64) -> Self {
        Self(position)
    }

    /// Last consumed sequence number.
    pub const fn position(&self) -> u64 {
        self.0
    }

    /// Sequence number the next read expects. Wraps to 0 at `u64::MAX`;
    /// the ring never matches 0, so such a cursor only ever reads "not ready".
    pub const fn next(&self) -> u64 {
        self.0.wrapping_add(1)
    }

    /// Moves the cursor to the end of `gap`, so the next read targets the
    /// first sequence number after the lost range.
    pub fn skip_past(&mut self, gap: Gap) {
        self.0 = gap.end;
    }

    pub fn set(&mut self, position: u64) {
        self.0 = position;
    }

    #[inline]
    pub(crate) fn advance_to(&mut self, seq: u64) {
        self.0 = seq;
    }
}

/// An inclusive range of sequence numbers that were overwritten before the
/// reader got to them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Gap {
    pub start: u64,
    pub end: u64,
}

impl Gap {
    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Number of sequence numbers in the range. Equals the number of writes
    /// that happened after the expected one, i.e. how far the reader lagged.
    pub const fn width(&self) -> u64 {
        if self.end < self.start {
            return 0;
        }
        (self.end - self.start).saturating_add(1)
    }

    pub const fn contains(&self, seq: u64) -> bool {
        seq >= self.start && seq <= self.end
    }
}

/// Result of [`RingBuffer::read_with_gap`](crate::RingBuffer::read_with_gap).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadOutcome<T> {
    /// The expected entry; the cursor has moved onto it.
    Data(T),
    /// Nothing new has been published yet. Retry later.
    NotReady,
    /// The expected entry was overwritten. The cursor did not move.
    Lost(Gap),
}

impl<T> ReadOutcome<T> {
    pub fn into_data(self) -> Option<T> {
        match self {
            ReadOutcome::Data(value) => Some(value),
            _ => None,
        }
    }

    pub fn gap(&self) -> Option<Gap> {
        match self {
            ReadOutcome::Lost(gap) => Some(*gap),
            _ => None,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, ReadOutcome::Data(_))
    }
}
