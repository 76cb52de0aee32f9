// src/SPMC/consumer.rs

use crate::error::RingError;
use crate::SPMC::Buffer::RingBuffer;
use crate::SPMC::Structs::{ConsumerStats, Cursor, Gap, ReadOutcome};
use crossbeam_utils::Backoff;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Hook invoked when a consumer finds that part of the stream was
/// overwritten before it could read it.
///
/// Receives only the lost range; fetching that range from somewhere else
/// (a snapshot, a replay service) is entirely up to the implementation.
pub trait GapRecovery {
    fn on_gap(&mut self, gap: Gap);
}

impl<F: FnMut(Gap)> GapRecovery for F {
    fn on_gap(&mut self, gap: Gap) {
        self(gap)
    }
}

/// Accepts the loss and moves on.
#[derive(Clone, Copy, Debug, Default)]
pub struct IgnoreGaps;

impl GapRecovery for IgnoreGaps {
    fn on_gap(&mut self, _gap: Gap) {}
}

/// One reader of a channel, owning its own cursor.
///
/// Consumers never touch shared state, so any number of them can read the
/// same ring concurrently and each sees the full stream (minus whatever it
/// fell too far behind on). A consumer is `Send` but deliberately not
/// `Clone`: use [`resubscribe`](Self::resubscribe) for an independent copy.
pub struct Consumer<T> {
    ring: Arc<RingBuffer<T>>,
    cursor: Cursor,
    channel_id: u32,
    producer_alive: Arc<AtomicBool>,
    stats: ConsumerStats,
}

impl<T: Copy> Consumer<T> {
    pub(crate) fn new(
        ring: Arc<RingBuffer<T>>,
        cursor: Cursor,
        channel_id: u32,
        producer_alive: Arc<AtomicBool>,
    ) -> Self {
        Self {
            ring,
            cursor,
            channel_id,
            producer_alive,
            stats: ConsumerStats::default(),
        }
    }

    /// Reads the next entry if it is available.
    ///
    /// `None` means either "nothing new yet" or "the next entry was
    /// overwritten"; in the second case this keeps returning `None` until the
    /// cursor is moved. Use [`try_recv_with_gap`](Self::try_recv_with_gap) or
    /// [`recv_with`](Self::recv_with) when falling behind is possible.
    pub fn try_recv(&mut self) -> Option<T> {
        let value = self.ring.read(&mut self.cursor);
        if value.is_some() {
            self.stats.received += 1;
        }
        value
    }

    /// Reads the next entry, reporting overwritten ranges without moving the
    /// cursor past them.
    pub fn try_recv_with_gap(&mut self) -> ReadOutcome<T> {
        let outcome = self.ring.read_with_gap(&mut self.cursor);
        if outcome.is_data() {
            self.stats.received += 1;
        }
        outcome
    }

    /// Reads the next entry, skipping over any lost range.
    ///
    /// On a gap, `recovery` is told about the lost range, the cursor jumps to
    /// its end and the read is attempted once more. The returned outcome is
    /// that second attempt, which is `Lost` again only if the producer lapped
    /// this consumer in between.
    pub fn recv_with<R: GapRecovery + ?Sized>(&mut self, recovery: &mut R) -> ReadOutcome<T> {
        match self.try_recv_with_gap() {
            ReadOutcome::Lost(gap) => {
                recovery.on_gap(gap);
                self.skip(gap);
                self.try_recv_with_gap()
            }
            outcome => outcome,
        }
    }

    /// Moves the cursor past `gap` and records the loss.
    pub fn skip(&mut self, gap: Gap) {
        log::warn!(
            "channel {}: lost sequences {}..={} ({} entries), skipping ahead",
            self.channel_id,
            gap.start,
            gap.end,
            gap.width()
        );
        self.cursor.skip_past(gap);
        self.stats.gaps += 1;
        self.stats.lost += gap.width();
    }

    /// Polls until an entry arrives or `timeout` elapses, skipping gaps.
    ///
    /// # Returns
    /// * `Ok(Some(value))` if an entry was read
    /// * `Ok(None)` if the timeout was reached
    /// * `Err(RingError::Disconnected)` if the producer is gone and nothing is left
    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<T>, RingError> {
        self.recv_timeout_with(timeout, &mut IgnoreGaps)
    }

    /// [`recv_timeout`](Self::recv_timeout) with a gap collaborator.
    pub fn recv_timeout_with<R: GapRecovery + ?Sized>(
        &mut self,
        timeout: Duration,
        recovery: &mut R,
    ) -> Result<Option<T>, RingError> {
        let start = Instant::now();
        let backoff = Backoff::new();

        loop {
            if let ReadOutcome::Data(value) = self.recv_with(recovery) {
                return Ok(Some(value));
            }

            if !self.is_producer_alive() {
                // Writes made before the producer dropped are visible now
                return match self.recv_with(recovery) {
                    ReadOutcome::Data(value) => Ok(Some(value)),
                    _ => Err(RingError::Disconnected),
                };
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Ok(None);
            }

            if backoff.is_completed() {
                // Spinning is no longer paying off; sleep in short steps
                let remaining = timeout.saturating_sub(elapsed);
                std::thread::sleep(remaining.min(Duration::from_millis(1)));
            } else {
                backoff.snooze();
            }
        }
    }

    /// An independent consumer at the same position, with fresh stats.
    pub fn resubscribe(&self) -> Consumer<T> {
        Consumer::new(
            Arc::clone(&self.ring),
            self.cursor,
            self.channel_id,
            Arc::clone(&self.producer_alive),
        )
    }
}

impl<T> Consumer<T> {
    /// How many published-or-claimed writes this consumer has not read yet.
    pub fn lag(&self) -> u64 {
        self.ring
            .last_sequence()
            .saturating_sub(self.cursor.position())
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    pub fn stats(&self) -> ConsumerStats {
        self.stats
    }

    pub fn channel_id(&self) -> u32 {
        self.channel_id
    }

    pub fn capacity(&self) -> u64 {
        self.ring.capacity()
    }

    /// False once the producer handle has been dropped.
    pub fn is_producer_alive(&self) -> bool {
        self.producer_alive.load(Ordering::Acquire)
    }
}
