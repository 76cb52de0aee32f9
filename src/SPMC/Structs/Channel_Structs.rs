/// Per-consumer counters, kept by the consumer itself (never shared).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    /// Entries successfully read.
    pub received: u64,
    /// Gaps skipped over.
    pub gaps: u64,
    /// Sequence numbers covered by the skipped gaps.
    pub lost: u64,
}
