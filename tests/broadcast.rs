use seqring::{ChannelBuilder, Cursor, ReadOutcome, RingBuffer};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// Payload large enough that a torn copy would be visible: every word must
/// carry the same value.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Frame {
    words: [u64; 6],
}

impl Frame {
    fn new(value: u64) -> Self {
        Self { words: [value; 6] }
    }

    fn value(&self) -> u64 {
        let first = self.words[0];
        assert!(
            self.words.iter().all(|w| *w == first),
            "torn frame: {:?}",
            self.words
        );
        first
    }
}

#[test]
fn every_reader_sees_every_write_when_keeping_pace() {
    // Capacity covers the whole run, so nobody can be lapped
    let total = 20_000u64;
    let readers = 4;
    let (mut producer, first) = ChannelBuilder::new()
        .with_capacity(32_768)
        .build::<u64>()
        .unwrap();

    let mut consumers = vec![first];
    for _ in 1..readers {
        consumers.push(producer.subscribe());
    }

    let handles: Vec<_> = consumers
        .into_iter()
        .map(|mut consumer| {
            thread::spawn(move || {
                let mut expected = 0u64;
                while expected < total {
                    match consumer.try_recv_with_gap() {
                        ReadOutcome::Data(v) => {
                            assert_eq!(v, expected);
                            expected += 1;
                        }
                        ReadOutcome::NotReady => std::hint::spin_loop(),
                        ReadOutcome::Lost(gap) => panic!("unexpected gap {gap:?}"),
                    }
                }
                consumer.stats()
            })
        })
        .collect();

    for i in 0..total {
        producer.send(i);
    }

    for h in handles {
        let stats = h.join().unwrap();
        assert_eq!(stats.received, total);
        assert_eq!(stats.gaps, 0);
    }
}

#[test]
fn reader_in_lockstep_never_sees_gap() {
    // Small ring, random cadence; the reader drains before each new write
    let rb = RingBuffer::<u64>::new(4).unwrap();
    let mut cursor = Cursor::new();
    let mut rng = fastrand::Rng::with_seed(7);

    let mut next_value = 0u64;
    for _ in 0..10_000 {
        let burst = rng.u64(1..=4);
        for _ in 0..burst {
            unsafe {
                rb.write(next_value);
            }
            next_value += 1;
        }
        let mut drained = 0;
        loop {
            match rb.read_with_gap(&mut cursor) {
                ReadOutcome::Data(_) => drained += 1,
                ReadOutcome::NotReady => break,
                ReadOutcome::Lost(gap) => panic!("gap {gap:?} at cursor {cursor:?}"),
            }
        }
        assert_eq!(drained, burst);
    }
    assert_eq!(cursor.position(), next_value);
}

#[test]
fn lapped_readers_never_observe_torn_or_out_of_order_frames() {
    let capacity = 64;
    let readers = 3;
    let (mut producer, first) = ChannelBuilder::new()
        .with_capacity(capacity)
        .build::<Frame>()
        .unwrap();

    let mut consumers = vec![first];
    for _ in 1..readers {
        consumers.push(producer.subscribe());
    }

    let stop = Arc::new(AtomicBool::new(false));
    let start = Arc::new(Barrier::new(readers + 1));

    let handles: Vec<_> = consumers
        .into_iter()
        .enumerate()
        .map(|(id, mut consumer)| {
            let stop = Arc::clone(&stop);
            let start = Arc::clone(&start);
            thread::spawn(move || {
                let mut rng = fastrand::Rng::with_seed(id as u64);
                let mut last: Option<u64> = None;
                start.wait();
                while !stop.load(Ordering::Acquire) {
                    match consumer.try_recv_with_gap() {
                        ReadOutcome::Data(frame) => {
                            let v = frame.value();
                            // Sequence n carries value n - 1
                            assert_eq!(v + 1, consumer.cursor().position());
                            if let Some(prev) = last {
                                assert!(v > prev, "went backwards: {prev} -> {v}");
                            }
                            last = Some(v);
                            // Slow down at random so the writer laps us
                            if rng.u8(..) < 8 {
                                thread::sleep(Duration::from_micros(50));
                            }
                        }
                        ReadOutcome::NotReady => std::hint::spin_loop(),
                        ReadOutcome::Lost(gap) => {
                            assert_eq!(gap.start, consumer.cursor().next());
                            assert!(gap.end >= gap.start);
                            consumer.skip(gap);
                        }
                    }
                }
                consumer.stats()
            })
        })
        .collect();

    start.wait();
    for i in 0..200_000u64 {
        producer.send(Frame::new(i));
    }
    stop.store(true, Ordering::Release);

    for h in handles {
        let stats = h.join().unwrap();
        assert!(stats.received > 0);
    }
}

#[test]
fn concurrent_plain_reads_are_monotonic() {
    let rb = Arc::new(RingBuffer::<u64>::new(1024).unwrap());
    let total = 1000u64;
    let read = Arc::new(AtomicU64::new(0));

    let writer = {
        let rb = Arc::clone(&rb);
        thread::spawn(move || {
            for i in 0..total {
                // SAFETY: this thread is the only writer
                unsafe {
                    rb.write(i);
                }
            }
        })
    };

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let rb = Arc::clone(&rb);
            let read = Arc::clone(&read);
            thread::spawn(move || {
                let mut cursor = Cursor::new();
                let mut expected = 0;
                while expected < total {
                    if let Some(v) = rb.read(&mut cursor) {
                        assert_eq!(v, expected);
                        expected += 1;
                        read.fetch_add(1, Ordering::Relaxed);
                    } else {
                        thread::yield_now();
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }
    assert_eq!(read.load(Ordering::Relaxed), total * 2);
}
