// Allocation tracking tests
//
// Run dhat test:
//   cargo test --test allocation_test -- --nocapture
//
// dhat only allows one profiler at a time, hence #[serial_test::serial].

use seqring::{ChannelBuilder, Cursor, ReadOutcome, RingBuffer};

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

#[test]
#[serial_test::serial]
fn write_and_read_do_not_allocate() {
    let _profiler = dhat::Profiler::builder().testing().build();

    // Construction is the only allocation
    let rb = RingBuffer::<u64>::new(1024).unwrap();
    let after_new = dhat::HeapStats::get();
    assert!(after_new.total_blocks >= 1);

    let mut cursor = Cursor::new();
    for i in 0..10_000u64 {
        unsafe {
            rb.write(i);
        }
        assert_eq!(rb.read(&mut cursor), Some(i));
    }

    // Lap the reader and walk it through a gap as well
    for i in 0..4096u64 {
        unsafe {
            rb.write(i);
        }
    }
    let gap = rb.read_with_gap(&mut cursor).gap().unwrap();
    cursor.skip_past(gap);
    while let ReadOutcome::Data(_) = rb.read_with_gap(&mut cursor) {}

    let stats = dhat::HeapStats::get();
    println!("Heap stats after 14,096 writes: {:?}", stats);
    dhat::assert_eq!(stats.total_blocks, after_new.total_blocks);
    dhat::assert_eq!(stats.total_bytes, after_new.total_bytes);
}

#[test]
#[serial_test::serial]
fn channel_hot_path_does_not_allocate() {
    let _profiler = dhat::Profiler::builder().testing().build();

    let (mut producer, mut consumer) = ChannelBuilder::new()
        .with_capacity(256)
        .build::<[u8; 32]>()
        .unwrap();
    let baseline = dhat::HeapStats::get();

    for i in 0..5_000u32 {
        producer.send([i as u8; 32]);
        if i % 3 == 0 {
            let _ = consumer.try_recv();
        }
    }
    while consumer.recv_with(&mut seqring::IgnoreGaps).is_data() {}

    let stats = dhat::HeapStats::get();
    dhat::assert_eq!(stats.total_blocks, baseline.total_blocks);
}

#[test]
#[serial_test::serial]
fn track_memory_with_memory_stats() {
    use memory_stats::memory_stats;

    let before = memory_stats();
    println!("Memory before: {:?}", before);

    let rb = RingBuffer::<u64>::new(1 << 16).unwrap();
    let mut cursor = Cursor::new();
    for i in 0..100_000u64 {
        unsafe {
            rb.write(i);
        }
        let _ = rb.read(&mut cursor);
    }

    let after = memory_stats();
    println!("Memory after: {:?}", after);

    if let (Some(b), Some(a)) = (before, after) {
        let delta = a.physical_mem as i64 - b.physical_mem as i64;
        println!("Memory delta: {} bytes ({:.2} KB)", delta, delta as f64 / 1024.0);
        println!(
            "  Note: the slot array is {} KB; writes and reads add nothing on top.",
            (1usize << 16) * std::mem::size_of::<seqring::SPMC::Buffer::Slot<u64>>() / 1024
        );
    }

    assert_eq!(rb.last_sequence(), 100_000);
}
