// One producer publishes SHA-256 digests, several consumers verify them.
//
//   cargo run --example broadcast -- <num_messages> [num_consumers]
//
// Consumers recompute the digest for every sequence they receive and skip over
// whatever the producer overwrote before they got to it. Ctrl+C stops early.
use seqring::{ChannelBuilder, Gap};
use sha2::{Digest, Sha256};
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Clone, Copy)]
struct Frame {
    index: u64,
    digest: [u8; 32],
}

fn digest_for(index: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(format!("message_{}", index).as_bytes());
    hasher.finalize().into()
}

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <num_messages> [num_consumers]", args[0]);
        std::process::exit(1);
    }
    let num_messages: u64 = args[1].parse().expect("Invalid number of messages");
    let num_consumers: usize = args
        .get(2)
        .map_or(Ok(4), |s| s.parse())
        .expect("Invalid consumer count");

    let running = Arc::new(AtomicBool::new(true));
    let running_for_handler = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_for_handler.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    println!("Producer: Precomputing {} digests...", num_messages);
    let frames: Vec<Frame> = (0..num_messages)
        .map(|index| Frame {
            index,
            digest: digest_for(index),
        })
        .collect();

    let (mut producer, first) = ChannelBuilder::new()
        .with_capacity(4096)
        .with_channel_id(1)
        .build::<Frame>()?;

    let mut consumers = vec![first];
    for _ in 1..num_consumers {
        consumers.push(producer.subscribe());
    }

    let handles: Vec<_> = consumers
        .into_iter()
        .enumerate()
        .map(|(id, mut consumer)| {
            thread::spawn(move || {
                let mut verified = 0u64;
                let mut on_gap = |gap: Gap| {
                    log::info!(
                        "consumer {}: would request replay of {}..={}",
                        id,
                        gap.start,
                        gap.end
                    );
                };
                loop {
                    match consumer.recv_timeout_with(Duration::from_millis(200), &mut on_gap) {
                        Ok(Some(frame)) => {
                            assert_eq!(
                                frame.digest,
                                digest_for(frame.index),
                                "corrupt frame {}",
                                frame.index
                            );
                            verified += 1;
                        }
                        Ok(None) => continue,
                        Err(_) => break,
                    }
                }
                (id, verified, consumer.stats())
            })
        })
        .collect();

    let start = Instant::now();
    for frame in &frames {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        producer.send(*frame);
    }
    let sent = producer.sent();
    let elapsed = start.elapsed();
    drop(producer);

    println!("Producer: Sent {} frames in {:.2?}", sent, elapsed);
    println!(
        "Producer: Throughput: {:.2} frames/sec",
        sent as f64 / elapsed.as_secs_f64()
    );

    println!("\n{:<10} {:>12} {:>8} {:>12}", "Consumer", "Verified", "Gaps", "Lost");
    println!("{}", "=".repeat(46));
    for h in handles {
        let (id, verified, stats) = h.join().expect("consumer panicked");
        println!("{:<10} {:>12} {:>8} {:>12}", id, verified, stats.gaps, stats.lost);
    }

    Ok(())
}
