// A producer writing at a steady pace and a consumer that periodically stalls.
//
//   cargo run --example slow_consumer
//
// Shows the lag the consumer accumulates and how each stall turns into a gap
// that the consumer skips over.
use seqring::{ChannelBuilder, ReadOutcome};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let (mut producer, mut consumer) = ChannelBuilder::new()
        .with_capacity(1024)
        .build::<u64>()?;

    let stop = Arc::new(AtomicBool::new(false));
    let stop_for_writer = Arc::clone(&stop);

    let writer = thread::spawn(move || {
        let mut seq = 0u64;
        while !stop_for_writer.load(Ordering::Relaxed) {
            producer.send(seq);
            seq += 1;
            thread::sleep(Duration::from_micros(5));
        }
        producer.sent()
    });

    let mut max_lag = 0u64;
    let mut retries = 0u64;
    let deadline = Instant::now() + Duration::from_secs(2);
    let mut rng = fastrand::Rng::new();

    while Instant::now() < deadline {
        match consumer.try_recv_with_gap() {
            ReadOutcome::Data(_) => {
                max_lag = max_lag.max(consumer.lag());
                if rng.u16(..1000) == 0 {
                    // Stall long enough for the writer to lap us
                    thread::sleep(Duration::from_millis(20));
                }
            }
            ReadOutcome::NotReady => {
                retries += 1;
                thread::yield_now();
            }
            ReadOutcome::Lost(gap) => consumer.skip(gap),
        }
    }

    stop.store(true, Ordering::Relaxed);
    let written = writer.join().expect("writer panicked");
    let stats = consumer.stats();

    println!("End-to-end results:");
    println!("  Written: {}", written);
    println!("  Read: {}", stats.received);
    println!("  Retries: {}", retries);
    println!("  Gaps detected: {} ({} entries lost)", stats.gaps, stats.lost);
    println!("  Max lag: {} items", max_lag);
    println!(
        "  Delivery rate: {:.1}%",
        stats.received as f64 / written.max(1) as f64 * 100.0
    );

    Ok(())
}
