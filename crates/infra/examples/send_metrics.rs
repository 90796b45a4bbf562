//! Record a few metrics and ship them to a collector.
//!
//! ```text
//! BUCKY_ENDPOINT=http://localhost:8005/bucky/v1/send cargo run -p bucky-infra --example send_metrics
//! ```

use std::time::Instant;

use bucky_infra::{config, init_logging, BuckyClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let client = BuckyClient::new(config::load()?)?;

    for _ in 0..10 {
        let started = Instant::now();
        tokio::task::yield_now().await;
        let elapsed = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);

        client.count("example.requests", 1);
        client.average_timer("example.latency", elapsed);
    }

    client.stop().await?;
    Ok(())
}
