//! Collect an entire log into memory and decode double-typed payloads.
//!
//! Usage: cargo run --example collect -- path/to/data.wpilog

use anyhow::Result;
use wpilog_stream::{read_log, wire, ReaderSource};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data.wpilog".into());

    let log = read_log(ReaderSource::open(&path).await?).await?;
    println!(
        "{} entries, {} data records",
        log.entries.len(),
        log.record_count()
    );

    let mut entries: Vec<_> = log.entries.values().collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    for entry in entries {
        println!(
            "{} [{}]: {} record(s)",
            entry.name,
            entry.type_name,
            entry.records.len()
        );
        if entry.type_name == "double" {
            for record in entry.records.iter().take(5) {
                if let Some(payload) = record.data() {
                    if payload.len() == 8 {
                        println!("  t={:>12}  {}", record.timestamp, wire::read_f64(payload));
                    }
                }
            }
        }
    }
    Ok(())
}
