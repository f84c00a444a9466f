//! Stream records from a log file one at a time.
//!
//! Usage: cargo run --example streaming -- path/to/data.wpilog

use anyhow::Result;
use wpilog_stream::{LogReader, ReaderSource};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data.wpilog".into());

    let source = ReaderSource::open(&path).await?;
    let mut reader = LogReader::new(source).await?;
    println!(
        "version {}.{}, extra header {:?}",
        reader.header().major(),
        reader.header().minor(),
        reader.header().extra
    );

    let mut records = 0usize;
    while let Some(record) = reader.next_record().await? {
        records += 1;
        // Show the first few data records; the rest just stream through.
        if records <= 10 {
            if let Some(payload) = record.data() {
                let name = reader
                    .entries()
                    .get(record.entry_id)
                    .map(|entry| entry.name.as_str())
                    .unwrap_or("?");
                println!(
                    "t={:>12}  {:<30}  {} bytes",
                    record.timestamp,
                    name,
                    payload.len()
                );
            }
        }
    }

    println!("{records} records, {} entries", reader.entries().len());
    Ok(())
}
