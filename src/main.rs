//! Command-line interface for inspecting WPILOG files.
//!
//! This binary reads .wpilog files and reports their header, entries, and
//! record counts, as a log-style report or as JSON.

use anyhow::Result;
use clap::Parser;
use log::{info, LevelFilter};
use memmap2::Mmap;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use wpilog_stream::{ByteSource, Header, LogReader, ReaderSource, DEFAULT_CHUNK_SIZE};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Inspect .wpilog files",
    long_about = "Streams WPILib data log files (.wpilog) and reports their header, declared\n\
                  entries, and record counts without loading whole files into memory."
)]
struct Args {
    /// .wpilog files to inspect
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Emit a JSON summary per file on stdout instead of the log report
    #[arg(long)]
    json: bool,

    /// Memory-map inputs instead of reading through the file API
    #[arg(long)]
    mmap: bool,

    /// Bytes pulled from the input per read
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Feeds a memory-mapped file to the parser one copied chunk at a time.
struct MappedSource {
    map: Mmap,
    pos: usize,
    chunk_size: usize,
}

impl MappedSource {
    fn open(path: &Path, chunk_size: usize) -> io::Result<Self> {
        let file = File::open(path)?;
        let map = unsafe { Mmap::map(&file)? };
        Ok(Self {
            map,
            pos: 0,
            chunk_size,
        })
    }
}

impl ByteSource for MappedSource {
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        if self.pos >= self.map.len() {
            return Ok(None);
        }
        let end = (self.pos + self.chunk_size).min(self.map.len());
        let chunk = self.map[self.pos..end].to_vec();
        self.pos = end;
        Ok(Some(chunk))
    }
}

#[derive(Serialize)]
struct LogSummary {
    file: String,
    version: String,
    extra: String,
    records: usize,
    data_records: usize,
    control_records: usize,
    entries: Vec<EntrySummary>,
}

#[derive(Serialize)]
struct EntrySummary {
    id: u32,
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    metadata: String,
    finished: bool,
    records: usize,
}

struct Tally {
    header: Header,
    records: usize,
    data_records: usize,
    control_records: usize,
    entries: Vec<EntrySummary>,
}

/// Stream every record, counting rather than collecting so arbitrarily
/// large files inspect in bounded memory.
async fn scan<S: ByteSource>(source: S) -> wpilog_stream::Result<Tally> {
    let mut reader = LogReader::new(source).await?;

    let mut counts: HashMap<u32, usize> = HashMap::new();
    let mut records = 0usize;
    let mut control_records = 0usize;
    while let Some(record) = reader.next_record().await? {
        records += 1;
        if record.is_control() {
            control_records += 1;
        } else {
            *counts.entry(record.entry_id).or_default() += 1;
        }
    }

    let mut entries: Vec<EntrySummary> = reader
        .entries()
        .iter()
        .map(|entry| EntrySummary {
            id: entry.id,
            name: entry.name.clone(),
            type_name: entry.type_name.clone(),
            metadata: entry.metadata.clone(),
            finished: entry.finished,
            records: counts.get(&entry.id).copied().unwrap_or(0),
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Tally {
        header: reader.header().clone(),
        records,
        data_records: records - control_records,
        control_records,
        entries,
    })
}

async fn inspect_one_file(path: &Path, args: &Args) -> Result<()> {
    info!("📄 Inspecting: {}", path.display());

    let start_time = Instant::now();

    let t0 = Instant::now();
    let tally = if args.mmap {
        scan(MappedSource::open(path, args.chunk_size)?).await?
    } else {
        let file = tokio::fs::File::open(path).await?;
        scan(ReaderSource::with_chunk_size(file, args.chunk_size)).await?
    };
    let read_time = t0.elapsed();

    if args.json {
        let summary = LogSummary {
            file: path.display().to_string(),
            version: format!("{}.{}", tally.header.major(), tally.header.minor()),
            extra: tally.header.extra,
            records: tally.records,
            data_records: tally.data_records,
            control_records: tally.control_records,
            entries: tally.entries,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    info!(
        "   ├─ Version: {}.{}",
        tally.header.major(),
        tally.header.minor()
    );
    if !tally.header.extra.is_empty() {
        info!("   ├─ Extra header: {}", tally.header.extra);
    }
    info!("   ├─ Read {} records in {:.2?}", tally.records, read_time);
    info!(
        "   ├─ {} entries, {} data records, {} control records",
        tally.entries.len(),
        tally.data_records,
        tally.control_records
    );
    for entry in &tally.entries {
        let finished = if entry.finished { " (finished)" } else { "" };
        info!(
            "   ├─ {} [{}]: {} record(s){}",
            entry.name, entry.type_name, entry.records, finished
        );
    }
    info!("   └─ ✓ Total time: {:.2?}\n", start_time.elapsed());

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    anyhow::ensure!(args.chunk_size > 0, "--chunk-size must be nonzero");

    if !args.json {
        info!("");
        info!("╔════════════════════════════════════════════╗");
        info!("║            WPILOG Inspector                ║");
        info!("╚════════════════════════════════════════════╝");
        info!("");
        info!("📂 {} file(s) to inspect", args.files.len());
        info!("");
    }

    let total_start = Instant::now();
    let mut failures = 0usize;

    for (idx, path) in args.files.iter().enumerate() {
        if !args.json {
            info!("[{}/{}]", idx + 1, args.files.len());
        }

        if let Err(e) = inspect_one_file(path, &args).await {
            failures += 1;
            log::error!("   └─ ✗ Error: {}", e);
            log::error!("");
        }
    }

    if !args.json {
        info!("═══════════════════════════════════════════");
        info!(
            "🏁 {} file(s) inspected in {:.2?}",
            args.files.len() - failures,
            total_start.elapsed()
        );
        info!("");
    }

    if failures > 0 {
        anyhow::bail!("{failures} file(s) failed");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .format_timestamp(None)
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(args))
}
