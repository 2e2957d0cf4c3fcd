//! Command-line front end: read a raw block file, decode it and write the
//! blocks in chain order.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};

use blk_decoder::report::{chain_views, render_json, render_text};
use blk_decoder::{BlockFileDecoder, DecoderConfig, Framing, OrderingPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FramingArg {
    /// Split on every occurrence of the block marker
    Marker,
    /// Follow each record's declared size
    SizePrefixed,
}

impl From<FramingArg> for Framing {
    fn from(arg: FramingArg) -> Self {
        match arg {
            FramingArg::Marker => Framing::Marker,
            FramingArg::SizePrefixed => Framing::SizePrefixed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OrderingArg {
    /// Previous-hash linkage, timestamp among unlinked blocks
    Linkage,
    /// Timestamp, linkage among equal timestamps
    Timestamp,
}

impl From<OrderingArg> for OrderingPolicy {
    fn from(arg: OrderingArg) -> Self {
        match arg {
            OrderingArg::Linkage => OrderingPolicy::Linkage,
            OrderingArg::Timestamp => OrderingPolicy::Timestamp,
        }
    }
}

#[derive(Parser)]
#[command(name = "blk-decoder")]
#[command(version)]
#[command(about = "Decode a raw block file and list its blocks in chain order", long_about = None)]
struct Cli {
    /// Raw block file, e.g. blk00000.dat
    file: PathBuf,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, env = "BLK_FORMAT")]
    format: OutputFormat,

    /// How block records are located in the file
    #[arg(long, value_enum, default_value_t = FramingArg::Marker, env = "BLK_FRAMING")]
    framing: FramingArg,

    /// Which relation decides block order
    #[arg(long, value_enum, default_value_t = OrderingArg::Linkage, env = "BLK_ORDERING")]
    ordering: OrderingArg,

    /// Stop at the first malformed block instead of skipping it
    #[arg(long, env = "BLK_STRICT")]
    strict: bool,
}

fn read_block_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let started = Instant::now();
    let buf = read_block_file(&cli.file)?;
    let read_secs = started.elapsed().as_secs_f64();
    info!(
        "read {} bytes in {:.3}s ({:.1} MB/s)",
        buf.len(),
        read_secs,
        buf.len() as f64 / read_secs.max(f64::EPSILON) / 1024.0 / 1024.0
    );

    let config = DecoderConfig::new()
        .with_framing(cli.framing.into())
        .with_ordering(cli.ordering.into())
        .with_strict(cli.strict);
    let decoder = BlockFileDecoder::with_config(config);

    let decoded = decoder
        .decode_and_order(&buf)
        .with_context(|| format!("failed to decode {}", cli.file.display()))?;

    if !decoded.failures.is_empty() {
        warn!("{} malformed block(s) skipped", decoded.failures.len());
    }
    if !decoded.chain.ambiguities.is_empty() {
        warn!(
            "{} block pair(s) could not be ordered by linkage",
            decoded.chain.ambiguities.len()
        );
    }

    let views = chain_views(&decoded.chain);
    let rendered = match cli.format {
        OutputFormat::Text => render_text(&views).context("failed to render text report")?,
        OutputFormat::Json => render_json(&views).context("failed to encode JSON report")?,
    };

    match &cli.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout()
            .lock()
            .write_all(rendered.as_bytes())
            .context("failed to write to stdout")?,
    }

    info!(
        "{} blocks in {} segment(s), done in {:.3}s",
        decoded.chain.len(),
        decoded.chain.roots.len(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
