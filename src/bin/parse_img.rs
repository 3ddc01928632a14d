//! Parse .img file utility
//! Loads a radio image and displays its decoded channels, optionally with the
//! raw bytes of a single record

use anyhow::Context;
use clap::Parser;
use radio_img::convert::{decode_file, Decoded};
use radio_img::core::Channel;
use radio_img::layouts::{find_layout, NameLocation};
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Which channels to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    One(u32),
    Range(u32, u32),
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = |n: &str| {
            n.trim()
                .parse::<u32>()
                .map_err(|_| format!("'{}' is not a channel number", n))
        };

        match s.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (number(start)?, number(end)?);
                if start > end {
                    return Err(format!("empty range {}-{}", start, end));
                }
                Ok(Selection::Range(start, end))
            }
            None => Ok(Selection::One(number(s)?)),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "parse-img", version)]
#[command(about = "Show the decoded channels of a radio memory image")]
struct Args {
    /// Image file
    file: PathBuf,

    /// Channel number (e.g. 5) or range (e.g. 1-16); default: all programmed
    channels: Option<Selection>,

    /// Use this model's layout instead of detecting it
    #[arg(short, long)]
    model: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Show slot decoding problems (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Report<'a> {
    model: &'static str,
    vendor: &'static str,
    image_len: usize,
    metadata: &'a radio_img::formats::Metadata,
    channels: Vec<&'a Channel>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let forced = match args.model.as_deref() {
        Some(name) => Some(
            find_layout(name).with_context(|| format!("Unknown model '{}'", name))?,
        ),
        None => None,
    };

    let decoded = decode_file(&args.file, forced)
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;

    let selected: Vec<&Channel> = match args.channels {
        None => decoded.channels.iter().filter(|ch| !ch.empty).collect(),
        Some(Selection::One(n)) => decoded.channels.iter().filter(|ch| ch.index == n).collect(),
        Some(Selection::Range(start, end)) => decoded
            .channels
            .iter()
            .filter(|ch| (start..=end).contains(&ch.index))
            .collect(),
    };

    if args.json {
        let report = Report {
            model: decoded.layout.model.as_str(),
            vendor: decoded.layout.vendor,
            image_len: decoded.image.len(),
            metadata: &decoded.metadata,
            channels: selected,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_header(&args.file, &decoded);

    match args.channels {
        None => {
            println!("=== Programmed Channels ===\n");
            println!(
                "Found {} programmed channels of {}\n",
                selected.len(),
                decoded.channels.len()
            );
        }
        Some(Selection::Range(start, end)) => println!("=== Channels {} to {} ===\n", start, end),
        Some(Selection::One(n)) => println!("=== Channel #{} ===\n", n),
    }

    for ch in &selected {
        print_channel(ch, decoded.layout.precision());
    }

    if let Some(Selection::One(n)) = args.channels {
        if selected.is_empty() {
            anyhow::bail!(
                "{} has no channel #{} (channels {}..={})",
                decoded.layout.model,
                n,
                decoded.layout.first_index,
                decoded.layout.first_index as usize + decoded.layout.slot_count - 1
            );
        }
        print_raw_record(&decoded, n);
    }

    Ok(())
}

fn init_tracing(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

fn print_header(file: &std::path::Path, decoded: &Decoded) {
    println!("Loaded .img file: {}", file.display());
    match decoded.detected_by {
        Some(by) => println!("Radio: {} (detected from {})", decoded.layout.full_name(), by),
        None => println!("Radio: {} (forced)", decoded.layout.full_name()),
    }
    if !decoded.metadata.is_empty() {
        println!(
            "Metadata: {} {} {}",
            decoded.metadata.vendor, decoded.metadata.model, decoded.metadata.rclass
        );
        println!("CHIRP version: {}", decoded.metadata.chirp_version);
    }
    println!("Memory map size: {} bytes\n", decoded.image.len());
}

fn print_channel(ch: &Channel, precision: usize) {
    if ch.empty {
        println!("Channel #{}: <empty>\n", ch.index);
        return;
    }

    let mhz = |f: Option<radio_img::core::Frequency>| {
        f.map(|f| format!("{} MHz", f.format_mhz(precision)))
            .unwrap_or_default()
    };

    println!(
        "Channel #{}: \"{}\"",
        ch.index,
        ch.name.as_deref().unwrap_or("")
    );
    println!("  RX:     {}", mhz(ch.rx));
    println!("  TX:     {}", mhz(ch.tx));
    println!(
        "  Power:  {}",
        ch.power.map(|p| p.to_string()).unwrap_or_default()
    );
    println!("  Tone:   {}", ch.tone);
    println!();
}

fn print_raw_record(decoded: &Decoded, number: u32) {
    let layout = decoded.layout;
    let Some(range) = layout
        .slot_for(number)
        .and_then(|slot| layout.record_range(slot))
    else {
        return;
    };

    println!("  Raw record at 0x{:04X}:", range.start);
    print!("{}", decoded.image.printable(Some(range.start), Some(range.end)));

    if let Some(name) = &layout.name {
        if let (NameLocation::Table { base, stride }, Some(slot)) =
            (name.location, layout.slot_for(number))
        {
            let start = base + slot * stride;
            println!("  Raw name at 0x{:04X}:", start);
            print!("{}", decoded.image.printable(Some(start), Some(start + name.width)));
        }
    }
    println!();
}
