//! img2csv: export radio memory images (.img) to CSV
//! Converts a single image, or every image in a directory with --all

use anyhow::Context;
use clap::Parser;
use radio_img::convert::{convert_all, convert_file, default_output_path, ConvertSummary};
use radio_img::layouts::{find_layout, list_layouts_by_vendor, LayoutDescriptor};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

const EXAMPLES: &str = r#"
Examples:
  img2csv Baofeng_UV-5R.img              # writes Baofeng_UV-5R.csv
  img2csv radio.img out.csv --model bf888
  img2csv --all                          # every *.img here into csv/
  img2csv --all --dir backups --out-dir exported
"#;

#[derive(Parser, Debug)]
#[command(name = "img2csv", version)]
#[command(about = "Export radio memory images (.img) to CSV", long_about = None)]
#[command(after_help = EXAMPLES)]
struct Args {
    /// Image file to convert
    #[arg(required_unless_present_any = ["all", "list_models"])]
    file: Option<PathBuf>,

    /// Output CSV file (defaults to FILE with a .csv extension)
    output: Option<PathBuf>,

    /// Convert every .img file in --dir
    #[arg(long, conflicts_with_all = ["file", "output"])]
    all: bool,

    /// Directory scanned by --all
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Directory receiving the CSV files of --all
    #[arg(long, default_value = "csv")]
    out_dir: PathBuf,

    /// Use this model's layout instead of detecting it
    #[arg(short, long)]
    model: Option<String>,

    /// List supported models and exit
    #[arg(long)]
    list_models: bool,

    /// Verbosity level (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, default_value_t = 0, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    if args.list_models {
        print_models();
        return Ok(());
    }

    let forced = match args.model.as_deref() {
        Some(name) => Some(find_layout(name).with_context(|| {
            format!("Unknown model '{}' (see --list-models)", name)
        })?),
        None => None,
    };

    if args.all {
        run_batch(&args.dir, &args.out_dir, forced)
    } else {
        let input = args
            .file
            .context("an image file or --all is required")?;
        let output = args
            .output
            .unwrap_or_else(|| default_output_path(&input));
        run_single(&input, &output, forced)
    }
}

fn init_tracing(verbose: u8) -> anyhow::Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    Ok(())
}

fn print_models() {
    println!("Supported models:");
    for (vendor, layouts) in list_layouts_by_vendor() {
        println!("\n{}:", vendor);
        for layout in layouts {
            println!(
                "  {:<10} {} ({} channels, file names: {})",
                layout.model,
                layout.description,
                layout.slot_count,
                layout.filename_tokens.join(", ")
            );
        }
    }
}

fn report_success(summary: &ConvertSummary) {
    println!(
        "✓ Exported {} channels to {} ({}, {} slots)",
        summary.programmed,
        summary.output.display(),
        summary.model,
        summary.rows
    );
}

fn run_single(
    input: &Path,
    output: &Path,
    forced: Option<&'static LayoutDescriptor>,
) -> anyhow::Result<()> {
    println!("Parsing {}...", input.display());

    match convert_file(input, output, forced) {
        Ok(summary) => {
            report_success(&summary);
            Ok(())
        }
        Err(e) => {
            println!("✗ Failed to parse {}: {}", input.display(), e);
            std::process::exit(1);
        }
    }
}

fn run_batch(
    dir: &Path,
    out_dir: &Path,
    forced: Option<&'static LayoutDescriptor>,
) -> anyhow::Result<()> {
    let report = convert_all(dir, out_dir, forced)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;

    if report.total() == 0 {
        anyhow::bail!("No .img files found in {}", dir.display());
    }

    for outcome in &report.outcomes {
        println!("Processing {}...", outcome.input.display());
        match &outcome.result {
            Ok(summary) => report_success(summary),
            Err(e) => println!("✗ Failed to parse {}: {}", outcome.input.display(), e),
        }
    }

    println!(
        "\nconverted {} of {} ({} failed)",
        report.succeeded(),
        report.total(),
        report.failed()
    );

    if report.succeeded() == 0 {
        std::process::exit(1);
    }

    Ok(())
}
