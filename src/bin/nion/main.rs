//! nion CLI - Tool for inspecting Nion Swift files.

use anyhow::Context;
use nion::ndata::NDataArchive;
use nion::{Dataset, NionReader, ReaderOptions};
use std::env;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut options = ReaderOptions::default();
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            "--no-mmap" => options = options.with_mmap(false),
            "--verify" => options = options.with_checksums(true),
            "-V" | "--version" => {
                print_version();
                return;
            }
            _ => filtered_args.push(arg),
        }
    }

    init_tracing(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        // Info command - dataset summary
        "info" | "i" => {
            let path = require_file(&filtered_args, "info <file>");
            cmd_info(path, options)
        }

        // Axes command - one line per axis
        "axes" | "a" => {
            let path = require_file(&filtered_args, "axes <file> [--json]");
            let json_mode = filtered_args.iter().any(|&s| s == "--json" || s == "-j");
            cmd_axes(path, options, json_mode)
        }

        // Meta command - original metadata
        "meta" | "m" => {
            let path = require_file(&filtered_args, "meta <file>");
            cmd_meta(path, options)
        }

        // Entries command - container index
        "entries" | "e" => {
            let path = require_file(&filtered_args, "entries <file.ndata>");
            cmd_entries(path, options)
        }

        // Help
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        // Default: if file exists, show info; otherwise error
        _ => {
            if Path::new(filtered_args[0]).exists() {
                cmd_info(filtered_args[0], options)
            } else {
                eprintln!("Unknown command: {}", filtered_args[0]);
                eprintln!();
                print_help();
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn require_file<'a>(args: &[&'a str], usage: &str) -> &'a str {
    match args.get(1) {
        Some(&path) => path,
        None => {
            eprintln!("Error: missing file argument");
            eprintln!("Usage: nion-cli {}", usage);
            std::process::exit(1);
        }
    }
}

fn print_version() {
    println!(
        "nion-cli {} (built {} {})",
        nion::VERSION,
        env!("NION_BUILD_DATE"),
        env!("NION_BUILD_TIME")
    );
}

fn print_help() {
    println!("nion-cli - Nion Swift file inspector");
    println!();
    println!("USAGE:");
    println!("    nion-cli [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info    <file>            Show title, shape, data type and axes");
    println!("    a, axes    <file> [--json]   Show axis calibrations");
    println!("    m, meta    <file>            Print the original metadata as JSON");
    println!("    e, entries <file.ndata>      List the ZIP container index");
    println!("    h, help                      Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (every ZIP record)");
    println!("    -q, --quiet      Only show errors");
    println!("    --no-mmap        Use buffered reads instead of memory mapping");
    println!("    --verify         Check payload CRC-32 values");
    println!("    -V, --version    Show version and build date");
    println!();
    println!("EXAMPLES:");
    println!("    nion-cli info spectrum.ndata           # Quick overview");
    println!("    nion-cli axes stack.h5 --json          # Axes as JSON");
    println!("    nion-cli --verify entries image.ndata  # Index with CRC check");
    println!();
    println!("NOTES:");
    println!("    - Passing a file directly is equivalent to 'info'");
    println!("    - .h5 files require the hdf5 feature");
    println!("    - RUST_LOG overrides the verbosity flags");
}

fn read_dataset(path: &str, options: ReaderOptions) -> anyhow::Result<Dataset> {
    info!("Opening file: {}", path);

    let mut reader = NionReader::open_with(path, options)
        .with_context(|| format!("Failed to open {}", path))?;
    let ds = reader.read().with_context(|| format!("Failed to read {}", path))?;
    debug!("Read {} with {} axes", ds.title, ds.ndim());
    Ok(ds)
}

fn cmd_info(path: &str, options: ReaderOptions) -> anyhow::Result<()> {
    let ds = read_dataset(path, options)?;

    println!("File:      {}", path);
    println!("Title:     {}", ds.title);
    println!("Source:    {}", ds.source);
    println!("Data type: {}", ds.data_type);
    println!("Shape:     {}", ds.shape());
    println!("Dtype:     {}", ds.data.scalar_type());
    if let Some((lo, hi)) = ds.data.min_max() {
        println!("Range:     {} .. {}", lo, hi);
    }
    println!("Quantity:  {} [{}]", ds.quantity, ds.units);
    println!();
    println!("Axes:");
    print_axes(&ds);
    Ok(())
}

fn cmd_axes(path: &str, options: ReaderOptions, json_mode: bool) -> anyhow::Result<()> {
    let ds = read_dataset(path, options)?;

    if json_mode {
        let text = serde_json::to_string_pretty(&ds.dimensions).context("Failed to serialize axes")?;
        println!("{}", text);
    } else {
        print_axes(&ds);
    }
    Ok(())
}

fn print_axes(ds: &Dataset) {
    for (i, dim) in ds.dimensions.iter().enumerate() {
        let span = match (dim.values.first(), dim.values.last()) {
            (Some(first), Some(last)) => format!("{} .. {}", first, last),
            _ => "empty".to_string(),
        };
        println!(
            "  {}: {:<12} {:<10} {:<20} n={:<6} {} {}",
            i,
            dim.name,
            dim.dimension_type,
            dim.quantity,
            dim.len(),
            span,
            dim.units
        );
    }
}

fn cmd_meta(path: &str, options: ReaderOptions) -> anyhow::Result<()> {
    let ds = read_dataset(path, options)?;

    let text = serde_json::to_string_pretty(&ds.original_metadata)
        .context("Failed to serialize metadata")?;
    println!("{}", text);
    Ok(())
}

fn cmd_entries(path: &str, options: ReaderOptions) -> anyhow::Result<()> {
    info!("Scanning container: {}", path);

    let mut archive = NDataArchive::open(path, &options)
        .with_context(|| format!("Failed to scan {}", path))?;

    let index = archive.index().clone();
    let eocd = index.eocd();
    println!(
        "Container: {} ({} bytes, {})",
        path,
        archive.file_size(),
        if archive.is_mapped() { "mapped" } else { "buffered" }
    );
    println!("Central directory at {}, end record at {}", eocd.first_directory_pos, eocd.pos);
    println!();
    println!("  {:<20} {:>12} {:>12} {:>10}", "name", "offset", "length", "crc32");
    for name in index.entry_names() {
        let Some(entry) = index.entry(name.as_bytes()) else {
            println!("  {:<20} (no local header)", name);
            continue;
        };
        let status = if options.verify_checksums {
            match archive.read_entry(name.as_bytes()) {
                Ok(_) => " ok",
                Err(e) => {
                    debug!("{}: {}", name, e);
                    " BAD"
                }
            }
        } else {
            ""
        };
        println!(
            "  {:<20} {:>12} {:>12} {:>#10x}{}",
            name, entry.data_pos, entry.data_len, entry.crc32, status
        );
    }
    Ok(())
}
