// Wed Aug 26 2026 - Alex

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::LevelFilter;
use luajit_bclist::{BytecodeListing, DumpInfo, ListingOptions};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Listing renderer for parsed LuaJIT bytecode dumps", long_about = None)]
struct Args {
    /// JSON-serialized DumpInfo produced by an external parser.
    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Prefix every line with its predicted byte offset.
    #[arg(long)]
    offsets: bool,

    /// Soft line-length limit for tables and strings; 0 disables wrapping.
    #[arg(long, default_value_t = 50)]
    max_length: usize,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(level_from_verbosity(args.verbose))
        .init();

    println!("{} Loading dump: {}", "[*]".blue(), args.input.display());
    let info = DumpInfo::from_json_file(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    println!(
        "{} Version {} dump with {} prototypes",
        "[+]".green(),
        info.version,
        info.proto_count()
    );

    let options = ListingOptions {
        max_length: args.max_length,
    };
    let mut listing = BytecodeListing::with_options(&info, options);
    listing.update();
    let text = listing.to_text(args.offsets);

    match args.output {
        Some(path) => {
            let mut file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            file.write_all(text.as_bytes())?;
            file.write_all(b"\n")?;
            println!("{} Listing written to {}", "[+]".green(), path.display());
        }
        None => println!("{text}"),
    }

    log::info!(
        "rendered {} lines, {} cross-referenced symbols",
        listing.lines().len(),
        listing.references().len()
    );
    Ok(())
}
