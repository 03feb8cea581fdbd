//! pagetext CLI - dump the text of every PDF page into one file

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;

use pagetext::{ExtractOptions, Extractor, DEFAULT_OUTPUT};

#[derive(Parser)]
#[command(name = "pagetext")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract the plain text of each PDF page into a single file", long_about = None)]
struct Cli {
    /// Source PDF file
    #[arg(long, value_name = "PATH")]
    pdf: PathBuf,

    /// Destination text file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    out: PathBuf,

    /// Write the placeholder for pages that fail to extract instead of aborting
    #[arg(long)]
    lenient: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = ExtractOptions::new();
    if cli.lenient {
        options = options.lenient();
    }

    let summary = Extractor::default()
        .with_options(options)
        .run(&cli.pdf, &cli.out)?;
    log::debug!("{:?}", summary);

    println!("Wrote: {}", cli.out.display());
    Ok(())
}
