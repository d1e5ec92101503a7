//! chainmap CLI entry point
//!
//! Projects the ungapped blocks of UCSC chain files to BED or TSV.

use anyhow::Context;
use chainmap::core::{summarize_chain, ChainInput, ErrorMode};
use chainmap::formats::{self, ConversionStats, ConvertOptions, PrimarySystem};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Reaction to malformed or unsupported records (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ErrorModeArg {
    /// Abort on the first bad record
    #[default]
    #[value(name = "strict")]
    Strict,
    /// Log bad records to stderr and continue
    #[value(name = "skip")]
    Skip,
}

impl From<ErrorModeArg> for ErrorMode {
    fn from(arg: ErrorModeArg) -> Self {
        match arg {
            ErrorModeArg::Strict => ErrorMode::Strict,
            ErrorModeArg::Skip => ErrorMode::Skip,
        }
    }
}

#[derive(Parser)]
#[command(name = "chainmap")]
#[command(about = "Project UCSC chain alignment blocks to BED or TSV")]
#[command(version)]
struct Cli {
    /// What to do with malformed or reverse-target records
    #[arg(long = "on-error", global = true, default_value = "strict")]
    on_error: ErrorModeArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert chain blocks to BED (0-based, half-open)
    #[command(name = "2bed")]
    ToBed {
        /// Input chain file (plain, .gz or .bz2)
        chain: PathBuf,
        /// Use the query coordinate system as the primary interval
        #[arg(long)]
        qry: bool,
        /// Output file (stdout if not specified)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Number of threads
        #[arg(short = 't', long, default_value = "1")]
        threads: usize,
    },
    /// Convert chain blocks to TSV (1-based, inclusive, both assemblies)
    #[command(name = "2tsv")]
    ToTsv {
        /// Input chain file (plain, .gz or .bz2)
        chain: PathBuf,
        /// Output file (stdout if not specified)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Number of threads
        #[arg(short = 't', long, default_value = "1")]
        threads: usize,
    },
    /// Print record count and base totals of a chain file
    Stats {
        /// Input chain file (plain, .gz or .bz2)
        chain: PathBuf,
    },
}

fn open_chain(path: &Path) -> anyhow::Result<ChainInput> {
    ChainInput::open(path).with_context(|| format!("Failed to open chain file {:?}", path))
}

fn open_output(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {:?}", path))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn report(stats: &ConversionStats, start: Instant) {
    eprintln!("\n=== Conversion Statistics ===");
    eprintln!("Total records:   {}", stats.total);
    eprintln!("Successful:      {}", stats.success);
    eprintln!("Failed:          {}", stats.failed);
    eprintln!("Lines written:   {}", stats.lines);
    eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();
    let mode: ErrorMode = cli.on_error.into();

    match cli.command {
        Commands::ToBed { chain, qry, output, threads } => {
            let input = open_chain(&chain)?;
            let writer = open_output(output.as_deref())?;
            let primary = if qry { PrimarySystem::Query } else { PrimarySystem::Target };
            let options = ConvertOptions { mode, threads };

            let stats = formats::convert_bed(input, writer, primary, &options)
                .with_context(|| format!("Failed to convert {:?}", chain))?;
            report(&stats, start);
        }

        Commands::ToTsv { chain, output, threads } => {
            let input = open_chain(&chain)?;
            let writer = open_output(output.as_deref())?;
            let options = ConvertOptions { mode, threads };

            let stats = formats::convert_tsv(input, writer, &options)
                .with_context(|| format!("Failed to convert {:?}", chain))?;
            report(&stats, start);
        }

        Commands::Stats { chain } => {
            let input = open_chain(&chain)?;
            let summary = summarize_chain(input, mode)
                .with_context(|| format!("Failed to read {:?}", chain))?;

            println!("records\t{}", summary.records);
            println!("failed\t{}", summary.failed);
            println!("ungapped\t{}", summary.ungapped);
            println!("dt\t{}", summary.dt);
            println!("dq\t{}", summary.dq);
        }
    }

    Ok(())
}
