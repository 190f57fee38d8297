//! XZZPCB CLI - Command-line decoder for XZZ `.pcb` board files.
//!
//! This is the main entry point for the xzzpcb command-line application.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use xzzpcb::board::{deobfuscate_in_place, is_obfuscated};
use xzzpcb::prelude::*;

/// xzzpcb - XZZ board file decoding tool
#[derive(Parser)]
#[command(name = "xzzpcb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a board file and emit it as JSON
    Decode {
        /// Path to the .pcb file
        #[arg(short, long, env = "INPUT_PCB")]
        file: PathBuf,

        /// Output JSON file (prints a summary when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Decrypt every part payload and write the plaintexts to a directory
    ExtractParts {
        /// Path to the .pcb file
        #[arg(short, long, env = "INPUT_PCB")]
        file: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Strip the whole-file XOR layer and write the clear bytes
    Deobfuscate {
        /// Path to the .pcb file
        #[arg(short, long, env = "INPUT_PCB")]
        file: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { file, output, pretty } => {
            cmd_decode(&file, output.as_deref(), pretty)?;
        }
        Commands::ExtractParts { file, output } => {
            cmd_extract_parts(&file, &output)?;
        }
        Commands::Deobfuscate { file, output } => {
            cmd_deobfuscate(&file, &output)?;
        }
    }

    Ok(())
}

fn cmd_decode(file: &Path, output: Option<&Path>, pretty: bool) -> Result<()> {
    println!("Decoding: {}", file.display());

    let data = fs::read(file).context("Failed to read input file")?;

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% {msg}")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let decoded = decode_with_progress(data, |progress| {
        pb.set_position(u64::from(progress.percent));
        pb.set_message(progress.stage.to_string());
    });
    pb.finish_and_clear();

    println!(
        "Decoded {} entities in {:?}",
        decoded.board.entities.len(),
        start.elapsed()
    );
    for diag in &decoded.diagnostics {
        eprintln!("warning: {diag}");
    }

    match output {
        Some(path) => {
            let json = if pretty {
                serde_json::to_string_pretty(&decoded.board)?
            } else {
                serde_json::to_string(&decoded.board)?
            };
            fs::write(path, json).context("Failed to write output file")?;
            println!("Wrote {}", path.display());
        }
        None => {
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for entity in &decoded.board.entities {
                *counts.entry(entity.kind()).or_default() += 1;
            }
            for (kind, count) in &counts {
                println!("{:>8} {}", count, kind);
            }
            if let Some(readings) = &decoded.board.diode_readings {
                println!("{:>8} bytes of diode readings", readings.len());
            }
        }
    }

    Ok(())
}

fn cmd_extract_parts(file: &Path, output: &Path) -> Result<()> {
    println!("Extracting part payloads from: {}", file.display());

    let data = fs::read(file).context("Failed to read input file")?;
    let (payloads, diagnostics) = extract_part_payloads(data);

    for diag in &diagnostics {
        eprintln!("warning: {diag}");
    }

    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(payloads.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")?
            .progress_chars("#>-"),
    );

    for (index, payload) in payloads.iter().enumerate() {
        let group = payload
            .group_name
            .as_deref()
            .unwrap_or("unnamed")
            .replace(['/', '\\'], "_");
        let path = output.join(format!("{group}_block_{index}.dat"));
        fs::write(&path, &payload.plaintext)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        pb.inc(1);
    }

    pb.finish_and_clear();
    println!("Wrote {} part payloads to {}", payloads.len(), output.display());

    Ok(())
}

fn cmd_deobfuscate(file: &Path, output: &Path) -> Result<()> {
    let mut data = fs::read(file).context("Failed to read input file")?;

    if !is_obfuscated(&data) {
        println!("File is not obfuscated, copying as-is");
    } else if let Some(sentinel) = deobfuscate_in_place(&mut data) {
        println!("Removed XOR layer (clear region starts at {sentinel:#x})");
    } else {
        println!("Removed XOR layer (whole file)");
    }

    fs::write(output, &data).context("Failed to write output file")?;
    println!("Wrote {}", output.display());

    Ok(())
}
