//! IMGB CLI - Command-line tool for FINAL FANTASY XIII trilogy textures.
//!
//! This is the main entry point for the IMGB command-line application.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use imgb::prelude::*;

/// IMGB - FINAL FANTASY XIII trilogy texture tool
#[derive(Parser)]
#[command(name = "imgb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log header details and per-file progress
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract textures to DDS files
    Unpack {
        /// Header block files (one texture each)
        #[arg(required = true)]
        headers: Vec<PathBuf>,

        /// Data block (IMGB) shared by the header blocks
        #[arg(short, long, env = "IMGB_DATA")]
        data: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Platform the files come from
        #[arg(short, long, env = "IMGB_PLATFORM", default_value = "pc")]
        platform: Platform,
    },

    /// Write edited DDS files back over the original mips
    RepackFixed {
        /// Header block files (one texture each)
        #[arg(required = true)]
        headers: Vec<PathBuf>,

        /// Data block (IMGB) to patch in place
        #[arg(short, long, env = "IMGB_DATA")]
        data: PathBuf,

        /// Directory holding the DDS files
        #[arg(short, long)]
        source: PathBuf,

        /// Platform the files come from
        #[arg(short, long, env = "IMGB_PLATFORM", default_value = "pc")]
        platform: Platform,
    },

    /// Rebuild headers from DDS files and append their pixels to a data block
    RepackFree {
        /// Header block files (one texture each)
        #[arg(required = true)]
        headers: Vec<PathBuf>,

        /// Data block (IMGB) to append to; created if missing
        #[arg(short, long, env = "IMGB_DATA")]
        data: PathBuf,

        /// Directory holding the DDS files
        #[arg(short, long)]
        source: PathBuf,

        /// Image name to look for instead of the header file's stem
        #[arg(short, long)]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Unpack {
            headers,
            data,
            output,
            platform,
        } => {
            run_batch("Unpacking", &headers, |header| {
                unpack(header, &data, &output, platform, cli.verbose)
            })?;
        }
        Commands::RepackFixed {
            headers,
            data,
            source,
            platform,
        } => {
            run_batch("Repacking", &headers, |header| {
                repack_fixed_layout(header, &data, &source, platform)
            })?;
        }
        Commands::RepackFree {
            headers,
            data,
            source,
            name,
        } => {
            if name.is_some() && headers.len() > 1 {
                anyhow::bail!("--name can only be used with a single header block");
            }
            run_batch("Repacking", &headers, |header| {
                let container = name
                    .clone()
                    .unwrap_or_else(|| imgb::gtex::naming::container_name(header));
                repack_free_layout(header, &container, &data, &source)
            })?;
        }
    }

    Ok(())
}

/// Process header blocks one after another, counting skips.
fn run_batch<F>(action: &str, headers: &[PathBuf], mut process: F) -> Result<()>
where
    F: FnMut(&Path) -> imgb::gtex::Result<Outcome>,
{
    info!("{} {} header block(s)", action, headers.len());

    let pb = if headers.len() > 1 {
        let pb = ProgressBar::new(headers.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let mut done = 0;
    let mut skipped = 0;

    for header in headers {
        // per-file log lines go above the bar, not through it
        let outcome = match &pb {
            Some(pb) => pb.suspend(|| process(header)),
            None => process(header),
        }
        .with_context(|| format!("Failed to process {}", header.display()))?;
        if outcome.is_done() {
            done += 1;
        } else {
            skipped += 1;
        }

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }
    info!(
        "Finished in {:?}: {} done, {} skipped",
        start.elapsed(),
        done,
        skipped
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_argument() {
        let args = ["imgb", "unpack", "a.txbh", "-d", "a.imgb", "-o", "out"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Unpack { platform, .. } => assert_eq!(platform, Platform::Pc),
            _ => panic!("expected unpack"),
        }

        let cli = Cli::try_parse_from([
            "imgb", "repack-fixed", "a.txbh", "-d", "a.imgb", "-s", "src", "-p", "PS3",
        ])
        .unwrap();
        match cli.command {
            Commands::RepackFixed { platform, .. } => assert_eq!(platform, Platform::Ps3),
            _ => panic!("expected repack-fixed"),
        }

        assert!(Cli::try_parse_from([
            "imgb", "unpack", "a.txbh", "-d", "a.imgb", "-o", "out", "-p", "wii",
        ])
        .is_err());
    }

    #[test]
    fn test_run_batch_with_progress_bar() {
        let headers = vec![PathBuf::from("a.txbh"), PathBuf::from("b.txbh")];
        let mut seen = Vec::new();
        run_batch("Testing", &headers, |header| {
            seen.push(header.to_path_buf());
            Ok(Outcome::Done { files: Vec::new() })
        })
        .unwrap();
        assert_eq!(seen, headers);

        let failed = run_batch("Testing", &headers, |header| {
            Err(std::io::Error::other(header.display().to_string()).into())
        });
        assert!(failed.is_err());
    }
}
