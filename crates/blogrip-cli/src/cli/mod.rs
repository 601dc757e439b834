//! CLI for blogrip.

mod commands;

use anyhow::Result;
use blogrip_core::config::{self, RipperConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_index, run_reference, run_rip, RipArgs};

/// Top-level CLI for blogrip.
#[derive(Debug, Parser)]
#[command(name = "blogrip")]
#[command(about = "Mirror photos and videos from blog feeds, skipping what was already fetched", long_about = None)]
pub struct Cli {
    /// Debug-level logging for blogrip itself.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of ~/.config/blogrip/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every photo and video of the given sites.
    Rip {
        /// Output root; each site gets a subdirectory.
        #[arg(short = 'd', long = "directory", value_name = "DIR")]
        directory: PathBuf,

        /// File listing sites (separated by commas or whitespace).
        #[arg(short = 's', long = "sites-file", value_name = "FILE")]
        sites_file: Option<PathBuf>,

        /// Dedup store (default ~/.local/state/blogrip/dedup.json).
        #[arg(short = 'p', long = "dedup-file", value_name = "FILE")]
        dedup_file: Option<PathBuf>,

        /// JSON proxy file, e.g. {"http": "...", "https": "..."}.
        #[arg(long, value_name = "FILE")]
        proxy_file: Option<PathBuf>,

        /// Site names, in addition to any from --sites-file.
        sites: Vec<String>,
    },

    /// Record media already on disk so later rips skip it.
    Reference {
        /// Directory to scan.
        #[arg(short = 'd', long = "directory", value_name = "DIR")]
        directory: PathBuf,

        /// Dedup store (default ~/.local/state/blogrip/dedup.json).
        #[arg(short = 'p', long = "dedup-file", value_name = "FILE")]
        dedup_file: Option<PathBuf>,

        /// Descend into subdirectories.
        #[arg(short, long)]
        recursive: bool,
    },

    /// Write an index.html into every directory holding media.
    Index {
        /// Directory to scan.
        #[arg(short = 'd', long = "directory", value_name = "DIR")]
        directory: PathBuf,

        /// Descend into subdirectories.
        #[arg(short, long)]
        recursive: bool,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            CliCommand::Rip {
                directory,
                sites_file,
                dedup_file,
                proxy_file,
                sites,
            } => {
                let cfg = load_config(self.config.as_deref())?;
                run_rip(
                    &cfg,
                    RipArgs {
                        directory,
                        sites_file,
                        dedup_file,
                        proxy_file,
                        sites,
                    },
                )?;
            }
            CliCommand::Reference {
                directory,
                dedup_file,
                recursive,
            } => run_reference(&directory, dedup_file, recursive)?,
            CliCommand::Index {
                directory,
                recursive,
            } => run_index(&directory, recursive)?,
        }
        Ok(())
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<RipperConfig> {
    let cfg = match path {
        Some(path) => config::load_from_path(path)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
