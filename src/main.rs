
mod engine;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::error;
use rusbit_bencode::Config;

use crate::engine::use_command;

#[derive(Parser, Debug)]
#[command(name = "bencode", version, about = "Decode, inspect and canonicalize bencoded data")]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./bencode.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a bencoded string given on the command line and print it as JSON
    Decode { bencoded: String },
    /// Decode a file and pretty-print it as JSON
    Inspect { file: PathBuf },
    /// Report whether a file is canonical and re-encodes byte for byte
    Check { file: PathBuf },
    /// Rewrite a file with every dictionary's keys sorted
    Canonicalize { input: PathBuf, output: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_path(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    if let Err(e) = use_command(cli.command, &config) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
