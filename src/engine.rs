// src/engine.rs
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;

use rusbit_bencode::{bvalue_to_json, decode_bencode_with, encode_bvalue, BValue, Config};

use crate::Command;

pub fn use_command(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Decode { bencoded } => {
            let value = decode_bencode_with(bencoded.as_bytes(), &config.decode)
                .context("Failed to decode argument")?;
            println!("{}", serde_json::to_string(&bvalue_to_json(&value))?);
        }
        Command::Inspect { file } => {
            let (_, value) = read_bencoded(&file, config)?;
            println!("{}", serde_json::to_string_pretty(&bvalue_to_json(&value))?);
        }
        Command::Check { file } => {
            let (raw, value) = read_bencoded(&file, config)?;
            let canonical = value.is_canonical();
            let reproduces = encode_bvalue(&value) == raw;
            println!("Kind: {}", value.kind());
            println!("Canonical key order: {}", canonical);
            println!("Re-encodes byte for byte: {}", reproduces);
            if !reproduces {
                bail!("{} does not re-encode to identical bytes", file.display());
            }
        }
        Command::Canonicalize { input, output } => {
            let (raw, mut value) = read_bencoded(&input, config)?;
            value.canonicalize();
            let encoded = encode_bvalue(&value);
            fs::write(&output, &encoded)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!(
                "wrote {} bytes to {} ({} changed)",
                encoded.len(),
                output.display(),
                if encoded == raw { "nothing" } else { "key order" }
            );
        }
    }
    Ok(())
}

fn read_bencoded(path: &Path, config: &Config) -> Result<(Vec<u8>, BValue)> {
    let raw = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value = decode_bencode_with(&raw, &config.decode)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    Ok((raw, value))
}
