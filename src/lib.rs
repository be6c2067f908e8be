// lib.rs - Library interface for the bencode codec

pub mod bencode;
pub mod config;

// Re-export commonly used types for easier testing
pub use bencode::*;
pub use config::{Config, ConfigError, DecodeOptions, MAX_DEPTH_LIMIT};
