//! Configuration module for ArchiveLinks
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so running without a configuration file is fine.
//!
//! # Example
//!
//! ```no_run
//! use archivelinks::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("archivelinks.toml")).unwrap();
//! println!("Polling up to {} times", config.archive.poll_attempts);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ArchiveConfig, Config, OutputConfig, SchedulerConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
