//! Configuration module for Candidate-Sourcer
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Endpoints, headers and pacing are plain values handed to each client at
//! construction; nothing here is process-global.
//!
//! # Example
//!
//! ```no_run
//! use candidate_sourcer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sourcer.toml")).unwrap();
//! println!("Authenticated search: {}", config.linkedin.credential().is_some());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, HttpConfig, LinkedInConfig, PacingConfig, PacingEntry, SearchEngineConfig,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{apply_env_overrides, default_config, load_config, parse_config, SESSION_COOKIE_ENV};
pub use validation::{validate, MAX_PAGE_SIZE};
