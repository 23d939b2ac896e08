//! Configuration module for Good Spots
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and deriving every output path from the configured root.
//!
//! # Example
//!
//! ```no_run
//! use good_spots::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("good-spots.toml")).unwrap();
//! println!("Harvesting from: {}", config.site.base_url);
//! ```

mod layout;
mod parser;
mod types;
mod validation;

// Re-export types
pub use layout::OutputLayout;
pub use types::{Config, HttpConfig, OutputConfig, SiteConfig, DEFAULT_OUTPUT_ROOT};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
