//! Configuration module for Panelbound
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. The configuration replaces what would otherwise be a pile of global
//! constants (selectors, paths, feature switches) with a single immutable
//! structure passed into each component at construction.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OptimizerConfig, RenderConfig, SiteConfig, StateConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
