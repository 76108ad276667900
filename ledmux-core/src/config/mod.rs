//! Configuration types
//!
//! Board-agnostic panel configuration and the `panel.toml` parser.

pub mod parse;
pub mod types;

pub use parse::parse_panel_config;
pub use types::*;
