//! Board-agnostic refresh engine for two-color LED matrices
//!
//! This crate contains everything between a framebuffer and the panel's
//! shift-register pins that does not depend on a specific chip:
//!
//! - Pixel and framebuffer types (8 rows, red/green, 8 bits per channel)
//! - Temporal dithering accumulator (8-bit intensity from 1-bit outputs)
//! - Row scanner state machine with a reserved frame-sync slot
//! - The `LedMatrix` engine: initialize, enable, disable, set frame, tick
//! - Panel configuration types and the `panel.toml` parser
//!
//! Hardware access goes through the `ledmux-hal` traits, so the whole
//! refresh path can be exercised on the host against recording mock pins.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod dither;
pub mod matrix;
pub mod panel;
pub mod pixel;
pub mod scanner;
pub mod seed;

#[cfg(test)]
pub(crate) mod mock;

pub use config::{ConfigError, PanelConfig, ScanTiming};
pub use dither::{ColumnSink, DitherEngine};
pub use matrix::{FrameSync, LedMatrix};
pub use panel::{Panel, PanelPins, SignalPin};
pub use pixel::{FrameSizeError, Framebuffer, Pixel, ROWS};
pub use scanner::{RowScanner, ScanSlot, SYNC_ROW};
pub use seed::SeedRng;
