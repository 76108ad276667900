//! RP2040-specific HAL for ledmux panel controllers
//!
//! This crate provides RP2040 implementations of the `ledmux-hal` traits,
//! plus the chip-specific plumbing the firmware needs:
//!
//! - `OutputPin` for embassy-rp GPIO outputs
//! - Dynamic pin allocation for config-driven panel wiring
//! - A `TickSource` backed by an embassy `Ticker` on a dedicated executor

#![no_std]

pub mod gpio;
pub mod pins;
pub mod timer;

pub use gpio::RpOutput;
pub use pins::{PinBank, PinError, UartPeripherals};
pub use timer::{run_refresh, RefreshCommand, TickerSource, REFRESH_CONTROL};
