//! ledmux Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the panel engine is written
//! against. Chip-specific HALs implement them so the same refresh logic
//! runs on any board, and host tests can substitute recording mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  ledmux-core (LedMatrix engine)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ledmux-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  ledmux-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital outputs (latch, shift clock, data, row address)
//! - [`timer::TickSource`] - Periodic refresh tick start/stop

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod timer;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use timer::TickSource;
