//! ledmux Frame Uplink Protocol
//!
//! This crate defines the UART protocol a host uses to push framebuffers
//! to a panel controller. Rows are staged one packet at a time and
//! committed together, so the panel never shows a half-uploaded frame.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary packet format:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 0xAA  │ 1B     │ 1B   │ 0–250B      │ 1B (XOR) │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! A typical upload is eight `Row` packets followed by one `Present`; the
//! panel answers `Presented` with the frame counter at the moment the new
//! buffer took effect.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod messages;
pub mod packet;

pub use messages::{HostCommand, MessageError, NackReason, PanelMessage};
pub use packet::{Packet, PacketError, PacketParser, MAX_PACKET_SIZE, MAX_PAYLOAD_SIZE, PACKET_START};
