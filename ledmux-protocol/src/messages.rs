//! Message types for the frame uplink
//!
//! - Host → Panel: row uploads, present/clear, enable/disable, heartbeat
//! - Panel → Host: heartbeat responses, present confirmations, rejections

use crate::packet::{Packet, PacketError, MAX_PAYLOAD_SIZE};
use heapless::Vec;

// Message type IDs: Host → Panel
pub const MSG_PING: u8 = 0x01;
pub const MSG_ROW: u8 = 0x10;
pub const MSG_PRESENT: u8 = 0x11;
pub const MSG_CLEAR: u8 = 0x12;
pub const MSG_ENABLE: u8 = 0x20;
pub const MSG_DISABLE: u8 = 0x21;

// Message type IDs: Panel → Host
pub const MSG_PONG: u8 = 0x81;
pub const MSG_PRESENTED: u8 = 0x82;
pub const MSG_NACK: u8 = 0x83;

/// Row indices addressable on the wire
pub const WIRE_ROWS: u8 = 8;

/// Largest pixel payload a single row packet can carry
pub const MAX_ROW_BYTES: usize = MAX_PAYLOAD_SIZE - 1;

/// Why a host message could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Type byte does not name a known message
    UnknownType(u8),
    /// Payload missing or malformed for the message type
    InvalidPayload,
    /// Row index outside `0..WIRE_ROWS`
    RowOutOfRange(u8),
    /// Row payload does not hold whole `(red, green)` pairs
    OddRowLength(usize),
    /// The message could not be packed
    Packet(PacketError),
}

impl From<PacketError> for MessageError {
    fn from(e: PacketError) -> Self {
        MessageError::Packet(e)
    }
}

/// Reason code carried by a `Nack`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum NackReason {
    /// Packet failed checksum or length validation
    Corrupt = 0x01,
    /// Unknown message type
    UnknownCommand = 0x02,
    /// Row index outside the panel
    RowOutOfRange = 0x03,
    /// Row pixel count does not match the panel width
    RowLength = 0x04,
    /// Payload malformed for its message type
    InvalidPayload = 0x05,
}

impl NackReason {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(NackReason::Corrupt),
            0x02 => Some(NackReason::UnknownCommand),
            0x03 => Some(NackReason::RowOutOfRange),
            0x04 => Some(NackReason::RowLength),
            0x05 => Some(NackReason::InvalidPayload),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

impl From<MessageError> for NackReason {
    fn from(e: MessageError) -> Self {
        match e {
            MessageError::UnknownType(_) => NackReason::UnknownCommand,
            MessageError::InvalidPayload => NackReason::InvalidPayload,
            MessageError::RowOutOfRange(_) => NackReason::RowOutOfRange,
            MessageError::OddRowLength(_) => NackReason::RowLength,
            MessageError::Packet(_) => NackReason::Corrupt,
        }
    }
}

/// Commands sent by the host to the panel controller
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostCommand<'a> {
    /// Heartbeat request
    Ping,
    /// Stage one row of the next frame
    ///
    /// `pixels` is the flat `[r, g, r, g, ...]` layout for the row.
    Row { row: u8, pixels: &'a [u8] },
    /// Commit the staged rows as the displayed frame
    Present,
    /// Display an all-dark frame
    Clear,
    /// Start scanning
    Enable,
    /// Stop scanning and blank the panel
    Disable,
}

impl<'a> HostCommand<'a> {
    /// Parse a command from a packet
    ///
    /// The pixel count of a row is not checked here; the panel width is a
    /// property of the receiver.
    pub fn from_packet(packet: &'a Packet) -> Result<Self, MessageError> {
        let payload = packet.payload.as_slice();
        let no_payload = |cmd: HostCommand<'a>| {
            if payload.is_empty() {
                Ok(cmd)
            } else {
                Err(MessageError::InvalidPayload)
            }
        };

        match packet.msg_type {
            MSG_PING => no_payload(HostCommand::Ping),
            MSG_ROW => {
                let (&row, pixels) = payload.split_first().ok_or(MessageError::InvalidPayload)?;
                if row >= WIRE_ROWS {
                    return Err(MessageError::RowOutOfRange(row));
                }
                if pixels.len() % 2 != 0 {
                    return Err(MessageError::OddRowLength(pixels.len()));
                }
                Ok(HostCommand::Row { row, pixels })
            }
            MSG_PRESENT => no_payload(HostCommand::Present),
            MSG_CLEAR => no_payload(HostCommand::Clear),
            MSG_ENABLE => no_payload(HostCommand::Enable),
            MSG_DISABLE => no_payload(HostCommand::Disable),
            other => Err(MessageError::UnknownType(other)),
        }
    }

    /// Encode this command into a packet (host side, or for testing)
    pub fn to_packet(&self) -> Result<Packet, MessageError> {
        let packet = match self {
            HostCommand::Ping => Packet::empty(MSG_PING),
            HostCommand::Row { row, pixels } => {
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload.push(*row).map_err(|_| PacketError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(pixels)
                    .map_err(|_| PacketError::PayloadTooLarge)?;
                Packet::new(MSG_ROW, &payload)?
            }
            HostCommand::Present => Packet::empty(MSG_PRESENT),
            HostCommand::Clear => Packet::empty(MSG_CLEAR),
            HostCommand::Enable => Packet::empty(MSG_ENABLE),
            HostCommand::Disable => Packet::empty(MSG_DISABLE),
        };
        Ok(packet)
    }
}

/// Messages sent by the panel controller to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelMessage {
    /// Heartbeat response
    Pong,
    /// Staged frame is now displayed, starting at this frame counter
    Presented { frame: u32 },
    /// The last command was rejected
    Nack(NackReason),
}

impl PanelMessage {
    pub fn to_packet(&self) -> Packet {
        match self {
            PanelMessage::Pong => Packet::empty(MSG_PONG),
            PanelMessage::Presented { frame } => {
                let mut packet = Packet::empty(MSG_PRESENTED);
                let _ = packet.payload.extend_from_slice(&frame.to_le_bytes());
                packet
            }
            PanelMessage::Nack(reason) => {
                let mut packet = Packet::empty(MSG_NACK);
                let _ = packet.payload.push(reason.to_byte());
                packet
            }
        }
    }

    /// Parse a panel message (host side)
    pub fn from_packet(packet: &Packet) -> Result<Self, MessageError> {
        let payload = packet.payload.as_slice();
        match packet.msg_type {
            MSG_PONG => Ok(PanelMessage::Pong),
            MSG_PRESENTED => {
                let bytes: [u8; 4] = payload.try_into().map_err(|_| MessageError::InvalidPayload)?;
                Ok(PanelMessage::Presented {
                    frame: u32::from_le_bytes(bytes),
                })
            }
            MSG_NACK => match payload {
                [code] => NackReason::from_byte(*code)
                    .map(PanelMessage::Nack)
                    .ok_or(MessageError::InvalidPayload),
                _ => Err(MessageError::InvalidPayload),
            },
            other => Err(MessageError::UnknownType(other)),
        }
    }
}
