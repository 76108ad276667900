//! Packet encoding and decoding
//!
//! Packet format:
//! - START (1 byte): 0xAA synchronization byte
//! - LENGTH (1 byte): payload length (0-250)
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0-250 bytes): type-specific data
//! - CHECKSUM (1 byte): XOR of LENGTH, TYPE, and all PAYLOAD bytes

use heapless::Vec;

/// Packet synchronization byte
pub const PACKET_START: u8 = 0xAA;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// Bytes around the payload (START + LENGTH + TYPE + CHECKSUM)
pub const PACKET_OVERHEAD: usize = 4;

/// Maximum complete packet size
pub const MAX_PACKET_SIZE: usize = PACKET_OVERHEAD + MAX_PAYLOAD_SIZE;

/// Errors that can occur during packet parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// LENGTH byte larger than `MAX_PAYLOAD_SIZE`
    InvalidLength,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A parsed or constructed packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Message type identifier
    pub msg_type: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Packet {
    /// Create a packet with the given message type and payload
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, PacketError> {
        let payload = Vec::from_slice(payload).map_err(|_| PacketError::PayloadTooLarge)?;
        Ok(Self { msg_type, payload })
    }

    /// Create a packet with no payload
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    /// Encoded size of this packet
    pub fn encoded_len(&self) -> usize {
        PACKET_OVERHEAD + self.payload.len()
    }

    fn checksum(length: u8, msg_type: u8, payload: &[u8]) -> u8 {
        payload.iter().fold(length ^ msg_type, |acc, b| acc ^ b)
    }

    /// Encode this packet into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, PacketError> {
        let len = self.encoded_len();
        let out = buffer.get_mut(..len).ok_or(PacketError::BufferTooSmall)?;

        let length = self.payload.len() as u8;
        let (header, rest) = out.split_at_mut(3);
        header.copy_from_slice(&[PACKET_START, length, self.msg_type]);

        let (body, tail) = rest.split_at_mut(self.payload.len());
        body.copy_from_slice(&self.payload);
        tail[0] = Self::checksum(length, self.msg_type, &self.payload);

        Ok(len)
    }

    /// Encode this packet into a heapless Vec
    pub fn to_vec(&self) -> Vec<u8, MAX_PACKET_SIZE> {
        let mut buffer = [0u8; MAX_PACKET_SIZE];
        // A packet always fits MAX_PACKET_SIZE by construction
        let len = self.encode(&mut buffer).unwrap_or(0);
        let mut out = Vec::new();
        let _ = out.extend_from_slice(&buffer[..len]);
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Hunting for START
    Sync,
    /// Got START, next byte is LENGTH
    Length,
    /// Got LENGTH, next byte is TYPE
    Type,
    /// Collecting payload bytes
    Payload,
    /// Next byte is CHECKSUM
    Checksum,
}

/// Byte-at-a-time packet decoder
///
/// Bytes outside a packet are skipped until the next START. After an error
/// the parser is back in the hunting state, so a corrupted packet costs
/// only itself.
#[derive(Debug, Clone)]
pub struct PacketParser {
    state: ParseState,
    length: u8,
    msg_type: u8,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Default for PacketParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketParser {
    pub const fn new() -> Self {
        Self {
            state: ParseState::Sync,
            length: 0,
            msg_type: 0,
            payload: Vec::new(),
        }
    }

    /// Drop any partial packet
    pub fn reset(&mut self) {
        self.state = ParseState::Sync;
        self.length = 0;
        self.msg_type = 0;
        self.payload.clear();
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(packet))` when a complete valid packet is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on a parse error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Packet>, PacketError> {
        match self.state {
            ParseState::Sync => {
                if byte == PACKET_START {
                    self.state = ParseState::Length;
                }
            }
            ParseState::Length => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(PacketError::InvalidLength);
                }
                self.length = byte;
                self.state = ParseState::Type;
            }
            ParseState::Type => {
                self.msg_type = byte;
                self.payload.clear();
                self.state = if self.length == 0 {
                    ParseState::Checksum
                } else {
                    ParseState::Payload
                };
            }
            ParseState::Payload => {
                // Capacity is MAX_PAYLOAD_SIZE and length was checked against it
                let _ = self.payload.push(byte);
                if self.payload.len() == self.length as usize {
                    self.state = ParseState::Checksum;
                }
            }
            ParseState::Checksum => {
                let expected = Packet::checksum(self.length, self.msg_type, &self.payload);
                if byte != expected {
                    self.reset();
                    return Err(PacketError::InvalidChecksum);
                }

                let packet = Packet {
                    msg_type: self.msg_type,
                    payload: core::mem::take(&mut self.payload),
                };
                self.reset();
                return Ok(Some(packet));
            }
        }
        Ok(None)
    }
}
