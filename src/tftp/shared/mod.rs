use std::fmt;
use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::tftp::shared::ack_packet::AckPacket;
use crate::tftp::shared::data_packet::DataPacket;
use crate::tftp::shared::err_packet::ErrorPacket;
use crate::tftp::shared::request_packet::*;

use byteorder::{ByteOrder, NetworkEndian};

pub mod ack_packet;
pub mod data_packet;
pub mod err_packet;
pub mod netascii;
pub mod request_packet;

/// Length of the OpCode field in bytes.
pub(crate) const OP_LEN: usize = 2;
/// Stride size for reading / writing files, also the largest DATA payload.
pub const STRIDE_SIZE: usize = 512;
/// Op code for Read Request
const OP_RRQ: u16 = 0x001;
/// Op code for Write Request
const OP_WRQ: u16 = 0x002;
/// Op code for Data packet
const OP_DATA: u16 = 0x003;
/// Op code for ACK packet
const OP_ACK: u16 = 0x004;
/// Op code for Error packet
const OP_ERR: u16 = 0x005;

/// The leading two bytes of every TFTP packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    ReadRequest,
    WriteRequest,
    Data,
    Acknowledgment,
    Error,
}

impl Opcode {
    /// Classifies a raw opcode. Anything outside `1..=5` is unknown and
    /// yields `None`.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            OP_RRQ => Some(Opcode::ReadRequest),
            OP_WRQ => Some(Opcode::WriteRequest),
            OP_DATA => Some(Opcode::Data),
            OP_ACK => Some(Opcode::Acknowledgment),
            OP_ERR => Some(Opcode::Error),
            _ => None,
        }
    }

    pub fn as_u16(self) -> u16 {
        match self {
            Opcode::ReadRequest => OP_RRQ,
            Opcode::WriteRequest => OP_WRQ,
            Opcode::Data => OP_DATA,
            Opcode::Acknowledgment => OP_ACK,
            Opcode::Error => OP_ERR,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Opcode::ReadRequest => "RRQ",
            Opcode::WriteRequest => "WRQ",
            Opcode::Data => "DATA",
            Opcode::Acknowledgment => "ACK",
            Opcode::Error => "ERR",
        }
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TFTPPacket {
    RRQ(ReadRequestPacket),
    WRQ(WriteRequestPacket),
    DATA(DataPacket),
    ACK(AckPacket),
    ERR(ErrorPacket),
}

impl TFTPPacket {
    pub fn opcode(&self) -> Opcode {
        match self {
            TFTPPacket::RRQ(p) => p.opcode(),
            TFTPPacket::WRQ(p) => p.opcode(),
            TFTPPacket::DATA(p) => p.opcode(),
            TFTPPacket::ACK(p) => p.opcode(),
            TFTPPacket::ERR(p) => p.opcode(),
        }
    }

    /// Wire representation of the packet, ready to be sent as one datagram.
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            TFTPPacket::RRQ(p) => p.serialize(),
            TFTPPacket::WRQ(p) => p.serialize(),
            TFTPPacket::DATA(p) => p.serialize(),
            TFTPPacket::ACK(p) => p.serialize(),
            TFTPPacket::ERR(p) => p.serialize(),
        }
    }
}

impl Display for TFTPPacket {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TFTPPacket::RRQ(p) => write!(f, "RRQ [{}] [{}]", p.filename(), p.mode()),
            TFTPPacket::WRQ(p) => write!(f, "WRQ [{}] [{}]", p.filename(), p.mode()),
            TFTPPacket::DATA(p) => write!(f, "DATA [{}] ({} bytes)", p.blk(), p.len()),
            TFTPPacket::ACK(p) => write!(f, "ACK [{}]", p.blk()),
            TFTPPacket::ERR(p) => write!(f, "ERR [{}]: {}", p.code().as_u16(), p.err()),
        }
    }
}

impl From<ReadRequestPacket> for TFTPPacket {
    fn from(p: ReadRequestPacket) -> Self {
        TFTPPacket::RRQ(p)
    }
}

impl From<WriteRequestPacket> for TFTPPacket {
    fn from(p: WriteRequestPacket) -> Self {
        TFTPPacket::WRQ(p)
    }
}

impl From<DataPacket> for TFTPPacket {
    fn from(p: DataPacket) -> Self {
        TFTPPacket::DATA(p)
    }
}

impl From<AckPacket> for TFTPPacket {
    fn from(p: AckPacket) -> Self {
        TFTPPacket::ACK(p)
    }
}

impl From<ErrorPacket> for TFTPPacket {
    fn from(p: ErrorPacket) -> Self {
        TFTPPacket::ERR(p)
    }
}

pub trait Serializable {
    fn opcode(&self) -> Opcode;
    fn serialize(&self) -> Vec<u8>;
}

pub trait Deserializable: Sized {
    fn deserialize(buf: &[u8]) -> Result<Self, TFTPParseError>;
}

/// Classifies a received datagram by its opcode and hands the whole buffer
/// to the matching packet decoder.
pub fn parse_udp_packet(buf: &[u8]) -> Result<TFTPPacket, TFTPParseError> {
    if buf.len() < OP_LEN {
        return Err(TFTPParseError::Truncated {
            needed: OP_LEN,
            actual: buf.len(),
        });
    }

    let raw = NetworkEndian::read_u16(buf);
    let op = Opcode::from_u16(raw).ok_or(TFTPParseError::UnknownOpcode(raw))?;

    let p = match op {
        Opcode::ReadRequest => TFTPPacket::RRQ(ReadRequestPacket::deserialize(buf)?),
        Opcode::WriteRequest => TFTPPacket::WRQ(WriteRequestPacket::deserialize(buf)?),
        Opcode::Data => TFTPPacket::DATA(DataPacket::deserialize(buf)?),
        Opcode::Acknowledgment => TFTPPacket::ACK(AckPacket::deserialize(buf)?),
        Opcode::Error => TFTPPacket::ERR(ErrorPacket::deserialize(buf)?),
    };

    Ok(p)
}

/// A field that cannot appear in a well-formed packet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformation {
    #[error("{0} is not NUL-terminated")]
    Unterminated(&'static str),
    #[error("{0} is not valid text")]
    InvalidText(&'static str),
    #[error("filename is empty")]
    EmptyFilename,
    #[error("{0} contains a NUL byte")]
    InteriorNul(&'static str),
    #[error("unknown transfer mode {0:?}")]
    UnknownMode(String),
    #[error("payload of {0} bytes exceeds 512")]
    PayloadTooLarge(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TFTPParseError {
    #[error("packet truncated: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },
    #[error("bad OP code! expected {expected} got [{actual}]")]
    OpcodeMismatch { expected: Opcode, actual: u16 },
    #[error("invalid opcode [{0}]")]
    UnknownOpcode(u16),
    #[error("malformed packet: {0}")]
    Malformed(#[from] Malformation),
    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),
}

/// Checks the minimum length and the opcode of `buf` before a variant
/// reads its fields.
pub(crate) fn check_header(
    buf: &[u8],
    min_len: usize,
    expected: Opcode,
) -> Result<(), TFTPParseError> {
    if buf.len() < min_len {
        return Err(TFTPParseError::Truncated {
            needed: min_len,
            actual: buf.len(),
        });
    }

    let actual = NetworkEndian::read_u16(buf);
    if actual != expected.as_u16() {
        return Err(TFTPParseError::OpcodeMismatch { expected, actual });
    }

    Ok(())
}

/// Splits `buf` at its first NUL, returning the text before it and
/// everything after it.
pub(crate) fn split_terminated<'a>(
    buf: &'a [u8],
    field: &'static str,
) -> Result<(&'a [u8], &'a [u8]), Malformation> {
    let end = buf
        .iter()
        .position(|&byte| byte == 0)
        .ok_or(Malformation::Unterminated(field))?;

    Ok((&buf[..end], &buf[end + 1..]))
}

pub(crate) fn write_u16(buf: &mut Vec<u8>, value: u16) {
    let mut word = [0; 2];
    NetworkEndian::write_u16(&mut word, value);
    buf.extend_from_slice(&word);
}

/// Appends `text` followed by its NUL terminator.
pub(crate) fn write_terminated(buf: &mut Vec<u8>, text: &str) {
    buf.extend_from_slice(text.as_bytes());
    buf.push(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_codes() {
        for raw in 1..=5 {
            assert_eq!(Opcode::from_u16(raw).unwrap().as_u16(), raw);
        }
        assert_eq!(Opcode::from_u16(0), None);
        assert_eq!(Opcode::from_u16(6), None);
    }

    #[test]
    fn dispatch_short_buffer() {
        assert_eq!(
            parse_udp_packet(&[0x0]),
            Err(TFTPParseError::Truncated { needed: 2, actual: 1 })
        );
        assert_eq!(
            parse_udp_packet(&[]),
            Err(TFTPParseError::Truncated { needed: 2, actual: 0 })
        );
    }

    #[test]
    fn dispatch_unknown_opcode() {
        for raw in [0u16, 6, 0xFFFF].iter() {
            let mut buf = Vec::new();
            write_u16(&mut buf, *raw);
            buf.extend_from_slice(&[0, 1]);
            assert_eq!(parse_udp_packet(&buf), Err(TFTPParseError::UnknownOpcode(*raw)));
        }
    }

    #[test]
    fn dispatch_propagates_variant_error() {
        // ACK with one byte too many.
        let buf = vec![0x0, 0x4, 0x0, 0x1, 0x0];
        assert_eq!(parse_udp_packet(&buf), Err(TFTPParseError::TrailingBytes(1)));
    }

    #[test]
    fn split_terminated_fields() {
        let (text, rest) = split_terminated(b"abc\0def", "filename").unwrap();
        assert_eq!(text, b"abc");
        assert_eq!(rest, b"def");
        assert_eq!(
            split_terminated(b"abc", "filename"),
            Err(Malformation::Unterminated("filename"))
        );
    }

    #[test]
    fn display_packets() {
        let ack = TFTPPacket::from(AckPacket::new(7));
        assert_eq!(ack.to_string(), "ACK [7]");
        let rrq = TFTPPacket::from(ReadRequestPacket::new("a.txt", TransferMode::Octet).unwrap());
        assert_eq!(rrq.to_string(), "RRQ [a.txt] [octet]");
    }
}
