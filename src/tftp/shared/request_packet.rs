//! RRQ and WRQ share one layout:
//!
//!   2 bytes     string    1 byte     string   1 byte
//!   ------------------------------------------------
//!  | Opcode |  Filename  |   0  |    Mode    |   0  |
//!   ------------------------------------------------
//!
//! The mode field contains the string "netascii", "octet", or "mail"
//! in any combination of upper and lower case.
use std::fmt;
use std::str;
use std::str::FromStr;

use crate::tftp::shared::{
    check_header, split_terminated, write_terminated, write_u16, Deserializable, Malformation,
    Opcode, Serializable, TFTPParseError, OP_LEN,
};

/// Two opcode bytes plus the two terminators.
const REQUEST_MIN_LEN: usize = OP_LEN + 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferMode {
    NetAscii,
    Octet,
    Mail,
}

impl TransferMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TransferMode::NetAscii => "netascii",
            TransferMode::Octet => "octet",
            TransferMode::Mail => "mail",
        }
    }
}

impl FromStr for TransferMode {
    type Err = Malformation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [TransferMode::NetAscii, TransferMode::Octet, TransferMode::Mail]
            .iter()
            .copied()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Malformation::UnknownMode(s.to_string()))
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Request: Serializable + Deserializable {
    fn filename(&self) -> &str;
    fn mode(&self) -> TransferMode;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRequestPacket {
    req: RequestPacket,
}

impl ReadRequestPacket {
    pub fn new(filename: &str, mode: TransferMode) -> Result<ReadRequestPacket, Malformation> {
        Ok(ReadRequestPacket {
            req: RequestPacket::new(filename, mode)?,
        })
    }
}

impl Request for ReadRequestPacket {
    fn filename(&self) -> &str {
        &self.req.filename
    }

    fn mode(&self) -> TransferMode {
        self.req.mode
    }
}

impl Serializable for ReadRequestPacket {
    fn opcode(&self) -> Opcode {
        Opcode::ReadRequest
    }

    fn serialize(&self) -> Vec<u8> {
        self.req.serialize(self.opcode())
    }
}

impl Deserializable for ReadRequestPacket {
    fn deserialize(buf: &[u8]) -> Result<Self, TFTPParseError> {
        let req = RequestPacket::deserialize(buf, Opcode::ReadRequest)?;
        Ok(ReadRequestPacket { req })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequestPacket {
    req: RequestPacket,
}

impl WriteRequestPacket {
    pub fn new(filename: &str, mode: TransferMode) -> Result<WriteRequestPacket, Malformation> {
        Ok(WriteRequestPacket {
            req: RequestPacket::new(filename, mode)?,
        })
    }
}

impl Request for WriteRequestPacket {
    fn filename(&self) -> &str {
        &self.req.filename
    }

    fn mode(&self) -> TransferMode {
        self.req.mode
    }
}

impl Serializable for WriteRequestPacket {
    fn opcode(&self) -> Opcode {
        Opcode::WriteRequest
    }

    fn serialize(&self) -> Vec<u8> {
        self.req.serialize(self.opcode())
    }
}

impl Deserializable for WriteRequestPacket {
    fn deserialize(buf: &[u8]) -> Result<Self, TFTPParseError> {
        let req = RequestPacket::deserialize(buf, Opcode::WriteRequest)?;
        Ok(WriteRequestPacket { req })
    }
}

/// Fields shared by both request kinds. Only reachable through
/// `ReadRequestPacket` and `WriteRequestPacket`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RequestPacket {
    filename: String,
    mode: TransferMode,
}

impl RequestPacket {
    fn new(filename: &str, mode: TransferMode) -> Result<Self, Malformation> {
        if filename.is_empty() {
            return Err(Malformation::EmptyFilename);
        }
        if filename.contains('\0') {
            return Err(Malformation::InteriorNul("filename"));
        }

        Ok(RequestPacket {
            filename: String::from(filename),
            mode,
        })
    }

    fn serialize(&self, op: Opcode) -> Vec<u8> {
        let mode = self.mode.as_str();
        let length = REQUEST_MIN_LEN + self.filename.len() + mode.len();
        let mut buf = Vec::with_capacity(length);

        write_u16(&mut buf, op.as_u16());
        write_terminated(&mut buf, &self.filename);
        write_terminated(&mut buf, mode);
        buf
    }

    fn deserialize(buf: &[u8], op: Opcode) -> Result<Self, TFTPParseError> {
        check_header(buf, REQUEST_MIN_LEN, op)?;

        let (filename, rest) = split_terminated(&buf[OP_LEN..], "filename")?;
        let (mode, rest) = split_terminated(rest, "mode")?;

        // Options (RFC 2347) are not supported, so nothing may follow the mode.
        if !rest.is_empty() {
            return Err(TFTPParseError::TrailingBytes(rest.len()));
        }

        let filename =
            str::from_utf8(filename).map_err(|_| Malformation::InvalidText("filename"))?;
        let mode = str::from_utf8(mode)
            .map_err(|_| Malformation::InvalidText("mode"))?
            .parse::<TransferMode>()?;

        Ok(RequestPacket::new(filename, mode)?)
    }
}
