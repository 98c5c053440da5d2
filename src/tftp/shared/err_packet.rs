//! ERROR packet can be the acknowledgment of any other type of packet.
//! The error code is an integer indicating the nature of the error.  A
//! table of values and meanings is given in the appendix.  (Note that
//! several error codes have been added to this version of this
//! document.) The error message is intended for human consumption, and
//! should be in netascii.  Like all other strings, it is terminated with
//! a zero byte.
use std::fmt;

use crate::tftp::shared::{
    check_header, split_terminated, write_terminated, write_u16, Deserializable, Malformation,
    Opcode, Serializable, TFTPParseError, OP_LEN,
};

use byteorder::{ByteOrder, NetworkEndian};

/// Opcode, error code and the message terminator.
const ERR_MIN_LEN: usize = 5;
const ERR_OFFSET: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotDefined,
    FileNotFound,
    AccessViolation,
    DiskFull,
    IllegalOperation,
    UnknownTransferId,
    FileAlreadyExists,
    NoSuchUser,
    /// A code outside the RFC 1350 table, kept so the packet still decodes.
    Unrecognized(u16),
}

impl ErrorCode {
    pub fn from_u16(code: u16) -> Self {
        match code {
            0 => ErrorCode::NotDefined,
            1 => ErrorCode::FileNotFound,
            2 => ErrorCode::AccessViolation,
            3 => ErrorCode::DiskFull,
            4 => ErrorCode::IllegalOperation,
            5 => ErrorCode::UnknownTransferId,
            6 => ErrorCode::FileAlreadyExists,
            7 => ErrorCode::NoSuchUser,
            other => ErrorCode::Unrecognized(other),
        }
    }

    /// Folds `Unrecognized` values that belong to the RFC table back into
    /// their named code, so encode and decode agree on the variant.
    fn canonical(self) -> Self {
        ErrorCode::from_u16(self.as_u16())
    }

    pub fn as_u16(self) -> u16 {
        match self {
            ErrorCode::NotDefined => 0,
            ErrorCode::FileNotFound => 1,
            ErrorCode::AccessViolation => 2,
            ErrorCode::DiskFull => 3,
            ErrorCode::IllegalOperation => 4,
            ErrorCode::UnknownTransferId => 5,
            ErrorCode::FileAlreadyExists => 6,
            ErrorCode::NoSuchUser => 7,
            ErrorCode::Unrecognized(code) => code,
        }
    }

    pub fn is_recognized(self) -> bool {
        !matches!(self, ErrorCode::Unrecognized(_))
    }

    pub fn default_message(self) -> &'static str {
        match self {
            ErrorCode::NotDefined => "Not defined, see error message (if any).",
            ErrorCode::FileNotFound => "File not found.",
            ErrorCode::AccessViolation => "Access violation.",
            ErrorCode::DiskFull => "Disk full or allocation exceeded.",
            ErrorCode::IllegalOperation => "Illegal TFTP operation.",
            ErrorCode::UnknownTransferId => "Unknown transfer ID.",
            ErrorCode::FileAlreadyExists => "File already exists.",
            ErrorCode::NoSuchUser => "No such user.",
            ErrorCode::Unrecognized(_) => "Unrecognized error code.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.default_message(), self.as_u16())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ErrorPacket {
    code: ErrorCode,
    err: String,
}

impl ErrorPacket {
    pub fn new(code: ErrorCode, msg: &str) -> Result<Self, Malformation> {
        if msg.contains('\0') {
            return Err(Malformation::InteriorNul("error message"));
        }

        Ok(ErrorPacket {
            code: code.canonical(),
            err: msg.to_string(),
        })
    }

    /// Error packet carrying the RFC 1350 text for `code`.
    pub fn from_code(code: ErrorCode) -> Self {
        let code = code.canonical();
        ErrorPacket {
            code,
            err: code.default_message().to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn err(&self) -> &str {
        &self.err
    }
}

impl Serializable for ErrorPacket {
    fn opcode(&self) -> Opcode {
        Opcode::Error
    }

    fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(ERR_MIN_LEN + self.err.len());
        write_u16(&mut buf, self.opcode().as_u16());
        write_u16(&mut buf, self.code.as_u16());
        write_terminated(&mut buf, &self.err);
        buf
    }
}

impl Deserializable for ErrorPacket {
    fn deserialize(buf: &[u8]) -> Result<Self, TFTPParseError> {
        check_header(buf, ERR_MIN_LEN, Opcode::Error)?;

        let code = ErrorCode::from_u16(NetworkEndian::read_u16(&buf[OP_LEN..ERR_OFFSET]));
        let (msg, rest) = split_terminated(&buf[ERR_OFFSET..], "error message")?;

        if !rest.is_empty() {
            return Err(TFTPParseError::TrailingBytes(rest.len()));
        }

        // A peer's diagnostic text is never a reason to drop its error.
        let err = String::from_utf8_lossy(msg).into_owned();
        Ok(ErrorPacket { code, err })
    }
}
