//! DATA packets carry one block of the transferred file.
//!
//!   2 bytes     2 bytes      n bytes
//!   ----------------------------------
//!  | Opcode |   Block #  |   Data     |
//!   ----------------------------------
//!
//! A payload of exactly 512 bytes means more blocks follow, anything
//! shorter (including zero bytes) ends the transfer.
use crate::tftp::shared::{
    check_header, write_u16, Deserializable, Malformation, Opcode, Serializable, TFTPParseError,
    OP_LEN, STRIDE_SIZE,
};

use byteorder::{ByteOrder, NetworkEndian};

const BLK_NUM_LEN: usize = 2;
const DATA_OFFSET: usize = OP_LEN + BLK_NUM_LEN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPacket {
    blk: u16,
    data: Vec<u8>,
}

impl DataPacket {
    pub fn new(blk: u16, data: Vec<u8>) -> Result<Self, Malformation> {
        if data.len() > STRIDE_SIZE {
            return Err(Malformation::PayloadTooLarge(data.len()));
        }

        Ok(DataPacket { blk, data })
    }

    pub fn blk(&self) -> u16 {
        self.blk
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True when this is the last block of a transfer.
    pub fn is_final(&self) -> bool {
        self.data.len() < STRIDE_SIZE
    }
}

impl Serializable for DataPacket {
    fn opcode(&self) -> Opcode {
        Opcode::Data
    }

    fn serialize(&self) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::with_capacity(DATA_OFFSET + self.len());
        write_u16(&mut buf, self.opcode().as_u16());
        write_u16(&mut buf, self.blk);
        buf.extend_from_slice(&self.data);

        buf
    }
}

impl Deserializable for DataPacket {
    fn deserialize(buf: &[u8]) -> Result<Self, TFTPParseError> {
        check_header(buf, DATA_OFFSET, Opcode::Data)?;

        let blk = NetworkEndian::read_u16(&buf[OP_LEN..DATA_OFFSET]);
        let data = &buf[DATA_OFFSET..];

        Ok(DataPacket::new(blk, data.to_vec())?)
    }
}
