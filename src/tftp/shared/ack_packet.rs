//! ACK packets are acknowledged by  DATA  or ERROR packets.
//! the opcode is 4.
//!
//! The  block  number  in an  ACK echoes
//! the block number of the DATA packet being acknowledged.
//!
//! A WRQ is acknowledged with an ACK packet having a
//! block number of zero.
use crate::tftp::shared::{
    check_header, write_u16, Deserializable, Opcode, Serializable, TFTPParseError, OP_LEN,
};

use byteorder::{ByteOrder, NetworkEndian};

const ACK_LEN: usize = 4;
const BLK_NUM_OFFSET: usize = OP_LEN;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct AckPacket {
    blk: u16,
}

impl AckPacket {
    pub fn new(blk: u16) -> Self {
        AckPacket { blk }
    }

    pub fn blk(&self) -> u16 {
        self.blk
    }
}

impl Serializable for AckPacket {
    fn opcode(&self) -> Opcode {
        Opcode::Acknowledgment
    }

    fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(ACK_LEN);
        write_u16(&mut buf, self.opcode().as_u16());
        write_u16(&mut buf, self.blk);

        buf
    }
}

impl Deserializable for AckPacket {
    fn deserialize(buf: &[u8]) -> Result<Self, TFTPParseError> {
        check_header(buf, ACK_LEN, Opcode::Acknowledgment)?;

        if buf.len() > ACK_LEN {
            return Err(TFTPParseError::TrailingBytes(buf.len() - ACK_LEN));
        }

        let blk = NetworkEndian::read_u16(&buf[BLK_NUM_OFFSET..]);
        Ok(AckPacket::new(blk))
    }
}
