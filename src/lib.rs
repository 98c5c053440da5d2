//! TFTP (RFC 1350) packet codec.
//!
//! Every datagram is one of five packets. [`parse_udp_packet`] classifies a
//! received buffer by its opcode and decodes it into a [`TFTPPacket`];
//! [`TFTPPacket::serialize`] produces the bytes to send back.
//!
//! ```
//! use tftpeer::{parse_udp_packet, AckPacket, TFTPPacket};
//!
//! let ack = TFTPPacket::from(AckPacket::new(7));
//! let bytes = ack.serialize();
//! assert_eq!(bytes, vec![0, 4, 0, 7]);
//! assert_eq!(parse_udp_packet(&bytes), Ok(ack));
//! ```

pub mod logging;
pub mod tftp;

pub use crate::tftp::shared::ack_packet::AckPacket;
pub use crate::tftp::shared::data_packet::DataPacket;
pub use crate::tftp::shared::err_packet::{ErrorCode, ErrorPacket};
pub use crate::tftp::shared::request_packet::{
    ReadRequestPacket, Request, TransferMode, WriteRequestPacket,
};
pub use crate::tftp::shared::{
    parse_udp_packet, Deserializable, Malformation, Opcode, Serializable, TFTPPacket,
    TFTPParseError, STRIDE_SIZE,
};
pub use crate::tftp::transport::PacketSocket;
