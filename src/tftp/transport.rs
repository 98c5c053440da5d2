//! Thin async UDP adapter that moves typed packets in and out of datagrams.
//! Retries, timeouts and transfer IDs are left to the caller.

use std::io;
use std::net::SocketAddr;

use async_std::net::{ToSocketAddrs, UdpSocket};
use tracing::{debug, warn};

use crate::tftp::shared::{parse_udp_packet, TFTPPacket, TFTPParseError};

/// Receive buffer size. Larger than any legal packet so an oversized DATA
/// payload is reported as malformed instead of being silently cut.
const RECV_BUF_LEN: usize = 1024;

pub struct PacketSocket {
    sock: UdpSocket,
}

impl PacketSocket {
    pub async fn bind<A: ToSocketAddrs>(addr: A) -> io::Result<Self> {
        let sock = UdpSocket::bind(addr).await?;
        let local = sock.local_addr()?;
        debug!(addr = %local, "bound packet socket");
        Ok(PacketSocket { sock })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.sock.local_addr()
    }

    /// Sends `packet` as a single datagram.
    pub async fn send_to(&self, packet: &TFTPPacket, addr: SocketAddr) -> io::Result<usize> {
        let buf = packet.serialize();
        let sent = self.sock.send_to(&buf, addr).await?;
        debug!(%addr, %packet, bytes = sent, "sent");
        Ok(sent)
    }

    /// Waits for the next datagram and decodes it. A datagram that fails to
    /// decode is still returned together with its sender, so the caller can
    /// answer with an ERROR packet.
    pub async fn recv_from(
        &self,
    ) -> io::Result<(Result<TFTPPacket, TFTPParseError>, SocketAddr)> {
        let mut buf = [0; RECV_BUF_LEN];
        let (count, addr) = self.sock.recv_from(&mut buf).await?;

        let packet = parse_udp_packet(&buf[..count]);
        match &packet {
            Ok(p) => debug!(%addr, packet = %p, bytes = count, "received"),
            Err(e) => warn!(%addr, error = %e, bytes = count, "undecodable datagram"),
        }

        Ok((packet, addr))
    }
}
