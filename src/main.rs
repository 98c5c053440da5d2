use anyhow::{Context, Result};
use async_std::task;
use clap::{Args, Parser, Subcommand};
use pretty_bytes::converter::convert;
use tracing::info;

use tftpeer::logging::init_tracing;
use tftpeer::{
    parse_udp_packet, AckPacket, DataPacket, ErrorCode, ErrorPacket, PacketSocket,
    ReadRequestPacket, TFTPPacket, TransferMode, WriteRequestPacket,
};

/// Inspect, build and sniff TFTP packets.
#[derive(Parser, Debug)]
#[command(version, author = "shakram02")]
struct Opts {
    #[command(subcommand)]
    subcmd: SubCommand,
}

#[derive(Subcommand, Debug)]
enum SubCommand {
    /// decode a hex encoded datagram and print it.
    Decode {
        /// datagram bytes as hex, spaces and colons are ignored.
        hex: String,
    },
    /// build a packet and print its hex encoding.
    #[command(subcommand)]
    Encode(EncodeCommand),
    /// log every datagram arriving on a UDP port.
    Listen(ListenArgs),
}

#[derive(Subcommand, Debug)]
enum EncodeCommand {
    /// read request.
    Rrq {
        filename: String,
        #[arg(short, long, default_value = "octet")]
        mode: TransferMode,
    },
    /// write request.
    Wrq {
        filename: String,
        #[arg(short, long, default_value = "octet")]
        mode: TransferMode,
    },
    /// data block, the payload is taken as text.
    Data { blk: u16, payload: String },
    /// acknowledgment.
    Ack { blk: u16 },
    /// error, the RFC text is used when no message is given.
    Error { code: u16, message: Option<String> },
}

#[derive(Args, Debug)]
struct ListenArgs {
    /// IP to listen on.
    #[arg(short, long, default_value = "127.0.0.1")]
    address: String,
    /// UDP port to listen on.
    #[arg(short, long, default_value_t = 69)]
    port: u16,
}

fn main() -> Result<()> {
    init_tracing();

    let opts = Opts::parse();
    match opts.subcmd {
        SubCommand::Decode { hex } => decode(&hex),
        SubCommand::Encode(cmd) => encode(cmd),
        SubCommand::Listen(args) => task::block_on(listen(args)),
    }
}

fn decode(text: &str) -> Result<()> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    let buf = hex::decode(&cleaned).context("datagram is not valid hex")?;
    let packet = parse_udp_packet(&buf).context("failed to decode datagram")?;

    println!("{} ({})", packet, convert(buf.len() as f64));
    Ok(())
}

fn encode(cmd: EncodeCommand) -> Result<()> {
    let packet: TFTPPacket = match cmd {
        EncodeCommand::Rrq { filename, mode } => ReadRequestPacket::new(&filename, mode)?.into(),
        EncodeCommand::Wrq { filename, mode } => WriteRequestPacket::new(&filename, mode)?.into(),
        EncodeCommand::Data { blk, payload } => DataPacket::new(blk, payload.into_bytes())?.into(),
        EncodeCommand::Ack { blk } => AckPacket::new(blk).into(),
        EncodeCommand::Error { code, message } => {
            let code = ErrorCode::from_u16(code);
            match message {
                Some(msg) => ErrorPacket::new(code, &msg)?.into(),
                None => ErrorPacket::from_code(code).into(),
            }
        }
    };

    println!("{}", hex::encode(packet.serialize()));
    Ok(())
}

async fn listen(args: ListenArgs) -> Result<()> {
    let addr = format!("{}:{}", args.address, args.port);
    let sock = PacketSocket::bind(addr.as_str())
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let local = sock.local_addr()?;
    info!(addr = %local, "listening");

    loop {
        let (packet, from) = sock.recv_from().await.context("receive failed")?;
        match packet {
            Ok(TFTPPacket::DATA(dp)) => info!(
                %from,
                blk = dp.blk(),
                size = %convert(dp.len() as f64),
                last = dp.is_final(),
                "DATA"
            ),
            Ok(p) => info!(%from, packet = %p, "received"),
            Err(e) => info!(%from, error = %e, "rejected"),
        }
    }
}
