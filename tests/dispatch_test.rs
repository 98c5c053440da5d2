use tftpeer::{
    parse_udp_packet, AckPacket, DataPacket, ErrorCode, ErrorPacket, Malformation, Opcode,
    ReadRequestPacket, Request, TFTPPacket, TFTPParseError, TransferMode, WriteRequestPacket,
};

fn sample_packets() -> Vec<TFTPPacket> {
    vec![
        ReadRequestPacket::new("pxelinux.0", TransferMode::Octet)
            .unwrap()
            .into(),
        WriteRequestPacket::new("upload.txt", TransferMode::NetAscii)
            .unwrap()
            .into(),
        DataPacket::new(1, vec![7; 512]).unwrap().into(),
        AckPacket::new(65535).into(),
        ErrorPacket::new(ErrorCode::FileNotFound, "missing")
            .unwrap()
            .into(),
    ]
}

#[test]
fn every_opcode_dispatches() {
    let expected = [
        Opcode::ReadRequest,
        Opcode::WriteRequest,
        Opcode::Data,
        Opcode::Acknowledgment,
        Opcode::Error,
    ];

    for (packet, op) in sample_packets().into_iter().zip(expected.iter()) {
        let bytes = packet.serialize();
        assert_eq!(u16::from(bytes[1]), op.as_u16());

        let decoded = parse_udp_packet(&bytes).unwrap();
        assert_eq!(decoded.opcode(), *op);
        assert_eq!(decoded, packet);
    }
}

#[test]
fn unknown_opcodes_are_rejected() {
    for raw in [0u16, 6, 65535].iter() {
        let mut bytes = raw.to_be_bytes().to_vec();
        bytes.extend_from_slice(b"a.txt\0octet\0");
        assert_eq!(
            parse_udp_packet(&bytes),
            Err(TFTPParseError::UnknownOpcode(*raw))
        );
    }
}

#[test]
fn truncation_below_minimum() {
    let minimums = [4usize, 4, 4, 4, 5];

    for (packet, min) in sample_packets().iter().zip(minimums.iter()) {
        let bytes = packet.serialize();
        for len in 2..*min {
            match parse_udp_packet(&bytes[..len]) {
                Err(TFTPParseError::Truncated { needed, actual }) => {
                    assert_eq!(needed, *min);
                    assert_eq!(actual, len);
                }
                other => panic!("{} truncated to {}: {:?}", packet, len, other),
            }
        }
    }
}

#[test]
fn request_terminator_is_required() {
    let mut bytes = vec![0x00, 0x01, b'a', b'b', b'c', 0x00, b'o', b'c', b't', b'e', b't'];
    assert!(matches!(
        parse_udp_packet(&bytes),
        Err(TFTPParseError::Malformed(Malformation::Unterminated(_)))
    ));

    bytes.push(0x00);
    match parse_udp_packet(&bytes).unwrap() {
        TFTPPacket::RRQ(p) => {
            assert_eq!(p.filename(), "abc");
            assert_eq!(p.mode(), TransferMode::Octet);
        }
        other => panic!("expected RRQ, got {}", other),
    }
}

#[test]
fn data_block_length_signals_end() {
    let mut full = vec![0x00, 0x03, 0x00, 0x01];
    full.extend_from_slice(&[0xEE; 512]);
    let empty = vec![0x00, 0x03, 0x00, 0x02];

    match (parse_udp_packet(&full), parse_udp_packet(&empty)) {
        (Ok(TFTPPacket::DATA(a)), Ok(TFTPPacket::DATA(b))) => {
            assert!(!a.is_final());
            assert!(b.is_final());
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn unknown_error_code_is_surfaced() {
    let bytes = vec![0x00, 0x05, 0x00, 0xFF, b'?', 0x00];
    match parse_udp_packet(&bytes).unwrap() {
        TFTPPacket::ERR(p) => {
            assert_eq!(p.code(), ErrorCode::Unrecognized(0xFF));
            assert_eq!(p.err(), "?");
        }
        other => panic!("expected ERR, got {}", other),
    }
}

#[test]
fn decoding_is_thread_safe() {
    let handles: Vec<_> = sample_packets()
        .into_iter()
        .map(|packet| {
            std::thread::spawn(move || {
                let bytes = packet.serialize();
                assert_eq!(parse_udp_packet(&bytes).unwrap(), packet);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
