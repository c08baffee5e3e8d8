use asynchronous_codec::{Decoder, Encoder};
use bytes::{Bytes, BytesMut};

use openttd_admin::protocol::{FrameCodec, OutboundFrame, ServerPacket};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn trailing_bytes_survive_repeated_decode_calls() {
    init();
    let mut codec = FrameCodec::new();
    let mut dst = BytesMut::new();
    codec
        .encode(
            OutboundFrame {
                id: 7,
                body: Bytes::from_static(b"one"),
            },
            &mut dst,
        )
        .unwrap();
    codec
        .encode(
            OutboundFrame {
                id: 8,
                body: Bytes::from_static(b"two"),
            },
            &mut dst,
        )
        .unwrap();

    let first = codec.decode(&mut dst).unwrap().unwrap();
    assert_eq!(first.id, 7);
    assert_eq!(&first.body[..], b"one");

    let second = codec.decode(&mut dst).unwrap().unwrap();
    assert_eq!(second.id, 8);
    assert_eq!(&second.body[..], b"two");

    assert!(dst.is_empty());
}

#[test]
fn oversized_frame_is_rejected_on_encode() {
    init();
    let mut codec = FrameCodec::new();
    let mut dst = BytesMut::new();
    let huge_body = Bytes::from(vec![0u8; 2000]);
    let err = codec
        .encode(
            OutboundFrame {
                id: 1,
                body: huge_body,
            },
            &mut dst,
        )
        .unwrap_err();
    assert!(err.to_string().contains("declares length"));
    assert!(dst.is_empty());
}

#[test]
fn full_welcome_s1_scenario() {
    init();
    let literal: &[u8] = b"\x31\x00\x68Unnamed Server\x001.9.0\x00\x00Random Map\x00\xca\r1k\x00\x1f\xde\n\x00\x00\x01\x00\x01";
    let mut codec = FrameCodec::new();
    let mut buf = BytesMut::from(literal);
    let frame = codec.decode(&mut buf).unwrap().unwrap();
    let packet = ServerPacket::decode(frame.id, frame.body).unwrap();
    match packet {
        ServerPacket::Welcome { name, seed, map_x, map_y, .. } => {
            assert_eq!(name, "Unnamed Server");
            assert_eq!(seed, 0x6b310dca);
            assert_eq!((map_x, map_y), (256, 256));
        }
        other => panic!("unexpected packet: {other:?}"),
    }
}
