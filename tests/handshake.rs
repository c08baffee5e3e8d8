use bytes::BytesMut;
use futures::{SinkExt, StreamExt};
use tokio_util::compat::TokioAsyncReadCompatExt;

use openttd_admin::config::ClientConfig;
use openttd_admin::connection::Connection;
use openttd_admin::crypto::{aead_open, derive_keys, random_nonce, KeyPair};
use openttd_admin::observation::Observation;
use openttd_admin::protocol::registry::{admin_id, server_id};
use openttd_admin::protocol::util::{write_bool, write_str, write_u16, write_u32, write_u8};
use openttd_admin::protocol::{FrameCodec, OutboundFrame};

#[tokio::test]
async fn insecure_join_reaches_active_state() {
    let (client_raw, server_raw) = tokio::io::duplex(8192);
    let client_io = client_raw.compat();
    let server_io = server_raw.compat();

    let config = ClientConfig::new("test-host")
        .password("pw")
        .name("admintest")
        .version("1.0.0");

    let (mut connection, mut rx) = Connection::new(client_io, config);
    let handle = tokio::spawn(async move {
        let _ = connection.run().await;
    });

    let mut server = asynchronous_codec::Framed::new(server_io, FrameCodec::new());

    let join = server.next().await.unwrap().unwrap();
    assert_eq!(join.id, admin_id::JOIN);

    let mut body = BytesMut::new();
    write_str(&mut body, "name", "Test Server", 80).unwrap();
    write_str(&mut body, "version", "1.9.0", 80).unwrap();
    write_bool(&mut body, true);
    write_str(&mut body, "map_name", "Flat Land", 80).unwrap();
    write_u32(&mut body, 1);
    write_u8(&mut body, 0);
    write_u32(&mut body, 714_271);
    write_u16(&mut body, 256);
    write_u16(&mut body, 256);

    server
        .send(OutboundFrame {
            id: server_id::WELCOME,
            body: body.freeze(),
        })
        .await
        .unwrap();

    let mut saw = (false, false, false);
    for _ in 0..3 {
        match rx.next().await {
            Some(Observation::Connected) => saw.0 = true,
            Some(Observation::Authenticated) => saw.1 = true,
            Some(Observation::NewMap { .. }) => saw.2 = true,
            other => panic!("unexpected observation: {other:?}"),
        }
    }
    assert_eq!(saw, (true, true, true));

    handle.abort();
}

/// Exercises the S6 secure-handshake scenario: the client must compute a
/// shared secret, derive keys, and produce an `AdminAuthResponse` whose
/// ciphertext/MAC the server can actually verify and decrypt.
#[tokio::test]
async fn secure_handshake_produces_verifiable_auth_response() {
    let (client_raw, server_raw) = tokio::io::duplex(8192);
    let client_io = client_raw.compat();
    let server_io = server_raw.compat();

    let config = ClientConfig::new("test-host")
        .password("pw")
        .use_insecure_join(false)
        .name("admintest")
        .version("1.0.0");

    let (mut connection, _rx) = Connection::new(client_io, config);
    let handle = tokio::spawn(async move {
        let _ = connection.run().await;
    });

    let mut server = asynchronous_codec::Framed::new(server_io, FrameCodec::new());

    let join_secure = server.next().await.unwrap().unwrap();
    assert_eq!(join_secure.id, admin_id::JOIN_SECURE);

    let server_keys = KeyPair::generate();
    let key_exchange_nonce = random_nonce();

    let mut auth_request_body = BytesMut::new();
    write_u8(&mut auth_request_body, 0x01); // X25519_PAKE
    auth_request_body.extend_from_slice(&server_keys.public_bytes());
    auth_request_body.extend_from_slice(&key_exchange_nonce);

    server
        .send(OutboundFrame {
            id: server_id::AUTH_REQUEST,
            body: auth_request_body.freeze(),
        })
        .await
        .unwrap();

    let response = server.next().await.unwrap().unwrap();
    assert_eq!(response.id, admin_id::AUTH_RESPONSE);
    assert_eq!(response.body.len(), 32 + 8 + 16);

    let client_public: [u8; 32] = response.body[0..32].try_into().unwrap();
    let ciphertext = &response.body[32..40];
    let mac: [u8; 16] = response.body[40..56].try_into().unwrap();

    let shared = server_keys.diffie_hellman(&client_public);
    let derived = derive_keys(shared, &server_keys.public_bytes(), &client_public, b"pw");

    let mut plaintext = ciphertext.to_vec();
    aead_open(
        &derived.receive_key,
        &key_exchange_nonce,
        &client_public,
        &mut plaintext,
        &mac,
    )
    .expect("server must be able to decrypt the client's AEAD-locked handshake message");
    assert_eq!(plaintext.len(), 8);

    handle.abort();
}
