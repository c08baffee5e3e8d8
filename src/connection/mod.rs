//! The connection state machine: handshake, authentication, the transition
//! to encrypted mode, steady-state dispatch, and teardown.

pub mod dispatch;

use asynchronous_codec::Framed;
use futures::channel::mpsc;
use futures::{SinkExt, StreamExt};
use rand::RngCore;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::crypto::{derive_keys, DirectionalStream, KeyPair, NONCE_LEN};
use crate::error::{AdminError, AdminResult, DisconnectCause};
use crate::mirror::StateMirror;
use crate::observation::Observation;
use crate::ping::PingTable;
use crate::protocol::types::{AuthMethod, AuthMethodMask, ChatAction, DestType, FrequencyMask, UpdateType};
use crate::protocol::{AdminPacket, FrameCodec, OutboundFrame, ServerPacket};
use crate::transport::Transport;

use self::dispatch::{Dispatcher, RawHandler};

/// Size of the bounded channel observations are delivered over.
const OBSERVATION_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Authenticating,
    Active,
    Disconnecting,
}

/// A live administrator connection to one OpenTTD server.
pub struct Connection<T: Transport> {
    framed: Framed<T, FrameCodec>,
    state: ConnectionState,
    config: ClientConfig,
    mirror: StateMirror,
    ping: PingTable,
    dispatcher: Dispatcher,
    observations: mpsc::Sender<Observation>,
    keypair: Option<KeyPair>,
    pending_keys: Option<crate::crypto::DerivedKeys>,
}

impl<T: Transport> Connection<T> {
    /// Wraps an already-connected transport. Does not perform the handshake;
    /// call [`Connection::run`] to drive it.
    pub fn new(transport: T, config: ClientConfig) -> (Connection<T>, mpsc::Receiver<Observation>) {
        let (tx, rx) = mpsc::channel(OBSERVATION_CHANNEL_CAPACITY);
        let connection = Connection {
            framed: Framed::new(transport, FrameCodec::new()),
            state: ConnectionState::Connecting,
            config,
            mirror: StateMirror::new(),
            ping: PingTable::new(),
            dispatcher: Dispatcher::new(),
            observations: tx,
            keypair: None,
            pending_keys: None,
        };
        (connection, rx)
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn mirror(&self) -> &StateMirror {
        &self.mirror
    }

    pub fn set_raw_handler(&mut self, handler: RawHandler) {
        self.dispatcher.set_raw_handler(handler);
    }

    /// Sends the initial join packet and then processes inbound frames until
    /// the connection tears down.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> AdminResult<()> {
        self.state = ConnectionState::Authenticating;
        self.begin_join().await?;
        self.emit(Observation::Connected).await;

        loop {
            match self.framed.next().await {
                Some(Ok(frame)) => {
                    let packet = match ServerPacket::decode(frame.id, frame.body) {
                        Ok(packet) => packet,
                        Err(err) => {
                            warn!(error = %err, "dropping malformed frame");
                            continue;
                        }
                    };
                    self.handle_packet(packet).await?;
                    if self.state == ConnectionState::Disconnecting {
                        break;
                    }
                }
                Some(Err(err)) => {
                    self.teardown(DisconnectCause::ProtocolError(err.to_string()))
                        .await;
                    return Err(err);
                }
                None => {
                    self.teardown(DisconnectCause::ConnectionLost).await;
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    async fn begin_join(&mut self) -> AdminResult<()> {
        if self.config.use_insecure_join {
            self.send(AdminPacket::Join {
                password: self.config.password.clone().unwrap_or_default(),
                name: self.config.name.clone(),
                version: self.config.version.clone(),
            })
            .await
        } else {
            if self.config.secret_key.is_none() {
                self.keypair = Some(KeyPair::generate());
            }
            let methods: AuthMethodMask = if self.config.secret_key.is_some() {
                AuthMethod::X25519AuthorizedKey.into()
            } else {
                AuthMethod::X25519Pake.into()
            };
            self.send(AdminPacket::JoinSecure {
                name: self.config.name.clone(),
                version: self.config.version.clone(),
                methods,
            })
            .await
        }
    }

    async fn handle_packet(&mut self, packet: ServerPacket) -> AdminResult<()> {
        match &packet {
            ServerPacket::AuthRequest {
                method,
                server_public_key,
                key_exchange_nonce,
            } => {
                self.handle_auth_request(*method, server_public_key, key_exchange_nonce)
                    .await?;
                return Ok(());
            }
            ServerPacket::EnableEncryption { encryption_nonce } => {
                self.handle_enable_encryption(encryption_nonce);
                return Ok(());
            }
            ServerPacket::Error { code } => {
                self.teardown(DisconnectCause::Rejected(*code)).await;
                return Ok(());
            }
            ServerPacket::Welcome { .. } => {
                self.state = ConnectionState::Active;
                self.emit(Observation::Authenticated).await;
                let observations = self.dispatcher.dispatch(&packet, &mut self.mirror);
                for obs in observations {
                    self.emit(obs).await;
                }
                self.subscribe_defaults().await?;
                return Ok(());
            }
            ServerPacket::Pong { payload } => {
                if let Some(sent_at) = self.ping.resolve(*payload) {
                    let received_at = std::time::Instant::now();
                    self.emit(Observation::Pong {
                        payload: *payload,
                        sent_at,
                        received_at,
                        elapsed: received_at - sent_at,
                    })
                    .await;
                } else {
                    warn!(payload, "dropping unmatched or duplicate pong");
                }
                return Ok(());
            }
            ServerPacket::Shutdown | ServerPacket::NewGame => {
                self.mirror = StateMirror::new();
            }
            _ => {}
        }

        let observations = self.dispatcher.dispatch(&packet, &mut self.mirror);
        for obs in observations {
            self.emit(obs).await;
        }
        Ok(())
    }

    async fn handle_auth_request(
        &mut self,
        method: AuthMethod,
        server_public_key: &[u8; 32],
        key_exchange_nonce: &[u8; NONCE_LEN],
    ) -> AdminResult<()> {
        let advertised: AuthMethodMask = if self.config.secret_key.is_some() {
            AuthMethod::X25519AuthorizedKey.into()
        } else {
            AuthMethod::X25519Pake.into()
        };
        if !advertised.contains(method) {
            return Err(AdminError::UnexpectedAuthMethod(method as u8));
        }

        let keypair = match self.config.secret_key {
            Some(secret) => KeyPair::from_secret_bytes(secret),
            None => self.keypair.take().unwrap_or_else(KeyPair::generate),
        };
        let our_public = keypair.public_bytes();
        let shared_secret = keypair.diffie_hellman(server_public_key);

        let payload: &[u8] = match method {
            AuthMethod::X25519Pake => self
                .config
                .password
                .as_deref()
                .unwrap_or_default()
                .as_bytes(),
            AuthMethod::X25519AuthorizedKey => &[],
        };
        let derived = derive_keys(shared_secret, server_public_key, &our_public, payload);

        let mut send_stream = DirectionalStream::new(derived.send_key, *key_exchange_nonce);
        let mut message = [0u8; 8];
        rand::rngs::OsRng.fill_bytes(&mut message);
        let mut message = message.to_vec();
        let mac = send_stream.seal(&our_public, &mut message)?;

        self.pending_keys = Some(derived);
        self.send(AdminPacket::AuthResponse {
            public_key: our_public,
            ciphertext: message,
            mac,
        })
        .await
    }

    fn handle_enable_encryption(&mut self, encryption_nonce: &[u8; NONCE_LEN]) {
        if let Some(derived) = self.pending_keys.take() {
            let send = DirectionalStream::new(derived.send_key, *encryption_nonce);
            let receive = DirectionalStream::new(derived.receive_key, *encryption_nonce);
            self.framed.codec_mut().enable_encryption(send, receive);
        } else {
            warn!("ServerEnableEncryption received without a prior handshake");
        }
    }

    async fn subscribe_defaults(&mut self) -> AdminResult<()> {
        let update_types = self.config.update_types.clone();
        for (update_type, frequency) in update_types {
            let without_poll = frequency - crate::protocol::types::Frequency::Poll;
            self.send(AdminPacket::UpdateFrequency {
                update_type,
                frequency: without_poll,
            })
            .await?;
            if frequency.contains(crate::protocol::types::Frequency::Poll) {
                self.send(AdminPacket::Poll {
                    update_type,
                    extra: 0xFFFF_FFFF,
                })
                .await?;
            }
        }
        Ok(())
    }

    async fn send(&mut self, packet: AdminPacket) -> AdminResult<()> {
        debug!(id = packet.id(), "sending admin packet");
        self.framed
            .send(OutboundFrame {
                id: packet.id(),
                body: packet.encode_body()?,
            })
            .await
    }

    async fn emit(&mut self, observation: Observation) {
        if self.observations.send(observation).await.is_err() {
            debug!("observation receiver dropped");
        }
    }

    async fn teardown(&mut self, cause: DisconnectCause) {
        self.state = ConnectionState::Disconnected;
        self.ping.reset();
        self.emit(Observation::Disconnected(cause)).await;
    }

    /// Issues a chat message.
    pub async fn send_chat(
        &mut self,
        action: ChatAction,
        dest_type: DestType,
        client_id: u32,
        message: impl Into<String>,
    ) -> AdminResult<()> {
        self.send(AdminPacket::Chat {
            action,
            dest_type,
            client_id,
            message: message.into(),
        })
        .await
    }

    /// Issues a remote-console command.
    pub async fn send_rcon(&mut self, command: impl Into<String>) -> AdminResult<()> {
        self.send(AdminPacket::Rcon {
            command: command.into(),
        })
        .await
    }

    /// Forwards a JSON message to the game script.
    pub async fn send_gamescript(&mut self, json: impl Into<String>) -> AdminResult<()> {
        self.send(AdminPacket::Gamescript { json: json.into() })
            .await
    }

    /// Sends a ping, returning the payload to correlate against the matching `Pong`.
    pub async fn ping(&mut self) -> AdminResult<u32> {
        let payload = self.ping.next();
        self.send(AdminPacket::Ping { payload }).await?;
        Ok(payload)
    }

    /// Requests an immediate snapshot for one update type.
    pub async fn poll(&mut self, update_type: UpdateType, extra: u32) -> AdminResult<()> {
        self.send(AdminPacket::Poll { update_type, extra }).await
    }

    /// Changes the subscription frequency for one update type.
    pub async fn subscribe(
        &mut self,
        update_type: UpdateType,
        frequency: FrequencyMask,
    ) -> AdminResult<()> {
        self.send(AdminPacket::UpdateFrequency {
            update_type,
            frequency,
        })
        .await
    }

    /// Gracefully disconnects: sends `AdminQuit`, then tears down.
    pub async fn disconnect(&mut self) -> AdminResult<()> {
        self.state = ConnectionState::Disconnecting;
        self.send(AdminPacket::Quit).await?;
        self.teardown(DisconnectCause::Requested).await;
        Ok(())
    }

    /// Immediately tears down without notifying the server.
    pub async fn force_disconnect(&mut self) {
        self.teardown(DisconnectCause::Forced).await;
    }
}
