//! X25519 key exchange and the per-direction authenticated stream cipher used
//! once `ServerEnableEncryption` has been processed.
//!
//! Key material is derived with BLAKE2b and bulk frames are sealed with
//! XChaCha20-Poly1305 in "detached" mode: the ciphertext is always the same
//! length as the plaintext and the 16-byte authentication tag travels
//! alongside it, never interleaved. This is what lets `AdminAuthResponse`'s
//! ciphertext stay exactly as long as its plaintext (8 bytes, see the secure
//! handshake scenario) and is the same scheme the bulk stream reuses per
//! frame.

use blake2::digest::consts::U64;
use blake2::{Blake2b, Digest};
use chacha20poly1305::aead::{AeadInPlace, KeyInit};
use chacha20poly1305::{Key, Tag, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::error::{AdminError, AdminResult};

pub const PUBLIC_KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 24;
pub const MAC_LEN: usize = 16;

type Blake2b512 = Blake2b<U64>;

/// Our half of the X25519 identity used for one connection attempt.
pub struct KeyPair {
    secret: StaticSecret,
    public: PublicKey,
}

impl KeyPair {
    /// Generates a fresh key pair from a cryptographic RNG.
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        KeyPair { secret, public }
    }

    /// Restores a key pair from a long-lived authorized-key secret.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        let secret = StaticSecret::from(bytes);
        let public = PublicKey::from(&secret);
        KeyPair { secret, public }
    }

    pub fn public_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.public.to_bytes()
    }

    /// Computes `X25519(our_secret, their_public)`, the raw shared point.
    pub fn diffie_hellman(&self, their_public: &[u8; PUBLIC_KEY_LEN]) -> [u8; 32] {
        let their_public = PublicKey::from(*their_public);
        let mut shared = self.secret.diffie_hellman(&their_public).to_bytes();
        let out = shared;
        shared.zeroize();
        out
    }
}

/// The two 32-byte keys derived from a completed handshake: one per
/// direction of traffic.
pub struct DerivedKeys {
    pub send_key: [u8; 32],
    pub receive_key: [u8; 32],
}

/// Derives `send_key || receive_key` via BLAKE2b-512 of
/// `k || server_public || our_public || payload`, then wipes `k`.
pub fn derive_keys(
    mut shared_secret: [u8; 32],
    server_public: &[u8; PUBLIC_KEY_LEN],
    our_public: &[u8; PUBLIC_KEY_LEN],
    payload: &[u8],
) -> DerivedKeys {
    let mut hasher = Blake2b512::new();
    hasher.update(shared_secret);
    hasher.update(server_public);
    hasher.update(our_public);
    hasher.update(payload);
    let digest = hasher.finalize();
    shared_secret.zeroize();

    let mut send_key = [0u8; 32];
    let mut receive_key = [0u8; 32];
    send_key.copy_from_slice(&digest[..32]);
    receive_key.copy_from_slice(&digest[32..]);
    DerivedKeys {
        send_key,
        receive_key,
    }
}

/// `AEAD-Lock`: seals `plaintext` in place under `key`/`nonce` with
/// `associated` bound in, returning the detached 16-byte MAC. The ciphertext
/// is always the same length as the plaintext it replaces.
pub fn aead_seal(
    key: &[u8; 32],
    nonce: &[u8; NONCE_LEN],
    associated: &[u8],
    plaintext: &mut [u8],
) -> AdminResult<[u8; MAC_LEN]> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
    let tag = cipher
        .encrypt_in_place_detached(XNonce::from_slice(nonce), associated, plaintext)
        .map_err(|_| AdminError::CryptoFailure)?;
    let mut out = [0u8; MAC_LEN];
    out.copy_from_slice(&tag);
    Ok(out)
}

/// Opens `ciphertext` in place against the detached `tag`, returning an error
/// if the MAC does not verify.
pub fn aead_open(
    key: &[u8; 32],
    nonce: &[u8; NONCE_LEN],
    associated: &[u8],
    ciphertext: &mut [u8],
    tag: &[u8; MAC_LEN],
) -> AdminResult<()> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .decrypt_in_place_detached(
            XNonce::from_slice(nonce),
            associated,
            ciphertext,
            Tag::from_slice(tag),
        )
        .map_err(|_| AdminError::CryptoFailure)
}

/// One direction (send-only or receive-only) of the bulk-encryption stream
/// established after `ServerEnableEncryption`. Not safe for concurrent use —
/// the connection serialises all reads through one instance and all writes
/// through another.
pub struct DirectionalStream {
    key: [u8; 32],
    base_nonce: [u8; NONCE_LEN],
    counter: u64,
}

impl DirectionalStream {
    pub fn new(key: [u8; 32], base_nonce: [u8; NONCE_LEN]) -> Self {
        DirectionalStream {
            key,
            base_nonce,
            counter: 0,
        }
    }

    fn frame_nonce(&self) -> [u8; NONCE_LEN] {
        let mut nonce = self.base_nonce;
        let counter_bytes = self.counter.to_le_bytes();
        for (n, c) in nonce[NONCE_LEN - 8..].iter_mut().zip(counter_bytes.iter()) {
            *n ^= c;
        }
        nonce
    }

    /// Seals one frame body in place. `associated` is the plaintext length
    /// prefix, bound in but not encrypted.
    pub fn seal(&mut self, associated: &[u8], plaintext: &mut [u8]) -> AdminResult<[u8; MAC_LEN]> {
        let nonce = self.frame_nonce();
        let tag = aead_seal(&self.key, &nonce, associated, plaintext)?;
        self.counter = self.counter.wrapping_add(1);
        Ok(tag)
    }

    /// Opens one frame body in place.
    pub fn open(
        &mut self,
        associated: &[u8],
        ciphertext: &mut [u8],
        tag: &[u8; MAC_LEN],
    ) -> AdminResult<()> {
        let nonce = self.frame_nonce();
        aead_open(&self.key, &nonce, associated, ciphertext, tag)?;
        self.counter = self.counter.wrapping_add(1);
        Ok(())
    }
}

/// Generates a fresh random nonce, used by the server side of tests and by
/// any in-process fake server fixture.
pub fn random_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    nonce
}
