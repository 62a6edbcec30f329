//! Hybrid record encryption.
//!
//! Records are sealed to a static X25519 public key: an ephemeral key pair
//! performs Diffie-Hellman against it, HKDF-SHA256 turns the shared secret
//! into an AEAD key, and ChaCha20-Poly1305 encrypts the payload. The sealed
//! box carries the ephemeral public key, the nonce, and the ciphertext, each
//! hex-encoded when serialized.
//!
//! A separate symmetric [`MasterKey`] wraps the static secret key at rest;
//! it is provisioned once and cached by the key store.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Error;

/// X25519 public key size in bytes.
pub const ENC_SIZE: usize = 32;

/// ChaCha20-Poly1305 nonce size in bytes.
pub const NONCE_SIZE: usize = 12;

/// Domain separation for the record key derivation.
const RECORD_INFO: &[u8] = b"pack-tally record v1";

/// An encrypted record payload: ephemeral public key, nonce, ciphertext.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SealedBox {
    /// Ephemeral X25519 public key the payload was sealed with.
    #[serde(with = "hex::serde")]
    pub enc: Vec<u8>,
    /// AEAD nonce.
    #[serde(with = "hex::serde")]
    pub nonce: Vec<u8>,
    /// Ciphertext with authentication tag.
    #[serde(with = "hex::serde")]
    pub ciphertext: Vec<u8>,
}

/// The service's static record-encryption key pair.
pub struct RecordCipher {
    secret: StaticSecret,
    public: PublicKey,
}

impl RecordCipher {
    /// Wraps an existing static secret.
    pub fn new(secret: StaticSecret) -> Self {
        let public = PublicKey::from(&secret);
        RecordCipher { secret, public }
    }

    /// Generates a fresh random key pair.
    pub fn generate() -> Self {
        Self::new(StaticSecret::random_from_rng(OsRng))
    }

    /// The public half, as raw bytes.
    pub fn public_bytes(&self) -> [u8; ENC_SIZE] {
        self.public.to_bytes()
    }

    /// The secret half, as raw bytes. Handle with care.
    pub fn secret_bytes(&self) -> [u8; ENC_SIZE] {
        self.secret.to_bytes()
    }

    /// Seals `plaintext` to this cipher's public key.
    pub fn seal(&self, plaintext: &[u8]) -> Result<SealedBox, Error> {
        let ephemeral = EphemeralSecret::random_from_rng(OsRng);
        let enc = PublicKey::from(&ephemeral);
        let shared = ephemeral.diffie_hellman(&self.public);

        let key = derive_record_key(shared.as_bytes(), enc.as_bytes(), self.public.as_bytes())?;
        let cipher = ChaCha20Poly1305::new(&key);

        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| Error::Crypto("sealing record payload failed".to_string()))?;

        Ok(SealedBox {
            enc: enc.as_bytes().to_vec(),
            nonce: nonce.to_vec(),
            ciphertext,
        })
    }

    /// Opens a sealed box with the static secret key.
    pub fn open(&self, sealed: &SealedBox) -> Result<Vec<u8>, Error> {
        let enc: [u8; ENC_SIZE] = sealed
            .enc
            .as_slice()
            .try_into()
            .map_err(|_| Error::Crypto("sealed box has a malformed ephemeral key".to_string()))?;
        if sealed.nonce.len() != NONCE_SIZE {
            return Err(Error::Crypto("sealed box has a malformed nonce".to_string()));
        }

        let peer = PublicKey::from(enc);
        let shared = self.secret.diffie_hellman(&peer);

        let key = derive_record_key(shared.as_bytes(), &enc, self.public.as_bytes())?;
        let cipher = ChaCha20Poly1305::new(&key);

        cipher
            .decrypt(Nonce::from_slice(&sealed.nonce), sealed.ciphertext.as_slice())
            .map_err(|_| Error::Crypto("opening record payload failed".to_string()))
    }
}

/// HKDF-SHA256 over the DH shared secret, salted with both public keys.
fn derive_record_key(
    shared: &[u8; 32],
    enc: &[u8; ENC_SIZE],
    recipient: &[u8; ENC_SIZE],
) -> Result<Key, Error> {
    let mut salt = [0u8; ENC_SIZE * 2];
    salt[..ENC_SIZE].copy_from_slice(enc);
    salt[ENC_SIZE..].copy_from_slice(recipient);

    let hk = Hkdf::<Sha256>::new(Some(&salt), shared);
    let mut okm = [0u8; 32];
    hk.expand(RECORD_INFO, &mut okm)
        .map_err(|_| Error::Crypto("record key derivation failed".to_string()))?;
    Ok(Key::from(okm))
}

/// Symmetric key material, provisioned once and cached for the process
/// lifetime. Used to wrap the static secret key at rest.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; 32]);

impl MasterKey {
    /// Generates a fresh random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        MasterKey(bytes)
    }

    /// Rebuilds a key from its raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        MasterKey(bytes)
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Encrypts `plaintext`, returning nonce || ciphertext.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.0));
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| Error::Crypto("wrapping key material failed".to_string()))?;

        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypts data produced by [`MasterKey::encrypt`].
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        if data.len() < NONCE_SIZE {
            return Err(Error::Crypto("wrapped key material is truncated".to_string()));
        }
        let (nonce, ciphertext) = data.split_at(NONCE_SIZE);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.0));
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| Error::Crypto("unwrapping key material failed".to_string()))
    }
}
