//! Key provisioning.
//!
//! On startup the service loads-or-generates its key material and caches it
//! for the process lifetime:
//!
//! - a 32-byte symmetric master key, stored raw in its own file;
//! - an X25519 record key pair, with the public key stored raw and the
//!   secret key stored wrapped under the master key.
//!
//! Provisioning against existing files always yields the same key pair, so
//! previously written records stay readable across restarts.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::KeyConfig;
use crate::crypto::{MasterKey, RecordCipher};
use crate::error::Error;

/// The provisioned, in-memory key material.
pub struct KeyStore {
    master: MasterKey,
    cipher: RecordCipher,
}

impl KeyStore {
    /// Loads the keys named by `config`, generating any that are missing.
    pub fn provision(config: &KeyConfig) -> Result<Self, Error> {
        let master = provision_master_key(&config.master_key_path)?;
        let cipher = provision_record_keys(config, &master)?;
        Ok(KeyStore { master, cipher })
    }

    /// The record cipher used to seal and open stored payloads.
    pub fn cipher(&self) -> &RecordCipher {
        &self.cipher
    }

    /// The cached symmetric master key.
    pub fn master(&self) -> &MasterKey {
        &self.master
    }
}

fn provision_master_key(path: &Path) -> Result<MasterKey, Error> {
    if path.exists() {
        let bytes: [u8; 32] = fs::read(path)?
            .try_into()
            .map_err(|_| Error::Crypto(format!("master key file {} is malformed", path.display())))?;
        Ok(MasterKey::from_bytes(bytes))
    } else {
        let key = MasterKey::generate();
        fs::write(path, key.as_bytes())?;
        info!(path = %path.display(), "generated master key");
        Ok(key)
    }
}

fn provision_record_keys(config: &KeyConfig, master: &MasterKey) -> Result<RecordCipher, Error> {
    if config.secret_key_path.exists() {
        let wrapped = fs::read(&config.secret_key_path)?;
        let bytes: [u8; 32] = master.decrypt(&wrapped)?.try_into().map_err(|_| {
            Error::Crypto(format!(
                "secret key file {} is malformed",
                config.secret_key_path.display()
            ))
        })?;
        let cipher = RecordCipher::new(bytes.into());
        // Restore the public half if it went missing.
        if !config.public_key_path.exists() {
            fs::write(&config.public_key_path, cipher.public_bytes())?;
        }
        Ok(cipher)
    } else {
        let cipher = RecordCipher::generate();
        fs::write(
            &config.secret_key_path,
            master.encrypt(&cipher.secret_bytes())?,
        )?;
        fs::write(&config.public_key_path, cipher.public_bytes())?;
        info!(
            public = %config.public_key_path.display(),
            "generated record key pair"
        );
        Ok(cipher)
    }
}
