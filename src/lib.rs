//! Measurement decoder service.
//!
//! The core is a pure, total decoder that turns a measurement string into a
//! sequence of package totals ([`decode`]). Around it sit the collaborators:
//! a warp HTTP API, an append-only encrypted record log, hybrid at-rest
//! encryption, and startup key provisioning.

pub mod alphabet;
pub mod api;
pub mod config;
mod crypto;
mod decoder;
mod error;
mod keystore;
pub mod logging;
mod store;

pub use alphabet::Alphabet;
pub use config::Settings;
pub use crypto::{MasterKey, RecordCipher, SealedBox};
pub use decoder::{decode, decode_with};
pub use error::{Error, ErrorResponse};
pub use keystore::KeyStore;
pub use store::{DecryptedRecord, MeasurementStore, StoredRecord};
