//! The HTTP surface: route definitions, request handlers, and the shared
//! application state they close over.

pub mod handlers;
pub mod routes;

use std::sync::Arc;

use crate::keystore::KeyStore;
use crate::store::MeasurementStore;

/// State shared by every handler: the provisioned keys and the record store.
#[derive(Clone)]
pub struct AppState {
    pub keys: Arc<KeyStore>,
    pub store: Arc<MeasurementStore>,
}

impl AppState {
    pub fn new(keys: KeyStore, store: MeasurementStore) -> Self {
        AppState {
            keys: Arc::new(keys),
            store: Arc::new(store),
        }
    }
}
