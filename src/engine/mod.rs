mod booking_api;
mod helpers;
mod vehicle_api;

use std::sync::Arc;

use crate::{api::API, store::Store};

/// Owns the store handle every request operates on.
pub struct Engine {
    store: Arc<dyn Store>,
}

impl Engine {
    pub fn new<S: Store + 'static>(store: S) -> Self {
        Self::with_store(Arc::new(store))
    }

    pub fn with_store(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl API for Engine {}
