use std::sync::{Arc, Mutex};

use crate::dedup::DuplicateSuppressor;
use crate::error::{AtelierError, AtelierResult};
use crate::mailer::Mailer;
use crate::sheets::SheetStore;

/// Shared application state. The sheet store and mailer are optional
/// collaborators injected at construction; handlers that need the store go
/// through [`AppState::store`] and surface a typed error when it is absent.
#[derive(Clone)]
pub struct AppState {
    pub store: Option<Arc<dyn SheetStore>>,
    pub mailer: Option<Arc<Mailer>>,
    pub dedup: Arc<Mutex<DuplicateSuppressor>>,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn SheetStore>>, mailer: Option<Arc<Mailer>>) -> Self {
        Self {
            store,
            mailer,
            dedup: Arc::new(Mutex::new(DuplicateSuppressor::new())),
        }
    }

    pub fn store(&self) -> AtelierResult<&dyn SheetStore> {
        self.store
            .as_deref()
            .ok_or(AtelierError::StoreUnavailable)
    }
}
