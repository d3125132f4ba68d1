use std::sync::{Arc, Mutex};

use shared::{StoreAccess, User};
use tracing::{debug, info, warn};

use crate::storage::{KeyValueStorage, SELECTED_STORE_KEY};

#[derive(Default)]
struct ScopeState {
    available: Vec<StoreAccess>,
    selected: Option<StoreAccess>,
}

pub struct ScopeStore {
    storage: Arc<dyn KeyValueStorage>,
    state: Mutex<ScopeState>,
}

impl ScopeStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            state: Mutex::new(ScopeState::default()),
        }
    }

    pub fn available_stores(&self) -> Vec<StoreAccess> {
        self.state
            .lock()
            .expect("scope lock poisoned")
            .available
            .clone()
    }

    pub fn selected_store(&self) -> Option<StoreAccess> {
        self.state
            .lock()
            .expect("scope lock poisoned")
            .selected
            .clone()
    }

    // Derives the selection from the authenticated user: a persisted id
    // wins when it is still accessible, otherwise the first accessible
    // store becomes the selection and is persisted. Signing out clears
    // memory but leaves the persisted id for the next session.
    pub fn recompute(&self, user: Option<&User>) {
        let mut state = self.state.lock().expect("scope lock poisoned");
        let Some(user) = user else {
            state.available.clear();
            state.selected = None;
            debug!("No authenticated user, store selection cleared from memory");
            return;
        };
        state.available = user.store_accesses.clone();
        let persisted = self.persisted_store_id();
        let restored = persisted.and_then(|store_id| {
            state
                .available
                .iter()
                .find(|access| access.store_id == store_id)
                .cloned()
        });
        state.selected = match restored {
            Some(access) => {
                debug!(store_id = access.store_id, "Restored persisted store selection");
                Some(access)
            }
            None => match state.available.first().cloned() {
                Some(first) => {
                    self.persist_store_id(first.store_id);
                    info!(
                        store_id = first.store_id,
                        store = %first.store.name,
                        "Defaulted to first accessible store"
                    );
                    Some(first)
                }
                None => {
                    debug!(user_id = user.id, "User has no store access");
                    None
                }
            },
        };
    }

    pub fn select_store(&self, store_id: i64) {
        let mut state = self.state.lock().expect("scope lock poisoned");
        match state
            .available
            .iter()
            .find(|access| access.store_id == store_id)
            .cloned()
        {
            Some(access) => {
                info!(store_id = store_id, store = %access.store.name, "Store selected");
                state.selected = Some(access);
                self.persist_store_id(store_id);
            }
            None => warn!(store_id = store_id, "Ignoring selection of inaccessible store"),
        }
    }

    pub fn clear_store(&self) {
        let mut state = self.state.lock().expect("scope lock poisoned");
        state.selected = None;
        if let Err(error) = self.storage.remove(SELECTED_STORE_KEY) {
            warn!(error = %error, "Failed to remove persisted store selection");
        }
        debug!("Store selection cleared");
    }

    fn persisted_store_id(&self) -> Option<i64> {
        let raw = match self.storage.get(SELECTED_STORE_KEY) {
            Ok(raw) => raw?,
            Err(error) => {
                warn!(error = %error, "Failed to read persisted store selection");
                return None;
            }
        };
        match raw.parse::<i64>() {
            Ok(store_id) => Some(store_id),
            Err(_) => {
                debug!(raw = %raw, "Ignoring malformed persisted store id");
                None
            }
        }
    }

    fn persist_store_id(&self, store_id: i64) {
        if let Err(error) = self.storage.put(SELECTED_STORE_KEY, &store_id.to_string()) {
            warn!(error = %error, "Failed to persist store selection");
        }
    }
}
