use std::sync::{Arc, RwLock};

use shared::{LoginRequest, User};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::storage::{ACCESS_TOKEN_KEY, KeyValueStorage, REFRESH_TOKEN_KEY};

type UserListener = Box<dyn Fn(Option<&User>) + Send + Sync>;

pub struct SessionStore {
    api: ApiClient,
    storage: Arc<dyn KeyValueStorage>,
    user: RwLock<Option<User>>,
    listeners: RwLock<Vec<UserListener>>,
    // Serializes initialize/login/logout/refresh so overlapping calls
    // cannot interleave token writes.
    ops: Mutex<()>,
}

impl SessionStore {
    pub fn new(api: ApiClient, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            api,
            storage,
            user: RwLock::new(None),
            listeners: RwLock::new(Vec::new()),
            ops: Mutex::new(()),
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.read().expect("user lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.read().expect("user lock poisoned").is_some()
    }

    pub fn on_user_change(&self, listener: impl Fn(Option<&User>) + Send + Sync + 'static) {
        self.listeners
            .write()
            .expect("listener lock poisoned")
            .push(Box::new(listener));
    }

    pub async fn initialize(&self) -> bool {
        let _guard = self.ops.lock().await;
        let token = match self.storage.get(ACCESS_TOKEN_KEY) {
            Ok(token) => token,
            Err(error) => {
                warn!(error = %error, "Failed to read persisted access token");
                None
            }
        };
        let Some(token) = token else {
            debug!("No persisted access token, starting unauthenticated");
            self.set_user(None);
            return false;
        };
        self.api.set_access_token(Some(token));
        match self.api.auth().me().await {
            Ok(user) => {
                info!(user_id = user.id, email = %user.email, "Session restored from persisted token");
                self.set_user(Some(user));
                true
            }
            Err(error) => {
                warn!(error = %error, "Persisted token rejected, clearing session");
                self.discard_tokens();
                self.set_user(None);
                false
            }
        }
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<User> {
        let _guard = self.ops.lock().await;
        let tokens = self.api.auth().login(credentials).await?;
        self.storage.put(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        self.storage.put(REFRESH_TOKEN_KEY, &tokens.refresh_token)?;
        self.api.set_access_token(Some(tokens.access_token));
        let user = self.api.auth().me().await?;
        info!(user_id = user.id, email = %user.email, "User logged in");
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    // Local state is cleared even when the server-side revocation fails,
    // the user asked to leave.
    pub async fn logout(&self) {
        let _guard = self.ops.lock().await;
        let refresh_token = self.storage.get(REFRESH_TOKEN_KEY).unwrap_or_else(|error| {
            warn!(error = %error, "Failed to read persisted refresh token");
            None
        });
        if let Some(refresh_token) = refresh_token {
            if let Err(error) = self.api.auth().logout(Some(refresh_token)).await {
                warn!(error = %error, "Server-side logout failed, clearing local session anyway");
            }
        }
        self.discard_tokens();
        self.set_user(None);
        info!("User logged out");
    }

    pub async fn refresh(&self) -> Result<User> {
        let _guard = self.ops.lock().await;
        let refresh_token = self
            .storage
            .get(REFRESH_TOKEN_KEY)?
            .ok_or(Error::MissingRefreshToken)?;
        let refreshed = self.api.auth().refresh(&refresh_token).await?;
        self.storage.put(ACCESS_TOKEN_KEY, &refreshed.access_token)?;
        self.api.set_access_token(Some(refreshed.access_token));
        let user = self.api.auth().me().await?;
        debug!(user_id = user.id, "Access token refreshed");
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    fn discard_tokens(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(error) = self.storage.remove(key) {
                warn!(key = %key, error = %error, "Failed to remove persisted token");
            }
        }
        self.api.set_access_token(None);
    }

    // Listeners run after the user lock is released so they can read back
    // through the store without deadlocking.
    fn set_user(&self, user: Option<User>) {
        let snapshot = {
            let mut current = self.user.write().expect("user lock poisoned");
            *current = user;
            current.clone()
        };
        let listeners = self.listeners.read().expect("listener lock poisoned");
        for listener in listeners.iter() {
            listener(snapshot.as_ref());
        }
    }
}
