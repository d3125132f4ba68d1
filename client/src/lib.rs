use std::sync::Arc;

use url::Url;

use self::api::ApiClient;
use self::scope::ScopeStore;
use self::session::SessionStore;
use self::storage::KeyValueStorage;

pub mod api;
pub mod error;
pub mod http;
pub mod scope;
pub mod session;
pub mod storage;

#[derive(Clone)]
pub struct AppContext {
    pub api: ApiClient,
    pub session: Arc<SessionStore>,
    pub scope: Arc<ScopeStore>,
}

impl AppContext {
    // The scope store tracks the session: every user change recomputes
    // the store selection before the session call returns.
    pub fn new(base_url: Url, storage: Arc<dyn KeyValueStorage>) -> Self {
        let api = ApiClient::new(base_url);
        let session = Arc::new(SessionStore::new(api.clone(), Arc::clone(&storage)));
        let scope = Arc::new(ScopeStore::new(storage));
        session.on_user_change({
            let scope = Arc::clone(&scope);
            move |user| scope.recompute(user)
        });
        Self {
            api,
            session,
            scope,
        }
    }
}
