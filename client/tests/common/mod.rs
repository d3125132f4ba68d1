#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use client::AppContext;
use client::storage::{KeyValueStorage, MemoryStorage};
use serde_json::json;
use shared::{AccessScope, Role, StoreAccess, StoreSummary, User};
use url::Url;

use self::stub_api::{SharedState, StubAccount};

pub mod stub_api;

pub const MANAGER_EMAIL: &str = "meera@tsv.example";
pub const MANAGER_PASSWORD: &str = "retail-ops-1";
pub const CLERK_EMAIL: &str = "arun@tsv.example";
pub const CLERK_PASSWORD: &str = "counter-7";

/// An in-process API instance bound to an ephemeral port, seeded with
/// two accounts: a manager with two store grants and a clerk with none.
pub struct TestApi {
    pub base_url: Url,
    pub state: SharedState,
}

impl TestApi {
    pub async fn spawn() -> anyhow::Result<Self> {
        let state = SharedState::default();
        seed(&state);
        let app = stub_api::router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service())
                .await
                .expect("stub api crashed");
        });
        let base_url = Url::parse(&format!("http://{addr}"))?;
        Ok(Self { base_url, state })
    }

    pub fn context(&self, storage: Arc<dyn KeyValueStorage>) -> AppContext {
        AppContext::new(self.base_url.clone(), storage)
    }

    pub fn fresh_context(&self) -> AppContext {
        self.context(Arc::new(MemoryStorage::new()))
    }

    pub fn set_fail_logout(&self, fail: bool) {
        self.state.lock().unwrap().fail_logout = fail;
    }

    pub fn revoke_refresh_tokens(&self) {
        self.state.lock().unwrap().refresh_tokens.clear();
    }

    pub fn live_refresh_tokens(&self) -> usize {
        self.state.lock().unwrap().refresh_tokens.len()
    }

    /// Rewrites the store grants of an account, as an admin would between
    /// two sessions of that user.
    pub fn set_store_accesses(&self, email: &str, accesses: Vec<StoreAccess>) {
        let mut state = self.state.lock().unwrap();
        let account = state
            .accounts
            .iter_mut()
            .find(|account| account.user.email == email)
            .expect("unknown fixture account");
        account.user.store_accesses = accesses;
    }
}

/// Creates a unique scratch directory path for file storage tests. The
/// directory itself is not created here.
pub fn scratch_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "tsv-rsm-test-{name}-{pid}-{nanos}",
        pid = std::process::id()
    ))
}

pub fn store_access(
    id: i64,
    user_id: i64,
    store_id: i64,
    scope: AccessScope,
    store_name: &str,
) -> StoreAccess {
    StoreAccess {
        id,
        user_id,
        store_id,
        scope,
        store: StoreSummary {
            id: store_id,
            name: store_name.to_owned(),
            company_id: 1,
        },
        created_at: Utc::now(),
    }
}

pub fn fixture_user(
    id: i64,
    email: &str,
    first_name: &str,
    last_name: &str,
    role_code: &str,
    store_accesses: Vec<StoreAccess>,
) -> User {
    let now = Utc::now();
    User {
        id,
        email: email.to_owned(),
        phone: None,
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        status: "active".to_owned(),
        roles: vec![Role {
            id,
            code: role_code.to_owned(),
            name: role_code.to_owned(),
            description: None,
            permissions: json!({"users": ["read"]}),
        }],
        store_accesses,
        created_at: now,
        updated_at: now,
    }
}

pub fn manager_accesses() -> Vec<StoreAccess> {
    vec![
        store_access(1, 1, 5, AccessScope::Edit, "North Mall"),
        store_access(2, 1, 9, AccessScope::View, "South Annex"),
    ]
}

fn seed(state: &SharedState) {
    let mut state = state.lock().unwrap();
    state.accounts = vec![
        StubAccount {
            user: fixture_user(
                1,
                MANAGER_EMAIL,
                "Meera",
                "Iyer",
                "manager",
                manager_accesses(),
            ),
            password: MANAGER_PASSWORD.to_owned(),
        },
        StubAccount {
            user: fixture_user(2, CLERK_EMAIL, "Arun", "Pillai", "clerk", Vec::new()),
            password: CLERK_PASSWORD.to_owned(),
        },
    ];
}
