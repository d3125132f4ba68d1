use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use secrecy::ExposeSecret;
use serde_json::json;
use shared::{
    Company, CompanyCreate, CompanyGstin, CompanyUpdate, Health, Item, ItemCreate, ItemUpdate,
    LoginRequest, LogoutRequest, MessageResponse, Readiness, RefreshRequest, RefreshResponse,
    TokenResponse, User,
};

pub type SharedState = Arc<Mutex<StubState>>;

pub struct StubAccount {
    pub user: User,
    pub password: String,
}

/// Mutable world of the stub API. Tests reach in directly to arrange
/// scenarios the client cannot trigger itself, like revoked tokens or a
/// failing logout backend.
#[derive(Default)]
pub struct StubState {
    pub accounts: Vec<StubAccount>,
    pub access_tokens: HashMap<String, i64>,
    pub refresh_tokens: HashMap<String, i64>,
    pub token_seq: u64,
    pub fail_logout: bool,
    pub companies: Vec<Company>,
    pub company_seq: i64,
    pub items: Vec<Item>,
    pub item_seq: i64,
}

impl StubState {
    fn issue_access_token(&mut self, user_id: i64) -> String {
        self.token_seq += 1;
        let token = format!("access-{seq}", seq = self.token_seq);
        self.access_tokens.insert(token.clone(), user_id);
        token
    }

    fn issue_refresh_token(&mut self, user_id: i64) -> String {
        self.token_seq += 1;
        let token = format!("refresh-{seq}", seq = self.token_seq);
        self.refresh_tokens.insert(token.clone(), user_id);
        token
    }

    fn bearer_user(&self, headers: &HeaderMap) -> Option<User> {
        let token = headers
            .get(AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        let user_id = self.access_tokens.get(token)?;
        self.accounts
            .iter()
            .find(|account| account.user.id == *user_id)
            .map(|account| account.user.clone())
    }
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/refresh", post(refresh))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/companies", get(list_companies).post(create_company))
        .route(
            "/api/v1/companies/{company_id}",
            get(get_company).patch(update_company).delete(delete_company),
        )
        .route("/api/v1/items", get(list_items).post(create_item))
        .route("/api/v1/items/{item_id}", get(get_item).patch(update_item))
        .with_state(state)
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn validation_problem(instance: &str, field: &str, message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "type": "https://tsv-rsm.example/problems/validation-error",
            "title": "Validation Error",
            "status": 422,
            "detail": "Request validation failed",
            "instance": instance,
            "errors": [{ "field": field, "message": message, "type": "value_error" }]
        })),
    )
        .into_response()
}

fn unauthorized() -> Response {
    detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_owned(),
        environment: "test".to_owned(),
    })
}

async fn ready() -> Json<Readiness> {
    Json(Readiness {
        status: "ready".to_owned(),
        database: "connected".to_owned(),
        error: None,
    })
}

async fn login(State(state): State<SharedState>, Json(request): Json<LoginRequest>) -> Response {
    let mut state = state.lock().unwrap();
    let account = state.accounts.iter().find(|account| {
        account.user.email == request.email && account.password == request.password.expose_secret()
    });
    let Some(account) = account else {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    };
    if account.user.status != "active" {
        return detail(StatusCode::UNAUTHORIZED, "User account is not active");
    }
    let user_id = account.user.id;
    let access_token = state.issue_access_token(user_id);
    let refresh_token = state.issue_refresh_token(user_id);
    Json(TokenResponse {
        access_token,
        refresh_token,
        token_type: "bearer".to_owned(),
    })
    .into_response()
}

async fn refresh(
    State(state): State<SharedState>,
    Json(request): Json<RefreshRequest>,
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(user_id) = state.refresh_tokens.get(&request.refresh_token).copied() else {
        return detail(StatusCode::UNAUTHORIZED, "Invalid refresh token");
    };
    let access_token = state.issue_access_token(user_id);
    Json(RefreshResponse {
        access_token,
        token_type: "bearer".to_owned(),
    })
    .into_response()
}

async fn logout(State(state): State<SharedState>, Json(request): Json<LogoutRequest>) -> Response {
    let mut state = state.lock().unwrap();
    if state.fail_logout {
        return detail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Token revocation backend unavailable",
        );
    }
    if let Some(refresh_token) = request.refresh_token {
        state.refresh_tokens.remove(&refresh_token);
    }
    Json(MessageResponse {
        message: "Successfully logged out".to_owned(),
    })
    .into_response()
}

async fn me(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    match state.bearer_user(&headers) {
        Some(user) => Json(user).into_response(),
        None => unauthorized(),
    }
}

async fn list_companies(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    if state.bearer_user(&headers).is_none() {
        return unauthorized();
    }
    Json(state.companies.clone()).into_response()
}

async fn create_company(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(request): Json<CompanyCreate>,
) -> Response {
    let mut state = state.lock().unwrap();
    if state.bearer_user(&headers).is_none() {
        return unauthorized();
    }
    if request.legal_name.trim().is_empty() {
        return validation_problem(
            "/api/v1/companies",
            "legal_name",
            "Legal name must not be empty",
        );
    }
    state.company_seq += 1;
    let now = Utc::now();
    let company = Company {
        id: state.company_seq,
        legal_name: request.legal_name,
        trade_name: request.trade_name,
        pan: request.pan,
        contacts: request.contacts,
        address: request.address,
        status: "active".to_owned(),
        gstins: request
            .gstins
            .into_iter()
            .enumerate()
            .map(|(index, gstin)| CompanyGstin {
                id: index as i64 + 1,
                gstin: gstin.gstin,
                is_primary: gstin.is_primary,
                status: "active".to_owned(),
                created_at: now,
                updated_at: now,
            })
            .collect(),
        created_at: now,
        updated_at: now,
    };
    state.companies.push(company.clone());
    (StatusCode::CREATED, Json(company)).into_response()
}

async fn get_company(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(company_id): Path<i64>,
) -> Response {
    let state = state.lock().unwrap();
    if state.bearer_user(&headers).is_none() {
        return unauthorized();
    }
    match state
        .companies
        .iter()
        .find(|company| company.id == company_id)
    {
        Some(company) => Json(company.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Company not found"),
    }
}

async fn update_company(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(company_id): Path<i64>,
    Json(update): Json<CompanyUpdate>,
) -> Response {
    let mut state = state.lock().unwrap();
    if state.bearer_user(&headers).is_none() {
        return unauthorized();
    }
    let Some(company) = state
        .companies
        .iter_mut()
        .find(|company| company.id == company_id)
    else {
        return detail(StatusCode::NOT_FOUND, "Company not found");
    };
    if let Some(legal_name) = update.legal_name {
        company.legal_name = legal_name;
    }
    if let Some(trade_name) = update.trade_name {
        company.trade_name = Some(trade_name);
    }
    if let Some(pan) = update.pan {
        company.pan = Some(pan);
    }
    if let Some(contacts) = update.contacts {
        company.contacts = contacts;
    }
    if let Some(address) = update.address {
        company.address = address;
    }
    if let Some(status) = update.status {
        company.status = status;
    }
    company.updated_at = Utc::now();
    Json(company.clone()).into_response()
}

async fn delete_company(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(company_id): Path<i64>,
) -> Response {
    let mut state = state.lock().unwrap();
    if state.bearer_user(&headers).is_none() {
        return unauthorized();
    }
    let Some(company) = state
        .companies
        .iter_mut()
        .find(|company| company.id == company_id)
    else {
        return detail(StatusCode::NOT_FOUND, "Company not found");
    };
    company.status = "inactive".to_owned();
    company.updated_at = Utc::now();
    StatusCode::NO_CONTENT.into_response()
}

async fn list_items(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let state = state.lock().unwrap();
    if state.bearer_user(&headers).is_none() {
        return unauthorized();
    }
    let items: Vec<Item> = state
        .items
        .iter()
        .filter(|item| {
            if let Some(search) = params.get("search") {
                let needle = search.to_lowercase();
                if !item.name.to_lowercase().contains(&needle)
                    && !item.sku.to_lowercase().contains(&needle)
                {
                    return false;
                }
            }
            if let Some(status) = params.get("status_filter") {
                if item.status != *status {
                    return false;
                }
            }
            if let Some(kind) = params.get("type_filter") {
                if item.kind.as_ref() != kind.as_str() {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect();
    Json(items).into_response()
}

async fn create_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(request): Json<ItemCreate>,
) -> Response {
    let mut state = state.lock().unwrap();
    if state.bearer_user(&headers).is_none() {
        return unauthorized();
    }
    if state.items.iter().any(|item| item.sku == request.sku) {
        return validation_problem("/api/v1/items", "sku", "SKU already exists");
    }
    state.item_seq += 1;
    let now = Utc::now();
    let item = Item {
        id: state.item_seq,
        company_id: 1,
        sku: request.sku,
        name: request.name,
        kind: request.kind,
        hsn_sac: request.hsn_sac,
        uom: request.uom,
        tax_rate: request.tax_rate,
        status: "active".to_owned(),
        created_at: now,
        updated_at: now,
    };
    state.items.push(item.clone());
    (StatusCode::CREATED, Json(item)).into_response()
}

async fn get_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(item_id): Path<i64>,
) -> Response {
    let state = state.lock().unwrap();
    if state.bearer_user(&headers).is_none() {
        return unauthorized();
    }
    match state.items.iter().find(|item| item.id == item_id) {
        Some(item) => Json(item.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Item not found"),
    }
}

async fn update_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(item_id): Path<i64>,
    Json(update): Json<ItemUpdate>,
) -> Response {
    let mut state = state.lock().unwrap();
    if state.bearer_user(&headers).is_none() {
        return unauthorized();
    }
    let Some(item) = state.items.iter_mut().find(|item| item.id == item_id) else {
        return detail(StatusCode::NOT_FOUND, "Item not found");
    };
    if let Some(sku) = update.sku {
        item.sku = sku;
    }
    if let Some(name) = update.name {
        item.name = name;
    }
    if let Some(kind) = update.kind {
        item.kind = kind;
    }
    if let Some(hsn_sac) = update.hsn_sac {
        item.hsn_sac = Some(hsn_sac);
    }
    if let Some(uom) = update.uom {
        item.uom = uom;
    }
    if let Some(tax_rate) = update.tax_rate {
        item.tax_rate = tax_rate;
    }
    if let Some(status) = update.status {
        item.status = status;
    }
    item.updated_at = Utc::now();
    Json(item.clone()).into_response()
}
