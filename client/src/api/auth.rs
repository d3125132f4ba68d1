use reqwest::StatusCode;
use shared::{
    LoginRequest, LogoutRequest, MessageResponse, RefreshRequest, RefreshResponse, TokenResponse,
    User,
};
use tracing::debug;

use crate::error::{Error, Result};
use crate::http::Http;

pub struct AuthApi<'a> {
    pub(crate) http: &'a Http,
}

impl AuthApi<'_> {
    pub async fn login(&self, credentials: &LoginRequest) -> Result<TokenResponse> {
        debug!(email = %credentials.email, "Requesting token pair");
        match self.http.post("/api/v1/auth/login", credentials).await {
            Err(Error::Api { status, .. }) if status == StatusCode::UNAUTHORIZED => {
                Err(Error::WrongCredentials)
            }
            other => other,
        }
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse> {
        let request = RefreshRequest {
            refresh_token: refresh_token.to_owned(),
        };
        self.http.post("/api/v1/auth/refresh", &request).await
    }

    pub async fn logout(&self, refresh_token: Option<String>) -> Result<MessageResponse> {
        let request = LogoutRequest { refresh_token };
        self.http.post("/api/v1/auth/logout", &request).await
    }

    pub async fn me(&self) -> Result<User> {
        self.http.get("/api/v1/auth/me").await
    }
}
