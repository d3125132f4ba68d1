use std::sync::Arc;

use url::Url;

use crate::http::Http;

mod auth;
mod companies;
mod cost_centers;
mod customers;
mod health;
mod items;
mod service_types;
mod stores;
mod users;

pub use auth::AuthApi;
pub use companies::CompaniesApi;
pub use cost_centers::CostCentersApi;
pub use customers::{CustomerFilter, CustomersApi};
pub use health::HealthApi;
pub use items::{ItemFilter, ItemsApi};
pub use service_types::ServiceTypesApi;
pub use stores::StoresApi;
pub use users::{UserFilter, UsersApi};

#[derive(Clone)]
pub struct ApiClient {
    http: Arc<Http>,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Arc::new(Http::new(base_url)),
        }
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    pub fn set_access_token(&self, token: Option<String>) {
        self.http.set_bearer(token);
    }

    pub fn access_token(&self) -> Option<String> {
        self.http.bearer()
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { http: &self.http }
    }

    pub fn companies(&self) -> CompaniesApi<'_> {
        CompaniesApi { http: &self.http }
    }

    pub fn cost_centers(&self) -> CostCentersApi<'_> {
        CostCentersApi { http: &self.http }
    }

    pub fn customers(&self) -> CustomersApi<'_> {
        CustomersApi { http: &self.http }
    }

    pub fn health(&self) -> HealthApi<'_> {
        HealthApi { http: &self.http }
    }

    pub fn items(&self) -> ItemsApi<'_> {
        ItemsApi { http: &self.http }
    }

    pub fn service_types(&self) -> ServiceTypesApi<'_> {
        ServiceTypesApi { http: &self.http }
    }

    pub fn stores(&self) -> StoresApi<'_> {
        StoresApi { http: &self.http }
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi { http: &self.http }
    }
}
