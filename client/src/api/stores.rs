use shared::{Store, StoreCreate, StoreUpdate};

use crate::error::Result;
use crate::http::Http;

pub struct StoresApi<'a> {
    pub(crate) http: &'a Http,
}

impl StoresApi<'_> {
    // The server scopes the listing to the companies the caller can see.
    pub async fn list(&self) -> Result<Vec<Store>> {
        self.http.get("/api/v1/stores").await
    }

    pub async fn create(&self, store: &StoreCreate) -> Result<Store> {
        self.http.post("/api/v1/stores", store).await
    }

    pub async fn get(&self, store_id: i64) -> Result<Store> {
        self.http.get(&format!("/api/v1/stores/{store_id}")).await
    }

    pub async fn update(&self, store_id: i64, update: &StoreUpdate) -> Result<Store> {
        self.http
            .patch(&format!("/api/v1/stores/{store_id}"), update)
            .await
    }

    pub async fn delete(&self, store_id: i64) -> Result<()> {
        self.http.delete(&format!("/api/v1/stores/{store_id}")).await
    }
}
