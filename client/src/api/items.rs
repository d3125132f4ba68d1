use shared::{Item, ItemCreate, ItemKind, ItemUpdate};

use crate::error::Result;
use crate::http::Http;

#[derive(Debug, Default, Clone)]
pub struct ItemFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub kind: Option<ItemKind>,
}

pub struct ItemsApi<'a> {
    pub(crate) http: &'a Http,
}

impl ItemsApi<'_> {
    pub async fn list(&self, filter: &ItemFilter) -> Result<Vec<Item>> {
        let mut query = Vec::new();
        if let Some(search) = &filter.search {
            query.push(("search", search.clone()));
        }
        if let Some(status) = &filter.status {
            query.push(("status_filter", status.clone()));
        }
        if let Some(kind) = &filter.kind {
            query.push(("type_filter", kind.as_ref().to_owned()));
        }
        self.http.get_query("/api/v1/items", &query).await
    }

    pub async fn create(&self, item: &ItemCreate) -> Result<Item> {
        self.http.post("/api/v1/items", item).await
    }

    pub async fn get(&self, item_id: i64) -> Result<Item> {
        self.http.get(&format!("/api/v1/items/{item_id}")).await
    }

    // Items are never deleted, retirement is a status update.
    pub async fn update(&self, item_id: i64, update: &ItemUpdate) -> Result<Item> {
        self.http
            .patch(&format!("/api/v1/items/{item_id}"), update)
            .await
    }
}
