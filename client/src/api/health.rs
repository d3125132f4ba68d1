use shared::{Health, Readiness};

use crate::error::Result;
use crate::http::Http;

// Health probes sit at the root, outside the versioned prefix.
pub struct HealthApi<'a> {
    pub(crate) http: &'a Http,
}

impl HealthApi<'_> {
    pub async fn health(&self) -> Result<Health> {
        self.http.get("/health").await
    }

    pub async fn ready(&self) -> Result<Readiness> {
        self.http.get("/ready").await
    }
}
