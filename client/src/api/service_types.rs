use shared::ServiceType;

use crate::error::Result;
use crate::http::Http;

pub struct ServiceTypesApi<'a> {
    pub(crate) http: &'a Http,
}

impl ServiceTypesApi<'_> {
    // Read-only catalog, the server always answers with the active set.
    pub async fn list(&self) -> Result<Vec<ServiceType>> {
        self.http.get("/api/v1/service-types").await
    }
}
