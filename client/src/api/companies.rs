use shared::{Company, CompanyCreate, CompanyUpdate};

use crate::error::Result;
use crate::http::Http;

pub struct CompaniesApi<'a> {
    pub(crate) http: &'a Http,
}

impl CompaniesApi<'_> {
    pub async fn list(&self) -> Result<Vec<Company>> {
        self.http.get("/api/v1/companies").await
    }

    pub async fn create(&self, company: &CompanyCreate) -> Result<Company> {
        self.http.post("/api/v1/companies", company).await
    }

    pub async fn get(&self, company_id: i64) -> Result<Company> {
        self.http
            .get(&format!("/api/v1/companies/{company_id}"))
            .await
    }

    pub async fn update(&self, company_id: i64, update: &CompanyUpdate) -> Result<Company> {
        self.http
            .patch(&format!("/api/v1/companies/{company_id}"), update)
            .await
    }

    pub async fn delete(&self, company_id: i64) -> Result<()> {
        self.http
            .delete(&format!("/api/v1/companies/{company_id}"))
            .await
    }
}
