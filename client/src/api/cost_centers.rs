use shared::{
    CompanyCostCenter, CompanyCostCenterCreate, CostCenter, CostCenterCreate, CostCenterUpdate,
};

use crate::error::Result;
use crate::http::Http;

pub struct CostCentersApi<'a> {
    pub(crate) http: &'a Http,
}

impl CostCentersApi<'_> {
    pub async fn list(&self, active_only: bool) -> Result<Vec<CostCenter>> {
        let query = [("active_only", active_only.to_string())];
        self.http.get_query("/api/v1/cost-centers", &query).await
    }

    pub async fn create(&self, cost_center: &CostCenterCreate) -> Result<CostCenter> {
        self.http.post("/api/v1/cost-centers", cost_center).await
    }

    pub async fn get(&self, cost_center_id: i64) -> Result<CostCenter> {
        self.http
            .get(&format!("/api/v1/cost-centers/{cost_center_id}"))
            .await
    }

    pub async fn update(
        &self,
        cost_center_id: i64,
        update: &CostCenterUpdate,
    ) -> Result<CostCenter> {
        self.http
            .patch(&format!("/api/v1/cost-centers/{cost_center_id}"), update)
            .await
    }

    pub async fn delete(&self, cost_center_id: i64) -> Result<()> {
        self.http
            .delete(&format!("/api/v1/cost-centers/{cost_center_id}"))
            .await
    }

    // Company assignments live under the cost center router, keyed by company.

    pub async fn assignments(&self, company_id: i64) -> Result<Vec<CompanyCostCenter>> {
        self.http
            .get(&format!(
                "/api/v1/cost-centers/companies/{company_id}/cost-centers"
            ))
            .await
    }

    pub async fn assign(
        &self,
        company_id: i64,
        assignment: &CompanyCostCenterCreate,
    ) -> Result<CompanyCostCenter> {
        self.http
            .post(
                &format!("/api/v1/cost-centers/companies/{company_id}/cost-centers"),
                assignment,
            )
            .await
    }

    pub async fn unassign(&self, company_id: i64, assignment_id: i64) -> Result<()> {
        self.http
            .delete(&format!(
                "/api/v1/cost-centers/companies/{company_id}/cost-centers/{assignment_id}"
            ))
            .await
    }
}
