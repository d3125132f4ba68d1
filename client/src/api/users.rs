use shared::{
    StoreAccess, User, UserCreate, UserRoleAssignment, UserStoreAccessCreate,
    UserStoreAccessUpdate, UserUpdate,
};

use crate::error::Result;
use crate::http::Http;

#[derive(Debug, Default, Clone)]
pub struct UserFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

pub struct UsersApi<'a> {
    pub(crate) http: &'a Http,
}

impl UsersApi<'_> {
    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let mut query = Vec::new();
        if let Some(search) = &filter.search {
            query.push(("search", search.clone()));
        }
        if let Some(status) = &filter.status {
            query.push(("status_filter", status.clone()));
        }
        if let Some(skip) = filter.skip {
            query.push(("skip", skip.to_string()));
        }
        if let Some(limit) = filter.limit {
            query.push(("limit", limit.to_string()));
        }
        self.http.get_query("/api/v1/users", &query).await
    }

    pub async fn create(&self, user: &UserCreate) -> Result<User> {
        self.http.post("/api/v1/users", user).await
    }

    pub async fn get(&self, user_id: i64) -> Result<User> {
        self.http.get(&format!("/api/v1/users/{user_id}")).await
    }

    pub async fn update(&self, user_id: i64, update: &UserUpdate) -> Result<User> {
        self.http
            .patch(&format!("/api/v1/users/{user_id}"), update)
            .await
    }

    pub async fn delete(&self, user_id: i64) -> Result<()> {
        self.http.delete(&format!("/api/v1/users/{user_id}")).await
    }

    pub async fn assign_role(&self, user_id: i64, role_id: i64) -> Result<User> {
        let assignment = UserRoleAssignment { role_id };
        self.http
            .post(&format!("/api/v1/users/{user_id}/roles"), &assignment)
            .await
    }

    pub async fn remove_role(&self, user_id: i64, role_id: i64) -> Result<()> {
        self.http
            .delete(&format!("/api/v1/users/{user_id}/roles/{role_id}"))
            .await
    }

    pub async fn store_accesses(&self, user_id: i64) -> Result<Vec<StoreAccess>> {
        self.http
            .get(&format!("/api/v1/users/{user_id}/stores"))
            .await
    }

    pub async fn grant_store_access(
        &self,
        user_id: i64,
        access: &UserStoreAccessCreate,
    ) -> Result<StoreAccess> {
        self.http
            .post(&format!("/api/v1/users/{user_id}/stores"), access)
            .await
    }

    pub async fn update_store_access(
        &self,
        user_id: i64,
        store_id: i64,
        update: &UserStoreAccessUpdate,
    ) -> Result<StoreAccess> {
        self.http
            .patch(&format!("/api/v1/users/{user_id}/stores/{store_id}"), update)
            .await
    }

    pub async fn revoke_store_access(&self, user_id: i64, store_id: i64) -> Result<()> {
        self.http
            .delete(&format!("/api/v1/users/{user_id}/stores/{store_id}"))
            .await
    }
}
