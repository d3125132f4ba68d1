use shared::{
    Customer, CustomerAddress, CustomerAddressCreate, CustomerAddressUpdate, CustomerContact,
    CustomerContactCreate, CustomerContactUpdate, CustomerCreate, CustomerUpdate,
};

use crate::error::Result;
use crate::http::Http;

#[derive(Debug, Default, Clone)]
pub struct CustomerFilter {
    pub search: Option<String>,
    pub status: Option<String>,
}

pub struct CustomersApi<'a> {
    pub(crate) http: &'a Http,
}

impl CustomersApi<'_> {
    pub async fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>> {
        let mut query = Vec::new();
        if let Some(search) = &filter.search {
            query.push(("search", search.clone()));
        }
        if let Some(status) = &filter.status {
            query.push(("status_filter", status.clone()));
        }
        self.http.get_query("/api/v1/customers", &query).await
    }

    pub async fn create(&self, customer: &CustomerCreate) -> Result<Customer> {
        self.http.post("/api/v1/customers", customer).await
    }

    pub async fn get(&self, customer_id: i64) -> Result<Customer> {
        self.http
            .get(&format!("/api/v1/customers/{customer_id}"))
            .await
    }

    pub async fn update(&self, customer_id: i64, update: &CustomerUpdate) -> Result<Customer> {
        self.http
            .patch(&format!("/api/v1/customers/{customer_id}"), update)
            .await
    }

    pub async fn delete(&self, customer_id: i64) -> Result<()> {
        self.http
            .delete(&format!("/api/v1/customers/{customer_id}"))
            .await
    }

    pub async fn contacts(&self, customer_id: i64) -> Result<Vec<CustomerContact>> {
        self.http
            .get(&format!("/api/v1/customers/{customer_id}/contacts"))
            .await
    }

    pub async fn add_contact(
        &self,
        customer_id: i64,
        contact: &CustomerContactCreate,
    ) -> Result<CustomerContact> {
        self.http
            .post(&format!("/api/v1/customers/{customer_id}/contacts"), contact)
            .await
    }

    pub async fn update_contact(
        &self,
        customer_id: i64,
        contact_id: i64,
        update: &CustomerContactUpdate,
    ) -> Result<CustomerContact> {
        self.http
            .patch(
                &format!("/api/v1/customers/{customer_id}/contacts/{contact_id}"),
                update,
            )
            .await
    }

    pub async fn remove_contact(&self, customer_id: i64, contact_id: i64) -> Result<()> {
        self.http
            .delete(&format!(
                "/api/v1/customers/{customer_id}/contacts/{contact_id}"
            ))
            .await
    }

    pub async fn addresses(&self, customer_id: i64) -> Result<Vec<CustomerAddress>> {
        self.http
            .get(&format!("/api/v1/customers/{customer_id}/addresses"))
            .await
    }

    pub async fn add_address(
        &self,
        customer_id: i64,
        address: &CustomerAddressCreate,
    ) -> Result<CustomerAddress> {
        self.http
            .post(
                &format!("/api/v1/customers/{customer_id}/addresses"),
                address,
            )
            .await
    }

    pub async fn update_address(
        &self,
        customer_id: i64,
        address_id: i64,
        update: &CustomerAddressUpdate,
    ) -> Result<CustomerAddress> {
        self.http
            .patch(
                &format!("/api/v1/customers/{customer_id}/addresses/{address_id}"),
                update,
            )
            .await
    }

    pub async fn remove_address(&self, customer_id: i64, address_id: i64) -> Result<()> {
        self.http
            .delete(&format!(
                "/api/v1/customers/{customer_id}/addresses/{address_id}"
            ))
            .await
    }
}
