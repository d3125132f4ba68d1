use std::sync::RwLock;

use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

pub struct Http {
    base: String,
    inner: reqwest::Client,
    bearer: RwLock<Option<String>>,
}

impl Http {
    pub fn new(base_url: Url) -> Self {
        Self {
            base: base_url.as_str().trim_end_matches('/').to_owned(),
            inner: reqwest::Client::new(),
            bearer: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn set_bearer(&self, token: Option<String>) {
        *self.bearer.write().expect("bearer lock poisoned") = token;
    }

    pub fn bearer(&self) -> Option<String> {
        self.bearer.read().expect("bearer lock poisoned").clone()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.inner.get(self.url(path))).await
    }

    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.send(self.inner.get(self.url(path)).query(query)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.inner.post(self.url(path)).json(body)).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.inner.patch(self.url(path)).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.dispatch(self.inner.delete(self.url(path))).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{base}{path}", base = self.base)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.dispatch(builder).await?;
        Ok(response.json::<T>().await?)
    }

    async fn dispatch(&self, builder: RequestBuilder) -> Result<Response> {
        let builder = match self.bearer() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = builder.send().await?;
        let status = response.status();
        debug!(url = %response.url(), status = %status, "API response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::from_response(status, &body))
    }
}
