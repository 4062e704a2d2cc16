//! Remote access layer: one call per (entity, verb) pair over the REST API.
//!
//! Calls never retry and use the transport's own timeouts. An optional owner
//! goes to the query string on reads and deletes and to the body on creates;
//! omitting it addresses shared records.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CatalogEntry, CatalogEntryRequest, CatalogKind, OwnerParams, Todo, TodoDraft, TodoPatch,
};

#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn health(&self) -> ApiResult<serde_json::Value>;

    async fn get_todos(&self) -> ApiResult<Vec<Todo>>;
    async fn get_todo(&self, id: &str) -> ApiResult<Todo>;
    async fn create_todo(&self, draft: &TodoDraft) -> ApiResult<Todo>;
    async fn update_todo(&self, id: &str, patch: &TodoPatch) -> ApiResult<Todo>;
    async fn delete_todo(&self, id: &str) -> ApiResult<()>;

    async fn get_catalog(&self, kind: CatalogKind, owner: Option<&str>) -> ApiResult<Vec<CatalogEntry>>;
    async fn create_catalog_entry(
        &self,
        kind: CatalogKind,
        name: &str,
        owner: Option<&str>,
    ) -> ApiResult<CatalogEntry>;
    async fn delete_catalog_entry(&self, kind: CatalogKind, id: &str, owner: Option<&str>) -> ApiResult<()>;
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Non-2xx responses become [`ApiError::Status`] carrying the server's
    /// `message`, when the body has one.
    async fn check(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<MessageBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        tracing::debug!("Request failed with {}: {:?}", status, message);

        Err(ApiError::Status { status, message })
    }

    fn get_catalog_request(&self, kind: CatalogKind, owner: Option<&str>) -> RequestBuilder {
        self.client
            .get(self.url(kind.path()))
            .query(&OwnerParams { user_id: owner })
    }

    fn create_catalog_request(&self, kind: CatalogKind, name: &str, owner: Option<&str>) -> RequestBuilder {
        self.client
            .post(self.url(kind.path()))
            .json(&CatalogEntryRequest { name, user_id: owner })
    }

    fn delete_catalog_request(&self, kind: CatalogKind, id: &str, owner: Option<&str>) -> RequestBuilder {
        self.client
            .delete(self.url(&format!("{}/{}", kind.path(), id)))
            .query(&OwnerParams { user_id: owner })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let response = Self::check(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RemoteApi for ApiClient {
    async fn health(&self) -> ApiResult<serde_json::Value> {
        let response = self.client.get(self.url("health")).send().await?;
        Self::decode(response).await
    }

    async fn get_todos(&self) -> ApiResult<Vec<Todo>> {
        let response = self.client.get(self.url("todos")).send().await?;
        Self::decode(response).await
    }

    async fn get_todo(&self, id: &str) -> ApiResult<Todo> {
        let response = self
            .client
            .get(self.url(&format!("todos/{}", id)))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_todo(&self, draft: &TodoDraft) -> ApiResult<Todo> {
        let response = self.client.post(self.url("todos")).json(draft).send().await?;
        Self::decode(response).await
    }

    async fn update_todo(&self, id: &str, patch: &TodoPatch) -> ApiResult<Todo> {
        let response = self
            .client
            .put(self.url(&format!("todos/{}", id)))
            .json(patch)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_todo(&self, id: &str) -> ApiResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("todos/{}", id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn get_catalog(&self, kind: CatalogKind, owner: Option<&str>) -> ApiResult<Vec<CatalogEntry>> {
        let response = self.get_catalog_request(kind, owner).send().await?;
        Self::decode(response).await
    }

    async fn create_catalog_entry(
        &self,
        kind: CatalogKind,
        name: &str,
        owner: Option<&str>,
    ) -> ApiResult<CatalogEntry> {
        let response = self.create_catalog_request(kind, name, owner).send().await?;
        Self::decode(response).await
    }

    async fn delete_catalog_entry(&self, kind: CatalogKind, id: &str, owner: Option<&str>) -> ApiResult<()> {
        let response = self.delete_catalog_request(kind, id, owner).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
