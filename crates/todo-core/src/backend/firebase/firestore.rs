//! Cloud Firestore Store
//!
//! Document store over the Firestore REST API, authorized with the id token
//! of the signed-in user.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::auth::TokenHandle;
use super::wire::{owner_query, Document, ErrorEnvelope, RunQueryResult};
use crate::backend::traits::DocumentStore;
use crate::config::FirebaseConfig;
use crate::domain::{Item, ItemId, ItemPatch, NewItem, StoreError, StoreResult, UserId};

pub struct FirestoreStore {
    http: Client,
    config: FirebaseConfig,
    tokens: TokenHandle,
}

fn request_error(err: reqwest::Error) -> StoreError {
    StoreError::Request(err.to_string())
}

impl FirestoreStore {
    pub fn new(config: FirebaseConfig, tokens: TokenHandle) -> Self {
        Self {
            http: Client::new(),
            config,
            tokens,
        }
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.config.documents_url(), collection, id)
    }

    /// Send an authorized request built by `request`.
    ///
    /// A 401 means the id token expired: it is refreshed once and the
    /// request sent again.
    async fn send(&self, request: impl Fn() -> RequestBuilder, id: Option<&str>) -> StoreResult<Response> {
        let token = self.tokens.id_token().ok_or(StoreError::Unauthenticated)?;
        let mut response = request().bearer_auth(token).send().await.map_err(request_error)?;
        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("id token rejected, refreshing");
            let token = self.tokens.refresh().await.map_err(|err| {
                warn!(error = %err, "could not refresh id token");
                StoreError::Unauthenticated
            })?;
            response = request().bearer_auth(token).send().await.map_err(request_error)?;
        }

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status {
            StatusCode::UNAUTHORIZED => Err(StoreError::Unauthenticated),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(id.unwrap_or_default().to_string())),
            _ => {
                let message = match response.json::<ErrorEnvelope>().await {
                    Ok(envelope) => envelope.error.message,
                    Err(_) => status.to_string(),
                };
                Err(StoreError::Status {
                    code: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn decode<R: DeserializeOwned>(response: Response) -> StoreResult<R> {
        response
            .json::<R>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl DocumentStore for FirestoreStore {
    async fn query_owned(&self, collection: &str, owner: &UserId) -> StoreResult<Vec<Item>> {
        let url = format!("{}:runQuery", self.config.documents_url());
        let query = owner_query(collection, owner);
        let response = self.send(|| self.http.post(url.as_str()).json(&query), None).await?;
        let results: Vec<RunQueryResult> = Self::decode(response).await?;
        let items = results
            .into_iter()
            .filter_map(|result| result.document)
            .map(Document::into_item)
            .collect::<StoreResult<Vec<_>>>()?;
        debug!(owner = %owner, count = items.len(), "firestore query");
        Ok(items)
    }

    async fn insert(&self, collection: &str, item: &NewItem) -> StoreResult<ItemId> {
        let url = format!("{}/{}", self.config.documents_url(), collection);
        let document = Document::from_new_item(item);
        let response = self.send(|| self.http.post(url.as_str()).json(&document), None).await?;
        let created: Document = Self::decode(response).await?;
        Ok(created.id()?.to_string())
    }

    async fn update(&self, collection: &str, id: &str, patch: &ItemPatch) -> StoreResult<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let mut query: Vec<(&str, &str)> = patch
            .field_paths()
            .into_iter()
            .map(|path| ("updateMask.fieldPaths", path))
            .collect();
        query.push(("currentDocument.exists", "true"));

        let url = self.document_url(collection, id);
        let document = Document::from_patch(patch);
        let request = || self.http.patch(url.as_str()).query(&query).json(&document);
        self.send(request, Some(id)).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let url = self.document_url(collection, id);
        self.send(|| self.http.delete(url.as_str()), Some(id)).await?;
        Ok(())
    }
}
