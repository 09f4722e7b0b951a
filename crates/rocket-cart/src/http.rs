//! Stock service backed by the RocketShoes HTTP API.
//!
//! Products are served from `GET /products/{id}` and stock records from
//! `GET /stock/{id}`, both relative to the client's base URL.

use async_trait::async_trait;
use rocket_data::{FetchClient, FetchError};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::catalog::{Product, StockRecord, StockService};
use crate::error::LookupError;
use crate::ids::ProductId;

/// [`StockService`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStockService {
    client: FetchClient,
    token: Option<String>,
}

impl HttpStockService {
    /// Create a service using `client`, which should carry the API base URL.
    pub fn new(client: FetchClient) -> Self {
        Self {
            client,
            token: None,
        }
    }

    /// Send a bearer token with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    async fn fetch<T: DeserializeOwned>(&self, id: ProductId, path: String) -> Result<T, LookupError> {
        let mut request = self.client.get(path).accept_json();
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| lookup_error(id, e))?;

        debug!(status = response.status, "lookup succeeded");
        response.json().map_err(|e| lookup_error(id, e))
    }
}

#[async_trait]
impl StockService for HttpStockService {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        self.fetch(id, format!("/products/{}", id)).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<StockRecord, LookupError> {
        self.fetch(id, format!("/stock/{}", id)).await
    }
}

fn lookup_error(id: ProductId, error: FetchError) -> LookupError {
    match error {
        FetchError::HttpError { status: 404, .. } => LookupError::NotFound(id),
        FetchError::ParseError(e) => LookupError::InvalidResponse(e),
        other => LookupError::Unavailable(other.to_string()),
    }
}
