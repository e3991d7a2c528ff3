//! The `/product` backend: catalog lookups and order writes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::OrderId,
    error::ServerMessage,
    protocol::{
        product_route, CategoryQuery, DeleteOrderQuery, OrderSubmission, PriceQuote, ProductEntry,
        ProductQuery,
    },
};
use tracing::debug;
use url::Url;

use crate::error::{OrderError, UNKNOWN_SERVER_ERROR};

#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list_products(&self, category: &str) -> Result<Vec<ProductEntry>, OrderError>;
    async fn product_price(&self, product: &str) -> Result<PriceQuote, OrderError>;
    /// Succeeds only on HTTP 200; every other status is a rejection.
    async fn create_order(&self, order: &OrderSubmission) -> Result<ServerMessage, OrderError>;
    async fn delete_order(&self, order_id: &OrderId) -> Result<ServerMessage, OrderError>;
}

pub struct HttpProductService {
    http: Client,
    endpoint: Url,
}

impl HttpProductService {
    pub fn new(server_url: &str) -> Result<Self, OrderError> {
        Self::with_client(server_url, Client::new())
    }

    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self, OrderError> {
        let http = Client::builder().timeout(timeout).build()?;
        Self::with_client(server_url, http)
    }

    pub fn with_client(server_url: &str, http: Client) -> Result<Self, OrderError> {
        let mut base = Url::parse(server_url.trim())
            .map_err(|e| OrderError::InvalidServerUrl(format!("{server_url}: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join(product_route().trim_start_matches('/'))
            .map_err(|e| OrderError::InvalidServerUrl(format!("{server_url}: {e}")))?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ProductService for HttpProductService {
    async fn list_products(&self, category: &str) -> Result<Vec<ProductEntry>, OrderError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&CategoryQuery {
                category: category.to_string(),
            })
            .send()
            .await?;
        let response = require_success(response).await?;
        Ok(response.json().await?)
    }

    async fn product_price(&self, product: &str) -> Result<PriceQuote, OrderError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&ProductQuery {
                product: product.to_string(),
            })
            .send()
            .await?;
        let response = require_success(response).await?;
        Ok(response.json().await?)
    }

    async fn create_order(&self, order: &OrderSubmission) -> Result<ServerMessage, OrderError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(order)
            .send()
            .await?;
        let status = response.status();
        let body = read_server_message(response).await;
        if status != StatusCode::OK {
            return Err(rejection(status, body.as_ref().and_then(ServerMessage::submission_text)));
        }
        Ok(body.unwrap_or_default())
    }

    async fn delete_order(&self, order_id: &OrderId) -> Result<ServerMessage, OrderError> {
        let response = self
            .http
            .delete(self.endpoint.clone())
            .query(&DeleteOrderQuery {
                order_id: order_id.clone(),
            })
            .send()
            .await?;
        let status = response.status();
        let body = read_server_message(response).await;
        if !status.is_success() {
            return Err(rejection(status, body.as_ref().and_then(ServerMessage::deletion_text)));
        }
        Ok(body.unwrap_or_default())
    }
}

async fn require_success(response: Response) -> Result<Response, OrderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = read_server_message(response).await;
    Err(rejection(
        status,
        body.as_ref()
            .and_then(|message| message.error.as_deref().or(message.message.as_deref())),
    ))
}

/// Error bodies are best effort; a non-JSON body just loses its message.
async fn read_server_message(response: Response) -> Option<ServerMessage> {
    match response.json::<ServerMessage>().await {
        Ok(message) => Some(message),
        Err(error) => {
            debug!(%error, "response body is not a server message");
            None
        }
    }
}

fn rejection(status: StatusCode, message: Option<&str>) -> OrderError {
    OrderError::ServerRejection {
        status: status.as_u16(),
        message: message.unwrap_or(UNKNOWN_SERVER_ERROR).to_string(),
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
