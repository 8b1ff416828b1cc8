//! Client for the product database API
//!
//! Blocking `ureq` calls against an HTTP service that stores submitted
//! products in a relational table. Every mutating call carries the
//! `x-api-key` header.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::draft::ProductDraft;
use crate::error::{Error, Result};
use crate::storage::Settings;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!("price_collector/", env!("CARGO_PKG_VERSION"));

/// One product row as the API accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSubmission {
    pub title: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub site: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asin: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub timestamp: String,
}

impl From<&ProductDraft> for ProductSubmission {
    fn from(draft: &ProductDraft) -> Self {
        Self {
            title: draft.title.clone().unwrap_or_default(),
            price: draft.price.clone().unwrap_or_default(),
            currency: draft.currency.clone(),
            site: draft.site.clone(),
            asin: draft.asin.clone(),
            url: draft.url.clone(),
            notes: draft.notes.clone(),
            timestamp: draft.timestamp.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    inserted_count: Option<usize>,
    #[serde(default)]
    product_id: Option<Value>,
}

#[derive(Serialize)]
struct BulkBody<'a> {
    products: &'a [ProductSubmission],
}

pub struct ApiClientBuilder {
    endpoint: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
    user_agent: String,
}

impl ApiClientBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let endpoint = required(self.endpoint, "apiEndpoint")?;
        let api_key = required(self.api_key, "apiKey")?;

        let agent = ureq::Agent::new_with_config(
            ureq::Agent::config_builder()
                .timeout_global(Some(self.timeout))
                .user_agent(self.user_agent.as_str())
                .http_status_as_error(false)
                .build(),
        );

        Ok(ApiClient {
            agent,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(Error::MissingSetting(name))
}

pub struct ApiClient {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder {
            endpoint: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Client for the endpoint and key stored in `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::builder()
            .endpoint(settings.api_endpoint.as_str())
            .api_key(settings.api_key.as_str())
            .build()
    }

    pub fn health_url(&self) -> String {
        let base = self.endpoint.strip_suffix("/api").unwrap_or(&self.endpoint);
        format!("{base}/api/health")
    }

    pub fn products_url(&self) -> String {
        format!("{}/products", self.endpoint)
    }

    pub fn bulk_url(&self) -> String {
        format!("{}/products/bulk", self.endpoint)
    }

    /// Check that the service and its database are reachable.
    pub fn health(&self) -> Result<()> {
        let url = self.health_url();
        let response = self
            .agent
            .get(&url)
            .header("Content-Type", "application/json")
            .call()
            .inspect_err(|e| tracing::warn!(url = %url, error = %e, "health check failed"))?;
        read_response(&url, response).map(|_| ())
    }

    /// Store one product; returns the row id when the service reports it.
    pub fn submit(&self, product: &ProductSubmission) -> Result<Option<Value>> {
        let url = self.products_url();
        let body = serde_json::to_string(product)?;
        self.post(&url, body).map(|response| response.product_id)
    }

    /// Store many products in one request; returns how many were inserted.
    pub fn submit_bulk(&self, products: &[ProductSubmission]) -> Result<usize> {
        if products.is_empty() {
            return Err(Error::InvalidInput("no products to submit".into()));
        }
        let url = self.bulk_url();
        let body = serde_json::to_string(&BulkBody { products })?;
        let response = self.post(&url, body)?;
        Ok(response.inserted_count.unwrap_or_default())
    }

    fn post(&self, url: &str, body: String) -> Result<ApiResponse> {
        let response = self
            .agent
            .post(url)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .send(body)
            .inspect_err(|e| tracing::warn!(url = %url, error = %e, "product API request failed"))?;
        read_response(url, response)
    }
}

fn read_response(url: &str, response: ureq::http::Response<ureq::Body>) -> Result<ApiResponse> {
    let status = response.status().as_u16();
    let text = response.into_body().read_to_string()?;
    let parsed: Option<ApiResponse> = serde_json::from_str(&text).ok();

    match parsed {
        Some(body) if (200..300).contains(&status) && body.success => Ok(body),
        other => {
            let message = other
                .and_then(|body| body.error.or(body.message))
                .unwrap_or_else(|| text.trim().chars().take(200).collect());
            tracing::warn!(url = %url, status, message = %message, "product API rejected request");
            Err(Error::Api { status, message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> ApiClient {
        ApiClient::builder()
            .endpoint(endpoint)
            .api_key("secret")
            .build()
            .unwrap()
    }

    #[test]
    fn test_health_url_strips_api_suffix() {
        assert_eq!(
            client("https://prices.example/api").health_url(),
            "https://prices.example/api/health"
        );
        assert_eq!(
            client("https://prices.example/api/").health_url(),
            "https://prices.example/api/health"
        );
        assert_eq!(
            client("http://localhost:3000").health_url(),
            "http://localhost:3000/api/health"
        );
    }

    #[test]
    fn test_product_urls() {
        let api = client("https://prices.example/api/");
        assert_eq!(api.products_url(), "https://prices.example/api/products");
        assert_eq!(api.bulk_url(), "https://prices.example/api/products/bulk");
    }

    #[test]
    fn test_builder_requires_endpoint_and_key() {
        assert!(matches!(
            ApiClient::builder().api_key("k").build(),
            Err(Error::MissingSetting("apiEndpoint"))
        ));
        assert!(matches!(
            ApiClient::builder().endpoint("https://x.example/api").api_key("  ").build(),
            Err(Error::MissingSetting("apiKey"))
        ));
        assert!(ApiClient::from_settings(&Settings::default()).is_err());
    }

    #[test]
    fn test_submission_from_draft() {
        let draft = ProductDraft {
            title: Some("Lamp".into()),
            price: Some("24.99".into()),
            currency: Some("$".into()),
            image: Some("https://m.media-amazon.com/lamp.jpg".into()),
            site: "Amazon".into(),
            url: "https://www.amazon.com/dp/B000000042".into(),
            timestamp: "2024-05-01T12:00:00.000Z".into(),
            asin: Some("B000000042".into()),
            notes: None,
        };

        let json = serde_json::to_value(ProductSubmission::from(&draft)).unwrap();
        assert_eq!(json["title"], "Lamp");
        assert_eq!(json["asin"], "B000000042");
        assert!(json.get("image").is_none());
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_bulk_body_shape() {
        let body = BulkBody { products: &[] };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"products":[]}"#);
    }

    #[test]
    fn test_empty_bulk_is_rejected_locally() {
        assert!(matches!(
            client("https://prices.example/api").submit_bulk(&[]),
            Err(Error::InvalidInput(_))
        ));
    }
}
