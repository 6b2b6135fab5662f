//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::debug;

use super::traits::*;
use crate::config::ApiConfig;
use crate::error::{Result, VeriduError};

/// Transport over a pooled `reqwest::Client`.
///
/// GET sends the payload as a query string. POST, PUT and DELETE send it as
/// a form-encoded body.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport using the configured timeout.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VeriduError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn build_headers(headers: &[(String, String)]) -> Result<header::HeaderMap> {
        let mut map = header::HeaderMap::new();
        for (name, value) in headers {
            let name = header::HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| VeriduError::Config(format!("Invalid header name {}: {}", name, e)))?;
            let value = header::HeaderValue::from_str(value)
                .map_err(|e| VeriduError::Config(format!("Invalid value for {}: {}", name, e)))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let headers = Self::build_headers(&request.headers)?;

        let builder = self.client.request(http_method(request.method), &request.url);
        let builder = if request.method.uses_query() {
            builder.query(&request.params)
        } else {
            builder.form(&request.params)
        };

        let response = builder.headers(headers).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(status, "{} {} completed", request.method, request.url);

        Ok(HttpResponse { status, body })
    }
}
