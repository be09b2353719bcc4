//! HTTP transport used by the completion backend.
//!
//! The backend only needs to POST a JSON body and inspect the status and body
//! of the reply. Keeping that behind a trait lets the backend be exercised
//! against canned replies without a network.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

/// Status and body of an HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for HTTP communication with the completion service.
///
/// # Example
///
/// ```ignore
/// use cogbias::http_client::{HttpClient, ReqwestHttpClient};
///
/// let client = ReqwestHttpClient::new();
/// let reply = client.post_json(
///     "https://api.example.com/v1/completions",
///     &[("Authorization", "Bearer sk-...")],
///     &serde_json::json!({"prompt": "1. Linda\n2. Daniel\n3. "}),
/// ).await?;
/// assert!(reply.is_success());
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends a POST request with a JSON body.
    ///
    /// Non-2xx statuses are returned as a reply, not an error; only transport
    /// failures (DNS, TLS, connection reset) produce `Err`.
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<HttpReply>;
}

/// HTTP client implementation using reqwest.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<HttpReply> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(*key, *value);
        }

        let response = request.json(body).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_success_range() {
        let ok = HttpReply {
            status: 200,
            body: String::new(),
        };
        let created = HttpReply {
            status: 201,
            body: String::new(),
        };
        let throttled = HttpReply {
            status: 429,
            body: "rate limited".to_string(),
        };

        assert!(ok.is_success());
        assert!(created.is_success());
        assert!(!throttled.is_success());
    }
}
