//! HTTP client with opaque auth header injection.
//!
//! Authentication stays a transport concern: whatever headers the
//! embedding shell provides (bearer tokens, tenancy, ...) are attached
//! verbatim to every request. The core never inspects them.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;

/// HTTP client wrapper for filebrowser API communication.
pub struct HttpClient {
    client: Client,
    base_url: String,
    headers: HashMap<String, String>,
}

impl HttpClient {
    /// Create a client for the given base URL. `headers` ride along on
    /// every request.
    pub fn new(base_url: &str, headers: HashMap<String, String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            headers,
        }
    }

    fn decorate(&self, mut builder: RequestBuilder) -> RequestBuilder {
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        builder
    }

    /// Send a GET request to a relative API path (query string included).
    pub async fn get(&self, path: &str) -> Result<Response, reqwest::Error> {
        let url = format!("{}{}", self.base_url, path);
        self.decorate(self.client.get(&url)).send().await
    }

    /// Send a POST request with a JSON body to a relative API path.
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response, reqwest::Error> {
        let url = format!("{}{}", self.base_url, path);
        self.decorate(self.client.post(&url).json(body)).send().await
    }

    /// Send a PUT request with a JSON body to a relative API path.
    pub async fn put<T: Serialize>(&self, path: &str, body: &T) -> Result<Response, reqwest::Error> {
        let url = format!("{}{}", self.base_url, path);
        self.decorate(self.client.put(&url).json(body)).send().await
    }

    /// Send a DELETE request to a relative API path.
    pub async fn delete(&self, path: &str) -> Result<Response, reqwest::Error> {
        let url = format!("{}{}", self.base_url, path);
        self.decorate(self.client.delete(&url)).send().await
    }
}
