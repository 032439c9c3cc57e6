use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use frivolo_core::config::BackendConfig;
use frivolo_core::error::{FrivoloError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin HTTP client for a PostgREST endpoint.
///
/// Every request carries the `apikey` and bearer headers when a key is
/// configured, and asks the backend to echo written rows back.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds a client from the `[backend]` section.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| FrivoloError::config("backend.url is not set"))?;

        let mut client = Self::new(url.trim()).with_timeout(Duration::from_secs(config.timeout_secs));
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            client = client.with_api_key(key);
        }
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, table);
        let mut request = self
            .client
            .request(method, &url)
            .header("Accept", "application/json")
            .timeout(self.timeout);

        if let Some(api_key) = &self.api_key {
            request = request
                .header("apikey", api_key)
                .header("Authorization", format!("Bearer {}", api_key));
        }
        request
    }

    /// `GET /<table>?select=*&<filters>`
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>> {
        self.select_columns(table, "*", filters).await
    }

    /// `GET /<table>?select=<columns>&<filters>`
    pub async fn select_columns<T: DeserializeOwned>(
        &self,
        table: &str,
        columns: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let request = self
            .request(Method::GET, table)
            .query(&[("select", columns)])
            .query(filters);
        let response = send(request, "select", table).await?;
        read_rows(response, "select", table).await
    }

    /// `POST /<table>` with the given `Prefer` directives added to
    /// `return=representation`.
    pub async fn insert<T, B>(
        &self,
        table: &str,
        query: &[(&str, String)],
        prefer: &[&str],
        body: &B,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self
            .request(Method::POST, table)
            .query(query)
            .header("Prefer", prefer_header(prefer))
            .json(body);
        let response = send(request, "insert", table).await?;
        read_rows(response, "insert", table).await
    }

    /// `PATCH /<table>?<filters>`
    pub async fn update<T, B>(&self, table: &str, filters: &[(&str, String)], body: &B) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self
            .request(Method::PATCH, table)
            .query(filters)
            .header("Prefer", prefer_header(&[]))
            .json(body);
        let response = send(request, "update", table).await?;
        read_rows(response, "update", table).await
    }

    /// `DELETE /<table>?<filters>`
    pub async fn delete(&self, table: &str, filters: &[(&str, String)]) -> Result<()> {
        let request = self.request(Method::DELETE, table).query(filters);
        let response = send(request, "delete", table).await?;
        check_status(response, "delete", table).await?;
        Ok(())
    }
}

/// PostgREST equality filter.
pub(crate) fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

fn prefer_header(extra: &[&str]) -> String {
    std::iter::once("return=representation")
        .chain(extra.iter().copied())
        .collect::<Vec<_>>()
        .join(",")
}

async fn send(request: RequestBuilder, op: &str, table: &str) -> Result<Response> {
    request.send().await.map_err(|e| {
        FrivoloError::backend(
            e.status().map(|s| s.as_u16()),
            format!("{} on '{}' failed: {}", op, table, e),
        )
    })
}

async fn check_status(response: Response, op: &str, table: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        debug!("[RestClient] {} on '{}' -> {}", op, table, status);
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(FrivoloError::backend(
        Some(status.as_u16()),
        format!("{} on '{}' returned {}: {}", op, table, status, error_text),
    ))
}

async fn read_rows<T: DeserializeOwned>(response: Response, op: &str, table: &str) -> Result<Vec<T>> {
    let response = check_status(response, op, table).await?;
    let body = response.text().await.map_err(|e| {
        FrivoloError::backend(None, format!("{} on '{}': failed to read body: {}", op, table, e))
    })?;
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&body)?)
}
