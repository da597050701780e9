//! filedrop HTTP client implementation

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{ClientError, Result};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for a filedrop upload server
#[derive(Debug, Clone)]
pub struct FiledropClient {
    client: Client,
    base_url: Url,
}

impl FiledropClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the server (e.g., "http://localhost:8080")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a new client with custom timeouts
    pub fn with_config(
        base_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        let base_url = Url::parse(base_url)?;

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get a reference to the underlying HTTP client.
    ///
    /// Useful for sending requests the typed methods don't cover.
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Check server health
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<String> {
        let url = self.base_url.join("/health")?;
        let response = self.client.get(url).send().await?;
        Self::handle_text(response).await
    }

    /// Upload bytes as a single file part
    ///
    /// Returns the server's confirmation text.
    #[instrument(skip(self, data))]
    pub async fn upload(
        &self,
        route: &str,
        field: &str,
        file_name: &str,
        data: impl Into<Vec<u8>>,
    ) -> Result<String> {
        let part = Part::bytes(data.into()).file_name(file_name.to_string());
        let form = Form::new().part(field.to_string(), part);
        self.post_form(route, form).await
    }

    /// Upload a local file under its own file name
    #[instrument(skip(self))]
    pub async fn upload_path(&self, route: &str, field: &str, path: &Path) -> Result<String> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ClientError::InvalidPath(path.display().to_string()))?
            .to_string();
        let data = tokio::fs::read(path).await?;

        self.upload(route, field, &file_name, data).await
    }

    /// POST an arbitrary multipart form to `route`
    pub async fn post_form(&self, route: &str, form: Form) -> Result<String> {
        let url = self.base_url.join(route)?;
        debug!("Uploading to {}", url);

        let response = self.client.post(url).multipart(form).send().await?;
        Self::handle_text(response).await
    }

    async fn handle_text(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(ClientError::server_error(status.as_u16(), body.trim_end()))
        }
    }
}
