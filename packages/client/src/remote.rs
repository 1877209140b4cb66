use std::time::Duration;

use async_trait::async_trait;
use brandkit_types::{ErrorResponse, ThemeSettings, ThemeUpdate};
use reqwest::{StatusCode, Url};
use tracing::instrument;

use crate::{config::Config, error::RemoteError};

pub const THEME_PATH: &str = "theme";

/// Where the canonical settings live
#[async_trait]
pub trait ThemeRemote: Send + Sync + 'static {
    /// The current settings, with any missing fields filled by defaults
    async fn fetch(&self) -> Result<ThemeSettings, RemoteError>;

    /// Merges the update remotely and returns the full stored object
    async fn persist(&self, update: &ThemeUpdate) -> Result<ThemeSettings, RemoteError>;
}

pub struct HttpRemote {
    inner: reqwest::Client,
    theme_url: Url,
    bearer_token: Option<String>,
}

impl HttpRemote {
    pub fn new(config: &Config) -> Result<Self, RemoteError> {
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        // a trailing slash keeps any path prefix on the endpoint when joining
        let mut endpoint = config.endpoint.clone();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let theme_url = Url::parse(&endpoint)?.join(THEME_PATH)?;

        Ok(Self {
            inner,
            theme_url,
            bearer_token: config.bearer_token.clone(),
        })
    }

    pub fn theme_url(&self) -> &Url {
        &self.theme_url
    }

    async fn into_settings(response: reqwest::Response) -> Result<ThemeSettings, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        // error bodies are `{ "error": ... }` but fall back to the raw text
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|body| body.error)
            .unwrap_or(text);

        Err(match status {
            StatusCode::CONFLICT => RemoteError::Conflict(message),
            status => RemoteError::Status {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl ThemeRemote for HttpRemote {
    #[instrument(level = "debug", skip(self), fields(subsys = "ThemeRemote"))]
    async fn fetch(&self) -> Result<ThemeSettings, RemoteError> {
        let response = self.inner.get(self.theme_url.clone()).send().await?;
        Self::into_settings(response).await
    }

    #[instrument(level = "debug", skip(self), fields(subsys = "ThemeRemote"))]
    async fn persist(&self, update: &ThemeUpdate) -> Result<ThemeSettings, RemoteError> {
        let mut request = self.inner.put(self.theme_url.clone()).json(update);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        Self::into_settings(request.send().await?).await
    }
}
