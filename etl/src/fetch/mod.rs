//! HTTP retrieval of the source page.
//!
//! One GET, no retries: a transport error or a non-2xx status ends the run.

use std::time::Duration;

use reqwest::Client;

use crate::config::EtlConfig;
use crate::error::{FetchError, FetchResult};

/// Thin wrapper over a configured `reqwest` client.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Client with the timeout and user agent from `config`.
    pub fn from_config(config: &EtlConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|source| FetchError::Request {
                url: config.url.clone(),
                source,
            })?;
        Ok(Self::new(client))
    }

    /// GET `url` and return the body as text.
    pub async fn fetch(&self, url: &str) -> FetchResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    use axum::{http::StatusCode, response::Html, routing::get, Router};

    /// Serve `body` with `status` at `/page` on an ephemeral port; returns the URL.
    pub async fn serve(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route("/page", get(move || async move { (status, Html(body)) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/page", addr)
    }
}
