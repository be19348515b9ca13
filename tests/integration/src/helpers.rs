//! Test helpers for integration tests
//!
//! Provides a test server bound to an ephemeral port and thin request
//! wrappers that attach bearer tokens.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use gather_api::{create_app, create_app_state, AppState};
use gather_common::AppConfig;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    state: AppState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server backed by a fresh in-memory store
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url(), path)
    }

    /// Mint an access token for `email` with the server's signing key
    pub fn token(&self, email: &str) -> Result<String> {
        Ok(self.state.jwt_service().issue_access_token(email)?)
    }

    fn authed(&self, builder: RequestBuilder, email: &str) -> Result<RequestBuilder> {
        Ok(builder.bearer_auth(self.token(email)?))
    }

    /// GET outside the API prefix (health endpoints)
    pub async fn get_raw(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make an unauthenticated POST request without a body
    pub async fn post_anonymous(&self, path: &str) -> Result<Response> {
        Ok(self.client.post(self.url(path)).send().await?)
    }

    /// Make a GET request as `email`
    pub async fn get_as(&self, path: &str, email: &str) -> Result<Response> {
        let request = self.authed(self.client.get(self.url(path)), email)?;
        Ok(request.send().await?)
    }

    /// Make a POST request without a body as `email`
    pub async fn post_empty_as(&self, path: &str, email: &str) -> Result<Response> {
        let request = self.authed(self.client.post(self.url(path)), email)?;
        Ok(request.send().await?)
    }

    /// Make a POST request with a JSON body as `email`
    pub async fn post_as<T: Serialize>(&self, path: &str, email: &str, body: &T) -> Result<Response> {
        let request = self.authed(self.client.post(self.url(path)), email)?;
        Ok(request.json(body).send().await?)
    }

    /// Make a PATCH request with a JSON body as `email`
    pub async fn patch_as<T: Serialize>(&self, path: &str, email: &str, body: &T) -> Result<Response> {
        let request = self.authed(self.client.patch(self.url(path)), email)?;
        Ok(request.json(body).send().await?)
    }
}

/// Configuration pointing at the in-memory store
pub fn test_config() -> Result<AppConfig> {
    let config = AppConfig::from_lookup(|key| match key {
        "API_PORT" => Some("0".to_string()),
        "DATABASE_URL" => Some("memory://".to_string()),
        "JWT_SECRET" => Some("integration-test-secret".to_string()),
        _ => None,
    })
    .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    Ok(config)
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {}, got {}. Body: {}", expected_status, status, body);
    }
    Ok(response.json().await?)
}

/// Assert response status and return the error code from the body
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: crate::fixtures::ErrorBody = assert_json(response, expected_status).await?;
    Ok(body.error.code)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {}, got {}. Body: {}", expected_status, status, body);
    }
    Ok(())
}
