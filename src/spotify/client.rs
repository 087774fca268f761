//! HTTP client for Spotify Web API requests.
//!
//! This module provides a low-level HTTP client wrapper for making requests
//! to the Spotify Web API, handling bearer authentication and turning failed
//! responses into classified errors.

use super::error::{classify, SpotifyError};
use super::models::ErrorResponse;
use log::*;
use reqwest::{header::RETRY_AFTER, Method, Response};
use serde::de::DeserializeOwned;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Supplies the current bearer token for each request.
///
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// Fixed token, mostly useful for tests and one-off scripts.
///
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn access_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Token shared between the client and the rest of the application, which
/// sets it after onboarding and clears it when the session expires.
///
#[derive(Clone, Default)]
pub struct SharedToken {
    inner: Arc<RwLock<Option<String>>>,
}

impl SharedToken {
    pub fn new(token: Option<String>) -> Self {
        SharedToken {
            inner: Arc::new(RwLock::new(token)),
        }
    }

    pub fn set(&self, token: String) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(token);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }
}

impl TokenProvider for SharedToken {
    fn access_token(&self) -> Option<String> {
        self.inner.read().ok().and_then(|guard| guard.clone())
    }
}

pub(crate) const NO_PARAMS: &[(&str, String)] = &[];

/// Invoked whenever a request fails with 401.
///
pub type UnauthorizedCallback = Arc<dyn Fn() + Send + Sync>;

/// Makes requests to Spotify and tries to conform response data to given model.
///
pub struct Client {
    pub(crate) base_url: String,
    token: Arc<dyn TokenProvider>,
    http_client: reqwest::Client,
    on_unauthorized: Option<UnauthorizedCallback>,
}

impl Client {
    /// Returns a new instance for the given base URL and token source.
    ///
    pub fn new(
        base_url: &str,
        token: Arc<dyn TokenProvider>,
        timeout: Duration,
    ) -> Result<Self, SpotifyError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SpotifyError::Other(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Client {
            base_url: base_url.trim_end_matches('/').to_owned(),
            token,
            http_client,
            on_unauthorized: None,
        })
    }

    /// Register the callback fired when Spotify rejects the token.
    ///
    pub fn with_unauthorized_callback(mut self, callback: UnauthorizedCallback) -> Self {
        self.on_unauthorized = Some(callback);
        self
    }

    /// Return model data for the path or error.
    ///
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, SpotifyError> {
        let response = self.call(Method::GET, path, params, None).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            error!(
                "Failed to deserialize response for '{}': {}. Body: {}",
                path,
                e,
                String::from_utf8_lossy(&bytes)
            );
            SpotifyError::from(e)
        })
    }

    /// Send a PUT request with a JSON body, discarding the response body.
    ///
    pub async fn put(&self, path: &str, body: serde_json::Value) -> Result<(), SpotifyError> {
        self.call(Method::PUT, path, NO_PARAMS, Some(body)).await?;
        Ok(())
    }

    /// Send a DELETE request with a JSON body, discarding the response body.
    ///
    pub async fn delete(&self, path: &str, body: serde_json::Value) -> Result<(), SpotifyError> {
        self.call(Method::DELETE, path, NO_PARAMS, Some(body)).await?;
        Ok(())
    }

    /// Make request and return the successful response or a classified error.
    ///
    async fn call(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<Response, SpotifyError> {
        let token = match self.token.access_token() {
            Some(token) => token,
            None => {
                warn!("No access token available for {} {}", method, path);
                self.notify_unauthorized();
                return Err(SpotifyError::Authentication {
                    message: "No access token".to_string(),
                });
            }
        };

        let request_url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("{} {} {:?}", method, request_url, params);

        let mut request = self
            .http_client
            .request(method, &request_url)
            .bearer_auth(token);
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let response_text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&response_text)
            .ok()
            .map(|body| body.error.message);

        let error = classify(status, retry_after, message);
        error!("API request to '{}' failed with status {}: {}", path, status, error);
        if error.is_authentication() {
            self.notify_unauthorized();
        }
        Err(error)
    }

    fn notify_unauthorized(&self) {
        if let Some(callback) = &self.on_unauthorized {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client(server: &MockServer, token: &str) -> Client {
        Client::new(
            &server.base_url(),
            Arc::new(StaticToken(token.to_string())),
            Duration::from_secs(10),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn get_sends_bearer_token_and_params() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/search")
                    .header("Authorization", "Bearer secret")
                    .query_param("q", "abba")
                    .query_param("type", "artist");
                then.status(200).json_body(json!({ "ok": true }));
            })
            .await;

        let value: Value = client(&server, "secret")
            .get(
                "search",
                &[("q", "abba".to_string()), ("type", "artist".to_string())],
            )
            .await
            .unwrap();
        assert_eq!(value["ok"], true);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_body_message_and_retry_after_are_captured() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/me");
                then.status(429)
                    .header("Retry-After", "2")
                    .json_body(json!({ "error": { "status": 429, "message": "API rate limit exceeded" } }));
            })
            .await;

        let result: Result<Value, _> = client(&server, "secret").get("me", &[]).await;
        match result {
            Err(SpotifyError::RateLimited {
                retry_after,
                message,
            }) => {
                assert_eq!(retry_after, Some(Duration::from_secs(2)));
                assert_eq!(message, "API rate limit exceeded");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unauthorized_fires_callback() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/me");
                then.status(401).json_body(
                    json!({ "error": { "status": 401, "message": "The access token expired" } }),
                );
            })
            .await;

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let client = client(&server, "expired").with_unauthorized_callback(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let result: Result<Value, _> = client.get("me", &[]).await;
        assert!(matches!(result, Err(SpotifyError::Authentication { .. })));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_token_fails_without_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/me");
                then.status(200).json_body(json!({}));
            })
            .await;

        let client = Client::new(
            &server.base_url(),
            Arc::new(SharedToken::new(None)),
            Duration::from_secs(10),
        )
        .unwrap();
        let result: Result<Value, _> = client.get("me", &[]).await;
        assert!(matches!(result, Err(SpotifyError::Authentication { .. })));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn connection_failure_is_network_error() {
        let client = Client::new(
            "http://127.0.0.1:9",
            Arc::new(StaticToken("secret".to_string())),
            Duration::from_secs(1),
        )
        .unwrap();
        let result: Result<Value, _> = client.get("me", &[]).await;
        assert!(matches!(result, Err(SpotifyError::Network(_))));
    }

    #[tokio::test]
    async fn put_sends_json_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("PUT")
                    .path("/me/albums")
                    .json_body(json!({ "ids": ["a1", "a2"] }));
                then.status(200);
            })
            .await;

        client(&server, "secret")
            .put("me/albums", json!({ "ids": ["a1", "a2"] }))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn shared_token_set_and_clear() {
        let token = SharedToken::new(None);
        assert_eq!(token.access_token(), None);
        token.set("abc".to_string());
        assert_eq!(token.clone().access_token(), Some("abc".to_string()));
        token.clear();
        assert_eq!(token.access_token(), None);
    }
}
