// Authenticated request gateway
// Wraps every outbound call: bearer attachment, expiry detection, a single
// silent renewal, and one replay

use std::sync::Arc;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, Response, StatusCode};

use crate::auth::{AccountApi, SessionManager};
use crate::config::Config;
use crate::error::ApiError;
use crate::request::{self, Body, RequestOptions};
use crate::store::CredentialStore;

/// Lifecycle of a single `execute` call.
///
/// Renewing is reachable only from the first attempt and Replaying is
/// terminal, so a call performs at most one renewal no matter what the
/// replay returns.
enum Attempt {
    /// First attempt with the stored token
    Attempting,
    /// 401 observed; renewal in progress
    Renewing { stale_token: String },
    /// Renewal succeeded; one replay with the fresh token
    Replaying { token: String },
}

/// Authenticated HTTP gateway over the MediBook API
pub struct ApiGateway {
    client: Client,
    session: Arc<SessionManager>,
    config: Config,
}

impl ApiGateway {
    /// Create a gateway over the given credential store.
    ///
    /// The client keeps a cookie jar so the server-managed refresh
    /// credential travels automatically with every request; the session
    /// manager shares this client because renewal must ride the same jar.
    pub fn new(config: Config, store: Arc<dyn CredentialStore>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let session = Arc::new(SessionManager::new(
            store,
            client.clone(),
            config.base_url.clone(),
        ));

        Ok(Self {
            client,
            session,
            config,
        })
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Account flows bound to the same cookie jar and credential store
    pub fn account(&self) -> AccountApi {
        AccountApi::new(
            self.session.store().clone(),
            self.client.clone(),
            self.config.base_url.clone(),
        )
    }

    /// Execute an authenticated request against a path relative to the base
    /// URL.
    ///
    /// Any HTTP status other than 401 is returned as-is for the caller to
    /// interpret. A 401 triggers one silent renewal and one replay; the
    /// replay's response is final even if it is another 401. When renewal
    /// itself fails the stored credentials are cleared and the call fails
    /// with `SessionExpired`.
    pub async fn execute(&self, path: &str, options: RequestOptions) -> Result<Response, ApiError> {
        let url = self.config.endpoint(path);

        let mut state = Attempt::Attempting;
        loop {
            match state {
                Attempt::Attempting => {
                    let token = self.session.access_token().await?;
                    let response = self.send(&url, &options, &token).await?;

                    if response.status() == StatusCode::UNAUTHORIZED {
                        tracing::warn!(url = %url, "Received 401, renewing session");
                        state = Attempt::Renewing { stale_token: token };
                    } else {
                        return Ok(response);
                    }
                }
                Attempt::Renewing { stale_token } => {
                    let token = self.session.renew(&stale_token).await?;
                    state = Attempt::Replaying { token };
                }
                Attempt::Replaying { token } => {
                    return self.send(&url, &options, &token).await;
                }
            }
        }
    }

    /// Build and send one attempt
    async fn send(
        &self,
        url: &str,
        options: &RequestOptions,
        token: &str,
    ) -> Result<Response, ApiError> {
        // Fresh header set per attempt: caller overrides, then the policy
        // defaults, then the bearer credential
        let mut headers: HeaderMap = options.headers.clone();
        request::apply_content_type(&mut headers, &options.method, &options.body);

        let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Invalid bearer token: {}", e)))?;
        headers.insert(AUTHORIZATION, bearer);

        let mut builder = self
            .client
            .request(options.method.clone(), url)
            .headers(headers);

        builder = match &options.body {
            Body::Empty => builder,
            Body::Json(value) => {
                let bytes = serde_json::to_vec(value)
                    .map_err(|e| ApiError::Internal(anyhow::anyhow!("Failed to encode body: {}", e)))?;
                builder.body(bytes)
            }
            Body::Bytes(bytes) => builder.body(bytes.clone()),
            Body::Multipart(form) => builder.multipart(form.to_form()?),
        };

        tracing::debug!(method = %options.method, url = %url, "Sending HTTP request");
        let response = builder.send().await?;
        tracing::debug!(status = %response.status(), "Received HTTP response");

        Ok(response)
    }

    // Thin verb helpers over `execute`

    pub async fn get(&self, path: &str) -> Result<Response, ApiError> {
        self.execute(path, RequestOptions::new(Method::GET)).await
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<Response, ApiError> {
        self.execute(path, RequestOptions::json(Method::POST, body))
            .await
    }

    pub async fn put_json(&self, path: &str, body: serde_json::Value) -> Result<Response, ApiError> {
        self.execute(path, RequestOptions::json(Method::PUT, body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Response, ApiError> {
        self.execute(path, RequestOptions::new(Method::DELETE))
            .await
    }
}
