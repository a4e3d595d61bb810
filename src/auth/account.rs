// Account flows
// The only writers of the cached profile: on every successful
// authentication the token and the profile are stored together

use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;

use super::types::{AuthResponse, LoginRequest, RegisterRequest, UserProfile, VerifyRequest};
use crate::error::ApiError;
use crate::store::{CredentialStore, ACCESS_TOKEN_KEY, USER_KEY};

pub const LOGIN_PATH: &str = "/users/login";
pub const REGISTER_PATH: &str = "/users/register";
pub const VERIFY_PATH: &str = "/users/verify";
pub const LOGOUT_PATH: &str = "/users/logout";

/// Explicit authentication flows: login, registration, verification, logout
pub struct AccountApi {
    store: Arc<dyn CredentialStore>,
    client: Client,
    base_url: String,
}

impl AccountApi {
    pub fn new(store: Arc<dyn CredentialStore>, client: Client, base_url: impl Into<String>) -> Self {
        Self {
            store,
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.authenticate(LOGIN_PATH, &request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, ApiError> {
        self.authenticate(REGISTER_PATH, request).await
    }

    /// Confirm the emailed one-time code for a new account
    pub async fn verify(&self, email: &str, code: &str) -> Result<UserProfile, ApiError> {
        let request = VerifyRequest {
            email: email.to_string(),
            code: code.to_string(),
        };
        self.authenticate(VERIFY_PATH, &request).await
    }

    /// End the session server-side and drop local credentials.
    ///
    /// Local credentials are cleared even when the server call fails: the
    /// user asked to be logged out and must not stay authenticated on-device.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = format!("{}{}", self.base_url, LOGOUT_PATH);
        match self.client.post(&url).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!("Logged out");
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "Server-side logout failed");
            }
            Err(e) => {
                tracing::warn!("Server-side logout unreachable: {}", e);
            }
        }

        self.store
            .remove(&[ACCESS_TOKEN_KEY, USER_KEY])
            .await
            .map_err(ApiError::Store)
    }

    /// Profile snapshot from the last successful authentication, if any
    pub async fn cached_profile(&self) -> Result<Option<UserProfile>, ApiError> {
        let raw = self.store.get(USER_KEY).await.map_err(ApiError::Store)?;
        match raw {
            None => Ok(None),
            Some(json) => {
                let profile = serde_json::from_str(&json)
                    .map_err(|e| ApiError::Internal(anyhow::anyhow!("Corrupt cached profile: {}", e)))?;
                Ok(Some(profile))
            }
        }
    }

    async fn authenticate<T: Serialize>(
        &self,
        path: &str,
        request: &T,
    ) -> Result<UserProfile, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Authenticating");

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Authentication rejected");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let auth: AuthResponse = response.json().await?;

        // Token and profile are replaced together
        let profile_json = serde_json::to_string(&auth.user)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Failed to encode profile: {}", e)))?;
        self.store
            .set(ACCESS_TOKEN_KEY, &auth.access_token)
            .await
            .map_err(ApiError::Store)?;
        self.store
            .set(USER_KEY, &profile_json)
            .await
            .map_err(ApiError::Store)?;

        tracing::info!(user = %auth.user.id, "Authenticated");
        Ok(auth.user)
    }
}
