// Session renewal call

use anyhow::{Context, Result};
use reqwest::Client;

use super::types::RefreshResponse;

/// Fixed renewal path on the API
pub const REFRESH_PATH: &str = "/users/refresh-token";

/// Exchange the cookie-borne refresh credential for a new access token.
///
/// The refresh credential rides the client's cookie jar; the call carries no
/// body and no Authorization header. Any failure here - transport error,
/// non-2xx status, malformed payload - means the session cannot be renewed.
pub async fn renew_access_token(client: &Client, base_url: &str) -> Result<String> {
    let url = format!("{}{}", base_url, REFRESH_PATH);
    tracing::debug!(url = %url, "Renewing access token");

    let response = client
        .post(&url)
        .send()
        .await
        .context("Failed to send renewal request")?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        anyhow::bail!("Renewal failed: {} - {}", status, error_text);
    }

    let data: RefreshResponse = response
        .json()
        .await
        .context("Failed to parse renewal response")?;

    if data.access_token.is_empty() {
        anyhow::bail!("Renewal response does not contain accessToken");
    }

    tracing::info!("Access token renewed");
    Ok(data.access_token)
}
