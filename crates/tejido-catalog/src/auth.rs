use std::time::{Duration, Instant};

use reqwest::StatusCode;
use tokio::sync::Mutex;
use tracing::debug;

use tejido_config::CatalogSettings;
use tejido_core::ports::CatalogError;

use crate::dto::TokenResponse;

/// Margen antes de la expiración real en el que ya renovamos el token.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct TokenState {
  bearer: String,
  expires_at: Instant,
}

/// Client-credentials token manager.
///
/// The token is fetched lazily on the first request and cached until it is
/// about to expire. The mutex serializes refreshes so concurrent callers do
/// not stampede the token endpoint.
#[derive(Debug)]
pub struct TokenManager {
  http: reqwest::Client,
  settings: CatalogSettings,
  state: Mutex<Option<TokenState>>,
}

impl TokenManager {
  pub fn new(http: reqwest::Client, settings: CatalogSettings) -> Self {
    Self { http, settings, state: Mutex::new(None) }
  }

  pub async fn bearer(&self) -> Result<String, CatalogError> {
    let mut state = self.state.lock().await;

    if let Some(current) = state.as_ref() {
      if current.expires_at > Instant::now() {
        return Ok(current.bearer.clone());
      }
    }

    debug!(token_url = %self.settings.token_url, "requesting fresh access token");

    let response = self
      .http
      .post(&self.settings.token_url)
      .basic_auth(&self.settings.client_id, Some(&self.settings.client_secret))
      .form(&[("grant_type", "client_credentials")])
      .send()
      .await
      .map_err(|e| CatalogError::Network(format!("token request: {e}")))?;

    match response.status() {
      status if status.is_success() => {}
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
        return Err(CatalogError::Auth("client credentials rejected".into()));
      }
      status => {
        return Err(CatalogError::Network(format!("token endpoint returned {status}")));
      }
    }

    let token: TokenResponse = response
      .json()
      .await
      .map_err(|e| CatalogError::Network(format!("token decode: {e}")))?;

    let expires_at =
      Instant::now() + Duration::from_secs(token.expires_in.saturating_sub(EXPIRY_MARGIN.as_secs()));
    let bearer = token.access_token.clone();

    *state = Some(TokenState { bearer: token.access_token, expires_at });

    Ok(bearer)
  }
}
