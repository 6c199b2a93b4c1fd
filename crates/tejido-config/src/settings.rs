use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::io::ErrorKind;

use crate::paths::{ConfigError, TejidoPaths};

/// Lee una sección del `tejido.toml`. Si el archivo o la sección no existen
/// se devuelve el `Default` del tipo.
fn load_section_with_default<T>(paths: &TejidoPaths, section: &str) -> Result<T, ConfigError>
where
  T: DeserializeOwned + Default,
{
  let path = paths.config_file();
  let content = match std::fs::read_to_string(&path) {
    Ok(c) => c,
    Err(e) if e.kind() == ErrorKind::NotFound => {
      return Ok(T::default());
    }
    Err(e) => return Err(e.into()),
  };

  let toml_val: toml::Value = toml::from_str(&content)?;

  let Some(table) = toml_val.get(section) else {
    return Ok(T::default());
  };

  let t: T = table
    .clone()
    .try_into()
    .map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))?;

  Ok(t)
}

fn default_api_base() -> String {
  "https://api.spotify.com/v1".to_string()
}

fn default_token_url() -> String {
  "https://accounts.spotify.com/api/token".to_string()
}

/// Credenciales y endpoints del catálogo.
///
/// Las credenciales se buscan primero en variables de entorno
/// (`TEJIDO_CLIENT_ID` / `TEJIDO_CLIENT_SECRET`) y después en la sección
/// `[catalog]` de `tejido.toml`. Si faltan, el arranque es fatal:
/// sin credenciales no hay nada útil que hacer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogSettings {
  #[serde(default)]
  pub client_id: String,
  #[serde(default)]
  pub client_secret: String,
  #[serde(default = "default_api_base")]
  pub api_base: String,
  #[serde(default = "default_token_url")]
  pub token_url: String,
}

impl CatalogSettings {
  pub fn load(paths: &TejidoPaths) -> Result<Self, ConfigError> {
    let mut settings: CatalogSettings = load_section_with_default(paths, "catalog")?;

    if let Ok(id) = std::env::var("TEJIDO_CLIENT_ID") {
      settings.client_id = id;
    }
    if let Ok(secret) = std::env::var("TEJIDO_CLIENT_SECRET") {
      settings.client_secret = secret;
    }
    if settings.api_base.is_empty() {
      settings.api_base = default_api_base();
    }
    if settings.token_url.is_empty() {
      settings.token_url = default_token_url();
    }

    if settings.client_id.is_empty() || settings.client_secret.is_empty() {
      return Err(ConfigError::MissingCredentials);
    }

    Ok(settings)
  }
}

fn default_page_size() -> u32 {
  20
}

fn default_batch_limit() -> usize {
  50
}

fn default_max_retries() -> u32 {
  4
}

fn default_request_timeout_secs() -> u64 {
  10
}

fn default_crawl_deadline_secs() -> u64 {
  300
}

fn default_track_workers() -> usize {
  4
}

/// Parámetros del crawler. Los defaults reproducen los límites del catálogo
/// de referencia: páginas de 20 releases y lotes de detalle de 50 artistas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerSettings {
  #[serde(default = "default_page_size")]
  pub page_size: u32,
  #[serde(default = "default_batch_limit")]
  pub batch_limit: usize,
  #[serde(default = "default_max_retries")]
  pub max_retries: u32,
  #[serde(default = "default_request_timeout_secs")]
  pub request_timeout_secs: u64,
  #[serde(default = "default_crawl_deadline_secs")]
  pub crawl_deadline_secs: u64,
  #[serde(default = "default_track_workers")]
  pub track_workers: usize,
}

impl Default for CrawlerSettings {
  fn default() -> Self {
    Self {
      page_size: default_page_size(),
      batch_limit: default_batch_limit(),
      max_retries: default_max_retries(),
      request_timeout_secs: default_request_timeout_secs(),
      crawl_deadline_secs: default_crawl_deadline_secs(),
      track_workers: default_track_workers(),
    }
  }
}

impl CrawlerSettings {
  pub fn load(paths: &TejidoPaths) -> Result<Self, ConfigError> {
    load_section_with_default(paths, "crawler")
  }
}
