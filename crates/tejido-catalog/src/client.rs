use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url, header};
use serde::de::DeserializeOwned;
use tracing::debug;

use tejido_config::{CatalogSettings, CrawlerSettings};
use tejido_core::CollabError;
use tejido_core::collab::{ArtistId, ArtistProfile, ReleaseId, ReleaseKind};
use tejido_core::ports::{CatalogClient, CatalogError, CatalogTrack, ReleasePage};

use crate::auth::TokenManager;
use crate::dto::{
  AlbumDetailObject, AlbumSummaryObject, ArtistObject, ArtistsEnvelope, PagingObject,
  SearchEnvelope,
};
use crate::retry::{RetryPolicy, with_retry};

/// Adapter HTTP del port `CatalogClient` sobre la Web API del catálogo.
///
/// Cada operación pasa por el presupuesto de reintentos: los errores que
/// salen de aquí ya son terminales para quien llama.
#[derive(Debug)]
pub struct HttpCatalogClient {
  http: reqwest::Client,
  auth: TokenManager,
  api_base: String,
  page_size: u32,
  retry: RetryPolicy,
}

impl HttpCatalogClient {
  /// Valida los endpoints configurados y construye el cliente. Una URL
  /// ilegible en la configuración es fatal en el arranque, no un fallo de
  /// red a mitad de crawl.
  pub fn new(settings: CatalogSettings, crawler: &CrawlerSettings) -> Result<Self, CollabError> {
    let api_base = settings.api_base.trim_end_matches('/').to_string();
    Url::parse(&api_base)
      .map_err(|e| CollabError::Configuration(format!("invalid api_base `{api_base}`: {e}")))?;
    Url::parse(&settings.token_url).map_err(|e| {
      CollabError::Configuration(format!("invalid token_url `{}`: {e}", settings.token_url))
    })?;

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(crawler.request_timeout_secs))
      .user_agent(concat!("tejido/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| CollabError::Configuration(format!("http client: {e}")))?;

    let auth = TokenManager::new(http.clone(), settings);

    Ok(Self {
      http,
      auth,
      api_base,
      page_size: crawler.page_size,
      retry: RetryPolicy { max_attempts: crawler.max_retries, ..RetryPolicy::default() },
    })
  }

  fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, CatalogError> {
    let mut url = Url::parse(&format!("{}/{path}", self.api_base))
      .map_err(|e| CatalogError::Network(format!("invalid endpoint {path}: {e}")))?;

    if !query.is_empty() {
      let mut pairs = url.query_pairs_mut();
      for (key, value) in query {
        pairs.append_pair(key, value);
      }
    }

    Ok(url)
  }

  async fn get_json<T>(&self, url: Url) -> Result<T, CatalogError>
  where
    T: DeserializeOwned,
  {
    let bearer = self.auth.bearer().await?;

    debug!(%url, "catalog request");

    let response = self
      .http
      .get(url.clone())
      .bearer_auth(bearer)
      .send()
      .await
      .map_err(|e| CatalogError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    match status {
      status if status.is_success() => {}
      StatusCode::TOO_MANY_REQUESTS => {
        let retry_after = response
          .headers()
          .get(header::RETRY_AFTER)
          .and_then(|v| v.to_str().ok())
          .and_then(|v| v.parse::<u64>().ok())
          .map(Duration::from_secs);
        return Err(CatalogError::RateLimited { retry_after });
      }
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
        return Err(CatalogError::Auth(format!("catalog returned {status}")));
      }
      StatusCode::NOT_FOUND => return Err(CatalogError::NotFound(url.to_string())),
      status => return Err(CatalogError::Network(format!("{url} returned {status}"))),
    }

    response.json::<T>().await.map_err(|e| CatalogError::Network(format!("decode {url}: {e}")))
  }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
  async fn get_artist(&self, id: &ArtistId) -> Result<ArtistProfile, CatalogError> {
    let url = self.endpoint(&format!("artists/{id}"), &[])?;
    let artist: ArtistObject = with_retry(&self.retry, "get_artist", || self.get_json(url.clone())).await?;

    Ok(artist.into_profile())
  }

  async fn list_releases(
    &self,
    artist: &ArtistId,
    kinds: &[ReleaseKind],
    cursor: Option<&str>,
  ) -> Result<ReleasePage, CatalogError> {
    // El cursor es nuestro propio offset serializado; uno ilegible equivale
    // a empezar de cero.
    let offset: u32 = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
    let include_groups =
      kinds.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(",");

    let url = self.endpoint(
      &format!("artists/{artist}/albums"),
      &[
        ("include_groups", include_groups),
        ("limit", self.page_size.to_string()),
        ("offset", offset.to_string()),
      ],
    )?;

    let page: PagingObject<AlbumSummaryObject> =
      with_retry(&self.retry, "list_releases", || self.get_json(url.clone())).await?;

    let next_cursor = page.next.as_ref().map(|_| (offset + self.page_size).to_string());

    Ok(ReleasePage {
      items: page.items.into_iter().map(AlbumSummaryObject::into_summary).collect(),
      next_cursor,
    })
  }

  async fn list_tracks(&self, release: &ReleaseId) -> Result<Vec<CatalogTrack>, CatalogError> {
    // El detalle del álbum trae portada y pistas en una sola llamada.
    let url = self.endpoint(&format!("albums/{release}"), &[])?;
    let album: AlbumDetailObject =
      with_retry(&self.retry, "list_tracks", || self.get_json(url.clone())).await?;

    let thumbnail = album.images.into_iter().next().map(|i| i.url);

    Ok(
      album
        .tracks
        .items
        .into_iter()
        .map(|t| t.into_catalog_track(thumbnail.clone()))
        .collect(),
    )
  }

  async fn get_artists_batch(&self, ids: &[ArtistId]) -> Result<Vec<ArtistProfile>, CatalogError> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let joined = ids.iter().map(|i| i.as_str()).collect::<Vec<_>>().join(",");
    let url = self.endpoint("artists", &[("ids", joined)])?;

    let envelope: ArtistsEnvelope =
      with_retry(&self.retry, "get_artists_batch", || self.get_json(url.clone())).await?;

    Ok(envelope.artists.into_iter().flatten().map(ArtistObject::into_profile).collect())
  }

  async fn search_artist(&self, query: &str, limit: usize) -> Result<Vec<ArtistProfile>, CatalogError> {
    let url = self.endpoint(
      "search",
      &[
        ("q", query.to_string()),
        ("type", "artist".to_string()),
        ("limit", limit.to_string()),
      ],
    )?;

    let envelope: SearchEnvelope =
      with_retry(&self.retry, "search_artist", || self.get_json(url.clone())).await?;

    Ok(envelope.artists.items.into_iter().map(ArtistObject::into_profile).collect())
  }
}
