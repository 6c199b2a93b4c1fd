use std::time::Duration;

use async_trait::async_trait;

use crate::collab::{ArtistId, ArtistProfile, ReleaseId, ReleaseKind, ReleaseSummary, TrackCredit, TrackId};

/// Una página de la discografía de un artista.
///
/// El cursor es opaco para el dominio: el adapter decide si es un offset,
/// un token del servidor, etc. `None` significa que no hay más páginas.
#[derive(Debug, Clone)]
pub struct ReleasePage {
  pub items: Vec<ReleaseSummary>,
  pub next_cursor: Option<String>,
}

/// Pista tal como llega del catálogo, antes de convertirse en `Track`.
///
/// No trae grupos de colaboración: eso lo construye el crawler al agregar.
#[derive(Debug, Clone)]
pub struct CatalogTrack {
  pub id: TrackId,
  pub name: String,
  pub url: String,
  pub thumbnail_url: Option<String>,
  pub preview_url: Option<String>,
  pub credited: Vec<TrackCredit>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
  #[error("not found: {0}")]
  NotFound(String),

  /// El catálogo pidió bajar el ritmo. `retry_after` es la espera sugerida
  /// por el servidor, si la envió.
  #[error("rate limited by the catalog")]
  RateLimited { retry_after: Option<Duration> },

  #[error("authentication rejected: {0}")]
  Auth(String),

  #[error("network error: {0}")]
  Network(String),
}

impl CatalogError {
  /// ¿Tiene sentido reintentar esta operación?
  pub fn is_retryable(&self) -> bool {
    matches!(self, CatalogError::RateLimited { .. } | CatalogError::Network(_))
  }
}

/// Port del catálogo musical.
///
/// El adapter es responsable de autenticación, timeouts por petición y
/// reintentos con backoff: cuando una operación devuelve `RateLimited` o
/// `Network` aquí, ya agotó su presupuesto de reintentos y el error es
/// terminal para el crawl.
#[async_trait]
pub trait CatalogClient: Send + Sync {
  async fn get_artist(&self, id: &ArtistId) -> Result<ArtistProfile, CatalogError>;

  /// Una página de releases del artista, filtrada por tipos.
  async fn list_releases(
    &self,
    artist: &ArtistId,
    kinds: &[ReleaseKind],
    cursor: Option<&str>,
  ) -> Result<ReleasePage, CatalogError>;

  /// Todas las pistas de un release, con sus créditos id/nombre.
  async fn list_tracks(&self, release: &ReleaseId) -> Result<Vec<CatalogTrack>, CatalogError>;

  /// Detalle de hasta `batch_limit` artistas en una sola llamada.
  async fn get_artists_batch(&self, ids: &[ArtistId]) -> Result<Vec<ArtistProfile>, CatalogError>;

  /// Búsqueda por texto libre, ordenada por relevancia.
  async fn search_artist(&self, query: &str, limit: usize) -> Result<Vec<ArtistProfile>, CatalogError>;
}
