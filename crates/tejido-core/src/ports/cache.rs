use crate::collab::{ArtistId, CrawlResult};

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
  #[error("io error: {0}")]
  Io(String),

  /// El snapshot persistido no se pudo decodificar. El crawler lo trata
  /// como un miss y vuelve a crawlear.
  #[error("corrupt snapshot: {0}")]
  Corrupt(String),
}

/// Port del store de snapshots por artista.
///
/// `put` debe ser atómico respecto a lectores concurrentes: ningún `get`
/// puede observar un snapshot a medio escribir. La implementación típica
/// es escribir a un temporal y renombrar.
pub trait CacheStore: Send + Sync {
  fn get(&self, id: &ArtistId) -> Result<Option<CrawlResult>, CacheError>;
  fn put(&self, id: &ArtistId, result: &CrawlResult) -> Result<(), CacheError>;
}
