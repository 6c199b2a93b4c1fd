// crates/tejido-core/src/errors.rs
use thiserror::Error;

/// Error terminal del núcleo de Tejido.
///
/// Las capas superiores (CLI, dashboard, etc.) deberían mapear este error
/// a mensajes de usuario o logs. Los fallos recuperables (releases con
/// fechas corruptas, snapshots ilegibles) nunca llegan aquí: se resuelven
/// dentro del crawler.
#[derive(Debug, Error)]
pub enum CollabError {
  /// Credenciales ausentes o configuración inválida. Fatal en el arranque.
  #[error("configuration error: {0}")]
  Configuration(String),

  /// El catálogo rechazó las credenciales. No se reintenta.
  #[error("catalog rejected credentials: {0}")]
  Auth(String),

  /// Fallo transitorio que agotó sus reintentos internos.
  #[error("catalog fetch failed: {0}")]
  Fetch(String),

  /// El artista no pudo resolverse a un ID del catálogo.
  #[error("artist not found: {0}")]
  NotFound(String),

  /// Fallo al persistir o leer el snapshot del crawl.
  #[error("cache error: {0}")]
  Cache(String),

  /// El crawl completo superó su techo de tiempo configurado.
  #[error("crawl exceeded its configured deadline")]
  Timeout,
}
