use serde::{Deserialize, Serialize};
use std::fmt;

/// Identificador canónico de un artista dentro del catálogo.
///
/// Es una cadena opaca: Tejido nunca interpreta su contenido, solo la usa
/// como clave. Las URLs de perfil se normalizan a esta forma en el resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistId(String);

impl ArtistId {
  pub fn new(id: impl Into<String>) -> Self {
    ArtistId(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for ArtistId {
  fn from(s: &str) -> Self {
    ArtistId(s.to_string())
  }
}

impl From<String> for ArtistId {
  fn from(s: String) -> Self {
    ArtistId(s)
  }
}

impl fmt::Display for ArtistId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Identificador opaco de una pista del catálogo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
  pub fn new(id: impl Into<String>) -> Self {
    TrackId(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for TrackId {
  fn from(s: &str) -> Self {
    TrackId(s.to_string())
  }
}

impl From<String> for TrackId {
  fn from(s: String) -> Self {
    TrackId(s)
  }
}

impl fmt::Display for TrackId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Identificador opaco de un release (álbum, single, aparición).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseId(String);

impl ReleaseId {
  pub fn new(id: impl Into<String>) -> Self {
    ReleaseId(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for ReleaseId {
  fn from(s: &str) -> Self {
    ReleaseId(s.to_string())
  }
}

impl From<String> for ReleaseId {
  fn from(s: String) -> Self {
    ReleaseId(s)
  }
}

impl fmt::Display for ReleaseId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}
