use tracing::debug;

use crate::collab::ArtistId;
use crate::errors::CollabError;
use crate::ports::{CatalogClient, CatalogError};

/// Reglas para normalizar la entrada libre del usuario a un ID canónico.
#[derive(Debug, Clone)]
pub struct ResolverRules {
  /// Prefijo de las URLs de perfil del catálogo.
  pub profile_url_prefix: String,
  /// Longitud fija del token de ID del catálogo.
  pub id_length: usize,
}

impl Default for ResolverRules {
  fn default() -> Self {
    Self { profile_url_prefix: "https://open.spotify.com/artist/".to_string(), id_length: 22 }
  }
}

/// Normaliza texto libre, URLs o IDs a un `ArtistId` canónico.
///
/// Orden de resolución: URL de perfil → token con la longitud del ID →
/// búsqueda en el catálogo con límite 1. Sin resultados, `NotFound`.
pub struct ArtistResolver<C>
where
  C: CatalogClient,
{
  catalog: C,
  rules: ResolverRules,
}

impl<C> ArtistResolver<C>
where
  C: CatalogClient,
{
  pub fn new(catalog: C, rules: ResolverRules) -> Self {
    Self { catalog, rules }
  }

  pub async fn resolve(&self, input: &str) -> Result<ArtistId, CollabError> {
    let input = input.trim();

    if let Some(rest) = input.strip_prefix(&self.rules.profile_url_prefix) {
      // La URL puede arrastrar query params: solo interesa el token fijo.
      let token: String = rest.chars().take(self.rules.id_length).collect();
      debug!(%token, "resolved from profile url");
      return Ok(ArtistId::new(token));
    }

    if input.len() == self.rules.id_length {
      return Ok(ArtistId::new(input));
    }

    let hits = self.catalog.search_artist(input, 1).await.map_err(|e| match e {
      CatalogError::Auth(reason) => CollabError::Auth(reason),
      other => CollabError::Fetch(other.to_string()),
    })?;

    hits
      .into_iter()
      .next()
      .map(|profile| profile.id)
      .ok_or_else(|| CollabError::NotFound(input.to_string()))
  }
}
