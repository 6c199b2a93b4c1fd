use serde::{Deserialize, Serialize};

use crate::collab::ids::ArtistId;

/// Perfil de un artista tal como lo expone el catálogo.
///
/// Es la vista mínima que necesita el grafo: nombre para la etiqueta,
/// imagen para el drill-down y géneros (en orden de relevancia del
/// catálogo) para el color del nodo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistProfile {
  /// Identificador canónico dentro del catálogo.
  pub id: ArtistId,

  /// Nombre principal del artista.
  pub name: String,

  /// URL de la imagen de perfil, si el catálogo publica alguna.
  pub image_url: Option<String>,

  /// Géneros asignados por el catálogo, ordenados. El primero decide el color.
  pub genres: Vec<String>,
}

impl ArtistProfile {
  /// Género principal del artista, si tiene alguno asignado.
  pub fn primary_genre(&self) -> Option<&str> {
    self.genres.first().map(String::as_str)
  }
}
