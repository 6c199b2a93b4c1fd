use serde::{Deserialize, Serialize};

use crate::collab::ids::{ArtistId, TrackId};

/// Crédito de un artista sobre una pista: el par id / nombre que el
/// catálogo adjunta en cada listado de pistas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackCredit {
  pub id: ArtistId,
  pub name: String,
}

/// Una pista registrada durante el crawl.
///
/// Los campos estáticos (nombre, miniatura, preview) se fijan con la primera
/// aparición de la pista y no se sobreescriben. `collaboration_groups`
/// acumula las secuencias de créditos *distintas* con las que la pista
/// apareció: un remix o una reedición con otra alineación añade un grupo
/// nuevo sin duplicar la pista.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
  pub id: TrackId,
  pub name: String,

  /// URL pública de la pista en el catálogo.
  pub url: String,

  /// Miniatura del release al que pertenece, si existe.
  pub thumbnail_url: Option<String>,

  /// URL del preview de audio. También es la clave de deduplicación:
  /// dos pistas con el mismo preview son la misma grabación.
  pub preview_url: Option<String>,

  /// Secuencia de artistas acreditados en la primera aparición.
  pub credited: Vec<TrackCredit>,

  /// Secuencias de créditos distintas vistas para esta pista.
  pub collaboration_groups: Vec<Vec<ArtistId>>,
}

impl Track {
  /// IDs acreditados en la primera aparición, en orden.
  pub fn credited_ids(&self) -> Vec<ArtistId> {
    self.credited.iter().map(|c| c.id.clone()).collect()
  }

  /// ¿Acredita esta pista al artista dado en alguno de sus grupos?
  pub fn credits_artist(&self, artist: &ArtistId) -> bool {
    self.collaboration_groups.iter().any(|group| group.contains(artist))
  }

  /// Añade un grupo de colaboración si aún no estaba registrado.
  pub fn register_group(&mut self, group: Vec<ArtistId>) {
    if !self.collaboration_groups.contains(&group) {
      self.collaboration_groups.push(group);
    }
  }
}
