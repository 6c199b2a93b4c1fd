use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::collab::artist::ArtistProfile;
use crate::collab::ids::{ArtistId, TrackId};
use crate::collab::track::Track;

/// Conteo de pistas compartidas por artista. La semilla cuenta también:
/// su valor es el total de pistas propias registradas.
pub type CollabStats = BTreeMap<ArtistId, u32>;

/// Fecha de release más reciente entre las pistas compartidas con la semilla.
/// La semilla nunca es clave de este mapa.
pub type LastCollabDates = BTreeMap<ArtistId, NaiveDate>;

/// Agregado inmutable producido por un crawl exitoso.
///
/// Invariantes:
/// - el ID de la semilla es clave de `stats` y de `artists`,
/// - toda clave de `last_collab` es distinta de la semilla,
/// - un resultado cacheado nunca se muta: un refresh crea uno nuevo
///   y lo intercambia atómicamente en el store.
///
/// Los mapas son `BTreeMap` a propósito: la iteración ordenada hace
/// deterministas la serialización del snapshot y la construcción del grafo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
  /// Perfil del artista desde el que partió el crawl.
  pub seed: ArtistProfile,

  /// Pistas compartidas por artista (incluida la semilla).
  pub stats: CollabStats,

  /// Última colaboración por artista (solo colaboradores).
  pub last_collab: LastCollabDates,

  /// Pistas registradas, deduplicadas por preview URL.
  pub tracks: BTreeMap<TrackId, Track>,

  /// Perfiles completos de todos los artistas del grafo.
  pub artists: BTreeMap<ArtistId, ArtistProfile>,
}

impl CrawlResult {
  /// IDs de los colaboradores (todas las claves de `stats` menos la semilla).
  pub fn collaborators(&self) -> impl Iterator<Item = &ArtistId> {
    self.stats.keys().filter(move |id| **id != self.seed.id)
  }

  /// Drill-down de un nodo: las pistas que acreditan al artista dado.
  pub fn tracks_for(&self, artist: &ArtistId) -> Vec<&Track> {
    self.tracks.values().filter(|t| t.credits_artist(artist)).collect()
  }

  /// Conteo de colaboraciones de un artista, 0 si no aparece.
  pub fn collab_count(&self, artist: &ArtistId) -> u32 {
    self.stats.get(artist).copied().unwrap_or(0)
  }
}
