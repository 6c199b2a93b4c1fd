//! Wire types for the catalog's Web API.
//!
//! These mirror the JSON payloads verbatim; conversion into domain types
//! happens here so the client module only deals in domain vocabulary.

use serde::Deserialize;

use tejido_core::collab::{
  ArtistId, ArtistProfile, DatePrecision, ReleaseId, ReleaseSummary, TrackCredit, TrackId,
};
use tejido_core::ports::CatalogTrack;

#[derive(Debug, Clone, Deserialize)]
pub struct ImageObject {
  pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistObject {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub images: Vec<ImageObject>,
  #[serde(default)]
  pub genres: Vec<String>,
}

impl ArtistObject {
  pub fn into_profile(self) -> ArtistProfile {
    ArtistProfile {
      id: ArtistId::new(self.id),
      name: self.name,
      image_url: self.images.into_iter().next().map(|i| i.url),
      genres: self.genres,
    }
  }
}

/// Generic paging envelope. `next` only matters as a presence flag: the
/// client derives its own offset cursor instead of following the URL.
#[derive(Debug, Clone, Deserialize)]
pub struct PagingObject<T> {
  #[serde(default = "Vec::new")]
  pub items: Vec<T>,
  #[serde(default)]
  pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumSummaryObject {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub release_date: String,
  #[serde(default)]
  pub release_date_precision: Option<String>,
}

impl AlbumSummaryObject {
  pub fn into_summary(self) -> ReleaseSummary {
    // "year" is the only precision that changes how we parse the date;
    // "month" and "day" both carry a parseable full date upstream.
    let precision = match self.release_date_precision.as_deref() {
      Some("year") => DatePrecision::Year,
      _ => DatePrecision::Day,
    };

    ReleaseSummary {
      id: ReleaseId::new(self.id),
      title: self.name,
      release_date: self.release_date,
      precision,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimplifiedArtistObject {
  pub id: String,
  pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
  #[serde(default)]
  pub spotify: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackObject {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub preview_url: Option<String>,
  #[serde(default)]
  pub external_urls: ExternalUrls,
  #[serde(default)]
  pub artists: Vec<SimplifiedArtistObject>,
}

impl TrackObject {
  pub fn into_catalog_track(self, thumbnail_url: Option<String>) -> CatalogTrack {
    let url = self
      .external_urls
      .spotify
      .unwrap_or_else(|| format!("https://open.spotify.com/track/{}", self.id));

    CatalogTrack {
      id: TrackId::new(self.id),
      name: self.name,
      url,
      thumbnail_url,
      preview_url: self.preview_url,
      credited: self
        .artists
        .into_iter()
        .map(|a| TrackCredit { id: ArtistId::new(a.id), name: a.name })
        .collect(),
    }
  }
}

/// `GET /albums/{id}`: cover art and the embedded first page of tracks in
/// one call.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumDetailObject {
  #[serde(default)]
  pub images: Vec<ImageObject>,
  pub tracks: PagingObject<TrackObject>,
}

/// `GET /artists?ids=...` devuelve `null` en la posición de los ids
/// desconocidos; los ignoramos.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistsEnvelope {
  pub artists: Vec<Option<ArtistObject>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchEnvelope {
  pub artists: PagingObject<ArtistObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
  pub expires_in: u64,
}
