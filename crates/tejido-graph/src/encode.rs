use std::collections::BTreeMap;
use std::sync::Mutex;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use tejido_core::collab::{ArtistId, ArtistProfile, CollabStats};
use tejido_core::ports::{PaletteError, PaletteStore};

use crate::recency::normalize;

/// Default node base size (the reference renderer's log-scale base).
pub const DEFAULT_BASE_SIZE: f64 = 40.0;

/// Node sizes from collaboration counts.
///
/// Counts are min-max rescaled into `[0.1, 1]` and then compressed with
/// `base + base * sqrt(normalized)`, so the seed's high degree does not
/// visually flatten everyone else.
pub fn node_sizes(stats: &CollabStats, base: f64) -> BTreeMap<ArtistId, f64> {
  let counts: Vec<f64> = stats.values().map(|c| *c as f64).collect();
  let scaled = normalize(&counts, 0.1, 1.0);

  stats.keys().cloned().zip(scaled.into_iter().map(|s| base + base * s.sqrt())).collect()
}

/// Stable color assignment through the persisted palette.
///
/// The artist's first listed genre decides the palette key; artists with no
/// genres get a per-artist key so their random color is assigned once and
/// then reused forever. Fresh colors come from the seeded RNG, keeping test
/// runs reproducible.
pub struct ColorAssigner<'a, P>
where
  P: PaletteStore,
{
  palette: &'a P,
  rng: Mutex<SmallRng>,
}

impl<'a, P> ColorAssigner<'a, P>
where
  P: PaletteStore,
{
  pub fn new(palette: &'a P, rng_seed: u64) -> Self {
    Self { palette, rng: Mutex::new(SmallRng::seed_from_u64(rng_seed)) }
  }

  fn palette_key(artist: &ArtistProfile) -> String {
    match artist.primary_genre() {
      Some(genre) => format!("genre:{genre}"),
      None => format!("artist:{}", artist.id),
    }
  }

  pub fn node_color(&self, artist: &ArtistProfile) -> Result<String, PaletteError> {
    let key = Self::palette_key(artist);

    if let Some(color) = self.palette.color_for(&key)? {
      return Ok(color);
    }

    let fresh = {
      let mut rng = self.rng.lock().expect("rng lock poisoned");
      format!("#{:06x}", rng.random_range(0..0x100_0000u32))
    };
    self.palette.assign(&key, &fresh)?;

    // Alguien pudo asignar entre el miss y el assign: la paleta decide.
    Ok(self.palette.color_for(&key)?.unwrap_or(fresh))
  }
}
