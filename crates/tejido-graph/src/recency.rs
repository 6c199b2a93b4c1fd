use std::collections::BTreeMap;

use tejido_core::collab::{ArtistId, LastCollabDates};

/// Min-max rescale of `values` into `[t_min, t_max]`.
///
/// When every value is equal there is no spread to map, so everything goes
/// to `t_min` instead of dividing by zero.
pub fn normalize(values: &[f64], t_min: f64, t_max: f64) -> Vec<f64> {
  let Some(min) = values.iter().copied().reduce(f64::min) else {
    return Vec::new();
  };
  let max = values.iter().copied().reduce(f64::max).unwrap_or(min);

  if (max - min).abs() < f64::EPSILON {
    return vec![t_min; values.len()];
  }

  values.iter().map(|v| t_min + (v - min) * (t_max - t_min) / (max - min)).collect()
}

/// Recency score per collaborator, in `[1, 10]`.
///
/// Raw delta for artist `a` is `(min_date - last_collab[a]).days + 1`, where
/// `min_date` is the earliest date in the map. The oldest collaboration
/// therefore lands on 10 and the most recent on 1 after rescaling.
pub fn recency_scores(last_collab: &LastCollabDates) -> BTreeMap<ArtistId, f64> {
  let Some(min_date) = last_collab.values().copied().min() else {
    return BTreeMap::new();
  };

  let deltas: Vec<f64> =
    last_collab.values().map(|d| (min_date - *d).num_days() as f64 + 1.0).collect();
  let scaled = normalize(&deltas, 1.0, 10.0);

  last_collab.keys().cloned().zip(scaled).collect()
}
