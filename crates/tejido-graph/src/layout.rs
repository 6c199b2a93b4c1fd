use std::collections::{BTreeMap, HashMap};
use std::f64::consts::TAU;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use tejido_core::collab::ArtistId;

use crate::graph::CollabGraph;

const ITERATIONS: usize = 300;

/// Force-directed 2D layout for the collaboration graph.
///
/// The seed starts at the origin and the collaborators on a jittered ring;
/// repulsion, springs and a weak gravity then relax the positions under a
/// cooling temperature. All randomness comes from `seed_rng`, so a fixed
/// graph and a fixed seed always produce the same coordinates.
///
/// Seed edges use their recency weight for the spring's ideal length:
/// recent collaborators (low score) sit closer to the seed.
pub fn compute_layout(graph: &CollabGraph, seed_rng: u64) -> BTreeMap<ArtistId, (f64, f64)> {
  let n = graph.nodes.len();
  if n == 0 {
    return BTreeMap::new();
  }

  let mut rng = SmallRng::seed_from_u64(seed_rng);
  let base_radius = (n as f64).sqrt() * 120.0;

  let index: HashMap<&ArtistId, usize> =
    graph.nodes.iter().enumerate().map(|(i, id)| (id, i)).collect();

  // Node 0 is the seed: anchored at the origin by construction.
  let mut positions: Vec<(f64, f64)> = graph
    .nodes
    .iter()
    .enumerate()
    .map(|(i, _)| {
      if i == 0 {
        (0.0, 0.0)
      } else {
        let angle = (i as f64 / n as f64) * TAU;
        let jx: f64 = rng.random_range(-40.0..40.0);
        let jy: f64 = rng.random_range(-40.0..40.0);
        (angle.cos() * base_radius + jx, angle.sin() * base_radius + jy)
      }
    })
    .collect();

  if n > 1 {
    let area = (base_radius * 2.4).powi(2);
    let k = (area / n as f64).sqrt().max(24.0);

    let springs: Vec<(usize, usize, f64)> = graph
      .edges
      .iter()
      .filter_map(|edge| {
        let i = *index.get(&edge.a)?;
        let j = *index.get(&edge.b)?;
        let ideal = match edge.weight {
          Some(w) => k * (0.5 + w / 10.0),
          None => k * 1.2,
        };
        Some((i, j, ideal))
      })
      .collect();

    let mut temperature = (k * 4.0).max(120.0);

    for _ in 0..ITERATIONS {
      let mut disp = vec![(0.0f64, 0.0f64); n];

      // Repulsión entre todos los pares.
      for i in 0..n {
        for j in (i + 1)..n {
          let dx = positions[i].0 - positions[j].0;
          let dy = positions[i].1 - positions[j].1;
          let distance = (dx * dx + dy * dy).sqrt().max(0.5);
          let force = k * k / distance;
          let (ux, uy) = (dx / distance, dy / distance);

          disp[i].0 += ux * force;
          disp[i].1 += uy * force;
          disp[j].0 -= ux * force;
          disp[j].1 -= uy * force;
        }
      }

      // Muelles sobre las aristas.
      for &(i, j, ideal) in &springs {
        if i == j {
          continue;
        }
        let dx = positions[i].0 - positions[j].0;
        let dy = positions[i].1 - positions[j].1;
        let distance = (dx * dx + dy * dy).sqrt().max(0.5);
        let force = (distance - ideal) * 0.15;
        let (ux, uy) = (dx / distance, dy / distance);

        disp[i].0 -= ux * force;
        disp[i].1 -= uy * force;
        disp[j].0 += ux * force;
        disp[j].1 += uy * force;
      }

      // Gravedad débil hacia el origen para que el grafo no derive.
      for i in 0..n {
        disp[i].0 -= positions[i].0 * 0.002;
        disp[i].1 -= positions[i].1 * 0.002;
      }

      for i in 0..n {
        let (dx, dy) = disp[i];
        let length = (dx * dx + dy * dy).sqrt();
        if length > 0.0 {
          let step = length.min(temperature) * 0.9;
          positions[i].0 += dx / length * step;
          positions[i].1 += dy / length * step;
        }
      }

      temperature *= 0.95;
      if temperature < 0.5 {
        break;
      }
    }
  }

  graph.nodes.iter().cloned().zip(positions).collect()
}
