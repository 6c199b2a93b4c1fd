use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use tejido_core::collab::{ArtistId, CrawlResult};

use crate::recency::recency_scores;

/// Kind of edge in the collaboration graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
  /// Seed ↔ collaborator. Weighted by recency score.
  Seed,
  /// Collaborator ↔ collaborator sharing a credited track. Structural
  /// only: carries no weight, rendered differently by the visual layer.
  CoCredit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
  pub a: ArtistId,
  pub b: ArtistId,
  pub kind: EdgeKind,
  /// Recency score in `[1, 10]` for seed edges, `None` for co-credit edges.
  pub weight: Option<f64>,
}

/// Node/edge view of a `CrawlResult`, ready for layout and encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollabGraph {
  pub seed: ArtistId,
  /// Seed first, collaborators in stable (sorted) order after it.
  pub nodes: Vec<ArtistId>,
  pub edges: Vec<GraphEdge>,
}

impl CollabGraph {
  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &GraphEdge> {
    self.edges.iter().filter(move |e| e.kind == kind)
  }
}

/// Builds the star graph around the seed, optionally enriched with
/// second-degree co-credit edges.
///
/// Every non-seed artist in `stats` gets exactly one weighted seed edge.
/// With `include_second_degree`, each collaboration group contributes one
/// unweighted edge per unordered pair of non-seed members, deduplicated
/// across groups and tracks.
pub fn build(result: &CrawlResult, include_second_degree: bool) -> CollabGraph {
  let seed = result.seed.id.clone();
  let scores = recency_scores(&result.last_collab);

  let mut nodes = vec![seed.clone()];
  let mut edges = Vec::new();

  for artist in result.stats.keys() {
    if *artist == seed {
      continue;
    }
    nodes.push(artist.clone());
    edges.push(GraphEdge {
      a: seed.clone(),
      b: artist.clone(),
      kind: EdgeKind::Seed,
      weight: scores.get(artist).copied(),
    });
  }

  if include_second_degree {
    let mut seen_pairs: HashSet<(ArtistId, ArtistId)> = HashSet::new();

    for track in result.tracks.values() {
      for group in &track.collaboration_groups {
        let others: Vec<&ArtistId> = group.iter().filter(|id| **id != seed).collect();

        for i in 0..others.len() {
          for j in (i + 1)..others.len() {
            let (mut a, mut b) = (others[i].clone(), others[j].clone());
            if a == b {
              continue;
            }
            if b < a {
              std::mem::swap(&mut a, &mut b);
            }
            if seen_pairs.insert((a.clone(), b.clone())) {
              edges.push(GraphEdge { a, b, kind: EdgeKind::CoCredit, weight: None });
            }
          }
        }
      }
    }
  }

  CollabGraph { seed, nodes, edges }
}
