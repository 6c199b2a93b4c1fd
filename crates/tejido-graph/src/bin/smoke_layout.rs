use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::NaiveDate;

use tejido_core::collab::{ArtistId, ArtistProfile, CrawlResult};
use tejido_core::ports::{PaletteError, PaletteStore};
use tejido_graph::encode::{ColorAssigner, DEFAULT_BASE_SIZE, node_sizes};
use tejido_graph::{build, compute_layout};

/// Paleta volátil, suficiente para el smoke test.
#[derive(Default)]
struct MemoryPalette {
  colors: Mutex<BTreeMap<String, String>>,
}

impl PaletteStore for MemoryPalette {
  fn color_for(&self, key: &str) -> Result<Option<String>, PaletteError> {
    Ok(self.colors.lock().unwrap().get(key).cloned())
  }

  fn assign(&self, key: &str, color: &str) -> Result<(), PaletteError> {
    self.colors.lock().unwrap().entry(key.to_string()).or_insert_with(|| color.to_string());
    Ok(())
  }
}

fn profile(id: &str, name: &str, genres: &[&str]) -> ArtistProfile {
  ArtistProfile {
    id: ArtistId::new(id),
    name: name.to_string(),
    image_url: None,
    genres: genres.iter().map(|g| g.to_string()).collect(),
  }
}

fn main() {
  let date = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("bad date literal");

  // Agregado enlatado: una semilla con tres colaboradores.
  let result = CrawlResult {
    seed: profile("X", "Semilla", &["rock"]),
    stats: BTreeMap::from([
      (ArtistId::new("X"), 6),
      (ArtistId::new("A"), 4),
      (ArtistId::new("B"), 2),
      (ArtistId::new("C"), 1),
    ]),
    last_collab: BTreeMap::from([
      (ArtistId::new("A"), date("2024-05-01")),
      (ArtistId::new("B"), date("2021-06-15")),
      (ArtistId::new("C"), date("2018-02-20")),
    ]),
    tracks: BTreeMap::new(),
    artists: BTreeMap::from([
      (ArtistId::new("X"), profile("X", "Semilla", &["rock"])),
      (ArtistId::new("A"), profile("A", "Alfa", &["rock"])),
      (ArtistId::new("B"), profile("B", "Beta", &["jazz"])),
      (ArtistId::new("C"), profile("C", "Gamma", &[])),
    ]),
  };

  let graph = build(&result, false);
  let layout = compute_layout(&graph, 42);
  let sizes = node_sizes(&result.stats, DEFAULT_BASE_SIZE);

  let palette = MemoryPalette::default();
  let colors = ColorAssigner::new(&palette, 42);

  println!("{} nodos, {} aristas", graph.nodes.len(), graph.edges.len());
  for node in &graph.nodes {
    let (x, y) = layout[node];
    let artist = &result.artists[node];
    let color = colors.node_color(artist).expect("palette assignment failed");
    println!("{:<8} pos=({x:>8.2}, {y:>8.2}) size={:>5.1} color={color}", artist.name, sizes[node]);
  }
}
