use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

use tejido_core::ports::{PaletteError, PaletteStore};

use crate::io::atomic_write;

/// Append-only genre → hex color palette backed by a single JSON file.
///
/// The whole map lives in memory and is flushed atomically on every new
/// assignment; assignments are permanent, so repeated runs keep the graph
/// visually consistent. A corrupt palette file is logged and restarted
/// empty rather than blocking rendering.
pub struct JsonPaletteStore {
  path: PathBuf,
  colors: Mutex<BTreeMap<String, String>>,
}

impl JsonPaletteStore {
  pub fn open(path: impl Into<PathBuf>) -> Result<Self, PaletteError> {
    let path = path.into();

    let colors = match std::fs::read_to_string(&path) {
      Ok(content) => match serde_json::from_str(&content) {
        Ok(map) => map,
        Err(e) => {
          warn!(path = %path.display(), error = %e, "corrupt palette, starting empty");
          BTreeMap::new()
        }
      },
      Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
      Err(e) => return Err(PaletteError::Io(e.to_string())),
    };

    Ok(Self { path, colors: Mutex::new(colors) })
  }

  fn flush(&self, colors: &BTreeMap<String, String>) -> Result<(), PaletteError> {
    let encoded = serde_json::to_vec_pretty(colors).map_err(|e| PaletteError::Io(e.to_string()))?;
    atomic_write(&self.path, &encoded).map_err(|e| PaletteError::Io(e.to_string()))
  }
}

impl PaletteStore for JsonPaletteStore {
  fn color_for(&self, key: &str) -> Result<Option<String>, PaletteError> {
    Ok(self.colors.lock().expect("palette lock poisoned").get(key).cloned())
  }

  fn assign(&self, key: &str, color: &str) -> Result<(), PaletteError> {
    let mut colors = self.colors.lock().expect("palette lock poisoned");

    // Append-only: la primera asignación gana.
    if colors.contains_key(key) {
      return Ok(());
    }

    colors.insert(key.to_string(), color.to_string());
    self.flush(&colors)
  }
}
