/// Un archivo de paleta corrupto no es un error: el store lo registra y
/// arranca con una paleta vacía, así que aquí solo queda la E/S.
#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
  #[error("io error: {0}")]
  Io(String),
}

/// Port de la paleta persistente clave → color hex.
///
/// Las claves son géneros (`genre:<nombre>`) o artistas sin género
/// (`artist:<id>`). La paleta es *append-only*: una vez asignado un color,
/// la asignación es permanente y sobrevive reinicios para que el grafo se
/// vea igual entre ejecuciones.
pub trait PaletteStore: Send + Sync {
  /// Color ya asignado para la clave, si existe.
  fn color_for(&self, key: &str) -> Result<Option<String>, PaletteError>;

  /// Registra un color para la clave. Si la clave ya tenía color, la
  /// asignación existente gana y esta llamada no tiene efecto.
  fn assign(&self, key: &str, color: &str) -> Result<(), PaletteError>;
}
