use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("missing catalog credentials: set TEJIDO_CLIENT_ID / TEJIDO_CLIENT_SECRET or the [catalog] section")]
  MissingCredentials,
  #[error("other: {0}")]
  Other(String),
}

/// Rutas base de Tejido (configuración, datos y caché de snapshots).
///
/// `TEJIDO_BASE_DIR` fuerza un layout portable debajo de un único directorio;
/// en caso contrario se usan los directorios estándar de la plataforma.
#[derive(Debug, Clone)]
pub struct TejidoPaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
  pub cache_dir: PathBuf,
}

impl TejidoPaths {
  pub fn new() -> Result<Self, ConfigError> {
    let (config_dir, data_dir, cache_dir, base_dir);

    if let Ok(env_base) = std::env::var("TEJIDO_BASE_DIR") {
      let base = PathBuf::from(env_base);
      base_dir = base.clone();
      config_dir = base.join("config");
      data_dir = base.join("data");
      cache_dir = base.join("cache");
    } else {
      let proj_dirs = ProjectDirs::from("com", "tejido", "tejido").ok_or(ConfigError::Directories)?;
      base_dir = proj_dirs.config_dir().to_path_buf();
      config_dir = proj_dirs.config_dir().to_path_buf();
      data_dir = proj_dirs.data_dir().to_path_buf();
      cache_dir = proj_dirs.cache_dir().to_path_buf();
    }

    std::fs::create_dir_all(&config_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    std::fs::create_dir_all(&cache_dir)?;

    Ok(Self { base_dir, config_dir, data_dir, cache_dir })
  }

  pub fn detect() -> Result<Self, ConfigError> {
    Self::new()
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("tejido.toml")
  }

  /// Directorio donde viven los snapshots de crawls por artista.
  pub fn snapshots_dir(&self) -> PathBuf {
    self.cache_dir.join("snapshots")
  }

  /// Archivo de la paleta persistente género → color.
  pub fn palette_file(&self) -> PathBuf {
    self.data_dir.join("palette.json")
  }
}
