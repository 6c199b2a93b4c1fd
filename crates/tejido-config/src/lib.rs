mod paths;
mod settings;

pub use paths::{ConfigError, TejidoPaths};
pub use settings::{CatalogSettings, CrawlerSettings};
