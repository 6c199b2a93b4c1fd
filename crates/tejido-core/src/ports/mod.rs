pub mod cache;
pub mod catalog;
pub mod palette;

pub use cache::{CacheError, CacheStore};
pub use catalog::{CatalogClient, CatalogError, CatalogTrack, ReleasePage};
pub use palette::{PaletteError, PaletteStore};
