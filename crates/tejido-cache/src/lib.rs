mod io;
mod palette;
mod snapshot;

pub use io::atomic_write;
pub use palette::JsonPaletteStore;
pub use snapshot::JsonSnapshotStore;
