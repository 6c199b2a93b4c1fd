pub mod artist;
pub mod crawl_result;
pub mod ids;
pub mod release;
pub mod track;

pub use artist::ArtistProfile;
pub use crawl_result::{CollabStats, CrawlResult, LastCollabDates};
pub use ids::{ArtistId, ReleaseId, TrackId};
pub use release::{DatePrecision, ReleaseDateError, ReleaseKind, ReleaseSummary};
pub use track::{Track, TrackCredit};
