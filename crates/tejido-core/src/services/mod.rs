pub mod crawler;
pub mod resolver;

pub use crawler::{CollabCrawler, CrawlerConfig};
pub use resolver::{ArtistResolver, ResolverRules};
