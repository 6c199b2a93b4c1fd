//! Smoke test contra el catálogo real: resuelve un artista y crawlea sus
//! colaboraciones.
//!
//! Uso: `crawl_artist <nombre | url | id> [--force]`
//! Requiere `TEJIDO_CLIENT_ID` / `TEJIDO_CLIENT_SECRET` o la sección
//! `[catalog]` del `tejido.toml`.

use std::error::Error;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use tejido_cache::JsonSnapshotStore;
use tejido_catalog::HttpCatalogClient;
use tejido_config::{CatalogSettings, CrawlerSettings, TejidoPaths};
use tejido_core::services::{ArtistResolver, CollabCrawler, CrawlerConfig, ResolverRules};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let mut args = std::env::args().skip(1);
  let Some(input) = args.next() else {
    eprintln!("uso: crawl_artist <nombre | url | id> [--force]");
    std::process::exit(2);
  };
  let force = args.any(|a| a == "--force");

  let paths = TejidoPaths::detect()?;
  let settings = CatalogSettings::load(&paths)?;
  let crawler_settings = CrawlerSettings::load(&paths)?;

  let resolver = ArtistResolver::new(
    HttpCatalogClient::new(settings.clone(), &crawler_settings)?,
    ResolverRules::default(),
  );

  let crawler = CollabCrawler::new(
    HttpCatalogClient::new(settings, &crawler_settings)?,
    JsonSnapshotStore::new(paths.snapshots_dir()),
    CrawlerConfig {
      batch_limit: crawler_settings.batch_limit,
      track_workers: crawler_settings.track_workers,
      deadline: Duration::from_secs(crawler_settings.crawl_deadline_secs),
      ..CrawlerConfig::default()
    },
  );

  let seed = resolver.resolve(&input).await?;
  let result = crawler.crawl(&seed, force).await?;

  println!(
    "{} — {} colaboradores, {} pistas con colaboración",
    result.seed.name,
    result.collaborators().count(),
    result.tracks.len()
  );

  let mut ranking: Vec<_> =
    result.collaborators().map(|id| (result.collab_count(id), id)).collect();
  ranking.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));

  for (count, id) in ranking.into_iter().take(15) {
    let name = result.artists.get(id).map(|p| p.name.as_str()).unwrap_or(id.as_str());
    let last = result
      .last_collab
      .get(id)
      .map(|d| d.to_string())
      .unwrap_or_else(|| "¿?".to_string());
    println!("{count:>4}  {name:<32} última colaboración: {last}");
  }

  Ok(())
}
