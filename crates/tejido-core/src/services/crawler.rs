use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use futures::StreamExt;
use futures::stream;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::collab::{ArtistId, CollabStats, CrawlResult, LastCollabDates, ReleaseKind, Track, TrackId};
use crate::errors::CollabError;
use crate::ports::{CacheError, CacheStore, CatalogClient, CatalogError, CatalogTrack};

/// Parámetros de un crawl.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
  /// Tipos de release que se recorren.
  pub release_kinds: Vec<ReleaseKind>,
  /// Tamaño máximo de lote que acepta el endpoint de detalle de artistas.
  pub batch_limit: usize,
  /// Ancho del pool para las peticiones de pistas por release.
  pub track_workers: usize,
  /// Techo de tiempo para el crawl completo.
  pub deadline: Duration,
}

impl Default for CrawlerConfig {
  fn default() -> Self {
    Self {
      release_kinds: ReleaseKind::all(),
      batch_limit: 50,
      track_workers: 4,
      deadline: Duration::from_secs(300),
    }
  }
}

/// Servicio central: convierte la discografía paginada de una semilla en un
/// `CrawlResult` agregado, consultando primero el store de snapshots.
///
/// A lo sumo hay un crawl en vuelo por artista: las peticiones concurrentes
/// sobre el mismo ID esperan al primer vuelo y se sirven del snapshot que
/// este deja en el cache.
pub struct CollabCrawler<C, S>
where
  C: CatalogClient,
  S: CacheStore,
{
  catalog: C,
  cache: S,
  config: CrawlerConfig,
  in_flight: Mutex<HashMap<ArtistId, Arc<Mutex<()>>>>,
}

impl<C, S> CollabCrawler<C, S>
where
  C: CatalogClient,
  S: CacheStore,
{
  pub fn new(catalog: C, cache: S, config: CrawlerConfig) -> Self {
    Self { catalog, cache, config, in_flight: Mutex::new(HashMap::new()) }
  }

  /// Crawl de colaboraciones para `seed`.
  ///
  /// Con `force == false`, un hit de cache responde sin tocar la red.
  /// Con `force == true` siempre se re-crawlea y el snapshot anterior se
  /// reemplaza atómicamente.
  pub async fn crawl(&self, seed: &ArtistId, force: bool) -> Result<CrawlResult, CollabError> {
    // Registro por clave: el segundo caller espera el candado del primero
    // y al despertar encuentra el snapshot recién escrito.
    let key_lock = {
      let mut map = self.in_flight.lock().await;
      map.entry(seed.clone()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    };
    let _guard = key_lock.lock().await;

    let result = self.crawl_locked(seed, force).await;

    {
      let mut map = self.in_flight.lock().await;
      if let Some(entry) = map.get(seed) {
        // Solo el mapa y este caller retienen el candado: nadie espera.
        if Arc::strong_count(entry) <= 2 {
          map.remove(seed);
        }
      }
    }

    result
  }

  async fn crawl_locked(&self, seed: &ArtistId, force: bool) -> Result<CrawlResult, CollabError> {
    if !force {
      match self.cache.get(seed) {
        Ok(Some(result)) => {
          debug!(artist = %seed, "snapshot hit, zero catalog calls");
          return Ok(result);
        }
        Ok(None) => {}
        Err(CacheError::Corrupt(reason)) => {
          warn!(artist = %seed, %reason, "corrupt snapshot treated as miss");
        }
        Err(CacheError::Io(reason)) => {
          warn!(artist = %seed, %reason, "unreadable snapshot treated as miss");
        }
      }
    }

    let result = tokio::time::timeout(self.config.deadline, self.crawl_uncached(seed))
      .await
      .map_err(|_| CollabError::Timeout)??;

    self.cache.put(seed, &result).map_err(|e| CollabError::Cache(e.to_string()))?;
    Ok(result)
  }

  async fn crawl_uncached(&self, seed: &ArtistId) -> Result<CrawlResult, CollabError> {
    let seed_profile = self.catalog.get_artist(seed).await.map_err(terminal)?;
    info!(artist = %seed, name = %seed_profile.name, "crawl started");

    let mut agg = Aggregation::default();
    let mut cursor: Option<String> = None;

    loop {
      let page = self
        .catalog
        .list_releases(seed, &self.config.release_kinds, cursor.as_deref())
        .await
        .map_err(terminal)?;

      // Cuarentena por release: una fecha ilegible descarta ese release
      // y nada más. El crawl nunca aborta por datos sucios.
      let mut dated = Vec::new();
      for release in page.items {
        match release.parsed_date() {
          Ok(date) => dated.push((release, date)),
          Err(err) => warn!(release = %err.release, raw = %err.raw, "release quarantined"),
        }
      }

      // Las pistas de cada release se piden por un pool acotado, pero se
      // agregan en el orden de la página para que el resultado sea estable.
      let catalog = &self.catalog;
      let fetched: Vec<(NaiveDate, Result<Vec<CatalogTrack>, CatalogError>)> = stream::iter(dated)
        .map(|(release, date)| async move { (date, catalog.list_tracks(&release.id).await) })
        .buffered(self.config.track_workers.max(1))
        .collect()
        .await;

      for (date, tracks) in fetched {
        agg.absorb_tracks(seed, date, tracks.map_err(terminal)?);
      }

      match page.next_cursor {
        Some(next) => cursor = Some(next),
        None => break,
      }
    }

    // Detalle completo de cada colaborador, en lotes que respetan el
    // límite del catálogo.
    let mut artists = BTreeMap::new();
    for chunk in agg.pending.chunks(self.config.batch_limit.max(1)) {
      let profiles = self.catalog.get_artists_batch(chunk).await.map_err(terminal)?;
      for profile in profiles {
        artists.insert(profile.id.clone(), profile);
      }
    }
    artists.insert(seed_profile.id.clone(), seed_profile.clone());

    // Invariante: la semilla siempre es clave de stats, incluso con una
    // discografía vacía.
    agg.stats.entry(seed.clone()).or_insert(0);

    info!(
      artist = %seed,
      collaborators = agg.stats.len().saturating_sub(1),
      tracks = agg.tracks.len(),
      "crawl finished"
    );

    Ok(CrawlResult {
      seed: seed_profile,
      stats: agg.stats,
      last_collab: agg.last_collab,
      tracks: agg.tracks,
      artists,
    })
  }
}

fn terminal(err: CatalogError) -> CollabError {
  match err {
    CatalogError::NotFound(what) => CollabError::NotFound(what),
    CatalogError::Auth(reason) => CollabError::Auth(reason),
    other => CollabError::Fetch(other.to_string()),
  }
}

/// Estado mutable de un crawl en curso. Nunca sale de este módulo: al
/// terminar se congela en un `CrawlResult`.
#[derive(Default)]
struct Aggregation {
  stats: CollabStats,
  last_collab: LastCollabDates,
  tracks: BTreeMap<TrackId, Track>,
  seen_previews: HashSet<String>,
  queued: HashSet<ArtistId>,
  pending: Vec<ArtistId>,
}

impl Aggregation {
  fn absorb_tracks(&mut self, seed: &ArtistId, date: NaiveDate, tracks: Vec<CatalogTrack>) {
    for track in tracks {
      // Dedup por preview: dos apariciones con el mismo preview son la
      // misma grabación. Sin preview no hay clave, así que no se deduplica.
      if let Some(preview) = &track.preview_url {
        if !self.seen_previews.insert(preview.clone()) {
          continue;
        }
      }

      let credited: Vec<ArtistId> = track.credited.iter().map(|c| c.id.clone()).collect();
      if !credited.contains(seed) {
        continue;
      }

      // Primera aparición gana para los campos estáticos; las alineaciones
      // distintas se acumulan como grupos de colaboración.
      let entry = self.tracks.entry(track.id.clone()).or_insert_with(|| Track {
        id: track.id.clone(),
        name: track.name,
        url: track.url,
        thumbnail_url: track.thumbnail_url,
        preview_url: track.preview_url,
        credited: track.credited,
        collaboration_groups: Vec::new(),
      });
      entry.register_group(credited.clone());

      for artist in credited {
        *self.stats.entry(artist.clone()).or_insert(0) += 1;
        if artist != *seed {
          self
            .last_collab
            .entry(artist.clone())
            .and_modify(|d| {
              if date > *d {
                *d = date;
              }
            })
            .or_insert(date);
          if self.queued.insert(artist.clone()) {
            self.pending.push(artist);
          }
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::collab::{ArtistProfile, DatePrecision, ReleaseId, ReleaseSummary, TrackCredit};
  use crate::ports::ReleasePage;
  use async_trait::async_trait;
  use std::sync::atomic::{AtomicUsize, Ordering};

  fn profile(id: &str, name: &str, genres: &[&str]) -> ArtistProfile {
    ArtistProfile {
      id: ArtistId::new(id),
      name: name.to_string(),
      image_url: None,
      genres: genres.iter().map(|g| g.to_string()).collect(),
    }
  }

  fn release(id: &str, date: &str) -> ReleaseSummary {
    ReleaseSummary {
      id: ReleaseId::new(id),
      title: id.to_string(),
      release_date: date.to_string(),
      precision: DatePrecision::Day,
    }
  }

  fn catalog_track(id: &str, name: &str, preview: Option<&str>, credits: &[&str]) -> CatalogTrack {
    CatalogTrack {
      id: TrackId::new(id),
      name: name.to_string(),
      url: format!("https://example.com/track/{id}"),
      thumbnail_url: None,
      preview_url: preview.map(str::to_string),
      credited: credits
        .iter()
        .map(|c| TrackCredit { id: ArtistId::new(*c), name: c.to_string() })
        .collect(),
    }
  }

  /// Catálogo canned: páginas fijas, contador de llamadas y registro de
  /// tamaños de lote.
  struct MockCatalog {
    profiles: HashMap<ArtistId, ArtistProfile>,
    pages: Vec<Vec<ReleaseSummary>>,
    tracks: HashMap<ReleaseId, Vec<CatalogTrack>>,
    page_delay: Duration,
    calls: AtomicUsize,
    batch_sizes: std::sync::Mutex<Vec<usize>>,
  }

  impl MockCatalog {
    fn new(
      profiles: Vec<ArtistProfile>,
      pages: Vec<Vec<ReleaseSummary>>,
      tracks: Vec<(&str, Vec<CatalogTrack>)>,
    ) -> Self {
      Self {
        profiles: profiles.into_iter().map(|p| (p.id.clone(), p)).collect(),
        pages,
        tracks: tracks.into_iter().map(|(id, ts)| (ReleaseId::new(id), ts)).collect(),
        page_delay: Duration::ZERO,
        calls: AtomicUsize::new(0),
        batch_sizes: std::sync::Mutex::new(Vec::new()),
      }
    }

    fn total_calls(&self) -> usize {
      self.calls.load(Ordering::SeqCst)
    }
  }

  #[async_trait]
  impl CatalogClient for MockCatalog {
    async fn get_artist(&self, id: &ArtistId) -> Result<ArtistProfile, CatalogError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.profiles.get(id).cloned().ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn list_releases(
      &self,
      _artist: &ArtistId,
      _kinds: &[ReleaseKind],
      cursor: Option<&str>,
    ) -> Result<ReleasePage, CatalogError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      if !self.page_delay.is_zero() {
        tokio::time::sleep(self.page_delay).await;
      }
      let index: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
      let items = self.pages.get(index).cloned().unwrap_or_default();
      let next_cursor =
        if index + 1 < self.pages.len() { Some((index + 1).to_string()) } else { None };
      Ok(ReleasePage { items, next_cursor })
    }

    async fn list_tracks(&self, release: &ReleaseId) -> Result<Vec<CatalogTrack>, CatalogError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Ok(self.tracks.get(release).cloned().unwrap_or_default())
    }

    async fn get_artists_batch(&self, ids: &[ArtistId]) -> Result<Vec<ArtistProfile>, CatalogError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.batch_sizes.lock().unwrap().push(ids.len());
      Ok(
        ids
          .iter()
          .map(|id| {
            self.profiles.get(id).cloned().unwrap_or_else(|| profile(id.as_str(), id.as_str(), &[]))
          })
          .collect(),
      )
    }

    async fn search_artist(&self, _query: &str, _limit: usize) -> Result<Vec<ArtistProfile>, CatalogError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Ok(Vec::new())
    }
  }

  #[derive(Default)]
  struct MemoryCache {
    inner: std::sync::Mutex<HashMap<ArtistId, CrawlResult>>,
  }

  impl CacheStore for MemoryCache {
    fn get(&self, id: &ArtistId) -> Result<Option<CrawlResult>, CacheError> {
      Ok(self.inner.lock().unwrap().get(id).cloned())
    }

    fn put(&self, id: &ArtistId, result: &CrawlResult) -> Result<(), CacheError> {
      self.inner.lock().unwrap().insert(id.clone(), result.clone());
      Ok(())
    }
  }

  /// Store que siempre reporta snapshots corruptos.
  struct CorruptCache;

  impl CacheStore for CorruptCache {
    fn get(&self, _id: &ArtistId) -> Result<Option<CrawlResult>, CacheError> {
      Err(CacheError::Corrupt("truncated json".to_string()))
    }

    fn put(&self, _id: &ArtistId, _result: &CrawlResult) -> Result<(), CacheError> {
      Ok(())
    }
  }

  fn seed_id() -> ArtistId {
    ArtistId::new("X")
  }

  /// Escenario base: Track1 = [X, A] en 2020-01-01, Track2 = [X, A, B]
  /// en 2021-06-15.
  fn scenario_catalog() -> MockCatalog {
    MockCatalog::new(
      vec![profile("X", "Seed", &["rock"]), profile("A", "Alpha", &["pop"]), profile("B", "Beta", &[])],
      vec![vec![release("rel1", "2020-01-01")], vec![release("rel2", "2021-06-15")]],
      vec![
        ("rel1", vec![catalog_track("t1", "Track1", Some("p1"), &["X", "A"])]),
        ("rel2", vec![catalog_track("t2", "Track2", Some("p2"), &["X", "A", "B"])]),
      ],
    )
  }

  fn crawler(catalog: MockCatalog) -> CollabCrawler<MockCatalog, MemoryCache> {
    CollabCrawler::new(catalog, MemoryCache::default(), CrawlerConfig::default())
  }

  fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
  }

  #[tokio::test]
  async fn test_end_to_end_scenario() {
    let crawler = crawler(scenario_catalog());
    let result = crawler.crawl(&seed_id(), false).await.unwrap();

    assert_eq!(result.collab_count(&ArtistId::new("X")), 2);
    assert_eq!(result.collab_count(&ArtistId::new("A")), 2);
    assert_eq!(result.collab_count(&ArtistId::new("B")), 1);

    assert_eq!(result.last_collab[&ArtistId::new("A")], date("2021-06-15"));
    assert_eq!(result.last_collab[&ArtistId::new("B")], date("2021-06-15"));
    assert!(!result.last_collab.contains_key(&ArtistId::new("X")));

    // invariantes de todo CrawlResult
    assert!(result.stats.contains_key(&result.seed.id));
    assert!(result.artists.contains_key(&result.seed.id));
    assert!(result.stats.values().all(|n| *n >= 1));

    // drill-down por nodo
    assert_eq!(result.tracks_for(&ArtistId::new("B")).len(), 1);
    assert_eq!(result.tracks_for(&ArtistId::new("A")).len(), 2);
  }

  #[tokio::test]
  async fn test_second_crawl_hits_snapshot_with_zero_calls() {
    let crawler = crawler(scenario_catalog());

    let first = crawler.crawl(&seed_id(), false).await.unwrap();
    let calls_after_first = crawler.catalog.total_calls();

    let second = crawler.crawl(&seed_id(), false).await.unwrap();
    assert_eq!(crawler.catalog.total_calls(), calls_after_first);
    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn test_force_recrawls_and_overwrites() {
    let crawler = crawler(scenario_catalog());

    crawler.crawl(&seed_id(), false).await.unwrap();
    let calls_after_first = crawler.catalog.total_calls();

    crawler.crawl(&seed_id(), true).await.unwrap();
    assert!(crawler.catalog.total_calls() > calls_after_first);
  }

  #[tokio::test]
  async fn test_preview_dedup_collapses_same_recording() {
    // t1 y t1b comparten preview: la segunda aparición se descarta.
    // t3 y t4 no tienen preview: ambas sobreviven.
    let catalog = MockCatalog::new(
      vec![profile("X", "Seed", &[]), profile("A", "Alpha", &[])],
      vec![vec![release("rel1", "2020-01-01"), release("rel2", "2021-06-15")]],
      vec![
        ("rel1", vec![catalog_track("t1", "Uno", Some("same"), &["X", "A"])]),
        (
          "rel2",
          vec![
            catalog_track("t1b", "Uno (reedición)", Some("same"), &["X", "A"]),
            catalog_track("t3", "Dos", None, &["X", "A"]),
            catalog_track("t4", "Dos (alt)", None, &["X", "A"]),
          ],
        ),
      ],
    );

    let result = crawler(catalog).crawl(&seed_id(), false).await.unwrap();

    assert_eq!(result.tracks.len(), 3);
    assert!(!result.tracks.contains_key(&TrackId::new("t1b")));
    assert_eq!(result.collab_count(&ArtistId::new("A")), 3);
    // t3 y t4 sí cuentan: la última colaboración es la del release de 2021
    assert_eq!(result.last_collab[&ArtistId::new("A")], date("2021-06-15"));
  }

  #[tokio::test]
  async fn test_quarantined_release_does_not_abort_crawl() {
    let mut bad = release("bad", "???");
    bad.precision = DatePrecision::Day;

    let catalog = MockCatalog::new(
      vec![profile("X", "Seed", &[]), profile("A", "Alpha", &[])],
      vec![vec![bad, release("rel1", "2020-01-01")]],
      vec![
        ("bad", vec![catalog_track("tz", "Fantasma", None, &["X", "A"])]),
        ("rel1", vec![catalog_track("t1", "Uno", None, &["X", "A"])]),
      ],
    );

    let result = crawler(catalog).crawl(&seed_id(), false).await.unwrap();

    // el release corrupto no aporta pistas, el resto del crawl sigue
    assert_eq!(result.tracks.len(), 1);
    assert!(result.tracks.contains_key(&TrackId::new("t1")));
  }

  #[tokio::test]
  async fn test_detail_fetch_respects_batch_limit() {
    let collaborators = ["A", "B", "C", "D", "E"];
    let tracks: Vec<CatalogTrack> = collaborators
      .iter()
      .enumerate()
      .map(|(i, c)| catalog_track(&format!("t{i}"), c, None, &["X", c]))
      .collect();

    let catalog = MockCatalog::new(
      vec![profile("X", "Seed", &[])],
      vec![vec![release("rel1", "2020-01-01")]],
      vec![("rel1", tracks)],
    );

    let config = CrawlerConfig { batch_limit: 2, ..CrawlerConfig::default() };
    let crawler = CollabCrawler::new(catalog, MemoryCache::default(), config);
    let result = crawler.crawl(&seed_id(), false).await.unwrap();

    assert_eq!(*crawler.catalog.batch_sizes.lock().unwrap(), vec![2, 2, 1]);
    assert_eq!(result.artists.len(), 6); // 5 colaboradores + semilla
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
  async fn test_concurrent_crawls_join_one_flight() {
    let mut catalog = scenario_catalog();
    catalog.page_delay = Duration::from_millis(50);

    let crawler = Arc::new(crawler(catalog));

    let a = tokio::spawn({
      let crawler = Arc::clone(&crawler);
      async move { crawler.crawl(&seed_id(), false).await.unwrap() }
    });
    let b = tokio::spawn({
      let crawler = Arc::clone(&crawler);
      async move { crawler.crawl(&seed_id(), false).await.unwrap() }
    });

    let (ra, rb) = (a.await.unwrap(), b.await.unwrap());
    assert_eq!(ra, rb);

    // un único vuelo tocó la red: 1 artist + 2 páginas + 2 tracks + 1 batch
    assert_eq!(crawler.catalog.total_calls(), 6);
  }

  #[tokio::test]
  async fn test_corrupt_snapshot_is_a_miss() {
    let crawler =
      CollabCrawler::new(scenario_catalog(), CorruptCache, CrawlerConfig::default());

    let result = crawler.crawl(&seed_id(), false).await.unwrap();
    assert!(crawler.catalog.total_calls() > 0);
    assert_eq!(result.collab_count(&ArtistId::new("A")), 2);
  }

  #[tokio::test]
  async fn test_deadline_surfaces_timeout() {
    let mut catalog = scenario_catalog();
    catalog.page_delay = Duration::from_millis(100);

    let config = CrawlerConfig { deadline: Duration::from_millis(10), ..CrawlerConfig::default() };
    let crawler = CollabCrawler::new(catalog, MemoryCache::default(), config);

    let err = crawler.crawl(&seed_id(), false).await.unwrap_err();
    assert!(matches!(err, CollabError::Timeout));
  }
}
