//! One fetch cycle = fetch every city, score what arrived, rank the batch.
//! The ranked batch is cached for a fixed time-to-live.

use futures_util::{StreamExt, stream};
use moka::future::Cache;
use serde::Serialize;
use std::{
    fmt,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tracing::{info, warn};

use crate::{
    Config,
    cities::{City, load_cities},
    model::ScoredCity,
    profile::ScoringProfile,
    provider::{WeatherProvider, provider_from_config},
    rank::rank_cities,
    scoring::ScoreCalculator,
};

/// Outcome of the most recent cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheStatus {
    /// No request has been served yet.
    None,
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::None => "NONE",
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type RankedBatch = Arc<Vec<ScoredCity>>;

pub struct ComfortService {
    provider: Arc<dyn WeatherProvider>,
    scorer: ScoreCalculator,
    cities: Vec<City>,
    cache: Cache<String, RankedBatch>,
    cache_key: String,
    concurrency: usize,
    last_status: Mutex<CacheStatus>,
}

impl ComfortService {
    pub fn new(provider: Arc<dyn WeatherProvider>, cities: Vec<City>, ttl: Duration) -> Self {
        let scorer = ScoreCalculator::default();
        let cache_key = cache_key_for(scorer.profile());
        Self {
            provider,
            scorer,
            cities,
            cache: Cache::builder().max_capacity(16).time_to_live(ttl).build(),
            cache_key,
            concurrency: 4,
            last_status: Mutex::new(CacheStatus::None),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider: Arc<dyn WeatherProvider> = provider_from_config(config)?.into();
        let cities = load_cities(&config.cities_file);
        info!(cities = cities.len(), ttl_secs = config.cache_ttl_secs, "comfort service ready");

        let service = Self::new(provider, cities, config.cache_ttl());
        Ok(service.with_concurrency(config.fetch_concurrency))
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Swap the scoring profile. The cache key follows the profile version.
    pub fn with_profile(mut self, profile: ScoringProfile) -> Self {
        self.cache_key = cache_key_for(&profile);
        self.scorer = ScoreCalculator::new(profile);
        self
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    pub fn last_cache_status(&self) -> CacheStatus {
        *self.last_status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The current ranked batch, from cache when fresh.
    ///
    /// Concurrent misses share a single fetch cycle; callers that waited on
    /// another caller's cycle see a hit.
    pub async fn ranked_cities(&self) -> RankedBatch {
        let fetched = AtomicBool::new(false);
        let batch = self
            .cache
            .get_with(self.cache_key.clone(), async {
                fetched.store(true, Ordering::Relaxed);
                Arc::new(self.fetch_cycle().await)
            })
            .await;

        let status =
            if fetched.load(Ordering::Relaxed) { CacheStatus::Miss } else { CacheStatus::Hit };
        *self.last_status.lock().unwrap_or_else(PoisonError::into_inner) = status;

        batch
    }

    /// Fetch, score and rank every configured city, bypassing the cache.
    /// Cities whose fetch fails are left out of the batch.
    pub async fn fetch_cycle(&self) -> Vec<ScoredCity> {
        let scored: Vec<Option<ScoredCity>> = stream::iter(self.cities.clone())
            .map(|city| async move { self.fetch_and_score(&city).await })
            .buffered(self.concurrency)
            .collect()
            .await;

        let scored: Vec<ScoredCity> = scored.into_iter().flatten().collect();
        info!(scored = scored.len(), configured = self.cities.len(), "fetch cycle complete");

        rank_cities(scored)
    }

    async fn fetch_and_score(&self, city: &City) -> Option<ScoredCity> {
        match self.provider.fetch_observation(city.id).await {
            Ok(observation) => {
                let score = self.scorer.score(&observation);
                Some(ScoredCity::new(observation, score))
            }
            Err(err) => {
                warn!(city_id = city.id, city = %city.name, error = %err, "skipping city");
                None
            }
        }
    }
}

fn cache_key_for(profile: &ScoringProfile) -> String {
    format!("weather-results:{}", profile.version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::WeatherObservation, provider::FetchError};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug, Default)]
    struct FakeProvider {
        temperatures: HashMap<i64, f64>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn with(entries: &[(i64, f64)]) -> Self {
            Self { temperatures: entries.iter().copied().collect(), calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch_observation(&self, city_id: i64) -> Result<WeatherObservation, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let temperature = *self
                .temperatures
                .get(&city_id)
                .ok_or(FetchError::Status { status: 404, body: "city not found".into() })?;

            Ok(WeatherObservation {
                city_id,
                city_name: format!("City {city_id}"),
                temperature,
                humidity: 50,
                wind_speed: 4.0,
                cloud_percentage: 30,
                visibility: 10,
                pressure: 1013,
                weather_description: "clear sky".into(),
                is_snowing: false,
                observed_at: Utc::now(),
            })
        }
    }

    fn cities(ids: &[i64]) -> Vec<City> {
        ids.iter().map(|&id| City { id, name: format!("City {id}") }).collect()
    }

    fn service(provider: Arc<FakeProvider>, ids: &[i64], ttl: Duration) -> ComfortService {
        ComfortService::new(provider, cities(ids), ttl)
    }

    #[tokio::test]
    async fn failed_cities_are_skipped_and_rest_ranked() {
        let provider = Arc::new(FakeProvider::with(&[(1, 5.0), (3, 22.0), (4, 30.0)]));
        let svc = service(provider, &[1, 2, 3, 4], Duration::from_secs(60));

        let batch = svc.ranked_cities().await;

        let ids: Vec<i64> = batch.iter().map(|c| c.city_id()).collect();
        let ranks: Vec<u32> = batch.iter().map(|c| c.rank).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(ranks, vec![3, 1, 2]);
        assert_eq!(batch[1].comfort_score, 98.0);
        assert!(batch.iter().all(|c| (0.0..=100.0).contains(&c.comfort_score)));
    }

    #[tokio::test]
    async fn second_request_is_served_from_cache() {
        let provider = Arc::new(FakeProvider::with(&[(1, 20.0), (2, 25.0)]));
        let svc = service(provider.clone(), &[1, 2], Duration::from_secs(60));

        assert_eq!(svc.last_cache_status(), CacheStatus::None);

        let first = svc.ranked_cities().await;
        assert_eq!(svc.last_cache_status(), CacheStatus::Miss);

        let second = svc.ranked_cities().await;
        assert_eq!(svc.last_cache_status(), CacheStatus::Hit);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn expired_entry_triggers_a_new_cycle() {
        let provider = Arc::new(FakeProvider::with(&[(1, 20.0)]));
        let svc = service(provider.clone(), &[1], Duration::from_millis(20));

        svc.ranked_cities().await;
        tokio::time::sleep(Duration::from_millis(200)).await;
        svc.ranked_cities().await;

        assert_eq!(svc.last_cache_status(), CacheStatus::Miss);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn ranked_cities_runs_on_a_spawned_task() {
        let provider = Arc::new(FakeProvider::with(&[(1, 22.0), (2, 12.0)]));
        let svc = Arc::new(service(provider, &[1, 2], Duration::from_secs(60)));

        let task = {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { svc.ranked_cities().await })
        };
        let batch = task.await.expect("task should not panic");

        assert_eq!(batch.iter().map(|c| c.rank).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(svc.last_cache_status(), CacheStatus::Miss);
    }

    #[tokio::test]
    async fn total_failure_yields_empty_batch() {
        let provider = Arc::new(FakeProvider::default());
        let svc = service(provider, &[1, 2, 3], Duration::from_secs(60));

        assert!(svc.ranked_cities().await.is_empty());
        assert_eq!(svc.last_cache_status(), CacheStatus::Miss);
    }

    #[tokio::test]
    async fn fetch_cycle_keeps_city_order_with_parallel_fetches() {
        let entries: Vec<(i64, f64)> = (1..=10).map(|id| (id, 10.0 + id as f64)).collect();
        let provider = Arc::new(FakeProvider::with(&entries));
        let ids: Vec<i64> = (1..=10).collect();
        let svc = service(provider, &ids, Duration::from_secs(60)).with_concurrency(3);

        let batch = svc.fetch_cycle().await;
        let got: Vec<i64> = batch.iter().map(|c| c.city_id()).collect();
        assert_eq!(got, ids);
    }

    #[test]
    fn cache_key_follows_profile_version() {
        let provider = Arc::new(FakeProvider::default());
        let svc = service(provider.clone(), &[], Duration::from_secs(1));
        assert_eq!(svc.cache_key(), "weather-results:comfort-v3");

        let bumped = ScoringProfile { version: "comfort-v4", ..ScoringProfile::standard() };
        let svc = service(provider, &[], Duration::from_secs(1)).with_profile(bumped);
        assert_eq!(svc.cache_key(), "weather-results:comfort-v4");
    }

    #[test]
    fn cache_status_serializes_uppercase() {
        assert_eq!(serde_json::to_value(CacheStatus::Hit).unwrap(), "HIT");
        assert_eq!(CacheStatus::None.to_string(), "NONE");
    }
}
