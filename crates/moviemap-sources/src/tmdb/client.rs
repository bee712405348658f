use crate::error::EnrichError;
use crate::tmdb::api::{Credits, CrewMember, FindResponse, MovieDetails};
use crate::traits::{EnrichedMovie, Enricher, Lookup};
use async_trait::async_trait;
use moviemap_config::TmdbSettings;
use moviemap_models::CandidateRecord;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Rate-limited, retrying client for the TMDB read-only API.
///
/// Call discipline per request:
/// - HTTP 429: sleep the fixed back-off window and retry the same call;
///   throttling does not consume the retry budget.
/// - Any other failure: bounded retries with linearly increasing delay.
/// - After every successful call, a politeness delay is slept before the
///   next one.
///
/// The throttle state assumes sequential access; callers must not issue
/// concurrent requests through one client.
pub struct TmdbClient {
    http: Client,
    api_key: String,
    base_url: String,
    request_delay: Duration,
    retry_limit: u32,
    rate_limit_backoff: Duration,
}

impl TmdbClient {
    pub fn new(api_key: String, settings: &TmdbSettings) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_delay: Duration::from_millis(settings.request_delay_ms),
            retry_limit: settings.retry_limit.max(1),
            rate_limit_backoff: Duration::from_secs(settings.rate_limit_backoff_secs),
        }
    }

    /// Point the client at a different base URL (local mock in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: String,
    ) -> Result<T, EnrichError> {
        let mut attempts = 0u32;
        loop {
            match self.http.get(&url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        warn!(
                            endpoint,
                            backoff_secs = self.rate_limit_backoff.as_secs(),
                            "Rate limited by TMDB, backing off"
                        );
                        sleep(self.rate_limit_backoff).await;
                        continue;
                    }
                    if !status.is_success() {
                        attempts += 1;
                        if attempts >= self.retry_limit {
                            return Err(EnrichError::Http {
                                endpoint,
                                status: status.as_u16(),
                                attempts,
                            });
                        }
                        debug!(
                            endpoint,
                            status = status.as_u16(),
                            attempt = attempts,
                            "TMDB call failed, retrying"
                        );
                        sleep(Duration::from_secs(attempts as u64)).await;
                        continue;
                    }

                    // A body that fails to decode is retried like any
                    // other non-throttle failure; it may be a truncated
                    // transfer rather than a schema change.
                    match response.json::<T>().await {
                        Ok(parsed) => {
                            sleep(self.request_delay).await;
                            return Ok(parsed);
                        }
                        Err(source) => {
                            attempts += 1;
                            if attempts >= self.retry_limit {
                                return Err(EnrichError::Decode { endpoint, source });
                            }
                            debug!(
                                endpoint,
                                attempt = attempts,
                                "TMDB response body failed to decode, retrying"
                            );
                            sleep(Duration::from_secs(attempts as u64)).await;
                        }
                    }
                }
                Err(source) => {
                    attempts += 1;
                    if attempts >= self.retry_limit {
                        return Err(EnrichError::Transport {
                            endpoint,
                            attempts,
                            source,
                        });
                    }
                    debug!(endpoint, attempt = attempts, "TMDB request error, retrying");
                    sleep(Duration::from_secs(attempts as u64)).await;
                }
            }
        }
    }

    async fn find_by_imdb_id(&self, imdb_id: &str) -> Result<Option<u64>, EnrichError> {
        let url = format!(
            "{}/find/{}?api_key={}&external_source=imdb_id",
            self.base_url, imdb_id, self.api_key
        );
        let found: FindResponse = self.get_json("find", url).await?;
        Ok(found.movie_results.first().map(|m| m.id))
    }

    async fn movie_details(&self, tmdb_id: u64) -> Result<MovieDetails, EnrichError> {
        let url = format!("{}/movie/{}?api_key={}", self.base_url, tmdb_id, self.api_key);
        self.get_json("details", url).await
    }

    async fn movie_credits(&self, tmdb_id: u64) -> Result<Credits, EnrichError> {
        let url = format!(
            "{}/movie/{}/credits?api_key={}",
            self.base_url, tmdb_id, self.api_key
        );
        self.get_json("credits", url).await
    }
}

#[async_trait]
impl Enricher for TmdbClient {
    async fn resolve(&self, candidate: &CandidateRecord) -> Result<Lookup, EnrichError> {
        let Some(tmdb_id) = self.find_by_imdb_id(&candidate.imdb_id).await? else {
            return Ok(Lookup::NotFound {
                reason: "not found on TMDB".to_string(),
            });
        };

        let details = self.movie_details(tmdb_id).await?;
        let credits = self.movie_credits(tmdb_id).await?;

        // A record without production countries cannot be placed on the
        // map and is not worth storing automatically.
        if details.production_countries.is_empty() {
            return Ok(Lookup::NotFound {
                reason: "no production regions".to_string(),
            });
        }

        let countries: Vec<String> = details
            .production_countries
            .iter()
            .map(|c| c.iso_3166_1.clone())
            .collect();
        let country_names: BTreeMap<String, String> = details
            .production_countries
            .iter()
            .map(|c| (c.iso_3166_1.clone(), c.name.clone()))
            .collect();

        // The export's own fields win where present; the service fills
        // the gaps.
        let enriched = EnrichedMovie {
            title: details
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| candidate.title.clone()),
            year: candidate
                .year
                .or_else(|| details.release_date.as_deref().and_then(release_year)),
            poster: details.poster_path,
            rating: candidate.imdb_rating.or(details.vote_average),
            director: pick_director(&credits.crew, &candidate.directors),
            genres: if candidate.genres.is_empty() {
                details.genres.into_iter().map(|g| g.name).collect()
            } else {
                candidate.genres.clone()
            },
            countries,
            country_names,
            tmdb_id,
        };

        Ok(Lookup::Found(enriched))
    }

    fn name(&self) -> &str {
        "tmdb"
    }
}

/// First credit with the Director job, falling back to the first name in
/// the export's own director field.
fn pick_director(crew: &[CrewMember], fallback: &str) -> Option<String> {
    crew.iter()
        .find(|c| c.job == "Director")
        .map(|c| c.name.clone())
        .or_else(|| {
            fallback
                .split(',')
                .map(str::trim)
                .find(|s| !s.is_empty())
                .map(str::to_string)
        })
}

fn release_year(date: &str) -> Option<u32> {
    date.get(..4)?.parse().ok()
}
