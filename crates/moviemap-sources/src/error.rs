/// Terminal failure of an enrichment attempt, after all retries were
/// exhausted. Throttling (HTTP 429) never surfaces here; it is absorbed
/// by blocking back-off inside the client.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error("HTTP {status} from {endpoint} after {attempts} attempts")]
    Http {
        endpoint: &'static str,
        status: u16,
        attempts: u32,
    },

    #[error("request to {endpoint} failed after {attempts} attempts: {source}")]
    Transport {
        endpoint: &'static str,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}
