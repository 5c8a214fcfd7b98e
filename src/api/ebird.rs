/// eBird observation query client
///
/// Issues read-only requests to the eBird v2 API for recent or
/// notable observations around a coordinate pair. Coordinates are
/// passed through exactly as the user typed them; the form layer only
/// guarantees they are non-empty.
use reqwest::Url;

use super::error::ApiError;
use crate::state::data::Observation;

/// Fixed result cap for every observation query
const MAX_RESULTS: u32 = 30;

/// Environment variable holding the eBird API token
const TOKEN_ENV_VAR: &str = "EBIRD_API_TOKEN";

/// Recent observations near a point
const RECENT_ENDPOINT: &str = "https://api.ebird.org/v2/data/obs/geo/recent";
/// Notable (locally rare) observations near a point
const NOTABLE_ENDPOINT: &str = "https://api.ebird.org/v2/data/obs/geo/recent/notable";

/// Client for the eBird v2 observations API.
///
/// Holds a shared connection pool and the API token; cheap to clone
/// into background tasks.
#[derive(Clone)]
pub struct EbirdClient {
    client: reqwest::Client,
    token: String,
}

impl EbirdClient {
    /// Create a client with an explicit API token.
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }

    /// Create a client from the `EBIRD_API_TOKEN` environment variable.
    pub fn from_env() -> Result<Self, ApiError> {
        match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.trim().is_empty() => Ok(Self::new(token)),
            _ => Err(ApiError::MissingCredentials),
        }
    }

    /// Query observations around a coordinate pair. `notable_only`
    /// selects the notable endpoint over the recent one.
    ///
    /// One request, no retries; any failure surfaces as an [`ApiError`]
    /// for the caller to report.
    pub async fn query_observations(
        &self,
        lat: &str,
        lng: &str,
        notable_only: bool,
    ) -> Result<Vec<Observation>, ApiError> {
        let url = request_url(endpoint(notable_only), lat, lng)?;

        let response = self
            .client
            .get(url)
            .header("X-eBirdApiToken", &self.token)
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("eBird request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Vec<Observation>>()
            .await
            .map_err(|e| ApiError::Decode(format!("eBird response parse failed: {e}")))
    }
}

/// Pick the endpoint template for a search.
fn endpoint(notable_only: bool) -> &'static str {
    if notable_only {
        NOTABLE_ENDPOINT
    } else {
        RECENT_ENDPOINT
    }
}

/// Build the full query URL for one search.
fn request_url(endpoint: &str, lat: &str, lng: &str) -> Result<Url, ApiError> {
    let max_results = MAX_RESULTS.to_string();
    Url::parse_with_params(
        endpoint,
        [("lat", lat), ("lng", lng), ("maxResults", max_results.as_str())],
    )
    .map_err(|e| ApiError::Request(format!("invalid query URL: {e}")))
}
