/// Wikipedia thumbnail lookup client
///
/// Resolves a species' scientific name to a page thumbnail via the
/// MediaWiki pageimages API. A page without a thumbnail is a normal
/// outcome (the caller keeps its placeholder); a response without
/// `query.pages` is a malformed-response error.
use serde_json::Value;

use super::error::ApiError;

/// Maximum thumbnail dimension requested from the API
const THUMBNAIL_SIZE: u32 = 300;

/// MediaWiki API entry point on English Wikipedia
const API_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// Client for Wikipedia page-image lookups.
#[derive(Clone, Default)]
pub struct WikipediaClient {
    client: reqwest::Client,
}

impl WikipediaClient {
    /// Create a client for the English Wikipedia API.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the thumbnail for the page titled `sci_name`,
    /// following redirects (Wikipedia titles bird pages by common
    /// name and redirects the scientific one).
    ///
    /// Returns `Ok(None)` when the page has no thumbnail.
    pub async fn fetch_thumbnail(&self, sci_name: &str) -> Result<Option<String>, ApiError> {
        let size = THUMBNAIL_SIZE.to_string();

        let response = self
            .client
            .get(API_ENDPOINT)
            .query(&[
                ("action", "query"),
                ("prop", "pageimages|pageprops"),
                ("format", "json"),
                ("piprop", "thumbnail"),
                ("titles", sci_name),
                ("pithumbsize", size.as_str()),
                ("redirects", "1"),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("Wikipedia request failed: {e}")))?;

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

        let json: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("Wikipedia response parse failed: {e}")))?;

        extract_thumbnail_url(&json)
    }

    /// Download the bytes behind a resolved thumbnail URL so the UI
    /// can decode and display them.
    pub async fn fetch_image_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("thumbnail download failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: url.to_owned(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Request(format!("thumbnail download failed: {e}")))?;
        Ok(bytes.to_vec())
    }
}

/// Pull the first page's thumbnail URL out of a pageimages response.
///
/// The response maps page IDs to page objects. The query names a
/// single title with redirects followed, so the first page is the
/// page we asked about.
fn extract_thumbnail_url(json: &Value) -> Result<Option<String>, ApiError> {
    let pages = json
        .get("query")
        .and_then(|query| query.get("pages"))
        .and_then(Value::as_object)
        .ok_or_else(|| ApiError::MalformedResponse("missing query.pages".to_owned()))?;

    Ok(pages
        .values()
        .next()
        .and_then(|page| page.get("thumbnail"))
        .and_then(|thumbnail| thumbnail.get("source"))
        .and_then(Value::as_str)
        .map(ToOwned::to_owned))
}
