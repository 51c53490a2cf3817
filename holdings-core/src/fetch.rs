//! HTTP transport for holdings downloads.
//!
//! The [`Fetcher`] trait abstracts over the network so adapters and the update
//! run can be exercised with canned responses. [`HttpFetcher`] is the blocking
//! reqwest implementation used by the CLI.

use crate::error::{HoldingsError, Result};

/// Publishers reject requests without a browser-looking user agent.
pub const USER_AGENT: &str = "Mozilla/5.0";

/// Status and body of a completed GET request.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs GET requests.
pub trait Fetcher {
    /// Issue a GET for `url`. Any HTTP status is returned as a response;
    /// only transport failures are errors.
    fn get(&self, url: &str) -> Result<FetchResponse>;

    /// GET `url` and return the body, failing on non-2xx statuses.
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.get(url)?;
        if !resp.is_success() {
            return Err(HoldingsError::Fetch {
                status: resp.status,
                url: url.to_string(),
            });
        }
        Ok(resp.body)
    }

    /// GET `url` and decode the body as text (invalid UTF-8 is replaced).
    fn fetch_text(&self, url: &str) -> Result<String> {
        let bytes = self.fetch_bytes(url)?;
        Ok(decode_text(&bytes))
    }
}

/// Decode a text body as UTF-8 (lossy), dropping a leading byte-order mark.
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text.into_owned(),
    }
}

/// Blocking reqwest client with the fixed browser user agent.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HoldingsError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse> {
        tracing::debug!(url, "GET");
        let network = |e: reqwest::Error| HoldingsError::Network {
            url: url.to_string(),
            message: e.to_string(),
        };

        let resp = self.client.get(url).send().map_err(network)?;
        let status = resp.status().as_u16();
        let body = resp.bytes().map_err(network)?.to_vec();
        Ok(FetchResponse { status, body })
    }
}
