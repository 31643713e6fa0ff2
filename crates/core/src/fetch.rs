//! Page fetching from URLs, files, and stdin.
//!
//! Live pages are fetched over HTTP; saved pages can be read from a file or
//! standard input so the extractors can run offline.

use std::fs;
use std::path::PathBuf;
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use tracing::debug;
#[cfg(feature = "fetch")]
use url::Url;

use crate::{PelotonError, Result};

/// HTTP client configuration for fetching pages.
///
/// This struct controls timeout and user agent settings for HTTP requests.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/124.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Fetches a page and returns its body as text.
///
/// Sends a browser-like identification. Any non-2xx status is an error
/// carrying the status code; there are no retries.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| PelotonError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(PelotonError::InvalidUrl(format!(
            "unsupported scheme {:?} (expected http or https)",
            parsed_url.scheme()
        )));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(|e| PelotonError::ClientUnavailable(e.to_string()))?;

    debug!(%url, "fetching page");

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| timeout_or_http(e, config.timeout))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PelotonError::HttpStatus { status: status.as_u16(), url: url.to_string() });
    }

    let content = response.text().await.map_err(|e| timeout_or_http(e, config.timeout))?;
    debug!(bytes = content.len(), "fetched page");

    Ok(content)
}

#[cfg(feature = "fetch")]
fn timeout_or_http(err: reqwest::Error, timeout: u64) -> PelotonError {
    if err.is_timeout() { PelotonError::Timeout { timeout } } else { PelotonError::HttpError(err) }
}

/// Reads a saved page from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(PelotonError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(PelotonError::from)
    }
}

/// Reads a saved page from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(PelotonError::from)?;

    Ok(buffer)
}
