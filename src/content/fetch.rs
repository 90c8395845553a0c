use log::{debug, info};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use std::time::Duration;

use crate::error::LoadError;
use crate::models::SourceFile;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches remote documents into [`SourceFile`]s.
///
/// An optional CORS-relay prefix is prepended to every request with the
/// target URL percent-encoded as its query value, matching services like
/// allorigins. The size ceiling is enforced both on the declared
/// Content-Length and on the actual body.
pub struct UrlFetcher {
    client: Client,
    proxy_prefix: Option<String>,
    max_size: u64,
}

impl UrlFetcher {
    pub fn new(proxy_prefix: Option<String>, max_size: u64) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LoadError::FetchFailed {
                url: String::new(),
                reason: format!("cannot build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            proxy_prefix,
            max_size,
        })
    }

    /// Download `url` and package the response for the content loader.
    /// The response's Content-Type drives later format detection, with
    /// the URL's trailing path segment as the file name fallback.
    pub async fn fetch(&self, url: &str) -> Result<SourceFile, LoadError> {
        let request_url = self.request_url(url);
        debug!("Fetching {}", request_url);

        let response = self
            .client
            .get(&request_url)
            .send()
            .await
            .map_err(|e| fetch_err(url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_err(url, format!("HTTP status {}", response.status())));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_size {
                return Err(LoadError::FileTooLarge {
                    size: length,
                    limit: self.max_size,
                });
            }
        }

        let media_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| fetch_err(url, e.to_string()))?;
        if bytes.len() as u64 > self.max_size {
            return Err(LoadError::FileTooLarge {
                size: bytes.len() as u64,
                limit: self.max_size,
            });
        }

        info!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(SourceFile::new(
            file_name_from_url(url),
            media_type,
            bytes.to_vec(),
        ))
    }

    fn request_url(&self, url: &str) -> String {
        match &self.proxy_prefix {
            Some(prefix) => format!(
                "{}{}",
                prefix,
                utf8_percent_encode(url, NON_ALPHANUMERIC)
            ),
            None => url.to_string(),
        }
    }
}

fn fetch_err(url: &str, reason: String) -> LoadError {
    LoadError::FetchFailed {
        url: url.to_string(),
        reason,
    }
}

/// Trailing path segment of a URL, ignoring query and fragment.
fn file_name_from_url(url: &str) -> String {
    let trimmed = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .trim_end_matches('/');
    let name = trimmed.rsplit('/').next().unwrap_or("");
    if name.is_empty() || name.contains(':') {
        "download".to_string()
    } else {
        name.to_string()
    }
}
