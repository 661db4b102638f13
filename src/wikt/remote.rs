//! MediaWiki Action API backend.
//!
//! Fetches the current wikitext of a page with
//! `action=parse&prop=wikitext`. A successful response looks like:
//!
//! ```text
//! {"parse": {"title": "Haus", "pageid": 1234, "wikitext": "== Haus ({{Sprache|Deutsch}}) ==\n..."}}
//! ```
//!
//! A missing page is answered with an `error` object instead of `parse`.

use std::time::Duration;
use log::{debug, trace};
use reqwest::blocking::Client;
use serde::Deserialize;

use super::source::RecordSource;
use super::types::error::{Result, WiktError};

/// Action API endpoint of the German Wiktionary.
pub const DEFAULT_API_URL: &str = "https://de.wiktionary.org/w/api.php";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client that looks entries up online instead of in a local dump.
#[derive(Debug, Clone)]
pub struct RemoteApiStore {
    client: Client,
    endpoint: String,
}

impl RemoteApiStore {
    /// Builds a client for the German Wiktionary API.
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DEFAULT_API_URL, DEFAULT_TIMEOUT)
    }

    /// Builds a client for any MediaWiki `api.php` endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WiktError::Remote(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RecordSource for RemoteApiStore {
    fn fetch(&mut self, key: &str) -> Result<Option<String>> {
        debug!("Fetching '{}' from {}", key, self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("action", "parse"),
                ("prop", "wikitext"),
                ("page", key),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .map_err(|e| WiktError::Remote(format!("request for '{}' failed: {}", key, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WiktError::Remote(format!(
                "{} answered {} for '{}'",
                self.endpoint, status, key
            )));
        }
        let body = response
            .text()
            .map_err(|e| WiktError::Remote(format!("failed to read response body: {}", e)))?;
        trace!("Received {} bytes for '{}'", body.len(), key);
        parse_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    parse: Option<ParsedPage>,
}

#[derive(Debug, Deserialize)]
struct ParsedPage {
    wikitext: Option<String>,
}

/// Extract the wikitext from an Action API `parse` response body.
///
/// Returns `Ok(None)` when the response carries no page (missing title).
pub fn parse_response(body: &str) -> Result<Option<String>> {
    let response: ParseResponse = serde_json::from_str(body)
        .map_err(|e| WiktError::Remote(format!("malformed API response: {}", e)))?;
    Ok(response.parse.and_then(|page| page.wikitext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_wikitext_from_parse_payload() {
        let body = r#"{"parse":{"title":"Haus","pageid":1,"wikitext":"== Haus ({{Sprache|Deutsch}}) =="}}"#;
        assert_eq!(
            parse_response(body).unwrap().as_deref(),
            Some("== Haus ({{Sprache|Deutsch}}) ==")
        );
    }

    #[test]
    fn missing_page_is_not_found() {
        let body = r#"{"error":{"code":"missingtitle","info":"The page you specified doesn't exist."}}"#;
        assert_eq!(parse_response(body).unwrap(), None);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(matches!(parse_response("<html>"), Err(WiktError::Remote(_))));
    }
}
