//! Client for the external term-expansion collaborator.
//!
//! Looks up canonical ontology codes for a query term over HTTP. The
//! collaborator authenticates with OAuth2 client credentials; the access
//! token lives in a process-wide single-slot cache with acquire-once,
//! reuse-until-invalid semantics. Refresh is single-flight: the slot's
//! async mutex is held across the token request, so concurrent callers
//! wait on the in-progress acquisition instead of issuing duplicates.
//!
//! Expansion is best-effort enrichment. Every call is bounded by a client
//! timeout and failures surface as [`ExpansionError`], which the search
//! orchestrator logs and degrades past — never a crash loop and never a
//! failed search.

use crate::config;
use crate::error::ExpansionError;
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for the expansion collaborator.
#[derive(Debug, Clone)]
pub struct ExpansionConfig {
    /// Base URL; the client appends `/connect/token` and `/codes`.
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Per-request timeout. Defaults to [`config::EXPANSION_TIMEOUT_SECS`].
    pub timeout: Duration,
}

impl ExpansionConfig {
    pub fn new(base_url: String, client_id: String, client_secret: String) -> Self {
        Self {
            base_url,
            client_id,
            client_secret,
            timeout: Duration::from_secs(config::EXPANSION_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct CodeLookupResponse {
    #[serde(default)]
    linearizations: Vec<Linearization>,
}

#[derive(Debug, Deserialize)]
struct Linearization {
    code: Option<String>,
}

/// HTTP client with a cached bearer token.
pub struct ExpansionClient {
    http: reqwest::Client,
    config: ExpansionConfig,
    /// Single-slot token cache. Holding the lock across a refresh is what
    /// makes re-acquisition single-flight.
    token: tokio::sync::Mutex<Option<String>>,
}

impl ExpansionClient {
    pub fn new(config: ExpansionConfig) -> Result<Self, ExpansionError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExpansionError::Unavailable(e.to_string()))?;
        Ok(Self {
            http,
            config,
            token: tokio::sync::Mutex::new(None),
        })
    }

    /// Looks up canonical codes for `term`.
    ///
    /// On an authentication failure the cached token is invalidated and the
    /// lookup retried once with a fresh token; a second rejection surfaces
    /// as [`ExpansionError::Unauthorized`].
    pub async fn expand(&self, term: &str) -> Result<Vec<String>, ExpansionError> {
        let token = self.bearer_token().await?;
        match self.lookup(term, &token).await {
            Ok(codes) => Ok(codes),
            Err(ExpansionError::Unauthorized) => {
                self.invalidate(&token).await;
                let fresh = self.bearer_token().await?;
                self.lookup(term, &fresh).await
            }
            Err(e) => Err(e),
        }
    }

    /// Returns the cached token, acquiring one if the slot is empty.
    async fn bearer_token(&self) -> Result<String, ExpansionError> {
        let mut slot = self.token.lock().await;
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }
        let token = self.fetch_token().await?;
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Clears the slot, but only if it still holds the token that failed —
    /// a concurrent caller may already have refreshed it.
    async fn invalidate(&self, stale: &str) {
        let mut slot = self.token.lock().await;
        if slot.as_deref() == Some(stale) {
            *slot = None;
        }
    }

    async fn fetch_token(&self) -> Result<String, ExpansionError> {
        let url = format!("{}/connect/token", self.config.base_url);
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];
        let response = self
            .http
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ExpansionError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ExpansionError::Unavailable(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ExpansionError::Unavailable(e.to_string()))?;
        Ok(body.access_token)
    }

    async fn lookup(&self, term: &str, token: &str) -> Result<Vec<String>, ExpansionError> {
        let url = format!("{}/codes", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("q", term), ("useFlexisearch", "true")])
            .header(reqwest::header::ACCEPT, "application/json")
            .header("API-Version", "v2")
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ExpansionError::Unavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ExpansionError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(ExpansionError::Unavailable(format!(
                "code lookup returned {}",
                response.status()
            )));
        }

        let body: CodeLookupResponse = response
            .json()
            .await
            .map_err(|e| ExpansionError::Unavailable(e.to_string()))?;
        Ok(body
            .linearizations
            .into_iter()
            .filter_map(|entry| entry.code)
            .collect())
    }
}

impl std::fmt::Debug for ExpansionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpansionClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}
