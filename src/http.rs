//! Shared HTTP client with User-Agent rotation for scraping requests.
//!
//! Provides a configured [`reqwest::Client`] with browser-like headers,
//! cookie support, and rotating User-Agent strings, plus a bounded-retry
//! page fetch helper.

use crate::config::AcquireConfig;
use crate::error::AcquireError;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Realistic browser User-Agent strings, rotated per client.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Build a [`reqwest::Client`] configured for scraping.
///
/// The client has a cookie store (for consent interstitials), the timeout
/// from config, a random User-Agent from the rotation list (or the custom
/// one if configured), and bounded redirects.
///
/// # Errors
///
/// Returns [`AcquireError::Http`] if the client cannot be constructed.
pub fn build_client(config: &AcquireConfig) -> Result<reqwest::Client, AcquireError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => random_user_agent().to_owned(),
    };

    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| AcquireError::Http(format!("failed to build HTTP client: {e}")))
}

/// Select a random User-Agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        // SAFETY: USER_AGENTS is a non-empty const array, choose only returns None on empty slices
        .unwrap_or(USER_AGENTS[0])
}

/// Fetch a page body as text, retrying transient failures up to
/// `max_retries` total attempts.
///
/// # Errors
///
/// Returns [`AcquireError::Http`] once every attempt has failed (request
/// error, non-success status, or unreadable body).
pub async fn fetch_html(
    client: &reqwest::Client,
    url: &str,
    max_retries: u32,
) -> Result<String, AcquireError> {
    let attempts = max_retries.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match try_fetch(client, url).await {
            Ok(body) => return Ok(body),
            Err(err) => {
                tracing::trace!(url, attempt, error = %err, "fetch attempt failed");
                last_error = err;
            }
        }
    }

    Err(AcquireError::Http(format!(
        "fetch failed after {attempts} attempts: {last_error}"
    )))
}

async fn try_fetch(client: &reqwest::Client, url: &str) -> Result<String, String> {
    let response = client
        .get(url)
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| format!("request failed: {e}"))?
        .error_for_status()
        .map_err(|e| format!("HTTP status error: {e}"))?;

    response
        .text()
        .await
        .map_err(|e| format!("body read failed: {e}"))
}
