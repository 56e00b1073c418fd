//! DuckDuckGo search provider — scraper-friendly, no API key required.
//!
//! Uses the HTML-only version at `https://html.duckduckgo.com/html/`
//! which requires no JavaScript and is tolerant of automated requests.
//! On failure the query is retried once with relaxed parameters (region
//! pinned, safe search dropped) before the error is surfaced.

use crate::config::AcquireConfig;
use crate::error::AcquireError;
use crate::http;
use crate::provider::SearchProvider;
use crate::types::SearchHit;
use scraper::{Html, Selector};
use url::Url;

/// DuckDuckGo HTML search scraper.
pub struct DuckDuckGoProvider;

impl DuckDuckGoProvider {
    /// Extract the actual URL from DuckDuckGo's redirect wrapper.
    ///
    /// DDG wraps URLs like: `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`
    /// We parse out the `uddg` query parameter and URL-decode it.
    fn extract_url(href: &str) -> Option<String> {
        let full_href = if href.starts_with("//") {
            format!("https:{href}")
        } else {
            href.to_string()
        };

        let parsed = Url::parse(&full_href).ok()?;

        if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
        } else {
            Some(full_href)
        }
    }

    async fn query(
        &self,
        query: &str,
        config: &AcquireConfig,
        relaxed: bool,
    ) -> Result<Vec<SearchHit>, AcquireError> {
        let client = http::build_client(config)?;

        let mut params = vec![("q", query)];
        if relaxed {
            // Relaxed fallback: pin the region and drop strict filtering.
            params.push(("kl", "us-en"));
        } else if config.safe_search {
            params.push(("kp", "1"));
        }

        let response = client
            .post("https://html.duckduckgo.com/html/")
            .form(&params)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| AcquireError::Http(format!("DuckDuckGo request failed: {e}")))?
            .error_for_status()
            .map_err(|e| AcquireError::Http(format!("DuckDuckGo HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| AcquireError::Http(format!("DuckDuckGo response read failed: {e}")))?;

        tracing::trace!(bytes = html.len(), "DuckDuckGo response received");

        parse_duckduckgo_html(&html, config.max_results_per_search)
    }
}

impl SearchProvider for DuckDuckGoProvider {
    async fn search(
        &self,
        query: &str,
        config: &AcquireConfig,
    ) -> Result<Vec<SearchHit>, AcquireError> {
        tracing::trace!(query, "DuckDuckGo search");

        match self.query(query, config, false).await {
            Ok(hits) => Ok(hits),
            Err(err) => {
                tracing::warn!(query, error = %err, "search failed, retrying with relaxed parameters");
                self.query(query, config, true).await
            }
        }
    }
}

/// Parse DuckDuckGo HTML response into search hits.
///
/// Extracted as a separate function for testability with fixture HTML.
pub(crate) fn parse_duckduckgo_html(
    html: &str,
    max_results: usize,
) -> Result<Vec<SearchHit>, AcquireError> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )
    .map_err(|e| AcquireError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse(".result__a")
        .map_err(|e| AcquireError::Parse(format!("invalid title selector: {e:?}")))?;
    let snippet_sel = Selector::parse(".result__snippet")
        .map_err(|e| AcquireError::Parse(format!("invalid snippet selector: {e:?}")))?;

    let mut hits = Vec::new();

    for element in document.select(&result_sel) {
        let title_el = match element.select(&title_sel).next() {
            Some(el) => el,
            None => continue,
        };

        let title = title_el.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let href = match title_el.value().attr("href") {
            Some(h) => h,
            None => continue,
        };

        let url = match DuckDuckGoProvider::extract_url(href) {
            Some(u) => u,
            None => continue,
        };

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        hits.push(SearchHit { title, url, snippet });

        if hits.len() >= max_results {
            break;
        }
    }

    tracing::debug!(count = hits.len(), "DuckDuckGo hits parsed");
    Ok(hits)
}
