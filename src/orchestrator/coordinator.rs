//! Search fan-out coordinator: one concurrent task per search term.
//!
//! Each term queries the search provider, partitions hits into trusted and
//! untrusted (trusted processed first), applies per-term domain caps
//! (trusted domains get double), skips blacklisted and already-claimed
//! URLs, and extracts accepted pages sequentially with a politeness delay
//! between extractions. Terms run concurrently and are joined before the
//! caller proceeds; a failure in one term never cancels the others.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{self, CacheKey};
use crate::config::AcquireConfig;
use crate::extract;
use crate::http;
use crate::provider::SearchProvider;
use crate::trust;
use crate::types::{SearchHit, SourceFragment};

use super::session::SessionState;

/// Run all search terms concurrently and join their fragments.
///
/// The returned order is: all fragments of the first term, then the
/// second, and so on — completion order never leaks into the result.
pub async fn run_terms<P: SearchProvider>(
    terms: &[String],
    keywords: &[String],
    config: &AcquireConfig,
    provider: &P,
    session: &SessionState,
) -> Vec<SourceFragment> {
    let tasks: Vec<_> = terms
        .iter()
        .map(|term| run_one_term(term, keywords, config, provider, session))
        .collect();

    let per_term = futures::future::join_all(tasks).await;

    per_term.into_iter().flatten().collect()
}

/// Search one term and extract its accepted hits.
///
/// All failures are absorbed here: a provider error or a panic-free
/// extraction failure yields fewer fragments, never an error.
async fn run_one_term<P: SearchProvider>(
    term: &str,
    keywords: &[String],
    config: &AcquireConfig,
    provider: &P,
    session: &SessionState,
) -> Vec<SourceFragment> {
    let hits = match search_with_cache(term, config, provider).await {
        Ok(hits) => hits,
        Err(err) => {
            tracing::warn!(term, error = %err, "search term failed, continuing without it");
            return Vec::new();
        }
    };

    let (trusted, untrusted): (Vec<SearchHit>, Vec<SearchHit>) =
        hits.into_iter().partition(|hit| trust::is_trusted(&hit.url));
    tracing::debug!(
        term,
        trusted = trusted.len(),
        untrusted = untrusted.len(),
        "hits partitioned"
    );

    let client = match http::build_client(config) {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(term, error = %err, "client construction failed for term");
            return Vec::new();
        }
    };

    let mut fragments = Vec::new();
    let mut domain_counts: HashMap<String, usize> = HashMap::new();

    // Trusted hits first, then the rest.
    for hit in trusted.into_iter().chain(untrusted) {
        if hit.url.is_empty() {
            continue;
        }
        if trust::is_blacklisted(&hit.url) {
            tracing::debug!(url = %hit.url, "skipping blacklisted domain");
            continue;
        }

        let domain = trust::extract_domain(&hit.url);
        let is_trusted = trust::is_trusted(&hit.url);
        let cap = if is_trusted {
            config.max_per_domain_per_term * 2
        } else {
            config.max_per_domain_per_term
        };
        if domain_counts.get(&domain).copied().unwrap_or(0) >= cap {
            tracing::debug!(%domain, "per-term domain cap reached");
            continue;
        }

        // Atomic cross-term claim; a URL another term already took is
        // skipped outright.
        if !session.claim(&hit.url) {
            continue;
        }
        *domain_counts.entry(domain).or_insert(0) += 1;

        let extracted = extract::extract(&client, &hit.url, keywords, config).await;
        tracing::debug!(url = %hit.url, count = extracted.len(), "sections extracted");
        fragments.extend(extracted);

        // Politeness delay per accepted extraction within a term.
        if config.rate_limit_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.rate_limit_delay_ms)).await;
        }
    }

    fragments
}

/// Query the provider through the process-wide hit cache.
async fn search_with_cache<P: SearchProvider>(
    term: &str,
    config: &AcquireConfig,
    provider: &P,
) -> Result<Vec<SearchHit>, crate::error::AcquireError> {
    let key = CacheKey::new(term, config.max_results_per_search);

    if let Some(hits) = cache::get(&key, config.cache_ttl_secs).await {
        tracing::trace!(term, count = hits.len(), "cache hit");
        return Ok(hits);
    }

    let hits = provider.search(term, config).await?;
    cache::insert(key, hits.clone(), config.cache_ttl_secs).await;
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AcquireError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider returning canned hits per query, counting invocations.
    struct StubProvider {
        hits: Vec<SearchHit>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl StubProvider {
        fn new(hits: Vec<SearchHit>) -> Self {
            Self {
                hits,
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                hits: Vec::new(),
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }
    }

    impl SearchProvider for StubProvider {
        async fn search(
            &self,
            _query: &str,
            _config: &AcquireConfig,
        ) -> Result<Vec<SearchHit>, AcquireError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AcquireError::Http("stub outage".into()));
            }
            Ok(self.hits.clone())
        }
    }

    fn hit(url: &str) -> SearchHit {
        SearchHit {
            title: "Title".into(),
            url: url.into(),
            snippet: "snippet".into(),
        }
    }

    fn test_config() -> AcquireConfig {
        AcquireConfig {
            rate_limit_delay_ms: 0,
            cache_ttl_secs: 0,
            request_timeout_secs: 1,
            max_retries: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn failing_provider_yields_empty_not_error() {
        let provider = StubProvider::failing();
        let session = SessionState::new();
        let terms = vec!["some term".to_string()];
        let fragments =
            run_terms(&terms, &terms, &test_config(), &provider, &session).await;
        assert!(fragments.is_empty());
    }

    #[tokio::test]
    async fn one_failing_term_does_not_poison_others() {
        // Both terms hit the same failing provider; the join must still
        // return cleanly with everything absorbed.
        let provider = StubProvider::failing();
        let session = SessionState::new();
        let terms = vec!["first".to_string(), "second".to_string()];
        let fragments =
            run_terms(&terms, &terms, &test_config(), &provider, &session).await;
        assert!(fragments.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn blacklisted_hits_never_claimed() {
        let provider = StubProvider::new(vec![hit("https://reddit.com/r/science")]);
        let session = SessionState::new();
        let terms = vec!["science".to_string()];
        let fragments =
            run_terms(&terms, &terms, &test_config(), &provider, &session).await;
        assert!(fragments.is_empty());
        // The blacklist rejection happens before the claim.
        assert_eq!(session.claimed_count(), 0);
    }

    #[tokio::test]
    async fn duplicate_urls_across_terms_claimed_once() {
        // Same hit from two terms; the URL must only be claimed once.
        // Extraction fails fast (unroutable port), which is fine — the
        // claim bookkeeping is what is under test.
        let provider = StubProvider::new(vec![hit("http://127.0.0.1:1/page")]);
        let session = SessionState::new();
        let terms = vec!["alpha".to_string(), "beta".to_string()];
        let _ = run_terms(&terms, &terms, &test_config(), &provider, &session).await;
        assert_eq!(session.claimed_count(), 1);
    }

    #[tokio::test]
    async fn per_term_domain_cap_limits_claims() {
        // Four untrusted hits from one domain with a cap of 2: only two
        // URLs may be claimed.
        let provider = StubProvider::new(vec![
            hit("http://127.0.0.1:1/a"),
            hit("http://127.0.0.1:1/b"),
            hit("http://127.0.0.1:1/c"),
            hit("http://127.0.0.1:1/d"),
        ]);
        let session = SessionState::new();
        let config = AcquireConfig {
            max_per_domain_per_term: 2,
            ..test_config()
        };
        let terms = vec!["gamma".to_string()];
        let _ = run_terms(&terms, &terms, &config, &provider, &session).await;
        assert_eq!(session.claimed_count(), 2);
    }

    #[tokio::test]
    async fn cached_term_not_re_searched_within_ttl() {
        // Empty hit lists are cached too; the second run must be served
        // from the cache rather than the provider.
        let provider = StubProvider::new(vec![]);
        let config = AcquireConfig {
            cache_ttl_secs: 600,
            ..test_config()
        };
        let terms = vec!["coordinator cache probe term".to_string()];

        let _ = run_terms(&terms, &terms, &config, &provider, &SessionState::new()).await;
        let _ = run_terms(&terms, &terms, &config, &provider, &SessionState::new()).await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_terms_make_no_provider_calls() {
        let provider = StubProvider::new(vec![]);
        let session = SessionState::new();
        let fragments = run_terms(&[], &[], &test_config(), &provider, &session).await;
        assert!(fragments.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
