//! Trait definition for pluggable web-search providers.
//!
//! The acquisition engine treats web search as an external collaborator:
//! a text query goes out, a list of `{title, url, snippet}` hits comes
//! back. Provider failures are recoverable — the coordinator logs them and
//! continues with an empty hit list for that term.

use crate::config::AcquireConfig;
use crate::error::AcquireError;
use crate::types::SearchHit;

/// A pluggable web-search backend.
///
/// Implementors handle their own query encoding, HTTP plumbing, response
/// parsing, and any provider-specific fallback (the built-in DuckDuckGo
/// provider retries once with relaxed parameters before giving up).
///
/// All implementations must be `Send + Sync` for concurrent per-term
/// queries.
pub trait SearchProvider: Send + Sync {
    /// Run one search query, returning up to
    /// `config.max_results_per_search` hits.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError`] if the provider is unreachable or its
    /// response cannot be parsed. Callers treat an error as "no hits for
    /// this term", never as a fatal condition.
    fn search(
        &self,
        query: &str,
        config: &AcquireConfig,
    ) -> impl std::future::Future<Output = Result<Vec<SearchHit>, AcquireError>> + Send;
}
