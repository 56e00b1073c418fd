//! # wellspring
//!
//! Source acquisition and relevance ranking for deep web research.
//!
//! This crate turns a set of search questions into a bounded,
//! deduplicated, diversity-constrained, trust-weighted list of content
//! fragments ready for downstream summarization. It is the acquisition
//! core of a research pipeline; summarization, verification, and answer
//! synthesis live outside it, behind the two collaborator traits.
//!
//! ## Design
//!
//! - One concurrent task per search term, joined before selection
//! - Multi-factor relevance scoring: keyword coverage, content quality,
//!   and a domain-trust boost from static reference registries
//! - Heading-delimited content extraction with lenient inclusion
//! - Per-term and final per-domain caps, a trusted-share quota, and a
//!   minimum-source floor with cap relaxation
//! - Iterative refinement: follow-up search terms proposed by an external
//!   text-generation capability until coverage is achieved
//! - Graceful degradation: fetch, parse, and provider failures shrink the
//!   result, they never abort a round
//!
//! ## Security
//!
//! - No API keys required by the built-in DuckDuckGo provider
//! - No network listeners — this is a library, not a server
//! - Search queries are logged only at trace level

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod generate;
pub mod http;
pub mod orchestrator;
pub mod provider;
pub mod providers;
pub mod relevance;
pub mod trust;
pub mod types;

pub use config::AcquireConfig;
pub use error::{AcquireError, Result};
pub use generate::{NoFollowUps, TextGenerator};
pub use provider::SearchProvider;
pub use providers::DuckDuckGoProvider;
pub use trust::{TrustCategory, TrustInfo};
pub use types::{SearchHit, SourceFragment};

/// Acquire source fragments for a set of search terms.
///
/// Runs the full cycle — concurrent per-term fan-out, extraction,
/// selection, and up to `config.max_research_iterations` refinement
/// rounds — and returns the final trust-weighted fragment set. An empty
/// result is the valid "nothing found" outcome, not an error.
///
/// # Errors
///
/// Returns [`AcquireError::Config`] if the configuration is invalid.
/// Data-quality failures (unreachable pages, provider outages, unparsable
/// follow-up responses) never surface here.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> wellspring::Result<()> {
/// let config = wellspring::AcquireConfig::deep();
/// let terms = vec!["perovskite solar cells".to_string()];
/// let fragments = wellspring::acquire(
///     &terms,
///     "perovskite solar cells",
///     &config,
///     &wellspring::DuckDuckGoProvider,
///     &wellspring::NoFollowUps,
/// )
/// .await?;
/// for fragment in &fragments {
///     println!("{} [{}]: {:.2}", fragment.title, fragment.trust.domain, fragment.relevance);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn acquire<P: SearchProvider, G: TextGenerator>(
    search_terms: &[String],
    topic: &str,
    config: &AcquireConfig,
    provider: &P,
    generator: &G,
) -> Result<Vec<SourceFragment>> {
    config.validate()?;
    Ok(orchestrator::refine::run(search_terms, topic, config, provider, generator).await)
}

/// Acquire source fragments with default configuration and the built-in
/// DuckDuckGo provider; refinement rounds are disabled.
///
/// Convenience wrapper around [`acquire`].
///
/// # Errors
///
/// Same as [`acquire`].
pub async fn acquire_default(search_terms: &[String], topic: &str) -> Result<Vec<SourceFragment>> {
    acquire(
        search_terms,
        topic,
        &AcquireConfig::default(),
        &DuckDuckGoProvider,
        &NoFollowUps,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquire_rejects_zero_max_results() {
        let config = AcquireConfig {
            max_results_per_search: 0,
            ..Default::default()
        };
        let terms = vec!["test".to_string()];
        let result = acquire(&terms, "test", &config, &DuckDuckGoProvider, &NoFollowUps).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("max_results_per_search"));
    }

    #[tokio::test]
    async fn acquire_rejects_invalid_quota() {
        let config = AcquireConfig {
            trusted_quota: 2.0,
            ..Default::default()
        };
        let terms = vec!["test".to_string()];
        let result = acquire(&terms, "test", &config, &DuckDuckGoProvider, &NoFollowUps).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("trusted_quota"));
    }

    #[tokio::test]
    async fn acquire_rejects_zero_timeout() {
        let config = AcquireConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        let terms = vec!["test".to_string()];
        let result = acquire(&terms, "test", &config, &DuckDuckGoProvider, &NoFollowUps).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout"));
    }
}
