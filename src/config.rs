//! Acquisition configuration with sensible defaults and mode presets.
//!
//! [`AcquireConfig`] controls search breadth, extraction limits, politeness
//! delays, domain-diversity caps, and the iterative-research budget. The
//! defaults match the "moderate" preset; `deep`, `quick`, and `sla` presets
//! trade accuracy against latency.

use crate::error::AcquireError;

/// Configuration for a source acquisition session.
///
/// Use [`Default::default()`] or one of the mode presets, then override
/// fields as needed.
#[derive(Debug, Clone)]
pub struct AcquireConfig {
    /// Maximum hits requested from the search provider per term.
    pub max_results_per_search: usize,
    /// Maximum number of search terms run in one round.
    pub max_search_terms: usize,
    /// Character cap applied to each fragment's extracted content.
    pub max_content_length: usize,
    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,
    /// Total fetch attempts per page (1 = no retry).
    pub max_retries: u32,
    /// Delay in milliseconds after each accepted extraction within a term.
    pub rate_limit_delay_ms: u64,
    /// Maximum fragments per domain for a single search term. Trusted
    /// domains are allowed twice this.
    pub max_per_domain_per_term: usize,
    /// Maximum fragments per domain in the final selection.
    pub max_per_domain_final: usize,
    /// Maximum total fragments returned by a selection pass.
    pub max_total_sources: usize,
    /// Total research rounds, including the initial one. Values of 0 or 1
    /// disable follow-up rounds.
    pub max_research_iterations: usize,
    /// Floor for the final selection: below this count the allocator
    /// relaxes domain caps to admit more fragments.
    pub min_sources: usize,
    /// Share of the budget reserved for trusted fragments in the standard
    /// selection pass, in `[0, 1]`.
    pub trusted_quota: f64,
    /// Trusted share used by the relaxed post-loop selection pass.
    pub iterative_trusted_quota: f64,
    /// Whether to request safe-search filtering from the provider.
    pub safe_search: bool,
    /// How long to cache provider hits, in seconds. 0 disables caching.
    pub cache_ttl_secs: u64,
    /// Custom User-Agent. If `None`, rotates through a built-in list of
    /// realistic browser User-Agents.
    pub user_agent: Option<String>,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self::moderate()
    }
}

impl AcquireConfig {
    /// Comprehensive search with maximum accuracy.
    pub fn deep() -> Self {
        Self {
            max_results_per_search: 5,
            max_search_terms: 5,
            max_content_length: 3000,
            request_timeout_secs: 10,
            max_retries: 3,
            rate_limit_delay_ms: 1000,
            max_research_iterations: 3,
            ..Self::base()
        }
    }

    /// Balanced search with good accuracy and speed.
    pub fn moderate() -> Self {
        Self {
            max_results_per_search: 3,
            max_search_terms: 3,
            max_content_length: 2000,
            request_timeout_secs: 7,
            max_retries: 2,
            rate_limit_delay_ms: 500,
            max_research_iterations: 2,
            ..Self::base()
        }
    }

    /// Fast search for quick answers; no follow-up rounds.
    pub fn quick() -> Self {
        Self {
            max_results_per_search: 2,
            max_search_terms: 2,
            max_content_length: 1200,
            request_timeout_secs: 5,
            max_retries: 1,
            rate_limit_delay_ms: 200,
            max_research_iterations: 1,
            ..Self::base()
        }
    }

    /// Ultra-fast latency-bound search.
    pub fn sla() -> Self {
        Self {
            max_results_per_search: 1,
            max_search_terms: 1,
            max_content_length: 800,
            request_timeout_secs: 3,
            max_retries: 1,
            rate_limit_delay_ms: 100,
            max_research_iterations: 0,
            ..Self::base()
        }
    }

    /// Shared values the presets do not vary.
    fn base() -> Self {
        Self {
            max_results_per_search: 3,
            max_search_terms: 3,
            max_content_length: 2000,
            request_timeout_secs: 7,
            max_retries: 2,
            rate_limit_delay_ms: 500,
            max_per_domain_per_term: 2,
            max_per_domain_final: 5,
            max_total_sources: 8,
            max_research_iterations: 2,
            min_sources: 15,
            trusted_quota: 0.5,
            iterative_trusted_quota: 0.6,
            safe_search: true,
            cache_ttl_secs: 600,
            user_agent: None,
        }
    }

    /// Validates this configuration, returning an error if any field is
    /// invalid. Invalid bounds are programming errors, the one failure
    /// class that propagates out of the engine.
    pub fn validate(&self) -> Result<(), AcquireError> {
        if self.max_results_per_search == 0 {
            return Err(AcquireError::Config(
                "max_results_per_search must be greater than 0".into(),
            ));
        }
        if self.max_search_terms == 0 {
            return Err(AcquireError::Config(
                "max_search_terms must be greater than 0".into(),
            ));
        }
        if self.max_content_length == 0 {
            return Err(AcquireError::Config(
                "max_content_length must be greater than 0".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(AcquireError::Config(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.max_retries == 0 {
            return Err(AcquireError::Config(
                "max_retries must be greater than 0".into(),
            ));
        }
        if self.max_per_domain_per_term == 0 || self.max_per_domain_final == 0 {
            return Err(AcquireError::Config(
                "per-domain caps must be greater than 0".into(),
            ));
        }
        if self.max_total_sources == 0 {
            return Err(AcquireError::Config(
                "max_total_sources must be greater than 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.trusted_quota) {
            return Err(AcquireError::Config(
                "trusted_quota must be within [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.iterative_trusted_quota) {
            return Err(AcquireError::Config(
                "iterative_trusted_quota must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}
