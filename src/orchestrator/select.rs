//! Selection and diversity allocation over the candidate fragment pool.
//!
//! Deduplicates by (url, fragment-id), then admits fragments under a
//! three-level policy: trust quality first (a quota of the budget reserved
//! for trusted fragments, with generous per-domain caps), domain diversity
//! second (standard caps for the rest), raw relevance third (each group is
//! relevance-sorted). A floor pass relaxes the domain caps when the corpus
//! is too thin. Given identical input ordering and scores the result is
//! deterministic; sorts are stable so score ties keep input order.

use std::collections::{HashMap, HashSet};

use crate::config::AcquireConfig;
use crate::trust;
use crate::types::SourceFragment;

/// Caps and quotas for one selection pass.
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    /// Per-domain cap for untrusted fragments.
    pub domain_cap: usize,
    /// Per-domain cap applied during the trusted pass.
    pub trusted_domain_cap: usize,
    /// Maximum total fragments admitted by the quota passes.
    pub max_total: usize,
    /// Share of `max_total` reserved for trusted fragments, in `[0, 1]`.
    pub trusted_quota: f64,
    /// Minimum fragment count; when set, a final pass relaxes domain caps
    /// to `2 × domain_cap` until the floor is met or candidates run out.
    pub min_sources: Option<usize>,
}

impl SelectionPolicy {
    /// Policy for per-round selection: standard caps, trusted domains get
    /// double, floor guarantee active.
    pub fn standard(config: &AcquireConfig) -> Self {
        Self {
            domain_cap: config.max_per_domain_final,
            trusted_domain_cap: config.max_per_domain_final * 2,
            max_total: config.max_total_sources,
            trusted_quota: config.trusted_quota,
            min_sources: Some(config.min_sources),
        }
    }

    /// Relaxed policy for the post-loop pass over an iterative session's
    /// accumulated pool: triple caps, larger trusted share, no floor.
    pub fn iterative(config: &AcquireConfig) -> Self {
        Self {
            domain_cap: config.max_per_domain_final * 3,
            trusted_domain_cap: config.max_per_domain_final * 3,
            max_total: config.max_total_sources,
            trusted_quota: config.iterative_trusted_quota,
            min_sources: None,
        }
    }
}

/// Select a bounded, diverse, trust-weighted subset of the candidate pool.
pub fn select(fragments: Vec<SourceFragment>, policy: &SelectionPolicy) -> Vec<SourceFragment> {
    // 1. Deduplicate by (url, fragment-id), keeping first occurrence.
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let deduped: Vec<SourceFragment> = fragments
        .into_iter()
        .filter(|f| seen.insert((f.url.clone(), f.fragment_id.clone())))
        .collect();

    // 2. Split by trust, each group relevance-sorted (stable).
    let (mut trusted, mut untrusted): (Vec<SourceFragment>, Vec<SourceFragment>) =
        deduped.iter().cloned().partition(|f| f.trust.trusted);
    sort_by_relevance(&mut trusted);
    sort_by_relevance(&mut untrusted);

    tracing::debug!(
        trusted = trusted.len(),
        untrusted = untrusted.len(),
        "selection pool split"
    );

    let mut selected: Vec<SourceFragment> = Vec::new();
    let mut domain_counts: HashMap<String, usize> = HashMap::new();
    let trusted_target = policy.max_total as f64 * policy.trusted_quota;

    // 3. Trusted pass, up to the reserved share of the budget.
    for frag in trusted {
        if selected.len() as f64 >= trusted_target {
            break;
        }
        let domain = fragment_domain(&frag);
        let count = domain_counts.get(&domain).copied().unwrap_or(0);
        if count < policy.trusted_domain_cap {
            *domain_counts.entry(domain).or_insert(0) += 1;
            selected.push(frag);
        }
    }

    // 4. Untrusted pass into the remaining slots.
    for frag in untrusted {
        if selected.len() >= policy.max_total {
            break;
        }
        let domain = fragment_domain(&frag);
        let count = domain_counts.get(&domain).copied().unwrap_or(0);
        if count < policy.domain_cap {
            *domain_counts.entry(domain).or_insert(0) += 1;
            selected.push(frag);
        }
    }

    // 5. Floor guarantee: relax domain caps and re-scan the leftovers.
    if let Some(floor) = policy.min_sources {
        if selected.len() < floor {
            admit_to_floor(&deduped, &mut selected, &mut domain_counts, policy, floor);
        }
    }

    tracing::debug!(
        selected = selected.len(),
        domains = domain_counts.len(),
        "selection complete"
    );
    selected
}

/// Re-scan not-yet-admitted fragments by relevance, admitting under a
/// doubled domain cap until the floor is met or candidates are exhausted.
fn admit_to_floor(
    pool: &[SourceFragment],
    selected: &mut Vec<SourceFragment>,
    domain_counts: &mut HashMap<String, usize>,
    policy: &SelectionPolicy,
    floor: usize,
) {
    let admitted: HashSet<(String, String)> = selected
        .iter()
        .map(|f| (f.url.clone(), f.fragment_id.clone()))
        .collect();

    let mut remaining: Vec<SourceFragment> = pool
        .iter()
        .filter(|f| !admitted.contains(&(f.url.clone(), f.fragment_id.clone())))
        .cloned()
        .collect();
    sort_by_relevance(&mut remaining);

    let relaxed_cap = policy.domain_cap * 2;
    for frag in remaining {
        if selected.len() >= floor {
            break;
        }
        let domain = fragment_domain(&frag);
        let count = domain_counts.get(&domain).copied().unwrap_or(0);
        if count < relaxed_cap {
            *domain_counts.entry(domain).or_insert(0) += 1;
            selected.push(frag);
        }
    }
}

/// Stable descending sort by relevance; ties keep input order.
fn sort_by_relevance(fragments: &mut [SourceFragment]) {
    fragments.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn fragment_domain(frag: &SourceFragment) -> String {
    if frag.trust.domain.is_empty() {
        trust::extract_domain(&frag.url)
    } else {
        frag.trust.domain.clone()
    }
}
