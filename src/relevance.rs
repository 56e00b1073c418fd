//! Multi-factor relevance scoring for extracted content.
//!
//! Combines keyword coverage, content-quality heuristics, and a
//! domain-trust boost into one score in `[0.0, 1.0]`:
//!
//! ```text
//! score = ((base * length_mult) + title_bonus + diversity + structure) * trust_mult
//! ```
//!
//! Each factor is computed by its own helper so it can be tested in
//! isolation. Matching is case-insensitive substring matching; partial
//! credit (weighted 0.5) is granted for word parts of multi-word keywords
//! whose full phrase did not match.

use crate::trust;

/// Attribution phrases that indicate sourced, citable writing.
const ATTRIBUTION_PHRASES: &[&str] = &["according to", "research shows", "study found"];

/// Analytical connectives that indicate reasoned prose.
const ANALYTICAL_PHRASES: &[&str] = &["however", "therefore", "furthermore"];

/// Score content relevance against a keyword set.
///
/// `section_name` and `title` contribute bonus weight when keywords appear
/// in them; `url` feeds the domain-trust multiplier. Empty content or an
/// empty keyword slice short-circuits to `0.0`.
///
/// The result is always within `[0.0, 1.0]`.
pub fn score(content: &str, keywords: &[String], section_name: &str, title: &str, url: &str) -> f64 {
    if content.is_empty() || keywords.is_empty() {
        return 0.0;
    }

    let content_lower = content.to_lowercase();
    let section_lower = section_name.to_lowercase();
    let title_lower = title.to_lowercase();

    let exact_matches = count_exact_matches(&content_lower, keywords);
    let base = base_match_score(&content_lower, keywords);
    let length_mult = length_multiplier(content);
    let title_bonus = title_section_bonus(&title_lower, &section_lower, keywords);
    let density_mult = density_multiplier(&content_lower, exact_matches);
    let diversity = diversity_bonus(&content_lower, keywords);
    let structure = structure_bonus(&content_lower);

    let trust_info = trust::classify(url);
    let trust_mult = trust_multiplier(trust_info.trusted, trust_info.score);

    let combined =
        ((base * length_mult * density_mult) + title_bonus + diversity + structure) * trust_mult;
    combined.clamp(0.0, 1.0)
}

/// Number of keywords whose full phrase appears in the content.
fn count_exact_matches(content_lower: &str, keywords: &[String]) -> usize {
    keywords
        .iter()
        .filter(|kw| content_lower.contains(&kw.to_lowercase()))
        .count()
}

/// Base keyword coverage: exact hits plus 0.5-weighted partial word hits,
/// normalized by keyword count, boosted ×1.2 and clamped to 1.0.
pub(crate) fn base_match_score(content_lower: &str, keywords: &[String]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    for kw in keywords {
        let kw_lower = kw.to_lowercase();
        if content_lower.contains(&kw_lower) {
            total += 1.0;
        } else {
            // Partial credit for word parts of multi-word keywords.
            let parts: Vec<&str> = kw_lower.split_whitespace().collect();
            if parts.len() > 1 {
                let hits = parts.iter().filter(|p| content_lower.contains(**p)).count();
                total += hits as f64 * 0.5;
            }
        }
    }

    let normalized = (total / keywords.len() as f64).min(1.0);
    (normalized * 1.2).min(1.0)
}

/// Content-length multiplier: very short content is penalized, substantial
/// content boosted.
pub(crate) fn length_multiplier(content: &str) -> f64 {
    let len = content.trim().len();
    if len < 50 {
        0.6
    } else if len < 200 {
        0.85
    } else if len > 1000 {
        1.3
    } else {
        1.0
    }
}

/// Additive bonus for keywords appearing in the title (+0.15 each) or the
/// section heading (+0.10 each). Unbounded here; the final clamp caps it.
pub(crate) fn title_section_bonus(
    title_lower: &str,
    section_lower: &str,
    keywords: &[String],
) -> f64 {
    let mut bonus = 0.0;
    for kw in keywords {
        let kw_lower = kw.to_lowercase();
        if title_lower.contains(&kw_lower) {
            bonus += 0.15;
        }
        if section_lower.contains(&kw_lower) {
            bonus += 0.10;
        }
    }
    bonus
}

/// Keyword-density guard: exact-hit density above 10% of the word count is
/// treated as stuffing (×0.5); a 5–10% density reads as naturally topical
/// (×1.1).
pub(crate) fn density_multiplier(content_lower: &str, exact_matches: usize) -> f64 {
    let total_words = content_lower.split_whitespace().count();
    if total_words == 0 {
        return 1.0;
    }
    let density = exact_matches as f64 / total_words as f64;
    if density > 0.1 {
        0.5
    } else if density > 0.05 {
        1.1
    } else {
        1.0
    }
}

/// Bonus for content covering multiple distinct keywords. Partial coverage
/// (a word part of a keyword) counts half.
pub(crate) fn diversity_bonus(content_lower: &str, keywords: &[String]) -> f64 {
    let exact_found = keywords
        .iter()
        .filter(|kw| content_lower.contains(&kw.to_lowercase()))
        .count();
    let partial_found = keywords
        .iter()
        .filter(|kw| {
            kw.to_lowercase()
                .split_whitespace()
                .any(|part| content_lower.contains(part))
        })
        .count();

    let effective = (exact_found as f64).max(partial_found as f64 * 0.5);
    if effective > 1.0 {
        ((effective - 1.0) * 0.1).min(0.3)
    } else {
        0.0
    }
}

/// Bonus for structural quality markers: +0.05 for attribution phrases,
/// +0.03 for analytical connectives.
pub(crate) fn structure_bonus(content_lower: &str) -> f64 {
    let mut bonus = 0.0;
    if ATTRIBUTION_PHRASES.iter().any(|p| content_lower.contains(p)) {
        bonus += 0.05;
    }
    if ANALYTICAL_PHRASES.iter().any(|p| content_lower.contains(p)) {
        bonus += 0.03;
    }
    bonus
}

/// Trust multiplier: trusted domains scale the combined score by
/// `1.0 + (trust_score / 100) * 0.5`, roughly 1.375–1.475 for the
/// registry's score range. Untrusted domains are unchanged.
pub(crate) fn trust_multiplier(trusted: bool, trust_score: u8) -> f64 {
    if trusted {
        1.0 + (trust_score as f64 / 100.0) * 0.5
    } else {
        1.0
    }
}
