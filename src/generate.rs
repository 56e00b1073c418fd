//! Trait definition for the external text-generation collaborator.
//!
//! The refinement loop hands sampled high-relevance fragment text to a
//! text-generation capability and expects back a JSON list of follow-up
//! search terms. Unparsable or empty responses are treated as "coverage
//! achieved", never as errors.

use crate::error::AcquireError;

/// An external text-generation capability.
///
/// The engine never inspects how the text is produced; it only sends a
/// prompt and parses the response. All implementations must be
/// `Send + Sync`.
pub trait TextGenerator: Send + Sync {
    /// Generate a text completion for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::Generation`] if the capability is
    /// unavailable. The refinement loop treats an error like an empty
    /// response and terminates the round.
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, AcquireError>> + Send;
}

/// A generator that never proposes follow-up terms.
///
/// Plugging this in disables refinement rounds regardless of the
/// configured round budget; the engine runs the initial round only.
pub struct NoFollowUps;

impl TextGenerator for NoFollowUps {
    async fn generate(&self, _prompt: &str) -> Result<String, AcquireError> {
        Ok("[]".to_owned())
    }
}

/// Parse a generated response into a list of search terms.
///
/// Accepts a bare JSON string array, optionally wrapped in markdown code
/// fences (with or without a `json` language tag). Anything that does not
/// parse as a list of strings yields an empty vector.
pub(crate) fn parse_term_list(raw: &str) -> Vec<String> {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<Vec<String>>(cleaned.trim()) {
        Ok(terms) => terms
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        Err(err) => {
            tracing::debug!(error = %err, "follow-up term response did not parse");
            Vec::new()
        }
    }
}

/// Strip a surrounding markdown code fence, if present.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_follow_ups_always_returns_empty_list() {
        let raw = NoFollowUps.generate("anything").await.expect("infallible");
        assert!(parse_term_list(&raw).is_empty());
    }

    #[test]
    fn parses_bare_json_list() {
        let terms = parse_term_list(r#"["quantum error correction", "qubit coherence"]"#);
        assert_eq!(terms, vec!["quantum error correction", "qubit coherence"]);
    }

    #[test]
    fn parses_fenced_json_list() {
        let raw = "```json\n[\"term one\", \"term two\"]\n```";
        let terms = parse_term_list(raw);
        assert_eq!(terms, vec!["term one", "term two"]);
    }

    #[test]
    fn parses_fence_without_language_tag() {
        let raw = "```\n[\"only term\"]\n```";
        assert_eq!(parse_term_list(raw), vec!["only term"]);
    }

    #[test]
    fn unparsable_text_yields_empty() {
        assert!(parse_term_list("I could not find any new directions.").is_empty());
        assert!(parse_term_list("{\"terms\": [\"wrong shape\"]}").is_empty());
        assert!(parse_term_list("").is_empty());
    }

    #[test]
    fn blank_entries_filtered() {
        let terms = parse_term_list(r#"["valid", "  ", ""]"#);
        assert_eq!(terms, vec!["valid"]);
    }

    #[test]
    fn entries_trimmed() {
        let terms = parse_term_list(r#"["  padded term  "]"#);
        assert_eq!(terms, vec!["padded term"]);
    }
}
