//! Iterative refinement: search, analyze, refine, repeat.
//!
//! Round 1 fans out the caller's search terms. Each later round samples
//! the highest-relevance fragments collected so far, asks the external
//! text-generation capability for follow-up search terms not yet in the
//! search history, and fans out again with only the new terms. The loop
//! ends when the round budget is exhausted or no new terms come back —
//! an empty or unparsable response means coverage is achieved, not that
//! something failed. A final relaxed selection pass produces the result.

use std::collections::HashSet;

use crate::config::AcquireConfig;
use crate::generate::{parse_term_list, TextGenerator};
use crate::provider::SearchProvider;
use crate::types::SourceFragment;

use super::coordinator;
use super::select::{select, SelectionPolicy};
use super::session::SessionState;

/// Fragments sampled into the follow-up prompt per round.
const FOLLOW_UP_SAMPLE: usize = 10;

/// Content excerpt length per sampled fragment.
const EXCERPT_CHARS: usize = 300;

/// Combined excerpt budget for the prompt.
const PROMPT_CONTENT_CHARS: usize = 2000;

/// New search terms accepted per round.
const MAX_FOLLOW_UP_TERMS: usize = 5;

/// Run the full acquisition cycle: initial round plus refinement rounds.
///
/// `config.max_research_iterations` is the total round budget, including
/// the initial round; 0 and 1 both mean "initial round only".
pub async fn run<P: SearchProvider, G: TextGenerator>(
    search_terms: &[String],
    topic: &str,
    config: &AcquireConfig,
    provider: &P,
    generator: &G,
) -> Vec<SourceFragment> {
    let session = SessionState::new();
    let round_policy = SelectionPolicy::standard(config);

    let initial: Vec<String> = search_terms
        .iter()
        .take(config.max_search_terms)
        .cloned()
        .collect();

    tracing::debug!(terms = initial.len(), "initial research round");
    let harvest = coordinator::run_terms(&initial, &initial, config, provider, &session).await;
    let mut collected = select(harvest, &round_policy);

    let mut seen_keys: HashSet<(String, String)> = collected
        .iter()
        .map(|f| (f.url.clone(), f.fragment_id.clone()))
        .collect();
    let mut history: HashSet<String> = initial.iter().map(|t| t.to_lowercase()).collect();

    for round in 2..=config.max_research_iterations {
        let new_terms = propose_follow_ups(generator, &collected, topic, &history).await;
        if new_terms.is_empty() {
            tracing::debug!(round, "no new search directions, coverage achieved");
            break;
        }

        tracing::debug!(round, terms = new_terms.len(), "refinement round");
        let harvest =
            coordinator::run_terms(&new_terms, &new_terms, config, provider, &session).await;
        let selected = select(harvest, &round_policy);

        let mut added = 0;
        for frag in selected {
            let key = (frag.url.clone(), frag.fragment_id.clone());
            if seen_keys.insert(key) {
                collected.push(frag);
                added += 1;
            }
        }
        tracing::debug!(round, added, total = collected.len(), "round merged");

        history.extend(new_terms.iter().map(|t| t.to_lowercase()));
    }

    select(collected, &SelectionPolicy::iterative(config))
}

/// Ask the text-generation capability for follow-up search terms.
///
/// Samples the top fragments by relevance, sends their titles, sections,
/// and content excerpts together with the cumulative search history, and
/// parses the response. Generation failures and unparsable responses both
/// come back as an empty list, which ends the loop.
async fn propose_follow_ups<G: TextGenerator>(
    generator: &G,
    fragments: &[SourceFragment],
    topic: &str,
    history: &HashSet<String>,
) -> Vec<String> {
    if fragments.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<&SourceFragment> = fragments.iter().collect();
    ranked.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let excerpts: Vec<String> = ranked
        .iter()
        .take(FOLLOW_UP_SAMPLE)
        .map(|f| {
            let excerpt: String = f.content.chars().take(EXCERPT_CHARS).collect();
            format!(
                "Title: {}\nSection: {}\nContent: {}",
                f.title, f.section, excerpt
            )
        })
        .collect();

    let prompt = follow_up_prompt(topic, &excerpts.join("\n\n---\n\n"), history);

    let response = match generator.generate(&prompt).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %err, "follow-up generation failed, ending refinement");
            return Vec::new();
        }
    };

    parse_term_list(&response)
        .into_iter()
        .filter(|t| !history.contains(&t.to_lowercase()))
        .take(MAX_FOLLOW_UP_TERMS)
        .collect()
}

fn follow_up_prompt(topic: &str, excerpts: &str, history: &HashSet<String>) -> String {
    let content: String = excerpts.chars().take(PROMPT_CONTENT_CHARS).collect();
    let mut searched: Vec<&str> = history.iter().map(String::as_str).collect();
    searched.sort_unstable();

    format!(
        "Based on this research content about \"{topic}\", identify 3-5 specific \
         follow-up search topics that would provide deeper insights.\n\n\
         Content analyzed:\n{content}\n\n\
         Already searched terms: {}\n\n\
         Focus on technical details, related concepts, and subtopics that were \
         mentioned but not fully explained.\n\n\
         Return ONLY a JSON list of specific, focused search terms (avoid \
         duplicating already searched terms):\n\
         [\"specific term 1\", \"specific term 2\", ...]",
        searched.join(", ")
    )
}
