//! Content extraction: one URL in, scored source fragments out.
//!
//! Fetches a page, walks its `h1`–`h4` headings in document order, and
//! collects the block-level content following each heading into a
//! candidate section. Sections are kept leniently — substantial length or
//! any keyword hit is enough — scored, trust-classified, capped, and given
//! a deterministic fragment identifier. Fetch and parse failures are
//! absorbed: the extractor returns an empty list, never an error.

use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};

use crate::config::AcquireConfig;
use crate::http;
use crate::relevance;
use crate::trust;
use crate::types::SourceFragment;

/// Block-level tags collected into a section's content.
const CONTENT_TAGS: &[&str] = &["p", "ul", "ol", "blockquote"];

/// Paragraph elements used by the no-headings fallback.
const FALLBACK_PARAGRAPHS: usize = 10;

/// Minimum trimmed length for a section to qualify without a keyword hit.
const SUBSTANTIAL_LENGTH: usize = 100;

/// Fetch one URL and extract scored fragments from it.
///
/// Any transport or status failure degrades to an empty list with a
/// warning; the caller moves on to the next URL.
pub async fn extract(
    client: &reqwest::Client,
    url: &str,
    keywords: &[String],
    config: &AcquireConfig,
) -> Vec<SourceFragment> {
    match http::fetch_html(client, url, config.max_retries).await {
        Ok(html) => extract_sections(&html, url, keywords, config),
        Err(err) => {
            tracing::warn!(url, error = %err, "page fetch failed, skipping");
            Vec::new()
        }
    }
}

/// Parse page markup into scored fragments.
///
/// Split from [`extract`] so the section walk is testable without a
/// network.
pub fn extract_sections(
    html: &str,
    url: &str,
    keywords: &[String],
    config: &AcquireConfig,
) -> Vec<SourceFragment> {
    let document = Html::parse_document(html);

    let Ok(heading_sel) = Selector::parse("h1, h2, h3, h4") else {
        return Vec::new();
    };

    let title = page_title(&document);
    let trust_info = trust::classify(url);
    let mut fragments = Vec::new();

    for (idx, heading) in document.select(&heading_sel).enumerate() {
        let section_name = collapse_text(heading);
        let content = section_content(heading);

        if content.is_empty() || !section_qualifies(&content, keywords) {
            continue;
        }

        let score = relevance::score(&content, keywords, &section_name, &title, url);
        fragments.push(SourceFragment {
            url: url.to_owned(),
            title: title.clone(),
            section: section_name,
            fragment_id: fragment_id(idx, &content),
            content: truncate_to_limit(&content, config.max_content_length),
            relevance: score,
            retrieved_at: Utc::now(),
            trust: trust_info.clone(),
        });
    }

    // No heading-delimited sections qualified — fall back to the leading
    // paragraphs as a single fragment.
    if fragments.is_empty() {
        if let Some(fragment) = fallback_fragment(&document, url, keywords, &title, config) {
            fragments.push(fragment);
        }
    }

    tracing::debug!(url, count = fragments.len(), "sections extracted");
    fragments
}

/// Deterministic fragment identifier: heading index plus the first eight
/// hex digits of the SHA-256 of the content's first 100 characters.
pub(crate) fn fragment_id(heading_index: usize, content: &str) -> String {
    let prefix: String = content.chars().take(100).collect();
    let digest = Sha256::digest(prefix.as_bytes());
    let hex: String = digest.iter().take(4).map(|b| format!("{b:02x}")).collect();
    format!("p{heading_index}_{hex}")
}

/// Lenient inclusion policy: substantial length or any exact/partial
/// keyword hit keeps a section.
fn section_qualifies(content: &str, keywords: &[String]) -> bool {
    if content.trim().len() > SUBSTANTIAL_LENGTH {
        return true;
    }
    let content_lower = content.to_lowercase();
    keywords.iter().any(|kw| {
        let kw_lower = kw.to_lowercase();
        content_lower.contains(&kw_lower)
            || kw_lower
                .split_whitespace()
                .any(|part| content_lower.contains(part))
    })
}

/// Collect block-level content following a heading until the next heading.
fn section_content(heading: ElementRef<'_>) -> String {
    let mut parts = Vec::new();

    for sibling in heading.next_siblings() {
        let Some(element) = ElementRef::wrap(sibling) else {
            continue;
        };
        let name = element.value().name();
        if is_heading(name) {
            break;
        }
        if CONTENT_TAGS.contains(&name) {
            let text = collapse_text(element);
            if !text.is_empty() {
                parts.push(text);
            }
        }
    }

    parts.join(" ")
}

fn is_heading(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Element text with whitespace runs collapsed to single spaces.
fn collapse_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn page_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return "Untitled".to_owned();
    };
    let title = document
        .select(&selector)
        .next()
        .map(|el| collapse_text(el))
        .unwrap_or_default();
    if title.is_empty() {
        "Untitled".to_owned()
    } else {
        title
    }
}

/// Build the "Main Content" fragment from the first ten paragraphs.
fn fallback_fragment(
    document: &Html,
    url: &str,
    keywords: &[String],
    title: &str,
    config: &AcquireConfig,
) -> Option<SourceFragment> {
    let selector = Selector::parse("p").ok()?;
    let content = document
        .select(&selector)
        .take(FALLBACK_PARAGRAPHS)
        .map(collapse_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if content.is_empty() {
        return None;
    }

    let score = relevance::score(&content, keywords, "Main Content", title, url);
    Some(SourceFragment {
        url: url.to_owned(),
        title: title.to_owned(),
        section: "Main Content".to_owned(),
        fragment_id: "main".to_owned(),
        content: truncate_to_limit(&content, config.max_content_length),
        relevance: score,
        retrieved_at: Utc::now(),
        trust: trust::classify(url),
    })
}

/// Truncate text to the given character limit, breaking at a char boundary.
fn truncate_to_limit(text: &str, max_chars: usize) -> String {
    if text.len() <= max_chars {
        return text.to_owned();
    }
    let mut end = max_chars;
    while !text.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    text[..end].to_owned()
}
