//! Core value types: search hits and extracted source fragments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::trust::TrustInfo;

/// One hit returned by a web-search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The title of the result page.
    pub title: String,
    /// The result URL.
    pub url: String,
    /// A text snippet summarising the page content.
    pub snippet: String,
}

/// One heading-delimited unit of extracted page content — the atomic unit
/// of relevance scoring and selection.
///
/// Constructed only by the content extractor and immutable thereafter;
/// downstream stages filter fragments out but never mutate them. The
/// fragment identifier is deterministic given (url, content prefix), so
/// repeated extraction of the same section yields the same identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFragment {
    /// URL of the page this fragment came from.
    pub url: String,
    /// Page title.
    pub title: String,
    /// Heading of the section the fragment belongs to.
    pub section: String,
    /// Stable identifier derived from the section index and a content hash.
    pub fragment_id: String,
    /// Extracted text, capped at the configured content length.
    pub content: String,
    /// Relevance score in `[0.0, 1.0]`.
    pub relevance: f64,
    /// When the fragment was retrieved. Metadata only, never part of the
    /// fragment's identity.
    pub retrieved_at: DateTime<Utc>,
    /// Domain trust metadata computed at extraction time.
    pub trust: TrustInfo,
}

impl SourceFragment {
    /// Deduplication key: fragments with equal keys describe the same
    /// extracted section.
    pub fn key(&self) -> (&str, &str) {
        (&self.url, &self.fragment_id)
    }
}
