//! Domain trust classification from static reference registries.
//!
//! Maps a URL to a trust category, numeric trust score, and trusted flag
//! using categorized domain tables plus suffix-pattern rules for academic
//! and government TLDs. The registries are immutable process-wide statics;
//! classification is a pure function with no caching and no network access.
//!
//! A separate blacklist registry marks low-quality domains (dictionaries,
//! content farms, commerce sites) that the fan-out coordinator skips before
//! extraction.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Trust category assigned to a registrable domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustCategory {
    /// Universities and research institutions.
    Academic,
    /// Government and intergovernmental bodies.
    Government,
    /// Peer-reviewed scientific and technical publishers.
    Science,
    /// Established news and media organizations.
    Media,
    /// Technology and industry authorities.
    Technology,
    /// Open educational repositories and knowledge nonprofits.
    Educational,
    /// Independent fact-checking organizations.
    FactCheck,
    /// No registry or pattern matched.
    Unverified,
}

impl TrustCategory {
    /// Fixed trust score for this category, 0–100.
    pub fn score(&self) -> u8 {
        match self {
            Self::Academic => 95,
            Self::Government => 90,
            Self::Science => 90,
            Self::Media => 80,
            Self::Technology => 85,
            Self::Educational => 75,
            Self::FactCheck => 85,
            Self::Unverified => 50,
        }
    }

    /// Human-readable category label for display and citation formatting.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Academic => "Academic & Research Institution",
            Self::Government => "Government & Intergovernmental",
            Self::Science => "Scientific & Technical Publisher",
            Self::Media => "Established News & Media",
            Self::Technology => "Technology & Industry Authority",
            Self::Educational => "Educational & Knowledge Repository",
            Self::FactCheck => "Independent Fact-Checking Organization",
            Self::Unverified => "Unverified Source",
        }
    }

    /// Whether domains in this category count as trusted sources.
    pub fn is_trusted(&self) -> bool {
        !matches!(self, Self::Unverified)
    }
}

impl fmt::Display for TrustCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trust metadata for one URL, computed on demand and never cached here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustInfo {
    /// Trust category the domain fell into.
    pub category: TrustCategory,
    /// Numeric trust score, 0–100.
    pub score: u8,
    /// Whether the domain is in a trusted category.
    pub trusted: bool,
    /// Registrable domain, lower-cased with any `www.` prefix stripped.
    /// Empty for malformed URLs.
    pub domain: String,
}

impl TrustInfo {
    fn from_category(category: TrustCategory, domain: String) -> Self {
        Self {
            score: category.score(),
            trusted: category.is_trusted(),
            category,
            domain,
        }
    }
}

/// Universities and research institutions with verified reputations.
static ACADEMIC_DOMAINS: &[&str] = &[
    "harvard.edu",
    "stanford.edu",
    "mit.edu",
    "berkeley.edu",
    "caltech.edu",
    "princeton.edu",
    "yale.edu",
    "columbia.edu",
    "uchicago.edu",
    "cornell.edu",
    "upenn.edu",
    "duke.edu",
    "dartmouth.edu",
    "brown.edu",
    "northwestern.edu",
    "vanderbilt.edu",
    "rice.edu",
    "georgetown.edu",
    "carnegiemellon.edu",
    "ox.ac.uk",
    "cam.ac.uk",
    "imperial.ac.uk",
    "ucl.ac.uk",
    "kcl.ac.uk",
    "ed.ac.uk",
    "manchester.ac.uk",
    "bristol.ac.uk",
    "warwick.ac.uk",
    "u-tokyo.ac.jp",
    "kyoto-u.ac.jp",
    "utoronto.ca",
    "mcgill.ca",
    "ubc.ca",
    "anu.edu.au",
    "sydney.edu.au",
    "melbourne.edu.au",
    "unsw.edu.au",
    "ethz.ch",
    "epfl.ch",
    "sorbonne-universite.fr",
    "ens.psl.eu",
];

/// Government and intergovernmental sites.
static GOVERNMENT_DOMAINS: &[&str] = &[
    "nasa.gov",
    "nih.gov",
    "nsf.gov",
    "nist.gov",
    "cdc.gov",
    "fda.gov",
    "epa.gov",
    "noaa.gov",
    "usgs.gov",
    "doe.gov",
    "energy.gov",
    "data.gov",
    "census.gov",
    "whitehouse.gov",
    "state.gov",
    "treasury.gov",
    "justice.gov",
    "defense.gov",
    "va.gov",
    "sec.gov",
    "ftc.gov",
    "europa.eu",
    "un.org",
    "who.int",
    "unesco.org",
    "unicef.org",
    "imf.org",
    "worldbank.org",
    "oecd.org",
    "wto.org",
    "iaea.org",
    "esa.int",
    "cern.ch",
    "ecb.europa.eu",
    "eurostat.ec.europa.eu",
];

/// Peer-reviewed scientific and technical publishers.
static SCIENCE_DOMAINS: &[&str] = &[
    "nature.com",
    "science.org",
    "sciencedirect.com",
    "springer.com",
    "wiley.com",
    "taylorfrancis.com",
    "plos.org",
    "mdpi.com",
    "acm.org",
    "ieee.org",
    "arxiv.org",
    "biorxiv.org",
    "medrxiv.org",
    "pubmed.ncbi.nlm.nih.gov",
    "ncbi.nlm.nih.gov",
    "doi.org",
    "jstor.org",
    "sage.com",
    "cambridge.org",
    "oxfordjournals.org",
    "aaas.org",
    "cell.com",
    "thelancet.com",
    "nejm.org",
    "bmj.com",
];

/// Established news and media organizations.
static MEDIA_DOMAINS: &[&str] = &[
    "bbc.com",
    "reuters.com",
    "apnews.com",
    "nytimes.com",
    "theguardian.com",
    "washingtonpost.com",
    "wsj.com",
    "npr.org",
    "pbs.org",
    "cnn.com",
    "abc.go.com",
    "cbsnews.com",
    "nbcnews.com",
    "usatoday.com",
    "financialtimes.com",
    "bloomberg.com",
    "economist.com",
    "theatlantic.com",
    "newyorker.com",
    "time.com",
    "newsweek.com",
    "foreignaffairs.com",
    "ft.com",
    "telegraph.co.uk",
    "independent.co.uk",
    "sky.com",
];

/// Technology and industry authorities.
static TECH_DOMAINS: &[&str] = &[
    "openai.com",
    "google.ai",
    "ai.google",
    "deepmind.com",
    "microsoft.com",
    "aws.amazon.com",
    "cloud.google.com",
    "azure.microsoft.com",
    "developer.mozilla.org",
    "w3.org",
    "tensorflow.org",
    "pytorch.org",
    "github.com",
    "stackoverflow.com",
    "docker.com",
    "kubernetes.io",
    "apache.org",
    "oracle.com",
    "ibm.com",
    "intel.com",
    "nvidia.com",
    "apple.com",
    "meta.com",
    "facebook.com",
    "twitter.com",
    "linkedin.com",
    "salesforce.com",
    "adobe.com",
    "cisco.com",
    "vmware.com",
];

/// Knowledge repositories and educational nonprofits.
static EDUCATIONAL_DOMAINS: &[&str] = &[
    "wikipedia.org",
    "britannica.com",
    "khanacademy.org",
    "coursera.org",
    "edx.org",
    "udacity.com",
    "futurelearn.com",
    "mitopencourseware.org",
    "ted.com",
    "tedmed.com",
    "smithsonianmag.com",
    "nationalgeographic.com",
    "scientificamerican.com",
    "newscientist.com",
    "livescience.com",
    "howstuffworks.com",
    "explainxkcd.com",
    "stackexchange.com",
];

/// Independent fact-checking organizations.
static FACTCHECK_DOMAINS: &[&str] = &[
    "snopes.com",
    "politifact.com",
    "factcheck.org",
    "fullfact.org",
    "afp.com",
    "checkyourfact.com",
    "truthorfiction.com",
    "leadstories.com",
    "mediabiasfactcheck.com",
    "allsides.com",
    "factchecker.in",
];

/// Low-quality domains excluded from acquisition: dictionaries, content
/// farms, social aggregators, commerce, and translation sites.
static BLACKLISTED_DOMAINS: &[&str] = &[
    "merriam-webster.com",
    "dictionary.com",
    "thesaurus.com",
    "vocabulary.com",
    "yourdictionary.com",
    "collinsdictionary.com",
    "macmillandictionary.com",
    "oxfordlearnersdictionaries.com",
    "ldoceonline.com",
    "thefreedictionary.com",
    "ehow.com",
    "answers.com",
    "ask.com",
    "chacha.com",
    "wiki.answers.com",
    "reddit.com",
    "quora.com",
    "pinterest.com",
    "tumblr.com",
    "medium.com",
    "amazon.com",
    "ebay.com",
    "walmart.com",
    "target.com",
    "discussions.apple.com",
    "support.apple.com",
    "community.microsoft.com",
    "translate.google.com",
    "linguee.com",
    "reverso.net",
    "wikihow.com",
    "thoughtco.com",
    "reference.com",
];

/// Suffix patterns mapped to the Academic category.
static ACADEMIC_SUFFIXES: &[&str] = &[".edu", ".ac.uk", ".edu.au", ".ac.jp"];

/// Suffix patterns mapped to the Government category.
static GOVERNMENT_SUFFIXES: &[&str] =
    &[".gov", ".gov.uk", ".gov.au", ".gc.ca", ".europa.eu", ".int"];

/// Classify a URL into trust metadata.
///
/// Extracts the registrable domain (host, lower-cased, `www.` stripped),
/// looks it up against the seven category registries, then falls back to
/// suffix patterns for academic/government TLDs. Unmatched domains come
/// back as [`TrustCategory::Unverified`] with a neutral score of 50.
///
/// Malformed URLs degrade to an empty domain string, never an error.
/// Classification is idempotent and unaffected by path, query string, or
/// fragment.
///
/// # Examples
///
/// ```
/// let info = wellspring::trust::classify("https://stanford.edu/research/ai");
/// assert_eq!(info.score, 95);
/// assert!(info.trusted);
/// assert_eq!(info.domain, "stanford.edu");
/// ```
pub fn classify(url: &str) -> TrustInfo {
    let domain = extract_domain(url);

    let registries: &[(&[&str], TrustCategory)] = &[
        (ACADEMIC_DOMAINS, TrustCategory::Academic),
        (GOVERNMENT_DOMAINS, TrustCategory::Government),
        (SCIENCE_DOMAINS, TrustCategory::Science),
        (MEDIA_DOMAINS, TrustCategory::Media),
        (TECH_DOMAINS, TrustCategory::Technology),
        (EDUCATIONAL_DOMAINS, TrustCategory::Educational),
        (FACTCHECK_DOMAINS, TrustCategory::FactCheck),
    ];

    for (domains, category) in registries {
        if domains.contains(&domain.as_str()) {
            return TrustInfo::from_category(*category, domain);
        }
    }

    if ACADEMIC_SUFFIXES.iter().any(|s| domain.ends_with(s)) {
        return TrustInfo::from_category(TrustCategory::Academic, domain);
    }
    if GOVERNMENT_SUFFIXES.iter().any(|s| domain.ends_with(s)) {
        return TrustInfo::from_category(TrustCategory::Government, domain);
    }

    TrustInfo::from_category(TrustCategory::Unverified, domain)
}

/// Quick check whether a URL's domain is in a trusted category.
pub fn is_trusted(url: &str) -> bool {
    classify(url).trusted
}

/// Whether a URL's domain is on the low-quality blacklist.
///
/// Subdomains of blacklisted domains are also rejected.
pub fn is_blacklisted(url: &str) -> bool {
    let domain = extract_domain(url);
    BLACKLISTED_DOMAINS
        .iter()
        .any(|b| domain == *b || domain.ends_with(&format!(".{b}")))
}

/// Extract the registrable domain from a URL: host, lower-cased, with any
/// leading `www.` removed. Returns an empty string if the URL has no
/// parseable host.
pub fn extract_domain(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };
    let host = parsed.host_str().unwrap_or("").to_lowercase();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stanford_classified_as_academic() {
        let info = classify("https://stanford.edu/x");
        assert_eq!(info.category, TrustCategory::Academic);
        assert_eq!(info.score, 95);
        assert!(info.trusted);
        assert_eq!(info.category.label(), "Academic & Research Institution");
        assert_eq!(info.domain, "stanford.edu");
    }

    #[test]
    fn category_scores_match_registry() {
        assert_eq!(classify("https://nasa.gov/news").score, 90);
        assert_eq!(classify("https://nature.com/articles").score, 90);
        assert_eq!(classify("https://bbc.com/news").score, 80);
        assert_eq!(classify("https://github.com/rust-lang").score, 85);
        assert_eq!(classify("https://wikipedia.org/wiki/Rust").score, 75);
        assert_eq!(classify("https://snopes.com/fact-check").score, 85);
    }

    #[test]
    fn unknown_domain_is_unverified() {
        let info = classify("https://randomwebsite.example/info");
        assert_eq!(info.category, TrustCategory::Unverified);
        assert_eq!(info.score, 50);
        assert!(!info.trusted);
        assert_eq!(info.domain, "randomwebsite.example");
    }

    #[test]
    fn www_prefix_stripped() {
        let info = classify("https://www.reuters.com/world");
        assert_eq!(info.domain, "reuters.com");
        assert_eq!(info.category, TrustCategory::Media);
    }

    #[test]
    fn suffix_patterns_match_unlisted_domains() {
        assert_eq!(
            classify("https://smallcollege.edu/dept").category,
            TrustCategory::Academic
        );
        assert_eq!(
            classify("https://research.ac.uk/project").category,
            TrustCategory::Academic
        );
        assert_eq!(
            classify("https://cityhall.gov/minutes").category,
            TrustCategory::Government
        );
        assert_eq!(
            classify("https://agency.gov.uk/report").category,
            TrustCategory::Government
        );
        assert_eq!(
            classify("https://treaty-body.int/docs").category,
            TrustCategory::Government
        );
    }

    #[test]
    fn classification_idempotent_across_url_variants() {
        let a = classify("https://stanford.edu/x");
        let b = classify("https://stanford.edu/x?utm_source=feed#section");
        let c = classify("https://stanford.edu/completely/other/path");
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn malformed_url_degrades_to_empty_domain() {
        let info = classify("not a url at all");
        assert_eq!(info.domain, "");
        assert_eq!(info.category, TrustCategory::Unverified);
        assert!(!info.trusted);
    }

    #[test]
    fn is_trusted_matches_classify() {
        assert!(is_trusted("https://mit.edu/about"));
        assert!(!is_trusted("https://someblog.example/post"));
    }

    #[test]
    fn blacklist_matches_exact_and_subdomains() {
        assert!(is_blacklisted("https://reddit.com/r/rust"));
        assert!(is_blacklisted("https://old.reddit.com/r/rust"));
        assert!(is_blacklisted("https://www.ehow.com/how-to"));
        assert!(!is_blacklisted("https://rust-lang.org"));
    }

    #[test]
    fn blacklist_does_not_match_lookalike_domains() {
        // "notreddit.com" must not match the "reddit.com" entry.
        assert!(!is_blacklisted("https://notreddit.com/page"));
    }

    #[test]
    fn trust_info_serde_round_trip() {
        let info = classify("https://arxiv.org/abs/2301.00001");
        let json = serde_json::to_string(&info).expect("serialize");
        let decoded: TrustInfo = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, info);
        assert!(json.contains("science"));
    }

    #[test]
    fn category_display_uses_label() {
        assert_eq!(
            TrustCategory::Government.to_string(),
            "Government & Intergovernmental"
        );
    }
}
