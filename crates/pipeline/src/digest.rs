//! Research digest: the structured intermediate between the two stages.
//!
//! The researcher assembles it exclusively from raw search results, so the
//! researcher-side no-fabrication invariant holds by construction.  The
//! curator consumes its [`ResearchDigest::to_text`] serialization and is
//! validated against [`ResearchDigest::contains_link`].

use serde::{Deserialize, Serialize};

/// One curated link with enough surrounding context for the curator to
/// extract product facts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DigestEntry {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchDigest {
    /// Ordered, most relevant first.  8–10 entries when the search was
    /// fruitful; fewer (or none) when it was thin.
    pub entries: Vec<DigestEntry>,
    /// Free-text note from the researcher's selection step.
    pub context: Option<String>,
}

impl ResearchDigest {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn links(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.link.as_str()).collect()
    }

    /// Whether `link` traces to a digest entry.  Comparison ignores
    /// surrounding whitespace and a trailing slash, nothing more.
    pub fn contains_link(&self, link: &str) -> bool {
        let needle = normalize_link(link);
        self.entries
            .iter()
            .any(|e| normalize_link(&e.link) == needle)
    }

    /// Serialization handed to the curator: a numbered list of
    /// title/link/snippet plus the researcher's context note.
    pub fn to_text(&self) -> String {
        if self.is_empty() {
            return "No usable research links were found.".to_string();
        }

        let mut parts: Vec<String> = vec!["Curated gift research links:".to_string()];
        for (i, entry) in self.entries.iter().enumerate() {
            let mut block = format!("{}. {}\n   {}", i + 1, entry.title, entry.link);
            if !entry.snippet.is_empty() {
                block.push_str("\n   ");
                block.push_str(&entry.snippet);
            }
            parts.push(block);
        }
        if let Some(context) = self.context.as_deref().map(str::trim) {
            if !context.is_empty() {
                parts.push(format!("Research notes: {context}"));
            }
        }
        parts.join("\n\n")
    }
}

fn normalize_link(link: &str) -> &str {
    link.trim().trim_end_matches('/')
}

// ── Tests ────────────────────────────────────────────────────────────────────
