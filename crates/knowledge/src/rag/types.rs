//! RAG response types.

use crate::types::RetrievedPassage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Answer substituted when the model call fails.
pub const APOLOGY_RESPONSE: &str = "I apologize, but I encountered an error processing your request. Please try again or contact customer service.";

/// Longest citation snippet, in characters, before the ellipsis.
pub const SNIPPET_MAX_CHARS: usize = 200;

/// A passage shown to the user as the source of an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCitation {
    /// Source document name
    pub title: String,

    /// Start of the passage text
    pub snippet: String,

    /// Relevance score from retrieval
    pub score: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl SourceCitation {
    pub fn from_passage(passage: &RetrievedPassage) -> Self {
        Self {
            title: passage.source.clone(),
            snippet: snippet(&passage.text, SNIPPET_MAX_CHARS),
            score: passage.score,
            uri: passage.uri.clone(),
        }
    }
}

/// Truncate `text` to at most `max_chars` characters at a word boundary.
///
/// Truncated snippets end with `...`; short text is returned unchanged.
pub fn snippet(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let head = &text[..cut];

    // Back off to the last whitespace unless that would leave nothing
    let head = match head.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => &head[..idx],
        _ => head,
    };

    format!("{}...", head.trim_end())
}

/// Answer to one chat query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatAnswer {
    /// Generated answer, or the apology when generation failed
    pub response: String,

    /// Passages the answer was grounded on
    pub sources: Vec<SourceCitation>,

    /// Model that produced the answer
    pub model_used: String,

    pub retrieved_docs_count: usize,

    /// Whether a non-empty customer policy was in the prompt
    pub customer_policy_used: bool,

    #[serde(default)]
    pub generation_failed: bool,

    pub timestamp: DateTime<Utc>,
}

/// One exchange in the session history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub query: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub customer_id: String,
    pub sources: Vec<SourceCitation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_unchanged() {
        assert_eq!(snippet("Collision covers accidents.", 200), "Collision covers accidents.");
    }

    #[test]
    fn test_long_text_cut_on_word_boundary() {
        let text = "word ".repeat(60);
        let cut = snippet(&text, 200);
        assert!(cut.ends_with("..."));
        assert!(cut.chars().count() <= 203);
        assert!(cut.trim_end_matches("...").ends_with("word"));
    }

    #[test]
    fn test_multibyte_text_is_char_safe() {
        let text = "é".repeat(250);
        let cut = snippet(&text, 200);
        assert_eq!(cut.chars().count(), 203);
    }

    #[test]
    fn test_citation_from_passage() {
        let passage = RetrievedPassage::new("Rental reimbursement up to $30/day.", "auto.pdf", 0.7)
            .with_uri("s3://bucket/policy_docs/auto.pdf");
        let citation = SourceCitation::from_passage(&passage);
        assert_eq!(citation.title, "auto.pdf");
        assert_eq!(citation.snippet, "Rental reimbursement up to $30/day.");
        assert_eq!(citation.score, 0.7);
        assert!(citation.uri.is_some());
    }
}
