//! In-memory conversation history for one session.

use super::types::ConversationTurn;
use serde::Serialize;

/// Turns of the current session, oldest first.
///
/// Nothing is persisted; history lives until it is cleared or the process exits.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        tracing::debug!("Clearing {} conversation turns", self.turns.len());
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn turn(query: &str) -> ConversationTurn {
        ConversationTurn {
            query: query.to_string(),
            response: "answer".to_string(),
            timestamp: Utc::now(),
            customer_id: "john_doe".to_string(),
            sources: Vec::new(),
        }
    }

    #[test]
    fn test_push_and_clear() {
        let mut history = ConversationHistory::new();
        assert!(history.is_empty());

        history.push(turn("first"));
        history.push(turn("second"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.last().map(|t| t.query.as_str()), Some("second"));
        assert_eq!(history.turns()[0].query, "first");

        history.clear();
        assert!(history.is_empty());
        assert!(history.last().is_none());
    }

    #[test]
    fn test_serializes_as_list() {
        let mut history = ConversationHistory::new();
        history.push(turn("q"));
        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["query"], "q");
    }
}
