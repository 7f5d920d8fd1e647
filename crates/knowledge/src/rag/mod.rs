//! Retrieval-augmented answering over customer policies.
//!
//! The [`Assistant`] grounds each answer in the customer's own policy and the
//! general policy corpus, and keeps the conversation for the session.

pub mod assistant;
pub mod session;
pub mod types;

pub use assistant::{Assistant, AssistantSettings};
pub use session::ConversationHistory;
pub use types::{ChatAnswer, ConversationTurn, SourceCitation, APOLOGY_RESPONSE};
