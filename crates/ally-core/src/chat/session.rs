//! In-memory state of a single conversation.

use ally_types::chat::Turn;

/// Ordered turn history for one conversation.
///
/// Turns are only ever appended, except by [`reset`](Self::reset) which empties
/// the history. A completed exchange leaves strictly alternating roles
/// starting with `user`; a failed exchange leaves a trailing user turn.
#[derive(Debug, Clone, Default)]
pub struct ConversationSession {
    history: Vec<Turn>,
}

impl ConversationSession {
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.history.push(Turn::user(text));
    }

    pub fn push_model(&mut self, text: impl Into<String>) {
        self.history.push(Turn::model(text));
    }

    /// Discard all turns.
    pub fn reset(&mut self) {
        self.history.clear();
    }
}
