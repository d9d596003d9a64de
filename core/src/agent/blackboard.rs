//! Session blackboard
//!
//! A single string the model rewrites wholesale to keep its task, plan and
//! checklist in view. It is re-supplied in the system prompt on every model
//! call, so it survives any trimming of the conversation history.

use parking_lot::RwLock;
use std::sync::Arc;

/// Handle to one session's blackboard. Clones share the same content.
#[derive(Debug, Clone, Default)]
pub struct Blackboard {
    content: Arc<RwLock<String>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole content
    pub fn write(&self, content: impl Into<String>) {
        *self.content.write() = content.into();
    }

    /// Current content, or `None` while nothing has been written
    pub fn read(&self) -> Option<String> {
        let content = self.content.read();
        if content.is_empty() {
            None
        } else {
            Some(content.clone())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_not_append() {
        let board = Blackboard::new();
        assert!(board.read().is_none());

        board.write("first plan");
        board.write("second plan");
        assert_eq!(board.read().as_deref(), Some("second plan"));
    }

    #[test]
    fn test_clones_share_content() {
        let board = Blackboard::new();
        let handle = board.clone();
        handle.write("shared");
        assert_eq!(board.read().as_deref(), Some("shared"));
        assert_eq!(board.len(), 6);
    }

    #[test]
    fn test_sessions_are_independent() {
        let a = Blackboard::new();
        let b = Blackboard::new();
        a.write("only in a");
        assert!(b.is_empty());
    }
}
