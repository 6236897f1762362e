//! Linear snapshot history for undo and redo.

use crate::domain::Snapshot;

/// Branch-discarding undo history over full-state snapshots.
///
/// The live state always equals the snapshot under the cursor; committing
/// while stepped back discards the redo tail.
#[derive(Debug)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
}

impl History {
    /// Starts a history whose only entry is the given state.
    pub fn new(initial: Snapshot) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// Appends a new state, discarding any redo branch.
    pub fn commit(&mut self, state: Snapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(state);
        self.cursor = self.entries.len() - 1;
    }

    /// Steps back and returns the restored state; `None` at the beginning.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Steps forward and returns the restored state; `None` at the end.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The state under the cursor. The entry list is never empty.
    pub fn current(&self) -> &Snapshot {
        &self.entries[self.cursor]
    }

    /// Restarts the history from a single snapshot, for states replaced
    /// wholesale by the backing store.
    pub fn reset(&mut self, state: Snapshot) {
        self.entries = vec![state];
        self.cursor = 0;
    }

    /// Number of snapshots held, including the live one.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn state(balance: f64) -> Snapshot {
        Snapshot::new(
            vec![Category::new("a", "A", "G", "#000000").with_balance(balance)],
            Vec::new(),
        )
    }

    #[test]
    fn fresh_history_cannot_step_anywhere() {
        let mut history = History::new(state(0.0));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn undo_then_redo_walks_the_timeline() {
        let mut history = History::new(state(0.0));
        history.commit(state(1.0));
        history.commit(state(2.0));

        assert_eq!(history.undo().unwrap().categories[0].balance, 1.0);
        assert_eq!(history.undo().unwrap().categories[0].balance, 0.0);
        assert!(history.undo().is_none());

        assert_eq!(history.redo().unwrap().categories[0].balance, 1.0);
        assert_eq!(history.redo().unwrap().categories[0].balance, 2.0);
        assert!(history.redo().is_none());
    }

    #[test]
    fn commit_after_undo_discards_the_redo_branch() {
        let mut history = History::new(state(0.0));
        history.commit(state(1.0));
        history.commit(state(2.0));
        history.undo();
        history.commit(state(9.0));

        assert!(!history.can_redo());
        assert_eq!(history.current().categories[0].balance, 9.0);
        assert_eq!(history.depth(), 3);
        assert_eq!(history.undo().unwrap().categories[0].balance, 1.0);
    }

    #[test]
    fn reset_collapses_to_one_entry() {
        let mut history = History::new(state(0.0));
        history.commit(state(1.0));
        history.reset(state(7.0));
        assert_eq!(history.depth(), 1);
        assert!(!history.can_undo());
        assert_eq!(history.current().categories[0].balance, 7.0);
    }
}
