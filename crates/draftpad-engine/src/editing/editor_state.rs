//! The editing session: current content, selection, and history.

use crate::editing::autoformat;
use crate::editing::commands::{self, Cmd};
use crate::editing::modifier::{self, EditError};
use crate::editing::patch::{ChangeType, Patch};
use crate::models::{BlockKey, DocumentContent, Selection};

/// Bounded history depth; the oldest snapshot is dropped beyond this.
const UNDO_DEPTH: usize = 100;

/// Wraps the current [`DocumentContent`] plus caret/selection and undo/redo
/// history. Every accepted edit replaces the content snapshot (never mutates
/// it) and runs the autoformat pass before committing, mirroring the
/// edit → transform → commit loop of the original editor.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    content: DocumentContent,
    selection: Selection,
    undo_stack: Vec<(DocumentContent, Selection)>,
    redo_stack: Vec<(DocumentContent, Selection)>,
    version: u64,
}

impl EditorState {
    /// A fresh session with a single empty block.
    pub fn empty() -> Self {
        Self::with_content(DocumentContent::empty())
    }

    /// A session over loaded content, caret at the start of the first block.
    /// Content with no blocks at all normalizes to the empty session.
    pub fn with_content(content: DocumentContent) -> Self {
        let content = if content.blocks().is_empty() {
            DocumentContent::empty()
        } else {
            content
        };
        let first = content.blocks()[0].key.clone();
        Self {
            content,
            selection: Selection::caret(first, 0),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            version: 0,
        }
    }

    pub fn content(&self) -> &DocumentContent {
        &self.content
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Monotonic counter incremented on every committed edit, undo, and
    /// redo; lets observers detect change cheaply.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Move the caret/selection without editing. Fails if the selection does
    /// not address the current content.
    pub fn set_selection(&mut self, selection: Selection) -> Result<(), EditError> {
        modifier::validate_selection(&self.content, &selection)?;
        self.selection = selection;
        Ok(())
    }

    /// Apply a command: compile it against the current content, run the
    /// autoformat pass over the result, and commit. When the pass amends the
    /// content the edit is recorded as a block-type change and the selection
    /// is reconciled with any text the pass consumed. A command that resolves
    /// to the current content (backspace at the document start, restyling an
    /// already-styled range) moves the caret at most and leaves history and
    /// version untouched.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        let (next, mut selection) = commands::apply_command(&self.content, &self.selection, &cmd)?;

        let mut change = change_type(&cmd);
        let mut autoformatted = false;
        let committed = match autoformat::transform(&next) {
            Some(formatted) => {
                selection = reconcile_selection(&next, &formatted, selection);
                change = ChangeType::ChangeBlockType;
                autoformatted = true;
                formatted
            }
            None => next,
        };

        if committed == self.content {
            self.selection = selection;
            return Ok(Patch {
                change,
                autoformatted,
                version: self.version,
            });
        }

        self.undo_stack
            .push((self.content.clone(), self.selection.clone()));
        if self.undo_stack.len() > UNDO_DEPTH {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();

        self.content = committed;
        self.selection = selection;
        self.version += 1;

        Ok(Patch {
            change,
            autoformatted,
            version: self.version,
        })
    }

    /// Restore the previous snapshot. Returns false when there is none.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some((content, selection)) => {
                let current = (
                    std::mem::replace(&mut self.content, content),
                    std::mem::replace(&mut self.selection, selection),
                );
                self.redo_stack.push(current);
                self.version += 1;
                true
            }
            None => false,
        }
    }

    /// Reapply the last undone snapshot. Returns false when there is none.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some((content, selection)) => {
                let current = (
                    std::mem::replace(&mut self.content, content),
                    std::mem::replace(&mut self.selection, selection),
                );
                self.undo_stack.push(current);
                self.version += 1;
                true
            }
            None => false,
        }
    }
}

fn change_type(cmd: &Cmd) -> ChangeType {
    match cmd {
        Cmd::InsertText { .. } => ChangeType::InsertCharacters,
        Cmd::DeleteBackward | Cmd::DeleteRange { .. } => ChangeType::RemoveRange,
        Cmd::SplitBlock => ChangeType::SplitBlock,
        Cmd::MergeWithPrevious => ChangeType::MergeBlocks,
        Cmd::SetBlockType { .. } => ChangeType::ChangeBlockType,
        Cmd::ApplyInlineStyle { .. } => ChangeType::ChangeInlineStyle,
    }
}

/// Map a selection from the pre-autoformat content onto the formatted one.
/// Block keys are stable across the pass; offsets shift left by however many
/// characters the pass consumed from the block and clamp to its new length.
fn reconcile_selection(
    before: &DocumentContent,
    after: &DocumentContent,
    selection: Selection,
) -> Selection {
    let map = |key: &BlockKey, offset: usize| match (before.block(key), after.block(key)) {
        (Some(old), Some(new)) => {
            let consumed = old.char_len().saturating_sub(new.char_len());
            offset.saturating_sub(consumed).min(new.char_len())
        }
        _ => offset,
    };

    Selection {
        anchor_offset: map(&selection.anchor_key, selection.anchor_offset),
        focus_offset: map(&selection.focus_key, selection.focus_offset),
        ..selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockType, InlineStyle, StyleRange};
    use pretty_assertions::assert_eq;

    fn insert(state: &mut EditorState, text: &str) -> Patch {
        state
            .apply(Cmd::InsertText {
                text: text.to_string(),
            })
            .unwrap()
    }

    #[test]
    fn empty_state_has_one_block_and_caret_at_start() {
        let state = EditorState::empty();
        assert_eq!(state.content().block_count(), 1);
        assert_eq!(state.selection().anchor_offset, 0);
        assert!(state.selection().is_collapsed());
    }

    #[test]
    fn plain_typing_commits_without_autoformat() {
        let mut state = EditorState::empty();
        let patch = insert(&mut state, "hello");

        assert_eq!(patch.change, ChangeType::InsertCharacters);
        assert!(!patch.autoformatted);
        assert_eq!(patch.version, 1);
        assert_eq!(state.content().plain_text(), "hello");
        assert_eq!(state.selection().anchor_offset, 5);
    }

    #[test]
    fn heading_prefix_autoformats_on_commit() {
        let mut state = EditorState::empty();
        let patch = insert(&mut state, "# Hi");

        assert!(patch.autoformatted);
        assert_eq!(patch.change, ChangeType::ChangeBlockType);
        let block = &state.content().blocks()[0];
        assert_eq!(block.kind, BlockType::HeaderOne);
        assert_eq!(block.text, "Hi");
        // Caret shifts left past the consumed marker
        assert_eq!(state.selection().anchor_offset, 2);
    }

    #[test]
    fn typing_into_a_heading_stays_a_heading() {
        let mut state = EditorState::empty();
        insert(&mut state, "# Title");
        let patch = insert(&mut state, "!");

        assert!(!patch.autoformatted, "\"Title!\" matches no prefix");
        let block = &state.content().blocks()[0];
        assert_eq!(block.kind, BlockType::HeaderOne);
        assert_eq!(block.text, "Title!");
    }

    #[test]
    fn bold_prefix_keeps_refiring_while_marker_present() {
        let mut state = EditorState::empty();
        let first = insert(&mut state, "* hi");
        assert!(first.autoformatted);

        let second = insert(&mut state, "!");
        assert!(second.autoformatted, "marker is never stripped");

        let block = &state.content().blocks()[0];
        assert_eq!(block.text, "* hi!");
        assert_eq!(block.styles, vec![StyleRange::new(0..5, InlineStyle::Bold)]);
    }

    #[test]
    fn split_then_type_affects_only_new_block() {
        let mut state = EditorState::empty();
        insert(&mut state, "first");
        state.apply(Cmd::SplitBlock).unwrap();
        insert(&mut state, "# second");

        assert_eq!(state.content().block_count(), 2);
        assert_eq!(state.content().blocks()[0].kind, BlockType::Unstyled);
        assert_eq!(state.content().blocks()[1].kind, BlockType::HeaderOne);
        assert_eq!(state.content().blocks()[1].text, "second");
    }

    #[test]
    fn undo_restores_content_and_selection() {
        let mut state = EditorState::empty();
        insert(&mut state, "hello");
        let before = state.content().clone();
        insert(&mut state, " world");

        assert!(state.undo());
        assert_eq!(state.content(), &before);
        assert_eq!(state.selection().anchor_offset, 5);

        assert!(state.redo());
        assert_eq!(state.content().plain_text(), "hello world");
    }

    #[test]
    fn noop_edit_leaves_history_and_version_untouched() {
        let mut state = EditorState::empty();

        // Backspace at the document start resolves to the current content
        let patch = state.apply(Cmd::DeleteBackward).unwrap();
        assert_eq!(patch.version, 0);
        assert_eq!(state.version(), 0);
        assert!(!state.undo(), "nothing to undo after a no-op");
    }

    #[test]
    fn restyling_an_already_styled_range_is_a_noop() {
        let mut state = EditorState::empty();
        insert(&mut state, "* hi");
        let version = state.version();

        let key = state.content().blocks()[0].key.clone();
        state
            .set_selection(Selection::block_range(key, 0, 4))
            .unwrap();
        state
            .apply(Cmd::ApplyInlineStyle {
                style: InlineStyle::Bold,
            })
            .unwrap();

        assert_eq!(state.version(), version);
    }

    #[test]
    fn undo_on_fresh_state_is_false() {
        let mut state = EditorState::empty();
        assert!(!state.undo());
        assert!(!state.redo());
    }

    #[test]
    fn new_edit_clears_redo_history() {
        let mut state = EditorState::empty();
        insert(&mut state, "a");
        insert(&mut state, "b");
        state.undo();
        insert(&mut state, "c");

        assert!(!state.redo());
        assert_eq!(state.content().plain_text(), "ac");
    }

    #[test]
    fn version_increments_on_every_commit_and_undo() {
        let mut state = EditorState::empty();
        assert_eq!(state.version(), 0);
        insert(&mut state, "x");
        assert_eq!(state.version(), 1);
        state.undo();
        assert_eq!(state.version(), 2);
        state.redo();
        assert_eq!(state.version(), 3);
    }

    #[test]
    fn with_content_normalizes_zero_blocks() {
        let state = EditorState::with_content(DocumentContent::with_blocks(Vec::new()));
        assert_eq!(state.content().block_count(), 1);
    }

    #[test]
    fn set_selection_rejects_out_of_bounds() {
        let mut state = EditorState::empty();
        insert(&mut state, "abc");
        let key = state.content().blocks()[0].key.clone();

        assert!(state.set_selection(Selection::caret(key.clone(), 3)).is_ok());
        assert!(state.set_selection(Selection::caret(key, 4)).is_err());
    }
}
