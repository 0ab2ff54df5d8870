//! Commands that can be applied to the editor state.
//!
//! Every edit flows through the [`Cmd`] enum: the command layer resolves the
//! command against the current content and selection, calls into the
//! [`modifier`](crate::editing::modifier) primitives, and returns the new
//! content plus the caret that follows the edit. Splitting and merging are
//! the only operations that change the block count; the autoformat pass
//! never does.

use crate::editing::modifier::{self, EditError};
use crate::models::content::normalize_styles;
use crate::models::{
    Block, BlockKey, BlockType, DocumentContent, InlineStyle, Selection, StyleRange,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Insert text at the current selection, replacing it if ranged.
    InsertText { text: String },
    /// Delete the selection, or the character before a collapsed caret.
    /// At the start of a block this merges the block into its predecessor.
    DeleteBackward,
    /// Delete an explicit single-block range.
    DeleteRange { selection: Selection },
    /// Split the current block at the caret; the tail becomes a new block
    /// of the same type with a fresh key.
    SplitBlock,
    /// Merge the current block into the one before it.
    MergeWithPrevious,
    /// Retype every block covered by the current selection.
    SetBlockType { kind: BlockType },
    /// Apply an inline style over the current selection.
    ApplyInlineStyle { style: InlineStyle },
}

/// Resolve a command against the current content and selection.
pub(crate) fn apply_command(
    content: &DocumentContent,
    selection: &Selection,
    cmd: &Cmd,
) -> Result<(DocumentContent, Selection), EditError> {
    match cmd {
        Cmd::InsertText { text } => insert_text(content, selection, text),
        Cmd::DeleteBackward => delete_backward(content, selection),
        Cmd::DeleteRange { selection: range } => {
            let next = modifier::replace_text(content, range, "")?;
            let start = range.anchor_offset.min(range.focus_offset);
            Ok((next, Selection::caret(range.anchor_key.clone(), start)))
        }
        Cmd::SplitBlock => split_block(content, selection),
        Cmd::MergeWithPrevious => merge_with_previous(content, selection),
        Cmd::SetBlockType { kind } => {
            let next = modifier::set_block_type(content, selection, *kind)?;
            Ok((next, selection.clone()))
        }
        Cmd::ApplyInlineStyle { style } => {
            let next = modifier::apply_inline_style(content, selection, *style)?;
            Ok((next, selection.clone()))
        }
    }
}

fn insert_text(
    content: &DocumentContent,
    selection: &Selection,
    text: &str,
) -> Result<(DocumentContent, Selection), EditError> {
    let next = modifier::replace_text(content, selection, text)?;
    let start = selection.anchor_offset.min(selection.focus_offset);
    let caret = start + text.chars().count();
    Ok((next, Selection::caret(selection.anchor_key.clone(), caret)))
}

fn delete_backward(
    content: &DocumentContent,
    selection: &Selection,
) -> Result<(DocumentContent, Selection), EditError> {
    if !selection.is_collapsed() {
        let next = modifier::replace_text(content, selection, "")?;
        let start = selection.anchor_offset.min(selection.focus_offset);
        return Ok((next, Selection::caret(selection.anchor_key.clone(), start)));
    }

    let offset = selection.anchor_offset;
    if offset > 0 {
        let range = Selection::block_range(selection.anchor_key.clone(), offset - 1, offset);
        let next = modifier::replace_text(content, &range, "")?;
        return Ok((next, Selection::caret(selection.anchor_key.clone(), offset - 1)));
    }

    merge_with_previous(content, selection)
}

fn merge_with_previous(
    content: &DocumentContent,
    selection: &Selection,
) -> Result<(DocumentContent, Selection), EditError> {
    let index = content
        .index_of(&selection.anchor_key)
        .ok_or_else(|| EditError::UnknownBlock(selection.anchor_key.clone()))?;
    if index == 0 {
        // Nothing before the first block; the edit is a no-op.
        return Ok((content.clone(), selection.clone()));
    }

    let mut blocks = content.blocks().to_vec();
    let current = blocks.remove(index);
    let previous = &mut blocks[index - 1];
    let join_at = previous.char_len();

    previous.text.push_str(&current.text);
    for s in &current.styles {
        previous.styles.push(StyleRange::new(
            s.range.start + join_at..s.range.end + join_at,
            s.style,
        ));
    }
    normalize_styles(&mut previous.styles);

    let caret = Selection::caret(previous.key.clone(), join_at);
    Ok((DocumentContent::with_blocks(blocks), caret))
}

fn split_block(
    content: &DocumentContent,
    selection: &Selection,
) -> Result<(DocumentContent, Selection), EditError> {
    // A ranged selection is removed first; the collapsed caret then splits.
    let (content, selection) = if selection.is_collapsed() {
        (content.clone(), selection.clone())
    } else {
        let next = modifier::replace_text(content, selection, "")?;
        let start = selection.anchor_offset.min(selection.focus_offset);
        (next, Selection::caret(selection.anchor_key.clone(), start))
    };

    let index = content
        .index_of(&selection.anchor_key)
        .ok_or_else(|| EditError::UnknownBlock(selection.anchor_key.clone()))?;
    let block = content.blocks()[index].clone();
    let len = block.char_len();
    let at = selection.anchor_offset;
    if at > len {
        return Err(EditError::OffsetOutOfBounds { offset: at, len });
    }

    let chars: Vec<char> = block.text.chars().collect();
    let left_text: String = chars[..at].iter().collect();
    let right_text: String = chars[at..].iter().collect();
    let (left_styles, right_styles) = split_styles(&block.styles, at);

    let right_key = BlockKey::generate();
    let mut blocks = content.blocks().to_vec();
    blocks[index] = Block::with_key(block.key.clone(), block.kind, left_text, left_styles);
    blocks.insert(
        index + 1,
        Block::with_key(right_key.clone(), block.kind, right_text, right_styles),
    );

    Ok((
        DocumentContent::with_blocks(blocks),
        Selection::caret(right_key, 0),
    ))
}

/// Partition style spans at a split point; the right-hand spans are
/// rebased to the new block's origin.
fn split_styles(styles: &[StyleRange], at: usize) -> (Vec<StyleRange>, Vec<StyleRange>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for s in styles {
        let left_range = s.range.start.min(at)..s.range.end.min(at);
        if left_range.start < left_range.end {
            left.push(StyleRange::new(left_range, s.style));
        }
        let right_range = s.range.start.max(at) - at..s.range.end.max(at) - at;
        if right_range.start < right_range.end {
            right.push(StyleRange::new(right_range, s.style));
        }
    }
    normalize_styles(&mut left);
    normalize_styles(&mut right);
    (left, right)
}
