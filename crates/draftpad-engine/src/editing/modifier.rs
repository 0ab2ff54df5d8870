//! Pure content-mutation primitives.
//!
//! Every function takes the current [`DocumentContent`] plus a [`Selection`]
//! scoping the mutation and returns a new content value; inputs are never
//! mutated. These are the only operations the autoformat pass and the command
//! layer use to edit block text, types, and styles.

use crate::models::content::normalize_styles;
use crate::models::{
    Block, BlockKey, BlockType, DocumentContent, InlineStyle, Selection, StyleRange,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("no block with key {0}")]
    UnknownBlock(BlockKey),
    #[error("offset {offset} is out of bounds for a block of length {len}")]
    OffsetOutOfBounds { offset: usize, len: usize },
    #[error("operation requires a single-block selection")]
    MultiBlockSelection,
}

/// Selection normalized to document order and validated against the content.
struct Resolved {
    start_index: usize,
    start_offset: usize,
    end_index: usize,
    end_offset: usize,
}

fn resolve(content: &DocumentContent, selection: &Selection) -> Result<Resolved, EditError> {
    let anchor_index = content
        .index_of(&selection.anchor_key)
        .ok_or_else(|| EditError::UnknownBlock(selection.anchor_key.clone()))?;
    let focus_index = content
        .index_of(&selection.focus_key)
        .ok_or_else(|| EditError::UnknownBlock(selection.focus_key.clone()))?;

    let anchor = (anchor_index, selection.anchor_offset);
    let focus = (focus_index, selection.focus_offset);
    let ((start_index, start_offset), (end_index, end_offset)) = if anchor <= focus {
        (anchor, focus)
    } else {
        (focus, anchor)
    };

    check_offset(&content.blocks()[start_index], start_offset)?;
    check_offset(&content.blocks()[end_index], end_offset)?;

    Ok(Resolved {
        start_index,
        start_offset,
        end_index,
        end_offset,
    })
}

/// Check a selection against a content value without applying anything.
pub(crate) fn validate_selection(
    content: &DocumentContent,
    selection: &Selection,
) -> Result<(), EditError> {
    resolve(content, selection).map(|_| ())
}

fn check_offset(block: &Block, offset: usize) -> Result<(), EditError> {
    let len = block.char_len();
    if offset > len {
        return Err(EditError::OffsetOutOfBounds { offset, len });
    }
    Ok(())
}

/// Set the block type of every block covered by the selection.
pub fn set_block_type(
    content: &DocumentContent,
    selection: &Selection,
    kind: BlockType,
) -> Result<DocumentContent, EditError> {
    let r = resolve(content, selection)?;
    let mut blocks = content.blocks().to_vec();
    for block in &mut blocks[r.start_index..=r.end_index] {
        block.kind = kind;
    }
    Ok(DocumentContent::with_blocks(blocks))
}

/// Replace the selected character range of a single block with `replacement`.
///
/// Style spans are carried across the splice: spans ending before it are
/// untouched, spans after it shift by the length delta, and spans overlapping
/// it clamp to the splice point. Spans left empty are dropped.
pub fn replace_text(
    content: &DocumentContent,
    selection: &Selection,
    replacement: &str,
) -> Result<DocumentContent, EditError> {
    if !selection.is_single_block() {
        return Err(EditError::MultiBlockSelection);
    }
    let r = resolve(content, selection)?;
    let block = &content.blocks()[r.start_index];

    let chars: Vec<char> = block.text.chars().collect();
    let mut text = String::with_capacity(block.text.len() + replacement.len());
    text.extend(&chars[..r.start_offset]);
    text.push_str(replacement);
    text.extend(&chars[r.end_offset..]);

    let inserted = replacement.chars().count();
    let styles = splice_styles(&block.styles, r.start_offset, r.end_offset, inserted);

    let mut blocks = content.blocks().to_vec();
    blocks[r.start_index] = Block::with_key(block.key.clone(), block.kind, text, styles);
    Ok(DocumentContent::with_blocks(blocks))
}

/// Apply `style` over the covered range of every block in the selection.
pub fn apply_inline_style(
    content: &DocumentContent,
    selection: &Selection,
    style: InlineStyle,
) -> Result<DocumentContent, EditError> {
    let r = resolve(content, selection)?;
    let mut blocks = content.blocks().to_vec();
    for index in r.start_index..=r.end_index {
        let len = blocks[index].char_len();
        let start = if index == r.start_index { r.start_offset } else { 0 };
        let end = if index == r.end_index { r.end_offset } else { len };
        blocks[index] = blocks[index].apply_style(start..end, style);
    }
    Ok(DocumentContent::with_blocks(blocks))
}

/// Map style spans through a text splice replacing `[start, end)` with
/// `inserted` characters. Positions before the splice are stable, positions
/// after it shift, positions inside it collapse to the splice start.
pub(crate) fn splice_styles(
    styles: &[StyleRange],
    start: usize,
    end: usize,
    inserted: usize,
) -> Vec<StyleRange> {
    let removed = end - start;
    let map = |p: usize| {
        if p <= start {
            p
        } else if p >= end {
            p - removed + inserted
        } else {
            start
        }
    };

    let mut out = Vec::new();
    for s in styles {
        let mapped = map(s.range.start)..map(s.range.end);
        if mapped.start < mapped.end {
            out.push(StyleRange::new(mapped, s.style));
        }
    }
    normalize_styles(&mut out);
    out
}
