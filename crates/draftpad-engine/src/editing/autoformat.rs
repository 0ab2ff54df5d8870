//! Markdown-style autoformatting applied after every edit.
//!
//! A single pass over the document's blocks rewrites block types and inline
//! styles based on a literal prefix match on each block's text:
//!
//! 1. `"# "`  — the block becomes a header-one and the two marker characters
//!    are consumed from the text;
//! 2. `"* "`  — BOLD over the whole text, marker kept;
//! 3. `"** "` — COLOR-RED over the whole text, marker kept;
//! 4. `"*** "` — UNDERLINE over the whole text, marker kept.
//!
//! Rules are evaluated sequentially and exclusively per block, in exactly
//! this order. Keeping the asterisk markers while stripping the heading
//! marker is deliberate observed behavior, not a bug to fix.

use crate::editing::modifier::splice_styles;
use crate::models::{Block, BlockType, DocumentContent, InlineStyle};

/// Scan every block and apply the prefix rules.
///
/// Pure: the input is never mutated. Returns `None` when no rule fired on
/// any block — the explicit "nothing changed" signal callers use to decide
/// whether to commit a new editor state. When a style rule fires on a block
/// that already carries that style the pass still reports a change (the
/// resulting value is equal, so re-running it is idempotent by value).
///
/// The output always has the same blocks, with the same keys, in the same
/// order as the input; only types, text, and styles change.
pub fn transform(content: &DocumentContent) -> Option<DocumentContent> {
    let mut updated: Option<Vec<Block>> = None;

    for (index, block) in content.blocks().iter().enumerate() {
        if let Some(formatted) = format_block(block) {
            updated.get_or_insert_with(|| content.blocks().to_vec())[index] = formatted;
        }
    }

    updated.map(DocumentContent::with_blocks)
}

/// Evaluate the prefix rules against one block. `None` means no rule fired.
///
/// The three asterisk prefixes are mutually exclusive as literal prefixes
/// (`"** "` does not start with `"* "`: its second character is `*`, not a
/// space), so the first match is the only possible match; the sequential
/// shape is kept anyway to pin the precedence.
fn format_block(block: &Block) -> Option<Block> {
    if block.text.starts_with("# ") {
        Some(strip_heading(block))
    } else if block.text.starts_with("* ") {
        Some(style_whole_block(block, InlineStyle::Bold))
    } else if block.text.starts_with("** ") {
        Some(style_whole_block(block, InlineStyle::ColorRed))
    } else if block.text.starts_with("*** ") {
        Some(style_whole_block(block, InlineStyle::Underline))
    } else {
        None
    }
}

/// `"# Hello"` becomes a header-one block with text `"Hello"`. Existing
/// style spans shift left past the consumed marker and clamp.
fn strip_heading(block: &Block) -> Block {
    // The marker is two ASCII characters, so the byte slice is safe.
    let text = block.text[2..].to_string();
    let styles = splice_styles(&block.styles, 0, 2, 0);
    Block::with_key(block.key.clone(), BlockType::HeaderOne, text, styles)
}

fn style_whole_block(block: &Block, style: InlineStyle) -> Block {
    block.apply_style(0..block.char_len(), style)
}
