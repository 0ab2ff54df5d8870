use std::ops::Range;

use crate::models::{Block, BlockType, DocumentContent, InlineStyle};

/// Build a content value from blocks, panicking on duplicate keys.
pub fn content_of(blocks: Vec<Block>) -> DocumentContent {
    DocumentContent::new(blocks).unwrap()
}

/// An unstyled paragraph block with a fresh key.
pub fn unstyled(text: &str) -> Block {
    Block::new(BlockType::Unstyled, text)
}

/// A paragraph block carrying one style span.
pub fn styled_block(text: &str, range: Range<usize>, style: InlineStyle) -> Block {
    Block::new(BlockType::Unstyled, text).apply_style(range, style)
}
