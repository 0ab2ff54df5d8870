//! The persisted representation: a serializable plain-data form of
//! [`DocumentContent`], convertible losslessly in both directions.
//!
//! The JSON shape (field names, `offset`/`length` style ranges, an entity
//! map) is kept wire-compatible with the content this editor's predecessor
//! persisted, so existing stored notes load unchanged. Entity ranges and the
//! entity map are carried but always empty here.

use serde::{Deserialize, Serialize};

use crate::models::{Block, BlockKey, BlockType, DocumentContent, InlineStyle, StyleRange};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawContent {
    pub blocks: Vec<RawBlock>,
    #[serde(rename = "entityMap", default)]
    pub entity_map: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    #[serde(rename = "inlineStyleRanges", default)]
    pub inline_style_ranges: Vec<RawStyleRange>,
    #[serde(rename = "entityRanges", default)]
    pub entity_ranges: Vec<RawEntityRange>,
}

/// Style span in `offset`/`length` form; the engine uses half-open ranges
/// internally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntityRange {
    pub offset: usize,
    pub length: usize,
    pub key: u64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RawError {
    #[error("unknown block type `{0}`")]
    UnknownBlockType(String),
    #[error("unknown inline style `{0}`")]
    UnknownStyle(String),
    #[error("duplicate block key `{0}`")]
    DuplicateBlockKey(String),
    #[error(
        "style range {offset}+{length} exceeds block `{key}` of length {len}"
    )]
    RangeOutOfBounds {
        key: String,
        offset: usize,
        length: usize,
        len: usize,
    },
}

/// Serialize a content snapshot into its persisted form. Infallible: every
/// in-memory content value is representable.
pub fn convert_to_raw(content: &DocumentContent) -> RawContent {
    let blocks = content
        .blocks()
        .iter()
        .map(|block| RawBlock {
            key: block.key.as_str().to_string(),
            kind: block.kind.as_str().to_string(),
            text: block.text.clone(),
            inline_style_ranges: block
                .styles
                .iter()
                .map(|s| RawStyleRange {
                    offset: s.range.start,
                    length: s.range.end - s.range.start,
                    style: s.style.as_str().to_string(),
                })
                .collect(),
            entity_ranges: Vec::new(),
        })
        .collect();

    RawContent {
        blocks,
        entity_map: serde_json::Map::new(),
    }
}

/// Reconstruct a content snapshot from its persisted form, validating block
/// types, style names, range bounds, and key uniqueness.
pub fn convert_from_raw(raw: &RawContent) -> Result<DocumentContent, RawError> {
    let mut blocks = Vec::with_capacity(raw.blocks.len());

    for raw_block in &raw.blocks {
        let kind = BlockType::from_name(&raw_block.kind)
            .ok_or_else(|| RawError::UnknownBlockType(raw_block.kind.clone()))?;
        let len = raw_block.text.chars().count();

        let mut styles = Vec::with_capacity(raw_block.inline_style_ranges.len());
        for range in &raw_block.inline_style_ranges {
            let style = InlineStyle::from_name(&range.style)
                .ok_or_else(|| RawError::UnknownStyle(range.style.clone()))?;
            // checked_add: a hostile payload can hold offsets near usize::MAX
            let end = match range.offset.checked_add(range.length) {
                Some(end) if end <= len => end,
                _ => {
                    return Err(RawError::RangeOutOfBounds {
                        key: raw_block.key.clone(),
                        offset: range.offset,
                        length: range.length,
                        len,
                    });
                }
            };
            styles.push(StyleRange::new(range.offset..end, style));
        }

        blocks.push(Block::with_key(
            BlockKey::new(raw_block.key.clone()),
            kind,
            raw_block.text.clone(),
            styles,
        ));
    }

    DocumentContent::new(blocks).map_err(|e| RawError::DuplicateBlockKey(e.0.to_string()))
}
