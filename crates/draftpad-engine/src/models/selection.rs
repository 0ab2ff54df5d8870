use crate::models::content::BlockKey;

/// A range descriptor over one or more blocks: anchor block + character
/// offset to focus block + character offset. When anchor and focus address
/// the same block it denotes a single-block range; when the offsets also
/// match it is a collapsed caret.
///
/// The anchor is where the selection started, not necessarily the earlier
/// position in document order; consumers normalize direction themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub anchor_key: BlockKey,
    pub anchor_offset: usize,
    pub focus_key: BlockKey,
    pub focus_offset: usize,
}

impl Selection {
    /// A collapsed caret at `offset` within one block.
    pub fn caret(key: BlockKey, offset: usize) -> Self {
        Self {
            anchor_key: key.clone(),
            anchor_offset: offset,
            focus_key: key,
            focus_offset: offset,
        }
    }

    /// A range within a single block.
    pub fn block_range(key: BlockKey, start: usize, end: usize) -> Self {
        Self {
            anchor_key: key.clone(),
            anchor_offset: start,
            focus_key: key,
            focus_offset: end,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key && self.anchor_offset == self.focus_offset
    }

    pub fn is_single_block(&self) -> bool {
        self.anchor_key == self.focus_key
    }
}
