pub mod content;
pub mod selection;

pub use content::{
    Block, BlockKey, BlockType, DocumentContent, DuplicateKeyError, InlineStyle, StyleRange,
    StyleRun,
};
pub use selection::Selection;
