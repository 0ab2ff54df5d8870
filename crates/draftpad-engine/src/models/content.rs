use std::fmt;
use std::ops::Range;

use uuid::Uuid;

/// Opaque stable identifier for a block, unique within a `DocumentContent`.
///
/// Keys survive every transformation of the content: the autoformat pass and
/// the text modifiers never reassign them, so UI layers and selections can
/// refer to blocks across edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockKey(String);

impl BlockKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap an existing key string (used when loading persisted content).
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structural role of a block, independent of inline styling.
///
/// Only `Unstyled` and `HeaderOne` are produced by the autoformat rules; the
/// remaining variants exist so persisted content using them round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Unstyled,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    Blockquote,
    CodeBlock,
    UnorderedListItem,
    OrderedListItem,
}

impl BlockType {
    /// Wire name used by the persisted representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::HeaderOne => "header-one",
            BlockType::HeaderTwo => "header-two",
            BlockType::HeaderThree => "header-three",
            BlockType::Blockquote => "blockquote",
            BlockType::CodeBlock => "code-block",
            BlockType::UnorderedListItem => "unordered-list-item",
            BlockType::OrderedListItem => "ordered-list-item",
        }
    }

    /// Parse a wire name back into a block type.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "unstyled" => Some(BlockType::Unstyled),
            "header-one" => Some(BlockType::HeaderOne),
            "header-two" => Some(BlockType::HeaderTwo),
            "header-three" => Some(BlockType::HeaderThree),
            "blockquote" => Some(BlockType::Blockquote),
            "code-block" => Some(BlockType::CodeBlock),
            "unordered-list-item" => Some(BlockType::UnorderedListItem),
            "ordered-list-item" => Some(BlockType::OrderedListItem),
            _ => None,
        }
    }
}

/// Named inline style applied over a character span within a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InlineStyle {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    ColorRed,
}

impl InlineStyle {
    /// Wire name used by the persisted representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            InlineStyle::Bold => "BOLD",
            InlineStyle::Italic => "ITALIC",
            InlineStyle::Underline => "UNDERLINE",
            InlineStyle::Strikethrough => "STRIKETHROUGH",
            InlineStyle::Code => "CODE",
            InlineStyle::ColorRed => "COLOR-RED",
        }
    }

    /// Parse a wire name back into an inline style.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "BOLD" => Some(InlineStyle::Bold),
            "ITALIC" => Some(InlineStyle::Italic),
            "UNDERLINE" => Some(InlineStyle::Underline),
            "STRIKETHROUGH" => Some(InlineStyle::Strikethrough),
            "CODE" => Some(InlineStyle::Code),
            "COLOR-RED" => Some(InlineStyle::ColorRed),
            _ => None,
        }
    }
}

/// A half-open character span `[start, end)` tagged with an inline style.
///
/// Invariant: `start <= end <= char_len` of the owning block's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRange {
    pub range: Range<usize>,
    pub style: InlineStyle,
}

impl StyleRange {
    pub fn new(range: Range<usize>, style: InlineStyle) -> Self {
        Self { range, style }
    }
}

/// A maximal run of characters sharing the same set of inline styles,
/// produced by [`Block::style_runs`] for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRun {
    pub range: Range<usize>,
    pub text: String,
    pub styles: Vec<InlineStyle>,
}

/// One paragraph-level unit of the document: a line of text with its own
/// structural type and inline style spans. All offsets are character
/// (Unicode scalar) offsets into `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub key: BlockKey,
    pub kind: BlockType,
    pub text: String,
    pub styles: Vec<StyleRange>,
}

impl Block {
    /// Create a block with a freshly generated key and no styles.
    pub fn new(kind: BlockType, text: impl Into<String>) -> Self {
        Self {
            key: BlockKey::generate(),
            kind,
            text: text.into(),
            styles: Vec::new(),
        }
    }

    /// Create a block with an explicit key (used when loading persisted
    /// content or splitting blocks).
    pub fn with_key(
        key: BlockKey,
        kind: BlockType,
        text: impl Into<String>,
        styles: Vec<StyleRange>,
    ) -> Self {
        Self {
            key,
            kind,
            text: text.into(),
            styles,
        }
    }

    /// Length of the block's text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Return a copy of this block with `style` applied over `range`.
    ///
    /// If an existing span of the same style already covers `range` the style
    /// list is unchanged (styles are sets, not multisets). Empty ranges are
    /// ignored. Callers must pass a range within the block's text.
    pub fn apply_style(&self, range: Range<usize>, style: InlineStyle) -> Block {
        let mut block = self.clone();
        if range.start >= range.end {
            return block;
        }
        let covered = block
            .styles
            .iter()
            .any(|s| s.style == style && s.range.start <= range.start && range.end <= s.range.end);
        if !covered {
            // A widening span subsumes narrower spans of the same style.
            block
                .styles
                .retain(|s| !(s.style == style && range.start <= s.range.start && s.range.end <= range.end));
            block.styles.push(StyleRange::new(range, style));
            normalize_styles(&mut block.styles);
        }
        block
    }

    /// Segment the block's text into maximal runs of equal style sets, in
    /// order, covering the whole text. Used by render layers to emit one
    /// styled span per run.
    pub fn style_runs(&self) -> Vec<StyleRun> {
        let len = self.char_len();
        if len == 0 {
            return Vec::new();
        }

        let mut boundaries = vec![0, len];
        for s in &self.styles {
            boundaries.push(s.range.start.min(len));
            boundaries.push(s.range.end.min(len));
        }
        boundaries.sort_unstable();
        boundaries.dedup();

        let chars: Vec<char> = self.text.chars().collect();
        let mut runs = Vec::new();
        for pair in boundaries.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let mut styles: Vec<InlineStyle> = self
                .styles
                .iter()
                .filter(|s| s.range.start <= start && end <= s.range.end)
                .map(|s| s.style)
                .collect();
            styles.sort_unstable();
            styles.dedup();
            runs.push(StyleRun {
                range: start..end,
                text: chars[start..end].iter().collect(),
                styles,
            });
        }
        runs
    }
}

/// Keep style spans in a canonical order so value equality is meaningful.
pub(crate) fn normalize_styles(styles: &mut Vec<StyleRange>) {
    styles.sort_by(|a, b| {
        (a.range.start, a.range.end, a.style).cmp(&(b.range.start, b.range.end, b.style))
    });
    styles.dedup();
}

/// Two blocks in one content value share a key.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("duplicate block key: {0}")]
pub struct DuplicateKeyError(pub BlockKey);

/// An ordered, immutable snapshot of the whole document.
///
/// Every transformation produces a new `DocumentContent`; nothing mutates one
/// in place. Block keys are unique within a content value (enforced by
/// [`DocumentContent::new`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContent {
    blocks: Vec<Block>,
}

impl DocumentContent {
    /// Build a content value, validating block key uniqueness.
    pub fn new(blocks: Vec<Block>) -> Result<Self, DuplicateKeyError> {
        for (i, block) in blocks.iter().enumerate() {
            if blocks[..i].iter().any(|b| b.key == block.key) {
                return Err(DuplicateKeyError(block.key.clone()));
            }
        }
        Ok(Self { blocks })
    }

    /// The empty document: a single empty unstyled block, matching the
    /// empty-editor state of a fresh session.
    pub fn empty() -> Self {
        Self {
            blocks: vec![Block::new(BlockType::Unstyled, "")],
        }
    }

    /// Internal constructor for callers that preserve the key-uniqueness
    /// invariant themselves (same keys in, same keys out).
    pub(crate) fn with_blocks(blocks: Vec<Block>) -> Self {
        debug_assert!(
            blocks
                .iter()
                .enumerate()
                .all(|(i, b)| !blocks[..i].iter().any(|o| o.key == b.key)),
            "block keys must be unique"
        );
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Look up a block by key.
    pub fn block(&self, key: &BlockKey) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.key == key)
    }

    /// Position of a block within the document.
    pub fn index_of(&self, key: &BlockKey) -> Option<usize> {
        self.blocks.iter().position(|b| &b.key == key)
    }

    /// Concatenated block text, newline-separated. Styling is lost; this is
    /// for previews and tests, not persistence.
    pub fn plain_text(&self) -> String {
        let lines: Vec<&str> = self.blocks.iter().map(|b| b.text.as_str()).collect();
        lines.join("\n")
    }
}
