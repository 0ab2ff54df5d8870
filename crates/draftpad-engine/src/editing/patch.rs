/// Classification of a committed edit. The autoformat pass commits as
/// [`ChangeType::ChangeBlockType`] so history consumers see one coherent
/// edit rather than a keystroke plus a reformat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    InsertCharacters,
    RemoveRange,
    SplitBlock,
    MergeBlocks,
    ChangeBlockType,
    ChangeInlineStyle,
}

/// Result of applying a command to the editor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub change: ChangeType,
    /// True when the autoformat pass amended the edited content.
    pub autoformatted: bool,
    pub version: u64,
}
