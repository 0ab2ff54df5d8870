pub mod editing;
pub mod models;
pub mod raw;
pub mod store;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{ChangeType, Cmd, EditError, EditorState, Patch, autoformat};
pub use models::{content::*, selection::*};
pub use raw::{RawContent, RawError, convert_from_raw, convert_to_raw};
pub use store::*;
