/*!
 * # Editing Core Module
 *
 * The editing system follows a small number of principles:
 *
 * ### 1. Immutable content snapshots
 * - The document is a [`DocumentContent`](crate::models::DocumentContent):
 *   an ordered list of blocks with stable keys
 * - Every edit produces a **new** content value; nothing is mutated in place
 * - "Did anything change" is an explicit signal, not a deep comparison
 *
 * ### 2. Command-based editing
 * - All edits are represented as **Commands** (`Cmd` enum) resolved against
 *   the current content and selection
 * - Commands are applied immediately on every input event and feed the
 *   undo/redo history
 *
 * ### 3. Autoformat as a post-process
 * - After every command the [`autoformat`] pass scans the candidate content
 *   and may amend it (markdown-style prefixes become block types and inline
 *   styles)
 * - An amended commit is tagged as a block-type change so history records
 *   one coherent edit per keystroke
 *
 * ## Module Structure
 *
 * - **`editor_state`**: the editing session (content + selection + history)
 * - **`commands`**: `Cmd` enum and resolution against content/selection
 * - **`modifier`**: pure content-mutation primitives (retype, splice, style)
 * - **`autoformat`**: the prefix-rule transformer
 * - **`patch`**: edit result metadata (change kind, version)
 */

pub mod autoformat;
pub mod commands;
pub mod editor_state;
pub mod modifier;
pub mod patch;

pub use commands::Cmd;
pub use editor_state::EditorState;
pub use modifier::EditError;
pub use patch::{ChangeType, Patch};
