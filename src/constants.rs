//! Shared crate-wide constants.

/// Rows moved by a page key in the text viewer and editor.
pub const PAGE_ROWS: usize = 5;

/// Columns moved by a horizontal page key in the text editor.
pub const PAGE_COLS: usize = 5;

/// Deepest subtree the structural editor descends into during a replay.
///
/// At the bound a replay level returns its subtree unchanged.
pub const MAX_EDIT_DEPTH: usize = 1024;

/// Deepest nesting accepted by the expression reader.
pub const MAX_READ_DEPTH: usize = 512;

/// Rendered rows scrolled by up/down in the structural editor.
pub const EDITOR_SCROLL_ROWS: usize = 3;

/// Rendered rows scrolled by left/right in the structural editor.
pub const EDITOR_PAGE_ROWS: usize = 8;

/// Share of the screen given to the application stack panels.
pub const ROUTER_SPLIT: f32 = 0.3;

/// Share of the documentation browser given to the symbol menu.
pub const DOC_SPLIT: f32 = 0.33;

/// Lines kept by the in-memory log ring.
pub const LOG_BUFFER_LINES: usize = 2000;

/// Expression edited by a structural editor launched without an argument.
pub const DEFAULT_EXPRESSION: &str = "(lambda ())";
