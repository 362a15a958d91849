//! Cursor state management

use serde::{Deserialize, Serialize};

use crate::core::cell::HyperlinkId;
use crate::core::charset::CharsetState;
use crate::core::style::Style;
use crate::core::style_set::{StyleId, DEFAULT_STYLE_ID};

/// Cursor visual shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorShape {
    /// Filled rectangle
    #[default]
    Block,
    /// Horizontal line under the cell
    Underline,
    /// Vertical bar
    Bar,
}

/// Cursor state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    /// 0-indexed column
    pub col: usize,
    /// 0-indexed row
    pub row: usize,
    /// Visual shape (DECSCUSR)
    pub shape: CursorShape,
    /// Pending wrap: a character was written into the last column and the
    /// cursor logically sits past the right margin until the next print
    pub pending_wrap: bool,
    /// The working SGR state new cells are stamped with
    pub style: Style,
    /// Interned id of `style` in the screen's style set
    pub style_id: StyleId,
    /// Whether new cells are marked protected (DECSCA/SPA)
    pub protected: bool,
    /// Active hyperlink id for new cells (0 = none)
    pub hyperlink: HyperlinkId,
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            col: 0,
            row: 0,
            shape: CursorShape::Block,
            pending_wrap: false,
            style: Style::default(),
            style_id: DEFAULT_STYLE_ID,
            protected: false,
            hyperlink: 0,
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Saved cursor state for DECSC/DECRC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCursor {
    pub col: usize,
    pub row: usize,
    pub style: Style,
    pub charset: CharsetState,
    pub origin: bool,
    pub pending_wrap: bool,
    pub protected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_new() {
        let cursor = Cursor::new();
        assert_eq!(cursor.col, 0);
        assert_eq!(cursor.row, 0);
        assert_eq!(cursor.shape, CursorShape::Block);
        assert_eq!(cursor.style_id, DEFAULT_STYLE_ID);
        assert!(!cursor.pending_wrap);
    }
}
