//! Terminal cell representation
//!
//! A cell stores one character, its display width, and a style id into
//! the screen's style set. Styles are ref-counted elsewhere; the cell is
//! plain data and the screen is responsible for releasing a cell's style
//! before overwriting it.

use serde::{Deserialize, Serialize};

use crate::core::style_set::{StyleId, DEFAULT_STYLE_ID};

/// Hyperlink identifier; 0 means no hyperlink
pub type HyperlinkId = u32;

/// A single cell in the terminal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The character in this cell; blank cells hold a space
    pub ch: char,
    /// Display width: 1 normal, 2 wide, 0 for wide-char continuations
    pub width: u8,
    /// Interned style id
    pub style: StyleId,
    /// Set by DECSCA/SPA; protected cells survive selective erase
    pub protected: bool,
    /// OSC 8 hyperlink id (0 = none)
    pub hyperlink: HyperlinkId,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            width: 1,
            style: DEFAULT_STYLE_ID,
            protected: false,
            hyperlink: 0,
        }
    }
}

impl Cell {
    /// Whether this is the trailing half of a wide character
    pub fn is_continuation(&self) -> bool {
        self.width == 0
    }

    /// Whether the cell shows nothing and carries no attributes
    pub fn is_blank(&self) -> bool {
        self.ch == ' ' && self.style == DEFAULT_STYLE_ID && self.hyperlink == 0
    }

    /// Reset to a blank cell carrying the given style.
    ///
    /// The caller must have released the old style id already.
    pub fn erase(&mut self, style: StyleId) {
        *self = Cell {
            style,
            ..Cell::default()
        };
    }
}
