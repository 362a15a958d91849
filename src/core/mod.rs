//! Core terminal state model
//!
//! This module provides the data structures the dispatcher mutates:
//! - Screen grid with cells referencing interned styles
//! - Cursor state management
//! - Mode registry with per-mode save stacks
//! - Color palette with OSC override tracking
//! - The deduplicating, ref-counted style set
//!
//! The model is deterministic: given the same sequence of operations it
//! always produces the same state.

mod cell;
mod charset;
mod cursor;
mod grid;
mod kitty;
mod line;
mod modes;
mod palette;
mod screen;
mod scrollback;
mod style;
mod style_set;

pub use cell::{Cell, HyperlinkId};
pub use charset::{Charset, CharsetBank, CharsetSlot, CharsetState};
pub use cursor::{Cursor, CursorShape, SavedCursor};
pub use grid::Grid;
pub use kitty::{KittyKeyFlags, KittyKeyboardStack, KittySetOp};
pub use line::{Line, SemanticTag};
pub use modes::{Mode, ModeRegistry, ModeTag};
pub use palette::{standard_palette, ColorPalette, PaletteMask, Rgb, PALETTE_SIZE};
pub use screen::{EraseDisplayPart, ProtectedMode, Screen, DEFAULT_STYLE_CAPACITY};
pub use scrollback::Scrollback;
pub use style::{Style, StyleColor, StyleFlags, UnderlineStyle};
pub use style_set::{Layout, StyleId, StyleSet, DEFAULT_STYLE_ID};

/// Terminal dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub cols: usize,
    pub rows: usize,
}

impl Dimensions {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self { cols: 80, rows: 24 }
    }
}

/// Scrolling region bounds, 0-indexed and inclusive on all four sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRegion {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl ScrollRegion {
    /// Region covering the whole screen
    pub fn full(dims: Dimensions) -> Self {
        Self {
            top: 0,
            bottom: dims.rows - 1,
            left: 0,
            right: dims.cols - 1,
        }
    }

    /// Whether the horizontal margins span the full width
    pub fn is_full_width(&self, cols: usize) -> bool {
        self.left == 0 && self.right == cols.saturating_sub(1)
    }

    pub fn contains_row(&self, row: usize) -> bool {
        row >= self.top && row <= self.bottom
    }

    pub fn contains_col(&self, col: usize) -> bool {
        col >= self.left && col <= self.right
    }
}
