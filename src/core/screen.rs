//! Terminal screen state
//!
//! The screen ties together the grids (primary and alternate), cursor,
//! tab stops, scrolling region, charset state, and the style set. Every
//! operation that destroys or creates cells goes through here so style
//! reference counts stay balanced: a cell's style is released before the
//! cell is overwritten, and blank fill produced by erase/scroll takes a
//! background-only style interned on demand.

use unicode_width::UnicodeWidthChar;

use crate::core::cell::Cell;
use crate::core::charset::{Charset, CharsetBank, CharsetSlot, CharsetState};
use crate::core::cursor::{Cursor, SavedCursor};
use crate::core::grid::Grid;
use crate::core::line::{Line, SemanticTag};
use crate::core::scrollback::Scrollback;
use crate::core::style::Style;
use crate::core::style_set::{StyleSet, DEFAULT_STYLE_ID};
use crate::core::{Dimensions, ScrollRegion};
use crate::error::{Error, Result};

/// Style slots available per screen; sized to exceed any single page's
/// cell count
pub const DEFAULT_STYLE_CAPACITY: usize = 16_384;

/// Tab stop interval (default)
const DEFAULT_TAB_WIDTH: usize = 8;

/// Protected-mode flavor in effect for newly printed cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtectedMode {
    #[default]
    Off,
    /// SPA/EPA (ISO 6429)
    Iso,
    /// DECSCA
    Dec,
}

/// How an erase-display request selects its range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseDisplayPart {
    Below,
    Above,
    Complete,
}

#[derive(Debug, Clone, PartialEq)]
struct TabStops {
    stops: Vec<bool>,
}

impl TabStops {
    fn new(cols: usize) -> Self {
        let mut tabs = Self {
            stops: vec![false; cols],
        };
        tabs.reset();
        tabs
    }

    fn reset(&mut self) {
        for (col, stop) in self.stops.iter_mut().enumerate() {
            *stop = col % DEFAULT_TAB_WIDTH == 0;
        }
    }

    fn set(&mut self, col: usize) {
        if let Some(stop) = self.stops.get_mut(col) {
            *stop = true;
        }
    }

    fn clear(&mut self, col: usize) {
        if let Some(stop) = self.stops.get_mut(col) {
            *stop = false;
        }
    }

    fn clear_all(&mut self) {
        self.stops.iter_mut().for_each(|stop| *stop = false);
    }

    fn next_after(&self, col: usize) -> Option<usize> {
        (col + 1..self.stops.len()).find(|&c| self.stops[c])
    }

    fn prev_before(&self, col: usize) -> Option<usize> {
        (0..col).rev().find(|&c| self.stops[c])
    }
}

#[derive(Debug, Clone, PartialEq)]
struct HyperlinkEntry {
    uri: String,
    id: Option<String>,
}

/// The complete per-terminal screen state
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    primary_grid: Grid,
    alternate_grid: Grid,
    using_alternate: bool,
    scrollback: Scrollback,
    styles: StyleSet,
    cursor: Cursor,
    saved_cursor_primary: Option<SavedCursor>,
    saved_cursor_alternate: Option<SavedCursor>,
    region: ScrollRegion,
    tabs: TabStops,
    charset: CharsetState,
    protected_mode: ProtectedMode,
    hyperlinks: Vec<HyperlinkEntry>,
    last_printed: Option<char>,
}

impl Screen {
    pub fn new(dims: Dimensions) -> Self {
        Self {
            primary_grid: Grid::new(dims),
            alternate_grid: Grid::new(dims),
            using_alternate: false,
            scrollback: Scrollback::default(),
            styles: StyleSet::with_capacity(DEFAULT_STYLE_CAPACITY),
            cursor: Cursor::new(),
            saved_cursor_primary: None,
            saved_cursor_alternate: None,
            region: ScrollRegion::full(dims),
            tabs: TabStops::new(dims.cols),
            charset: CharsetState::new(),
            protected_mode: ProtectedMode::Off,
            hyperlinks: Vec::new(),
            last_printed: None,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.primary_grid.dimensions()
    }

    pub fn cols(&self) -> usize {
        self.primary_grid.cols()
    }

    pub fn rows(&self) -> usize {
        self.primary_grid.rows()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn region(&self) -> ScrollRegion {
        self.region
    }

    pub fn styles(&self) -> &StyleSet {
        &self.styles
    }

    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    pub fn using_alternate(&self) -> bool {
        self.using_alternate
    }

    pub fn protected_mode(&self) -> ProtectedMode {
        self.protected_mode
    }

    pub fn charset(&self) -> &CharsetState {
        &self.charset
    }

    pub fn line(&self, row: usize) -> &Line {
        self.grid().line(row)
    }

    /// Visible text with trailing blanks per line and trailing blank
    /// lines trimmed
    pub fn to_text(&self) -> String {
        let mut lines: Vec<String> = self.grid().iter().map(Line::text).collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    fn grid(&self) -> &Grid {
        if self.using_alternate {
            &self.alternate_grid
        } else {
            &self.primary_grid
        }
    }

    fn grid_mut(&mut self) -> &mut Grid {
        if self.using_alternate {
            &mut self.alternate_grid
        } else {
            &mut self.primary_grid
        }
    }

    fn parts(&mut self) -> (&mut Grid, &mut StyleSet) {
        let grid = if self.using_alternate {
            &mut self.alternate_grid
        } else {
            &mut self.primary_grid
        };
        (grid, &mut self.styles)
    }

    /// The background-only style erased and scrolled-in cells take
    fn blank_style(&self) -> Style {
        Style {
            bg_color: self.cursor.style.bg_color,
            ..Style::default()
        }
    }

    fn release_line(&mut self, line: &Line) {
        for cell in line.iter() {
            self.styles.release(cell.style);
        }
    }

    /// Release the styles of every cell in the row span, inclusive
    fn release_span(&mut self, rows: (usize, usize), cols: (usize, usize)) {
        let (grid, styles) = self.parts();
        for row in rows.0..=rows.1 {
            let line = grid.line(row);
            for col in cols.0..=cols.1 {
                styles.release(line.cell(col).style);
            }
        }
    }

    /// Stamp freshly blanked cells in the span with the background style
    fn stamp_blank_span(&mut self, rows: (usize, usize), cols: (usize, usize)) -> Result<()> {
        let blank = self.blank_style();
        if blank.is_default() {
            return Ok(());
        }
        let (grid, styles) = self.parts();
        for row in rows.0..=rows.1 {
            let line = grid.line_mut(row);
            for col in cols.0..=cols.1 {
                line.cell_mut(col).style = styles.add(&blank)?;
            }
        }
        Ok(())
    }

    // --- Printing ---

    pub fn print(&mut self, c: char, wraparound: bool, insert: bool) -> Result<()> {
        let c = self.charset.translate(c);
        self.charset.clear_single_shift();

        let width = UnicodeWidthChar::width(c).unwrap_or(1).min(2);
        if width == 0 {
            // Combining marks are not stored as standalone cells.
            return Ok(());
        }
        self.last_printed = Some(c);

        if self.cursor.pending_wrap && wraparound {
            self.wrap_line()?;
        }

        let mut right_limit = self.right_limit();
        if width == 2 && self.cursor.col + 1 > right_limit {
            // A wide character does not fit before the margin.
            if wraparound {
                self.wrap_line()?;
                right_limit = self.right_limit();
            } else if self.cursor.col > 0 {
                self.cursor.col -= 1;
            }
        }

        if insert {
            let row = self.cursor.row;
            let col = self.cursor.col;
            let n = width.min(right_limit - col + 1);
            self.release_span((row, row), (right_limit + 1 - n, right_limit));
            self.grid_mut().line_mut(row).insert_cells(col, n, right_limit);
        }

        let row = self.cursor.row;
        let col = self.cursor.col;
        self.write_cell(row, col, c, width as u8)?;
        if width == 2 && col + 1 <= right_limit {
            self.write_continuation(row, col + 1)?;
        }

        let new_col = col + width;
        if new_col > right_limit {
            self.cursor.col = right_limit;
            if wraparound {
                self.cursor.pending_wrap = true;
            }
        } else {
            self.cursor.col = new_col;
        }
        Ok(())
    }

    /// Repeat the last printed character `count` times (REP). A count of
    /// zero repeats once.
    pub fn print_repeat(&mut self, count: usize, wraparound: bool, insert: bool) -> Result<()> {
        let Some(c) = self.last_printed else {
            return Ok(());
        };
        for _ in 0..count.max(1) {
            self.print(c, wraparound, insert)?;
        }
        Ok(())
    }

    /// Release and clear the target cell, fixing up a wide-character pair
    /// if the write lands on either half of one.
    fn clear_for_write(&mut self, row: usize, col: usize) {
        let (grid, styles) = self.parts();
        let line = grid.line_mut(row);

        if line.cell(col).is_continuation() && col > 0 {
            let lead = line.cell_mut(col - 1);
            styles.release(lead.style);
            *lead = Cell::default();
        } else if line.cell(col).width == 2 && col + 1 < line.cols() {
            let cont = line.cell_mut(col + 1);
            styles.release(cont.style);
            *cont = Cell::default();
        }

        let cell = line.cell_mut(col);
        styles.release(cell.style);
        *cell = Cell::default();
    }

    fn write_cell(&mut self, row: usize, col: usize, c: char, width: u8) -> Result<()> {
        self.clear_for_write(row, col);
        self.styles.retain(self.cursor.style_id);
        let cursor = self.cursor.clone();
        let cell = self.grid_mut().line_mut(row).cell_mut(col);
        *cell = Cell {
            ch: c,
            width,
            style: cursor.style_id,
            protected: cursor.protected,
            hyperlink: cursor.hyperlink,
        };
        Ok(())
    }

    fn write_continuation(&mut self, row: usize, col: usize) -> Result<()> {
        self.clear_for_write(row, col);
        self.styles.retain(self.cursor.style_id);
        let style_id = self.cursor.style_id;
        let hyperlink = self.cursor.hyperlink;
        let cell = self.grid_mut().line_mut(row).cell_mut(col);
        *cell = Cell {
            ch: ' ',
            width: 0,
            style: style_id,
            protected: false,
            hyperlink,
        };
        Ok(())
    }

    fn wrap_line(&mut self) -> Result<()> {
        self.cursor.pending_wrap = false;
        let row = self.cursor.row;
        self.grid_mut().line_mut(row).wrapped = true;
        self.cursor.col = self.region.left;
        if self.cursor.row == self.region.bottom {
            self.scroll_up(1)?;
        } else if self.cursor.row < self.rows() - 1 {
            self.cursor.row += 1;
        }
        Ok(())
    }

    fn right_limit(&self) -> usize {
        if self.cursor.col <= self.region.right {
            self.region.right
        } else {
            self.cols() - 1
        }
    }

    fn left_limit(&self) -> usize {
        if self.cursor.col >= self.region.left {
            self.region.left
        } else {
            0
        }
    }

    // --- C0 controls ---

    pub fn backspace(&mut self) {
        let limit = self.left_limit();
        if self.cursor.col > limit {
            self.cursor.col -= 1;
        }
        self.cursor.pending_wrap = false;
    }

    pub fn carriage_return(&mut self) {
        self.cursor.col = self.left_limit();
        self.cursor.pending_wrap = false;
    }

    pub fn linefeed(&mut self, carriage_return: bool) -> Result<()> {
        if self.cursor.row == self.region.bottom {
            self.scroll_up(1)?;
        } else if self.cursor.row < self.rows() - 1 {
            self.cursor.row += 1;
        }
        self.cursor.pending_wrap = false;
        if carriage_return {
            self.carriage_return();
        }
        Ok(())
    }

    pub fn reverse_index(&mut self) -> Result<()> {
        if self.cursor.row == self.region.top {
            self.scroll_down(1)?;
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
        }
        self.cursor.pending_wrap = false;
        Ok(())
    }

    // --- Cursor motion ---

    pub fn cursor_up(&mut self, n: usize) {
        let min_row = if self.cursor.row >= self.region.top {
            self.region.top
        } else {
            0
        };
        self.cursor.row = self.cursor.row.saturating_sub(n).max(min_row);
        self.cursor.pending_wrap = false;
    }

    pub fn cursor_down(&mut self, n: usize) {
        let max_row = if self.cursor.row <= self.region.bottom {
            self.region.bottom
        } else {
            self.rows() - 1
        };
        self.cursor.row = self.cursor.row.saturating_add(n).min(max_row);
        self.cursor.pending_wrap = false;
    }

    pub fn cursor_left(&mut self, n: usize) {
        let min_col = self.left_limit();
        self.cursor.col = self.cursor.col.saturating_sub(n).max(min_col);
        self.cursor.pending_wrap = false;
    }

    pub fn cursor_right(&mut self, n: usize) {
        let max_col = self.right_limit();
        self.cursor.col = self.cursor.col.saturating_add(n).min(max_col);
        self.cursor.pending_wrap = false;
    }

    /// Absolute cursor positioning with 1-based coordinates, clamped.
    /// With origin mode the coordinates are relative to the scroll region.
    pub fn set_cursor_pos(&mut self, row: usize, col: usize, origin: bool) {
        let row = row.max(1) - 1;
        let col = col.max(1) - 1;
        if origin {
            self.cursor.row = (self.region.top + row).min(self.region.bottom);
            self.cursor.col = (self.region.left + col).min(self.region.right);
        } else {
            self.cursor.row = row.min(self.rows() - 1);
            self.cursor.col = col.min(self.cols() - 1);
        }
        self.cursor.pending_wrap = false;
    }

    /// CHA/HPA: absolute column, keeping the current row
    pub fn cursor_col(&mut self, col: usize, origin: bool) {
        let col = col.max(1) - 1;
        self.cursor.col = if origin {
            (self.region.left + col).min(self.region.right)
        } else {
            col.min(self.cols() - 1)
        };
        self.cursor.pending_wrap = false;
    }

    /// VPA: absolute row, keeping the current column
    pub fn cursor_row(&mut self, row: usize, origin: bool) {
        let row = row.max(1) - 1;
        self.cursor.row = if origin {
            (self.region.top + row).min(self.region.bottom)
        } else {
            row.min(self.rows() - 1)
        };
        self.cursor.pending_wrap = false;
    }

    // --- Erase ---

    pub fn erase_display(&mut self, part: EraseDisplayPart, selective: bool) -> Result<()> {
        let last_row = self.rows() - 1;
        let last_col = self.cols() - 1;
        let (row, col) = (self.cursor.row, self.cursor.col);
        match part {
            EraseDisplayPart::Below => {
                self.erase_row_span(row, col, last_col, selective)?;
                for r in row + 1..=last_row {
                    self.erase_row_span(r, 0, last_col, selective)?;
                }
            }
            EraseDisplayPart::Above => {
                for r in 0..row {
                    self.erase_row_span(r, 0, last_col, selective)?;
                }
                self.erase_row_span(row, 0, col, selective)?;
            }
            EraseDisplayPart::Complete => {
                for r in 0..=last_row {
                    self.erase_row_span(r, 0, last_col, selective)?;
                }
            }
        }
        Ok(())
    }

    /// Erase the scrollback history
    pub fn erase_scrollback(&mut self) {
        for line in self.scrollback.take_all() {
            self.release_line(&line);
        }
    }

    /// Scroll the visible screen into the scrollback, then clear it
    pub fn erase_scroll_complete(&mut self) -> Result<()> {
        let rows = self.rows();
        let cols = self.cols();
        if self.using_alternate {
            return self.erase_display(EraseDisplayPart::Complete, false);
        }
        for row in 0..rows {
            let line = std::mem::replace(self.primary_grid.line_mut(row), Line::new(cols));
            if let Some(evicted) = self.scrollback.push(line) {
                self.release_line(&evicted);
            }
        }
        Ok(())
    }

    pub fn erase_line_right(&mut self, selective: bool) -> Result<()> {
        let (row, col) = (self.cursor.row, self.cursor.col);
        let last = self.cols() - 1;
        self.erase_row_span(row, col, last, selective)
    }

    pub fn erase_line_left(&mut self, selective: bool) -> Result<()> {
        let (row, col) = (self.cursor.row, self.cursor.col);
        self.erase_row_span(row, 0, col, selective)
    }

    pub fn erase_line_complete(&mut self, selective: bool) -> Result<()> {
        let row = self.cursor.row;
        let last = self.cols() - 1;
        self.erase_row_span(row, 0, last, selective)
    }

    fn erase_row_span(&mut self, row: usize, start: usize, end: usize, selective: bool) -> Result<()> {
        let blank = self.blank_style();
        let (grid, styles) = self.parts();
        let line = grid.line_mut(row);
        for col in start..=end {
            let cell = line.cell_mut(col);
            if selective && cell.protected {
                continue;
            }
            styles.release(cell.style);
            cell.erase(DEFAULT_STYLE_ID);
            if !blank.is_default() {
                cell.style = styles.add(&blank)?;
            }
        }
        Ok(())
    }

    // --- Line and character editing ---

    pub fn delete_chars(&mut self, n: usize) -> Result<()> {
        if !self.region.contains_col(self.cursor.col) {
            return Ok(());
        }
        let (row, col) = (self.cursor.row, self.cursor.col);
        let right = self.region.right;
        let n = n.max(1).min(right - col + 1);
        self.release_span((row, row), (col, col + n - 1));
        self.grid_mut().line_mut(row).delete_cells(col, n, right);
        self.stamp_blank_span((row, row), (right + 1 - n, right))?;
        self.cursor.pending_wrap = false;
        Ok(())
    }

    pub fn insert_blanks(&mut self, n: usize) -> Result<()> {
        if !self.region.contains_col(self.cursor.col) {
            return Ok(());
        }
        let (row, col) = (self.cursor.row, self.cursor.col);
        let right = self.region.right;
        let n = n.max(1).min(right - col + 1);
        self.release_span((row, row), (right + 1 - n, right));
        self.grid_mut().line_mut(row).insert_cells(col, n, right);
        self.stamp_blank_span((row, row), (col, col + n - 1))?;
        self.cursor.pending_wrap = false;
        Ok(())
    }

    pub fn erase_chars(&mut self, n: usize) -> Result<()> {
        let (row, col) = (self.cursor.row, self.cursor.col);
        let end = (col + n.max(1) - 1).min(self.cols() - 1);
        // ECH honors cell protection regardless of the erase flavor.
        self.erase_row_span(row, col, end, true)?;
        self.cursor.pending_wrap = false;
        Ok(())
    }

    pub fn insert_lines(&mut self, n: usize) -> Result<()> {
        if !self.region.contains_row(self.cursor.row) || !self.region.contains_col(self.cursor.col) {
            return Ok(());
        }
        let row = self.cursor.row;
        let region = self.region;
        let n = n.max(1).min(region.bottom - row + 1);
        self.release_span((region.bottom + 1 - n, region.bottom), (region.left, region.right));
        let sub = ScrollRegion {
            top: row,
            ..region
        };
        self.grid_mut().scroll_down_region(sub, n);
        self.stamp_blank_span((row, row + n - 1), (region.left, region.right))?;
        self.cursor.col = region.left;
        self.cursor.pending_wrap = false;
        Ok(())
    }

    pub fn delete_lines(&mut self, n: usize) -> Result<()> {
        if !self.region.contains_row(self.cursor.row) || !self.region.contains_col(self.cursor.col) {
            return Ok(());
        }
        let row = self.cursor.row;
        let region = self.region;
        let n = n.max(1).min(region.bottom - row + 1);
        self.release_span((row, row + n - 1), (region.left, region.right));
        let sub = ScrollRegion {
            top: row,
            ..region
        };
        self.grid_mut().scroll_up_region(sub, n);
        self.stamp_blank_span((region.bottom + 1 - n, region.bottom), (region.left, region.right))?;
        self.cursor.col = region.left;
        self.cursor.pending_wrap = false;
        Ok(())
    }

    // --- Scrolling ---

    pub fn scroll_up(&mut self, n: usize) -> Result<()> {
        let region = self.region;
        let cols = self.cols();
        let n = n.max(1).min(region.bottom - region.top + 1);

        if region.is_full_width(cols) && region.top == 0 && !self.using_alternate {
            let removed = self
                .primary_grid
                .scroll_up_lines(region.top, region.bottom, n);
            for line in removed {
                if let Some(evicted) = self.scrollback.push(line) {
                    self.release_line(&evicted);
                }
            }
        } else {
            self.release_span((region.top, region.top + n - 1), (region.left, region.right));
            self.grid_mut().scroll_up_region(region, n);
        }
        self.stamp_blank_span((region.bottom + 1 - n, region.bottom), (region.left, region.right))
    }

    pub fn scroll_down(&mut self, n: usize) -> Result<()> {
        let region = self.region;
        let n = n.max(1).min(region.bottom - region.top + 1);
        self.release_span((region.bottom + 1 - n, region.bottom), (region.left, region.right));
        self.grid_mut().scroll_down_region(region, n);
        self.stamp_blank_span((region.top, region.top + n - 1), (region.left, region.right))
    }

    // --- Tabs ---

    pub fn horizontal_tab(&mut self) {
        let limit = self.right_limit();
        self.cursor.col = match self.tabs.next_after(self.cursor.col) {
            Some(stop) => stop.min(limit),
            None => limit,
        };
        self.cursor.pending_wrap = false;
    }

    pub fn horizontal_tab_back(&mut self) {
        let limit = self.left_limit();
        self.cursor.col = match self.tabs.prev_before(self.cursor.col) {
            Some(stop) => stop.max(limit),
            None => limit,
        };
        self.cursor.pending_wrap = false;
    }

    pub fn tab_set(&mut self) {
        self.tabs.set(self.cursor.col);
    }

    pub fn tab_clear_current(&mut self) {
        self.tabs.clear(self.cursor.col);
    }

    pub fn tab_clear_all(&mut self) {
        self.tabs.clear_all();
    }

    pub fn tab_reset(&mut self) {
        self.tabs.reset();
    }

    // --- Margins ---

    /// DECSTBM with 1-based bounds; `bottom == 0` selects the last row.
    /// Invalid bounds are ignored. The cursor homes afterwards.
    pub fn set_top_and_bottom_margin(&mut self, top: usize, bottom: usize, origin: bool) {
        let rows = self.rows();
        let top = top.max(1);
        let bottom = if bottom == 0 { rows } else { bottom.min(rows) };
        if top >= bottom {
            return;
        }
        self.region.top = top - 1;
        self.region.bottom = bottom - 1;
        self.set_cursor_pos(1, 1, origin);
    }

    /// DECSLRM with 1-based bounds; `(0, 0)` resets to the full width
    pub fn set_left_and_right_margin(&mut self, left: usize, right: usize, origin: bool) {
        let cols = self.cols();
        if left == 0 && right == 0 {
            self.region.left = 0;
            self.region.right = cols - 1;
            self.set_cursor_pos(1, 1, origin);
            return;
        }
        let left = left.max(1);
        let right = if right == 0 { cols } else { right.min(cols) };
        if left >= right {
            return;
        }
        self.region.left = left - 1;
        self.region.right = right - 1;
        self.set_cursor_pos(1, 1, origin);
    }

    pub fn reset_margins(&mut self) {
        self.region = ScrollRegion::full(self.dimensions());
    }

    /// Widen the horizontal margins to the full screen, leaving the
    /// vertical margins and the cursor alone
    pub fn reset_horizontal_margins(&mut self) {
        self.region.left = 0;
        self.region.right = self.cols() - 1;
    }

    // --- Cursor save/restore ---

    pub fn save_cursor(&mut self, origin: bool) {
        let saved = SavedCursor {
            col: self.cursor.col,
            row: self.cursor.row,
            style: self.cursor.style,
            charset: self.charset,
            origin,
            pending_wrap: self.cursor.pending_wrap,
            protected: self.cursor.protected,
        };
        if self.using_alternate {
            self.saved_cursor_alternate = Some(saved);
        } else {
            self.saved_cursor_primary = Some(saved);
        }
    }

    /// DECRC. Returns the origin-mode value to re-apply. Without a prior
    /// save this resets the cursor to its defaults.
    pub fn restore_cursor(&mut self) -> Result<bool> {
        let saved = if self.using_alternate {
            self.saved_cursor_alternate.clone()
        } else {
            self.saved_cursor_primary.clone()
        };
        match saved {
            Some(saved) => {
                self.cursor.col = saved.col.min(self.cols() - 1);
                self.cursor.row = saved.row.min(self.rows() - 1);
                self.cursor.pending_wrap = saved.pending_wrap;
                self.cursor.protected = saved.protected;
                self.charset = saved.charset;
                self.set_style(saved.style)?;
                Ok(saved.origin)
            }
            None => {
                self.cursor.col = 0;
                self.cursor.row = 0;
                self.cursor.pending_wrap = false;
                self.cursor.protected = false;
                self.charset.reset();
                self.set_style(Style::default())?;
                Ok(false)
            }
        }
    }

    // --- Styles and attributes ---

    /// Replace the cursor's working style, re-interning its id
    pub fn set_style(&mut self, style: Style) -> Result<()> {
        let new_id = self.styles.add(&style)?;
        let old = self.cursor.style_id;
        self.cursor.style = style;
        self.cursor.style_id = new_id;
        self.styles.release(old);
        Ok(())
    }

    pub fn set_protected_mode(&mut self, mode: ProtectedMode) {
        self.protected_mode = mode;
        self.cursor.protected = mode != ProtectedMode::Off;
    }

    pub fn set_cursor_shape(&mut self, shape: crate::core::cursor::CursorShape) {
        self.cursor.shape = shape;
    }

    // --- Charsets ---

    pub fn configure_charset(&mut self, slot: CharsetSlot, set: Charset) {
        self.charset.configure(slot, set);
    }

    pub fn invoke_charset(&mut self, bank: CharsetBank, slot: CharsetSlot, locking: bool) {
        self.charset.invoke(bank, slot, locking);
    }

    // --- Semantic prompts ---

    pub fn mark_semantic(&mut self, tag: SemanticTag) {
        let row = self.cursor.row;
        self.grid_mut().line_mut(row).semantic = tag;
    }

    // --- Hyperlinks ---

    pub fn start_hyperlink(&mut self, uri: &str, id: Option<&str>) {
        if uri.is_empty() {
            self.end_hyperlink();
            return;
        }
        let position = self
            .hyperlinks
            .iter()
            .position(|entry| entry.uri == uri && entry.id.as_deref() == id);
        let index = match position {
            Some(index) => index,
            None => {
                self.hyperlinks.push(HyperlinkEntry {
                    uri: uri.to_string(),
                    id: id.map(str::to_string),
                });
                self.hyperlinks.len() - 1
            }
        };
        self.cursor.hyperlink = index as u32 + 1;
    }

    pub fn end_hyperlink(&mut self) {
        self.cursor.hyperlink = 0;
    }

    pub fn hyperlink_uri(&self, id: u32) -> Option<&str> {
        if id == 0 {
            return None;
        }
        self.hyperlinks
            .get(id as usize - 1)
            .map(|entry| entry.uri.as_str())
    }

    // --- Screen-level operations ---

    /// DECALN: fill the visible screen with 'E', reset margins, home
    pub fn decaln(&mut self) {
        let dims = self.dimensions();
        let (grid, styles) = self.parts();
        for line in grid.iter_mut() {
            for cell in line.iter_mut() {
                styles.release(cell.style);
                *cell = Cell {
                    ch: 'E',
                    ..Cell::default()
                };
            }
            line.wrapped = false;
            line.semantic = SemanticTag::None;
        }
        self.region = ScrollRegion::full(dims);
        self.cursor.col = 0;
        self.cursor.row = 0;
        self.cursor.pending_wrap = false;
    }

    /// Switch to the alternate screen, optionally clearing it first
    pub fn enter_alternate(&mut self, clear: bool) {
        if !self.using_alternate {
            self.using_alternate = true;
        }
        if clear {
            self.clear_alternate_grid();
            self.cursor.col = 0;
            self.cursor.row = 0;
            self.cursor.pending_wrap = false;
        }
    }

    /// Switch back to the primary screen
    pub fn exit_alternate(&mut self, clear: bool) {
        if !self.using_alternate {
            return;
        }
        if clear {
            self.clear_alternate_grid();
        }
        self.using_alternate = false;
        self.cursor.col = self.cursor.col.min(self.cols() - 1);
        self.cursor.row = self.cursor.row.min(self.rows() - 1);
    }

    fn clear_alternate_grid(&mut self) {
        for line in self.alternate_grid.iter() {
            for cell in line.iter() {
                self.styles.release(cell.style);
            }
        }
        self.alternate_grid.clear();
    }

    /// Resize both grids, releasing truncated content. Margins reset to
    /// the full new screen and the cursor is clamped.
    pub fn resize(&mut self, dims: Dimensions) -> Result<()> {
        if dims.cols == 0 || dims.rows == 0 {
            return Err(Error::AllocFailure("zero-sized screen"));
        }
        let old = self.dimensions();

        for alternate in [false, true] {
            let grid = if alternate {
                &mut self.alternate_grid
            } else {
                &mut self.primary_grid
            };
            for row in 0..old.rows {
                let start = if row >= dims.rows { 0 } else { dims.cols };
                let line = grid.line(row);
                for col in start..old.cols {
                    self.styles.release(line.cell(col).style);
                }
            }
            grid.resize(dims);
        }

        self.tabs = TabStops::new(dims.cols);
        self.region = ScrollRegion::full(dims);
        self.cursor.col = self.cursor.col.min(dims.cols - 1);
        self.cursor.row = self.cursor.row.min(dims.rows - 1);
        self.cursor.pending_wrap = false;
        Ok(())
    }
}
