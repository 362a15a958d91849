//! Terminal grid - the visible screen area
//!
//! The grid is a 2D array of cells. Scroll and line editing operate on a
//! [`ScrollRegion`]: when the region spans the full width, lines are
//! rotated wholesale; with left/right margins only the column span moves.
//! Like the line operations, everything here is structural - the screen
//! handles style reference counts around these calls.

use serde::{Deserialize, Serialize};

use crate::core::line::Line;
use crate::core::{Dimensions, ScrollRegion};

/// The terminal grid (visible screen area)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    lines: Vec<Line>,
    cols: usize,
    rows: usize,
}

impl Grid {
    pub fn new(dims: Dimensions) -> Self {
        Self {
            lines: (0..dims.rows).map(|_| Line::new(dims.cols)).collect(),
            cols: dims.cols,
            rows: dims.rows,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            cols: self.cols,
            rows: self.rows,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn line(&self, row: usize) -> &Line {
        &self.lines[row]
    }

    pub fn line_mut(&mut self, row: usize) -> &mut Line {
        &mut self.lines[row]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Line> {
        self.lines.iter_mut()
    }

    /// Blank every cell
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            *line = Line::new(self.cols);
        }
    }

    /// Scroll the region up by `n` full lines, returning the lines that
    /// scrolled out of the top. Only valid for full-width regions.
    pub fn scroll_up_lines(&mut self, top: usize, bottom: usize, n: usize) -> Vec<Line> {
        let n = n.min(bottom - top + 1);
        let mut scrolled_out = Vec::with_capacity(n);
        for _ in 0..n {
            scrolled_out.push(self.lines.remove(top));
            self.lines.insert(bottom, Line::new(self.cols));
        }
        scrolled_out
    }

    /// Scroll the region's column span up by `n`; the vacated bottom rows
    /// of the span are blanked. Destroyed content must have been released
    /// by the caller.
    pub fn scroll_up_region(&mut self, region: ScrollRegion, n: usize) {
        let height = region.bottom - region.top + 1;
        let n = n.min(height);
        for row in region.top..region.top + (height - n) {
            let src = self.lines[row + n].clone();
            self.lines[row].copy_span(&src, region.left, region.right);
        }
        for row in region.bottom + 1 - n..=region.bottom {
            self.lines[row].blank_span(region.left, region.right);
        }
    }

    /// Scroll the region's column span down by `n`; the vacated top rows
    /// of the span are blanked.
    pub fn scroll_down_region(&mut self, region: ScrollRegion, n: usize) {
        let n = n.min(region.bottom - region.top + 1);
        for row in (region.top + n..=region.bottom).rev() {
            let src = self.lines[row - n].clone();
            self.lines[row].copy_span(&src, region.left, region.right);
        }
        for row in region.top..region.top + n {
            self.lines[row].blank_span(region.left, region.right);
        }
    }

    /// Resize to new dimensions; new cells are blank, truncated content
    /// must have been released by the caller.
    pub fn resize(&mut self, dims: Dimensions) {
        for line in &mut self.lines {
            line.resize(dims.cols);
        }
        if dims.rows > self.rows {
            for _ in self.rows..dims.rows {
                self.lines.push(Line::new(dims.cols));
            }
        } else {
            self.lines.truncate(dims.rows);
        }
        self.cols = dims.cols;
        self.rows = dims.rows;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_rows(grid: &mut Grid) {
        for row in 0..grid.rows() {
            grid.line_mut(row).cell_mut(0).ch = (b'A' + row as u8) as char;
        }
    }

    #[test]
    fn test_grid_new() {
        let grid = Grid::new(Dimensions::new(80, 24));
        assert_eq!(grid.cols(), 80);
        assert_eq!(grid.rows(), 24);
    }

    #[test]
    fn test_scroll_up_lines() {
        let mut grid = Grid::new(Dimensions::new(10, 5));
        fill_rows(&mut grid);

        let scrolled = grid.scroll_up_lines(0, 4, 2);
        assert_eq!(scrolled.len(), 2);
        assert_eq!(scrolled[0].text(), "A");
        assert_eq!(scrolled[1].text(), "B");
        assert_eq!(grid.line(0).text(), "C");
        assert_eq!(grid.line(2).text(), "E");
        assert!(grid.line(3).is_blank());
        assert!(grid.line(4).is_blank());
    }

    #[test]
    fn test_scroll_up_lines_partial_region() {
        let mut grid = Grid::new(Dimensions::new(10, 5));
        fill_rows(&mut grid);

        grid.scroll_up_lines(1, 3, 1);
        assert_eq!(grid.line(0).text(), "A");
        assert_eq!(grid.line(1).text(), "C");
        assert_eq!(grid.line(2).text(), "D");
        assert!(grid.line(3).is_blank());
        assert_eq!(grid.line(4).text(), "E");
    }

    #[test]
    fn test_scroll_down_region_full_width() {
        let mut grid = Grid::new(Dimensions::new(10, 5));
        fill_rows(&mut grid);

        let region = ScrollRegion {
            top: 0,
            bottom: 4,
            left: 0,
            right: 9,
        };
        grid.scroll_down_region(region, 2);
        assert!(grid.line(0).is_blank());
        assert!(grid.line(1).is_blank());
        assert_eq!(grid.line(2).text(), "A");
        assert_eq!(grid.line(4).text(), "C");
    }

    #[test]
    fn test_scroll_up_region_margins() {
        let mut grid = Grid::new(Dimensions::new(6, 3));
        for row in 0..3 {
            for col in 0..6 {
                grid.line_mut(row).cell_mut(col).ch = (b'a' + row as u8) as char;
            }
        }

        // Only columns 1-4 participate.
        let region = ScrollRegion {
            top: 0,
            bottom: 2,
            left: 1,
            right: 4,
        };
        grid.scroll_up_region(region, 1);
        assert_eq!(grid.line(0).text(), "abbbba");
        assert_eq!(grid.line(1).text(), "bccccb");
        assert_eq!(grid.line(2).text(), "c    c");
    }

    #[test]
    fn test_resize() {
        let mut grid = Grid::new(Dimensions::new(10, 5));
        grid.line_mut(0).cell_mut(0).ch = 'A';

        grid.resize(Dimensions::new(20, 10));
        assert_eq!(grid.cols(), 20);
        assert_eq!(grid.rows(), 10);
        assert_eq!(grid.line(0).text(), "A");

        grid.resize(Dimensions::new(5, 2));
        assert_eq!(grid.cols(), 5);
        assert_eq!(grid.rows(), 2);
    }
}
