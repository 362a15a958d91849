//! Terminal state
//!
//! Owns the screen, mode registry, palette, kitty keyboard stack, and
//! the miscellaneous flags escape sequences mutate. Operations here read
//! whatever modes they depend on and forward to the screen with explicit
//! behavior parameters, so the screen itself stays mode-agnostic.

use serde::{Deserialize, Serialize};

use crate::action::{MouseShape, StatusDisplay};
use crate::core::{
    Charset, CharsetBank, CharsetSlot, ColorPalette, Cursor, CursorShape, Dimensions,
    KittyKeyboardStack, Line, Mode, ModeRegistry, ProtectedMode, Rgb, Screen, ScrollRegion,
    SemanticTag, Style, EraseDisplayPart, PALETTE_SIZE,
};
use crate::error::Result;

/// Mouse event reporting granularity (modes 9/1000/1002/1003)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseEvents {
    #[default]
    None,
    X10,
    Normal,
    Button,
    Any,
}

/// Mouse coordinate encoding (modes 1005/1006/1015/1016)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseFormat {
    #[default]
    X10,
    Utf8,
    Sgr,
    Urxvt,
    SgrPixels,
}

/// Whether shift-click bypasses mouse capture (XTSHIFTESCAPE).
/// `Unset` survives only until the first request either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseShiftCapture {
    #[default]
    Unset,
    Enabled,
    Disabled,
}

/// Miscellaneous flags mutated by escape sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TerminalFlags {
    pub mouse_shift_capture: MouseShiftCapture,
    pub mouse_event: MouseEvents,
    pub mouse_format: MouseFormat,
    /// XTMODKEYS modifyOtherKeys state 2
    pub modify_other_keys_2: bool,
    /// Recorded from the OSC 133 prompt-start redraw option
    pub shell_redraws_prompt: bool,
}

/// Which alternate-screen flavor a mode switch uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltScreenKind {
    /// Mode 47
    Legacy,
    /// Mode 1047
    Plain,
    /// Mode 1049
    SaveCursorClearEnter,
}

/// Complete terminal state
#[derive(Debug, Clone, PartialEq)]
pub struct Terminal {
    screen: Screen,
    pub modes: ModeRegistry,
    pub color_palette: ColorPalette,
    pub default_palette: [Rgb; PALETTE_SIZE],
    pub kitty_keyboard: KittyKeyboardStack,
    pub flags: TerminalFlags,
    pub status_display: StatusDisplay,
    pub mouse_shape: MouseShape,
}

impl Terminal {
    pub fn new(cols: usize, rows: usize) -> Self {
        let palette = ColorPalette::default();
        let default_palette = palette.colors;
        Self {
            screen: Screen::new(Dimensions::new(cols, rows)),
            modes: ModeRegistry::new(),
            color_palette: palette,
            default_palette,
            kitty_keyboard: KittyKeyboardStack::new(),
            flags: TerminalFlags::default(),
            status_display: StatusDisplay::Main,
            mouse_shape: MouseShape::Default,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn cols(&self) -> usize {
        self.screen.cols()
    }

    pub fn rows(&self) -> usize {
        self.screen.rows()
    }

    pub fn cursor(&self) -> &Cursor {
        self.screen.cursor()
    }

    pub fn scrolling_region(&self) -> ScrollRegion {
        self.screen.region()
    }

    pub fn line(&self, row: usize) -> &Line {
        self.screen.line(row)
    }

    /// Visible text, for tests and diagnostics
    pub fn to_text(&self) -> String {
        self.screen.to_text()
    }

    fn origin(&self) -> bool {
        self.modes.get(Mode::Origin)
    }

    fn wraparound(&self) -> bool {
        self.modes.get(Mode::Wraparound)
    }

    fn insert(&self) -> bool {
        self.modes.get(Mode::Insert)
    }

    // --- Printing ---

    pub fn print(&mut self, c: char) -> Result<()> {
        self.screen.print(c, self.wraparound(), self.insert())
    }

    pub fn print_repeat(&mut self, count: usize) -> Result<()> {
        self.screen
            .print_repeat(count, self.wraparound(), self.insert())
    }

    // --- C0 and indexing ---

    pub fn backspace(&mut self) {
        self.screen.backspace();
    }

    pub fn carriage_return(&mut self) {
        self.screen.carriage_return();
    }

    pub fn linefeed(&mut self) -> Result<()> {
        self.screen.linefeed(self.modes.get(Mode::Linefeed))
    }

    pub fn index(&mut self) -> Result<()> {
        self.screen.linefeed(false)
    }

    pub fn reverse_index(&mut self) -> Result<()> {
        self.screen.reverse_index()
    }

    pub fn next_line(&mut self) -> Result<()> {
        self.index()?;
        self.carriage_return();
        Ok(())
    }

    // --- Cursor ---

    pub fn cursor_up(&mut self, n: usize) {
        self.screen.cursor_up(n.max(1));
    }

    pub fn cursor_down(&mut self, n: usize) {
        self.screen.cursor_down(n.max(1));
    }

    pub fn cursor_left(&mut self, n: usize) {
        self.screen.cursor_left(n.max(1));
    }

    pub fn cursor_right(&mut self, n: usize) {
        self.screen.cursor_right(n.max(1));
    }

    pub fn set_cursor_pos(&mut self, row: usize, col: usize) {
        self.screen.set_cursor_pos(row, col, self.origin());
    }

    pub fn cursor_col(&mut self, col: usize) {
        self.screen.cursor_col(col, self.origin());
    }

    pub fn cursor_row(&mut self, row: usize) {
        self.screen.cursor_row(row, self.origin());
    }

    pub fn cursor_col_relative(&mut self, n: usize) {
        self.screen.cursor_right(n.max(1));
    }

    pub fn cursor_row_relative(&mut self, n: usize) {
        self.screen.cursor_down(n.max(1));
    }

    pub fn set_cursor_shape(&mut self, shape: CursorShape) {
        self.screen.set_cursor_shape(shape);
    }

    pub fn save_cursor(&mut self) {
        self.screen.save_cursor(self.origin());
    }

    pub fn restore_cursor(&mut self) -> Result<()> {
        let origin = self.screen.restore_cursor()?;
        self.modes.set(Mode::Origin, origin);
        Ok(())
    }

    // --- Erase ---

    pub fn erase_display_below(&mut self, selective: bool) -> Result<()> {
        self.screen.erase_display(EraseDisplayPart::Below, selective)
    }

    pub fn erase_display_above(&mut self, selective: bool) -> Result<()> {
        self.screen.erase_display(EraseDisplayPart::Above, selective)
    }

    pub fn erase_display_complete(&mut self, selective: bool) -> Result<()> {
        self.screen
            .erase_display(EraseDisplayPart::Complete, selective)
    }

    pub fn erase_scrollback(&mut self) {
        self.screen.erase_scrollback();
    }

    pub fn erase_scroll_complete(&mut self) -> Result<()> {
        self.screen.erase_scroll_complete()
    }

    pub fn erase_line_right(&mut self, selective: bool) -> Result<()> {
        self.screen.erase_line_right(selective)
    }

    pub fn erase_line_left(&mut self, selective: bool) -> Result<()> {
        self.screen.erase_line_left(selective)
    }

    pub fn erase_line_complete(&mut self, selective: bool) -> Result<()> {
        self.screen.erase_line_complete(selective)
    }

    // --- Editing ---

    pub fn delete_chars(&mut self, n: usize) -> Result<()> {
        self.screen.delete_chars(n)
    }

    pub fn erase_chars(&mut self, n: usize) -> Result<()> {
        self.screen.erase_chars(n)
    }

    pub fn insert_blanks(&mut self, n: usize) -> Result<()> {
        self.screen.insert_blanks(n)
    }

    pub fn insert_lines(&mut self, n: usize) -> Result<()> {
        self.screen.insert_lines(n)
    }

    pub fn delete_lines(&mut self, n: usize) -> Result<()> {
        self.screen.delete_lines(n)
    }

    pub fn scroll_up(&mut self, n: usize) -> Result<()> {
        self.screen.scroll_up(n)
    }

    pub fn scroll_down(&mut self, n: usize) -> Result<()> {
        self.screen.scroll_down(n)
    }

    // --- Tabs ---

    pub fn horizontal_tab(&mut self) {
        self.screen.horizontal_tab();
    }

    pub fn horizontal_tab_back(&mut self) {
        self.screen.horizontal_tab_back();
    }

    pub fn tab_set(&mut self) {
        self.screen.tab_set();
    }

    pub fn tab_clear_current(&mut self) {
        self.screen.tab_clear_current();
    }

    pub fn tab_clear_all(&mut self) {
        self.screen.tab_clear_all();
    }

    pub fn tab_reset(&mut self) {
        self.screen.tab_reset();
    }

    // --- Margins ---

    pub fn set_top_and_bottom_margin(&mut self, top: usize, bottom: usize) {
        self.screen
            .set_top_and_bottom_margin(top, bottom, self.origin());
    }

    pub fn set_left_and_right_margin(&mut self, left: usize, right: usize) {
        self.screen
            .set_left_and_right_margin(left, right, self.origin());
    }

    /// Snap the horizontal margins back to the full width without
    /// moving the cursor (used when left/right margin mode turns off)
    pub fn reset_horizontal_margins(&mut self) {
        self.screen.reset_horizontal_margins();
    }

    // --- Styles, charsets, protection ---

    pub fn set_style(&mut self, style: Style) -> Result<()> {
        self.screen.set_style(style)
    }

    pub fn set_protected_mode(&mut self, mode: ProtectedMode) {
        self.screen.set_protected_mode(mode);
    }

    pub fn invoke_charset(&mut self, bank: CharsetBank, slot: CharsetSlot, locking: bool) {
        self.screen.invoke_charset(bank, slot, locking);
    }

    pub fn configure_charset(&mut self, slot: CharsetSlot, set: Charset) {
        self.screen.configure_charset(slot, set);
    }

    // --- Semantic prompts and hyperlinks ---

    pub fn mark_semantic_prompt(&mut self, tag: SemanticTag) {
        self.screen.mark_semantic(tag);
    }

    pub fn start_hyperlink(&mut self, uri: &str, id: Option<&str>) {
        self.screen.start_hyperlink(uri, id);
    }

    pub fn end_hyperlink(&mut self) {
        self.screen.end_hyperlink();
    }

    // --- Screen switching and reset ---

    /// DECALN screen alignment test
    pub fn decaln(&mut self) {
        self.screen.decaln();
    }

    pub fn switch_screen_mode(&mut self, kind: AltScreenKind, enabled: bool) -> Result<()> {
        match (kind, enabled) {
            (AltScreenKind::Legacy, true) => self.screen.enter_alternate(false),
            (AltScreenKind::Legacy, false) => self.screen.exit_alternate(false),
            (AltScreenKind::Plain, true) => self.screen.enter_alternate(false),
            (AltScreenKind::Plain, false) => self.screen.exit_alternate(true),
            (AltScreenKind::SaveCursorClearEnter, true) => {
                self.save_cursor();
                self.screen.enter_alternate(true);
            }
            (AltScreenKind::SaveCursorClearEnter, false) => {
                self.screen.exit_alternate(false);
                self.restore_cursor()?;
            }
        }
        Ok(())
    }

    /// DECCOLM: switch between 80 and 132 columns. Gated on mode 40;
    /// when it takes effect the screen is cleared, margins reset, and
    /// the cursor homes.
    pub fn deccolm(&mut self, cols: usize) -> Result<()> {
        if !self.modes.get(Mode::EnableMode3) {
            return Ok(());
        }
        let rows = self.rows();
        self.screen.resize(Dimensions::new(cols, rows))?;
        self.screen.erase_display(EraseDisplayPart::Complete, false)?;
        self.screen.set_cursor_pos(1, 1, false);
        Ok(())
    }

    /// Resize the visible screen, clamping the cursor and resetting the
    /// scrolling region.
    pub fn resize(&mut self, cols: usize, rows: usize) -> Result<()> {
        self.screen.resize(Dimensions::new(cols, rows))
    }

    /// RIS: full reset to the initial state
    pub fn full_reset(&mut self) {
        let dims = Dimensions::new(self.cols(), self.rows());
        self.screen = Screen::new(dims);
        self.modes.reset();
        self.kitty_keyboard.reset();
        self.flags = TerminalFlags::default();
        self.color_palette = ColorPalette::new(self.default_palette);
        self.status_display = StatusDisplay::Main;
        self.mouse_shape = MouseShape::Default;
    }
}
