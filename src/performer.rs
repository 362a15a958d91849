//! Action performer
//!
//! The readonly dispatcher: applies parsed actions to a terminal without
//! ever producing a response back to the host program. Actions that
//! would require a reply (device attributes, status reports, queries)
//! are accepted and dropped so a stream containing them keeps parsing.
//!
//! The performer is a pure function of the action and the current
//! terminal state; it owns no state of its own beyond the borrow.

use log::{debug, trace};

use crate::action::{
    Action, Attribute, ColorRequest, ColorTarget, CursorStyleRequest, EraseDisplayMode,
    EraseLineMode, ProtectedModeKind, TabClearScope,
};
use crate::core::{
    CursorShape, Mode, ProtectedMode, SemanticTag, Style, StyleColor, UnderlineStyle,
};
use crate::error::Result;
use crate::terminal::{AltScreenKind, MouseEvents, MouseFormat, MouseShiftCapture, Terminal};

/// Applies actions to a terminal
pub struct Performer<'a> {
    term: &'a mut Terminal,
}

impl<'a> Performer<'a> {
    pub fn new(term: &'a mut Terminal) -> Self {
        Performer { term }
    }

    /// Perform a single action. Errors surface only from allocator-backed
    /// operations; everything else is infallible or silently ignored.
    pub fn perform(&mut self, action: Action) -> Result<()> {
        match action {
            // Printing
            Action::Print(c) => self.term.print(c)?,
            Action::PrintRepeat(count) => self.term.print_repeat(count as usize)?,

            // C0 controls
            Action::Backspace => self.term.backspace(),
            Action::CarriageReturn => self.term.carriage_return(),
            Action::Linefeed => self.term.linefeed()?,
            Action::Index => self.term.index()?,
            Action::ReverseIndex => self.term.reverse_index()?,
            Action::NextLine => self.term.next_line()?,

            // Cursor motion
            Action::CursorUp(n) => self.term.cursor_up(n as usize),
            Action::CursorDown(n) => self.term.cursor_down(n as usize),
            Action::CursorLeft(n) => self.term.cursor_left(n as usize),
            Action::CursorRight(n) => self.term.cursor_right(n as usize),
            Action::CursorPos { row, col } => {
                self.term.set_cursor_pos(row as usize, col as usize)
            }
            Action::CursorCol(col) => self.term.cursor_col(col as usize),
            Action::CursorRow(row) => self.term.cursor_row(row as usize),
            Action::CursorColRelative(n) => self.term.cursor_col_relative(n as usize),
            Action::CursorRowRelative(n) => self.term.cursor_row_relative(n as usize),
            Action::CursorStyle(style) => self.set_cursor_style(style),

            // Erase
            Action::EraseDisplay { mode, selective } => self.erase_display(mode, selective)?,
            Action::EraseLine { mode, selective } => self.erase_line(mode, selective)?,

            // Editing
            Action::DeleteChars(n) => self.term.delete_chars(n.max(1) as usize)?,
            Action::EraseChars(n) => self.term.erase_chars(n.max(1) as usize)?,
            Action::InsertLines(n) => self.term.insert_lines(n.max(1) as usize)?,
            Action::InsertBlanks(n) => self.term.insert_blanks(n.max(1) as usize)?,
            Action::DeleteLines(n) => self.term.delete_lines(n.max(1) as usize)?,
            Action::ScrollUp(n) => self.term.scroll_up(n.max(1) as usize)?,
            Action::ScrollDown(n) => self.term.scroll_down(n.max(1) as usize)?,

            // Tabs
            Action::HorizontalTab(count) => self.horizontal_tab(count.max(1), false),
            Action::HorizontalTabBack(count) => self.horizontal_tab(count.max(1), true),
            Action::TabSet => self.term.tab_set(),
            Action::TabClear(TabClearScope::Current) => self.term.tab_clear_current(),
            Action::TabClear(TabClearScope::All) => self.term.tab_clear_all(),
            Action::TabReset => self.term.tab_reset(),

            // Modes
            Action::SetMode(mode) => self.set_mode(mode, true)?,
            Action::ResetMode(mode) => self.set_mode(mode, false)?,
            Action::SaveMode(mode) => self.term.modes.save(mode),
            Action::RestoreMode(mode) => {
                // The bit is written before side effects run, so handlers
                // observe the restored value.
                if let Some(value) = self.term.modes.restore(mode) {
                    self.set_mode(mode, value)?;
                }
            }
            Action::RequestMode(_) => {}

            // Margins
            Action::TopAndBottomMargin { top, bottom } => self
                .term
                .set_top_and_bottom_margin(top.max(1) as usize, bottom as usize),
            Action::LeftAndRightMargin { left, right } => self
                .term
                .set_left_and_right_margin(left as usize, right as usize),
            Action::LeftAndRightMarginAmbiguous => {
                // Bare `CSI s` means DECSLRM-to-full-width when margin
                // mode is on, save-cursor otherwise.
                if self.term.modes.get(Mode::EnableLeftAndRightMargin) {
                    self.term.set_left_and_right_margin(0, 0);
                } else {
                    self.term.save_cursor();
                }
            }

            // Cursor save/restore
            Action::SaveCursor => self.term.save_cursor(),
            Action::RestoreCursor => self.term.restore_cursor()?,

            // Charsets
            Action::InvokeCharset {
                bank,
                slot,
                locking,
            } => self.term.invoke_charset(bank, slot, locking),
            Action::ConfigureCharset { slot, set } => self.term.configure_charset(slot, set),

            // SGR
            Action::SetAttribute(attr) => self.set_attribute(attr),

            // Protection
            Action::SetProtectedMode(kind) => self.term.set_protected_mode(match kind {
                ProtectedModeKind::Off => ProtectedMode::Off,
                ProtectedModeKind::Iso => ProtectedMode::Iso,
                ProtectedModeKind::Dec => ProtectedMode::Dec,
            }),

            // Mouse
            Action::MouseShiftCapture(enabled) => {
                self.term.flags.mouse_shift_capture = if enabled {
                    MouseShiftCapture::Enabled
                } else {
                    MouseShiftCapture::Disabled
                };
            }
            Action::MouseShape(shape) => self.term.mouse_shape = shape,

            // Kitty keyboard
            Action::KittyKeyboardPush(flags) => self.term.kitty_keyboard.push(flags),
            Action::KittyKeyboardPop(n) => self.term.kitty_keyboard.pop(n.max(1) as usize),
            Action::KittyKeyboardSet { op, flags } => self.term.kitty_keyboard.set(op, flags),
            Action::KittyKeyboardQuery => {}

            // Key format
            Action::ModifyKeyFormat(format) => {
                self.term.flags.modify_other_keys_2 = false;
                if format == crate::action::ModifyKeyFormat::OtherKeysNumeric {
                    self.term.flags.modify_other_keys_2 = true;
                }
            }

            // Status display
            Action::ActiveStatusDisplay(display) => self.term.status_display = display,

            // Screen
            Action::Decaln => self.term.decaln(),
            Action::FullReset => self.term.full_reset(),

            // Hyperlinks
            Action::StartHyperlink { uri, id } => {
                self.term.start_hyperlink(&uri, id.as_deref())
            }
            Action::EndHyperlink => self.term.end_hyperlink(),

            // Semantic prompts
            Action::PromptStart { redraw } => {
                self.term.mark_semantic_prompt(SemanticTag::Prompt);
                self.term.flags.shell_redraws_prompt = redraw;
            }
            Action::PromptContinuation => {
                self.term
                    .mark_semantic_prompt(SemanticTag::PromptContinuation);
            }
            Action::PromptEnd => self.term.mark_semantic_prompt(SemanticTag::Input),
            Action::EndOfInput => self.term.mark_semantic_prompt(SemanticTag::Command),
            Action::EndOfCommand => self.term.mark_semantic_prompt(SemanticTag::Input),

            // OSC color operations
            Action::ColorOperation { kind: _, requests } => self.color_operation(&requests),

            // DCS/APC payloads are consumed without interpretation
            Action::DcsHook | Action::DcsUnhook | Action::ApcStart | Action::ApcEnd => {
                trace!("string payload boundary ignored");
            }
            Action::DcsPut(_) | Action::ApcPut(_) => {}

            // Response-requiring actions never error and never reply
            Action::Bell => trace!("bell"),
            Action::Enquiry
            | Action::SizeReportRequest
            | Action::XtVersion
            | Action::DeviceAttributes(_)
            | Action::DeviceStatus(_)
            | Action::KittyColorReport
            | Action::WindowTitle
            | Action::ReportPwd(_)
            | Action::ShowDesktopNotification { .. }
            | Action::ProgressReport
            | Action::ClipboardContents { .. }
            | Action::TitlePush
            | Action::TitlePop => {
                trace!("response-requiring action ignored");
            }
        }
        Ok(())
    }

    /// Iterate tab motions, stopping early once the cursor stops moving
    fn horizontal_tab(&mut self, count: u16, back: bool) {
        for _ in 0..count {
            let before = self.term.cursor().col;
            if back {
                self.term.horizontal_tab_back();
            } else {
                self.term.horizontal_tab();
            }
            if self.term.cursor().col == before {
                break;
            }
        }
    }

    fn erase_display(&mut self, mode: EraseDisplayMode, selective: bool) -> Result<()> {
        // ISO protection guards cells against plain erases too.
        let selective =
            selective || self.term.screen().protected_mode() == ProtectedMode::Iso;
        match mode {
            EraseDisplayMode::Below => self.term.erase_display_below(selective),
            EraseDisplayMode::Above => self.term.erase_display_above(selective),
            EraseDisplayMode::Complete => self.term.erase_display_complete(selective),
            EraseDisplayMode::Scrollback => {
                self.term.erase_scrollback();
                Ok(())
            }
            EraseDisplayMode::ScrollComplete => self.term.erase_scroll_complete(),
        }
    }

    fn erase_line(&mut self, mode: EraseLineMode, selective: bool) -> Result<()> {
        let selective =
            selective || self.term.screen().protected_mode() == ProtectedMode::Iso;
        match mode {
            EraseLineMode::Right => self.term.erase_line_right(selective),
            EraseLineMode::Left => self.term.erase_line_left(selective),
            EraseLineMode::Complete => self.term.erase_line_complete(selective),
            EraseLineMode::RightUnlessPendingWrap => {
                if self.term.cursor().pending_wrap {
                    Ok(())
                } else {
                    self.term.erase_line_right(selective)
                }
            }
        }
    }

    fn set_cursor_style(&mut self, style: CursorStyleRequest) {
        let (shape, blinking) = match style {
            CursorStyleRequest::Default => (CursorShape::Block, false),
            CursorStyleRequest::BlinkingBlock => (CursorShape::Block, true),
            CursorStyleRequest::SteadyBlock => (CursorShape::Block, false),
            CursorStyleRequest::BlinkingUnderline => (CursorShape::Underline, true),
            CursorStyleRequest::SteadyUnderline => (CursorShape::Underline, false),
            CursorStyleRequest::BlinkingBar => (CursorShape::Bar, true),
            CursorStyleRequest::SteadyBar => (CursorShape::Bar, false),
        };
        self.term.set_cursor_shape(shape);
        self.term.modes.set(Mode::CursorBlinking, blinking);
    }

    /// Write the mode bit, then run its side effects. Handlers read the
    /// new value; `restore_mode` depends on this ordering.
    fn set_mode(&mut self, mode: Mode, enabled: bool) -> Result<()> {
        self.term.modes.set(mode, enabled);

        match mode {
            Mode::Origin => self.term.set_cursor_pos(1, 1),
            Mode::EnableLeftAndRightMargin => {
                if !enabled {
                    self.term.reset_horizontal_margins();
                }
            }
            Mode::AltScreenLegacy => {
                self.term.switch_screen_mode(AltScreenKind::Legacy, enabled)?;
            }
            Mode::AltScreen => {
                self.term.switch_screen_mode(AltScreenKind::Plain, enabled)?;
            }
            Mode::AltScreenSaveCursorClearEnter => {
                self.term
                    .switch_screen_mode(AltScreenKind::SaveCursorClearEnter, enabled)?;
            }
            Mode::SaveCursor => {
                if enabled {
                    self.term.save_cursor();
                } else {
                    self.term.restore_cursor()?;
                }
            }
            Mode::Column132 => {
                self.term.deccolm(if enabled { 132 } else { 80 })?;
            }
            Mode::MouseEventX10 => self.set_mouse_event(MouseEvents::X10, enabled),
            Mode::MouseEventNormal => self.set_mouse_event(MouseEvents::Normal, enabled),
            Mode::MouseEventButton => self.set_mouse_event(MouseEvents::Button, enabled),
            Mode::MouseEventAny => self.set_mouse_event(MouseEvents::Any, enabled),
            Mode::MouseFormatUtf8 => self.set_mouse_format(MouseFormat::Utf8, enabled),
            Mode::MouseFormatSgr => self.set_mouse_format(MouseFormat::Sgr, enabled),
            Mode::MouseFormatUrxvt => self.set_mouse_format(MouseFormat::Urxvt, enabled),
            Mode::MouseFormatSgrPixels => {
                self.set_mouse_format(MouseFormat::SgrPixels, enabled)
            }
            _ => {}
        }
        Ok(())
    }

    fn set_mouse_event(&mut self, events: MouseEvents, enabled: bool) {
        self.term.flags.mouse_event = if enabled { events } else { MouseEvents::None };
    }

    fn set_mouse_format(&mut self, format: MouseFormat, enabled: bool) {
        self.term.flags.mouse_format = if enabled { format } else { MouseFormat::X10 };
    }

    /// Apply a single SGR attribute to the cursor's working style.
    /// Application errors are swallowed: the attribute is dropped and
    /// the stream continues.
    fn set_attribute(&mut self, attr: Attribute) {
        let mut style = self.term.cursor().style;
        match attr {
            Attribute::Unset => style = Style::default(),
            Attribute::Bold => style.flags.bold = true,
            Attribute::Faint => style.flags.faint = true,
            Attribute::NormalIntensity => {
                style.flags.bold = false;
                style.flags.faint = false;
            }
            Attribute::Italic => style.flags.italic = true,
            Attribute::ResetItalic => style.flags.italic = false,
            Attribute::Underline(underline) => style.flags.underline = underline,
            Attribute::ResetUnderline => style.flags.underline = UnderlineStyle::None,
            Attribute::UnderlineColor(color) => style.underline_color = color,
            Attribute::ResetUnderlineColor => style.underline_color = StyleColor::None,
            Attribute::Blink => style.flags.blink = true,
            Attribute::ResetBlink => style.flags.blink = false,
            Attribute::Inverse => style.flags.inverse = true,
            Attribute::ResetInverse => style.flags.inverse = false,
            Attribute::Invisible => style.flags.invisible = true,
            Attribute::ResetInvisible => style.flags.invisible = false,
            Attribute::Strikethrough => style.flags.strikethrough = true,
            Attribute::ResetStrikethrough => style.flags.strikethrough = false,
            Attribute::Overline => style.flags.overline = true,
            Attribute::ResetOverline => style.flags.overline = false,
            Attribute::Foreground(color) => style.fg_color = color,
            Attribute::ResetForeground => style.fg_color = StyleColor::None,
            Attribute::Background(color) => style.bg_color = color,
            Attribute::ResetBackground => style.bg_color = StyleColor::None,
            Attribute::Unknown(param) => {
                trace!("unknown SGR parameter {param} ignored");
                return;
            }
        }
        if let Err(err) = self.term.set_style(style) {
            debug!("SGR attribute dropped: {err}");
        }
    }

    /// Apply OSC color requests. Only palette targets mutate state here;
    /// dynamic and special targets belong to the host layer, and queries
    /// would require a response.
    fn color_operation(&mut self, requests: &[ColorRequest]) {
        if requests.is_empty() {
            return;
        }
        for request in requests {
            match *request {
                ColorRequest::Set { target, color } => {
                    if let ColorTarget::Palette(index) = target {
                        self.term.color_palette.set(index, color);
                    }
                }
                ColorRequest::Reset(target) => {
                    if let ColorTarget::Palette(index) = target {
                        let defaults = self.term.default_palette;
                        self.term.color_palette.reset(index, &defaults);
                    }
                }
                ColorRequest::ResetPalette => {
                    let defaults = self.term.default_palette;
                    self.term.color_palette.reset_all(&defaults);
                }
                ColorRequest::Query(_) | ColorRequest::ResetSpecial => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ColorOperationKind, MouseShape};
    use crate::core::Rgb;

    fn term() -> Terminal {
        Terminal::new(20, 10)
    }

    fn perform(term: &mut Terminal, actions: &[Action]) {
        let mut performer = Performer::new(term);
        for action in actions {
            performer.perform(action.clone()).unwrap();
        }
    }

    #[test]
    fn test_print_and_motion() {
        let mut term = term();
        perform(
            &mut term,
            &[
                Action::Print('h'),
                Action::Print('i'),
                Action::CursorPos { row: 1, col: 1 },
            ],
        );
        assert_eq!(term.to_text(), "hi");
        assert_eq!(term.cursor().col, 0);
        assert_eq!(term.cursor().row, 0);
    }

    #[test]
    fn test_ambiguous_csi_s_saves_cursor_by_default() {
        let mut term = term();
        perform(
            &mut term,
            &[
                Action::CursorPos { row: 3, col: 4 },
                Action::LeftAndRightMarginAmbiguous,
                Action::CursorPos { row: 1, col: 1 },
                Action::RestoreCursor,
            ],
        );
        assert_eq!(term.cursor().row, 2);
        assert_eq!(term.cursor().col, 3);
    }

    #[test]
    fn test_ambiguous_csi_s_sets_margins_when_enabled() {
        let mut term = term();
        perform(
            &mut term,
            &[
                Action::SetMode(Mode::EnableLeftAndRightMargin),
                Action::LeftAndRightMargin { left: 3, right: 8 },
                Action::LeftAndRightMarginAmbiguous,
            ],
        );
        assert_eq!(term.scrolling_region().left, 0);
        assert_eq!(term.scrolling_region().right, 19);
    }

    #[test]
    fn test_disabling_margin_mode_resets_margins() {
        let mut term = term();
        perform(
            &mut term,
            &[
                Action::SetMode(Mode::EnableLeftAndRightMargin),
                Action::LeftAndRightMargin { left: 3, right: 8 },
                Action::ResetMode(Mode::EnableLeftAndRightMargin),
            ],
        );
        assert_eq!(term.scrolling_region().left, 0);
        assert_eq!(term.scrolling_region().right, 19);
    }

    #[test]
    fn test_mode_save_restore_runs_side_effects() {
        let mut term = term();
        perform(
            &mut term,
            &[
                Action::SetMode(Mode::MouseEventNormal),
                Action::SaveMode(Mode::MouseEventNormal),
                Action::ResetMode(Mode::MouseEventNormal),
            ],
        );
        assert_eq!(term.flags.mouse_event, MouseEvents::None);

        perform(&mut term, &[Action::RestoreMode(Mode::MouseEventNormal)]);
        assert!(term.modes.get(Mode::MouseEventNormal));
        assert_eq!(term.flags.mouse_event, MouseEvents::Normal);
    }

    #[test]
    fn test_sgr_unknown_is_ignored() {
        let mut term = term();
        perform(
            &mut term,
            &[
                Action::SetAttribute(Attribute::Bold),
                Action::SetAttribute(Attribute::Unknown(99)),
            ],
        );
        assert!(term.cursor().style.flags.bold);
    }

    #[test]
    fn test_cursor_style_sets_shape_and_blink() {
        let mut term = term();
        perform(
            &mut term,
            &[Action::CursorStyle(CursorStyleRequest::BlinkingUnderline)],
        );
        assert_eq!(term.cursor().shape, CursorShape::Underline);
        assert!(term.modes.get(Mode::CursorBlinking));

        perform(&mut term, &[Action::CursorStyle(CursorStyleRequest::Default)]);
        assert_eq!(term.cursor().shape, CursorShape::Block);
        assert!(!term.modes.get(Mode::CursorBlinking));
    }

    #[test]
    fn test_color_operation_palette() {
        let mut term = term();
        perform(
            &mut term,
            &[Action::ColorOperation {
                kind: ColorOperationKind::Palette,
                requests: vec![ColorRequest::Set {
                    target: ColorTarget::Palette(1),
                    color: Rgb::new(1, 2, 3),
                }],
            }],
        );
        assert_eq!(term.color_palette.colors[1], Rgb::new(1, 2, 3));
        assert!(term.color_palette.mask.contains(1));

        perform(
            &mut term,
            &[Action::ColorOperation {
                kind: ColorOperationKind::Reset,
                requests: vec![ColorRequest::ResetPalette],
            }],
        );
        assert!(!term.color_palette.mask.contains(1));
        assert_eq!(term.color_palette.colors[1], term.default_palette[1]);
    }

    #[test]
    fn test_modify_key_format() {
        let mut term = term();
        perform(
            &mut term,
            &[Action::ModifyKeyFormat(
                crate::action::ModifyKeyFormat::OtherKeysNumeric,
            )],
        );
        assert!(term.flags.modify_other_keys_2);

        perform(
            &mut term,
            &[Action::ModifyKeyFormat(crate::action::ModifyKeyFormat::Legacy)],
        );
        assert!(!term.flags.modify_other_keys_2);
    }

    #[test]
    fn test_mouse_shape_and_shift_capture() {
        let mut term = term();
        assert_eq!(term.flags.mouse_shift_capture, MouseShiftCapture::Unset);
        perform(
            &mut term,
            &[
                Action::MouseShape(MouseShape::Pointer),
                Action::MouseShiftCapture(true),
            ],
        );
        assert_eq!(term.mouse_shape, MouseShape::Pointer);
        assert_eq!(term.flags.mouse_shift_capture, MouseShiftCapture::Enabled);
    }

    #[test]
    fn test_semantic_prompt_tags() {
        let mut term = term();
        perform(&mut term, &[Action::PromptStart { redraw: true }]);
        assert_eq!(term.line(0).semantic, SemanticTag::Prompt);
        assert!(term.flags.shell_redraws_prompt);

        perform(&mut term, &[Action::PromptEnd]);
        assert_eq!(term.line(0).semantic, SemanticTag::Input);
    }

    #[test]
    fn test_noop_actions_leave_state_unchanged() {
        let mut term = term();
        perform(&mut term, &[Action::Print('x')]);
        let snapshot = term.clone();

        perform(
            &mut term,
            &[
                Action::Bell,
                Action::Enquiry,
                Action::SizeReportRequest,
                Action::XtVersion,
                Action::DeviceAttributes(crate::action::DeviceAttributeReq::Primary),
                Action::DeviceStatus(crate::action::DeviceStatusReq::CursorPosition),
                Action::KittyKeyboardQuery,
                Action::KittyColorReport,
                Action::WindowTitle,
                Action::ReportPwd("file:///tmp".into()),
                Action::ShowDesktopNotification {
                    title: "t".into(),
                    body: "b".into(),
                },
                Action::ProgressReport,
                Action::ClipboardContents {
                    clipboard: 'c',
                    data: "Zm9v".into(),
                },
                Action::TitlePush,
                Action::TitlePop,
                Action::DcsHook,
                Action::DcsPut(b'x'),
                Action::DcsUnhook,
                Action::ApcStart,
                Action::ApcPut(b'y'),
                Action::ApcEnd,
                Action::RequestMode(Mode::Wraparound),
            ],
        );
        assert_eq!(term, snapshot);
    }
}
