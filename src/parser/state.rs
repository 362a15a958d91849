//! Parser state machine
//!
//! Based on the VT500 series parser model (vt100.net/emu/dec_ansi_parser):
//! C0 controls execute from almost every state, CSI collects parameters
//! and intermediates before dispatch, and the string states (OSC, DCS,
//! APC, PM, SOS) buffer until ST or BEL. Syntactic dispatch hands off to
//! [`decode`](super::decode) which produces semantic actions.

use crate::action::Action;
use crate::parser::decode;
use crate::parser::params::Params;
use crate::parser::utf8::{Utf8Decoder, Utf8Result, REPLACEMENT_CHAR};

/// Maximum buffered length for OSC data
const MAX_OSC_LEN: usize = 65_536;
/// Maximum number of intermediate bytes
const MAX_INTERMEDIATES: usize = 4;

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Ground,
    Escape,
    EscapeIntermediate,
    CsiEntry,
    CsiParam,
    CsiIntermediate,
    CsiIgnore,
    OscString,
    DcsEntry,
    DcsParam,
    DcsPassthrough,
    DcsIgnore,
    ApcString,
    PmString,
    SosString,
}

/// A collected CSI sequence before semantic decoding
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CsiSequence {
    pub params: Params,
    pub intermediates: Vec<u8>,
    /// Leading marker byte (`?`, `>`, `<`, `=`) or 0
    pub marker: u8,
    pub final_byte: u8,
}

/// The terminal escape sequence parser
#[derive(Debug, Clone)]
pub struct Parser {
    state: ParserState,
    utf8: Utf8Decoder,
    params_buf: Vec<u8>,
    intermediates: Vec<u8>,
    marker: u8,
    string_data: Vec<u8>,
    esc_intermediates: Vec<u8>,
    /// Whether a DCS hook action was emitted for the current string
    dcs_hooked: bool,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Ground,
            utf8: Utf8Decoder::new(),
            params_buf: Vec::with_capacity(64),
            intermediates: Vec::with_capacity(MAX_INTERMEDIATES),
            marker: 0,
            string_data: Vec::with_capacity(256),
            esc_intermediates: Vec::with_capacity(MAX_INTERMEDIATES),
            dcs_hooked: false,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Reset to ground, dropping any partial sequence
    pub fn reset(&mut self) {
        self.state = ParserState::Ground;
        self.utf8.reset();
        self.params_buf.clear();
        self.intermediates.clear();
        self.marker = 0;
        self.string_data.clear();
        self.esc_intermediates.clear();
        self.dcs_hooked = false;
    }

    /// Parse a chunk, calling the callback for each action
    pub fn feed_with<F>(&mut self, data: &[u8], mut callback: F)
    where
        F: FnMut(Action),
    {
        for &byte in data {
            self.advance(byte, &mut callback);
        }
    }

    /// Parse a chunk and collect the actions
    pub fn feed(&mut self, data: &[u8]) -> Vec<Action> {
        let mut actions = Vec::new();
        self.feed_with(data, |action| actions.push(action));
        actions
    }

    fn advance(&mut self, byte: u8, sink: &mut dyn FnMut(Action)) {
        // String states consume nearly everything until a terminator.
        match self.state {
            ParserState::OscString
            | ParserState::DcsPassthrough
            | ParserState::DcsIgnore
            | ParserState::ApcString
            | ParserState::PmString
            | ParserState::SosString => {
                match byte {
                    0x1B => self.finish_string(sink, true),
                    0x07 => {
                        // BEL terminates OSC (xterm extension).
                        if self.state == ParserState::OscString {
                            self.finish_string(sink, false);
                        } else {
                            self.put_string_byte(byte, sink);
                        }
                    }
                    0x9C => self.finish_string(sink, false),
                    0x18 | 0x1A => {
                        self.abort_string(sink);
                    }
                    _ => self.put_string_byte(byte, sink),
                }
                return;
            }
            _ => {}
        }

        // C0 controls execute in every non-string state.
        if byte < 0x20 {
            match byte {
                0x1B => {
                    self.state = ParserState::Escape;
                    self.esc_intermediates.clear();
                }
                0x18 | 0x1A => self.state = ParserState::Ground,
                _ => decode::c0_action(byte, sink),
            }
            return;
        }

        // 8-bit C1 controls, unless we're inside a UTF-8 sequence.
        if (0x80..=0x9F).contains(&byte) && !self.utf8.is_pending() {
            match byte {
                0x90 => self.enter_dcs(),
                0x9B => self.enter_csi(),
                0x9D => self.enter_string(ParserState::OscString, sink),
                0x9E => self.enter_string(ParserState::PmString, sink),
                0x9F => self.enter_string(ParserState::ApcString, sink),
                _ => {}
            }
            return;
        }

        match self.state {
            ParserState::Ground => self.ground(byte, sink),
            ParserState::Escape => self.escape(byte, sink),
            ParserState::EscapeIntermediate => self.escape_intermediate(byte, sink),
            ParserState::CsiEntry => self.csi_entry(byte, sink),
            ParserState::CsiParam => self.csi_param(byte, sink),
            ParserState::CsiIntermediate => self.csi_intermediate(byte, sink),
            ParserState::CsiIgnore => {
                if (0x40..=0x7E).contains(&byte) {
                    self.state = ParserState::Ground;
                }
            }
            ParserState::DcsEntry | ParserState::DcsParam => self.dcs_collect(byte, sink),
            _ => {}
        }
    }

    fn ground(&mut self, byte: u8, sink: &mut dyn FnMut(Action)) {
        if (0x20..0x7F).contains(&byte) {
            sink(Action::Print(byte as char));
        } else if byte >= 0x80 {
            match self.utf8.feed(byte) {
                Utf8Result::Char(c) => sink(Action::Print(c)),
                Utf8Result::Invalid => sink(Action::Print(REPLACEMENT_CHAR)),
                Utf8Result::Pending => {}
            }
        }
    }

    fn escape(&mut self, byte: u8, sink: &mut dyn FnMut(Action)) {
        match byte {
            b'[' => self.enter_csi(),
            b']' => self.enter_string(ParserState::OscString, sink),
            b'P' => self.enter_dcs(),
            b'_' => self.enter_string(ParserState::ApcString, sink),
            b'^' => self.enter_string(ParserState::PmString, sink),
            b'X' => self.enter_string(ParserState::SosString, sink),
            b'\\' => self.state = ParserState::Ground,
            0x20..=0x2F => {
                self.esc_intermediates.push(byte);
                self.state = ParserState::EscapeIntermediate;
            }
            0x30..=0x7E => {
                decode::esc_actions(&[], byte, sink);
                self.state = ParserState::Ground;
            }
            _ => self.state = ParserState::Ground,
        }
    }

    fn escape_intermediate(&mut self, byte: u8, sink: &mut dyn FnMut(Action)) {
        match byte {
            0x20..=0x2F => {
                if self.esc_intermediates.len() < MAX_INTERMEDIATES {
                    self.esc_intermediates.push(byte);
                }
            }
            0x30..=0x7E => {
                let intermediates = std::mem::take(&mut self.esc_intermediates);
                decode::esc_actions(&intermediates, byte, sink);
                self.state = ParserState::Ground;
            }
            _ => self.state = ParserState::Ground,
        }
    }

    fn enter_csi(&mut self) {
        self.state = ParserState::CsiEntry;
        self.params_buf.clear();
        self.intermediates.clear();
        self.marker = 0;
    }

    fn csi_entry(&mut self, byte: u8, sink: &mut dyn FnMut(Action)) {
        match byte {
            b'?' | b'>' | b'<' | b'=' => {
                self.marker = byte;
                self.state = ParserState::CsiParam;
            }
            b'0'..=b'9' | b';' | b':' => {
                self.params_buf.push(byte);
                self.state = ParserState::CsiParam;
            }
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = ParserState::CsiIntermediate;
            }
            0x40..=0x7E => {
                self.dispatch_csi(byte, sink);
                self.state = ParserState::Ground;
            }
            _ => self.state = ParserState::CsiIgnore,
        }
    }

    fn csi_param(&mut self, byte: u8, sink: &mut dyn FnMut(Action)) {
        match byte {
            b'0'..=b'9' | b';' | b':' => self.params_buf.push(byte),
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = ParserState::CsiIntermediate;
            }
            0x40..=0x7E => {
                self.dispatch_csi(byte, sink);
                self.state = ParserState::Ground;
            }
            _ => self.state = ParserState::CsiIgnore,
        }
    }

    fn csi_intermediate(&mut self, byte: u8, sink: &mut dyn FnMut(Action)) {
        match byte {
            0x20..=0x2F => {
                if self.intermediates.len() < MAX_INTERMEDIATES {
                    self.intermediates.push(byte);
                } else {
                    self.state = ParserState::CsiIgnore;
                }
            }
            0x40..=0x7E => {
                self.dispatch_csi(byte, sink);
                self.state = ParserState::Ground;
            }
            _ => self.state = ParserState::CsiIgnore,
        }
    }

    fn dispatch_csi(&mut self, final_byte: u8, sink: &mut dyn FnMut(Action)) {
        let sequence = CsiSequence {
            params: Params::parse(&self.params_buf),
            intermediates: std::mem::take(&mut self.intermediates),
            marker: self.marker,
            final_byte,
        };
        decode::csi_actions(&sequence, sink);
    }

    fn enter_dcs(&mut self) {
        self.state = ParserState::DcsEntry;
        self.string_data.clear();
        self.dcs_hooked = false;
    }

    fn dcs_collect(&mut self, byte: u8, sink: &mut dyn FnMut(Action)) {
        match byte {
            0x20..=0x3F => {
                self.state = ParserState::DcsParam;
            }
            0x40..=0x7E => {
                sink(Action::DcsHook);
                self.dcs_hooked = true;
                self.state = ParserState::DcsPassthrough;
            }
            _ => self.state = ParserState::DcsIgnore,
        }
    }

    fn enter_string(&mut self, state: ParserState, sink: &mut dyn FnMut(Action)) {
        self.state = state;
        self.string_data.clear();
        if state == ParserState::ApcString {
            sink(Action::ApcStart);
        }
    }

    fn put_string_byte(&mut self, byte: u8, sink: &mut dyn FnMut(Action)) {
        match self.state {
            ParserState::DcsPassthrough => sink(Action::DcsPut(byte)),
            ParserState::ApcString => sink(Action::ApcPut(byte)),
            ParserState::DcsIgnore | ParserState::PmString | ParserState::SosString => {}
            _ => {
                if self.string_data.len() < MAX_OSC_LEN {
                    self.string_data.push(byte);
                }
            }
        }
    }

    /// Terminate the active string. With `via_escape` the terminator was
    /// an ESC byte, so the machine continues in the escape state and the
    /// following `\` (ST) falls out naturally.
    fn finish_string(&mut self, sink: &mut dyn FnMut(Action), via_escape: bool) {
        match self.state {
            ParserState::OscString => {
                let data = String::from_utf8_lossy(&self.string_data).into_owned();
                decode::osc_actions(&data, sink);
            }
            ParserState::DcsPassthrough => sink(Action::DcsUnhook),
            ParserState::ApcString => sink(Action::ApcEnd),
            _ => {}
        }
        self.string_data.clear();
        self.dcs_hooked = false;
        self.state = if via_escape {
            ParserState::Escape
        } else {
            ParserState::Ground
        };
    }

    fn abort_string(&mut self, sink: &mut dyn FnMut(Action)) {
        if self.dcs_hooked {
            sink(Action::DcsUnhook);
        } else if self.state == ParserState::ApcString {
            sink(Action::ApcEnd);
        }
        self.string_data.clear();
        self.dcs_hooked = false;
        self.state = ParserState::Ground;
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Attribute, EraseLineMode};
    use crate::core::{Mode, StyleColor};

    #[test]
    fn test_print() {
        let mut parser = Parser::new();
        let actions = parser.feed(b"Hi");
        assert_eq!(actions, vec![Action::Print('H'), Action::Print('i')]);
    }

    #[test]
    fn test_c0_controls() {
        let mut parser = Parser::new();
        let actions = parser.feed(b"\r\n\x08\x09");
        assert_eq!(
            actions,
            vec![
                Action::CarriageReturn,
                Action::Linefeed,
                Action::Backspace,
                Action::HorizontalTab(1),
            ]
        );
    }

    #[test]
    fn test_cursor_position() {
        let mut parser = Parser::new();
        let actions = parser.feed(b"\x1b[10;20H");
        assert_eq!(actions, vec![Action::CursorPos { row: 10, col: 20 }]);
    }

    #[test]
    fn test_cursor_defaults() {
        let mut parser = Parser::new();
        let actions = parser.feed(b"\x1b[H\x1b[A");
        assert_eq!(
            actions,
            vec![
                Action::CursorPos { row: 1, col: 1 },
                Action::CursorUp(1),
            ]
        );
    }

    #[test]
    fn test_dec_modes() {
        let mut parser = Parser::new();
        let actions = parser.feed(b"\x1b[?7l\x1b[?25h");
        assert_eq!(
            actions,
            vec![
                Action::ResetMode(Mode::Wraparound),
                Action::SetMode(Mode::CursorVisible),
            ]
        );
    }

    #[test]
    fn test_sgr_decode() {
        let mut parser = Parser::new();
        let actions = parser.feed(b"\x1b[1;38;5;12m");
        assert_eq!(
            actions,
            vec![
                Action::SetAttribute(Attribute::Bold),
                Action::SetAttribute(Attribute::Foreground(StyleColor::Palette(12))),
            ]
        );
    }

    #[test]
    fn test_erase_line() {
        let mut parser = Parser::new();
        let actions = parser.feed(b"\x1b[K\x1b[?1K\x1b[4K");
        assert_eq!(
            actions,
            vec![
                Action::EraseLine {
                    mode: EraseLineMode::Right,
                    selective: false
                },
                Action::EraseLine {
                    mode: EraseLineMode::Left,
                    selective: true
                },
                Action::EraseLine {
                    mode: EraseLineMode::RightUnlessPendingWrap,
                    selective: false
                },
            ]
        );
    }

    #[test]
    fn test_streaming_across_chunks() {
        let mut parser = Parser::new();
        assert!(parser.feed(b"\x1b[10").is_empty());
        let actions = parser.feed(b";20H");
        assert_eq!(actions, vec![Action::CursorPos { row: 10, col: 20 }]);
    }

    #[test]
    fn test_streaming_utf8() {
        let mut parser = Parser::new();
        assert!(parser.feed(&[0xE4]).is_empty());
        assert!(parser.feed(&[0xB8]).is_empty());
        assert_eq!(parser.feed(&[0xAD]), vec![Action::Print('中')]);
    }

    #[test]
    fn test_osc_terminated_by_bel_and_st() {
        let mut parser = Parser::new();
        let actions = parser.feed(b"\x1b]8;;https://example.com\x07");
        assert_eq!(
            actions,
            vec![Action::StartHyperlink {
                uri: "https://example.com".into(),
                id: None
            }]
        );

        let actions = parser.feed(b"\x1b]8;;\x1b\\");
        assert_eq!(actions, vec![Action::EndHyperlink]);
    }

    #[test]
    fn test_dcs_boundaries() {
        let mut parser = Parser::new();
        let actions = parser.feed(b"\x1bPqAB\x1b\\");
        assert_eq!(
            actions,
            vec![
                Action::DcsHook,
                Action::DcsPut(b'A'),
                Action::DcsPut(b'B'),
                Action::DcsUnhook,
            ]
        );
    }

    #[test]
    fn test_apc_boundaries() {
        let mut parser = Parser::new();
        let actions = parser.feed(b"\x1b_Gi=1\x1b\\");
        assert_eq!(actions[0], Action::ApcStart);
        assert_eq!(*actions.last().unwrap(), Action::ApcEnd);
        assert_eq!(actions.len(), 6);
    }

    #[test]
    fn test_cancel_aborts_sequence() {
        let mut parser = Parser::new();
        let actions = parser.feed(b"\x1b[12\x18A");
        assert_eq!(actions, vec![Action::Print('A')]);
    }

    #[test]
    fn test_reset() {
        let mut parser = Parser::new();
        parser.feed(b"\x1b[10");
        assert_eq!(parser.state(), ParserState::CsiParam);
        parser.reset();
        assert_eq!(parser.state(), ParserState::Ground);
    }

    #[test]
    fn test_tab_reset() {
        let mut parser = Parser::new();
        assert_eq!(parser.feed(b"\x1b[?5W"), vec![Action::TabReset]);
    }

    #[test]
    fn test_designate_charset() {
        let mut parser = Parser::new();
        let actions = parser.feed(b"\x1b(0");
        assert_eq!(actions.len(), 1);
    }
}
