//! Terminal mode registry
//!
//! Tracks every ANSI (SM/RM) and DEC private (DECSET/DECRST) mode the
//! terminal understands as a dense bitset, plus a per-mode LIFO stack of
//! saved values for XTSAVE/XTRESTORE. Mode side effects (alt screen,
//! DECCOLM resize, margin resets) are applied by the dispatcher, not
//! here; the registry only stores bits.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The wire identity of a mode: its parameter number and whether it is
/// an ANSI mode (`CSI h`) or a DEC private mode (`CSI ? h`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeTag {
    pub number: u16,
    pub ansi: bool,
}

/// Every mode tracked by the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    // ANSI modes
    /// IRM (4): insert instead of replace on print
    Insert,
    /// LNM (20): linefeed also performs carriage return
    Linefeed,

    // DEC private modes
    /// DECCKM (1): cursor keys send application sequences
    CursorKeys,
    /// DECCOLM (3): 132-column mode
    Column132,
    /// DECSCNM (5): reverse video
    ReverseColors,
    /// DECOM (6): cursor addressing relative to the scroll region
    Origin,
    /// DECAWM (7): autowrap at the right margin
    Wraparound,
    /// DECARM (8): keyboard autorepeat
    Autorepeat,
    /// X10 mouse reporting (9)
    MouseEventX10,
    /// att610 (12): cursor blinking
    CursorBlinking,
    /// DECTCEM (25): cursor visible
    CursorVisible,
    /// xterm (40): allow DECCOLM to take effect
    EnableMode3,
    /// Legacy alternate screen (47)
    AltScreenLegacy,
    /// DECLRMM (69): enable left/right margin addressing
    EnableLeftAndRightMargin,
    /// Normal mouse tracking (1000)
    MouseEventNormal,
    /// Button-event mouse tracking (1002)
    MouseEventButton,
    /// Any-event mouse tracking (1003)
    MouseEventAny,
    /// Focus in/out reporting (1004)
    FocusEvent,
    /// UTF-8 mouse coordinate encoding (1005)
    MouseFormatUtf8,
    /// SGR mouse coordinate encoding (1006)
    MouseFormatSgr,
    /// urxvt mouse coordinate encoding (1015)
    MouseFormatUrxvt,
    /// SGR pixel-coordinate encoding (1016)
    MouseFormatSgrPixels,
    /// Alternate screen (1047)
    AltScreen,
    /// Save/restore cursor as a mode (1048)
    SaveCursor,
    /// Alternate screen with save-cursor-and-clear semantics (1049)
    AltScreenSaveCursorClearEnter,
    /// Bracketed paste (2004)
    BracketedPaste,
    /// Synchronized output (2026)
    SynchronizedOutput,
    /// Grapheme cluster width handling (2027)
    GraphemeCluster,
    /// In-band size reports (2048)
    InBandSizeReports,
}

impl Mode {
    pub const ALL: &'static [Mode] = &[
        Mode::Insert,
        Mode::Linefeed,
        Mode::CursorKeys,
        Mode::Column132,
        Mode::ReverseColors,
        Mode::Origin,
        Mode::Wraparound,
        Mode::Autorepeat,
        Mode::MouseEventX10,
        Mode::CursorBlinking,
        Mode::CursorVisible,
        Mode::EnableMode3,
        Mode::AltScreenLegacy,
        Mode::EnableLeftAndRightMargin,
        Mode::MouseEventNormal,
        Mode::MouseEventButton,
        Mode::MouseEventAny,
        Mode::FocusEvent,
        Mode::MouseFormatUtf8,
        Mode::MouseFormatSgr,
        Mode::MouseFormatUrxvt,
        Mode::MouseFormatSgrPixels,
        Mode::AltScreen,
        Mode::SaveCursor,
        Mode::AltScreenSaveCursorClearEnter,
        Mode::BracketedPaste,
        Mode::SynchronizedOutput,
        Mode::GraphemeCluster,
        Mode::InBandSizeReports,
    ];

    /// The wire number and ANSI/DEC discrimination for this mode
    pub fn tag(self) -> ModeTag {
        let (number, ansi) = match self {
            Mode::Insert => (4, true),
            Mode::Linefeed => (20, true),
            Mode::CursorKeys => (1, false),
            Mode::Column132 => (3, false),
            Mode::ReverseColors => (5, false),
            Mode::Origin => (6, false),
            Mode::Wraparound => (7, false),
            Mode::Autorepeat => (8, false),
            Mode::MouseEventX10 => (9, false),
            Mode::CursorBlinking => (12, false),
            Mode::CursorVisible => (25, false),
            Mode::EnableMode3 => (40, false),
            Mode::AltScreenLegacy => (47, false),
            Mode::EnableLeftAndRightMargin => (69, false),
            Mode::MouseEventNormal => (1000, false),
            Mode::MouseEventButton => (1002, false),
            Mode::MouseEventAny => (1003, false),
            Mode::FocusEvent => (1004, false),
            Mode::MouseFormatUtf8 => (1005, false),
            Mode::MouseFormatSgr => (1006, false),
            Mode::MouseFormatUrxvt => (1015, false),
            Mode::MouseFormatSgrPixels => (1016, false),
            Mode::AltScreen => (1047, false),
            Mode::SaveCursor => (1048, false),
            Mode::AltScreenSaveCursorClearEnter => (1049, false),
            Mode::BracketedPaste => (2004, false),
            Mode::SynchronizedOutput => (2026, false),
            Mode::GraphemeCluster => (2027, false),
            Mode::InBandSizeReports => (2048, false),
        };
        ModeTag { number, ansi }
    }

    /// Look up a mode from its wire identity
    pub fn from_tag(number: u16, ansi: bool) -> Option<Mode> {
        Mode::ALL
            .iter()
            .copied()
            .find(|mode| mode.tag() == ModeTag { number, ansi })
    }

    /// The value a freshly-initialized terminal reports for this mode
    pub fn default_value(self) -> bool {
        matches!(
            self,
            Mode::Wraparound | Mode::Autorepeat | Mode::CursorVisible
        )
    }

    fn index(self) -> u32 {
        Mode::ALL.iter().position(|&mode| mode == self).unwrap() as u32
    }
}

/// Dense mode storage plus per-mode save stacks
#[derive(Debug, Clone, PartialEq)]
pub struct ModeRegistry {
    bits: u64,
    saved: HashMap<Mode, Vec<bool>>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            bits: 0,
            saved: HashMap::new(),
        };
        registry.reset();
        registry
    }

    /// Restore every mode to its default and drop all saved values
    pub fn reset(&mut self) {
        self.bits = 0;
        for &mode in Mode::ALL {
            if mode.default_value() {
                self.bits |= 1 << mode.index();
            }
        }
        self.saved.clear();
    }

    pub fn get(&self, mode: Mode) -> bool {
        self.bits & (1 << mode.index()) != 0
    }

    pub fn set(&mut self, mode: Mode, enabled: bool) {
        if enabled {
            self.bits |= 1 << mode.index();
        } else {
            self.bits &= !(1 << mode.index());
        }
    }

    /// Push the current value onto the mode's save stack (XTSAVE)
    pub fn save(&mut self, mode: Mode) {
        let value = self.get(mode);
        self.saved.entry(mode).or_default().push(value);
    }

    /// Pop the most recently saved value (XTRESTORE). Returns the value
    /// to re-apply, or `None` when nothing was saved. The caller is
    /// responsible for running the mode-change side effects.
    pub fn restore(&mut self, mode: Mode) -> Option<bool> {
        self.saved.get_mut(&mode)?.pop()
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
