//! Character set handling
//!
//! VT terminals designate character sets into four slots (G0-G3) and
//! invoke a slot into the left or right graphics bank. Locking shifts
//! (SI/SO, LS2/LS3 and the GR variants) persist; single shifts (SS2/SS3)
//! apply to the next printed character only.

use serde::{Deserialize, Serialize};

/// Character set designations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Charset {
    /// ASCII (US) - default
    #[default]
    Ascii,
    /// DEC Special Graphics (line drawing characters)
    DecSpecialGraphics,
    /// UK character set
    Uk,
}

impl Charset {
    /// Parse a designation final character (`ESC ( B`, `ESC ( 0`, ...)
    pub fn from_designation(c: char) -> Charset {
        match c {
            '0' | '2' => Charset::DecSpecialGraphics,
            'A' => Charset::Uk,
            _ => Charset::Ascii,
        }
    }
}

/// A graphics bank the active slot is invoked into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharsetBank {
    /// Graphics left (0x20-0x7F)
    GL,
    /// Graphics right (0xA0-0xFF)
    GR,
}

/// One of the four designation slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharsetSlot {
    G0,
    G1,
    G2,
    G3,
}

impl CharsetSlot {
    fn index(self) -> usize {
        match self {
            CharsetSlot::G0 => 0,
            CharsetSlot::G1 => 1,
            CharsetSlot::G2 => 2,
            CharsetSlot::G3 => 3,
        }
    }
}

/// Designated slots plus the active bank assignments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharsetState {
    slots: [Charset; 4],
    gl: CharsetSlot,
    gr: CharsetSlot,
    single_shift: Option<CharsetSlot>,
}

impl Default for CharsetState {
    fn default() -> Self {
        Self {
            slots: [Charset::Ascii; 4],
            gl: CharsetSlot::G0,
            gr: CharsetSlot::G2,
            single_shift: None,
        }
    }
}

impl CharsetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Designate a character set into a slot
    pub fn configure(&mut self, slot: CharsetSlot, set: Charset) {
        self.slots[slot.index()] = set;
    }

    /// Invoke a slot into a bank. A locking invoke persists; a
    /// non-locking invoke is a single shift for the next character.
    pub fn invoke(&mut self, bank: CharsetBank, slot: CharsetSlot, locking: bool) {
        if !locking {
            self.single_shift = Some(slot);
            return;
        }
        match bank {
            CharsetBank::GL => self.gl = slot,
            CharsetBank::GR => self.gr = slot,
        }
        self.single_shift = None;
    }

    /// The charset the next printed character resolves through
    pub fn current(&self) -> Charset {
        let slot = self.single_shift.unwrap_or(self.gl);
        self.slots[slot.index()]
    }

    pub fn clear_single_shift(&mut self) {
        self.single_shift = None;
    }

    /// Translate a character through the current charset
    pub fn translate(&self, c: char) -> char {
        match self.current() {
            Charset::Ascii => c,
            Charset::DecSpecialGraphics => translate_dec_special_graphics(c),
            Charset::Uk => translate_uk(c),
        }
    }
}

/// Translate DEC Special Graphics characters.
/// Maps ASCII 0x60-0x7E to line drawing and other special characters.
fn translate_dec_special_graphics(c: char) -> char {
    match c {
        '`' => '◆',
        'a' => '▒',
        'b' => '␉',
        'c' => '␌',
        'd' => '␍',
        'e' => '␊',
        'f' => '°',
        'g' => '±',
        'h' => '␤',
        'i' => '␋',
        'j' => '┘',
        'k' => '┐',
        'l' => '┌',
        'm' => '└',
        'n' => '┼',
        'o' => '⎺',
        'p' => '⎻',
        'q' => '─',
        'r' => '⎼',
        's' => '⎽',
        't' => '├',
        'u' => '┤',
        'v' => '┴',
        'w' => '┬',
        'x' => '│',
        'y' => '≤',
        'z' => '≥',
        '{' => 'π',
        '|' => '≠',
        '}' => '£',
        '~' => '·',
        _ => c,
    }
}

/// UK character set (only # differs)
fn translate_uk(c: char) -> char {
    match c {
        '#' => '£',
        _ => c,
    }
}
