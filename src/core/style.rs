//! Cell style model
//!
//! A style describes the visual attributes of a cell: foreground,
//! background, and underline colors plus the SGR flag set. Styles are
//! interned in a [`StyleSet`](crate::core::StyleSet) and referenced by
//! cells through a small integer id, so equality and hashing matter:
//! hashing runs over a canonical packed form with no padding bytes,
//! making it reproducible regardless of how the compiler lays out the
//! in-memory struct.

use serde::{Deserialize, Serialize};

use crate::core::palette::Rgb;

/// Size in bytes of the canonical packed style representation
pub const PACKED_STYLE_SIZE: usize = 16;

// The packed form is exactly 128 bits: three color tags plus a pad
// byte, three 3-byte color payloads, the 16-bit flags word, and a
// final pad byte. Hashes are computed over these bytes, so the layout
// must never drift.
const _: () = assert!(PACKED_STYLE_SIZE == 4 + 3 * 3 + 2 + 1);
const _: () = assert!(PACKED_STYLE_SIZE * 8 == 128);

/// A style color: unset, a palette index, or a direct RGB value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StyleColor {
    /// No color set; the renderer substitutes its default
    #[default]
    None,
    /// 256-color palette index
    Palette(u8),
    /// 24-bit direct color
    Rgb(Rgb),
}

impl StyleColor {
    fn tag(&self) -> u8 {
        match self {
            StyleColor::None => 0,
            StyleColor::Palette(_) => 1,
            StyleColor::Rgb(_) => 2,
        }
    }

    /// The 3-byte payload; every arm occupies the same width
    fn payload(&self) -> [u8; 3] {
        match self {
            StyleColor::None => [0, 0, 0],
            StyleColor::Palette(index) => [*index, 0, 0],
            StyleColor::Rgb(rgb) => [rgb.r, rgb.g, rgb.b],
        }
    }
}

/// Underline rendition (SGR 4 and the 4:n sub-styles)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnderlineStyle {
    #[default]
    None,
    Single,
    Double,
    Curly,
    Dotted,
    Dashed,
}

/// SGR flag set for a style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleFlags {
    pub bold: bool,
    pub italic: bool,
    pub faint: bool,
    pub blink: bool,
    pub inverse: bool,
    pub invisible: bool,
    pub strikethrough: bool,
    pub overline: bool,
    pub underline: UnderlineStyle,
}

impl StyleFlags {
    /// Pack the flags into 16 bits: one bit per boolean flag in
    /// declaration order, then 3 bits of underline style. The remaining
    /// bits are reserved zero.
    pub fn word(&self) -> u16 {
        let mut word = 0u16;
        for (bit, flag) in [
            self.bold,
            self.italic,
            self.faint,
            self.blink,
            self.inverse,
            self.invisible,
            self.strikethrough,
            self.overline,
        ]
        .iter()
        .enumerate()
        {
            if *flag {
                word |= 1 << bit;
            }
        }
        word |= (self.underline as u16) << 8;
        word
    }
}

/// Visual attributes of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Style {
    pub fg_color: StyleColor,
    pub bg_color: StyleColor,
    pub underline_color: StyleColor,
    pub flags: StyleFlags,
}

impl Style {
    pub fn is_default(&self) -> bool {
        *self == Style::default()
    }

    /// The canonical 128-bit packed representation.
    ///
    /// Layout: the three color tags, one zero pad byte, the three 24-bit
    /// color payloads, the 16-bit flags word (little endian), and a final
    /// zero pad byte. Equal styles pack bytewise equal; distinct styles
    /// pack to distinct byte strings.
    pub fn packed(&self) -> [u8; PACKED_STYLE_SIZE] {
        let mut out = [0u8; PACKED_STYLE_SIZE];
        out[0] = self.fg_color.tag();
        out[1] = self.bg_color.tag();
        out[2] = self.underline_color.tag();
        out[4..7].copy_from_slice(&self.fg_color.payload());
        out[7..10].copy_from_slice(&self.bg_color.payload());
        out[10..13].copy_from_slice(&self.underline_color.payload());
        out[13..15].copy_from_slice(&self.flags.word().to_le_bytes());
        out
    }

    /// Serialize the style as a self-contained SGR escape sequence.
    ///
    /// Starts with a full reset, then one sequence per attribute in a
    /// fixed order. Attributes are never combined into a single sequence:
    /// some terminals mis-parse combined forms that mix `;` and `:`
    /// separators.
    pub fn to_vt_sgr(&self) -> String {
        let mut out = String::from("\x1b[0m");

        for (on, code) in [
            (self.flags.bold, "1"),
            (self.flags.faint, "2"),
            (self.flags.italic, "3"),
            (self.flags.blink, "5"),
            (self.flags.inverse, "7"),
            (self.flags.invisible, "8"),
            (self.flags.strikethrough, "9"),
            (self.flags.overline, "53"),
        ] {
            if on {
                out.push_str("\x1b[");
                out.push_str(code);
                out.push('m');
            }
        }

        match self.flags.underline {
            UnderlineStyle::None => {}
            UnderlineStyle::Single => out.push_str("\x1b[4m"),
            UnderlineStyle::Double => out.push_str("\x1b[4:2m"),
            UnderlineStyle::Curly => out.push_str("\x1b[4:3m"),
            UnderlineStyle::Dotted => out.push_str("\x1b[4:4m"),
            UnderlineStyle::Dashed => out.push_str("\x1b[4:5m"),
        }

        push_color(&mut out, 38, self.fg_color);
        push_color(&mut out, 48, self.bg_color);
        push_color(&mut out, 58, self.underline_color);

        out
    }
}

fn push_color(out: &mut String, prefix: u8, color: StyleColor) {
    use std::fmt::Write;
    match color {
        StyleColor::None => {}
        StyleColor::Palette(index) => {
            let _ = write!(out, "\x1b[{};5;{}m", prefix, index);
        }
        StyleColor::Rgb(rgb) => {
            let _ = write!(out, "\x1b[{};2;{};{};{}m", prefix, rgb.r, rgb.g, rgb.b);
        }
    }
}
