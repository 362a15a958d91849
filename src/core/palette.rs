//! Color palette with OSC override tracking
//!
//! The palette holds 256 RGB entries. Entries changed through OSC 4 are
//! recorded in a bitmask so OSC 104 without parameters can restore exactly
//! the overridden entries from the default palette.

use serde::{Deserialize, Serialize};

/// Number of palette entries
pub const PALETTE_SIZE: usize = 256;

/// A 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse an X11-style color specification.
    ///
    /// Accepts `rgb:R/G/B` with 1-4 hex digits per component (scaled to
    /// 8 bits from the most significant digits) and `#RGB`, `#RRGGBB`,
    /// `#RRRGGGBBB`, `#RRRRGGGGBBBB`.
    pub fn parse(spec: &str) -> Option<Rgb> {
        if let Some(rest) = spec.strip_prefix("rgb:") {
            let mut parts = rest.split('/');
            let r = scale_component(parts.next()?)?;
            let g = scale_component(parts.next()?)?;
            let b = scale_component(parts.next()?)?;
            if parts.next().is_some() {
                return None;
            }
            return Some(Rgb::new(r, g, b));
        }

        if let Some(hex) = spec.strip_prefix('#') {
            if hex.len() % 3 != 0 {
                return None;
            }
            let digits = hex.len() / 3;
            if digits == 0 || digits > 4 {
                return None;
            }
            let r = scale_component(&hex[..digits])?;
            let g = scale_component(&hex[digits..2 * digits])?;
            let b = scale_component(&hex[2 * digits..])?;
            return Some(Rgb::new(r, g, b));
        }

        None
    }
}

/// Scale a 1-4 digit hex component to 8 bits using its high-order digits
fn scale_component(s: &str) -> Option<u8> {
    if s.is_empty() || s.len() > 4 {
        return None;
    }
    let value = u16::from_str_radix(s, 16).ok()?;
    Some(match s.len() {
        1 => (value * 17) as u8,
        2 => value as u8,
        3 => (value >> 4) as u8,
        _ => (value >> 8) as u8,
    })
}

/// Bitmask over the 256 palette entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaletteMask {
    words: [u64; 4],
}

impl PaletteMask {
    pub fn set(&mut self, index: u8) {
        self.words[index as usize / 64] |= 1 << (index as usize % 64);
    }

    pub fn clear(&mut self, index: u8) {
        self.words[index as usize / 64] &= !(1 << (index as usize % 64));
    }

    pub fn contains(&self, index: u8) -> bool {
        self.words[index as usize / 64] & (1 << (index as usize % 64)) != 0
    }

    pub fn clear_all(&mut self) {
        self.words = [0; 4];
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Iterate over the set entry indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=255u8).filter(move |&i| self.contains(i))
    }
}

/// The terminal color palette plus the override mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    pub colors: [Rgb; PALETTE_SIZE],
    pub mask: PaletteMask,
}

impl ColorPalette {
    pub fn new(colors: [Rgb; PALETTE_SIZE]) -> Self {
        Self {
            colors,
            mask: PaletteMask::default(),
        }
    }

    /// Override an entry via OSC 4, marking it in the mask
    pub fn set(&mut self, index: u8, color: Rgb) {
        self.colors[index as usize] = color;
        self.mask.set(index);
    }

    /// Restore a single entry from the defaults, clearing its mask bit
    pub fn reset(&mut self, index: u8, defaults: &[Rgb; PALETTE_SIZE]) {
        self.colors[index as usize] = defaults[index as usize];
        self.mask.clear(index);
    }

    /// Restore every overridden entry from the defaults and empty the mask
    pub fn reset_all(&mut self, defaults: &[Rgb; PALETTE_SIZE]) {
        for index in self.mask.iter().collect::<Vec<_>>() {
            self.colors[index as usize] = defaults[index as usize];
        }
        self.mask.clear_all();
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::new(standard_palette())
    }
}

/// Build the standard xterm 256-color palette:
/// 16 ANSI colors, a 6x6x6 cube, and a 24-step grayscale ramp.
pub fn standard_palette() -> [Rgb; PALETTE_SIZE] {
    let mut colors = [Rgb::default(); PALETTE_SIZE];

    const ANSI: [(u8, u8, u8); 16] = [
        (0, 0, 0),       // Black
        (205, 0, 0),     // Red
        (0, 205, 0),     // Green
        (205, 205, 0),   // Yellow
        (0, 0, 238),     // Blue
        (205, 0, 205),   // Magenta
        (0, 205, 205),   // Cyan
        (229, 229, 229), // White
        (127, 127, 127), // Bright Black
        (255, 0, 0),     // Bright Red
        (0, 255, 0),     // Bright Green
        (255, 255, 0),   // Bright Yellow
        (92, 92, 255),   // Bright Blue
        (255, 0, 255),   // Bright Magenta
        (0, 255, 255),   // Bright Cyan
        (255, 255, 255), // Bright White
    ];
    for (i, &(r, g, b)) in ANSI.iter().enumerate() {
        colors[i] = Rgb::new(r, g, b);
    }

    // 6x6x6 color cube (16-231)
    for i in 0..216 {
        let to_val = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
        colors[16 + i] = Rgb::new(
            to_val((i / 36) as u8),
            to_val(((i % 36) / 6) as u8),
            to_val((i % 6) as u8),
        );
    }

    // Grayscale ramp (232-255)
    for i in 0..24u8 {
        let gray = 8 + i * 10;
        colors[232 + i as usize] = Rgb::new(gray, gray, gray);
    }

    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgb_spec() {
        assert_eq!(Rgb::parse("rgb:ff/00/00"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::parse("rgb:f/0/8"), Some(Rgb::new(255, 0, 136)));
        assert_eq!(Rgb::parse("rgb:ffff/8080/0000"), Some(Rgb::new(255, 128, 0)));
    }

    #[test]
    fn test_parse_hash_spec() {
        assert_eq!(Rgb::parse("#ff8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::parse("#f80"), Some(Rgb::new(255, 136, 0)));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(Rgb::parse(""), None);
        assert_eq!(Rgb::parse("rgb:ff/00"), None);
        assert_eq!(Rgb::parse("#ff"), None);
        assert_eq!(Rgb::parse("blue-ish"), None);
    }

    #[test]
    fn test_standard_palette_anchors() {
        let palette = standard_palette();
        assert_eq!(palette[0], Rgb::new(0, 0, 0));
        assert_eq!(palette[15], Rgb::new(255, 255, 255));
        assert_eq!(palette[16], Rgb::new(0, 0, 0));
        assert_eq!(palette[196], Rgb::new(255, 0, 0));
        assert_eq!(palette[231], Rgb::new(255, 255, 255));
        assert_eq!(palette[232], Rgb::new(8, 8, 8));
        assert_eq!(palette[255], Rgb::new(238, 238, 238));
    }

    #[test]
    fn test_mask_law() {
        let defaults = standard_palette();
        let mut palette = ColorPalette::default();

        palette.set(0, Rgb::new(255, 0, 0));
        assert!(palette.mask.contains(0));
        assert_eq!(palette.colors[0], Rgb::new(255, 0, 0));

        palette.reset(0, &defaults);
        assert!(!palette.mask.contains(0));
        assert_eq!(palette.colors[0], defaults[0]);
    }

    #[test]
    fn test_reset_all_restores_only_overridden() {
        let defaults = standard_palette();
        let mut palette = ColorPalette::default();

        palette.set(3, Rgb::new(1, 2, 3));
        palette.set(200, Rgb::new(4, 5, 6));
        palette.reset_all(&defaults);

        assert!(palette.mask.is_empty());
        assert_eq!(palette.colors[3], defaults[3]);
        assert_eq!(palette.colors[200], defaults[200]);
    }

    #[test]
    fn test_mask_iter() {
        let mut mask = PaletteMask::default();
        mask.set(0);
        mask.set(63);
        mask.set(64);
        mask.set(255);
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![0, 63, 64, 255]);
    }
}
