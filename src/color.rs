/*!
 * ARGB colors and their per-dialect encodings.
 */

use std::fmt;

/// A color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const LIME: Color = Color::rgb(0, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const MAROON: Color = Color::rgb(128, 0, 0);
    pub const NAVY: Color = Color::rgb(0, 0, 128);
    pub const OLIVE: Color = Color::rgb(128, 128, 0);
    pub const PURPLE: Color = Color::rgb(128, 0, 128);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const SILVER: Color = Color::rgb(192, 192, 192);
    pub const TEAL: Color = Color::rgb(0, 128, 128);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Opaque color from its components
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { alpha: 0, red, green, blue }
    }

    /// Parses a packed little-endian `AABBGGRR` integer as written by SSA.
    ///
    /// `radix` is 16 for `&H00FFFFFF`-style values (prefix already stripped)
    /// and 10 for the decimal form older scripts use.
    pub fn from_ssa_string(s: &str, radix: u32) -> Result<Self, std::num::ParseIntError> {
        let value = i64::from_str_radix(s.trim(), radix)?;
        Ok(Self {
            alpha: ((value >> 24) & 0xff) as u8,
            blue: ((value >> 16) & 0xff) as u8,
            green: ((value >> 8) & 0xff) as u8,
            red: (value & 0xff) as u8,
        })
    }

    /// Packed `aabbggrr` lowercase hex, 8 digits
    pub fn ssa_string(&self) -> String {
        let packed = u32::from(self.alpha) << 24
            | u32::from(self.blue) << 16
            | u32::from(self.green) << 8
            | u32::from(self.red);
        format!("{:08x}", packed)
    }

    /// `rrggbb` lowercase hex, 6 digits, no leading `#`
    pub fn ttml_string(&self) -> String {
        let packed = u32::from(self.red) << 16 | u32::from(self.green) << 8 | u32::from(self.blue);
        format!("{:06x}", packed)
    }

    /// Parses `#rrggbb` or `rrggbb`
    pub fn from_ttml_string(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;
        Some(Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.ttml_string())
    }
}
