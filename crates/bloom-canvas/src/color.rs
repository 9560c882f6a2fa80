#![forbid(unsafe_code)]

//! Straight-alpha colors and the fixed brush palette.

use std::fmt;

/// An 8-bit-per-channel color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black; the state of an untouched pixel.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(&digits[i..=i], 16)
                        .ok()
                        .map(|n| (n << 4) | n)
                };
                Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// `#RRGGBB` for opaque colors, `#RRGGBBAA` otherwise.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[must_use]
    pub const fn from_array(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }

    /// Whether this color is one of the brush palette entries.
    #[must_use]
    pub fn in_palette(self) -> bool {
        PALETTE.contains(&self)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// The brush palette, in picker order.
pub const PALETTE: [Rgba; 12] = [
    Rgba::rgb(0xE8, 0x67, 0x7D),
    Rgba::rgb(0xF4, 0xA3, 0xB5),
    Rgba::rgb(0xD9, 0x4F, 0x72),
    Rgba::rgb(0xF2, 0xC1, 0x4E),
    Rgba::rgb(0xF7, 0xE1, 0x74),
    Rgba::rgb(0xA7, 0x8B, 0xDB),
    Rgba::rgb(0xC4, 0xA6, 0xE8),
    Rgba::rgb(0x5B, 0xA4, 0xCF),
    Rgba::rgb(0x7D, 0xC4, 0xE0),
    Rgba::rgb(0x6D, 0xBE, 0x6D),
    Rgba::rgb(0x3D, 0x7A, 0x3D),
    Rgba::rgb(0xF5, 0xF0, 0xE8),
];

/// Color selected when a surface is created.
pub const DEFAULT_COLOR: Rgba = PALETTE[0];
