//! RGBA color type for markup color directives and serializer fills.
//!
//! Colors enter the engine through inline markup (`[#ff0000]...[/]`) and
//! leave through the backend serializers as `#rrggbb` fills, so the type
//! stores u8 components and round-trips hex strings exactly.

use crate::error::{Error, Result};
use std::fmt;

/// RGBA color with u8 components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from RGB components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a hex color string (`#rgb` or `#rrggbb`, leading `#` optional).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] when the string is not valid hex of
    /// the expected length.
    pub fn from_hex(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let invalid = || Error::InvalidColor(s.to_string());

        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16).ok_or_else(invalid)? as u8;
                    out[i] = v * 16 + v;
                }
                Ok(Self::rgb(out[0], out[1], out[2]))
            }
            6 => {
                let parse = |range: std::ops::Range<usize>| {
                    u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
                };
                Ok(Self::rgb(parse(0..2)?, parse(2..4)?, parse(4..6)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Format as a `#rrggbb` hex string (alpha is not encoded).
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Check whether a string looks like a hex color directive.
    #[must_use]
    pub fn is_hex_directive(s: &str) -> bool {
        s.starts_with('#') && Self::from_hex(s).is_ok()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
