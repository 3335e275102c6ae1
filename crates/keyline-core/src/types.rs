//! # Types Module
//!
//! Shared data types used across the editor core.
//!
//! ## Responsibilities
//! - **Rgb**: hex color parsing, encoding and channel interpolation.
//!
//! Colors travel through the editor as `#rrggbb` strings (the value type of
//! fill/stroke keyframes); this module is the single place they are decoded.

use serde::{Deserialize, Serialize};

/// An RGB color in 0-255 channel space.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `#rgb` hex notation (case-insensitive).
    pub fn parse(s: &str) -> Option<Rgb> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Rgb { r, g, b })
            }
            3 => {
                let d = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
                let (r, g, b) = (d(0)?, d(1)?, d(2)?);
                Some(Rgb {
                    r: r * 17,
                    g: g * 17,
                    b: b * 17,
                })
            }
            _ => None,
        }
    }

    /// Parses a color string, falling back to black when it cannot be resolved.
    pub fn parse_or_black(s: &str) -> Rgb {
        Rgb::parse(s).unwrap_or(Rgb::BLACK)
    }

    /// Encodes as lowercase `#rrggbb`, the editor's canonical color format.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Per-channel linear interpolation with round-to-nearest.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let ch = |a: u8, b: u8| {
            let v = a as f64 + (b as f64 - a as f64) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb {
            r: ch(self.r, other.r),
            g: ch(self.g, other.g),
            b: ch(self.b, other.b),
        }
    }

    /// Converts to normalized 0.0-1.0 channels (the interchange encoding).
    pub fn to_normalized(self) -> [f64; 3] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        ]
    }

    /// Builds a color from normalized 0.0-1.0 channels, clamping out-of-range input.
    pub fn from_normalized(channels: [f64; 3]) -> Rgb {
        let ch = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb {
            r: ch(channels[0]),
            g: ch(channels[1]),
            b: ch(channels[2]),
        }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}
