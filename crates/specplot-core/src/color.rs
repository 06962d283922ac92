//! Color values, the default line property cycle, and the image colormap.
//!
//! Colors are parsed from the short names and hex strings used in plot
//! requests (`"k"`, `"white"`, `"C3"`, `"#1f77b4"`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An opaque RGB color. Transparency is carried separately by each layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hex form `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        match digits.len() {
            6 => {
                let v = u32::from_str_radix(digits, 16).ok()?;
                Some(Self::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8))
            }
            3 => {
                let v = u16::from_str_radix(digits, 16).ok()?;
                let expand = |n: u16| (n as u8 & 0x0f) * 17;
                Some(Self::rgb(expand(v >> 8), expand(v >> 4), expand(v)))
            }
            _ => None,
        }
    }
}

/// The ten-color default cycle used for lines drawn without an explicit color.
pub const DEFAULT_CYCLE: [Color; 10] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0xd6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0xe3, 0x77, 0xc2),
    Color::rgb(0x7f, 0x7f, 0x7f),
    Color::rgb(0xbc, 0xbd, 0x22),
    Color::rgb(0x17, 0xbe, 0xcf),
];

/// Return the `n`-th color of the default cycle, wrapping around.
pub fn cycle_color(n: usize) -> Color {
    DEFAULT_CYCLE[n % DEFAULT_CYCLE.len()]
}

/// Error returned when a color string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised color: {:?}", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        let named = match name.as_str() {
            "k" | "black" => Some(Color::BLACK),
            "w" | "white" => Some(Color::WHITE),
            "r" | "red" => Some(Color::rgb(255, 0, 0)),
            "g" | "green" => Some(Color::rgb(0, 128, 0)),
            "b" | "blue" => Some(Color::rgb(0, 0, 255)),
            "c" | "cyan" => Some(Color::rgb(0, 191, 191)),
            "m" | "magenta" => Some(Color::rgb(191, 0, 191)),
            "y" | "yellow" => Some(Color::rgb(191, 191, 0)),
            "gray" | "grey" => Some(Color::rgb(128, 128, 128)),
            "orange" => Some(Color::rgb(255, 165, 0)),
            "purple" => Some(Color::rgb(128, 0, 128)),
            _ => None,
        };
        if let Some(color) = named {
            return Ok(color);
        }

        // Cycle references: "C0" .. "C9"
        if let Some(idx) = name.strip_prefix('c') {
            if let Ok(n) = idx.parse::<usize>() {
                return Ok(cycle_color(n));
            }
        }

        Color::from_hex(&name).ok_or_else(|| ParseColorError(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Perceptually uniform colormap used for matrix images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    #[default]
    Viridis,
    Gray,
}

const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 45, 123),
    (59, 82, 139),
    (44, 114, 142),
    (33, 145, 140),
    (40, 174, 128),
    (94, 201, 98),
    (173, 220, 48),
    (253, 231, 37),
];

impl Colormap {
    /// Map `t` in [0, 1] to a color. Out-of-range values are clamped.
    pub fn sample(self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Colormap::Gray => {
                let v = (t * 255.0).round() as u8;
                Color::rgb(v, v, v)
            }
            Colormap::Viridis => {
                let scaled = t * (VIRIDIS.len() - 1) as f64;
                let lo = scaled.floor() as usize;
                let hi = (lo + 1).min(VIRIDIS.len() - 1);
                let frac = scaled - lo as f64;
                let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
                let (a, b) = (VIRIDIS[lo], VIRIDIS[hi]);
                Color::rgb(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_names_and_hex() {
        assert_eq!("k".parse::<Color>().unwrap(), Color::BLACK);
        assert_eq!("White".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("#ff0000".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
        assert_eq!("#0f0".parse::<Color>().unwrap(), Color::rgb(0, 255, 0));
    }

    #[test]
    fn parses_cycle_references() {
        assert_eq!("C0".parse::<Color>().unwrap(), DEFAULT_CYCLE[0]);
        assert_eq!("C13".parse::<Color>().unwrap(), DEFAULT_CYCLE[3]);
    }

    #[test]
    fn rejects_unknown_color() {
        let err = "chartreuse-ish".parse::<Color>().unwrap_err();
        assert!(err.to_string().contains("chartreuse-ish"));
    }

    #[test]
    fn hex_round_trips_through_string() {
        let c = Color::rgb(0x17, 0xbe, 0xcf);
        assert_eq!(String::from(c), "#17becf");
    }

    #[test]
    fn viridis_endpoints() {
        assert_eq!(Colormap::Viridis.sample(0.0), Color::rgb(68, 1, 84));
        assert_eq!(Colormap::Viridis.sample(1.0), Color::rgb(253, 231, 37));
        assert_eq!(Colormap::Viridis.sample(7.0), Color::rgb(253, 231, 37));
    }

    #[test]
    fn gray_is_linear() {
        assert_eq!(Colormap::Gray.sample(0.5), Color::rgb(128, 128, 128));
    }
}
