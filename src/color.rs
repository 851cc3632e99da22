use std::fmt;
use std::str::FromStr;

use crossterm::style::Color as TermColor;
use thiserror::Error;

/// A theme color as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Ansi256(u8),
    Hex { r: u8, g: u8, b: u8 },
}

/// How many colors the terminal can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorDepth {
    #[default]
    TrueColor,
    Color256,
    Color16,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color value for field \"{field}\": \"{value}\"")]
pub struct ColorParseError {
    pub field: String,
    pub value: String,
}

impl Color {
    /// Parse `"0"`..`"255"`, `"#RRGGBB"` or `"#RGB"`.
    /// `field` only appears in the error message.
    pub fn parse(s: &str, field: &str) -> Result<Self, ColorParseError> {
        let parsed = match s.strip_prefix('#') {
            Some(hex) => parse_hex(hex),
            None => s.parse::<u8>().ok().map(Color::Ansi256),
        };
        parsed.ok_or_else(|| ColorParseError {
            field: field.to_owned(),
            value: s.to_owned(),
        })
    }

    /// Convert for crossterm at the given depth.
    ///
    /// Indices 0-15 become named colors so the terminal's own palette applies.
    pub fn to_crossterm_color(self, depth: ColorDepth) -> TermColor {
        match (self, depth) {
            (Color::Ansi256(n), ColorDepth::TrueColor | ColorDepth::Color256) => {
                named_or_indexed(n)
            }
            (Color::Hex { r, g, b }, ColorDepth::TrueColor) => TermColor::Rgb { r, g, b },
            (Color::Hex { r, g, b }, ColorDepth::Color256) => {
                TermColor::AnsiValue(nearest_cube(r, g, b))
            }
            (c, ColorDepth::Color16) => {
                let (r, g, b) = c.rgb();
                named_or_indexed(nearest_basic(r, g, b))
            }
        }
    }

    fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Hex { r, g, b } => (r, g, b),
            Color::Ansi256(n) => palette_rgb(n),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::Hex {
            r: channel(&hex[0..2])?,
            g: channel(&hex[2..4])?,
            b: channel(&hex[4..6])?,
        }),
        // #abc is #aabbcc
        3 => Some(Color::Hex {
            r: channel(&hex[0..1])? * 17,
            g: channel(&hex[1..2])? * 17,
            b: channel(&hex[2..3])? * 17,
        }),
        _ => None,
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Ansi256(n) => write!(f, "{n}"),
            Color::Hex { r, g, b } => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s, "<color>")
    }
}

// ---------------------------------------------------------------------------
// Depth detection
// ---------------------------------------------------------------------------

impl ColorDepth {
    /// Guess the depth from `COLORTERM` and `TERM`.
    pub fn detect() -> Self {
        Self::from_env_values(
            std::env::var("COLORTERM").ok().as_deref(),
            std::env::var("TERM").ok().as_deref(),
        )
    }

    pub fn from_env_values(colorterm: Option<&str>, term: Option<&str>) -> Self {
        if matches!(colorterm, Some("truecolor" | "24bit")) {
            ColorDepth::TrueColor
        } else if term.is_some_and(|t| t.contains("256color")) {
            ColorDepth::Color256
        } else {
            ColorDepth::Color16
        }
    }
}

// ---------------------------------------------------------------------------
// Palette approximation
// ---------------------------------------------------------------------------

const BASIC: [TermColor; 16] = [
    TermColor::Black,
    TermColor::DarkRed,
    TermColor::DarkGreen,
    TermColor::DarkYellow,
    TermColor::DarkBlue,
    TermColor::DarkMagenta,
    TermColor::DarkCyan,
    TermColor::Grey,
    TermColor::DarkGrey,
    TermColor::Red,
    TermColor::Green,
    TermColor::Yellow,
    TermColor::Blue,
    TermColor::Magenta,
    TermColor::Cyan,
    TermColor::White,
];

const BASIC_RGB: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (128, 0, 0),
    (0, 128, 0),
    (128, 128, 0),
    (0, 0, 128),
    (128, 0, 128),
    (0, 128, 128),
    (192, 192, 192),
    (128, 128, 128),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (0, 0, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

fn named_or_indexed(n: u8) -> TermColor {
    BASIC
        .get(usize::from(n))
        .copied()
        .unwrap_or(TermColor::AnsiValue(n))
}

fn palette_rgb(n: u8) -> (u8, u8, u8) {
    match n {
        0..=15 => BASIC_RGB[usize::from(n)],
        16..=231 => {
            let i = n - 16;
            let level = |v: u8| if v == 0 { 0 } else { 55 + 40 * v };
            (level(i / 36), level((i / 6) % 6), level(i % 6))
        }
        232..=255 => {
            let v = 8 + 10 * (n - 232);
            (v, v, v)
        }
    }
}

/// Nearest index in the 6x6x6 cube or the grayscale ramp.
fn nearest_cube(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        return match r {
            0..=7 => 16,
            249..=255 => 231,
            v => 232 + ((v - 8) / 10).min(23),
        };
    }
    let step = |v: u8| -> u8 {
        match v {
            0..=47 => 0,
            48..=114 => 1,
            v => ((v - 35) / 40).min(5),
        }
    };
    16 + 36 * step(r) + 6 * step(g) + step(b)
}

/// Nearest of the 16 basic colors by squared distance.
fn nearest_basic(r: u8, g: u8, b: u8) -> u8 {
    let dist = |(pr, pg, pb): (u8, u8, u8)| {
        let d = |a: u8, b: u8| (i32::from(a) - i32::from(b)).pow(2);
        d(r, pr) + d(g, pg) + d(b, pb)
    };
    let mut best = 0u8;
    let mut best_dist = i32::MAX;
    for (i, rgb) in BASIC_RGB.iter().enumerate() {
        let candidate = dist(*rgb);
        if candidate < best_dist {
            best_dist = candidate;
            best = i as u8;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_extremes() {
        assert_eq!(nearest_cube(0, 0, 255), 21);
        assert_eq!(nearest_cube(255, 0, 0), 196);
        assert_eq!(nearest_cube(0, 0, 0), 16);
        assert_eq!(nearest_cube(255, 255, 255), 231);
    }

    #[test]
    fn basic_prefers_exact_match() {
        assert_eq!(nearest_basic(255, 0, 0), 9);
        assert_eq!(nearest_basic(0, 128, 0), 2);
        assert_eq!(nearest_basic(250, 250, 250), 15);
    }

    #[test]
    fn palette_round_trips_basic_colors() {
        for n in 0..16u8 {
            let (r, g, b) = palette_rgb(n);
            assert_eq!(nearest_basic(r, g, b), n);
        }
    }
}
