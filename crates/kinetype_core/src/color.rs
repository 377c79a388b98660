//! Colors and CSS color parsing
//!
//! Hover colors and the baseline text color arrive as CSS strings
//! (`#4472ca`, `rgb(68, 114, 202)`, `white`). They are parsed once at
//! configuration time and painted back as CSS when applied to a node.

use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, opt},
    number::complete::float,
    sequence::{delimited, preceded, terminated},
    Finish, IResult,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// RGBA color with components in `0.0..=1.0`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 0.5, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
    pub const PURPLE: Color = Color::rgb(0.5, 0.0, 0.5);
    pub const ORANGE: Color = Color::rgb(1.0, 165.0 / 255.0, 0.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }

    /// Parse a CSS color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()`
    /// or a named color.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let trimmed = input.trim();
        if let Some(color) = named_color(trimmed) {
            return Ok(color);
        }
        all_consuming(alt((hex_color, rgba_color, rgb_color)))(trimmed)
            .finish()
            .map(|(_, color)| color)
            .map_err(|_| ColorParseError::Invalid(input.to_string()))
    }

    /// Render as a CSS value. Opaque colors use `#rrggbb`.
    pub fn to_css(&self) -> String {
        let [r, g, b] = [self.r, self.g, self.b].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("rgba({}, {}, {}, {})", r, g, b, self.a.clamp(0.0, 1.0))
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Color parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("invalid CSS color `{0}`")]
    Invalid(String),
}

// ============================================================================
// Parsers
// ============================================================================

fn hex_byte(digits: &str) -> Option<f32> {
    u8::from_str_radix(digits, 16).ok().map(|v| v as f32 / 255.0)
}

/// `#RGB`, `#RRGGBB` or `#RRGGBBAA`
fn hex_color(input: &str) -> IResult<&str, Color> {
    let (rest, hex) = preceded(char('#'), take_while1(|c: char| c.is_ascii_hexdigit()))(input)?;

    let channels: Option<Vec<f32>> = match hex.len() {
        3 => hex
            .chars()
            .map(|c| hex_byte(&c.to_string().repeat(2)))
            .collect(),
        6 | 8 => (0..hex.len())
            .step_by(2)
            .map(|i| hex_byte(&hex[i..i + 2]))
            .collect(),
        _ => None,
    };

    match channels.as_deref() {
        Some([r, g, b]) => Ok((rest, Color::rgb(*r, *g, *b))),
        Some([r, g, b, a]) => Ok((rest, Color::rgba(*r, *g, *b, *a))),
        _ => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::HexDigit,
        ))),
    }
}

fn component(input: &str) -> IResult<&str, f32> {
    delimited(multispace0, float, multispace0)(input)
}

fn comma_component(input: &str) -> IResult<&str, f32> {
    preceded(char(','), component)(input)
}

/// A color channel: `0-255`, or `0%-100%`
fn channel(input: &str) -> IResult<&str, f32> {
    let (input, value) = component(input)?;
    let (input, percent) = opt(terminated(char('%'), multispace0))(input)?;
    let scaled = match percent {
        Some(_) => value / 100.0,
        None => value / 255.0,
    };
    Ok((input, scaled))
}

fn comma_channel(input: &str) -> IResult<&str, f32> {
    preceded(char(','), channel)(input)
}

/// `rgba(r, g, b, a)`
fn rgba_color(input: &str) -> IResult<&str, Color> {
    let (input, _) = tag_no_case("rgba")(input)?;
    let (input, _) = preceded(multispace0, char('('))(input)?;
    let (input, r) = channel(input)?;
    let (input, g) = comma_channel(input)?;
    let (input, b) = comma_channel(input)?;
    let (input, a) = comma_component(input)?;
    let (input, _) = char(')')(input)?;

    Ok((input, Color::rgba(r, g, b, a)))
}

/// `rgb(r, g, b)`, tolerating a trailing alpha like browsers do
fn rgb_color(input: &str) -> IResult<&str, Color> {
    let (input, _) = tag_no_case("rgb")(input)?;
    let (input, _) = preceded(multispace0, char('('))(input)?;
    let (input, r) = channel(input)?;
    let (input, g) = comma_channel(input)?;
    let (input, b) = comma_channel(input)?;
    let (input, a) = opt(comma_component)(input)?;
    let (input, _) = char(')')(input)?;

    Ok((input, Color::rgba(r, g, b, a.unwrap_or(1.0))))
}

fn named_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "black" => Some(Color::BLACK),
        "white" => Some(Color::WHITE),
        "red" => Some(Color::RED),
        "green" => Some(Color::GREEN),
        "blue" => Some(Color::BLUE),
        "yellow" => Some(Color::YELLOW),
        "cyan" | "aqua" => Some(Color::CYAN),
        "magenta" | "fuchsia" => Some(Color::MAGENTA),
        "gray" | "grey" => Some(Color::GRAY),
        "orange" => Some(Color::ORANGE),
        "purple" => Some(Color::PURPLE),
        "transparent" => Some(Color::TRANSPARENT),
        _ => None,
    }
}
