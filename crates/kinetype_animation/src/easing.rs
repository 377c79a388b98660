//! Easing curves
//!
//! Curves are named the way GSAP names them (`power2.out`,
//! `elastic.out(1, 0.3)`, `back.out(1.7)`) since that is the vocabulary
//! heading configurations are written in. Every curve maps `0.0 -> 0.0` and
//! `1.0 -> 1.0`; `back` and `elastic` overshoot in between.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, opt, value},
    multi::separated_list0,
    number::complete::float,
    sequence::{delimited, pair, preceded, tuple},
    Finish, IResult,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Which end of the curve carries the acceleration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum EaseDirection {
    In,
    #[default]
    Out,
    InOut,
}

impl EaseDirection {
    fn suffix(self) -> &'static str {
        match self {
            EaseDirection::In => "in",
            EaseDirection::Out => "out",
            EaseDirection::InOut => "inOut",
        }
    }
}

/// Default overshoot for `back` curves
pub const BACK_OVERSHOOT: f32 = 1.70158;

/// An easing curve
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    /// `none` / `linear` / `power0`
    Linear,
    /// `power1` (quad) through `power4` (quint); the exponent is `power + 1`
    Power { power: u8, direction: EaseDirection },
    Sine(EaseDirection),
    Expo(EaseDirection),
    Circ(EaseDirection),
    /// Pulls back past the start (in) or shoots past the end (out)
    Back { overshoot: f32, direction: EaseDirection },
    /// Oscillating spring-like settle
    Elastic {
        amplitude: f32,
        period: f32,
        direction: EaseDirection,
    },
}

impl Default for Easing {
    fn default() -> Self {
        Easing::power(1, EaseDirection::Out)
    }
}

impl Easing {
    pub const fn power(power: u8, direction: EaseDirection) -> Self {
        Easing::Power { power, direction }
    }

    pub const fn power2_out() -> Self {
        Easing::power(2, EaseDirection::Out)
    }

    pub const fn power2_in() -> Self {
        Easing::power(2, EaseDirection::In)
    }

    pub const fn power2_in_out() -> Self {
        Easing::power(2, EaseDirection::InOut)
    }

    pub const fn power1_in_out() -> Self {
        Easing::power(1, EaseDirection::InOut)
    }

    pub const fn elastic_out(amplitude: f32, period: f32) -> Self {
        Easing::Elastic {
            amplitude,
            period,
            direction: EaseDirection::Out,
        }
    }

    pub const fn back_out(overshoot: f32) -> Self {
        Easing::Back {
            overshoot,
            direction: EaseDirection::Out,
        }
    }

    /// Map linear progress `t` (clamped to `0.0..=1.0`) onto the curve
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::Power { power, direction } => {
                let exp = i32::from(power.min(4)) + 1;
                directed(direction, t, |p| p.powi(exp))
            }
            Easing::Sine(direction) => directed(direction, t, |p| 1.0 - (p * FRAC_PI_2).cos()),
            Easing::Expo(direction) => directed(direction, t, |p| {
                if p == 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * (p - 1.0))
                }
            }),
            Easing::Circ(direction) => directed(direction, t, |p| 1.0 - (1.0 - p * p).max(0.0).sqrt()),
            Easing::Back {
                overshoot,
                direction,
            } => directed(direction, t, |p| p * p * ((overshoot + 1.0) * p - overshoot)),
            Easing::Elastic {
                amplitude,
                period,
                direction,
            } => elastic(amplitude, period, direction, t),
        }
    }

    /// Parse a GSAP-style ease string, e.g. `power2.out` or
    /// `elastic.out(1, 0.3)`. A missing direction means `.out`.
    pub fn parse(input: &str) -> Result<Self, EaseParseError> {
        let trimmed = input.trim();
        let (_, (name, direction, args)) = all_consuming(ease_expr)(trimmed)
            .finish()
            .map_err(|_| EaseParseError::Syntax(input.to_string()))?;

        let direction = direction.unwrap_or_default();
        let args = args.unwrap_or_default();
        let arity = |max: usize| {
            if args.len() > max {
                Err(EaseParseError::TooManyArguments {
                    curve: name.to_string(),
                    max,
                })
            } else {
                Ok(())
            }
        };

        let easing = match name.to_ascii_lowercase().as_str() {
            "none" | "linear" | "power0" => {
                arity(0)?;
                Easing::Linear
            }
            "power1" | "quad" => Easing::power(1, direction),
            "power2" | "cubic" => Easing::power(2, direction),
            "power3" | "quart" => Easing::power(3, direction),
            "power4" | "quint" | "strong" => Easing::power(4, direction),
            "sine" => Easing::Sine(direction),
            "expo" => Easing::Expo(direction),
            "circ" => Easing::Circ(direction),
            "back" => {
                arity(1)?;
                Easing::Back {
                    overshoot: args.first().copied().unwrap_or(BACK_OVERSHOOT),
                    direction,
                }
            }
            "elastic" => {
                arity(2)?;
                Easing::Elastic {
                    amplitude: args.first().copied().unwrap_or(1.0),
                    period: args.get(1).copied().unwrap_or(0.3),
                    direction,
                }
            }
            _ => return Err(EaseParseError::UnknownCurve(name.to_string())),
        };

        if !matches!(easing, Easing::Back { .. } | Easing::Elastic { .. }) {
            arity(0)?;
        }

        Ok(easing)
    }
}

/// Build in/out/inOut variants from an ease-in curve
fn directed(direction: EaseDirection, t: f32, ease_in: impl Fn(f32) -> f32) -> f32 {
    match direction {
        EaseDirection::In => ease_in(t),
        EaseDirection::Out => 1.0 - ease_in(1.0 - t),
        EaseDirection::InOut => {
            if t < 0.5 {
                ease_in(t * 2.0) / 2.0
            } else {
                1.0 - ease_in((1.0 - t) * 2.0) / 2.0
            }
        }
    }
}

fn elastic(amplitude: f32, period: f32, direction: EaseDirection, t: f32) -> f32 {
    let p1 = amplitude.max(1.0);
    let period = if period > 0.0 { period } else { 0.3 };
    let p2 = period / amplitude.clamp(f32::EPSILON, 1.0);
    let p3 = p2 / TAU * (1.0 / p1).asin();
    let freq = TAU / p2;

    let ease_out = |p: f32| {
        if p >= 1.0 {
            1.0
        } else {
            p1 * 2f32.powf(-10.0 * p) * ((p - p3) * freq).sin() + 1.0
        }
    };

    match direction {
        EaseDirection::Out => ease_out(t),
        EaseDirection::In => 1.0 - ease_out(1.0 - t),
        EaseDirection::InOut => {
            if t < 0.5 {
                (1.0 - ease_out(1.0 - t * 2.0)) / 2.0
            } else {
                0.5 + ease_out((t - 0.5) * 2.0) / 2.0
            }
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Easing::Linear => f.write_str("none"),
            Easing::Power { power, direction } => {
                write!(f, "power{}.{}", power, direction.suffix())
            }
            Easing::Sine(direction) => write!(f, "sine.{}", direction.suffix()),
            Easing::Expo(direction) => write!(f, "expo.{}", direction.suffix()),
            Easing::Circ(direction) => write!(f, "circ.{}", direction.suffix()),
            Easing::Back {
                overshoot,
                direction,
            } => write!(f, "back.{}({})", direction.suffix(), overshoot),
            Easing::Elastic {
                amplitude,
                period,
                direction,
            } => write!(f, "elastic.{}({}, {})", direction.suffix(), amplitude, period),
        }
    }
}

impl FromStr for Easing {
    type Err = EaseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::parse(s)
    }
}

impl Serialize for Easing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Easing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Easing::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Ease string errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EaseParseError {
    #[error("malformed ease `{0}`")]
    Syntax(String),

    #[error("unknown ease curve `{0}`")]
    UnknownCurve(String),

    #[error("ease `{curve}` takes at most {max} argument(s)")]
    TooManyArguments { curve: String, max: usize },
}

// ============================================================================
// Parsers
// ============================================================================

type EaseParts<'a> = (&'a str, Option<EaseDirection>, Option<Vec<f32>>);

fn ease_expr(input: &str) -> IResult<&str, EaseParts<'_>> {
    tuple((curve_name, opt(direction), opt(arguments)))(input)
}

fn curve_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric())(input)
}

/// `.in`, `.out`, `.inOut`, plus the legacy `.easeIn` spellings
fn direction(input: &str) -> IResult<&str, EaseDirection> {
    preceded(
        char('.'),
        alt((
            value(
                EaseDirection::InOut,
                alt((tag_no_case("easeInOut"), tag_no_case("inOut"))),
            ),
            value(
                EaseDirection::In,
                alt((tag_no_case("easeIn"), tag_no_case("in"))),
            ),
            value(
                EaseDirection::Out,
                alt((tag_no_case("easeOut"), tag_no_case("out"))),
            ),
        )),
    )(input)
}

/// `(1, 0.3)`
fn arguments(input: &str) -> IResult<&str, Vec<f32>> {
    delimited(
        pair(char('('), multispace0),
        separated_list0(delimited(multispace0, char(','), multispace0), float),
        pair(multispace0, char(')')),
    )(input)
}
