//! Colour strings used by canvas options, widgets and art keys.
//!
//! Supported forms:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - 12-bit: `rgb12()`, `rgba12()` with channels in 0-4095
//! - `rgba(r, g, b, a)` with a 0-255 alpha byte
//! - Any other CSS colour: the full named set, `rgb()`, `hsl()`, `hwb()` and so on
//!
//! Parsing never fails: anything unrecognised is fully transparent black.

use lightningcss::traits::Parse;
use lightningcss::values::color::{CssColor, FloatColor};

/// A parsed colour, keeping the precision it was written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Colour {
    /// Straight (non-premultiplied) 8-bit RGBA.
    Rgba8([u8; 4]),
    /// Straight (non-premultiplied) 16-bit RGBA.
    Rgba16([u16; 4]),
}

impl Colour {
    /// Fully transparent black, the result of any unparseable string.
    pub const TRANSPARENT: Colour = Colour::Rgba8([0, 0, 0, 0]);

    /// Widen to 16 bits per channel.
    ///
    /// 8-bit channels shift left by 8; an opaque 8-bit alpha maps to 65535.
    pub fn to_rgba16(self) -> [u16; 4] {
        match self {
            Colour::Rgba16(c) => c,
            Colour::Rgba8([r, g, b, a]) => {
                let alpha = if a == u8::MAX {
                    u16::MAX
                } else {
                    u16::from(a) << 8
                };
                [
                    u16::from(r) << 8,
                    u16::from(g) << 8,
                    u16::from(b) << 8,
                    alpha,
                ]
            }
        }
    }

    /// Narrow to 8 bits per channel by dropping the low byte.
    pub fn to_rgba8(self) -> [u8; 4] {
        match self {
            Colour::Rgba8(c) => c,
            Colour::Rgba16(c) => c.map(|v| (v >> 8) as u8),
        }
    }

    pub fn is_transparent(self) -> bool {
        self.to_rgba16()[3] == 0
    }
}

impl Default for Colour {
    fn default() -> Self {
        Colour::TRANSPARENT
    }
}

/// Parse a colour string. Invalid input yields [`Colour::TRANSPARENT`].
pub fn parse_colour(input: &str) -> Colour {
    let s = input.trim();
    let parsed = if let Some(digits) = s.strip_prefix('#') {
        parse_hex(digits)
    } else if let Some((func, rest)) = s.split_once('(') {
        rest.strip_suffix(')')
            .and_then(|args| parse_functional(&func.trim().to_ascii_lowercase(), args))
    } else {
        named_colour(s).map(Colour::Rgba8)
    };
    parsed.unwrap_or(Colour::TRANSPARENT)
}

/// Look up a CSS colour name, as used by widgets and art keys.
pub fn named_colour(name: &str) -> Option<[u8; 4]> {
    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    css_colour(name)
}

/// Resolve any CSS colour to straight 8-bit sRGB.
fn css_colour(s: &str) -> Option<[u8; 4]> {
    let rgb = CssColor::parse_string(s).ok()?.to_rgb().ok()?;
    match rgb {
        CssColor::RGBA(rgba) => Some([rgba.red, rgba.green, rgba.blue, rgba.alpha]),
        CssColor::Float(float) => match float.as_ref() {
            FloatColor::RGB(rgb) => Some(
                [rgb.r, rgb.g, rgb.b, rgb.alpha].map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8),
            ),
            _ => None,
        },
        _ => None,
    }
}

fn parse_hex(digits: &str) -> Option<Colour> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();

    let rgba = match digits.len() {
        // Short forms scale each digit by 16, so `#C69` is (192, 96, 144).
        3 | 4 => {
            let alpha = if digits.len() == 4 { nibble(3)? << 4 } else { 255 };
            [nibble(0)? << 4, nibble(1)? << 4, nibble(2)? << 4, alpha]
        }
        6 | 8 => {
            let alpha = if digits.len() == 8 { byte(6)? } else { 255 };
            [byte(0)?, byte(2)?, byte(4)?, alpha]
        }
        _ => return None,
    };
    Some(Colour::Rgba8(rgba))
}

fn parse_functional(func: &str, args: &str) -> Option<Colour> {
    match func {
        "rgb12" | "rgba12" => parse_rgb12(func, args),
        "rgba" => {
            // Card files write the alpha as a byte, CSS wants a fraction.
            let parts: Vec<&str> = args.split(',').map(str::trim).collect();
            let [r, g, b, a] = parts.as_slice() else {
                return None;
            };
            let alpha = f32::from(a.parse::<u8>().ok()?) / 255.0;
            css_colour(&format!("rgba({r}, {g}, {b}, {alpha})")).map(Colour::Rgba8)
        }
        // An alpha is only accepted through rgba().
        "rgb" if args.split(',').count() > 3 => None,
        _ => css_colour(&format!("{func}({args})")).map(Colour::Rgba8),
    }
}

fn parse_rgb12(func: &str, args: &str) -> Option<Colour> {
    let values = args
        .split(',')
        .map(|v| v.trim().parse::<u16>().ok())
        .collect::<Option<Vec<_>>>()?;
    let arity = if func == "rgba12" { 4 } else { 3 };
    if values.len() != arity || values.iter().any(|&v| v > 4095) {
        return None;
    }

    let alpha = values.get(3).map_or(u16::MAX, |a| a << 4);
    Some(Colour::Rgba16([
        values[0] << 4,
        values[1] << 4,
        values[2] << 4,
        alpha,
    ]))
}

#[cfg(test)]
#[path = "../../tests/unit/colour/parse.rs"]
mod tests;
