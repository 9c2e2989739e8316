//! Job parameter types and the call signature shorthand
//!
//! | type                   | tokens           | wire                    |
//! |------------------------|------------------|-------------------------|
//! | byte                   | `B` `?` `&`      | 1 byte                  |
//! | word                   | `W` `??` `&&`    | 2 bytes, little-endian  |
//! | int                    | `I` `!` `%`      | 4 bytes, little-endian  |
//! | string                 | `S` `$`          | length byte, then text  |
//! | NUL-terminated string  | `S0` `$0`        | text, then `0x00`       |
//!
//! A signature lists inputs and outputs separated by `--`, e.g. `(B,W--S)`.
//! The parentheses may be left out, but not just one of them.
use std::{fmt::Display, str::FromStr};

use derive_ctor::ctor;
use getset::Getters;
use smartcod_port::{SimpleRead, SimpleWrite};
use strum::EnumString;

use crate::params::err::Error;

pub mod err;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ParamType {
    #[strum(to_string = "B", serialize = "?", serialize = "&")]
    Byte,
    #[strum(to_string = "W", serialize = "??", serialize = "&&")]
    Word,
    #[strum(to_string = "I", serialize = "!", serialize = "%")]
    Int,
    #[strum(to_string = "S", serialize = "$")]
    String,
    #[strum(to_string = "S0", serialize = "$0")]
    NulTerminatedString,
}

impl ParamType {
    /// Human readable name for messages
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Word => "word",
            Self::Int => "int",
            Self::String => "string",
            Self::NulTerminatedString => "NUL-terminated string",
        }
    }

    /// Canonical shorthand token
    #[must_use]
    pub const fn token(&self) -> &'static str {
        match self {
            Self::Byte => "B",
            Self::Word => "W",
            Self::Int => "I",
            Self::String => "S",
            Self::NulTerminatedString => "S0",
        }
    }

    /// Decode one value of this type from the wire
    pub fn read_from<R: SimpleRead + ?Sized>(&self, io: &mut R) -> smartcod_port::Result<Value> {
        Ok(match self {
            Self::Byte => Value::Byte(io.read_u8()?),
            Self::Word => Value::Word(io.read_u16_le()?),
            Self::Int => Value::Int(io.read_u32_le()?),
            Self::String => {
                let len = io.read_u8()?;
                Value::String(Text(io.read_vec(len as usize)?))
            }
            Self::NulTerminatedString => Value::NulTerminatedString(Text(io.read_until(0)?)),
        })
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// 8-bit text, one byte per character
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Text(Vec<u8>);

impl Text {
    /// Encode `s`, failing on characters that don't fit in a byte
    #[must_use]
    pub fn encode(s: &str) -> Option<Self> {
        s.chars()
            .map(|c| u8::try_from(u32::from(c)).ok())
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for Text {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Display for Text {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.iter().try_for_each(|&b| write!(f, "{}", char::from(b)))
    }
}

/// A job argument or result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Byte(u8),
    Word(u16),
    Int(u32),
    String(Text),
    NulTerminatedString(Text),
}

impl Value {
    /// Parse a command-line argument as `ty`.
    ///
    /// Numbers are decimal, `0x` hex or `&` hex. Text must be 8-bit; strings
    /// fit their length byte and NUL-terminated strings hold no NUL.
    pub fn parse(ty: ParamType, raw: &str) -> Result<Self> {
        let err = || Error::ArgumentParse {
            value: raw.to_owned(),
            expected: ty,
        };

        let value = match ty {
            ParamType::Byte => Self::Byte(
                parse_unsigned(raw)
                    .and_then(|n| u8::try_from(n).ok())
                    .ok_or_else(err)?,
            ),
            ParamType::Word => Self::Word(
                parse_unsigned(raw)
                    .and_then(|n| u16::try_from(n).ok())
                    .ok_or_else(err)?,
            ),
            ParamType::Int => Self::Int(parse_unsigned(raw).ok_or_else(err)?),
            ParamType::String => {
                let text = Text::encode(raw).ok_or_else(err)?;
                if text.len() > u8::MAX as usize {
                    return Err(err());
                }
                Self::String(text)
            }
            ParamType::NulTerminatedString => {
                let text = Text::encode(raw).ok_or_else(err)?;
                if text.as_bytes().contains(&0) {
                    return Err(err());
                }
                Self::NulTerminatedString(text)
            }
        };

        Ok(value)
    }

    #[must_use]
    pub const fn ty(&self) -> ParamType {
        match self {
            Self::Byte(_) => ParamType::Byte,
            Self::Word(_) => ParamType::Word,
            Self::Int(_) => ParamType::Int,
            Self::String(_) => ParamType::String,
            Self::NulTerminatedString(_) => ParamType::NulTerminatedString,
        }
    }

    /// Encode onto the wire
    pub fn write_to<W: SimpleWrite + ?Sized>(&self, io: &mut W) -> smartcod_port::Result<()> {
        match self {
            Self::Byte(v) => io.write_u8(*v),
            Self::Word(v) => io.write_u16_le(*v),
            Self::Int(v) => io.write_u32_le(*v),
            Self::String(text) => {
                io.write_u8(text.len() as u8)?;
                io.write(text.as_bytes())
            }
            Self::NulTerminatedString(text) => {
                io.write(text.as_bytes())?;
                io.write_u8(0)
            }
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Byte(v) => write!(f, "{v} (&{v:02X})"),
            Self::Word(v) => write!(f, "{v} (&{v:04X})"),
            Self::Int(v) => write!(f, "{v} (&{v:08X})"),
            Self::String(text) | Self::NulTerminatedString(text) => write!(f, "\"{text}\""),
        }
    }
}

/// Parse decimal, `0x` hex or `&` hex
pub fn parse_unsigned(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let (digits, radix) = match raw
        .strip_prefix('&')
        .or_else(|| raw.strip_prefix("0x"))
        .or_else(|| raw.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (raw, 10),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}

/// Ordered input and output types of a job
#[derive(Debug, Clone, Default, PartialEq, Eq, ctor, Getters)]
pub struct Signature {
    #[getset(get = "pub")]
    inputs: Vec<ParamType>,
    #[getset(get = "pub")]
    outputs: Vec<ParamType>,
}

impl Signature {
    /// Parse the leading `inputs.len()` raw arguments.
    ///
    /// Arguments past the declared inputs are left alone.
    pub fn parse_arguments<'a, I>(&self, raw: I) -> Result<Vec<Value>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let raw: Vec<&str> = raw.into_iter().take(self.inputs.len()).collect();
        if raw.len() < self.inputs.len() {
            return Err(Error::InsufficientArguments {
                expected: self.inputs.len(),
                got: raw.len(),
            });
        }

        self.inputs
            .iter()
            .zip(raw)
            .map(|(ty, raw)| Value::parse(*ty, raw))
            .collect()
    }
}

fn parse_side(side: &str) -> Result<Vec<ParamType>> {
    if side.trim().is_empty() {
        return Ok(Vec::new());
    }

    side.split(',')
        .map(str::trim)
        .map(|token| {
            token
                .parse()
                .map_err(|_| Error::UnknownType(token.to_owned()))
        })
        .collect()
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let body = match (trimmed.strip_prefix('('), trimmed.ends_with(')')) {
            (Some(rest), true) => &rest[..rest.len() - 1],
            (None, false) => trimmed,
            _ => return Err(Error::UnbalancedParentheses(s.to_owned())),
        };

        let sides: Vec<&str> = body.split("--").collect();
        match sides.as_slice() {
            [_] => Err(Error::MissingSeparator(s.to_owned())),
            [inputs, outputs] => Ok(Self::new(parse_side(inputs)?, parse_side(outputs)?)),
            _ => Err(Error::ExtraSeparator(s.to_owned())),
        }
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let join = |types: &[ParamType]| {
            types
                .iter()
                .map(ParamType::token)
                .collect::<Vec<_>>()
                .join(",")
        };
        write!(f, "({}--{})", join(&self.inputs), join(&self.outputs))
    }
}
