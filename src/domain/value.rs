//! Store value variant
//!
//! The backing store is self-describing: every value carries its type.
//! Adapters decode their native representation into [`StoreValue`];
//! the facade only ever sees the typed shapes produced by the port's
//! typed accessors.

use std::fmt;

use crate::domain::error::ValueParseError;

/// Type of a stored value, named by its GVariant-style signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Bool,
    Int32Pair,
}

impl ValueType {
    /// Signature string (`s`, `b`, `(ii)`)
    pub const fn signature(&self) -> &'static str {
        match self {
            Self::String => "s",
            Self::Bool => "b",
            Self::Int32Pair => "(ii)",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signature())
    }
}

/// A typed value held by the backing store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreValue {
    String(String),
    Bool(bool),
    Int32Pair(i32, i32),
}

impl StoreValue {
    /// Type tag of this value
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::String(_) => ValueType::String,
            Self::Bool(_) => ValueType::Bool,
            Self::Int32Pair(..) => ValueType::Int32Pair,
        }
    }

    /// Parse command-line text as a value of type `ty`.
    ///
    /// Booleans accept `true/yes/on` and `false/no/off`; any integer is
    /// read as a flag (non-zero is `true`). Pairs accept `800x600`,
    /// `800,600` and `(800, 600)`.
    pub fn parse(ty: ValueType, input: &str) -> Result<Self, ValueParseError> {
        match ty {
            ValueType::String => Ok(Self::String(input.to_string())),
            ValueType::Bool => parse_flag(input).map(Self::Bool).ok_or(ValueParseError {
                input: input.to_string(),
                expected: ty,
                hint: "Use true/false, yes/no, on/off or an integer",
            }),
            ValueType::Int32Pair => parse_pair(input)
                .map(|(a, b)| Self::Int32Pair(a, b))
                .ok_or(ValueParseError {
                    input: input.to_string(),
                    expected: ty,
                    hint: "Use WxH, W,H or (W, H) with 32-bit integers",
                }),
        }
    }
}

impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int32Pair(a, b) => write!(f, "({}, {})", a, b),
        }
    }
}

/// Normalize a truthy/falsy word or integer to a strict boolean
pub fn parse_flag(input: &str) -> Option<bool> {
    let lower = input.trim().to_lowercase();
    match lower.as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        other => other.parse::<i64>().ok().map(|n| n != 0),
    }
}

fn parse_pair(input: &str) -> Option<(i32, i32)> {
    let trimmed = input.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(trimmed);

    let (first, second) = inner
        .split_once(',')
        .or_else(|| inner.split_once(['x', 'X']))?;

    Some((first.trim().parse().ok()?, second.trim().parse().ok()?))
}
