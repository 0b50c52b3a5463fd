//! String-to-typed-value decoding.
//!
//! Every destination field is described by a [`Kind`]. Decoding is split in
//! two steps so the parsing rules stay independent of any concrete Rust type:
//!
//! 1. [`parse`] turns a raw string into a [`Value`] of the requested kind,
//!    recursing into element kinds for sequences and maps.
//! 2. The destination [`Slot`] converts that value into its own type and
//!    stores it.
//!
//! | Kind | Accepted text |
//! |------|---------------|
//! | `Text` | anything, verbatim |
//! | `Bool` | `1 t true 0 f false` (any case) |
//! | `Duration` | `1h22m33s`, `6h`, `1.5s` |
//! | `Int` | `12`, `-77`, `0x1F` |
//! | `Uint` | `42`, `0xDEADBEEF` |
//! | `Float` | `345.71`, `-3.14159`, `1e-3` |
//! | `Seq` | `super, duper`, `12, 20, 36` |
//! | `Map` | `good:26, bad:37`, `1:true, 7:false` |
//!
//! Each map pair must split on `:` into exactly one key and one value, so
//! `a:b:c:d` is a [`DecodeError::BadMapFormat`] rather than two pairs.
//! Integer kinds take widths of 1 to 64 bits and floats 32 or 64; any other
//! width is unsupported. Nested records are not decodable from a single
//! string.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::path::PathBuf;
use std::time::Duration;

use crate::duration::parse_duration;
use crate::error::DecodeError;

/// The type of a destination field, as far as decoding is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Text,
    Bool,
    Duration,
    Int { bits: u32 },
    Uint { bits: u32 },
    Float { bits: u32 },
    Seq(Box<Kind>),
    Map(Box<Kind>, Box<Kind>),
    Record,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Text => f.write_str("string"),
            Kind::Bool => f.write_str("bool"),
            Kind::Duration => f.write_str("duration"),
            Kind::Int { bits } => write!(f, "i{bits}"),
            Kind::Uint { bits } => write!(f, "u{bits}"),
            Kind::Float { bits } => write!(f, "f{bits}"),
            Kind::Seq(elem) => write!(f, "list of {elem}"),
            Kind::Map(key, value) => write!(f, "map of {key} to {value}"),
            Kind::Record => f.write_str("record"),
        }
    }
}

/// A parsed value, already checked against the range of its target kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Bool(bool),
    Duration(Duration),
    Int(i64),
    Uint(u64),
    Float(f64),
    Seq(Vec<Value>),
    /// Pairs in input order. Later duplicates win when collected.
    Map(Vec<(Value, Value)>),
}

impl Value {
    fn describe(&self) -> &'static str {
        match self {
            Value::Text(_) => "string",
            Value::Bool(_) => "bool",
            Value::Duration(_) => "duration",
            Value::Int(_) => "integer",
            Value::Uint(_) => "unsigned integer",
            Value::Float(_) => "float",
            Value::Seq(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

/// Parse `raw` as a value of `kind`.
pub fn parse(kind: &Kind, raw: &str) -> Result<Value, DecodeError> {
    match kind {
        Kind::Int { bits } | Kind::Uint { bits } if !(1..=64).contains(bits) => {
            Err(DecodeError::UnsupportedType(kind.clone()))
        }
        Kind::Float { bits } if *bits != 32 && *bits != 64 => {
            Err(DecodeError::UnsupportedType(kind.clone()))
        }
        Kind::Text => Ok(Value::Text(raw.to_string())),
        Kind::Bool => parse_bool(raw).map(Value::Bool),
        Kind::Duration => parse_duration(raw)
            .map(Value::Duration)
            .map_err(|reason| DecodeError::parse(raw, Kind::Duration, reason)),
        Kind::Int { bits } => parse_int(raw, *bits).map(Value::Int),
        Kind::Uint { bits } => parse_uint(raw, *bits).map(Value::Uint),
        Kind::Float { bits } => parse_float(raw, *bits).map(Value::Float),
        Kind::Seq(elem) => raw
            .split(',')
            .map(|token| parse(elem, token.trim()))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Seq),
        Kind::Map(key_kind, value_kind) => {
            let mut pairs = Vec::new();
            for pair in raw.split(',') {
                let segments: Vec<&str> = pair.split(':').collect();
                let [key, value] = segments[..] else {
                    return Err(DecodeError::BadMapFormat(pair.to_string()));
                };
                let key = parse(key_kind, key.trim())?;
                let value = parse(value_kind, value.trim())?;
                pairs.push((key, value));
            }
            Ok(Value::Map(pairs))
        }
        Kind::Record => Err(DecodeError::UnsupportedType(Kind::Record)),
    }
}

fn parse_bool(raw: &str) -> Result<bool, DecodeError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => Err(DecodeError::parse(raw, Kind::Bool, "expected true or false")),
    }
}

fn parse_int(raw: &str, bits: u32) -> Result<i64, DecodeError> {
    let kind = Kind::Int { bits };
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let magnitude = i128::from(
        parse_magnitude(digits).map_err(|reason| DecodeError::parse(raw, kind.clone(), reason))?,
    );
    let value = if negative { -magnitude } else { magnitude };

    let max = (1i128 << (bits - 1)) - 1;
    let min = -(1i128 << (bits - 1));
    if value < min || value > max {
        return Err(DecodeError::parse(raw, kind, "value out of range"));
    }
    Ok(value as i64)
}

fn parse_uint(raw: &str, bits: u32) -> Result<u64, DecodeError> {
    let kind = Kind::Uint { bits };
    let value = parse_magnitude(raw).map_err(|reason| DecodeError::parse(raw, kind.clone(), reason))?;
    if bits < 64 && value >> bits != 0 {
        return Err(DecodeError::parse(raw, kind, "value out of range"));
    }
    Ok(value)
}

/// Unsigned digits with an optional `0x`, `0o` or `0b` radix prefix.
fn parse_magnitude(digits: &str) -> Result<u64, String> {
    let (radix, body) = match digits.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => (16, &digits[2..]),
        Some("0o") => (8, &digits[2..]),
        Some("0b") => (2, &digits[2..]),
        _ => (10, digits),
    };
    if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
        return Err("invalid digit found in string".into());
    }
    u64::from_str_radix(body, radix).map_err(|_| "value out of range".to_string())
}

fn parse_float(raw: &str, bits: u32) -> Result<f64, DecodeError> {
    let kind = Kind::Float { bits };
    let value: f64 = raw
        .parse()
        .map_err(|e: std::num::ParseFloatError| DecodeError::parse(raw, kind.clone(), e))?;
    if bits == 32 && value.is_finite() && (value as f32).is_infinite() {
        return Err(DecodeError::parse(raw, kind, "value out of range"));
    }
    Ok(value)
}

/// A Rust type that can be produced from a parsed [`Value`].
pub trait Decode: Sized {
    fn kind() -> Kind;

    fn from_value(value: Value) -> Result<Self, DecodeError>;
}

fn mismatch<T: Decode>(found: &Value) -> DecodeError {
    DecodeError::Mismatch {
        expected: <T as Decode>::kind(),
        found: found.describe(),
    }
}

/// Parse `raw` straight into a `T`.
pub fn decode_str<T: Decode>(raw: &str) -> Result<T, DecodeError> {
    T::from_value(parse(&<T as Decode>::kind(), raw)?)
}

impl Decode for String {
    fn kind() -> Kind {
        Kind::Text
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Decode for PathBuf {
    fn kind() -> Kind {
        Kind::Text
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Text(s) => Ok(PathBuf::from(s)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Decode for bool {
    fn kind() -> Kind {
        Kind::Bool
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Decode for Duration {
    fn kind() -> Kind {
        Kind::Duration
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Duration(d) => Ok(d),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

macro_rules! decode_signed {
    ($($t:ty),*) => {$(
        impl Decode for $t {
            fn kind() -> Kind {
                Kind::Int { bits: <$t>::BITS }
            }

            fn from_value(value: Value) -> Result<Self, DecodeError> {
                match value {
                    Value::Int(i) => <$t>::try_from(i)
                        .map_err(|e| DecodeError::parse(&i.to_string(), <Self as Decode>::kind(), e)),
                    other => Err(mismatch::<Self>(&other)),
                }
            }
        }
    )*};
}

macro_rules! decode_unsigned {
    ($($t:ty),*) => {$(
        impl Decode for $t {
            fn kind() -> Kind {
                Kind::Uint { bits: <$t>::BITS }
            }

            fn from_value(value: Value) -> Result<Self, DecodeError> {
                match value {
                    Value::Uint(u) => <$t>::try_from(u)
                        .map_err(|e| DecodeError::parse(&u.to_string(), <Self as Decode>::kind(), e)),
                    other => Err(mismatch::<Self>(&other)),
                }
            }
        }
    )*};
}

decode_signed!(i8, i16, i32, i64, isize);
decode_unsigned!(u8, u16, u32, u64, usize);

impl Decode for f32 {
    fn kind() -> Kind {
        Kind::Float { bits: 32 }
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Float(f) => Ok(f as f32),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Decode for f64 {
    fn kind() -> Kind {
        Kind::Float { bits: 64 }
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Float(f) => Ok(f),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn kind() -> Kind {
        <T as Decode>::kind()
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        T::from_value(value).map(Some)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn kind() -> Kind {
        Kind::Seq(Box::new(<T as Decode>::kind()))
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Seq(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<K, V, S> Decode for HashMap<K, V, S>
where
    K: Decode + Eq + Hash,
    V: Decode,
    S: BuildHasher + Default,
{
    fn kind() -> Kind {
        Kind::Map(Box::new(<K as Decode>::kind()), Box::new(<V as Decode>::kind()))
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Map(pairs) => pairs
                .into_iter()
                .map(|(k, v)| -> Result<(K, V), DecodeError> {
                    Ok((K::from_value(k)?, V::from_value(v)?))
                })
                .collect(),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn kind() -> Kind {
        Kind::Map(Box::new(<K as Decode>::kind()), Box::new(<V as Decode>::kind()))
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Map(pairs) => pairs
                .into_iter()
                .map(|(k, v)| -> Result<(K, V), DecodeError> {
                    Ok((K::from_value(k)?, V::from_value(v)?))
                })
                .collect(),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

/// A writable field of statically unknown type.
pub trait Slot {
    fn kind(&self) -> Kind;

    /// Whether the field still holds its type's default value.
    fn is_zero(&self) -> bool;

    /// Replace the field's value. On error the field is left untouched.
    fn assign(&mut self, value: Value) -> Result<(), DecodeError>;
}

impl<T: Decode + Default + PartialEq> Slot for T {
    fn kind(&self) -> Kind {
        <T as Decode>::kind()
    }

    fn is_zero(&self) -> bool {
        *self == T::default()
    }

    fn assign(&mut self, value: Value) -> Result<(), DecodeError> {
        *self = T::from_value(value)?;
        Ok(())
    }
}

/// A handle to one field of a destination record.
pub enum FieldRef<'a> {
    /// No field behind the handle.
    Nil,
    /// A field that may be inspected but not written.
    ReadOnly(&'a dyn Slot),
    Writable(&'a mut dyn Slot),
}

impl<'a> FieldRef<'a> {
    /// The field's kind, if there is a field.
    pub fn kind(&self) -> Option<Kind> {
        match self {
            FieldRef::Nil => None,
            FieldRef::ReadOnly(slot) => Some(slot.kind()),
            FieldRef::Writable(slot) => Some(slot.kind()),
        }
    }
}

impl<'a, T: Slot> From<Option<&'a mut T>> for FieldRef<'a> {
    fn from(target: Option<&'a mut T>) -> Self {
        match target {
            Some(slot) => FieldRef::Writable(slot),
            None => FieldRef::Nil,
        }
    }
}

/// Convert `raw` according to the target's kind and store it.
///
/// The target is written at most once, and only when the whole value
/// (every element, for sequences and maps) decoded successfully.
pub fn decode(raw: &str, target: FieldRef<'_>) -> Result<(), DecodeError> {
    let slot = match target {
        FieldRef::Nil => return Err(DecodeError::NilTarget),
        FieldRef::ReadOnly(_) => return Err(DecodeError::NotWritable),
        FieldRef::Writable(slot) => slot,
    };
    let value = parse(&slot.kind(), raw)?;
    slot.assign(value)
}

/// Decode `raw` into a plain variable.
pub fn unmarshal<T: Slot>(raw: &str, target: &mut T) -> Result<(), DecodeError> {
    decode(raw, FieldRef::Writable(target))
}
