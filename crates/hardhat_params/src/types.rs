//! Parameter types and typed values.
//!
//! [`ParameterType`] is the closed set of primitive types a parameter may
//! declare. Each type pairs with one [`ParameterValue`] variant and a parsing
//! rule for raw command-line or environment strings.
//!
//! | Type | Value | Accepted raw text |
//! |------|-------|-------------------|
//! | `String` | `String` | anything |
//! | `Boolean` | `bool` | `true` / `false`, any ASCII case |
//! | `Int` | `i64` | `-12`, `1e3`, `0xff` |
//! | `BigInt` | `i128` | `5`, `5n`, `0xffn` |
//! | `Float` | `f64` | `1.5`, `.5`, `2e-3`, `0x10` |
//! | `File` | `PathBuf` | any non-empty text |
//!
//! Values are never coerced: text that does not match the rule, or that
//! overflows the native type, is rejected.

use crate::error::ParameterError;
use core::fmt;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

static DECIMAL_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(?:[eE][0-9]+)?$").expect("valid regex"));

static DECIMAL_BIGINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+n?$").expect("valid regex"));

static HEX_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?0[xX][0-9a-fA-F]+n?$").expect("valid regex"));

static DECIMAL_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$").expect("valid regex")
});

// ─────────────────────────────────────────────────────────────────────────────
// ParameterType
// ─────────────────────────────────────────────────────────────────────────────

/// The primitive type of a parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// Free-form text.
    #[default]
    String,
    /// `true` or `false`.
    Boolean,
    /// 64-bit signed integer.
    Int,
    /// 128-bit signed integer.
    BigInt,
    /// Finite double-precision number.
    Float,
    /// Filesystem path. Existence is not checked.
    File,
}

impl ParameterType {
    /// All parameter types, in declaration order.
    pub const ALL: [ParameterType; 6] = [
        ParameterType::String,
        ParameterType::Boolean,
        ParameterType::Int,
        ParameterType::BigInt,
        ParameterType::Float,
        ParameterType::File,
    ];

    /// Returns the canonical upper-case name of the type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterType::String => "STRING",
            ParameterType::Boolean => "BOOLEAN",
            ParameterType::Int => "INT",
            ParameterType::BigInt => "BIGINT",
            ParameterType::Float => "FLOAT",
            ParameterType::File => "FILE",
        }
    }

    /// Parses `raw` into a value of this type.
    ///
    /// Returns `None` when the text does not follow the type's rule or does
    /// not fit the native representation. Use [`parse_value`] to get an
    /// error that names the parameter.
    #[must_use]
    pub fn parse(self, raw: &str) -> Option<ParameterValue> {
        match self {
            ParameterType::String => Some(ParameterValue::String(raw.to_owned())),
            ParameterType::File => {
                (!raw.is_empty()).then(|| ParameterValue::File(PathBuf::from(raw)))
            }
            ParameterType::Boolean => parse_bool(raw).map(ParameterValue::Boolean),
            ParameterType::Int => parse_int(raw).map(ParameterValue::Int),
            ParameterType::BigInt => parse_bigint(raw).map(ParameterValue::BigInt),
            ParameterType::Float => parse_float(raw).map(ParameterValue::Float),
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ParameterValue
// ─────────────────────────────────────────────────────────────────────────────

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    /// Value of a [`ParameterType::String`] parameter.
    String(String),
    /// Value of a [`ParameterType::Boolean`] parameter.
    Boolean(bool),
    /// Value of a [`ParameterType::Int`] parameter.
    Int(i64),
    /// Value of a [`ParameterType::BigInt`] parameter.
    BigInt(i128),
    /// Value of a [`ParameterType::Float`] parameter.
    Float(f64),
    /// Value of a [`ParameterType::File`] parameter.
    File(PathBuf),
}

impl ParameterValue {
    /// Returns the type this value belongs to.
    #[must_use]
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            ParameterValue::String(_) => ParameterType::String,
            ParameterValue::Boolean(_) => ParameterType::Boolean,
            ParameterValue::Int(_) => ParameterType::Int,
            ParameterValue::BigInt(_) => ParameterType::BigInt,
            ParameterValue::Float(_) => ParameterType::Float,
            ParameterValue::File(_) => ParameterType::File,
        }
    }

    /// Returns the text if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the flag if this is a boolean value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the number if this is an int value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParameterValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the number if this is a bigint value.
    #[must_use]
    pub fn as_bigint(&self) -> Option<i128> {
        match self {
            ParameterValue::BigInt(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the number if this is a float value.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParameterValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the path if this is a file value.
    #[must_use]
    pub fn as_file(&self) -> Option<&std::path::Path> {
        match self {
            ParameterValue::File(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::String(value) => f.write_str(value),
            ParameterValue::Boolean(value) => write!(f, "{value}"),
            ParameterValue::Int(value) => write!(f, "{value}"),
            ParameterValue::BigInt(value) => write!(f, "{value}n"),
            ParameterValue::Float(value) => write!(f, "{value}"),
            ParameterValue::File(value) => write!(f, "{}", value.display()),
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_owned())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::String(value)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Boolean(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Int(value)
    }
}

impl From<i128> for ParameterValue {
    fn from(value: i128) -> Self {
        ParameterValue::BigInt(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Float(value)
    }
}

impl From<PathBuf> for ParameterValue {
    fn from(value: PathBuf) -> Self {
        ParameterValue::File(value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing and validation
// ─────────────────────────────────────────────────────────────────────────────

/// Parses the raw text supplied for parameter `name` as `parameter_type`.
///
/// # Errors
///
/// Returns [`ParameterError::InvalidValueForType`] carrying `name`, `raw`
/// and `parameter_type` when the text cannot be parsed losslessly.
pub fn parse_value(
    name: &str,
    raw: &str,
    parameter_type: ParameterType,
) -> Result<ParameterValue, ParameterError> {
    parameter_type
        .parse(raw)
        .ok_or_else(|| ParameterError::invalid_value(name, raw, parameter_type))
}

/// Checks an already-typed value against `parameter_type`.
///
/// Used for programmatic defaults, which are never parsed from text.
#[must_use]
pub fn is_value_valid(parameter_type: ParameterType, value: &ParameterValue) -> bool {
    match (parameter_type, value) {
        (ParameterType::Float, ParameterValue::Float(number)) => number.is_finite(),
        (ParameterType::File, ParameterValue::File(path)) => !path.as_os_str().is_empty(),
        (expected, value) => value.parameter_type() == expected,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Splits an optional leading `-` off a numeric literal.
fn split_sign(raw: &str) -> (bool, &str) {
    match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    }
}

fn parse_hex(raw: &str) -> Option<i128> {
    let (negative, unsigned) = split_sign(raw);
    let digits = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))?;
    if negative {
        // Parse with the sign attached so `i128::MIN` is reachable.
        i128::from_str_radix(&format!("-{digits}"), 16).ok()
    } else {
        i128::from_str_radix(digits, 16).ok()
    }
}

fn parse_int(raw: &str) -> Option<i64> {
    if HEX_INT.is_match(raw) && !raw.ends_with('n') {
        return parse_hex(raw).and_then(|value| i64::try_from(value).ok());
    }
    if !DECIMAL_INT.is_match(raw) {
        return None;
    }

    match raw.find(['e', 'E']) {
        Some(index) => {
            let mantissa: i64 = raw[..index].parse().ok()?;
            let exponent: u32 = raw[index + 1..].parse().ok()?;
            if mantissa == 0 {
                return Some(0);
            }
            10_i64
                .checked_pow(exponent)
                .and_then(|scale| mantissa.checked_mul(scale))
        }
        None => raw.parse().ok(),
    }
}

fn parse_bigint(raw: &str) -> Option<i128> {
    if HEX_INT.is_match(raw) {
        return parse_hex(raw.trim_end_matches('n'));
    }
    if !DECIMAL_BIGINT.is_match(raw) {
        return None;
    }
    raw.trim_end_matches('n').parse().ok()
}

fn parse_float(raw: &str) -> Option<f64> {
    let value = if HEX_INT.is_match(raw) && !raw.ends_with('n') {
        // Hex literals are integral; precision loss past 2^53 is accepted.
        parse_hex(raw)? as f64
    } else if DECIMAL_FLOAT.is_match(raw) {
        raw.parse::<f64>().ok()?
    } else {
        return None;
    };

    value.is_finite().then_some(value)
}
