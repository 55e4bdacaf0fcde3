use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Unit used when the input carries a numeral but no unit token.
pub const DEFAULT_UNIT: &str = "px";

/// Units accepted by [`parse`], matched case-insensitively.
pub const UNITS: [&str; 6] = ["px", "rem", "em", "%", "vw", "vh"];

static SIZE_UNIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(-?(?:\d+\.?\d*|\.\d+))\s*(px|rem|em|%|vw|vh)?$")
        .expect("size/unit pattern is valid")
});

/// A numeral paired with its CSS unit, both kept verbatim from the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeUnit {
    pub size: String,
    pub unit: String,
}

impl SizeUnit {
    /// The value blank input stands for.
    pub fn zero() -> Self {
        Self {
            size: "0".to_string(),
            unit: DEFAULT_UNIT.to_string(),
        }
    }

    /// True for any spelling of zero (`0`, `-0`, `0.00`, `.0`), whatever the unit.
    pub fn is_zero(&self) -> bool {
        self.size
            .chars()
            .all(|c| matches!(c, '-' | '.' | '0'))
    }

    pub fn same_unit(&self, other: &SizeUnit) -> bool {
        self.unit.eq_ignore_ascii_case(&other.unit)
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.size, self.unit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid size value: '{input}' (expected a number followed by one of px, rem, em, %, vw, vh)")]
pub struct UnitParseError {
    pub input: String,
}

impl FromStr for SizeUnit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s).ok_or_else(|| UnitParseError {
            input: s.to_string(),
        })
    }
}

/// Parse a raw "number+unit" string.
///
/// Blank input is not an error: it means "not specified yet" and reads as `0px`.
/// Returns `None` when non-blank input does not match the numeral/unit pattern.
pub fn parse(raw: &str) -> Option<SizeUnit> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(SizeUnit::zero());
    }

    let caps = SIZE_UNIT_RE.captures(raw)?;
    let size = caps.get(1)?.as_str().to_string();
    let unit = caps
        .get(2)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_UNIT.to_string());

    Some(SizeUnit { size, unit })
}

/// Reasons a min/max pair cannot become a fluid value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PairError {
    #[error("Invalid value format")]
    InvalidFormat,
    #[error("Cannot create 0~0 preset")]
    ZeroRange,
}

/// Validate the two endpoints of a fluid value.
pub fn validate_pair(min_raw: &str, max_raw: &str) -> Result<(SizeUnit, SizeUnit), PairError> {
    let (Some(min), Some(max)) = (parse(min_raw), parse(max_raw)) else {
        return Err(PairError::InvalidFormat);
    };

    if min.is_zero() && max.is_zero() {
        return Err(PairError::ZeroRange);
    }

    Ok((min, max))
}

/// Per-keystroke validity of a single field. Blank input is still being typed, so it is valid.
pub fn validate_live(input: &str) -> bool {
    parse(input).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(size: &str, unit: &str) -> SizeUnit {
        SizeUnit {
            size: size.to_string(),
            unit: unit.to_string(),
        }
    }

    #[test]
    fn test_parse_accepts_units() {
        for (input, size, unit) in [
            ("16px", "16", "px"),
            ("1.5rem", "1.5", "rem"),
            ("2em", "2", "em"),
            ("50%", "50", "%"),
            ("10vw", "10", "vw"),
            ("100vh", "100", "vh"),
            ("-4px", "-4", "px"),
            (".5rem", ".5", "rem"),
            ("3.", "3.", "px"),
            ("0", "0", "px"),
            ("  12 px  ", "12", "px"),
            ("24", "24", "px"),
        ] {
            assert_eq!(parse(input), Some(pair(size, unit)), "input '{}'", input);
        }
    }

    #[test]
    fn test_parse_preserves_unit_casing() {
        assert_eq!(parse("16PX"), Some(pair("16", "PX")));
        assert_eq!(parse("1.25Rem"), Some(pair("1.25", "Rem")));
    }

    #[test]
    fn test_parse_blank_is_zero() {
        for input in ["", "   ", "\t\n"] {
            assert_eq!(parse(input), Some(SizeUnit::zero()));
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "abc", "px", "16pt", "1.2.3", "--4px", "16 px px", "-", ".", "4-px", "16px;", "1e3px",
        ] {
            assert_eq!(parse(input), None, "expected no value for '{}'", input);
        }
    }

    #[test]
    fn test_from_str_error() {
        let err = "16pt".parse::<SizeUnit>().unwrap_err();
        assert_eq!(err.input, "16pt");
        assert_eq!("2rem".parse::<SizeUnit>().unwrap().to_string(), "2rem");
    }

    #[test]
    fn test_is_zero() {
        for size in ["0", "-0", "0.00", ".0", "0."] {
            assert!(pair(size, "px").is_zero(), "{} should be zero", size);
        }
        for size in ["0.01", "10", "-1"] {
            assert!(!pair(size, "px").is_zero(), "{} should not be zero", size);
        }
    }

    #[test]
    fn test_validate_pair() {
        assert_eq!(validate_pair("0px", "0px"), Err(PairError::ZeroRange));
        assert_eq!(validate_pair("0px", "0rem"), Err(PairError::ZeroRange));
        assert_eq!(validate_pair("", "0.0vw"), Err(PairError::ZeroRange));
        assert_eq!(validate_pair("abc", "10px"), Err(PairError::InvalidFormat));
        assert_eq!(validate_pair("10px", "10pt"), Err(PairError::InvalidFormat));

        let (min, max) = validate_pair("0px", "10px").unwrap();
        assert_eq!(min, pair("0", "px"));
        assert_eq!(max, pair("10", "px"));

        assert_eq!(
            PairError::ZeroRange.to_string(),
            "Cannot create 0~0 preset"
        );
        assert_eq!(PairError::InvalidFormat.to_string(), "Invalid value format");
    }

    #[test]
    fn test_validate_live_matches_parse() {
        for input in ["", "1", "1.", "1.5rem", "-2vw", "abc", "1.5.5", "16 PX", "12pt"] {
            assert_eq!(validate_live(input), parse(input).is_some(), "input '{}'", input);
        }
        assert!(validate_live(""));
        assert!(!validate_live("abc"));
    }
}
