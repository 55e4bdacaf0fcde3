//! Encoding of a two-point fluid value as a CSS `clamp()` formula, and back.
//!
//! The encoded form is
//!
//! ```text
//! clamp(min(<min>, <max>), calc(<min> + (<maxSize> - <minSize>) * ((100vw - <minScreen>) / <screenDiff>)), max(<min>, <max>))
//! ```
//!
//! The envelope is expressed with runtime `min()`/`max()` over both endpoints so an
//! inverted pair (max smaller than min) still yields a bounded value. The codec is
//! string-preserving: `decode(encode(..))` hands back the exact numerals and units
//! that went in, not a normalized number.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::unit::SizeUnit;

/// Literal token every encoded formula starts with.
pub const FORMULA_PREFIX: &str = "clamp(";

pub const DEFAULT_MIN_SCREEN_REF: &str = "var(--min-screen)";
pub const DEFAULT_SCREEN_DIFF_REF: &str = "var(--screen-diff)";

static ENVELOPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^clamp\(\s*min\(\s*([^,\s()]+)\s*,\s*([^,\s()]+)\s*\)")
        .expect("envelope pattern is valid")
});

static BASE_TERM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"calc\(\s*([^\s()+]+)\s*\+").expect("base term pattern is valid"));

/// Environment references substituted verbatim into encoded formulas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportRefs {
    pub min_screen: String,
    pub screen_diff: String,
}

impl Default for ViewportRefs {
    fn default() -> Self {
        Self {
            min_screen: DEFAULT_MIN_SCREEN_REF.to_string(),
            screen_diff: DEFAULT_SCREEN_DIFF_REF.to_string(),
        }
    }
}

/// The four components carried by a clamp formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClampValues {
    pub min_size: String,
    pub min_unit: String,
    pub max_size: String,
    pub max_unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreviewError {
    #[error("Cannot preview mixed units: {min_unit} and {max_unit}")]
    MixedUnits { min_unit: String, max_unit: String },
    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),
    #[error("Viewport range is empty: min width {min_width} must be below max width {max_width}")]
    EmptyViewport {
        min_width: Decimal,
        max_width: Decimal,
    },
    #[error("Preview of {min} ~ {max} is out of numeric range")]
    Overflow { min: Decimal, max: Decimal },
}

impl ClampValues {
    pub fn min(&self) -> SizeUnit {
        SizeUnit {
            size: self.min_size.clone(),
            unit: self.min_unit.clone(),
        }
    }

    pub fn max(&self) -> SizeUnit {
        SizeUnit {
            size: self.max_size.clone(),
            unit: self.max_unit.clone(),
        }
    }

    /// Value the formula settles on at viewport `width`, given the numeric widths the
    /// min-screen/screen-diff references stand for.
    pub fn evaluate(
        &self,
        width: Decimal,
        min_width: Decimal,
        max_width: Decimal,
    ) -> Result<Decimal, PreviewError> {
        if !self.min_unit.eq_ignore_ascii_case(&self.max_unit) {
            return Err(PreviewError::MixedUnits {
                min_unit: self.min_unit.clone(),
                max_unit: self.max_unit.clone(),
            });
        }
        if max_width <= min_width {
            return Err(PreviewError::EmptyViewport {
                min_width,
                max_width,
            });
        }

        let min = to_decimal(&self.min_size)?;
        let max = to_decimal(&self.max_size)?;
        let overflow = || PreviewError::Overflow { min, max };
        let span = max.checked_sub(min).ok_or_else(overflow)?;
        let offset = width.checked_sub(min_width).ok_or_else(overflow)?;
        let range = max_width.checked_sub(min_width).ok_or_else(overflow)?;
        let preferred = span
            .checked_mul(offset)
            .and_then(|scaled| scaled.checked_div(range))
            .and_then(|delta| min.checked_add(delta))
            .ok_or_else(overflow)?;

        Ok(preferred.clamp(min.min(max), min.max(max)))
    }
}

fn to_decimal(size: &str) -> Result<Decimal, PreviewError> {
    let (sign, digits) = match size.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", size),
    };
    let digits = digits.strip_suffix('.').unwrap_or(digits);
    let normalized = if digits.starts_with('.') {
        format!("{sign}0{digits}")
    } else {
        format!("{sign}{digits}")
    };
    Decimal::from_str(&normalized).map_err(|_| PreviewError::InvalidNumber(size.to_string()))
}

/// Encoder bound to the environment's viewport references.
#[derive(Debug, Clone, Default)]
pub struct ClampCodec {
    refs: ViewportRefs,
}

impl ClampCodec {
    pub fn new(refs: ViewportRefs) -> Self {
        Self { refs }
    }

    pub fn refs(&self) -> &ViewportRefs {
        &self.refs
    }

    pub fn encode(&self, min_size: &str, min_unit: &str, max_size: &str, max_unit: &str) -> String {
        let min = format!("{min_size}{min_unit}");
        let max = format!("{max_size}{max_unit}");
        format!(
            "clamp(min({min}, {max}), calc({min} + ({max_size} - {min_size}) * ((100vw - {}) / {})), max({min}, {max}))",
            self.refs.min_screen, self.refs.screen_diff
        )
    }

    pub fn encode_pair(&self, min: &SizeUnit, max: &SizeUnit) -> String {
        self.encode(&min.size, &min.unit, &max.size, &max.unit)
    }
}

/// True when `value` is an inline clamp formula rather than a preset reference or plain size.
pub fn is_encoded_value(value: &str) -> bool {
    value.starts_with(FORMULA_PREFIX)
}

/// [`is_encoded_value`] for stored JSON values; anything but a string is not a formula.
pub fn is_encoded_json(value: &serde_json::Value) -> bool {
    value.as_str().is_some_and(is_encoded_value)
}

/// Recover the min/max endpoints of a clamp formula.
///
/// `min()` orders its operands by magnitude, not by role, so the endpoint that the
/// preferred value interpolates from is identified by matching it against the
/// `calc(<base> + ...)` term. When neither operand matches, the first one is taken
/// as the minimum.
pub fn decode(formula: &str) -> Option<ClampValues> {
    if !is_encoded_value(formula) {
        return None;
    }

    let caps = ENVELOPE_RE.captures(formula)?;
    let first = caps.get(1)?.as_str();
    let second = caps.get(2)?.as_str();

    let base = BASE_TERM_RE
        .captures(formula)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());

    let (min, max) = match base {
        Some(base) if base == first => (first, second),
        Some(base) if base == second => (second, first),
        _ => {
            log::debug!("Base term of '{formula}' matches neither operand; taking '{first}' as min");
            (first, second)
        }
    };

    let (min_size, min_unit) = split_numeral(min)?;
    let (max_size, max_unit) = split_numeral(max)?;

    Some(ClampValues {
        min_size: min_size.to_string(),
        min_unit: min_unit.to_string(),
        max_size: max_size.to_string(),
        max_unit: max_unit.to_string(),
    })
}

/// Split `-?[\d.]+` off the front of a token; the rest is the unit, whatever it is.
fn split_numeral(token: &str) -> Option<(&str, &str)> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    let len = digits
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(digits.len());
    if len == 0 {
        return None;
    }
    Some(token.split_at(token.len() - digits.len() + len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use rust_decimal_macros::dec;

    fn values(min_size: &str, min_unit: &str, max_size: &str, max_unit: &str) -> ClampValues {
        ClampValues {
            min_size: min_size.to_string(),
            min_unit: min_unit.to_string(),
            max_size: max_size.to_string(),
            max_unit: max_unit.to_string(),
        }
    }

    #[test]
    fn test_encode_format() {
        let codec = ClampCodec::default();
        assert_snapshot!(
            codec.encode("16", "px", "24", "px"),
            @"clamp(min(16px, 24px), calc(16px + (24 - 16) * ((100vw - var(--min-screen)) / var(--screen-diff))), max(16px, 24px))"
        );
    }

    #[test]
    fn test_encode_uses_environment_refs() {
        let codec = ClampCodec::new(ViewportRefs {
            min_screen: "var(--e-min-screen)".to_string(),
            screen_diff: "var(--e-screen-diff)".to_string(),
        });
        let formula = codec.encode("1", "rem", "2", "rem");
        assert!(formula.contains("(100vw - var(--e-min-screen)) / var(--e-screen-diff)"));
        assert!(formula.contains("min(1rem, 2rem)"));
        assert!(formula.contains("max(1rem, 2rem)"));
    }

    #[test]
    fn test_decode_example() {
        let codec = ClampCodec::default();
        let formula = codec.encode("16", "px", "24", "px");
        assert_eq!(decode(&formula), Some(values("16", "px", "24", "px")));
    }

    #[test]
    fn test_round_trip() {
        let codec = ClampCodec::default();
        for (min_size, min_unit, max_size, max_unit) in [
            ("16", "px", "24", "px"),
            ("24", "px", "16", "px"),
            ("1.50", "rem", "3", "rem"),
            ("-8", "px", "8", "px"),
            ("8", "px", "-8", "px"),
            ("0", "px", "2.5", "vw"),
            ("12", "PX", "2", "Rem"),
            ("50", "%", "75", "%"),
            (".5", "em", "3.", "em"),
            ("10", "", "20", ""),
        ] {
            let formula = codec.encode(min_size, min_unit, max_size, max_unit);
            assert_eq!(
                decode(&formula),
                Some(values(min_size, min_unit, max_size, max_unit)),
                "formula {}",
                formula
            );
        }
    }

    #[test]
    fn test_decode_recovers_roles_from_base_term() {
        // Operands sorted by magnitude while the base term still names 24px as min.
        let formula = "clamp(min(16px, 24px), calc(24px + (16 - 24) * ((100vw - 320px) / 1120)), max(16px, 24px))";
        assert_eq!(decode(formula), Some(values("24", "px", "16", "px")));
    }

    #[test]
    fn test_decode_falls_back_to_first_operand() {
        let formula = "clamp(min(10px, 30px), calc(1rem + 2vw), max(10px, 30px))";
        assert_eq!(decode(formula), Some(values("10", "px", "30", "px")));

        let no_calc = "clamp(min(10px, 30px), 20px, max(10px, 30px))";
        assert_eq!(decode(no_calc), Some(values("10", "px", "30", "px")));
    }

    #[test]
    fn test_decode_rejects_non_formulas() {
        for input in [
            "",
            "16px",
            "preset-heading",
            " clamp(min(1px, 2px), calc(1px + 1), max(1px, 2px))",
            "clamp(1px, 2vw, 3px)",
            "clamp(min(px, 2px), calc(px + 1), max(px, 2px))",
            "min(1px, 2px)",
        ] {
            assert_eq!(decode(input), None, "input '{}'", input);
        }
    }

    #[test]
    fn test_is_encoded_value() {
        assert!(is_encoded_value("clamp(anything"));
        assert!(!is_encoded_value("16px"));
        assert!(!is_encoded_value("Clamp(min(1px, 2px))"));
        assert!(is_encoded_json(&serde_json::json!("clamp(min(1px, 2px))")));
        assert!(!is_encoded_json(&serde_json::json!({"size": "clamp("})));
        assert!(!is_encoded_json(&serde_json::json!(12)));
    }

    #[test]
    fn test_evaluate() {
        let v = values("16", "px", "24", "px");
        assert_eq!(v.evaluate(dec!(320), dec!(320), dec!(1440)), Ok(dec!(16)));
        assert_eq!(v.evaluate(dec!(880), dec!(320), dec!(1440)), Ok(dec!(20)));
        assert_eq!(v.evaluate(dec!(1440), dec!(320), dec!(1440)), Ok(dec!(24)));
        // Clamped outside the reference range.
        assert_eq!(v.evaluate(dec!(100), dec!(320), dec!(1440)), Ok(dec!(16)));
        assert_eq!(v.evaluate(dec!(2000), dec!(320), dec!(1440)), Ok(dec!(24)));
    }

    #[test]
    fn test_evaluate_inverted_stays_in_envelope() {
        let v = values("24", "px", "16", "px");
        assert_eq!(v.evaluate(dec!(880), dec!(320), dec!(1440)), Ok(dec!(20)));
        assert_eq!(v.evaluate(dec!(0), dec!(320), dec!(1440)), Ok(dec!(24)));
        assert_eq!(v.evaluate(dec!(5000), dec!(320), dec!(1440)), Ok(dec!(16)));
    }

    #[test]
    fn test_evaluate_errors() {
        assert_eq!(
            values("1", "rem", "24", "px").evaluate(dec!(500), dec!(320), dec!(1440)),
            Err(PreviewError::MixedUnits {
                min_unit: "rem".to_string(),
                max_unit: "px".to_string(),
            })
        );
        assert!(matches!(
            values("1", "px", "2", "px").evaluate(dec!(500), dec!(800), dec!(800)),
            Err(PreviewError::EmptyViewport { .. })
        ));
        assert_eq!(
            values("1.2.3", "px", "2", "px").evaluate(dec!(500), dec!(320), dec!(1440)),
            Err(PreviewError::InvalidNumber("1.2.3".to_string()))
        );
        assert_eq!(
            values(".5", "PX", "1.", "px").evaluate(dec!(320), dec!(320), dec!(1440)),
            Ok(dec!(0.5))
        );
    }

    #[test]
    fn test_evaluate_out_of_range_is_an_error() {
        let (min, max) = crate::unit::validate_pair(
            "-70000000000000000000000000000px",
            "70000000000000000000000000000px",
        )
        .unwrap();
        let v = values(&min.size, &min.unit, &max.size, &max.unit);
        assert!(matches!(
            v.evaluate(dec!(880), dec!(320), dec!(1440)),
            Err(PreviewError::Overflow { .. })
        ));
    }
}
