//! Soil-test value extraction from recognized text
//!
//! Each nutrient has its own case-insensitive pattern: an optional full or
//! abbreviated label, an optional colon, optional whitespace, then a
//! mandatory unsigned ASCII numeral. Digits from other scripts (e.g.
//! Devanagari) never start a match. Patterns run independently over the whole
//! text and the leftmost match wins. A key whose pattern never matches is
//! reported as [`NutrientValue::NotFound`], never as zero.
//!
//! Matching is loose: any occurrence of the label letter
//! followed by a number counts, so e.g. "Top 5" yields P = 5.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

static NITROGEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)N(?:itrogen)?:?\s*([0-9]+\.?[0-9]*)").unwrap());

static PHOSPHORUS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)P(?:hosphorus)?:?\s*([0-9]+\.?[0-9]*)").unwrap());

static POTASSIUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)K(?:alium|Potassium)?:?\s*([0-9]+\.?[0-9]*)").unwrap());

static PH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)pH(?:\s*value)?:?\s*([0-9]+\.?[0-9]*)").unwrap());

/// Wire form of the sentinel
pub const NOT_FOUND: &str = "Not found";

/// One extracted reading
///
/// Serializes as a bare number, or the string `"Not found"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NutrientValue {
    Found(f64),
    NotFound,
}

impl NutrientValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            NutrientValue::Found(v) => Some(*v),
            NutrientValue::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, NutrientValue::Found(_))
    }
}

impl Serialize for NutrientValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NutrientValue::Found(v) => serializer.serialize_f64(*v),
            NutrientValue::NotFound => serializer.serialize_str(NOT_FOUND),
        }
    }
}

/// N, P, K and pH extracted from one document. All four are always present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientReading {
    #[serde(rename = "N")]
    pub nitrogen: NutrientValue,
    #[serde(rename = "P")]
    pub phosphorus: NutrientValue,
    #[serde(rename = "K")]
    pub potassium: NutrientValue,
    #[serde(rename = "pH")]
    pub ph: NutrientValue,
}

impl NutrientReading {
    /// Number of keys that matched
    pub fn found_count(&self) -> usize {
        [self.nitrogen, self.phosphorus, self.potassium, self.ph]
            .iter()
            .filter(|v| v.is_found())
            .count()
    }
}

/// Extract all four readings from recognized text
pub fn extract(text: &str) -> NutrientReading {
    NutrientReading {
        nitrogen: extract_value(text, &NITROGEN_RE),
        phosphorus: extract_value(text, &PHOSPHORUS_RE),
        potassium: extract_value(text, &POTASSIUM_RE),
        ph: extract_value(text, &PH_RE),
    }
}

fn extract_value(text: &str, pattern: &Regex) -> NutrientValue {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(NutrientValue::Found)
        .unwrap_or(NutrientValue::NotFound)
}
