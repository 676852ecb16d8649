//! Fixed-point money values
//!
//! Every bucket value is normalized to 5 fractional digits with
//! round-half-away-from-zero before it takes part in any sum, so totals are
//! reproducible from the visible columns.

use crate::error::{ArError, ArResult};
use crate::types::Cell;
use regex::Regex;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Fractional digits kept by [`Amount`]
pub const SCALE: u32 = 5;

/// A monetary value fixed at [`SCALE`] fractional digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(Decimal);

impl Amount {
    /// Round `value` half-up to [`SCALE`] digits
    pub fn new(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(SCALE);
        Self(rounded)
    }

    pub fn zero() -> Self {
        Self::new(Decimal::ZERO)
    }

    /// Coerce a raw cell; blank or unparseable cells become zero
    pub fn from_cell(cell: &Cell, parser: &NumberParser) -> Self {
        parser.parse(cell).map(Self::new).unwrap_or_else(Self::zero)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Lossy conversion for writers that only store binary floats
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Exact sum, or `None` when it leaves the decimal range
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount::new)
    }

    /// Exact sum of `amounts`, or `None` on overflow
    pub fn checked_sum<'a, I>(amounts: I) -> Option<Amount>
    where
        I: IntoIterator<Item = &'a Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::zero(), |acc, x| acc.checked_add(*x))
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Recognizes numeric cells, including numbers stored as text
///
/// Accepted text forms: `-12.5`, `1,234.50`, `1.5e3`.
pub struct NumberParser {
    plain: Regex,
    grouped: Regex,
    scientific: Regex,
}

impl NumberParser {
    pub fn new() -> ArResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| ArError::Import(format!("Regex error: {}", e)))
        };
        Ok(Self {
            plain: compile(r"^[+-]?(\d+(\.\d*)?|\.\d+)$")?,
            grouped: compile(r"^[+-]?\d{1,3}(,\d{3})+(\.\d*)?$")?,
            scientific: compile(r"^[+-]?(\d+(\.\d*)?|\.\d+)[eE][+-]?\d+$")?,
        })
    }

    /// Exact decimal value of a cell, if it holds a number
    pub fn parse(&self, cell: &Cell) -> Option<Decimal> {
        match cell {
            Cell::Int(i) => Some(Decimal::from(*i)),
            Cell::Number(f) if f.is_finite() => {
                // Shortest round-trip text keeps 10.000005 as written.
                Decimal::from_str(&f.to_string())
                    .ok()
                    .or_else(|| Decimal::from_f64(*f))
            }
            Cell::Text(s) => self.parse_text(s),
            _ => None,
        }
    }

    pub fn is_numeric(&self, cell: &Cell) -> bool {
        self.parse(cell).is_some()
    }

    fn parse_text(&self, text: &str) -> Option<Decimal> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if self.plain.is_match(text) || self.grouped.is_match(text) {
            return Decimal::from_str(&canonical_digits(&text.replace(',', ""))).ok();
        }

        if self.scientific.is_match(text) {
            let lowered = text.to_lowercase();
            let (mantissa, exponent) = lowered.split_once('e')?;
            return Decimal::from_scientific(&format!(
                "{}e{}",
                canonical_digits(mantissa),
                exponent
            ))
            .ok();
        }

        None
    }
}

/// Rewrite `+.5` / `5.` forms to `0.5` / `5` so every decimal parser accepts them
fn canonical_digits(text: &str) -> String {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let mut digits = digits.trim_end_matches('.').to_string();
    if digits.starts_with('.') {
        digits.insert(0, '0');
    }
    if negative {
        digits.insert(0, '-');
    }
    digits
}
