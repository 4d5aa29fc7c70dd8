//! Bounded per-model quantity.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Number of units surveyed for a model, always within `[1, 999]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(u16);

impl Quantity {
    pub const MIN: u16 = 1;
    pub const MAX: u16 = 999;

    /// Strict constructor, `None` outside the allowed range.
    pub fn new(value: u16) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// Interprets free-form input: unparsable or non-positive values fall back
    /// to 1, values above the maximum are capped.
    pub fn parse_lenient(input: &str) -> Self {
        match input.trim().parse::<i64>() {
            Ok(value) if value >= i64::from(Self::MIN) => {
                Self(value.min(i64::from(Self::MAX)) as u16)
            }
            _ => Self::default(),
        }
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-model quantities; models without an entry read as the default.
#[derive(Debug, Clone, Default)]
pub struct Quantities {
    values: HashMap<String, Quantity>,
}

impl Quantities {
    pub fn get(&self, model: &str) -> Quantity {
        self.values.get(model).copied().unwrap_or_default()
    }

    pub fn set(&mut self, model: impl Into<String>, quantity: Quantity) {
        self.values.insert(model.into(), quantity);
    }

    pub fn remove(&mut self, model: &str) {
        self.values.remove(model);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_range() {
        assert!(Quantity::new(0).is_none());
        assert_eq!(Quantity::new(1).map(Quantity::get), Some(1));
        assert_eq!(Quantity::new(999).map(Quantity::get), Some(999));
        assert!(Quantity::new(1000).is_none());
    }

    #[test]
    fn test_lenient_parse() {
        assert_eq!(Quantity::parse_lenient("12").get(), 12);
        assert_eq!(Quantity::parse_lenient(" 7 ").get(), 7);
        assert_eq!(Quantity::parse_lenient("").get(), 1);
        assert_eq!(Quantity::parse_lenient("abc").get(), 1);
        assert_eq!(Quantity::parse_lenient("0").get(), 1);
        assert_eq!(Quantity::parse_lenient("-4").get(), 1);
        assert_eq!(Quantity::parse_lenient("5000").get(), 999);
    }

    #[test]
    fn test_unset_model_reads_default() {
        let mut quantities = Quantities::default();
        assert_eq!(quantities.get("X100").get(), 1);

        quantities.set("X100", Quantity::parse_lenient("3"));
        assert_eq!(quantities.get("X100").get(), 3);

        quantities.remove("X100");
        assert_eq!(quantities.get("X100").get(), 1);
    }
}
