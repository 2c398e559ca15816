//! Quantifier mapping
//!
//! Converts `min`/`max` attribute pairs into the shortest regex quantifier:
//! `?`, `*`, `+`, `{m}`, `{m,}` or `{m,n}`, optionally made lazy.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

/// Upper bound of a repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// A fixed number of repetitions
    Count(u32),
    /// No upper bound (`*`)
    Unbounded,
}

impl FromStr for Quantity {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "*" {
            Ok(Quantity::Unbounded)
        } else {
            s.parse().map(Quantity::Count)
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Count(n) => write!(f, "{}", n),
            Quantity::Unbounded => write!(f, "*"),
        }
    }
}

/// A repetition range read from `min`/`max` attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantifier {
    /// Minimum number of repetitions
    pub min: u32,
    /// Maximum number of repetitions
    pub max: Quantity,
}

impl Default for Quantifier {
    fn default() -> Self {
        Quantifier::ONCE
    }
}

impl Quantifier {
    /// Exactly one occurrence; emits no quantifier
    pub const ONCE: Quantifier = Quantifier {
        min: 1,
        max: Quantity::Count(1),
    };

    /// Create a quantifier, clamping a bounded `max` below `min` up to `min`
    pub fn new(min: u32, max: Quantity) -> Self {
        let max = match max {
            Quantity::Count(n) if n < min => {
                warn!(min, max = n, "max is below min, clamping max to min");
                Quantity::Count(min)
            }
            other => other,
        };
        Quantifier { min, max }
    }

    /// Convert the quantifier to regex syntax.
    ///
    /// Returns `None` for exactly-once. A lazy quantifier gets a trailing `?`.
    pub fn to_regex_string(&self, lazy: bool) -> Option<String> {
        let mut quantifier = match (self.min, self.max) {
            (1, Quantity::Count(1)) => return None,
            (0, Quantity::Count(1)) => "?".to_string(),
            (0, Quantity::Unbounded) => "*".to_string(),
            (1, Quantity::Unbounded) => "+".to_string(),
            (min, Quantity::Unbounded) => format!("{{{},}}", min),
            (min, Quantity::Count(max)) if max > min => format!("{{{},{}}}", min, max),
            (min, Quantity::Count(_)) => format!("{{{}}}", min),
        };
        if lazy {
            quantifier.push('?');
        }
        Some(quantifier)
    }
}

/// Translate a quantity pair straight to its regex quantifier.
///
/// Exactly-once yields an empty string.
///
/// # Example
/// ```
/// use regexml::quantifier::{translate_quantifier, Quantity};
///
/// assert_eq!(translate_quantifier(2, Quantity::Count(5), true), "{2,5}?");
/// assert_eq!(translate_quantifier(1, Quantity::Count(1), true), "");
/// ```
pub fn translate_quantifier(min: u32, max: Quantity, lazy: bool) -> String {
    Quantifier::new(min, max)
        .to_regex_string(lazy)
        .unwrap_or_default()
}
