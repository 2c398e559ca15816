//! Group frames
//!
//! Every open `<group>` is represented by one [`GroupFrame`] on the
//! translator's stack. The frame remembers what has to be emitted when the
//! group closes and how siblings inside it are joined.

use std::str::FromStr;

use crate::quantifier::Quantifier;

/// How sibling elements inside a group are composed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    /// Concatenation
    #[default]
    And,
    /// Alternation, siblings separated by `|`
    Or,
}

impl FromStr for Operator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("and") {
            Ok(Operator::And)
        } else if s.eq_ignore_ascii_case("or") {
            Ok(Operator::Or)
        } else {
            Err(())
        }
    }
}

/// Zero-width assertion mode for lookahead or lookbehind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lookaround {
    /// No assertion
    #[default]
    None,
    /// The context must match
    Positive,
    /// The context must not match
    Negative,
}

impl FromStr for Lookaround {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("none") {
            Ok(Lookaround::None)
        } else if s.eq_ignore_ascii_case("positive") {
            Ok(Lookaround::Positive)
        } else if s.eq_ignore_ascii_case("negative") {
            Ok(Lookaround::Negative)
        } else {
            Err(())
        }
    }
}

/// The assertion opener (without the leading paren) for a lookaround pair.
///
/// Lookahead wins when both are requested.
pub fn assertion_prefix(lookahead: Lookaround, lookbehind: Lookaround) -> Option<&'static str> {
    match (lookahead, lookbehind) {
        (Lookaround::Positive, _) => Some("?="),
        (Lookaround::Negative, _) => Some("?!"),
        (Lookaround::None, Lookaround::Positive) => Some("?<="),
        (Lookaround::None, Lookaround::Negative) => Some("?<!"),
        (Lookaround::None, Lookaround::None) => None,
    }
}

/// State of one open group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFrame {
    /// Repetition applied after the group closes
    pub quantifier: Quantifier,
    /// Composition of the group's children
    pub operator: Operator,
    /// Whether the quantifier is lazy
    pub lazy: bool,
    /// Whether the group is wrapped in an atomic group
    pub atomic: bool,
    /// Lookahead mode
    pub lookahead: Lookaround,
    /// Lookbehind mode
    pub lookbehind: Lookaround,
    /// Buffer offset where the group's opening sequence starts
    pub insertion_offset: usize,
    first_child_seen: bool,
}

impl GroupFrame {
    /// Create a frame for a group opened at `insertion_offset`
    pub fn new(insertion_offset: usize) -> Self {
        GroupFrame {
            quantifier: Quantifier::ONCE,
            operator: Operator::And,
            lazy: false,
            atomic: false,
            lookahead: Lookaround::None,
            lookbehind: Lookaround::None,
            insertion_offset,
            first_child_seen: false,
        }
    }

    /// The assertion opener wrapping this group, if any
    pub fn assertion(&self) -> Option<&'static str> {
        assertion_prefix(self.lookahead, self.lookbehind)
    }

    /// Register a new child and report whether a `|` must precede it
    pub fn enter_child(&mut self) -> bool {
        if !self.first_child_seen {
            self.first_child_seen = true;
            false
        } else {
            self.operator == Operator::Or
        }
    }
}
