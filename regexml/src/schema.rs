//! Schema validation
//!
//! The regexml vocabulary is small enough to describe as a table: which
//! elements exist, where they may appear and which typed attributes they
//! accept. [`Schema::validate`] checks an event stream against that table
//! before any translation happens.

use crate::attributes::{
    EXPECTED_BOOLEAN, EXPECTED_BOUND, EXPECTED_COUNT, EXPECTED_LOOKAROUND, EXPECTED_OPERATOR,
    parse_bool,
};
use crate::error::SchemaError;
use crate::event::{Event, EventSource};
use crate::frame::{Lookaround, Operator};
use crate::quantifier::Quantity;
use crate::translator::{
    ATTR_ANCHORS_MATCH_LINE_BREAKS, ATTR_ATOMIC, ATTR_AUTO_ESCAPE, ATTR_CAPTURE,
    ATTR_DOT_MATCHES_LINE_BREAKS, ATTR_EQUALS, ATTR_EXCEPT, ATTR_ID, ATTR_IGNORE_CASE, ATTR_LAZY,
    ATTR_LOOKAHEAD, ATTR_LOOKBEHIND, ATTR_MATCH_LINE_BREAKS, ATTR_MAX, ATTR_MIN, ATTR_OPERATOR,
    ELEMENT_END, ELEMENT_EXPRESSION, ELEMENT_GROUP, ELEMENT_MATCH, ELEMENT_REGEXML, ELEMENT_START,
};

/// Declared type of an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    /// Any text
    Text,
    /// `true`, `false`, `1` or `0`
    Boolean,
    /// A non-negative integer
    Count,
    /// A non-negative integer or `*`
    Bound,
    /// `and` or `or`
    Operator,
    /// `none`, `positive` or `negative`
    Lookaround,
}

impl AttributeType {
    fn accepts(self, value: &str) -> bool {
        match self {
            AttributeType::Text => true,
            AttributeType::Boolean => parse_bool(value).is_some(),
            AttributeType::Count => value.trim().parse::<u32>().is_ok(),
            AttributeType::Bound => value.parse::<Quantity>().is_ok(),
            AttributeType::Operator => value.parse::<Operator>().is_ok(),
            AttributeType::Lookaround => value.parse::<Lookaround>().is_ok(),
        }
    }

    fn expected(self) -> &'static str {
        match self {
            AttributeType::Text => "text",
            AttributeType::Boolean => EXPECTED_BOOLEAN,
            AttributeType::Count => EXPECTED_COUNT,
            AttributeType::Bound => EXPECTED_BOUND,
            AttributeType::Operator => EXPECTED_OPERATOR,
            AttributeType::Lookaround => EXPECTED_LOOKAROUND,
        }
    }
}

/// A declared attribute
#[derive(Debug, Clone, Copy)]
pub struct AttributeRule {
    /// Attribute name
    pub name: &'static str,
    /// Value type
    pub kind: AttributeType,
    /// Whether the attribute must be present
    pub required: bool,
}

const fn optional(name: &'static str, kind: AttributeType) -> AttributeRule {
    AttributeRule {
        name,
        kind,
        required: false,
    }
}

/// A declared element
#[derive(Debug, Clone, Copy)]
pub struct ElementRule {
    /// Element name
    pub name: &'static str,
    /// Allowed parents; empty for the root element
    pub parents: &'static [&'static str],
    /// Declared attributes
    pub attributes: &'static [AttributeRule],
}

const PATTERN_PARENTS: &[&str] = &[ELEMENT_EXPRESSION, ELEMENT_GROUP];

const REGEXML_ELEMENTS: &[ElementRule] = &[
    ElementRule {
        name: ELEMENT_REGEXML,
        parents: &[],
        attributes: &[optional(ATTR_AUTO_ESCAPE, AttributeType::Boolean)],
    },
    ElementRule {
        name: ELEMENT_EXPRESSION,
        parents: &[ELEMENT_REGEXML],
        attributes: &[
            AttributeRule {
                name: ATTR_ID,
                kind: AttributeType::Text,
                required: true,
            },
            optional(ATTR_IGNORE_CASE, AttributeType::Boolean),
            optional(ATTR_DOT_MATCHES_LINE_BREAKS, AttributeType::Boolean),
            optional(ATTR_ANCHORS_MATCH_LINE_BREAKS, AttributeType::Boolean),
        ],
    },
    ElementRule {
        name: ELEMENT_START,
        parents: PATTERN_PARENTS,
        attributes: &[optional(ATTR_MATCH_LINE_BREAKS, AttributeType::Boolean)],
    },
    ElementRule {
        name: ELEMENT_END,
        parents: PATTERN_PARENTS,
        attributes: &[optional(ATTR_MATCH_LINE_BREAKS, AttributeType::Boolean)],
    },
    ElementRule {
        name: ELEMENT_MATCH,
        parents: PATTERN_PARENTS,
        attributes: &[
            optional(ATTR_EQUALS, AttributeType::Text),
            optional(ATTR_EXCEPT, AttributeType::Text),
            optional(ATTR_MIN, AttributeType::Count),
            optional(ATTR_MAX, AttributeType::Bound),
            optional(ATTR_CAPTURE, AttributeType::Boolean),
            optional(ATTR_IGNORE_CASE, AttributeType::Boolean),
            optional(ATTR_DOT_MATCHES_LINE_BREAKS, AttributeType::Boolean),
            optional(ATTR_LAZY, AttributeType::Boolean),
            optional(ATTR_ATOMIC, AttributeType::Boolean),
            optional(ATTR_LOOKAHEAD, AttributeType::Lookaround),
            optional(ATTR_LOOKBEHIND, AttributeType::Lookaround),
        ],
    },
    ElementRule {
        name: ELEMENT_GROUP,
        parents: PATTERN_PARENTS,
        attributes: &[
            optional(ATTR_MIN, AttributeType::Count),
            optional(ATTR_MAX, AttributeType::Bound),
            optional(ATTR_CAPTURE, AttributeType::Boolean),
            optional(ATTR_IGNORE_CASE, AttributeType::Boolean),
            optional(ATTR_DOT_MATCHES_LINE_BREAKS, AttributeType::Boolean),
            optional(ATTR_ANCHORS_MATCH_LINE_BREAKS, AttributeType::Boolean),
            optional(ATTR_OPERATOR, AttributeType::Operator),
            optional(ATTR_LAZY, AttributeType::Boolean),
            optional(ATTR_ATOMIC, AttributeType::Boolean),
            optional(ATTR_LOOKAHEAD, AttributeType::Lookaround),
            optional(ATTR_LOOKBEHIND, AttributeType::Lookaround),
        ],
    },
];

/// A document schema
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    root: &'static str,
    elements: &'static [ElementRule],
}

impl Schema {
    /// The schema of regexml documents
    pub fn regexml() -> Self {
        Schema {
            root: ELEMENT_REGEXML,
            elements: REGEXML_ELEMENTS,
        }
    }

    /// Look up the rule for an element
    pub fn element(&self, name: &str) -> Option<&'static ElementRule> {
        self.elements.iter().find(|rule| rule.name == name)
    }

    /// Validate a complete event stream
    pub fn validate<S: EventSource + ?Sized>(&self, source: &mut S) -> Result<(), SchemaError> {
        let mut open: Vec<&'static str> = Vec::new();
        let mut seen_root = false;

        while let Some(event) = source
            .next_event()
            .map_err(|err| SchemaError::Unreadable(err.to_string()))?
        {
            match event {
                Event::Start { name, attributes } => {
                    let rule = self
                        .element(&name)
                        .ok_or_else(|| SchemaError::UnknownElement(name.clone()))?;

                    match open.last() {
                        None if seen_root || rule.name != self.root => {
                            return Err(SchemaError::RootElement {
                                expected: self.root,
                                found: name,
                            });
                        }
                        Some(parent) if !rule.parents.contains(parent) => {
                            return Err(SchemaError::MisplacedElement {
                                element: name,
                                parent: parent.to_string(),
                            });
                        }
                        _ => {}
                    }
                    seen_root = true;

                    for attribute in attributes.iter().filter(|a| !a.is_prefixed()) {
                        let declared = rule
                            .attributes
                            .iter()
                            .find(|r| r.name == attribute.name)
                            .ok_or_else(|| SchemaError::UnknownAttribute {
                                element: name.clone(),
                                attribute: attribute.name.clone(),
                            })?;
                        if !declared.kind.accepts(&attribute.value) {
                            return Err(SchemaError::InvalidValue {
                                element: name.clone(),
                                attribute: attribute.name.clone(),
                                value: attribute.value.clone(),
                                expected: declared.kind.expected(),
                            });
                        }
                    }

                    if let Some(missing) = rule
                        .attributes
                        .iter()
                        .filter(|r| r.required)
                        .find(|r| !attributes.iter().any(|a| a.name == r.name))
                    {
                        return Err(SchemaError::MissingAttribute {
                            element: name,
                            attribute: missing.name,
                        });
                    }

                    open.push(rule.name);
                }
                Event::End { .. } => {
                    open.pop();
                }
            }
        }

        if seen_root { Ok(()) } else { Err(SchemaError::Empty) }
    }
}
