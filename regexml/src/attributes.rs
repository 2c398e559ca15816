//! Typed access to the attributes of a start element

use std::str::FromStr;

use crate::error::{DocumentError, RegexmlError, Result};
use crate::event::Attribute;

pub(crate) const EXPECTED_BOOLEAN: &str = "a boolean (true, false, 1, 0)";
pub(crate) const EXPECTED_COUNT: &str = "a non-negative integer";
pub(crate) const EXPECTED_BOUND: &str = "a non-negative integer or '*'";
pub(crate) const EXPECTED_OPERATOR: &str = "'and' or 'or'";
pub(crate) const EXPECTED_LOOKAROUND: &str = "'none', 'positive' or 'negative'";

/// Parse an `xs:boolean` value
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Attributes of one element, looked up by local name
pub(crate) struct Attributes<'a> {
    element: &'a str,
    attributes: &'a [Attribute],
}

impl<'a> Attributes<'a> {
    pub(crate) fn new(element: &'a str, attributes: &'a [Attribute]) -> Self {
        Attributes {
            element,
            attributes,
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<&'a str> {
        self.attributes
            .iter()
            .find(|a| !a.is_prefixed() && a.local_name() == name)
            .map(|a| a.value.as_str())
    }

    pub(crate) fn required(&self, name: &'static str) -> Result<&'a str> {
        self.get(name).ok_or_else(|| {
            DocumentError::MissingAttribute {
                element: self.element.to_string(),
                attribute: name,
            }
            .into()
        })
    }

    /// A boolean attribute defaulting to false
    pub(crate) fn flag(&self, name: &str) -> Result<bool> {
        Ok(self.tristate(name)?.unwrap_or(false))
    }

    /// A boolean attribute that may be left unset
    pub(crate) fn tristate(&self, name: &str) -> Result<Option<bool>> {
        self.get(name)
            .map(|value| {
                parse_bool(value).ok_or_else(|| self.invalid(name, value, EXPECTED_BOOLEAN))
            })
            .transpose()
    }

    /// Parse an attribute with `FromStr`, falling back to `default` when absent
    pub(crate) fn parse<T: FromStr>(
        &self,
        name: &str,
        default: T,
        expected: &'static str,
    ) -> Result<T> {
        match self.get(name) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| self.invalid(name, value, expected)),
            None => Ok(default),
        }
    }

    fn invalid(&self, name: &str, value: &str, expected: &'static str) -> RegexmlError {
        DocumentError::InvalidAttribute {
            element: self.element.to_string(),
            attribute: name.to_string(),
            value: value.to_string(),
            expected,
        }
        .into()
    }
}
