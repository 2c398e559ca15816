//! Expression registry
//!
//! This module provides the registry that owns every compiled expression of a
//! document, keyed by expression id. It is populated once and then only read:
//! - Looking up expressions and compiled patterns by id
//! - Listing the ids in document order

use std::collections::HashMap;

use fancy_regex::Regex;
use tracing::{info, warn};

use crate::error::{RegexmlError, Result};
use crate::event::XmlEventReader;
use crate::expression::Expression;
use crate::resource::{EmbeddedResource, Resource};
use crate::schema::Schema;
use crate::translator::Translator;

/// Options controlling how a document is loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Validate the document against the regexml schema before translating
    pub validate: bool,
}

impl LoadOptions {
    /// Options with schema validation enabled
    pub fn validated() -> Self {
        LoadOptions { validate: true }
    }
}

/// Registry of compiled expressions
#[derive(Debug, Clone, Default)]
pub struct ExpressionRegistry {
    /// Expressions in document order
    expressions: Vec<Expression>,
    /// Map from expression id to position
    id_to_index: HashMap<String, usize>,
}

impl ExpressionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        ExpressionRegistry {
            expressions: Vec::new(),
            id_to_index: HashMap::new(),
        }
    }

    /// Load every expression of a document without validation
    pub fn load(resource: &dyn Resource) -> Result<Self> {
        Self::load_with(resource, LoadOptions::default())
    }

    /// Load every expression of a document.
    ///
    /// Any failure aborts the whole load; no partially populated registry is
    /// returned.
    pub fn load_with(resource: &dyn Resource, options: LoadOptions) -> Result<Self> {
        if options.validate {
            let mut events = XmlEventReader::new(resource.open()?);
            Schema::regexml()
                .validate(&mut events)
                .map_err(|source| RegexmlError::SchemaValidation {
                    name: resource.name().to_string(),
                    source,
                })?;
        }

        let mut events = XmlEventReader::new(resource.open()?);
        let translations = Translator::new().translate(&mut events)?;

        let mut registry = Self::new();
        for translation in translations {
            registry.insert(Expression::compile(translation)?);
        }

        info!(
            resource = resource.name(),
            expressions = registry.len(),
            "loaded expressions"
        );
        Ok(registry)
    }

    /// Load expressions from an in-memory document
    ///
    /// # Example
    /// ```
    /// use regexml::ExpressionRegistry;
    ///
    /// let xml = r#"<regexml><expression id="word"><match equals="\w" min="1" max="*"/></expression></regexml>"#;
    /// let registry = ExpressionRegistry::from_xml("inline", xml).unwrap();
    /// assert_eq!(registry.get_expression("word").unwrap().as_str(), "\\w+");
    /// ```
    pub fn from_xml(name: &str, xml: &str) -> Result<Self> {
        Self::load(&EmbeddedResource::new(name, xml.to_string()))
    }

    /// Register an expression, replacing and returning any previous one with the same id
    pub fn insert(&mut self, expression: Expression) -> Option<Expression> {
        match self.id_to_index.get(expression.id()) {
            Some(&index) => {
                warn!(id = expression.id(), "replacing previously registered expression");
                Some(std::mem::replace(&mut self.expressions[index], expression))
            }
            None => {
                self.id_to_index
                    .insert(expression.id().to_string(), self.expressions.len());
                self.expressions.push(expression);
                None
            }
        }
    }

    /// Get an expression by id
    pub fn get_expression(&self, id: &str) -> Result<&Expression> {
        self.id_to_index
            .get(id)
            .map(|&index| &self.expressions[index])
            .ok_or_else(|| RegexmlError::ExpressionNotFound(id.to_string()))
    }

    /// Get the compiled pattern of an expression by id
    pub fn get_pattern(&self, id: &str) -> Result<&Regex> {
        self.get_expression(id).map(Expression::pattern)
    }

    /// Check if an expression id exists
    pub fn contains(&self, id: &str) -> bool {
        self.id_to_index.contains_key(id)
    }

    /// Get the number of registered expressions
    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Expression ids in document order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.expressions.iter().map(Expression::id)
    }

    /// Iterate over expressions in document order
    pub fn iter(&self) -> impl Iterator<Item = &Expression> {
        self.expressions.iter()
    }
}

impl<'a> IntoIterator for &'a ExpressionRegistry {
    type Item = &'a Expression;
    type IntoIter = std::slice::Iter<'a, Expression>;

    fn into_iter(self) -> Self::IntoIter {
        self.expressions.iter()
    }
}
