//! Error types for regexml
//!
//! This module provides error handling using the `thiserror` crate.
//! Errors are categorized by their source: resources, schema validation,
//! document structure, registry lookups and regex compilation.

use thiserror::Error;

/// The main error type for regexml
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegexmlError {
    /// The input document (or another resource) could not be opened
    #[error("resource not found: {name} ({reason})")]
    ResourceNotFound {
        /// Name of the resource
        name: String,
        /// Why the resource could not be opened
        reason: String,
    },

    /// The document does not conform to the regexml schema
    #[error("error validating document {name}: {source}")]
    SchemaValidation {
        /// Name of the validated resource
        name: String,
        /// The underlying validation failure
        #[source]
        source: SchemaError,
    },

    /// The document could not be translated
    #[error("malformed document: {0}")]
    MalformedDocument(#[from] DocumentError),

    /// No expression is registered under the requested id
    #[error("expression not found: {0}")]
    ExpressionNotFound(String),

    /// The translated pattern was rejected by the regex engine
    #[error("failed to compile expression '{id}' from `{pattern}`: {reason}")]
    PatternCompilationFailed {
        /// Id of the expression
        id: String,
        /// The pattern handed to the engine
        pattern: String,
        /// The engine's error message
        reason: String,
    },
}

/// Structural problems found while translating a document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// The XML stream could not be decoded
    #[error("xml error: {0}")]
    Xml(String),

    /// An attribute carries a value of the wrong shape
    #[error("invalid value '{value}' for attribute '{attribute}' on <{element}>, expected {expected}")]
    InvalidAttribute {
        /// The element carrying the attribute
        element: String,
        /// The attribute name
        attribute: String,
        /// The offending value
        value: String,
        /// Human readable description of the accepted values
        expected: &'static str,
    },

    /// A required attribute is absent
    #[error("missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        /// The element missing the attribute
        element: String,
        /// The attribute name
        attribute: &'static str,
    },

    /// A pattern element appeared outside of an `<expression>`
    #[error("<{element}> is only allowed inside an <expression>")]
    OutsideExpression {
        /// The misplaced element
        element: String,
    },

    /// An `<expression>` was opened inside another one
    #[error("expression nested inside expression '{id}'")]
    NestedExpression {
        /// Id of the enclosing expression
        id: String,
    },

    /// An expression ended while groups were still open
    #[error("expression '{id}' ended with {depth} unclosed group(s)")]
    UnclosedGroup {
        /// Id of the expression
        id: String,
        /// Number of groups left open
        depth: usize,
    },

    /// A group was closed that was never opened
    #[error("unbalanced group end in expression '{id}'")]
    UnbalancedGroup {
        /// Id of the expression
        id: String,
    },

    /// The document ended inside an expression
    #[error("document ended inside expression '{id}'")]
    UnterminatedExpression {
        /// Id of the expression
        id: String,
    },
}

/// Reasons a document fails schema validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The document could not be read as XML
    #[error("unreadable document: {0}")]
    Unreadable(String),

    /// The root element is not `<regexml>`
    #[error("root element must be <{expected}>, found <{found}>")]
    RootElement {
        /// The element the schema requires
        expected: &'static str,
        /// The element found
        found: String,
    },

    /// The element is not part of the vocabulary
    #[error("unknown element <{0}>")]
    UnknownElement(String),

    /// The element is not allowed under its parent
    #[error("<{element}> is not allowed inside <{parent}>")]
    MisplacedElement {
        /// The misplaced element
        element: String,
        /// Its parent
        parent: String,
    },

    /// The attribute is not declared for the element
    #[error("unknown attribute '{attribute}' on <{element}>")]
    UnknownAttribute {
        /// The element
        element: String,
        /// The undeclared attribute
        attribute: String,
    },

    /// The attribute value does not have the declared type
    #[error("invalid value '{value}' for attribute '{attribute}' on <{element}>, expected {expected}")]
    InvalidValue {
        /// The element
        element: String,
        /// The attribute
        attribute: String,
        /// The offending value
        value: String,
        /// Description of the declared type
        expected: &'static str,
    },

    /// A required attribute is absent
    #[error("missing required attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        /// The element
        element: String,
        /// The attribute
        attribute: &'static str,
    },

    /// The document contains no root element
    #[error("document is empty")]
    Empty,
}

/// Result type alias for regexml operations
pub type Result<T> = std::result::Result<T, RegexmlError>;
