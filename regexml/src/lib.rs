//! Regexml Library
//!
//! Builds regular expressions from structured XML documents. Each
//! `<expression>` of a document is translated into regex syntax, compiled
//! with `fancy-regex` and stored in an [`ExpressionRegistry`].

mod attributes;
pub mod error;
pub mod escape;
pub mod event;
pub mod expression;
pub mod frame;
pub mod quantifier;
pub mod registry;
pub mod resource;
pub mod schema;
pub mod translator;

pub use error::{DocumentError, RegexmlError, Result, SchemaError};
pub use escape::escape;
pub use event::{Attribute, Event, EventSource, XmlEventReader};
pub use expression::{Expression, Flags, Translation};
pub use frame::{GroupFrame, Lookaround, Operator};
pub use quantifier::{Quantifier, Quantity, translate_quantifier};
pub use registry::{ExpressionRegistry, LoadOptions};
pub use resource::{EmbeddedResource, FileResource, Resource};
pub use schema::Schema;
pub use translator::Translator;

/// Translate every expression of an XML document into regex syntax
///
/// This is the main entry point when only the regex strings are needed.
/// Use [`ExpressionRegistry`] to also compile them.
pub fn translate(xml: &str) -> Result<Vec<Translation>> {
    Translator::new().translate(&mut XmlEventReader::from_xml(xml))
}
