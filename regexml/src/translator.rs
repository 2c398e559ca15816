//! Translation engine
//!
//! The [`Translator`] consumes structural events one at a time and builds the
//! regex for each `<expression>` incrementally. Nested groups are tracked on an
//! explicit stack of [`GroupFrame`]s; wrappers such as capture groups,
//! lookaround and atomic groups are inserted retroactively at the buffer
//! offset recorded when the element started.
//!
//! Wrapping order for a `<match>` (innermost first):
//!   quantifier -> scoped flags -> capture -> lookaround -> atomic

use tracing::{debug, trace};

use crate::attributes::{
    Attributes, EXPECTED_BOUND, EXPECTED_COUNT, EXPECTED_LOOKAROUND, EXPECTED_OPERATOR,
};
use crate::error::{DocumentError, Result};
use crate::escape::{escape_literal, is_bracketed, is_character_class};
use crate::event::{Event, EventSource};
use crate::expression::{Flags, Translation};
use crate::frame::{GroupFrame, Lookaround, Operator, assertion_prefix};
use crate::quantifier::{Quantifier, Quantity};

pub const ELEMENT_REGEXML: &str = "regexml";
pub const ELEMENT_EXPRESSION: &str = "expression";
pub const ELEMENT_START: &str = "start";
pub const ELEMENT_END: &str = "end";
pub const ELEMENT_MATCH: &str = "match";
pub const ELEMENT_GROUP: &str = "group";

pub const ATTR_AUTO_ESCAPE: &str = "autoEscape";
pub const ATTR_ID: &str = "id";
pub const ATTR_IGNORE_CASE: &str = "ignoreCase";
pub const ATTR_DOT_MATCHES_LINE_BREAKS: &str = "dotMatchesLineBreaks";
pub const ATTR_ANCHORS_MATCH_LINE_BREAKS: &str = "anchorsMatchLineBreaks";
pub const ATTR_MATCH_LINE_BREAKS: &str = "matchLineBreaks";
pub const ATTR_EQUALS: &str = "equals";
pub const ATTR_EXCEPT: &str = "except";
pub const ATTR_MIN: &str = "min";
pub const ATTR_MAX: &str = "max";
pub const ATTR_CAPTURE: &str = "capture";
pub const ATTR_LAZY: &str = "lazy";
pub const ATTR_ATOMIC: &str = "atomic";
pub const ATTR_OPERATOR: &str = "operator";
pub const ATTR_LOOKAHEAD: &str = "lookahead";
pub const ATTR_LOOKBEHIND: &str = "lookbehind";

/// Per-expression mutable state
#[derive(Debug)]
struct TranslationState {
    id: String,
    buffer: String,
    frames: Vec<GroupFrame>,
    flags: Flags,
    start_anchor_multiline: bool,
}

impl TranslationState {
    fn new(id: String, flags: Flags) -> Self {
        TranslationState {
            id,
            buffer: String::new(),
            frames: Vec::new(),
            flags,
            start_anchor_multiline: false,
        }
    }

    /// Emit `|` before a child of an `or` group (except the first one)
    fn separate_sibling(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            if frame.enter_child() {
                self.buffer.push('|');
            }
        }
    }

    /// Insert `open` at `offset` and append `close`
    fn wrap(&mut self, offset: usize, open: &str, close: &str) {
        self.buffer.insert_str(offset, open);
        self.buffer.push_str(close);
    }
}

/// Attributes of a `<match>` element
struct MatchSpec<'a> {
    equals: Option<&'a str>,
    except: Option<&'a str>,
    quantifier: Quantifier,
    capture: bool,
    ignore_case: bool,
    dot_all: bool,
    lazy: bool,
    atomic: bool,
    lookahead: Lookaround,
    lookbehind: Lookaround,
}

impl<'a> MatchSpec<'a> {
    fn read(attrs: &Attributes<'a>) -> Result<Self> {
        Ok(MatchSpec {
            equals: attrs.get(ATTR_EQUALS),
            except: attrs.get(ATTR_EXCEPT),
            quantifier: read_quantifier(attrs)?,
            capture: attrs.flag(ATTR_CAPTURE)?,
            ignore_case: attrs.flag(ATTR_IGNORE_CASE)?,
            dot_all: attrs.flag(ATTR_DOT_MATCHES_LINE_BREAKS)?,
            lazy: attrs.flag(ATTR_LAZY)?,
            atomic: attrs.flag(ATTR_ATOMIC)?,
            lookahead: attrs.parse(ATTR_LOOKAHEAD, Lookaround::None, EXPECTED_LOOKAROUND)?,
            lookbehind: attrs.parse(ATTR_LOOKBEHIND, Lookaround::None, EXPECTED_LOOKAROUND)?,
        })
    }
}

fn read_quantifier(attrs: &Attributes<'_>) -> Result<Quantifier> {
    let min = attrs.parse(ATTR_MIN, 1u32, EXPECTED_COUNT)?;
    let max = attrs.parse(ATTR_MAX, Quantity::Count(1), EXPECTED_BOUND)?;
    Ok(Quantifier::new(min, max))
}

/// Body of a class used as the left side of an intersection
fn intersection_body(equals: &str) -> &str {
    if is_bracketed(equals) && !equals.starts_with("[^") {
        &equals[1..equals.len() - 1]
    } else {
        equals
    }
}

/// Append the negated body of `except`, closing the class it continues
fn push_negated(buffer: &mut String, except: &str) {
    if is_bracketed(except) {
        buffer.push_str(&except[1..]);
    } else {
        buffer.push_str(except);
        buffer.push(']');
    }
}

/// Whether a literal needs `(?:...)` before a quantifier can apply to all of it
fn requires_grouping(equals: Option<&str>) -> bool {
    match equals {
        None => false,
        Some(text) => {
            let len = text.chars().count();
            let escape_pair = text.starts_with('\\') && len == 2;
            !(escape_pair || len == 1 || is_character_class(text))
        }
    }
}

/// Event-driven translator from regexml documents to regex strings.
///
/// One translator handles one document at a time.
///
/// # Example
/// ```
/// use regexml::event::XmlEventReader;
/// use regexml::translator::Translator;
///
/// let xml = r#"<regexml><expression id="digits">
///     <match equals="\d" min="1" max="*"/>
/// </expression></regexml>"#;
/// let translations = Translator::new()
///     .translate(&mut XmlEventReader::from_xml(xml))
///     .unwrap();
/// assert_eq!(translations[0].regex, "\\d+");
/// ```
#[derive(Debug)]
pub struct Translator {
    auto_escape: bool,
    state: Option<TranslationState>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    /// Create a translator with auto-escaping enabled
    pub fn new() -> Self {
        Translator {
            auto_escape: true,
            state: None,
        }
    }

    /// Whether literal text is currently escaped
    pub fn auto_escape(&self) -> bool {
        self.auto_escape
    }

    /// Translate every expression of a document, in document order
    pub fn translate<S: EventSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<Vec<Translation>> {
        self.auto_escape = true;
        self.state = None;

        let mut translations = Vec::new();
        while let Some(event) = source.next_event()? {
            if let Some(translation) = self.handle_event(&event)? {
                translations.push(translation);
            }
        }

        if let Some(state) = self.state.take() {
            return Err(DocumentError::UnterminatedExpression { id: state.id }.into());
        }
        Ok(translations)
    }

    /// Process a single event.
    ///
    /// Returns the finished translation when the event closes an expression.
    pub fn handle_event(&mut self, event: &Event) -> Result<Option<Translation>> {
        match event {
            Event::Start { name, attributes } => {
                let attrs = Attributes::new(name, attributes);
                match name.as_str() {
                    ELEMENT_REGEXML => self.start_document(&attrs)?,
                    ELEMENT_EXPRESSION => self.start_expression(&attrs)?,
                    ELEMENT_START => self.start_anchor(&attrs)?,
                    ELEMENT_END => self.end_anchor(&attrs)?,
                    ELEMENT_MATCH => self.handle_match(&attrs)?,
                    ELEMENT_GROUP => self.start_group(&attrs)?,
                    other => trace!(element = other, "ignoring unknown element"),
                }
                Ok(None)
            }
            Event::End { name } => match name.as_str() {
                ELEMENT_EXPRESSION => self.end_expression().map(Some),
                ELEMENT_GROUP => {
                    self.end_group()?;
                    Ok(None)
                }
                _ => Ok(None),
            },
        }
    }

    fn state_mut(&mut self, element: &str) -> Result<&mut TranslationState> {
        self.state.as_mut().ok_or_else(|| {
            DocumentError::OutsideExpression {
                element: element.to_string(),
            }
            .into()
        })
    }

    fn start_document(&mut self, attrs: &Attributes<'_>) -> Result<()> {
        self.auto_escape = attrs.tristate(ATTR_AUTO_ESCAPE)?.unwrap_or(true);
        Ok(())
    }

    fn start_expression(&mut self, attrs: &Attributes<'_>) -> Result<()> {
        if let Some(state) = &self.state {
            return Err(DocumentError::NestedExpression {
                id: state.id.clone(),
            }
            .into());
        }

        let id = attrs.required(ATTR_ID)?.to_string();
        let flags = Flags {
            ignore_case: attrs.flag(ATTR_IGNORE_CASE)?,
            dot_all: attrs.flag(ATTR_DOT_MATCHES_LINE_BREAKS)?,
            multiline: attrs.flag(ATTR_ANCHORS_MATCH_LINE_BREAKS)?,
        };
        self.state = Some(TranslationState::new(id, flags));
        Ok(())
    }

    fn end_expression(&mut self) -> Result<Translation> {
        let state = self
            .state
            .take()
            .ok_or_else(|| DocumentError::OutsideExpression {
                element: ELEMENT_EXPRESSION.to_string(),
            })?;

        if !state.frames.is_empty() {
            return Err(DocumentError::UnclosedGroup {
                id: state.id,
                depth: state.frames.len(),
            }
            .into());
        }

        debug!(
            id = %state.id,
            regex = %state.buffer,
            flags = %state.flags,
            "translated expression"
        );
        Ok(Translation {
            id: state.id,
            regex: state.buffer,
            flags: state.flags,
        })
    }

    fn start_anchor(&mut self, attrs: &Attributes<'_>) -> Result<()> {
        let match_line_breaks = attrs.flag(ATTR_MATCH_LINE_BREAKS)?;
        let state = self.state_mut(ELEMENT_START)?;
        if match_line_breaks {
            state.buffer.push_str("(?m)");
            state.start_anchor_multiline = true;
        }
        state.buffer.push('^');
        Ok(())
    }

    fn end_anchor(&mut self, attrs: &Attributes<'_>) -> Result<()> {
        let match_line_breaks = attrs.flag(ATTR_MATCH_LINE_BREAKS)?;
        let state = self.state_mut(ELEMENT_END)?;
        match (state.start_anchor_multiline, match_line_breaks) {
            (true, false) => state.buffer.push_str("(?-m)"),
            (false, true) => state.buffer.push_str("(?m)"),
            _ => {}
        }
        state.buffer.push('$');
        Ok(())
    }

    fn handle_match(&mut self, attrs: &Attributes<'_>) -> Result<()> {
        let auto_escape = self.auto_escape;
        let spec = MatchSpec::read(attrs)?;
        let state = self.state_mut(ELEMENT_MATCH)?;

        state.separate_sibling();
        let offset = state.buffer.len();

        let equals = spec.equals.map(|text| escape_literal(text, auto_escape));
        let except = spec.except.map(|text| escape_literal(text, auto_escape));

        match (equals.as_deref(), except.as_deref()) {
            (Some(equals), Some(except)) if is_character_class(equals) => {
                state.buffer.push('[');
                state.buffer.push_str(intersection_body(equals));
                state.buffer.push_str("&&[^");
                push_negated(&mut state.buffer, except);
                state.buffer.push(']');
            }
            // except only narrows character classes
            (Some(equals), _) => state.buffer.push_str(equals),
            (None, Some(except)) => {
                state.buffer.push_str("[^");
                push_negated(&mut state.buffer, except);
            }
            (None, None) => {}
        }

        if let Some(quantifier) = spec.quantifier.to_regex_string(spec.lazy) {
            if requires_grouping(equals.as_deref()) {
                state.wrap(offset, "(?:", ")");
            }
            state.buffer.push_str(&quantifier);
        }

        if spec.ignore_case || spec.dot_all {
            let mut letters = String::new();
            if spec.ignore_case {
                letters.push('i');
            }
            if spec.dot_all {
                letters.push('s');
            }
            state.wrap(offset, &format!("(?{})", letters), &format!("(?-{})", letters));
        }

        if spec.capture {
            state.wrap(offset, "(", ")");
        }

        if let Some(prefix) = assertion_prefix(spec.lookahead, spec.lookbehind) {
            state.wrap(offset, &format!("({}", prefix), ")");
        }

        if spec.atomic {
            state.wrap(offset, "(?>", ")");
        }

        Ok(())
    }

    fn start_group(&mut self, attrs: &Attributes<'_>) -> Result<()> {
        let quantifier = read_quantifier(attrs)?;
        let capture = attrs.flag(ATTR_CAPTURE)?;
        let operator = attrs.parse(ATTR_OPERATOR, Operator::And, EXPECTED_OPERATOR)?;
        let lazy = attrs.flag(ATTR_LAZY)?;
        let atomic = attrs.flag(ATTR_ATOMIC)?;
        let lookahead = attrs.parse(ATTR_LOOKAHEAD, Lookaround::None, EXPECTED_LOOKAROUND)?;
        let lookbehind = attrs.parse(ATTR_LOOKBEHIND, Lookaround::None, EXPECTED_LOOKAROUND)?;

        let mut flags_on = String::new();
        let mut flags_off = String::new();
        for (name, letter) in [
            (ATTR_IGNORE_CASE, 'i'),
            (ATTR_DOT_MATCHES_LINE_BREAKS, 's'),
            (ATTR_ANCHORS_MATCH_LINE_BREAKS, 'm'),
        ] {
            match attrs.tristate(name)? {
                Some(true) => flags_on.push(letter),
                Some(false) => flags_off.push(letter),
                None => {}
            }
        }
        let mut scoped_flags = flags_on;
        if !flags_off.is_empty() {
            scoped_flags.push('-');
            scoped_flags.push_str(&flags_off);
        }

        let state = self.state_mut(ELEMENT_GROUP)?;
        state.separate_sibling();
        let offset = state.buffer.len();

        let mut frame = GroupFrame::new(offset);
        frame.quantifier = quantifier;
        frame.operator = operator;
        frame.lazy = lazy;
        frame.atomic = atomic;
        frame.lookahead = lookahead;
        frame.lookbehind = lookbehind;

        let mut opening = String::from("(");
        if frame.atomic {
            opening.push_str("?>(");
        }
        if let Some(prefix) = frame.assertion() {
            opening.push_str(prefix);
            opening.push('(');
        }
        if capture {
            // a capturing group has no flag slot, scope the flags inside it
            if !scoped_flags.is_empty() {
                opening.push_str("(?");
                opening.push_str(&scoped_flags);
                opening.push(')');
            }
        } else {
            opening.push('?');
            opening.push_str(&scoped_flags);
            opening.push(':');
        }

        state.buffer.insert_str(offset, &opening);
        state.frames.push(frame);
        Ok(())
    }

    fn end_group(&mut self) -> Result<()> {
        let state = self.state_mut(ELEMENT_GROUP)?;
        let frame = state
            .frames
            .pop()
            .ok_or_else(|| DocumentError::UnbalancedGroup {
                id: state.id.clone(),
            })?;

        trace!(offset = frame.insertion_offset, "closing group");
        state.buffer.push(')');
        if let Some(quantifier) = frame.quantifier.to_regex_string(frame.lazy) {
            state.buffer.push_str(&quantifier);
        }
        if frame.assertion().is_some() {
            state.buffer.push(')');
        }
        if frame.atomic {
            state.buffer.push(')');
        }
        Ok(())
    }
}
