//! Translated and compiled expressions

use std::fmt;

use fancy_regex::Regex;

use crate::error::{RegexmlError, Result};

/// Expression-wide match flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Flags {
    /// Case-insensitive matching
    pub ignore_case: bool,
    /// `.` also matches line breaks
    pub dot_all: bool,
    /// `^` and `$` match at line breaks
    pub multiline: bool,
}

impl Flags {
    /// The inline flag group equivalent to these flags, e.g. `(?is)`.
    ///
    /// Empty when no flag is set.
    pub fn inline_prefix(&self) -> String {
        let letters = self.letters();
        if letters.is_empty() {
            String::new()
        } else {
            format!("(?{})", letters)
        }
    }

    fn letters(&self) -> String {
        let mut letters = String::new();
        if self.ignore_case {
            letters.push('i');
        }
        if self.dot_all {
            letters.push('s');
        }
        if self.multiline {
            letters.push('m');
        }
        letters
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = self.letters();
        if letters.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", letters)
        }
    }
}

/// The output of translating one `<expression>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// The expression id
    pub id: String,
    /// The generated regex
    pub regex: String,
    /// Expression-wide flags
    pub flags: Flags,
}

/// A compiled expression
#[derive(Debug, Clone)]
pub struct Expression {
    id: String,
    regex: String,
    flags: Flags,
    pattern: Regex,
}

impl Expression {
    /// Compile a translation with the regex engine
    pub fn compile(translation: Translation) -> Result<Self> {
        let Translation { id, regex, flags } = translation;
        let source = format!("{}{}", flags.inline_prefix(), regex);
        let pattern = Regex::new(&source).map_err(|err| RegexmlError::PatternCompilationFailed {
            id: id.clone(),
            pattern: source.clone(),
            reason: err.to_string(),
        })?;
        Ok(Expression {
            id,
            regex,
            flags,
            pattern,
        })
    }

    /// The expression id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The generated regex, without the expression-wide flags
    pub fn as_str(&self) -> &str {
        &self.regex
    }

    /// Expression-wide flags
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// The compiled pattern
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.regex)
    }
}
