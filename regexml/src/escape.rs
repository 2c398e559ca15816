//! Escaping of literal attribute text
//!
//! Literal `equals`/`except` values are written by hand, so a document can ask
//! for its regex metacharacters to be escaped automatically. Character classes
//! are exempt: their brackets and carets are meaningful.

/// Characters prefixed with `\` when auto-escaping is enabled
pub const AUTO_ESCAPE_CHARS: &[char] = &['$', '(', ')', '*', '+', '?', '^', '{', '|'];

/// Escape regex metacharacters in `text` when `enabled` is set.
///
/// A backslash and the character after it are copied as-is, so text that is
/// already escaped is never escaped twice.
///
/// # Example
/// ```
/// use regexml::escape::escape;
///
/// assert_eq!(escape("a.b*c", true), "a.b\\*c");
/// assert_eq!(escape("a.b*c", false), "a.b*c");
/// ```
pub fn escape(text: &str, enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }

    let mut escaped = String::with_capacity(text.len() + 4);
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            escaped.push(c);
            if let Some(next) = chars.next() {
                escaped.push(next);
            }
        } else {
            if AUTO_ESCAPE_CHARS.contains(&c) {
                escaped.push('\\');
            }
            escaped.push(c);
        }
    }
    escaped
}

/// Escape a literal unless it is shaped like a character class.
pub fn escape_literal(text: &str, enabled: bool) -> String {
    if is_character_class(text) {
        text.to_string()
    } else {
        escape(text, enabled)
    }
}

/// Check whether `text` is a single bracketed class (`[...]`).
///
/// The opening `[` must be closed by the final `]`, so `[a][b]` and
/// `[ab]|[cd]` are not classes. Nested classes, `\x` pairs and a `]` right
/// after `[` or `[^` are taken into account.
pub fn is_bracketed(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'[' || bytes[bytes.len() - 1] != b']' {
        return false;
    }

    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'[' => {
                depth += 1;
                // a `]` opening a class is a member, not the close
                if bytes.get(i + 1) == Some(&b'^') {
                    i += 1;
                }
                if bytes.get(i + 1) == Some(&b']') {
                    i += 1;
                }
            }
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return i == bytes.len() - 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    false
}

/// Check whether `text` is a character class.
///
/// Bracketed sets, the dot and the shorthands `\d`, `\s`, `\w`, `\b` (in
/// either case) all count.
pub fn is_character_class(text: &str) -> bool {
    is_bracketed(text)
        || text == "."
        || ["\\d", "\\s", "\\w", "\\b"]
            .iter()
            .any(|shorthand| text.eq_ignore_ascii_case(shorthand))
}
