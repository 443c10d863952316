//! Recognition of signature headings in generated reference markdown.
//!
//! The markdown renderer emits callables as `#### name(args)` (sometimes with the signature in
//! backticks) and types as `### *class* pkg.mod.Name(args)` or `### *exception* pkg.mod.Name`.
//! Both shapes are rewritten into a plain heading followed by a fenced code block. Every other
//! line, including headings of any other shape, is left alone.

use once_cell::sync::Lazy;
use regex::Regex;

/// `#### name(args)` or ``#### `name(args)` ``, alone on the line.
static CALLABLE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^####\s+`?(\w+)\(([^)]*)\)`?\s*$").expect("callable heading pattern")
});

/// `### *class* signature` or `### *exception* signature`.
static TYPE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^###\s+\*(class|exception)\*\s+(.+)\s*$").expect("type heading pattern")
});

/// Fence language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "python";

/// Role marker of a type heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRole {
    /// `*class*`
    Class,
    /// `*exception*`
    Exception,
}

/// Classification of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heading<'a> {
    /// Anything that is not a signature heading.
    Plain,
    /// A function or method heading.
    Callable {
        /// Identifier, without backticks.
        name: &'a str,
        /// Text between the parentheses, possibly empty.
        args: &'a str,
    },
    /// A class or exception heading.
    Type {
        /// The role marker.
        role: TypeRole,
        /// The fully qualified signature, trimmed.
        signature: &'a str,
    },
}

impl<'a> Heading<'a> {
    /// Classify a line. Trailing whitespace, including the line terminator, is ignored. The
    /// callable shape is tried first.
    pub fn classify(line: &'a str) -> Self {
        let line = line.trim_end();
        if let Some(caps) = CALLABLE_HEADING.captures(line)
            && let (Some(name), Some(args)) = (caps.get(1), caps.get(2))
        {
            return Self::Callable {
                name: name.as_str(),
                args: args.as_str(),
            };
        }
        if let Some(caps) = TYPE_HEADING.captures(line)
            && let (Some(role), Some(signature)) = (caps.get(1), caps.get(2))
        {
            let role = if role.as_str() == "class" {
                TypeRole::Class
            } else {
                TypeRole::Exception
            };
            return Self::Type {
                role,
                signature: signature.as_str().trim(),
            };
        }
        Self::Plain
    }

    /// Produce the replacement for a signature heading, or `None` for a plain line.
    pub fn wrap(&self) -> Option<Wrapped> {
        match *self {
            Self::Plain => None,
            Self::Callable { name, args } => Some(Wrapped {
                heading: format!("#### {name}"),
                code: format!("{name}({args})"),
            }),
            Self::Type { role, signature } => {
                let code = match role {
                    TypeRole::Class => {
                        let params = signature.find('(').map_or("", |i| &signature[i..]);
                        format!("class {}{params}:", short_name(signature))
                    }
                    TypeRole::Exception => signature.to_string(),
                };
                Some(Wrapped {
                    heading: format!("### {signature}"),
                    code,
                })
            }
        }
    }
}

/// Final dotted component of the name part of a signature, e.g. `Widget` for
/// `pkg.mod.Widget(x, y)`.
///
/// The name part ends at the first `(`. A dot inside a default value is never reached because of
/// this, but a qualified name is not otherwise validated.
pub fn short_name(signature: &str) -> &str {
    let name = signature.split('(').next().unwrap_or_default().trim();
    name.rsplit('.').next().unwrap_or(name)
}

/// A recognized heading rewritten as a heading line and the body of a code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapped {
    /// Replacement heading line, without a line terminator.
    pub heading: String,
    /// The single line placed inside the fenced block.
    pub code: String,
}

impl Wrapped {
    /// Render the four-part expansion: heading, blank, fenced block, blank.
    pub fn render(&self, language: &str) -> String {
        format!("{}\n\n```{language}\n{}\n```\n\n", self.heading, self.code)
    }
}

/// Recognize a callable heading such as `#### foo(a, b)`.
pub fn match_callable_heading(line: &str) -> Option<Wrapped> {
    match Heading::classify(line) {
        heading @ Heading::Callable { .. } => heading.wrap(),
        _ => None,
    }
}

/// Recognize a type heading such as `### *class* pkg.mod.Widget(x, y)`.
pub fn match_type_heading(line: &str) -> Option<Wrapped> {
    match Heading::classify(line) {
        heading @ Heading::Type { .. } => heading.wrap(),
        _ => None,
    }
}

/// Whether `c` ends a line. Besides `\n` and `\r` this covers the vertical tab, form feed,
/// the file/group/record separators, NEL and the Unicode line and paragraph separators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split `text` into `(line, terminator)` pairs. `\r\n` is a single terminator and the last
/// line may have none.
fn split_lines(text: &str) -> Vec<(&str, &str)> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        if c == '\r' && chars.next_if(|&(_, next)| next == '\n').is_some() {
            end += 1;
        }
        lines.push((&text[start..i], &text[i..end]));
        start = end;
    }
    if start < text.len() {
        lines.push((&text[start..], ""));
    }
    lines
}

/// Rewrite every signature heading in `text`.
///
/// Lines that are not replaced keep their terminators. Returns the new text and the number of
/// headings rewritten.
pub fn wrap_text(text: &str, language: &str) -> (String, usize) {
    let mut output = String::with_capacity(text.len());
    let mut count = 0;
    for (line, terminator) in split_lines(text) {
        match Heading::classify(line).wrap() {
            Some(wrapped) => {
                output.push_str(&wrapped.render(language));
                count += 1;
            }
            None => {
                output.push_str(line);
                output.push_str(terminator);
            }
        }
    }
    (output, count)
}
