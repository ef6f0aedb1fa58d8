//! Shell-style wildcard patterns, compiled to anchored regular expressions.

use std::fmt;
use std::hash::{Hash, Hasher};

use regex::Regex;

use super::predicate::QueryError;

/// A pattern where `*` matches any run of characters, `?` matches one
/// character and `[seq]` / `[!seq]` match one character in or out of a set.
/// Everything else is literal. The pattern must match the whole string.
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: String,
    regex: Regex,
}

impl Glob {
    pub fn new(pattern: impl Into<String>) -> Result<Self, QueryError> {
        let pattern = pattern.into();
        let regex = Regex::new(&translate(&pattern))
            .map_err(|err| QueryError::InvalidPattern(pattern.clone(), err.to_string()))?;

        Ok(Glob { pattern, regex })
    }

    #[inline]
    pub fn is_match(&self, s: &str) -> bool {
        self.regex.is_match(s)
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for Glob {}

impl Hash for Glob {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
    }
}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Characters with a meaning inside a regex character class
const CLASS_META: &[char] = &['\\', '[', ']', '^', '&', '-', '~'];

fn translate(pattern: &str) -> String {
    let chars = pattern.chars().collect::<Vec<_>>();
    let mut out = String::from("^(?s:");
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;

        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push_str(&class(&chars[i..end]));
                    i = end + 1;
                }
                None => out.push_str(r"\["),
            },
            c => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }

    out.push_str(")$");
    out
}

/// Index of the `]` closing a set opened just before `start`. A `]`
/// directly after the opening (or after `!`) is a member, not the end.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }

    chars[j.min(chars.len())..]
        .iter()
        .position(|c| *c == ']')
        .map(|offset| j + offset)
}

fn class(members: &[char]) -> String {
    let (negated, members) = match members.split_first() {
        Some((&'!', rest)) => (true, rest),
        _ => (false, members),
    };

    let mut out = String::from(if negated { "[^" } else { "[" });
    for (index, c) in members.iter().enumerate() {
        let is_range = *c == '-' && index > 0 && index + 1 < members.len();

        if !is_range && CLASS_META.contains(c) {
            out.push('\\');
        }
        out.push(*c);
    }

    out.push(']');
    out
}
