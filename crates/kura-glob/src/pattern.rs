//! Shell-glob pattern compilation.
//!
//! Translates shell-style glob patterns into anchored matchers:
//! - `*` matches any run of characters within one path segment
//! - `?` matches exactly one non-separator character
//! - `{a,b,c}` matches any of the alternatives (nesting allowed)
//! - `\` escapes the next character
//!
//! Matching follows the hidden-file rule: a name starting with `.` only
//! matches when the pattern itself starts with a literal `.`, and each path
//! segment after a `/` must not start with a dot unless the pattern spells
//! the dot out.

use fancy_regex::Regex;
use thiserror::Error;

/// Errors when compiling glob patterns.
#[derive(Debug, Clone, Error)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,
    #[error("unbalanced braces in pattern: {0}")]
    UnbalancedBrace(String),
    #[error("invalid pattern: {0}")]
    Invalid(String),
}

/// Lookahead that refuses a leading dot in the next path segment.
const HIDDEN_GUARD: &str = "(?=[^.])";

/// A glob pattern compiled to an anchored regular expression.
///
/// Compilation is a single left-to-right scan; patterns are compiled fresh
/// on every call and never cached.
///
/// # Examples
/// ```
/// use kura_glob::Glob;
///
/// let glob = Glob::new("*.txt").unwrap();
/// assert!(glob.matches("notes.txt"));
/// assert!(!glob.matches(".hidden.txt"));
/// assert!(!glob.matches("notes.rs"));
///
/// let dotfiles = Glob::new(".*").unwrap();
/// assert!(dotfiles.matches(".bashrc"));
/// ```
#[derive(Debug, Clone)]
pub struct Glob {
    regex: Regex,
    matches_hidden: bool,
}

impl Glob {
    /// Compile a glob pattern.
    ///
    /// Unbalanced `{`/`}` nesting is rejected with
    /// [`PatternError::UnbalancedBrace`] rather than producing a broken
    /// matcher.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let source = translate(pattern)?;
        let regex = Regex::new(&source).map_err(|e| PatternError::Invalid(e.to_string()))?;
        Ok(Self {
            regex,
            matches_hidden: pattern.starts_with('.'),
        })
    }

    /// Check whether a filename matches the whole pattern.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name).unwrap_or(false)
    }

    /// True when the pattern starts with a literal `.`, which disables the
    /// hidden-file exclusion for the leading segment.
    pub fn matches_hidden(&self) -> bool {
        self.matches_hidden
    }
}

/// Translate a glob pattern into an anchored regex in one scan.
///
/// A brace depth counter turns `{`/`}`/`,` into alternation groups; a comma
/// outside braces falls through to the default arm and stays literal.
fn translate(pattern: &str) -> Result<String, PatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 16);
    out.push('^');
    if chars.first() != Some(&'.') {
        out.push_str(HIDDEN_GUARD);
    }

    let mut depth: u32 = 0;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => {
                let c = if i + 1 < chars.len() {
                    i += 1;
                    chars[i]
                } else {
                    '\\'
                };
                push_literal(&mut out, c);
            }
            '/' => {
                out.push('/');
                if chars.get(i + 1) != Some(&'.') {
                    out.push_str(HIDDEN_GUARD);
                }
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '{' => {
                out.push('(');
                depth += 1;
            }
            '}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| PatternError::UnbalancedBrace(pattern.to_string()))?;
                out.push(')');
            }
            ',' if depth > 0 => out.push('|'),
            c @ ('.' | '(' | ')' | '|' | '+' | '^' | '$' | '@' | '%') => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
        i += 1;
    }

    if depth != 0 {
        return Err(PatternError::UnbalancedBrace(pattern.to_string()));
    }
    out.push('$');
    Ok(out)
}

/// Emit an escaped character as a regex literal.
///
/// Only characters the regex engine treats specially gain a backslash; a
/// bare backslash before a letter would turn `\d` into a character class.
fn push_literal(out: &mut String, c: char) {
    if matches!(
        c,
        '\\' | '.' | '(' | ')' | '|' | '+' | '^' | '$' | '*' | '?' | '[' | ']' | '{' | '}'
    ) {
        out.push('\\');
    }
    out.push(c);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, name: &str) -> bool {
        Glob::new(pattern).unwrap().matches(name)
    }

    #[test]
    fn literal_matches() {
        assert!(matches("hello", "hello"));
        assert!(!matches("hello", "world"));
        assert!(!matches("hello", "hell"));
        assert!(!matches("hello", "helloo"));
    }

    #[test]
    fn star_wildcard() {
        assert!(matches("*", "anything"));
        assert!(matches("*.rs", "main.rs"));
        assert!(matches("test*", "test"));
        assert!(matches("test*", "testing"));
        assert!(matches("a*b*c", "abc"));
        assert!(matches("a*b*c", "aXXXbYYYc"));
        assert!(!matches("*.rs", "main.txt"));
        assert!(!matches("test*", "mytest"));
    }

    #[test]
    fn star_does_not_cross_separators() {
        assert!(!matches("*", "foo/bar"));
        assert!(!matches("src*", "src/main.rs"));
        assert!(matches("*/*", "foo/bar"));
        assert!(!matches("*/*", "foobar"));
    }

    #[test]
    fn question_wildcard() {
        assert!(matches("?", "a"));
        assert!(matches("???", "abc"));
        assert!(matches("test?", "test1"));
        assert!(!matches("?", "ab"));
        assert!(!matches("???", "ab"));
        assert!(!matches("?", "/"));
    }

    #[test]
    fn hidden_files_excluded_by_default() {
        assert!(matches("*.txt", "notes.txt"));
        assert!(!matches("*.txt", ".hidden.txt"));
        assert!(!matches("*", ".profile"));
        assert!(!matches("?rofile", ".profile"));
    }

    #[test]
    fn dot_prefixed_pattern_matches_hidden() {
        assert!(matches(".*", ".hidden"));
        assert!(matches(".*", ".bashrc"));
        assert!(matches(".prof*", ".profile"));
        assert!(!matches(".*", "visible"));
    }

    #[test]
    fn matches_hidden_flag() {
        assert!(Glob::new(".*").unwrap().matches_hidden());
        assert!(!Glob::new("*.txt").unwrap().matches_hidden());
    }

    #[test]
    fn brace_alternation() {
        assert!(matches("{foo,bar}.txt", "foo.txt"));
        assert!(matches("{foo,bar}.txt", "bar.txt"));
        assert!(!matches("{foo,bar}.txt", "baz.txt"));
        assert!(matches("*.{rs,go,py}", "main.rs"));
        assert!(matches("*.{rs,go,py}", "script.py"));
        assert!(!matches("*.{rs,go,py}", "style.css"));
    }

    #[test]
    fn nested_braces() {
        assert!(matches("{a,{b,c}}", "a"));
        assert!(matches("{a,{b,c}}", "b"));
        assert!(matches("{a,{b,c}}", "c"));
        assert!(!matches("{a,{b,c}}", "d"));
    }

    #[test]
    fn empty_brace_alternative() {
        assert!(matches("{,un}do", "do"));
        assert!(matches("{,un}do", "undo"));
        assert!(matches("README{,.md}", "README"));
        assert!(matches("README{,.md}", "README.md"));
    }

    #[test]
    fn comma_outside_braces_is_literal() {
        assert!(matches("a,b", "a,b"));
        assert!(!matches("a,b", "a"));
        assert!(!matches("a,b", "b"));
    }

    #[test]
    fn metacharacters_are_neutralized() {
        assert!(matches("a+b", "a+b"));
        assert!(!matches("a+b", "aab"));
        assert!(matches("50%", "50%"));
        assert!(matches("user@host", "user@host"));
        assert!(matches("cost$", "cost$"));
        assert!(matches("a.b", "a.b"));
        assert!(!matches("a.b", "aXb"));
    }

    #[test]
    fn escapes_preserve_literals() {
        assert!(matches("\\*", "*"));
        assert!(!matches("\\*", "a"));
        assert!(matches("test\\?", "test?"));
        assert!(matches("\\{a,b\\}", "{a,b}"));
        assert!(matches("\\d", "d"));
        assert!(!matches("\\d", "5"));
    }

    #[test]
    fn path_segments() {
        assert!(matches("src/*.rs", "src/main.rs"));
        assert!(!matches("src/*.rs", "test/main.rs"));
        assert!(matches("*/*/*.rs", "src/foo/bar.rs"));
        assert!(!matches("*/*/*.rs", "src/bar.rs"));
    }

    #[test]
    fn hidden_rule_applies_per_segment() {
        assert!(!matches("*/*", "a/.b"));
        assert!(matches("*/.*", "a/.hidden"));
        assert!(matches("src/.git*", "src/.gitignore"));
        assert!(!matches("src/*", "src/.gitignore"));
    }

    #[test]
    fn character_classes_pass_through() {
        assert!(matches("[abc].rs", "a.rs"));
        assert!(matches("[abc].rs", "c.rs"));
        assert!(!matches("[abc].rs", "d.rs"));
        assert!(matches("file[0-9].txt", "file5.txt"));
        assert!(!matches("file[0-9].txt", "filea.txt"));
    }

    #[test]
    fn unbalanced_braces_rejected() {
        assert!(matches!(
            Glob::new("{a,b"),
            Err(PatternError::UnbalancedBrace(_))
        ));
        assert!(matches!(
            Glob::new("a}b"),
            Err(PatternError::UnbalancedBrace(_))
        ));
        assert!(matches!(
            Glob::new("{a,{b,c}"),
            Err(PatternError::UnbalancedBrace(_))
        ));
    }

    #[test]
    fn empty_pattern_rejected() {
        assert!(matches!(Glob::new(""), Err(PatternError::Empty)));
    }

    #[test]
    fn unclosed_class_rejected() {
        assert!(matches!(Glob::new("[abc"), Err(PatternError::Invalid(_))));
    }

    #[test]
    fn compiled_fresh_each_call() {
        let a = Glob::new("*.rs").unwrap();
        let b = Glob::new("*.rs").unwrap();
        assert!(a.matches("main.rs"));
        assert!(b.matches("main.rs"));
    }

    #[test]
    fn unicode_names() {
        assert!(matches("héllo", "héllo"));
        assert!(matches("*ñ*", "español"));
        assert!(matches("?", "ü"));
    }
}
