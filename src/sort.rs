//! Natural ("human") ordering for directory entries
//!
//! Plain lexicographic ordering puts `a10` before `a2`, which is never what a
//! person expects from a playlist. This module builds sort keys that split a
//! name into alternating text and digit-run tokens: text compares
//! case-insensitively, digit runs compare by numeric value. Keys are computed
//! once per name and compared token by token, so sorting stays cheap even for
//! large directories.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Sort key for one name.
///
/// Obtained from [`natural_key`]; ordering between keys is total and
/// deterministic. A key that is a strict prefix of another sorts first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Token>);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Token {
    Text(String),
    Number(Digits),
}

/// A digit run, compared by numeric value.
///
/// The run is stored with leading zeros stripped instead of being parsed into
/// an integer, so arbitrarily long runs cannot overflow: a longer stripped
/// run is always the larger number, equal lengths compare lexicographically.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Digits(String);

impl Digits {
    fn new(run: &str) -> Self {
        let stripped = run.trim_start_matches('0');
        Digits(stripped.to_string())
    }
}

impl Ord for Digits {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Digits {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build the natural sort key for a name.
///
/// The name is split on digit runs; text between runs is lowercased so the
/// ordering ignores case. Tokens strictly alternate starting with text
/// (possibly empty when the name starts with a digit), which keeps
/// comparisons between any two keys well defined.
///
/// # Example
///
/// ```
/// use harvest::sort::natural_key;
///
/// let mut names = vec!["a10.mp3", "a2.mp3", "B1.mp3"];
/// names.sort_by_key(|n| natural_key(n));
/// assert_eq!(names, ["a2.mp3", "a10.mp3", "B1.mp3"]);
/// ```
pub fn natural_key(s: &str) -> NaturalKey {
    let mut tokens = Vec::new();
    let mut last = 0;
    for m in DIGIT_RUN.find_iter(s) {
        tokens.push(Token::Text(s[last..m.start()].to_lowercase()));
        tokens.push(Token::Number(Digits::new(m.as_str())));
        last = m.end();
    }
    if last < s.len() || tokens.is_empty() {
        tokens.push(Token::Text(s[last..].to_lowercase()));
    }
    NaturalKey(tokens)
}

/// Compare two names in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}
