//! Natural ("human") ordering of strings.
//!
//! A key is the alternating sequence of non-digit and digit runs of a string,
//! always starting with a (possibly empty) non-digit run, so that `track2`
//! sorts before `track10`.

use std::cmp::Ordering;

/// One run of a natural sort key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NaturalToken {
    /// Lowercased non-digit run.
    Text(String),
    /// ASCII digit run, compared by value.
    Number(Digits),
}

/// A digit run stored without leading zeros so any length compares by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digits(String);

impl Digits {
    fn new(run: &str) -> Self {
        let trimmed = run.trim_start_matches('0');
        Self(trimmed.to_string())
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

/// Comparable key for natural ordering. Shorter keys that are a strict prefix sort first.
pub type NaturalKey = Vec<NaturalToken>;

/// Split `s` into its natural sort key.
pub fn natural_key(s: &str) -> NaturalKey {
    let mut key = Vec::new();
    let mut text = String::new();
    let mut digits = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            if digits.is_empty() {
                key.push(NaturalToken::Text(std::mem::take(&mut text).to_lowercase()));
            }
            digits.push(c);
        } else {
            if !digits.is_empty() {
                key.push(NaturalToken::Number(Digits::new(&digits)));
                digits.clear();
            }
            text.push(c);
        }
    }

    if !digits.is_empty() {
        key.push(NaturalToken::Number(Digits::new(&digits)));
    }
    key.push(NaturalToken::Text(text.to_lowercase()));
    key
}

/// Compare two strings in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_runs_compare_numerically() {
        let mut names = vec!["track2", "track10", "track1"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["track1", "track2", "track10"]);
    }

    #[test]
    fn text_runs_ignore_case() {
        assert_eq!(natural_cmp("Alpha", "alpha"), Ordering::Equal);
        assert_eq!(natural_cmp("alpha", "Beta"), Ordering::Less);
    }

    #[test]
    fn key_alternates_starting_with_text() {
        assert_eq!(
            natural_key("foo20bar"),
            vec![
                NaturalToken::Text("foo".into()),
                NaturalToken::Number(Digits::new("20")),
                NaturalToken::Text("bar".into()),
            ]
        );
        assert_eq!(
            natural_key("01 Intro"),
            vec![
                NaturalToken::Text(String::new()),
                NaturalToken::Number(Digits::new("1")),
                NaturalToken::Text(" intro".into()),
            ]
        );
    }

    #[test]
    fn leading_zeros_and_long_runs_compare_by_value() {
        assert_eq!(natural_cmp("a007", "a7"), Ordering::Equal);
        assert_eq!(
            natural_cmp("x99999999999999999999999", "x100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn strict_prefix_sorts_first() {
        assert_eq!(natural_cmp("disc", "disc 2"), Ordering::Less);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
    }
}
