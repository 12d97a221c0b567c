//! Longest-match-first string splitting.
//!
//! Used to break combined short aliases (`-abc`) into their parts, and
//! exposed for callers that need the same behavior.

use serde::Serialize;

/// Result of [`split`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Split {
    /// The matched values, in order of appearance.
    pub values: Vec<String>,
    /// The leftover text that matched nothing, in order of appearance.
    pub remainder: Vec<String>,
}

/// Split `value` into the provided `matches`.
///
/// Longer matches take priority: every occurrence of the longest match is
/// extracted first, and shorter matches only apply to the text between those
/// occurrences. Matches of equal length keep their given order.
///
/// ```
/// use argstree_core::split;
///
/// let result = split("aba", &["a", "ab"]);
/// assert_eq!(result.values, ["ab", "a"]);
/// assert!(result.remainder.is_empty());
/// ```
pub fn split<S: AsRef<str>>(value: &str, matches: &[S]) -> Split {
    let mut sorted: Vec<&str> = matches.iter().map(AsRef::as_ref).collect();
    sort_matches(&mut sorted);
    split_sorted(value, &sorted)
}

/// Sort matches by descending character count. Stable.
pub(crate) fn sort_matches<S: AsRef<str>>(matches: &mut [S]) {
    matches.sort_by_key(|m| std::cmp::Reverse(m.as_ref().chars().count()));
}

/// [`split`] for matches already sorted by priority.
pub(crate) fn split_sorted<S: AsRef<str>>(value: &str, matches: &[S]) -> Split {
    let mut out = Split::default();
    split_into(value, matches, &mut out);
    out
}

fn split_into<S: AsRef<str>>(value: &str, matches: &[S], out: &mut Split) {
    let Some((first, rest)) = matches.split_first() else {
        if !value.is_empty() {
            out.remainder.push(value.to_string());
        }
        return;
    };
    let separator = first.as_ref();
    let parts = split_parts(value, separator);
    let last = parts.len().saturating_sub(1);
    for (index, part) in parts.into_iter().enumerate() {
        if !part.is_empty() {
            split_into(part, rest, out);
        }
        // the match sits between two parts
        if index < last {
            out.values.push(separator.to_string());
        }
    }
}

/// Split on every occurrence of `separator`. An empty separator splits into
/// characters, and splitting empty text by it yields no parts.
fn split_parts<'a>(value: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        value
            .char_indices()
            .map(|(i, c)| &value[i..i + c.len_utf8()])
            .collect()
    } else {
        value.split(separator).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_and_matches() {
        let result = split::<&str>("", &[]);
        assert!(result.values.is_empty());
        assert!(result.remainder.is_empty());
    }

    #[test]
    fn sort_keeps_order_of_equal_lengths() {
        let mut matches = vec!["a", "bc", "d", "ef"];
        sort_matches(&mut matches);
        assert_eq!(matches, ["bc", "ef", "a", "d"]);
    }

    #[test]
    fn presorted_split_respects_given_order() {
        let result = split_sorted("abcada", &["bc", "ab", "ca", "ad", "da", "a"]);
        assert_eq!(result.values, ["a", "bc", "ad", "a"]);
        assert!(result.remainder.is_empty());
    }

    #[test]
    fn empty_separator_splits_characters() {
        assert_eq!(split_parts("ab", ""), ["a", "b"]);
        assert!(split_parts("", "").is_empty());
        assert_eq!(split_parts("", "x"), [""]);
        assert_eq!(split_parts("axbx", "x"), ["a", "b", ""]);
    }

    #[test]
    fn multibyte_characters_are_not_broken() {
        let result = split("éaé", &["a"]);
        assert_eq!(result.values, ["a"]);
        assert_eq!(result.remainder, ["é", "é"]);
    }
}
