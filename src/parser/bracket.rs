//! Bracket-encoded query parameters: `name[a][b]=v1,v2`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// One or more `[...]` groups with no nested brackets, and nothing else
    static ref BRACKET_TAIL: Regex = Regex::new(r"^(\[[^\[\]]*\])+$").expect("valid bracket regex");
    static ref BRACKET_SEGMENT: Regex = Regex::new(r"\[([^\[\]]*)\]").expect("valid segment regex");
}

/// Decoded query string as an ordered multimap.
///
/// Keys keep the order of their first occurrence; repeated keys accumulate
/// their raw values in encounter order, the way a servlet-style parameter map
/// exposes `String[]` per name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, Vec<String>)>,
}

/// One member of a bracket parameter family.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketParam {
    /// Raw key as sent, e.g. `filter[age][gte]`
    pub key: String,
    /// Bracket segments in order, e.g. `["age", "gte"]`
    pub segments: Vec<String>,
    /// Raw values of the key before splitting
    pub raw_values: Vec<String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw URL query (without the leading `?`).
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.append(key, value);
        }
        params
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// All parameters of the `prefix[...]` family, in key order.
    ///
    /// Keys that do not have the bracket shape are not part of the family and
    /// are skipped.
    pub fn bracket_family<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = BracketParam> + 'a {
        self.entries.iter().filter_map(move |(key, values)| {
            parse_bracket_key(prefix, key).map(|segments| BracketParam {
                key: key.clone(),
                segments,
                raw_values: values.clone(),
            })
        })
    }
}

/// Split `prefix[a][b]` into `["a", "b"]`.
///
/// Returns `None` when the key is not `prefix` followed by at least one
/// bracket group. Segments may be empty (`fields[]` gives `[""]`); rejecting
/// those is up to the caller.
pub fn parse_bracket_key(prefix: &str, key: &str) -> Option<Vec<String>> {
    let tail = key.strip_prefix(prefix)?;
    if !BRACKET_TAIL.is_match(tail) {
        return None;
    }

    Some(
        BRACKET_SEGMENT
            .captures_iter(tail)
            .map(|caps| caps[1].to_string())
            .collect(),
    )
}

/// Flatten raw values into tokens.
///
/// A value starting with `{` or `[{` is a pre-encoded JSON literal and stays
/// one token; every other value is split on `,`.
pub fn split_values<S: AsRef<str>>(raw_values: &[S]) -> Vec<String> {
    let mut tokens = Vec::new();

    for value in raw_values {
        let value = value.as_ref();
        if value.starts_with('{') || value.starts_with("[{") {
            tokens.push(value.to_string());
        } else {
            tokens.extend(value.split(',').map(str::to_string));
        }
    }

    tokens
}
