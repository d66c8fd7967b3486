// src/extractors/dedup.rs
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Version of the text form produced by [`OrderedUniqueMapping::render`].
/// Bump when the rendering changes; downstream sheets are read as plain text.
pub const RENDER_FORMAT_VERSION: u32 = 1;

/// 1-based index -> distinct non-blank value, values in code-point order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedUniqueMapping {
    entries: BTreeMap<u32, String>,
}

impl OrderedUniqueMapping {
    /// Drops blank values, de-duplicates by exact equality, sorts and numbers
    /// the survivors from 1. Input order never affects the result.
    pub fn build<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|v| !v.trim().is_empty())
            .collect();

        let entries = unique
            .into_iter()
            .zip(1u32..)
            .map(|(value, idx)| (idx, value))
            .collect();

        Self { entries }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, index: u32) -> Option<&str> {
        self.entries.get(&index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Single-cell text form: `{1: 'Bank A', 2: 'Bank B'}`, or `{}` when empty.
    pub fn render(&self) -> String {
        let body = self
            .iter()
            .map(|(idx, value)| format!("{}: {}", idx, quote(value)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{{}}}", body)
    }
}

impl fmt::Display for OrderedUniqueMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Single quotes unless the value holds a `'` and no `"`.
fn quote(value: &str) -> String {
    let delim = if value.contains('\'') && !value.contains('"') { '"' } else { '\'' };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(delim);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_blanks_and_duplicates() {
        let values: Vec<Option<&str>> = vec![Some("BankA"), Some(""), Some("BankB"), Some("BankA"), None];
        let mapping = OrderedUniqueMapping::build(values.into_iter().map(|v| v.unwrap_or_default()));

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get(1), Some("BankA"));
        assert_eq!(mapping.get(2), Some("BankB"));
        assert_eq!(mapping.render(), "{1: 'BankA', 2: 'BankB'}");
    }

    #[test]
    fn whitespace_only_values_do_not_take_an_index() {
        let mapping = OrderedUniqueMapping::build(["  ", "\t", "Z", "A"]);
        assert_eq!(mapping.iter().collect::<Vec<_>>(), vec![(1, "A"), (2, "Z")]);
    }

    #[test]
    fn insensitive_to_order_and_repetition() {
        let values = vec!["Credit Card", "Auto Loan", "Personal Loan", "Auto Loan", ""];
        let mut shuffled = values.clone();
        shuffled.reverse();
        shuffled.rotate_left(2);
        shuffled.extend(values.iter().copied());

        assert_eq!(OrderedUniqueMapping::build(values), OrderedUniqueMapping::build(shuffled));
    }

    #[test]
    fn keys_are_dense_from_one() {
        let mapping = OrderedUniqueMapping::build(["d", "b", "", "a", "c", "b"]);
        let keys: Vec<u32> = mapping.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, (1..=4).collect::<Vec<u32>>());
    }

    #[test]
    fn code_point_ordering() {
        let mapping = OrderedUniqueMapping::build(["bank", "Bank", "BANK", "Ñ"]);
        let values: Vec<&str> = mapping.iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec!["BANK", "Bank", "bank", "Ñ"]);
    }

    #[test]
    fn empty_renders_as_braces() {
        let mapping = OrderedUniqueMapping::build(Vec::<String>::new());
        assert!(mapping.is_empty());
        assert_eq!(mapping.render(), "{}");
        assert_eq!(mapping.to_string(), "{}");
    }

    #[test]
    fn quoting_follows_content() {
        let mapping = OrderedUniqueMapping::build(["O'Neil Bank", r#"Say "hi""#, "both ' and \"", "a\\b"]);
        assert_eq!(
            mapping.render(),
            r#"{1: "O'Neil Bank", 2: 'Say "hi"', 3: 'a\\b', 4: 'both \' and "'}"#
        );
    }
}
