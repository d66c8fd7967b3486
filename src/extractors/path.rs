// src/extractors/path.rs

// --- Imports ---
use serde_json::Value;

/// A position inside a parsed report that may or may not exist.
///
/// Every lookup on a missing node yields another missing node, so a chain like
/// `root.key("a").last().key("b").text()` never fails; it only degrades to `""`.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a>(Option<&'a Value>);

impl<'a> Node<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(Some(value))
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    /// Looks up `key` when this node is an object.
    pub fn key(self, key: &str) -> Node<'a> {
        Node(self.0.and_then(|v| v.as_object()).and_then(|m| m.get(key)))
    }

    /// Follows a chain of object keys, stopping at the first missing segment.
    pub fn path(self, keys: &[&str]) -> Node<'a> {
        keys.iter().fold(self, |node, k| node.key(k))
    }

    /// Entries of this node when it is an array, empty otherwise.
    pub fn items(self) -> &'a [Value] {
        self.0
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn first(self) -> Node<'a> {
        Node(self.items().first())
    }

    pub fn last(self) -> Node<'a> {
        Node(self.items().last())
    }

    pub fn as_str(self) -> Option<&'a str> {
        self.0.and_then(|v| v.as_str())
    }

    /// Scalar coerced to text and trimmed. Strings, numbers and booleans
    /// render; null, containers and missing nodes become `""`.
    pub fn text(self) -> String {
        match self.0 {
            Some(Value::String(s)) => s.trim().to_string(),
            _ => self.raw_text(),
        }
    }

    /// Same coercion as [`Node::text`] but strings keep their exact content.
    pub fn raw_text(self) -> String {
        match self.0 {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }
}
