//! Structural identity for layer nodes.
//!
//! A [`LayerKey`] is derived from a node's ancestor chain plus its own name
//! (or display name when it has no name). It never depends on selection,
//! expansion, opacity or any other volatile field, so UI state keyed by it
//! survives tree rebuilds.
//!
//! # Format
//!
//! ```text
//! root/<segment>/<segment>/...
//! ```
//!
//! Segments escape `%` and `/` so a name containing the separator cannot
//! alias a deeper path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Key of the sentinel every root node hangs off.
const ROOT: &str = "root";

/// Separator between path segments.
const SEPARATOR: char = '/';

/// Stable structural key of a layer node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerKey(String);

impl LayerKey {
    /// The root sentinel.
    pub fn root() -> Self {
        Self(ROOT.to_string())
    }

    /// Compute the key of a node from its parent's key and its own names.
    ///
    /// `name` wins over `display_name`. Roots pass `None` as parent.
    pub fn child(
        parent: Option<&LayerKey>,
        name: Option<&str>,
        display_name: Option<&str>,
    ) -> Self {
        let base = parent.map_or(ROOT, |p| p.as_str());
        let segment = name.or(display_name).unwrap_or_default();

        let mut key = String::with_capacity(base.len() + segment.len() + 1);
        key.push_str(base);
        key.push(SEPARATOR);
        escape_segment(segment, &mut key);
        Self(key)
    }

    /// Borrow the key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key lies strictly beneath `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &LayerKey) -> bool {
        self.0
            .strip_prefix(ancestor.as_str())
            .is_some_and(|rest| rest.starts_with(SEPARATOR))
    }
}

fn escape_segment(segment: &str, out: &mut String) {
    for ch in segment.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '/' => out.push_str("%2F"),
            other => out.push(other),
        }
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LayerKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for LayerKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for LayerKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
