//! Attribute values and name normalization.

use compact_str::{CompactString, ToCompactString};
use std::fmt;

/// Stored value of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrValue {
    /// A regular string value.
    Str(CompactString),
    /// An attribute explicitly set to `false`. It is kept in the map but
    /// omitted entirely when rendering.
    Absent,
}

impl AttrValue {
    /// Get the string value, or `None` for [`AttrValue::Absent`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s.as_str()),
            AttrValue::Absent => None,
        }
    }

    /// Returns true if this value is omitted when rendering.
    pub fn is_absent(&self) -> bool {
        matches!(self, AttrValue::Absent)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Str(s) => f.write_str(s),
            AttrValue::Absent => Ok(()),
        }
    }
}

impl PartialEq<str> for AttrValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for AttrValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

/// A value as given by the caller, before boolean shorthand is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrInput {
    /// A string value.
    Str(CompactString),
    /// `true` renders as `name="name"`, `false` drops the attribute.
    Bool(bool),
}

impl From<&str> for AttrInput {
    fn from(s: &str) -> Self {
        AttrInput::Str(s.into())
    }
}

impl From<String> for AttrInput {
    fn from(s: String) -> Self {
        AttrInput::Str(s.into())
    }
}

impl From<&String> for AttrInput {
    fn from(s: &String) -> Self {
        AttrInput::Str(s.as_str().into())
    }
}

impl From<CompactString> for AttrInput {
    fn from(s: CompactString) -> Self {
        AttrInput::Str(s)
    }
}

impl From<bool> for AttrInput {
    fn from(b: bool) -> Self {
        AttrInput::Bool(b)
    }
}

macro_rules! attr_input_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AttrInput {
                fn from(v: $ty) -> Self {
                    AttrInput::Str(v.to_compact_string())
                }
            }
        )*
    };
}

attr_input_from_display!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// An ordered bag of attribute pairs, applied with [`Node::add`](crate::Node::add).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs {
    entries: Vec<(CompactString, AttrInput)>,
}

impl Attrs {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair.
    pub fn with(mut self, name: impl Into<CompactString>, value: impl Into<AttrInput>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    /// Append a pair in place.
    pub fn push(&mut self, name: impl Into<CompactString>, value: impl Into<AttrInput>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Number of pairs, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate the raw (unnormalized) pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrInput)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Normalize every pair. Later duplicates win when applied.
    pub fn normalized(&self) -> impl Iterator<Item = (CompactString, AttrValue)> + '_ {
        self.entries
            .iter()
            .map(|(name, value)| normalize_pair(name, value.clone()))
    }
}

impl<K, V> FromIterator<(K, V)> for Attrs
where
    K: Into<CompactString>,
    V: Into<AttrInput>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Build an attribute bag from `(name, value)` pairs.
///
/// ```rust
/// use plated::{attrs, tags::span};
///
/// let s = span(("world", attrs([("cls", "hi"), ("data_x", "1")])));
/// assert_eq!(s.to_string(), r#"<span class="hi" data-x="1">world</span>"#);
/// ```
pub fn attrs<I, K, V>(pairs: I) -> Attrs
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<CompactString>,
    V: Into<AttrInput>,
{
    pairs.into_iter().collect()
}

/// Map an ergonomic attribute spelling to its HTML name.
///
/// - `cls`, `className`, `class_name` become `class`
/// - `fr`, `html_for`, `htmlFor` become `for`
/// - `data_*`, `aria_*` and `http_equiv` use hyphens and are lowercased
/// - `xlink_*`, `xml_*` and `xmlns_*` get a colon after the prefix and are lowercased
pub fn normalize_name(name: &str) -> CompactString {
    let name = match name {
        "cls" | "className" | "class_name" => "class",
        "fr" | "html_for" | "htmlFor" => "for",
        other => other,
    };

    if name == "http_equiv" || name.starts_with("data_") || name.starts_with("aria_") {
        return name.replace('_', "-").to_lowercase().into();
    }

    if let Some((prefix, rest)) = name.split_once('_')
        && matches!(prefix, "xlink" | "xml" | "xmlns")
    {
        return format!("{prefix}:{rest}").to_lowercase().into();
    }

    name.into()
}

/// Normalize a name and apply boolean shorthand to its value.
///
/// `true` stores the normalized name itself (`selected="selected"`), `false`
/// stores [`AttrValue::Absent`].
pub fn normalize_pair(name: &str, value: impl Into<AttrInput>) -> (CompactString, AttrValue) {
    let name = normalize_name(name);
    let value = match value.into() {
        AttrInput::Str(s) => AttrValue::Str(s),
        AttrInput::Bool(true) => AttrValue::Str(name.clone()),
        AttrInput::Bool(false) => AttrValue::Absent,
    };
    (name, value)
}
