//! Adding, removing and querying children.

use compact_str::{CompactString, ToCompactString};
use smallvec::SmallVec;

use crate::attributes::{AttrInput, AttrValue, Attrs, normalize_pair};
use crate::context;
use crate::error::{BuildError, Result};
use crate::escape::escape;
use crate::node::{Child, Node, NodeKind};

/// Anything that can be passed to [`Node::add`].
///
/// Strings and numbers become escaped text, nodes become children, [`Attrs`]
/// set attributes, and sequences are flattened recursively.
#[derive(Debug, Clone)]
pub enum Addable {
    /// Text to escape and append.
    Text(CompactString),
    /// A child node.
    Node(Node),
    /// Attributes to set on the receiving node.
    Attrs(Attrs),
    /// A sequence, added item by item.
    Many(Vec<Addable>),
}

impl From<&str> for Addable {
    fn from(s: &str) -> Self {
        Addable::Text(s.into())
    }
}

impl From<String> for Addable {
    fn from(s: String) -> Self {
        Addable::Text(s.into())
    }
}

impl From<&String> for Addable {
    fn from(s: &String) -> Self {
        Addable::Text(s.as_str().into())
    }
}

impl From<CompactString> for Addable {
    fn from(s: CompactString) -> Self {
        Addable::Text(s)
    }
}

macro_rules! addable_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Addable {
                fn from(v: $ty) -> Self {
                    Addable::Text(v.to_compact_string())
                }
            }
        )*
    };
}

addable_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<Node> for Addable {
    fn from(n: Node) -> Self {
        Addable::Node(n)
    }
}

impl From<&Node> for Addable {
    fn from(n: &Node) -> Self {
        Addable::Node(n.clone())
    }
}

impl From<Attrs> for Addable {
    fn from(a: Attrs) -> Self {
        Addable::Attrs(a)
    }
}

impl From<()> for Addable {
    fn from(_: ()) -> Self {
        Addable::Many(Vec::new())
    }
}

impl<T: Into<Addable>> From<Option<T>> for Addable {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Addable::Many(Vec::new()),
        }
    }
}

impl<T: Into<Addable>> From<Vec<T>> for Addable {
    fn from(v: Vec<T>) -> Self {
        Addable::Many(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Addable>, const N: usize> From<[T; N]> for Addable {
    fn from(v: [T; N]) -> Self {
        Addable::Many(v.into_iter().map(Into::into).collect())
    }
}

macro_rules! addable_from_tuple {
    ($($name:ident),+) => {
        impl<$($name: Into<Addable>),+> From<($($name,)+)> for Addable {
            #[allow(non_snake_case)]
            fn from(($($name,)+): ($($name,)+)) -> Self {
                Addable::Many(vec![$($name.into()),+])
            }
        }
    };
}

addable_from_tuple!(A);
addable_from_tuple!(A, B);
addable_from_tuple!(A, B, C);
addable_from_tuple!(A, B, C, D);
addable_from_tuple!(A, B, C, D, E);
addable_from_tuple!(A, B, C, D, E, F);
addable_from_tuple!(A, B, C, D, E, F, G);
addable_from_tuple!(A, B, C, D, E, F, G, H);

/// Which nodes [`Node::get`] collects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every node, text fragments excluded.
    Any,
    /// Nodes with this tag name.
    Tag(CompactString),
    /// Text fragments and text nodes.
    Text,
    /// Comment nodes.
    Comment,
    /// Lazy nodes.
    Lazy,
}

impl Filter {
    /// Filter by tag name.
    pub fn tag(name: impl Into<CompactString>) -> Self {
        Filter::Tag(name.into())
    }

    fn matches(&self, child: &Child) -> bool {
        match (self, child) {
            (Filter::Text, Child::Text(_)) => true,
            (_, Child::Text(_)) => false,
            (Filter::Any, Child::Node(_)) => true,
            (Filter::Tag(name), Child::Node(n)) => n.0.borrow().tag == *name,
            (Filter::Text, Child::Node(n)) => matches!(n.0.borrow().kind, NodeKind::Text(_)),
            (Filter::Comment, Child::Node(n)) => matches!(n.0.borrow().kind, NodeKind::Comment),
            (Filter::Lazy, Child::Node(n)) => matches!(n.0.borrow().kind, NodeKind::Lazy(_)),
        }
    }
}

impl From<&str> for Filter {
    fn from(name: &str) -> Self {
        Filter::tag(name)
    }
}

impl Node {
    /// Add children, text, or attributes, and return the argument.
    ///
    /// ```rust
    /// use plated::tags::{li, ul};
    ///
    /// let list = ul(());
    /// let item = list.add(li("one")).unwrap();
    /// item.set_attr("cls", "first");
    /// assert_eq!(list.render(&Default::default()), "<ul>\n  <li class=\"first\">one</li>\n</ul>");
    /// ```
    ///
    /// A node that is already attached elsewhere is moved here. Adding a node
    /// to itself or to one of its descendants fails with [`BuildError::Cycle`];
    /// items before the offending one stay added.
    pub fn add<T>(&self, item: T) -> Result<T>
    where
        T: Into<Addable> + Clone,
    {
        self.add_addable(item.clone().into())?;
        Ok(item)
    }

    pub(crate) fn add_addable(&self, item: Addable) -> Result<()> {
        match item {
            Addable::Text(s) => {
                let fragment = escape(&s, true);
                self.0.borrow_mut().children.push(Child::Text(fragment.into()));
            }
            Addable::Node(child) => {
                self.adopt(&child)?;
                context::mark_used(&child);
                trace!(parent = %self.tag_name(), child = %child.tag_name(), "attached child");
                self.0.borrow_mut().children.push(Child::Node(child));
            }
            Addable::Attrs(attrs) => {
                let mut data = self.0.borrow_mut();
                for (name, value) in attrs.normalized() {
                    data.attrs.insert(name, value);
                }
            }
            Addable::Many(items) => {
                for item in items {
                    self.add_addable(item)?;
                }
            }
        }
        Ok(())
    }

    /// Attach a node that cannot be an ancestor of `self`, such as one that
    /// was just created.
    pub(crate) fn attach_fresh(&self, child: &Node) {
        if let Err(_err) = self.add_addable(Addable::Node(child.clone())) {
            warn!(%_err, "failed to attach fresh node");
        }
    }

    /// Append escaped text. Same as adding a string, but cannot fail.
    pub fn add_text(&self, s: &str) {
        self.0.borrow_mut().children.push(Child::text(s));
    }

    /// Append a fragment verbatim, without escaping.
    pub fn add_raw(&self, s: &str) {
        self.0.borrow_mut().children.push(Child::raw(s));
    }

    /// Remove the first child equal to `item`. Nodes compare by identity,
    /// text fragments by content.
    pub fn remove(&self, item: &Child) -> Result<()> {
        let removed = {
            let mut data = self.0.borrow_mut();
            let pos = data
                .children
                .iter()
                .position(|c| c == item)
                .ok_or(BuildError::ChildNotFound)?;
            data.children.remove(pos)
        };
        self.release(&removed);
        Ok(())
    }

    /// Remove every child.
    pub fn clear(&self) {
        let children = std::mem::take(&mut self.0.borrow_mut().children);
        for child in &children {
            self.release(child);
        }
    }

    /// Recursively collect descendants that match `filter` and every
    /// `(name, value)` in `attrs`.
    ///
    /// Results are in document order: a match comes before its own matching
    /// descendants. Attribute names and values are normalized the same way
    /// as when setting them. Text fragments carry no attributes and always
    /// pass the attribute check.
    pub fn get<I, K, V>(&self, filter: impl Into<Filter>, attrs: I) -> Vec<Child>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<AttrInput>,
    {
        let filter = filter.into();
        let wanted: SmallVec<[(CompactString, AttrValue); 4]> = attrs
            .into_iter()
            .map(|(k, v)| normalize_pair(k.as_ref(), v))
            .collect();
        let mut results = Vec::new();
        self.collect_matching(&filter, &wanted, &mut results);
        results
    }

    fn collect_matching(
        &self,
        filter: &Filter,
        wanted: &[(CompactString, AttrValue)],
        results: &mut Vec<Child>,
    ) {
        for child in self.children() {
            if filter.matches(&child) {
                let attrs_match = match &child {
                    Child::Text(_) => true,
                    Child::Node(n) => {
                        let data = n.0.borrow();
                        wanted
                            .iter()
                            .all(|(name, value)| data.attrs.get(name) == Some(value))
                    }
                };
                if attrs_match {
                    results.push(child.clone());
                }
            }
            if let Child::Node(n) = &child {
                n.collect_matching(filter, wanted, results);
            }
        }
    }

    /// Returns true if any descendant matches `filter`.
    pub fn contains(&self, filter: impl Into<Filter>) -> bool {
        !self.get(filter, no_attrs()).is_empty()
    }

    /// First descendant whose `id` attribute equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<Node> {
        self.get(Filter::Any, [("id", id)])
            .into_iter()
            .find_map(|c| c.as_node().cloned())
    }

    /// All descendants with the given tag name.
    pub fn get_elements_by_tag_name(&self, name: &str) -> Vec<Node> {
        self.get(Filter::tag(name), no_attrs())
            .into_iter()
            .filter_map(|c| c.as_node().cloned())
            .collect()
    }
}

/// Empty attribute filter for [`Node::get`].
pub fn no_attrs() -> [(&'static str, &'static str); 0] {
    []
}
