//! The tag tree.
//!
//! A [`Node`] is a cheap, reference-counted handle: cloning it clones the
//! handle, not the subtree (use [`Node::deep_clone`] for that). Parent and
//! document links are weak, so a tree is freed as soon as nothing holds its
//! root.
//!
//! Nodes are `!Send`. A tree lives on the thread that built it, which is also
//! what keeps the scoped-construction stack in [`crate::context`] sound.

use compact_str::CompactString;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::attributes::{AttrInput, AttrValue, normalize_name, normalize_pair};
use crate::context;
use crate::error::{BuildError, Result};
use crate::escape::escape;
use crate::tree::Addable;

pub(crate) type WeakNode = Weak<RefCell<NodeData>>;

/// Handle to one element, text, comment or lazy node.
///
/// Equality is identity: two handles are equal when they point at the same
/// node.
#[derive(Clone)]
pub struct Node(pub(crate) Rc<RefCell<NodeData>>);

/// What kind of node a [`Node`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// A regular tag with attributes and children.
    Element,
    /// A standalone text node (see [`crate::util::text`]).
    Text,
    /// An HTML comment (see [`crate::tags::comment`]).
    Comment,
    /// A node whose content is computed at render time.
    Lazy,
}

#[derive(Clone)]
pub(crate) enum NodeKind {
    Element,
    /// Already escaped, or raw if built with `raw`.
    Text(CompactString),
    Comment,
    Lazy(Rc<dyn Fn() -> String>),
}

/// Layout flags consulted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeFlags {
    /// No children, no closing tag.
    pub single: bool,
    /// Whitespace inside may be reformatted.
    pub pretty: bool,
    /// Kept on its parent's line.
    pub inline: bool,
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self {
            single: false,
            pretty: true,
            inline: false,
        }
    }
}

pub(crate) struct NodeData {
    pub tag: CompactString,
    pub kind: NodeKind,
    pub attrs: IndexMap<CompactString, AttrValue>,
    pub children: Vec<Child>,
    pub parent: Option<WeakNode>,
    pub document: Option<WeakNode>,
    pub flags: NodeFlags,
    /// Scope frame this node registered with at construction.
    pub frame: Option<u64>,
}

/// One entry in a node's child list.
#[derive(Clone)]
pub enum Child {
    /// A nested node.
    Node(Node),
    /// A text fragment, stored exactly as it will be rendered.
    Text(CompactString),
}

impl Child {
    /// Escaped text fragment.
    pub fn text(s: &str) -> Self {
        Child::Text(escape(s, true).into())
    }

    /// Unescaped text fragment.
    pub fn raw(s: impl Into<CompactString>) -> Self {
        Child::Text(s.into())
    }

    /// Get as node reference.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Child::Node(n) => Some(n),
            Child::Text(_) => None,
        }
    }

    /// Get as text fragment.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Child::Text(t) => Some(t.as_str()),
            Child::Node(_) => None,
        }
    }

    /// Returns true if this is a text fragment.
    pub fn is_text(&self) -> bool {
        matches!(self, Child::Text(_))
    }
}

impl PartialEq for Child {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Child::Node(a), Child::Node(b)) => a == b,
            (Child::Text(a), Child::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Child {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Child::Node(n) => fmt::Debug::fmt(n, f),
            Child::Text(t) => fmt::Debug::fmt(t.as_str(), f),
        }
    }
}

impl From<Node> for Child {
    fn from(n: Node) -> Self {
        Child::Node(n)
    }
}

impl From<&Node> for Child {
    fn from(n: &Node) -> Self {
        Child::Node(n.clone())
    }
}

impl From<&str> for Child {
    fn from(s: &str) -> Self {
        Child::text(s)
    }
}

impl From<String> for Child {
    fn from(s: String) -> Self {
        Child::text(&s)
    }
}

impl Node {
    pub(crate) fn from_data(data: NodeData) -> Self {
        Node(Rc::new(RefCell::new(data)))
    }

    /// Allocate a node without registering it with the active scope.
    pub(crate) fn detached(
        tag: impl Into<CompactString>,
        kind: NodeKind,
        flags: NodeFlags,
    ) -> Self {
        Self::from_data(NodeData {
            tag: tag.into(),
            kind,
            attrs: IndexMap::new(),
            children: Vec::new(),
            parent: None,
            document: None,
            flags,
            frame: None,
        })
    }

    /// Finish construction: add the initial content, then join the active
    /// scope. Children are added first so the scope sees them as used.
    pub(crate) fn construct(self, content: Addable) -> Self {
        // A node with no parent cannot be its own descendant's child, so
        // attaching to it cannot fail.
        if let Err(_err) = self.add_addable(content) {
            warn!(%_err, "initial content rejected");
        }
        context::register_if_active(&self);
        self
    }

    /// Create an element with the given tag name.
    ///
    /// The element joins the innermost open scope, if any.
    pub fn element(tag: impl Into<CompactString>) -> Self {
        Self::detached(tag, NodeKind::Element, NodeFlags::default())
            .construct(Addable::Many(Vec::new()))
    }

    /// Create an element with the given tag name and initial content.
    pub fn with_content(tag: impl Into<CompactString>, content: impl Into<Addable>) -> Self {
        Self::detached(tag, NodeKind::Element, NodeFlags::default()).construct(content.into())
    }

    pub(crate) fn downgrade(&self) -> WeakNode {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn key(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    /// Returns true if both handles point at the same node.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The tag name used in the opening and closing tags.
    pub fn tag_name(&self) -> CompactString {
        self.0.borrow().tag.clone()
    }

    /// Override the tag name.
    pub fn set_tag_name(&self, tag: impl Into<CompactString>) {
        self.0.borrow_mut().tag = tag.into();
    }

    /// What kind of node this is.
    pub fn node_type(&self) -> NodeType {
        match self.0.borrow().kind {
            NodeKind::Element => NodeType::Element,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Comment => NodeType::Comment,
            NodeKind::Lazy(_) => NodeType::Lazy,
        }
    }

    // -------------------------------------------------------------------------
    // Flags
    // -------------------------------------------------------------------------

    /// Self-closing element (`<br>`): never has children or a closing tag.
    pub fn is_single(&self) -> bool {
        self.0.borrow().flags.single
    }

    pub fn set_single(&self, single: bool) {
        self.0.borrow_mut().flags.single = single;
    }

    /// Whether whitespace inside may be reformatted. `<pre>` is not pretty.
    pub fn is_pretty(&self) -> bool {
        self.0.borrow().flags.pretty
    }

    pub fn set_pretty(&self, pretty: bool) {
        self.0.borrow_mut().flags.pretty = pretty;
    }

    /// Whether this node stays on its parent's line when pretty-printing.
    pub fn is_inline(&self) -> bool {
        self.0.borrow().flags.inline
    }

    pub fn set_inline(&self, inline: bool) {
        self.0.borrow_mut().flags.inline = inline;
    }

    /// Builder form of [`Node::set_inline`]`(true)`.
    pub fn inline(self) -> Self {
        self.set_inline(true);
        self
    }

    /// Builder form of [`Node::set_pretty`]`(false)`.
    pub fn not_pretty(self) -> Self {
        self.set_pretty(false);
        self
    }

    /// Builder form of [`Node::set_attr`].
    pub fn with_attr(self, name: &str, value: impl Into<AttrInput>) -> Self {
        self.set_attr(name, value);
        self
    }

    // -------------------------------------------------------------------------
    // Links
    // -------------------------------------------------------------------------

    /// The node this one was last attached to.
    pub fn parent(&self) -> Option<Node> {
        self.0.borrow().parent.as_ref().and_then(Weak::upgrade).map(Node)
    }

    /// Root of the document this node belongs to, if it is attached under one.
    pub fn document(&self) -> Option<Node> {
        self.0.borrow().document.as_ref().and_then(Weak::upgrade).map(Node)
    }

    /// Push a document link down the subtree. Stops at nodes that already
    /// carry it.
    pub(crate) fn set_document(&self, doc: Option<WeakNode>) {
        let children: Vec<Node> = {
            let mut data = self.0.borrow_mut();
            let same = match (&data.document, &doc) {
                (None, None) => true,
                (Some(a), Some(b)) => a.ptr_eq(b),
                _ => false,
            };
            if same {
                return;
            }
            data.document = doc.clone();
            data.children
                .iter()
                .filter_map(|c| c.as_node().cloned())
                .collect()
        };
        for child in children {
            child.set_document(doc.clone());
        }
    }

    /// Returns true if `self` is `other` or one of its ancestors.
    pub(crate) fn is_ancestor_or_self_of(&self, other: &Node) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node.ptr_eq(self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Link `child` under `self` without touching the child list: rejects
    /// cycles, detaches from the previous parent, sets the back-reference and
    /// the document.
    pub(crate) fn adopt(&self, child: &Node) -> Result<()> {
        if child.is_ancestor_or_self_of(self) {
            warn!(parent = %self.tag_name(), child = %child.tag_name(), "rejected cyclic add");
            return Err(BuildError::Cycle);
        }

        if let Some(old) = child.parent() {
            old.detach_child(child);
        }

        child.0.borrow_mut().parent = Some(self.downgrade());
        let doc = self.0.borrow().document.clone();
        child.set_document(doc);
        Ok(())
    }

    /// Remove the first listing of `child`, returning its former index.
    pub(crate) fn detach_child(&self, child: &Node) -> Option<usize> {
        let mut data = self.0.borrow_mut();
        let pos = data
            .children
            .iter()
            .position(|c| c.as_node().is_some_and(|n| n.ptr_eq(child)))?;
        data.children.remove(pos);
        Some(pos)
    }

    /// Clear a removed child's back-reference if it still points here.
    pub(crate) fn release(&self, child: &Child) {
        if let Child::Node(n) = child {
            let mut data = n.0.borrow_mut();
            if data
                .parent
                .as_ref()
                .is_some_and(|p| std::ptr::eq(p.as_ptr(), Rc::as_ptr(&self.0)))
            {
                data.parent = None;
            }
        }
    }

    // -------------------------------------------------------------------------
    // Children by index
    // -------------------------------------------------------------------------

    /// Snapshot of the child list, in render order.
    pub fn children(&self) -> Vec<Child> {
        self.0.borrow().children.clone()
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// Returns true if there are no children.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().children.is_empty()
    }

    /// Get the child at `index`.
    pub fn child(&self, index: usize) -> Result<Child> {
        self.0
            .borrow()
            .children
            .get(index)
            .cloned()
            .ok_or(BuildError::MissingChild { index })
    }

    /// Replace the child at `index`.
    ///
    /// A node that is already listed elsewhere is moved, not duplicated. If it
    /// was an earlier child of this same node, later indices shift down by one
    /// before the replacement happens.
    pub fn set_child(&self, index: usize, child: impl Into<Child>) -> Result<()> {
        let child = child.into();
        let mut index = index;
        if index >= self.len() {
            return Err(BuildError::MissingChild { index });
        }

        if let Child::Node(node) = &child {
            if self.child(index)? == child {
                return Ok(());
            }
            if node.is_ancestor_or_self_of(self) {
                return Err(BuildError::Cycle);
            }
            if let Some(old) = node.parent() {
                let from = old.detach_child(node);
                if old.ptr_eq(self) && from.is_some_and(|from| from < index) {
                    index -= 1;
                }
            }
            self.adopt(node)?;
            context::mark_used(node);
        }

        let replaced = std::mem::replace(&mut self.0.borrow_mut().children[index], child);
        self.release(&replaced);
        Ok(())
    }

    /// Remove and return the child at `index`.
    pub fn remove_child(&self, index: usize) -> Result<Child> {
        let removed = {
            let mut data = self.0.borrow_mut();
            if index >= data.children.len() {
                return Err(BuildError::MissingChild { index });
            }
            data.children.remove(index)
        };
        self.release(&removed);
        Ok(removed)
    }

    // -------------------------------------------------------------------------
    // Attributes by name
    // -------------------------------------------------------------------------

    /// Get an attribute. The name is normalized first, so `attr("cls")`
    /// reads `class`.
    pub fn attr(&self, name: &str) -> Result<AttrValue> {
        let key = normalize_name(name);
        self.0
            .borrow()
            .attrs
            .get(&key)
            .cloned()
            .ok_or_else(|| BuildError::MissingAttribute {
                name: key.to_string(),
            })
    }

    /// Get an attribute's string value, if it is set and not `false`.
    pub fn attr_str(&self, name: &str) -> Option<CompactString> {
        match self.attr(name) {
            Ok(AttrValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Set an attribute after normalizing its name and value.
    pub fn set_attr(&self, name: &str, value: impl Into<AttrInput>) {
        let (key, value) = normalize_pair(name, value);
        self.0.borrow_mut().attrs.insert(key, value);
    }

    /// Remove an attribute, returning its value.
    pub fn remove_attr(&self, name: &str) -> Result<AttrValue> {
        let key = normalize_name(name);
        self.0
            .borrow_mut()
            .attrs
            .shift_remove(&key)
            .ok_or_else(|| BuildError::MissingAttribute {
                name: key.to_string(),
            })
    }

    /// Snapshot of the attributes in insertion order.
    pub fn attributes(&self) -> Vec<(CompactString, AttrValue)> {
        self.0
            .borrow()
            .attrs
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Concatenated text fragments of the whole subtree, in markup form.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        let data = self.0.borrow();
        if let NodeKind::Text(t) = &data.kind {
            out.push_str(t);
        }
        for child in &data.children {
            match child {
                Child::Text(t) => out.push_str(t),
                Child::Node(n) => n.collect_text(out),
            }
        }
    }

    /// Copy the whole subtree. The copy has no parent and belongs to no scope.
    pub fn deep_clone(&self) -> Node {
        let data = self.0.borrow();
        let copy = Node::from_data(NodeData {
            tag: data.tag.clone(),
            kind: data.kind.clone(),
            attrs: data.attrs.clone(),
            children: Vec::with_capacity(data.children.len()),
            parent: None,
            document: data.document.clone(),
            flags: data.flags,
            frame: None,
        });
        for child in &data.children {
            let child = match child {
                Child::Node(n) => {
                    let cloned = n.deep_clone();
                    cloned.0.borrow_mut().parent = Some(copy.downgrade());
                    Child::Node(cloned)
                }
                Child::Text(t) => Child::Text(t.clone()),
            };
            copy.0.borrow_mut().children.push(child);
        }
        copy
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        let attrs = data.attrs.len();
        let children = data.children.len();
        write!(
            f,
            "<plated::Node {} at {:p}: {} attribute{}, {} child{}>",
            data.tag,
            Rc::as_ptr(&self.0),
            attrs,
            if attrs == 1 { "" } else { "s" },
            children,
            if children == 1 { "" } else { "ren" },
        )
    }
}
