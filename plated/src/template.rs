//! Reusable tag templates.

use compact_str::CompactString;

use crate::context;
use crate::error::Result;
use crate::node::{Node, NodeKind};
use crate::tags;

/// A node used as a pattern: every instantiation is an independent deep copy.
///
/// ```rust
/// use plated::{Template, tags::{div, li, ul}};
///
/// let card = Template::new(div(()).with_attr("cls", "card"));
/// let list = ul(());
/// let _scope = list.enter_scope();
/// let a = card.apply(|_| { li("first"); }).unwrap();
/// let b = card.apply(|_| { li("second"); }).unwrap();
/// assert!(!a.ptr_eq(&b));
/// assert_eq!(a.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    prototype: Node,
}

impl Template {
    /// Wrap `prototype`. If it was constructed inside an open scope, that
    /// scope will no longer attach it.
    pub fn new(prototype: Node) -> Self {
        context::mark_used(&prototype);
        Self { prototype }
    }

    /// Template for an empty tag with the usual flags for `name`.
    pub fn tag(name: impl Into<CompactString>) -> Self {
        let name = name.into();
        let flags = tags::flags_for(&name);
        Self {
            prototype: Node::detached(name, NodeKind::Element, flags),
        }
    }

    /// The node every instance is copied from.
    pub fn prototype(&self) -> &Node {
        &self.prototype
    }

    /// Deep-copy the prototype and register the copy with the innermost open
    /// scope, as if it had just been constructed there.
    pub fn instantiate(&self) -> Node {
        let node = self.prototype.deep_clone();
        context::register_if_active(&node);
        debug!(tag = %node.tag_name(), "instantiated template");
        node
    }

    /// Instantiate, then run `f` inside a scope on the new node so the nodes
    /// it constructs become the instance's children.
    pub fn apply(&self, f: impl FnOnce(&Node)) -> Result<Node> {
        let node = self.instantiate();
        let scope = node.enter_scope();
        f(&node);
        scope.exit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context;
    use facet_testhelpers::test;

    #[test]
    fn test_template_removed_from_construction_scope() {
        let body = Node::element("body");
        let scope = body.enter_scope();
        let proto = Node::element("section");
        let template = Template::new(proto);
        let instance = template.instantiate();
        scope.exit().unwrap();

        assert_eq!(body.len(), 1);
        assert_eq!(body.child(0).unwrap().as_node(), Some(&instance));
        assert!(template.prototype().parent().is_none());
    }

    #[test]
    fn test_instances_do_not_alias() {
        let template = Template::new(Node::element("div").with_attr("id", "proto"));
        let a = template.instantiate();
        let b = template.instantiate();
        a.set_attr("id", "a");
        assert_eq!(b.attr("id").unwrap(), "proto");
        assert_eq!(template.prototype().attr("id").unwrap(), "proto");
    }

    #[test]
    fn test_apply_collects_children() {
        let template = Template::tag("ul");
        let list = template
            .apply(|_| {
                Node::element("li");
                Node::element("li");
            })
            .unwrap();
        assert_eq!(list.len(), 2);
        assert!(!context::is_active());
    }

    #[test]
    fn test_tag_template_uses_tag_flags() {
        assert!(Template::tag("hr").instantiate().is_single());
        assert!(!Template::tag("pre").instantiate().is_pretty());
    }
}
