//! Serialize a tree to HTML or XHTML text.
//!
//! Layout rules:
//!
//! - attributes are written in lexicographic order, values escaped and
//!   double-quoted; attributes set to `false` are skipped
//! - single (void) elements get no closing tag, and `<tag />` in XHTML mode
//! - in pretty mode every non-inline child node starts on a new line indented
//!   one unit deeper than its parent, and the closing tag goes on its own line
//!   if any child did
//! - a node that is not pretty (like `<pre>`) turns pretty mode off for its
//!   whole subtree
//! - text fragments are written verbatim: they were escaped when added

use compact_str::CompactString;
use facet::Facet;
use std::fmt::{self, Write};

use crate::escape::escape;
use crate::node::{Child, Node, NodeData, NodeKind};

/// Options for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Facet)]
pub struct RenderOptions {
    /// Indentation unit repeated once per depth level (default: two spaces)
    pub indent: String,
    /// Whether to put block children on their own lines (default: true)
    pub pretty: bool,
    /// Whether to close single elements with ` />` (default: false)
    pub xhtml: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            pretty: true,
            xhtml: false,
        }
    }
}

impl RenderOptions {
    /// Create new default options (pretty HTML, two-space indent).
    pub fn new() -> Self {
        Self::default()
    }

    /// Render everything on one line.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// Set a custom indentation unit.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Emit XHTML-style self-closing tags.
    pub fn xhtml(mut self) -> Self {
        self.xhtml = true;
        self
    }
}

/// Attribute holding a conditional comment's condition.
const COMMENT_CONDITION: &str = "condition";
/// Attribute that, set to `revealed`, makes a downlevel-revealed comment.
const COMMENT_DOWNLEVEL: &str = "downlevel";

struct Renderer<'a, W: Write> {
    out: &'a mut W,
    options: &'a RenderOptions,
}

impl<'a, W: Write> Renderer<'a, W> {
    fn new(out: &'a mut W, options: &'a RenderOptions) -> Self {
        Self { out, options }
    }

    fn write_newline_indent(&mut self, depth: usize) -> fmt::Result {
        self.out.write_char('\n')?;
        for _ in 0..depth {
            self.out.write_str(&self.options.indent)?;
        }
        Ok(())
    }

    fn write_node(&mut self, node: &Node, depth: usize, pretty: bool) -> fmt::Result {
        // Lazy callables run without holding a borrow on their node.
        let lazy = match &node.0.borrow().kind {
            NodeKind::Lazy(func) => Some(func.clone()),
            _ => None,
        };
        if let Some(func) = lazy {
            return self.out.write_str(&func());
        }

        let is_comment = match &node.0.borrow().kind {
            NodeKind::Text(text) => return self.out.write_str(text),
            NodeKind::Comment => true,
            _ => false,
        };
        if is_comment {
            self.write_comment(node, depth, pretty)
        } else {
            self.write_element(node, depth, pretty)
        }
    }

    /// `<tag attrs>`, or the self-closing form for single elements.
    fn write_open_tag(&mut self, data: &NodeData) -> fmt::Result {
        write!(self.out, "<{}", data.tag)?;

        let mut attrs: Vec<_> = data.attrs.iter().collect();
        attrs.sort_by(|(a, _), (b, _)| a.cmp(b));
        for (name, value) in attrs {
            if let Some(value) = value.as_str() {
                write!(self.out, " {}=\"{}\"", name, escape(value, true))?;
            }
        }

        if data.flags.single && self.options.xhtml {
            self.out.write_str(" />")
        } else {
            self.out.write_char('>')
        }
    }

    fn write_element(&mut self, node: &Node, depth: usize, pretty: bool) -> fmt::Result {
        // Children are rendered from a snapshot, with the node unborrowed.
        let (tag, flags, children) = {
            let data = node.0.borrow();
            self.write_open_tag(&data)?;
            (data.tag.clone(), data.flags, data.children.clone())
        };
        if flags.single {
            return Ok(());
        }

        let pretty = pretty && flags.pretty;
        let inline = self.write_children(&children, depth + 1, pretty)?;
        if pretty && !inline {
            self.write_newline_indent(depth)?;
        }

        write!(self.out, "</{tag}>")
    }

    /// Write children at `depth`. Returns true if no child went on a new line.
    fn write_children(
        &mut self,
        children: &[Child],
        depth: usize,
        pretty: bool,
    ) -> Result<bool, fmt::Error> {
        let mut inline = true;
        for child in children {
            match child {
                Child::Node(node) => {
                    if pretty && !node.is_inline() {
                        inline = false;
                        self.write_newline_indent(depth)?;
                    }
                    self.write_node(node, depth, pretty)?;
                }
                Child::Text(text) => self.out.write_str(text)?,
            }
        }
        Ok(inline)
    }

    /// `<!--...-->`, `<!--[if c]>...<![endif]-->`, or downlevel-revealed
    /// `<![if c]>...<![endif]>`.
    fn write_comment(&mut self, node: &Node, depth: usize, pretty: bool) -> fmt::Result {
        let (condition, revealed, children) = {
            let data = node.0.borrow();
            let condition = data
                .attrs
                .get(COMMENT_CONDITION)
                .and_then(|v| v.as_str())
                .map(CompactString::from);
            let revealed = data
                .attrs
                .get(COMMENT_DOWNLEVEL)
                .is_some_and(|v| *v == "revealed");
            (condition, revealed, data.children.clone())
        };

        self.out.write_str("<!")?;
        if !revealed {
            self.out.write_str("--")?;
        }
        if let Some(condition) = &condition {
            write!(self.out, "[if {condition}]>")?;
        }

        let depth = depth.saturating_sub(1);
        self.write_children(&children, depth, pretty)?;
        if children.iter().any(|c| matches!(c, Child::Node(_))) {
            self.write_newline_indent(depth)?;
        }

        if condition.is_some() {
            self.out.write_str("<![endif]")?;
        }
        if !revealed {
            self.out.write_str("--")?;
        }
        self.out.write_char('>')
    }
}

impl Node {
    /// Render this node and its subtree.
    pub fn render(&self, options: &RenderOptions) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.render_to(&mut out, options);
        out
    }

    /// Render into any [`fmt::Write`] sink.
    pub fn render_to<W: Write>(&self, out: &mut W, options: &RenderOptions) -> fmt::Result {
        Renderer::new(out, options).write_node(self, 0, options.pretty)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render_to(f, &RenderOptions::default())
    }
}

// =============================================================================
// Tests
// =============================================================================
