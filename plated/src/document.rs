//! A full HTML page: doctype, `<html>`, `<head>` with a `<title>`, and `<body>`.

use std::fmt;

use crate::context::Scope;
use crate::error::Result;
use crate::escape::unescape;
use crate::node::{Child, Node};
use crate::render::RenderOptions;
use crate::tags;
use crate::tree::Addable;

/// Doctype written before the root element unless overridden.
pub const DEFAULT_DOCTYPE: &str = "<!DOCTYPE html>";

/// A complete HTML document.
///
/// Content added to the document goes into `<body>`:
///
/// ```rust
/// use plated::Document;
/// use plated::tags::p;
///
/// let doc = Document::new("Hello");
/// doc.add(p("world")).unwrap();
/// assert_eq!(
///     doc.to_string(),
///     "<!DOCTYPE html>\n<html>\n  <head>\n    <title>Hello</title>\n  </head>\n  <body>\n    <p>world</p>\n  </body>\n</html>"
/// );
/// ```
pub struct Document {
    root: Node,
    head: Node,
    body: Node,
    title_node: Node,
    doctype: Option<String>,
}

impl Document {
    /// Create a document with the given title and the HTML5 doctype.
    pub fn new(title: &str) -> Self {
        let root = tags::html(());
        root.set_document(Some(root.downgrade()));

        let head = tags::head(());
        let body = tags::body(());
        let title_node = tags::title(title);
        root.attach_fresh(&head);
        root.attach_fresh(&body);
        head.attach_fresh(&title_node);

        Self {
            root,
            head,
            body,
            title_node,
            doctype: Some(DEFAULT_DOCTYPE.to_string()),
        }
    }

    /// Replace the doctype line; `None` omits it.
    pub fn with_doctype(mut self, doctype: Option<impl Into<String>>) -> Self {
        self.doctype = doctype.map(Into::into);
        self
    }

    /// The doctype line, if any.
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    /// Change the doctype line.
    pub fn set_doctype(&mut self, doctype: Option<impl Into<String>>) {
        self.doctype = doctype.map(Into::into);
    }

    /// The `<html>` element.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The `<head>` element.
    pub fn head(&self) -> &Node {
        &self.head
    }

    /// The `<body>` element.
    pub fn body(&self) -> &Node {
        &self.body
    }

    /// The `<title>` element.
    pub fn title_node(&self) -> &Node {
        &self.title_node
    }

    /// The title text.
    pub fn title(&self) -> String {
        unescape(&self.title_node.text_content())
    }

    /// Replace the title text.
    pub fn set_title(&self, title: &str) {
        self.title_node.clear();
        self.title_node.add_text(title);
    }

    /// Replace the `<title>` element itself.
    pub fn set_title_node(&mut self, node: Node) -> Result<()> {
        self.head.remove(&Child::Node(self.title_node.clone()))?;
        self.head.add(&node)?;
        self.title_node = node;
        Ok(())
    }

    /// Add to `<body>`.
    pub fn add<T>(&self, item: T) -> Result<T>
    where
        T: Into<Addable> + Clone,
    {
        self.body.add(item)
    }

    /// Open a scope on `<body>`.
    pub fn enter_scope(&self) -> Scope {
        self.body.enter_scope()
    }

    /// Run `f` inside a scope on `<body>`.
    pub fn with<R>(&self, f: impl FnOnce() -> R) -> Result<R> {
        self.body.with(f)
    }

    /// Render the doctype line followed by the `<html>` tree.
    pub fn render(&self, options: &RenderOptions) -> String {
        let mut out = String::new();
        if let Some(doctype) = &self.doctype {
            out.push_str(doctype);
            out.push('\n');
        }
        let _ = self.root.render_to(&mut out, options);
        out
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("plated")
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&RenderOptions::default()))
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<plated::Document {:?}>", self.title())
    }
}
