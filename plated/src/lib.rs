//! Build HTML documents in code and render them as text.
//!
//! plated provides:
//! - **Tag tree**: reference-counted [`Node`] handles with attributes, ordered
//!   children, and parent links
//! - **Scoped construction**: open a scope on a node and everything built
//!   inside it attaches to that node, no explicit `add` calls needed
//! - **Rendering**: pretty or compact HTML/XHTML with escaping and
//!   inline-vs-block layout
//! - **Documents**: doctype, `<head>`, `<title>` and `<body>` scaffolding
//!
//! # Example
//!
//! ```rust
//! use plated::{attrs, Document};
//! use plated::tags::{div, li, p, span, ul};
//!
//! let doc = Document::new("Example");
//! {
//!     let _body = doc.enter_scope();
//!     let list = ul(());
//!     {
//!         let _list = list.enter_scope();
//!         for item in ["one", "two"] {
//!             li(item);
//!         }
//!     }
//!     div((p("hello"), span(("world", attrs([("cls", "hi")])))));
//! }
//!
//! let html = doc.to_string();
//! assert!(html.starts_with("<!DOCTYPE html>\n<html>"));
//! assert!(html.contains("<li>two</li>"));
//! assert!(html.contains("<span class=\"hi\">world</span>"));
//! ```

#[macro_use]
mod tracing_macros;

pub mod attributes;
pub mod context;
pub mod document;
mod error;
pub mod escape;
mod node;
pub mod render;
pub mod tags;
mod template;
mod tree;
pub mod util;

pub use attributes::{AttrInput, AttrValue, Attrs, attrs};
pub use context::Scope;
pub use document::Document;
pub use error::{BuildError, Result};
pub use node::{Child, Node, NodeType};
pub use render::RenderOptions;
pub use template::Template;
pub use tree::{Addable, Filter, no_attrs};
pub use util::{include, lazy, raw, system, text};
