//! Constructors for the standard HTML elements.
//!
//! Every constructor takes the initial content (anything that converts into
//! [`Addable`], `()` for none) and returns the new node, which also joins the
//! innermost open scope.
//!
//! ```rust
//! use plated::attrs;
//! use plated::tags::{a, li, ul};
//!
//! let nav = ul((
//!     li(a(("Home", attrs([("href", "/")])))),
//!     li(a(("About", attrs([("href", "/about")])))),
//! ));
//! assert_eq!(nav.len(), 2);
//! ```

use compact_str::CompactString;

use crate::node::{Node, NodeFlags, NodeKind};
use crate::tree::Addable;

/// Elements that never have children or a closing tag.
const SINGLE_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Elements whose whitespace is significant.
const NOT_PRETTY_ELEMENTS: &[&str] = &["pre", "textarea"];

/// Default layout flags for a tag name.
pub(crate) fn flags_for(name: &str) -> NodeFlags {
    NodeFlags {
        single: SINGLE_ELEMENTS.contains(&name),
        pretty: !NOT_PRETTY_ELEMENTS.contains(&name),
        inline: false,
    }
}

/// An element with an arbitrary tag name and that tag's default flags.
pub fn tag(name: impl Into<CompactString>, content: impl Into<Addable>) -> Node {
    let name = name.into();
    let flags = flags_for(&name);
    Node::detached(name, NodeKind::Element, flags).construct(content.into())
}

/// An HTML comment. A `condition` attribute makes it a conditional comment,
/// and `downlevel="revealed"` a downlevel-revealed one.
pub fn comment(content: impl Into<Addable>) -> Node {
    Node::detached("comment", NodeKind::Comment, NodeFlags::default()).construct(content.into())
}

macro_rules! html_tags {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("The `<", stringify!($name), ">` element.")]
            pub fn $name(content: impl Into<Addable>) -> Node {
                tag(stringify!($name), content)
            }
        )*
    };
}

// Document and metadata
html_tags!(html, head, title, base, link, meta, style, script, noscript, body);

// Sections
html_tags!(
    main, section, nav, article, aside, h1, h2, h3, h4, h5, h6, hgroup, header, footer, address,
);

// Grouping
html_tags!(p, hr, pre, blockquote, ol, ul, li, dl, dt, dd, figure, figcaption, div);

// Text-level
html_tags!(
    a, em, strong, small, s, cite, q, dfn, abbr, time, code, var, samp, kbd, sub, sup, i, b, u,
    mark, ruby, rt, rp, bdi, bdo, span, br, wbr, data, font,
);

// Edits
html_tags!(ins, del);

// Embedded content
html_tags!(
    img, iframe, embed, object, param, video, audio, source, track, canvas, map, area, svg, math,
    picture,
);

// Tables
html_tags!(table, caption, colgroup, col, tbody, thead, tfoot, tr, td, th);

// Forms
html_tags!(
    form, fieldset, legend, label, input, button, select, datalist, optgroup, option, textarea,
    keygen, output, progress, meter,
);

// Interactive
html_tags!(details, summary, command, menu, dialog, template);
