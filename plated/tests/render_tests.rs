//! Rendering whole fragments with the different option sets.

use facet_testhelpers::test;
use plated::tags::{a, body, br, div, h1, img, input, li, nav, p, pre, span, textarea, ul};
use plated::{RenderOptions, attrs, raw};

fn navigation() -> plated::Node {
    nav(ul((
        li(a(("Home", attrs([("href", "/")])))),
        li(a(("About & contact", attrs([("href", "/about?x=1&y=2")])))),
    )))
}

#[test]
fn pretty_nested_document_fragment() {
    let page = body((h1("Title"), navigation()));
    assert_eq!(
        page.render(&RenderOptions::default()),
        "<body>\n\
         \x20 <h1>Title</h1>\n\
         \x20 <nav>\n\
         \x20   <ul>\n\
         \x20     <li>\n\
         \x20       <a href=\"/\">Home</a>\n\
         \x20     </li>\n\
         \x20     <li>\n\
         \x20       <a href=\"/about?x=1&amp;y=2\">About &amp; contact</a>\n\
         \x20     </li>\n\
         \x20   </ul>\n\
         \x20 </nav>\n\
         </body>"
    );
}

#[test]
fn compact_output_has_no_layout_whitespace() {
    let out = navigation().render(&RenderOptions::new().compact());
    assert!(!out.contains('\n'));
    assert!(out.starts_with("<nav><ul><li><a href=\"/\">Home</a></li>"));
}

#[test]
fn void_elements_with_and_without_xhtml() {
    let form = div((
        input(()).with_attr("type", "checkbox").with_attr("checked", true),
        br(()),
        img(()).with_attr("src", "a.png").with_attr("alt", ""),
    ));
    assert_eq!(
        form.render(&RenderOptions::new().compact()),
        "<div><input checked=\"checked\" type=\"checkbox\"><br><img alt=\"\" src=\"a.png\"></div>"
    );
    assert_eq!(
        form.render(&RenderOptions::new().compact().xhtml()),
        "<div><input checked=\"checked\" type=\"checkbox\" /><br /><img alt=\"\" src=\"a.png\" /></div>"
    );
}

#[test]
fn preformatted_content_is_left_alone() {
    let code = div((pre("fn main() {\n    body();\n}"), textarea("a\n b")));
    assert_eq!(
        code.to_string(),
        "<div>\n  <pre>fn main() {\n    body();\n}</pre>\n  <textarea>a\n b</textarea>\n</div>"
    );
}

#[test]
fn raw_markup_passes_through() {
    let frag = p(("Say ", raw("<em>hi</em>"), " & bye"));
    assert_eq!(frag.to_string(), "<p>Say <em>hi</em> &amp; bye</p>");
}

#[test]
fn render_to_writes_into_existing_buffer() {
    let mut out = String::from("<!-- header -->");
    span("x").render_to(&mut out, &RenderOptions::default()).unwrap();
    assert_eq!(out, "<!-- header --><span>x</span>");
}

#[test]
fn options_expose_their_fields() {
    let opts = RenderOptions::new().with_indent("    ").xhtml();
    assert_eq!(opts.indent, "    ");
    assert!(opts.pretty);
    assert!(opts.xhtml);
    assert_eq!(RenderOptions::default(), RenderOptions::new());
}
