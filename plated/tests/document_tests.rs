//! Whole-page documents.

use facet_testhelpers::test;
use plated::tags::{div, h1, link, meta, p, script, title};
use plated::{Document, RenderOptions, attrs, context};

#[test]
fn empty_document_layout() {
    let doc = Document::new("Empty");
    assert_eq!(
        doc.render(&RenderOptions::default()),
        "<!DOCTYPE html>\n<html>\n  <head>\n    <title>Empty</title>\n  </head>\n  <body></body>\n</html>"
    );
}

#[test]
fn building_a_page_with_scopes() {
    let doc = Document::new("Blog & notes");
    doc.head()
        .with(|| {
            meta(()).with_attr("charset", "utf-8");
            link(()).with_attr("rel", "stylesheet").with_attr("href", "style.css");
        })
        .unwrap();
    doc.with(|| {
        h1("Posts");
        div(()).with(|| {
            context::attr(attrs([("id", "content")])).unwrap();
            p("first");
        })
        .unwrap();
        script(()).with_attr("src", "app.js");
    })
    .unwrap();

    assert_eq!(
        doc.render(&RenderOptions::new().compact()),
        "<!DOCTYPE html>\n\
         <html><head><title>Blog &amp; notes</title>\
         <meta charset=\"utf-8\"><link href=\"style.css\" rel=\"stylesheet\"></head>\
         <body><h1>Posts</h1><div id=\"content\"><p>first</p></div>\
         <script src=\"app.js\"></script></body></html>"
    );
    assert_eq!(doc.title(), "Blog & notes");
    assert_eq!(doc.body().len(), 3);
}

#[test]
fn nodes_learn_their_document() {
    let doc = Document::new("t");
    let detached = div(p("x"));
    assert!(detached.document().is_none());

    doc.add(&detached).unwrap();
    let inner = detached.get_elements_by_tag_name("p").remove(0);
    assert_eq!(inner.document(), Some(doc.root().clone()));

    doc.body().remove(&detached.clone().into()).unwrap();
    assert!(detached.parent().is_none());
    assert!(doc.body().is_empty());
}

#[test]
fn doctype_can_be_replaced_or_dropped() {
    let legacy = Document::new("x").with_doctype(Some(
        "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\">",
    ));
    assert!(legacy.to_string().starts_with("<!DOCTYPE html PUBLIC"));

    let mut bare = Document::default();
    bare.set_doctype(None::<String>);
    assert_eq!(bare.doctype(), None);
    assert!(bare.to_string().starts_with("<html>"));
}

#[test]
fn title_node_can_be_swapped() {
    let mut doc = Document::new("old");
    doc.set_title_node(title("new").with_attr("lang", "en")).unwrap();
    assert_eq!(doc.title(), "new");
    assert_eq!(doc.head().len(), 1);
    assert_eq!(doc.title_node().attr("lang").unwrap(), "en");
}

#[test]
fn debug_shows_title() {
    assert_eq!(format!("{:?}", Document::default()), "<plated::Document \"plated\">");
}
