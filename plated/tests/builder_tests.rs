//! Building, editing and querying trees through the public API.

use facet_testhelpers::test;
use plated::tags::{a, comment, div, li, p, span, ul};
use plated::{AttrValue, BuildError, Child, Filter, NodeType, attrs, lazy, no_attrs};

#[test]
fn constructor_mixes_children_text_and_attributes() {
    let link = a(("home", attrs([("href", "/"), ("cls", "nav")])));
    assert_eq!(link.attr("href").unwrap(), "/");
    assert_eq!(link.attr("class").unwrap(), "nav");
    assert_eq!(link.children(), vec![Child::text("home")]);
}

#[test]
fn optional_and_sequence_content_flattens() {
    let maybe: Option<&str> = None;
    let items: Vec<_> = ["x", "y", "z"].into_iter().map(li).collect();
    let list = ul((maybe, items, Some(li("last"))));
    assert_eq!(list.len(), 4);
    assert_eq!(list.get_elements_by_tag_name("li").len(), 4);
}

#[test]
fn indexing_replacing_and_removing_children() {
    let list = ul((li("a"), li("b"), li("c")));
    let b = list.child(1).unwrap();
    list.remove(&b).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list.remove(&b), Err(BuildError::ChildNotFound));

    list.set_child(0, li("A")).unwrap();
    assert_eq!(list.child(0).unwrap().as_node().unwrap().text_content(), "A");
    assert_eq!(list.child(5), Err(BuildError::MissingChild { index: 5 }));
}

#[test]
fn moving_a_node_between_parents() {
    let item = li("moved");
    let first = ul(&item);
    let second = ul(());
    second.add(&item).unwrap();

    assert!(first.is_empty());
    assert_eq!(second.len(), 1);
    assert_eq!(item.parent(), Some(second));
}

#[test]
fn cycles_are_rejected() {
    let outer = div(());
    let inner = outer.add(div(())).unwrap();
    assert_eq!(inner.add(&outer), Err(BuildError::Cycle));
    assert_eq!(outer.add(&outer), Err(BuildError::Cycle));
    assert_eq!(outer.len(), 1);
    assert!(outer.parent().is_none());
}

#[test]
fn attribute_aliases_and_removal() {
    let label = span(());
    label.set_attr("html_for", "name");
    label.set_attr("aria_hidden", true);
    label.set_attr("data_count", 3);
    label.set_attr("hidden", false);

    assert_eq!(label.attr("for").unwrap(), "name");
    assert_eq!(label.attr("aria-hidden").unwrap(), "aria-hidden");
    assert_eq!(label.attr("data-count").unwrap(), "3");
    assert_eq!(label.attr("hidden").unwrap(), AttrValue::Absent);

    assert_eq!(label.remove_attr("for").unwrap(), "name");
    assert_eq!(
        label.attr("for"),
        Err(BuildError::MissingAttribute {
            name: "for".to_string()
        })
    );
}

#[test]
fn get_walks_in_document_order() {
    let root = div((
        div(p("one")).with_attr("cls", "x"),
        p("two").with_attr("cls", "x"),
        span("three"),
    ));

    let tags: Vec<String> = root
        .get(Filter::Any, [("cls", "x")])
        .iter()
        .filter_map(|c| c.as_node())
        .map(|n| n.tag_name().to_string())
        .collect();
    assert_eq!(tags, vec!["div", "p"]);

    let paragraphs = root.get("p", no_attrs());
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(root.get(Filter::Text, no_attrs()).len(), 3);
}

#[test]
fn get_by_node_kind() {
    let root = div((comment("c"), lazy(|| "later"), p("x")));
    let comments = root.get(Filter::Comment, no_attrs());
    assert_eq!(comments.len(), 1);
    assert_eq!(
        comments[0].as_node().unwrap().node_type(),
        NodeType::Comment
    );
    assert!(root.contains(Filter::Lazy));
    assert!(!root.contains("table"));
}

#[test]
fn element_by_id() {
    let target = p("found").with_attr("id", "t");
    let root = div(div((span(()), &target)));
    assert_eq!(root.get_element_by_id("t"), Some(target));
    assert_eq!(root.get_element_by_id("missing"), None);
}

#[test]
fn clear_detaches_children() {
    let child = p("x");
    let root = div(&child);
    root.clear();
    assert!(root.is_empty());
    assert!(child.parent().is_none());
}

#[test]
fn deep_clone_is_independent() {
    let original = div(p("x").with_attr("id", "a"));
    let copy = original.deep_clone();
    copy.get_element_by_id("a").unwrap().set_attr("id", "b");

    assert!(original.get_element_by_id("a").is_some());
    assert!(copy.get_element_by_id("a").is_none());
    assert!(copy.parent().is_none());
}
