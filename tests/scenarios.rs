#[macro_use]
extern crate pretty_assertions;

use std::io::Cursor;

use rumxml::{parse_stream, AttrSpec, Error, Schema};

fn cabinet_schema() -> Schema {
    let mut b = Schema::builder("cabinet");
    let root = b.root();
    let shelf = b
        .add_tag(root, "shelf", false, vec![AttrSpec::new("id", false)])
        .unwrap();
    b.add_tag(
        shelf,
        "bottle",
        false,
        vec![AttrSpec::new("type", true), AttrSpec::new("aged", false)],
    )
    .unwrap();
    b.add_tag(shelf, "glass", true, vec![AttrSpec::new("type", true)])
        .unwrap();
    b.build()
}

fn cabinet_with_attr_schema() -> Schema {
    let mut b = Schema::builder("cabinet");
    // no `attr` declared on the root tag
    b.build()
}

fn parse<'s>(schema: &'s Schema, input: &str) -> Result<rumxml::Document<'s>, Error> {
    parse_stream(Cursor::new(input.as_bytes()), schema, false)
}

#[test]
fn scenario_1_minimal_root() {
    let schema = cabinet_schema();
    let doc = parse(&schema, "<cabinet></cabinet>").unwrap();
    let root = doc.root().unwrap();
    assert_eq!(doc.tag_name(root), "cabinet");
    assert_eq!(doc.first_child(root), None);
    assert_eq!(doc.content(root), None);
}

#[test]
fn scenario_2_nested_empty_child_with_attribute() {
    let schema = cabinet_schema();
    let doc = parse(
        &schema,
        r#"<cabinet><shelf id="top"><glass type="snifter"/></shelf></cabinet>"#,
    )
    .unwrap();
    let cabinet = doc.root().unwrap();
    let shelf = doc.first_child(cabinet).unwrap();
    assert_eq!(doc.attribute(shelf, "id"), Some("top"));
    let glass = doc.first_child(shelf).unwrap();
    assert!(doc.is_empty(glass));
    assert_eq!(doc.attribute(glass, "type"), Some("snifter"));
}

#[test]
fn scenario_3_required_attribute_not_enforced() {
    let schema = cabinet_schema();
    let doc = parse(
        &schema,
        "<cabinet><shelf><bottle>Mount Gay</bottle></shelf></cabinet>",
    )
    .unwrap();
    let cabinet = doc.root().unwrap();
    let shelf = doc.first_child(cabinet).unwrap();
    let bottle = doc.first_child(shelf).unwrap();
    assert_eq!(doc.content(bottle), Some("Mount Gay"));
    assert_eq!(doc.attribute(bottle, "type"), None);
    assert_eq!(doc.missing_required_attrs(bottle), vec!["type"]);
}

#[test]
fn scenario_4_tag_not_a_declared_child_here() {
    let schema = cabinet_schema();
    let err = parse(&schema, "<cabinet><glass/></cabinet>").unwrap_err();
    assert!(matches!(err, Error::UnknownTagHere(_)));
}

#[test]
fn scenario_5_empty_tag_not_self_closed() {
    let schema = cabinet_schema();
    let err = parse(&schema, "<cabinet><shelf><glass></glass></shelf></cabinet>").unwrap_err();
    assert!(matches!(err, Error::EmptyTagNotSelfClosed(_)));
}

#[test]
fn scenario_6_dashdash_in_comment() {
    let schema = cabinet_schema();
    let err = parse(&schema, "<!-- x -- y --><cabinet/>").unwrap_err();
    assert!(matches!(err, Error::DashDashInComment(_)));
}

#[test]
fn scenario_7_unknown_attribute_beats_entity_error() {
    let schema = cabinet_with_attr_schema();
    let err = parse(&schema, r#"<cabinet attr="a&amp;b"/>"#).unwrap_err();
    assert!(matches!(err, Error::UnknownAttribute(_)));
}

#[test]
fn scenario_8_unknown_entity_reference() {
    let schema = cabinet_with_attr_schema();
    let err = parse(&schema, "<cabinet>&foo;</cabinet>").unwrap_err();
    assert!(matches!(err, Error::UnknownEntity));
}

#[test]
fn tree_order_matches_source_order() {
    let schema = cabinet_schema();
    let doc = parse(
        &schema,
        r#"<cabinet><shelf id="a"></shelf><shelf id="b"></shelf></cabinet>"#,
    )
    .unwrap();
    let cabinet = doc.root().unwrap();
    let first = doc.first_child(cabinet).unwrap();
    let second = doc.next_sibling(first).unwrap();
    assert_eq!(doc.attribute(first, "id"), Some("a"));
    assert_eq!(doc.attribute(second, "id"), Some("b"));
    assert_eq!(doc.next_sibling(second), None);
}

#[test]
fn post_child_text_is_dropped() {
    let schema = cabinet_schema();
    let doc = parse(
        &schema,
        r#"<cabinet><shelf id="a"><glass type="rocks"/>trailing text</shelf></cabinet>"#,
    )
    .unwrap();
    let cabinet = doc.root().unwrap();
    let shelf = doc.first_child(cabinet).unwrap();
    assert_eq!(doc.content(shelf), None);
}
