use fieldkeeper::document::{self, index_name, DocumentError, Element};

#[test]
fn written_documents_parse_back_unchanged() {
    let mut root = Element::new("Settings");
    root.push_child(Element::with_text("plain", "value"));
    root.push_child(Element::with_text("escaped", "<&> \"quoted\" 'single'"));
    root.push_child(Element::with_text("padded", "  both ends  "));
    let list = root.push_child(Element::new("list"));
    list.push_child(Element::with_text(index_name(0), "a"));
    list.push_child(Element::new(index_name(1)));
    let map = root.push_child(Element::new("map"));
    map.push_child(Element::with_text(index_name(0), "key"))
        .push_child(Element::with_text(index_name(0), "value"));

    for (indent, declaration) in [(4, true), (0, false), (2, true)] {
        let xml = document::to_xml(&root, indent, declaration);
        assert_eq!(document::parse(&xml).unwrap(), root, "{xml}");
    }
}

#[test]
fn declaration_and_layout() {
    let mut root = Element::new("Settings");
    root.push_child(Element::with_text("n", "1"));
    root.push_child(Element::new("empty"));
    let xml = document::to_xml(&root, 4, true);
    assert_eq!(
        xml,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Settings>\n    <n>1</n>\n    <empty/>\n</Settings>\n"
    );
}

#[test]
fn text_with_children_is_written_inline() {
    let mut key = Element::with_text("_0", "k");
    key.push_child(Element::with_text("_0", " v "));
    let mut root = Element::new("m");
    root.push_child(key);
    let xml = document::to_xml(&root, 4, false);
    assert!(xml.contains("<_0>k<_0> v </_0></_0>"), "{xml}");
}

#[test]
fn comments_attributes_and_cdata() {
    let root = document::parse(
        "<?xml version=\"1.0\"?>\n<!-- saved by hand -->\n<Settings version=\"2\"><a><![CDATA[x<y]]></a></Settings>",
    )
    .unwrap();
    assert_eq!(root.child("a").and_then(Element::text), Some("x<y"));
}

#[test]
fn child_or_insert_reuses_existing_children() {
    let mut root = Element::new("Settings");
    root.child_or_insert("a").set_text("1");
    root.child_or_insert("a").set_text("2");
    assert_eq!(root.children().len(), 1);
    assert_eq!(root.child("a").and_then(Element::text), Some("2"));
}

#[test]
fn empty_text_is_no_text() {
    let mut node = Element::with_text("a", "x");
    node.set_text("");
    assert_eq!(node.text(), None);
}

#[test]
fn malformed_documents_are_rejected() {
    assert!(matches!(document::parse("<a><b></a>"), Err(DocumentError::Syntax { .. })));
    assert!(matches!(document::parse("text only"), Err(DocumentError::StrayText)));
    assert!(matches!(document::parse("<!-- nothing -->"), Err(DocumentError::NoRoot)));
    assert!(document::parse("<a><b>").is_err());
}
