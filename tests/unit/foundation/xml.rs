use super::*;

#[test]
fn parse_nested_document() {
    let doc = r#"<?xml version="1.0"?>
<Root a="1">
  <CueCommand type="0" anchorX="2"/>
  <Group>
    <CueCommand type="1"></CueCommand>
  </Group>
</Root>"#;
    let root = XmlElement::from_xml_str(doc).unwrap();
    assert_eq!(root.name(), "Root");
    assert_eq!(root.attribute("a"), Some("1"));
    assert_eq!(root.children().len(), 2);
    assert_eq!(root.children_named("CueCommand").count(), 1);
    let group = root.child("Group").unwrap();
    assert_eq!(group.children()[0].attribute("type"), Some("1"));
}

#[test]
fn serialize_then_parse_preserves_tree() {
    let mut root = XmlElement::new("State");
    root.add_child(XmlElement::new("CueCommand").with_attribute("minValues", "1,2.5"));
    root.add_child(XmlElement::new("Note").with_attribute("text", "a<b & \"c\""));
    let text = root.to_xml_string().unwrap();
    let back = XmlElement::from_xml_str(&text).unwrap();
    assert_eq!(back, root);
}

#[test]
fn set_attribute_replaces_existing_value() {
    let mut el = XmlElement::new("X");
    el.set_attribute("k", "1");
    el.set_attribute("k", "2");
    assert_eq!(el.attributes().count(), 1);
    assert_eq!(el.attribute("k"), Some("2"));
}

#[test]
fn typed_attribute_errors_name_the_attribute() {
    let el = XmlElement::new("CueCommand").with_attribute("anchorX", "abc");
    let err = el.parse_attribute::<i32>("anchorX").unwrap_err();
    assert!(err.to_string().contains("anchorX"));
    assert!(el.required_attribute::<i32>("anchorY").is_err());
    assert_eq!(el.parse_attribute::<i32>("missing").unwrap(), None);
}

#[test]
fn malformed_documents_are_rejected() {
    assert!(XmlElement::from_xml_str("").is_err());
    assert!(XmlElement::from_xml_str("<A><B></A>").is_err());
    assert!(XmlElement::from_xml_str("<A/><B/>").is_err());
    assert!(XmlElement::from_xml_str("<A>").is_err());
}

#[test]
fn float_formatting_round_trips_exactly() {
    let values = [0.1, 1.0 / 3.0, -2.5e-300, 123456789.123456789, 9.0];
    let text = format_f64_list(&values);
    let back = parse_f64_list(&text).unwrap();
    assert_eq!(back, values);
    assert_eq!(format_f64(9.0), "9");
}

#[test]
fn float_list_parsing_handles_whitespace_and_empty() {
    assert_eq!(parse_f64_list(" 1, 2 ,3").unwrap(), vec![1.0, 2.0, 3.0]);
    assert!(parse_f64_list("").unwrap().is_empty());
    assert!(parse_f64_list("1,,2").is_err());
}
