use fieldkeeper::datatype::{DataType, NarrowChar, Scalar, WideString};
use fieldkeeper::document::Element;
use fieldkeeper::error::ReadError;

fn node(text: &str) -> Element {
    Element::with_text("value", text)
}

fn read<T: DataType + Default>(node: &Element) -> Result<T, ReadError> {
    let mut value = T::default();
    value.read(node)?;
    Ok(value)
}

fn written<T: DataType>(value: &T) -> Element {
    let mut node = Element::new("value");
    value.write(&mut node);
    node
}

#[test]
fn integers_read_decimal_and_hex() {
    assert_eq!(read::<i32>(&node("-17")), Ok(-17));
    assert_eq!(read::<i32>(&node(" 42 ")), Ok(42));
    assert_eq!(read::<u32>(&node("0xff")), Ok(255));
    assert_eq!(read::<i64>(&node("0X10")), Ok(16));
    assert_eq!(read::<u64>(&node("18446744073709551615")), Ok(u64::MAX));
}

#[test]
fn integers_reject_garbage_and_overflow() {
    assert!(matches!(read::<i32>(&node("12abc")), Err(ReadError::Malformed { expected: "i32", .. })));
    assert!(matches!(read::<u32>(&node("-1")), Err(ReadError::Malformed { .. })));
    assert!(matches!(read::<i32>(&node("4294967296")), Err(ReadError::Malformed { .. })));
}

#[test]
fn missing_text_is_soft_for_numbers() {
    let empty = Element::new("value");
    let err = read::<f64>(&empty).unwrap_err();
    assert_eq!(err, ReadError::NoTextContent);
    assert!(err.is_soft());
}

#[test]
fn bools_accept_words_and_numbers() {
    for text in ["true", "True", "TRUE", "1", "-3"] {
        assert_eq!(read::<bool>(&node(text)), Ok(true), "{text}");
    }
    for text in ["false", "False", "FALSE", "0"] {
        assert_eq!(read::<bool>(&node(text)), Ok(false), "{text}");
    }
    assert!(read::<bool>(&node("yes")).is_err());
    assert_eq!(written(&true).text(), Some("true"));
}

#[test]
fn floats_round_trip() {
    for value in [0.1f64, -2.5e-300, 1.0 / 3.0, f64::MAX] {
        let back: f64 = read(&written(&value)).unwrap();
        assert!((back - value).abs() <= 1e-12 * value.abs().max(1.0));
    }
    let back: f32 = read(&written(&3.14159f32)).unwrap();
    assert!((back - 3.14159f32).abs() <= 1e-7);
}

#[test]
fn strings_keep_whitespace_and_empty() {
    assert_eq!(read::<String>(&node("  spaced  ")), Ok("  spaced  ".to_string()));
    assert_eq!(read::<String>(&Element::new("value")), Ok(String::new()));
    let node = written(&String::new());
    assert_eq!(node.text(), None);
}

#[test]
fn wide_strings_transcode() {
    let wide = WideString::from("grüße ✓");
    let node = written(&wide);
    assert_eq!(node.text(), Some("grüße ✓"));
    assert_eq!(read::<WideString>(&node), Ok(wide));
}

#[test]
fn chars_need_exactly_one() {
    assert_eq!(read::<char>(&node("é")), Ok('é'));
    assert!(read::<char>(&node("ab")).is_err());
    assert_eq!(read::<NarrowChar>(&node("A")), Ok(NarrowChar(b'A')));
    assert_eq!(read::<NarrowChar>(&node("ÿ")), Ok(NarrowChar(0xFF)));
    assert!(read::<NarrowChar>(&node("€")).is_err());
    assert!(read::<NarrowChar>(&node("ab")).is_err());
}

#[test]
fn writing_a_scalar_drops_children() {
    let mut node = Element::new("value");
    node.push_child(Element::with_text("_0", "stale"));
    7i32.write(&mut node);
    assert!(node.children().is_empty());
    assert_eq!(node.text(), Some("7"));
}

#[test]
fn arrays_use_indexed_children() {
    let node = written(&[3, 1, 4]);
    let texts: Vec<_> = node.indexed_children().filter_map(Element::text).collect();
    assert_eq!(texts, vec!["3", "1", "4"]);
    assert_eq!(read::<[i32; 3]>(&node), Ok([3, 1, 4]));
    assert_eq!(<[i32; 3] as DataType>::ARITY, 3);
}

#[test]
fn single_element_array_is_stored_like_its_element() {
    let node = written(&[9u64]);
    assert_eq!(node.text(), Some("9"));
    assert!(node.children().is_empty());
}

#[test]
fn arrays_keep_elements_missing_from_the_document() {
    let mut node = Element::new("value");
    node.push_child(Element::with_text("_0", "5"));
    node.push_child(Element::with_text("_1", "6"));
    let mut grown = [0, 0, 77, 88];
    grown.read(&node).unwrap();
    assert_eq!(grown, [5, 6, 77, 88]);
}

#[test]
fn data_type_tags() {
    assert_eq!(<i32 as Scalar>::DATA_TYPE, "i32");
    assert_eq!(<[f64; 2]>::data_type(), "[f64; 2]");
    assert_eq!(<WideString as DataType>::data_type(), "WideString");
}
