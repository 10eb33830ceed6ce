// End-to-end round trips and the negative-path scenarios over the public API.

use amf::{decode, encode, encode_with, CodecConfig, ClassRegistry, Error, ExternalizationHooks, Value};
use std::rc::Rc;
use std::sync::Arc;

#[test]
fn round_trips_a_plain_object() {
    let value = Value::object([
        ("name".to_string(), Value::string("widget")),
        ("count".to_string(), Value::Number(3.0)),
        ("active".to_string(), Value::Boolean(true)),
    ]);

    let bytes = encode(&value).unwrap();
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn round_trips_nested_arrays_and_null() {
    let value = Value::array([
        Value::Null,
        Value::Undefined,
        Value::array([Value::Number(1.0), Value::Number(2.0)]),
        Value::object([("k".to_string(), Value::string("v"))]),
    ]);

    let bytes = encode(&value).unwrap();
    assert_eq!(decode(&bytes).unwrap(), value);
}

#[test]
fn preserves_shared_identity_across_two_references() {
    let shared = Value::array([Value::Number(1.0)]);
    let outer = Value::array([shared.clone(), shared.clone()]);

    let bytes = encode(&outer).unwrap();
    let decoded = decode(&bytes).unwrap();

    let Value::Array(arr) = &decoded else { panic!("expected array") };
    let borrowed = arr.borrow();
    let (Value::Array(a), Value::Array(b)) = (&borrowed[0], &borrowed[1]) else {
        panic!("expected two array elements")
    };
    assert!(Rc::ptr_eq(a, b), "decoded references must point at the same identity");
}

#[test]
fn concrete_scenarios_from_the_wire_format_table() {
    assert_eq!(encode(&Value::Number(0.0)).unwrap(), vec![0x00, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(encode(&Value::Boolean(true)).unwrap(), vec![0x01, 0x01]);
    assert_eq!(encode(&Value::Boolean(false)).unwrap(), vec![0x01, 0x00]);
    assert_eq!(
        encode(&Value::string("hello")).unwrap(),
        vec![0x02, 0x00, 0x05, b'h', b'e', b'l', b'l', b'o']
    );
    assert_eq!(
        encode(&Value::object([("a".to_string(), Value::string("b"))])).unwrap(),
        vec![0x03, 0x00, 0x01, b'a', 0x02, 0x00, 0x01, b'b', 0x00, 0x00, 0x09]
    );
    assert_eq!(
        encode(&Value::Date { millis: 936_835_200_000.0, tz_offset_min: 0 }).unwrap(),
        vec![0x0b, 0x42, 0x35, 0xcf, 0xf3, 0x93, 0xc0, 0x00, 0x00, 0x00, 0x00]
    );
}

#[test]
fn long_string_boundary_is_exactly_at_two_to_the_sixteen() {
    let text = "a".repeat(65537);
    let bytes = encode(&Value::string(text)).unwrap();
    assert_eq!(&bytes[0..5], &[0x0c, 0x00, 0x01, 0x00, 0x01]);
    assert_eq!(bytes.len(), 5 + 65537);
}

#[test]
fn unknown_marker_is_a_parse_error() {
    let err = decode(&[0x78]).unwrap_err();
    assert!(matches!(err, Error::ParseError(_)));
}

#[test]
fn truncated_object_body_is_unexpected_eof() {
    let err = decode(&[0x03, 0x00, 0x01, b'a']).unwrap_err();
    assert!(matches!(err, Error::UnexpectedEof));
}

#[test]
fn dangling_reference_is_index_out_of_range() {
    let err = decode(&[0x07, 0x00, 0x05]).unwrap_err();
    assert!(matches!(err, Error::IndexOutOfRange(5)));
}

#[test]
fn typed_object_round_trips_through_a_registered_class() {
    let registry = ClassRegistry::new();
    struct Widget;
    registry.register_plain::<Widget>("com.example.Widget").unwrap();

    let value = Value::typed_object("com.example.Widget", [("id".to_string(), Value::Number(7.0))]);

    let bytes = encode_with(&value, &registry, &CodecConfig::default()).unwrap();
    let decoded = amf::decode_with(&bytes, &registry, &CodecConfig::default()).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn unresolved_alias_falls_back_to_anonymous_object_by_default() {
    let value = Value::typed_object("com.example.Missing", [("id".to_string(), Value::Number(1.0))]);
    let bytes = encode(&value).unwrap();

    let decoded = decode(&bytes).unwrap();
    match decoded {
        Value::TypedObject(alias, obj) => {
            assert_eq!(alias, "com.example.Missing");
            assert_eq!(obj.borrow().get("id"), Some(&Value::Number(1.0)));
        }
        other => panic!("expected TypedObject, got {other:?}"),
    }
}

#[test]
fn unresolved_alias_fails_under_strict_config() {
    let config = CodecConfig::builder().strict_aliases(true).build().unwrap();
    let value = Value::typed_object("com.example.Missing", []);
    let registry = ClassRegistry::new();

    let bytes = encode_with(&value, &registry, &config).unwrap();
    let err = amf::decode_with(&bytes, &registry, &config).unwrap_err();
    assert!(matches!(err, Error::UnresolvedAlias(_)));
}

#[test]
fn externalizable_class_round_trips_through_custom_hooks() {
    let registry = ClassRegistry::new();
    struct Point;

    let read_external: Arc<dyn Fn(&amf::ObjectRef, &mut amf::ByteStream) -> amf::Result<()> + Send + Sync> =
        Arc::new(|obj, stream| {
            let x = stream.read_double()?;
            let y = stream.read_double()?;
            obj.borrow_mut().insert("x", Value::Number(x));
            obj.borrow_mut().insert("y", Value::Number(y));
            Ok(())
        });
    let write_external: Arc<dyn Fn(&amf::ObjectRef, &mut amf::ByteStream) -> amf::Result<()> + Send + Sync> =
        Arc::new(|obj, stream| {
            let borrowed = obj.borrow();
            let x = borrowed.get("x").and_then(Value::as_number).unwrap_or(0.0);
            let y = borrowed.get("y").and_then(Value::as_number).unwrap_or(0.0);
            stream.write_double(x)?;
            stream.write_double(y)?;
            Ok(())
        });

    registry
        .register::<Point>(
            "com.example.Point",
            amf::new_object_ref,
            Some(ExternalizationHooks { read_external, write_external }),
        )
        .unwrap();

    let value = Value::typed_object(
        "com.example.Point",
        [("x".to_string(), Value::Number(1.5)), ("y".to_string(), Value::Number(2.5))],
    );

    let bytes = encode_with(&value, &registry, &CodecConfig::default()).unwrap();
    // Externalized body is exactly 16 bytes (two doubles), no key/value framing.
    assert_eq!(bytes.len(), 1 + 2 + "com.example.Point".len() + 16);

    let decoded = amf::decode_with(&bytes, &registry, &CodecConfig::default()).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn mixed_array_declares_a_length_hint_distinct_from_plain_object() {
    let value = Value::mixed_array([("0".to_string(), Value::string("first"))]);
    let bytes = encode(&value).unwrap();
    assert_eq!(bytes[0], 0x08);
    assert_eq!(decode(&bytes).unwrap(), value);
}

#[test]
fn xml_value_round_trips_its_document_text() {
    let doc = "<?xml version=\"1.0\"?><root/>".to_string();
    let value = Value::Xml(doc);
    let bytes = encode(&value).unwrap();
    assert_eq!(bytes[0], 0x0f);
    assert_eq!(decode(&bytes).unwrap(), value);
}

#[test]
fn naive_date_uses_the_configured_default_offset() {
    let config = CodecConfig::builder().naive_timezone_offset_minutes(60).build().unwrap();
    let value = config.naive_date(0.0);
    assert_eq!(value, Value::Date { millis: 0.0, tz_offset_min: 60 });

    let bytes = encode(&value).unwrap();
    assert_eq!(&bytes[9..11], &[0x00, 0x3c]);
}

#[test]
fn amf3_switch_marker_round_trips_opaque_payload() {
    let value = Value::SwitchAmf3(vec![0x04, 0x2a, 0x00]);
    let bytes = encode(&value).unwrap();
    assert_eq!(bytes[0], 0x11);
    assert_eq!(decode(&bytes).unwrap(), value);
}

#[test]
fn switch_amf3_nested_in_a_container_is_rejected_at_encode_time() {
    // A SwitchAmf3 payload has no length prefix of its own — it only makes
    // sense as the sole top-level value. Encoding it as a non-final element
    // of an Array used to silently consume every value written after it on
    // decode; it must now be refused up front instead.
    let value = Value::array([Value::SwitchAmf3(vec![0xaa]), Value::Number(2.0)]);
    let err = encode(&value).unwrap_err();
    assert!(matches!(err, Error::UnrepresentableValue(_)));
}

#[test]
fn conflicting_alias_registration_is_rejected() {
    let registry = ClassRegistry::new();
    struct Widget;
    struct Gadget;

    registry.register_plain::<Widget>("com.example.Thing").unwrap();
    let err = registry.register_plain::<Gadget>("com.example.Thing").unwrap_err();
    assert!(matches!(err, Error::AliasConflict(_)));
}

#[test]
fn decoded_object_attributes_can_be_read_back_out() {
    let bytes = [0x03, 0x00, 0x01, b'a', 0x02, 0x00, 0x01, b'b', 0x00, 0x00, 0x09];
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.get_property("a"), Some(Value::string("b")));
    assert_eq!(decoded.get_property("missing"), None);
}

#[test]
fn property_list_reuse_does_not_leak_refcell_borrow_panics() {
    // Regression guard: nested read_object_body_into calls must not hold
    // overlapping RefCell borrows across recursive `read_element` calls.
    let inner = Value::object([("leaf".to_string(), Value::Number(1.0))]);
    let outer = Value::object([
        ("child".to_string(), inner),
        ("sibling".to_string(), Value::string("ok")),
    ]);

    let bytes = encode(&outer).unwrap();
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded, outer);
}
