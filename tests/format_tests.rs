//! Wire-level conformance tests.
//!
//! Each test pins down one rule of the anon text format: exact encoder
//! output, what the decoder accepts, and how it fails.

use serde_anon::{
    is_valid_property_name, load, load_value, load_with_options, store, store_value,
    DecodeOptions, Error, Kind, Object, SliceSource, Value, DEFAULT_MAX_DEPTH,
};

fn decode(input: &str) -> serde_anon::Result<Object> {
    load(&mut SliceSource::new(input.as_bytes()))
}

fn decode_err(input: &str) -> Error {
    decode(input).unwrap_err().inner().clone()
}

fn encode(object: &Object) -> String {
    let mut out = String::new();
    store(object, &mut out).unwrap();
    out
}

fn encode_value(value: &Value) -> String {
    let mut out = String::new();
    store_value(value, &mut out).unwrap();
    out
}

// Objects

#[test]
fn test_nested_object() {
    let obj = decode("obj{k:obj{a:str{hi\\}\\}\\}").unwrap();
    let k = obj.get("k").and_then(Value::as_object).unwrap();
    assert_eq!(k.get("a"), Some(&Value::from("hi")));
    assert_eq!(encode(&obj), "obj{k:obj{a:str{hi\\}\\}\\}");
}

#[test]
fn test_empty_object() {
    assert_eq!(encode(&Object::new()), "obj{\\}");
    assert!(decode("obj{\\}").unwrap().is_empty());
}

#[test]
fn test_members_written_in_key_order() {
    let obj = decode("obj{b:i32{2\\}a:i32{1\\}_c:i32{3\\}\\}").unwrap();
    assert_eq!(encode(&obj), "obj{_c:i32{3\\}a:i32{1\\}b:i32{2\\}\\}");
}

#[test]
fn test_duplicate_member_rejected() {
    assert_eq!(
        decode_err("obj{a:i32{1\\}a:i32{2\\}\\}"),
        Error::KeyExists("a".to_string())
    );
}

#[test]
fn test_top_level_must_be_object_for_load() {
    assert_eq!(decode_err("i32{1\\}"), Error::NotAnObject(Kind::I32));
    assert_eq!(
        load_value(&mut SliceSource::new(b"i32{1\\}")).unwrap(),
        Value::I32(1)
    );
}

#[test]
fn test_empty_input_is_empty_object() {
    assert!(decode("").unwrap().is_empty());
    assert!(decode(" \n\t ").unwrap().is_empty());
}

// Keys

#[test]
fn test_property_name_rules() {
    let longest = "a".repeat(31);
    let too_long = "a".repeat(32);
    assert!(is_valid_property_name(&longest));
    assert!(!is_valid_property_name(&too_long));
    assert!(is_valid_property_name("_x"));
    assert!(is_valid_property_name("x9"));
    assert!(!is_valid_property_name(""));
    assert!(!is_valid_property_name("__x"));
    assert!(!is_valid_property_name("9x"));
    assert!(!is_valid_property_name("Foo"));
    assert!(!is_valid_property_name("a-b"));
}

#[test]
fn test_malformed_keys_rejected_on_decode() {
    let too_long = "a".repeat(32);
    for key in ["__x", "9x", "Foo", too_long.as_str()] {
        let input = format!("obj{{{key}:i32{{1\\}}\\}}");
        assert!(
            matches!(decode_err(&input), Error::MalformedKey(_)),
            "{input}"
        );
    }
    assert!(matches!(
        decode_err("obj{:i32{1\\}\\}"),
        Error::MalformedKey(_)
    ));
}

#[test]
fn test_whitespace_around_keys_and_tags() {
    let obj = decode("\n obj {\n\tname : str {x\\}\n  n:\n i32{1\\}\n\\}").unwrap();
    assert_eq!(obj.get("name"), Some(&Value::from("x")));
    assert_eq!(obj.get("n"), Some(&Value::I32(1)));
}

#[test]
fn test_junk_between_key_and_colon() {
    assert_eq!(
        decode_err("obj{name x:i32{1\\}\\}"),
        Error::JunkAfterKey(b'x')
    );
}

#[test]
fn test_junk_between_tag_and_brace() {
    assert_eq!(decode_err("obj x{\\}"), Error::JunkAfterTypeTag(b'x'));
}

// Strings and escapes

#[test]
fn test_backslash_is_doubled() {
    let mut obj = Object::new();
    obj.insert("s", "a\\b").unwrap();
    assert_eq!(encode(&obj), "obj{s:str{a\\\\b\\}\\}");
    assert_eq!(decode(&encode(&obj)).unwrap(), obj);
}

#[test]
fn test_any_other_escaped_byte_is_literal() {
    let obj = decode("obj{s:str{\\{\\a\\}\\}").unwrap();
    assert_eq!(obj.get("s"), Some(&Value::from("{a")));
}

#[test]
fn test_plain_braces_and_semicolons_need_no_escape() {
    let obj = decode("obj{s:str{{ } ;\\}\\}").unwrap();
    assert_eq!(obj.get("s"), Some(&Value::from("{ } ;")));
}

#[test]
fn test_whitespace_in_strings_is_content() {
    let obj = decode("obj{s:str{  padded\n\\}\\}").unwrap();
    assert_eq!(obj.get("s"), Some(&Value::from("  padded\n")));
}

#[test]
fn test_null_character() {
    assert_eq!(decode_err("obj{s:str{a\0b\\}\\}"), Error::NullCharacter);

    let mut obj = Object::new();
    obj.insert("s", "a\0b").unwrap();
    let mut out = String::new();
    assert_eq!(store(&obj, &mut out), Err(Error::NullCharacter));
}

#[test]
fn test_invalid_utf8_rejected() {
    let err = load(&mut SliceSource::new(b"obj{s:str{\xff\\}\\}")).unwrap_err();
    assert_eq!(err.inner(), &Error::InvalidUtf8);
}

#[test]
fn test_unicode_passes_through() {
    let obj = decode("obj{s:str{Hello 世界 🌍\\}\\}").unwrap();
    assert_eq!(obj.get("s").and_then(Value::as_str), Some("Hello 世界 🌍"));
}

// Numbers

#[test]
fn test_integer_bodies() {
    let obj = decode(
        "obj{a:i32{-2147483648\\}b:i64{9223372036854775807\\}c:u32{4294967295\\}d:u64{0\\}\\}",
    )
    .unwrap();
    assert_eq!(obj.get("a"), Some(&Value::I32(i32::MIN)));
    assert_eq!(obj.get("b"), Some(&Value::I64(i64::MAX)));
    assert_eq!(obj.get("c"), Some(&Value::U32(u32::MAX)));
    assert_eq!(obj.get("d"), Some(&Value::U64(0)));
}

#[test]
fn test_integer_overflow_does_not_fit() {
    assert!(matches!(
        decode_err("obj{n:i32{4000000000\\}\\}"),
        Error::DoesNotFit { kind: Kind::I32, .. }
    ));
    assert!(matches!(
        decode_err("obj{n:u32{-1\\}\\}"),
        Error::NotConvertible { kind: Kind::U32, .. }
    ));
    assert!(matches!(
        decode_err("obj{n:u64{18446744073709551616\\}\\}"),
        Error::DoesNotFit { kind: Kind::U64, .. }
    ));
}

#[test]
fn test_garbage_is_not_convertible() {
    for body in ["12a", "", " 1", "1 ", "+1", "0x10", "1.0"] {
        let input = format!("obj{{n:i32{{{body}\\}}\\}}");
        assert!(
            matches!(decode_err(&input), Error::NotConvertible { .. }),
            "{input:?}"
        );
    }
}

#[test]
fn test_float_bodies() {
    let obj = decode("obj{a:f32{1.5e0\\}b:f64{-2.5e-3\\}c:f64{42\\}d:f64{0.125\\}\\}").unwrap();
    assert_eq!(obj.get("a"), Some(&Value::F32(1.5)));
    assert_eq!(obj.get("b"), Some(&Value::F64(-2.5e-3)));
    assert_eq!(obj.get("c"), Some(&Value::F64(42.0)));
    assert_eq!(obj.get("d"), Some(&Value::F64(0.125)));
}

#[test]
fn test_floats_written_in_scientific_notation() {
    assert_eq!(encode_value(&Value::F64(1.0)), "f64{1e0\\}");
    assert_eq!(encode_value(&Value::F64(-2.5e-3)), "f64{-2.5e-3\\}");
    assert_eq!(encode_value(&Value::F32(1234.5)), "f32{1.2345e3\\}");
}

#[test]
fn test_float_out_of_range() {
    assert!(matches!(
        decode_err("obj{x:f32{1e39\\}\\}"),
        Error::DoesNotFit { kind: Kind::F32, .. }
    ));
    assert!(matches!(
        decode_err("obj{x:f64{1e-400\\}\\}"),
        Error::DoesNotFit { kind: Kind::F64, .. }
    ));
    assert_eq!(
        decode("obj{x:f64{0e0\\}\\}").unwrap().get("x"),
        Some(&Value::F64(0.0))
    );
}

// Arrays

#[test]
fn test_scalar_array() {
    let obj = decode("obj{xs:i32*{1\\;2\\;3\\;\\}\\}").unwrap();
    assert_eq!(obj.get("xs"), Some(&Value::I32Array(vec![1, 2, 3])));
    assert_eq!(encode(&obj), "obj{xs:i32*{1\\;2\\;3\\;\\}\\}");
}

#[test]
fn test_empty_arrays_keep_their_kind() {
    let obj = decode("obj{a:u64*{\\}b:obj*{\\}c:str*{\\}\\}").unwrap();
    assert_eq!(obj.get("a"), Some(&Value::U64Array(Vec::new())));
    assert_eq!(obj.get("b"), Some(&Value::ObjectArray(Vec::new())));
    assert_eq!(obj.get("c"), Some(&Value::StringArray(Vec::new())));
    assert_eq!(encode(&obj), "obj{a:u64*{\\}b:obj*{\\}c:str*{\\}\\}");
}

#[test]
fn test_string_array_with_empty_elements() {
    let obj = decode("obj{s:str*{\\;a\\;\\;\\}\\}").unwrap();
    assert_eq!(
        obj.get("s"),
        Some(&Value::StringArray(vec![
            String::new(),
            "a".to_string(),
            String::new()
        ]))
    );
}

#[test]
fn test_object_array() {
    let obj = decode("obj{rows:obj*{x:i32{1\\}\\;x:i32{2\\}y:str{b\\}\\;\\}\\}").unwrap();
    let rows = obj.get("rows").and_then(Value::as_object_array).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("x"), Some(&Value::I32(1)));
    assert_eq!(rows[1].get("y"), Some(&Value::from("b")));
    assert_eq!(
        encode(&obj),
        "obj{rows:obj*{x:i32{1\\}\\;x:i32{2\\}y:str{b\\}\\;\\}\\}"
    );
}

#[test]
fn test_missing_trailing_separator() {
    assert!(matches!(
        decode_err("obj{xs:i32*{1\\;2\\}\\}"),
        Error::NonTerminatedArrayElement(_)
    ));
    assert!(matches!(
        decode_err("obj{rows:obj*{x:i32{1\\}\\}\\}"),
        Error::NonTerminatedArrayElement(_)
    ));
}

#[test]
fn test_separator_in_scalar() {
    assert_eq!(
        decode_err("obj{n:i32{1\\;\\}\\}"),
        Error::NotAnArray(Kind::I32)
    );
}

#[test]
fn test_arrays_of_arrays_do_not_exist() {
    assert_eq!(
        decode_err("obj{x:i32**{\\}\\}"),
        Error::UnsupportedType("i32**".to_string())
    );
}

#[test]
fn test_unknown_tags() {
    for tag in ["bool", "OBJ", "i16", "*"] {
        let input = format!("obj{{x:{tag}{{\\}}\\}}");
        assert!(
            matches!(decode_err(&input), Error::UnsupportedType(_)),
            "{input:?}"
        );
    }
}

// Stream boundaries

#[test]
fn test_truncated_input() {
    let inputs = [
        "obj",
        "obj{",
        "obj{a",
        "obj{a:",
        "obj{a:i32{1",
        "obj{a:i32{1\\",
        "obj{a:i32{1\\}",
    ];
    for input in inputs {
        assert_eq!(decode_err(input), Error::UnexpectedEof, "{input:?}");
    }
}

#[test]
fn test_trailing_bytes_left_in_source() {
    let mut source = SliceSource::new(b"obj{\\}obj{a:i32{1\\}\\}");
    assert!(load(&mut source).unwrap().is_empty());
    let second = load(&mut source).unwrap();
    assert_eq!(second.get("a"), Some(&Value::I32(1)));
    assert!(source.remaining().is_empty());
}

#[test]
fn test_deny_trailing_data() {
    let options = DecodeOptions::strict();
    let mut source = SliceSource::new(b"obj{\\}  \n");
    assert!(load_with_options(&mut source, &options).is_ok());

    let mut source = SliceSource::new(b"obj{\\}\n  x");
    let err = load_with_options(&mut source, &options).unwrap_err();
    assert_eq!(err.inner(), &Error::TrailingData(b'x'));
    assert_eq!(
        err.to_string(),
        "Unexpected data after the top-level value: 'x' at line 2, column 3"
    );
}

#[test]
fn test_max_depth() {
    let options = DecodeOptions::new().with_max_depth(2);
    let mut source = SliceSource::new(b"obj{a:obj{\\}\\}");
    assert!(load_with_options(&mut source, &options).is_ok());

    let mut source = SliceSource::new(b"obj{a:obj{b:i32{1\\}\\}\\}");
    let err = load_with_options(&mut source, &options).unwrap_err();
    assert_eq!(err.inner(), &Error::NestingTooDeep(2));
}

fn nested(depth: usize) -> String {
    let mut text = String::from("obj{");
    for _ in 1..depth {
        text.push_str("a:obj{");
    }
    for _ in 0..depth {
        text.push_str("\\}");
    }
    text
}

#[test]
fn test_default_depth_limit() {
    let obj = decode(&nested(DEFAULT_MAX_DEPTH)).unwrap();
    assert_eq!(obj.len(), 1);

    let err = decode(&nested(DEFAULT_MAX_DEPTH + 1)).unwrap_err();
    assert_eq!(err.inner(), &Error::NestingTooDeep(DEFAULT_MAX_DEPTH));

    let err = decode(&nested(20_000)).unwrap_err();
    assert_eq!(err.inner(), &Error::NestingTooDeep(DEFAULT_MAX_DEPTH));
}

#[test]
fn test_depth_limit_can_be_raised() {
    let options = DecodeOptions::new().with_max_depth(1_000);
    let text = nested(500);
    let obj = load_with_options(&mut SliceSource::new(text.as_bytes()), &options).unwrap();
    assert!(obj.contains_key("a"));
}

#[test]
fn test_error_positions() {
    let err = decode("obj{\n  good:i32{1\\}\n  Bad:i32{1\\}\n\\}").unwrap_err();
    match err {
        Error::At { line, column, .. } => assert_eq!((line, column), (3, 6)),
        other => panic!("expected a positioned error, got {other:?}"),
    }
}
