use chrono::DateTime;
use flatgeobuf_convert::{
    Column, ColumnType, Error, FeatureProperties, PropValue, Props, Result, Schema,
};
use std::io::{Read, Seek, SeekFrom, Write};

fn city_schema() -> Schema {
    Schema::new(vec![
        Column::new("name", ColumnType::String),
        Column::new("age", ColumnType::Int),
        Column::new("height", ColumnType::Double),
    ])
}

#[test]
fn build_payload() -> Result<()> {
    let schema = city_schema();
    let mut props = Props::new(&schema);
    props.set_string(0, "Ada")?;
    props.set_int(1, 36)?;

    let expected: &[u8] = &[
        0x00, 0x00, 0x03, 0x00, 0x00, 0x00, b'A', b'd', b'a', // name: "Ada"
        0x01, 0x00, 0x24, 0x00, 0x00, 0x00, // age: 36
    ];
    assert_eq!(props.bytes(), expected);
    assert_eq!(props.get_string(0)?, "Ada");
    assert_eq!(props.get_int(1)?, 36);
    assert!(!props.has(2));
    Ok(())
}

#[test]
fn append_grows_payload() -> Result<()> {
    let schema = city_schema();
    let mut props = Props::new(&schema);
    props.set_string(0, "Ada")?;
    props.set_int(1, 36)?;
    let len_before = props.bytes().len();

    props.set_double(2, 1.72)?;
    assert_eq!(props.bytes().len(), len_before + 2 + 8);
    assert_eq!(props.get_double(2)?, 1.72);
    Ok(())
}

#[test]
fn length_change_relocates_record() -> Result<()> {
    let schema = city_schema();
    let mut props = Props::new(&schema);
    props.set_string(0, "Ada")?;
    props.set_int(1, 36)?;
    props.set_double(2, 1.72)?;

    props.set_string(0, "Lovelace")?;

    let mut expected = vec![0x01, 0x00, 0x24, 0x00, 0x00, 0x00];
    expected.extend_from_slice(&[0x02, 0x00]);
    expected.extend_from_slice(&1.72f64.to_le_bytes());
    expected.extend_from_slice(&[0x00, 0x00, 0x08, 0x00, 0x00, 0x00]);
    expected.extend_from_slice(b"Lovelace");
    assert_eq!(props.bytes(), expected.as_slice());

    assert_eq!(props.get_string(0)?, "Lovelace");
    assert_eq!(props.get_int(1)?, 36);
    assert_eq!(props.get_double(2)?, 1.72);
    Ok(())
}

#[test]
fn copy_on_write_isolates_views() -> Result<()> {
    let schema = city_schema();
    let mut builder = Props::new(&schema);
    builder.set_string(0, "Ada")?;
    builder.set_int(1, 36)?;
    builder.set_double(2, 1.72)?;
    let payload = builder.bytes().to_vec();
    let before = payload.clone();

    let mut writer = Props::from_payload(&schema, payload.as_slice());
    let reader = Props::from_payload(&schema, payload.as_slice());
    assert_eq!(writer.get_int(1)?, 36);

    writer.set_int(1, 99)?;
    assert_eq!(writer.get_int(1)?, 99);
    // The shared backing buffer and the sibling view are untouched.
    assert_eq!(payload, before);
    assert_eq!(reader.get_int(1)?, 36);
    Ok(())
}

#[test]
fn truncated_value_is_not_indexed() {
    let schema = city_schema();
    // Length prefix claims 2 bytes, only 1 follows.
    let payload: &[u8] = &[0x00, 0x00, 0x02, 0x00, 0x00, 0x00, b'A'];
    let props = Props::from_payload(&schema, payload);
    assert!(!props.has(0));
    assert_eq!(props.get_string(0), Err(Error::NoValue));
}

#[test]
fn dynamic_set_enforces_column_type() -> Result<()> {
    let schema = city_schema();
    let mut props = Props::new(&schema);
    assert_eq!(
        props.set_value(1, &PropValue::String("not an int".to_string())),
        Err(Error::TypeMismatch)
    );
    assert_eq!(
        props.set_value(0, &PropValue::Double(3.14)),
        Err(Error::TypeMismatch)
    );
    props.set_value(1, &PropValue::Int(7))?;
    assert_eq!(props.get_value(1)?, PropValue::Int(7));
    assert_eq!(
        props.set_value(0, &PropValue::Null),
        Err(Error::UnmappableValue)
    );
    Ok(())
}

fn every_type_schema() -> Schema {
    Schema::new(vec![
        Column::new("bool", ColumnType::Bool),
        Column::new("byte", ColumnType::Byte),
        Column::new("ubyte", ColumnType::UByte),
        Column::new("short", ColumnType::Short),
        Column::new("ushort", ColumnType::UShort),
        Column::new("int", ColumnType::Int),
        Column::new("uint", ColumnType::UInt),
        Column::new("long", ColumnType::Long),
        Column::new("ulong", ColumnType::ULong),
        Column::new("float", ColumnType::Float),
        Column::new("double", ColumnType::Double),
        Column::new("string", ColumnType::String),
        Column::new("json", ColumnType::Json),
        Column::new("datetime", ColumnType::DateTime),
        Column::new("binary", ColumnType::Binary),
    ])
}

#[test]
fn round_trip_every_type() -> Result<()> {
    let schema = every_type_schema();
    let mut props = Props::new(&schema);
    let moment = DateTime::parse_from_rfc3339("2024-02-29T12:30:00+01:00")
        .expect("valid RFC 3339 literal");

    props.set_bool(0, true)?;
    props.set_byte(1, -7)?;
    props.set_ubyte(2, 200)?;
    props.set_short(3, -12_345)?;
    props.set_ushort(4, 54_321)?;
    props.set_int(5, -1_000_000)?;
    props.set_uint(6, 3_000_000_000)?;
    props.set_long(7, -5_000_000_000)?;
    props.set_ulong(8, 18_000_000_000_000_000_000)?;
    props.set_float(9, 2.5)?;
    props.set_double(10, -0.125)?;
    props.set_string_by_name("string", "hello")?;
    props.set_json_by_name("json", r#"{"a":1}"#)?;
    props.set_datetime(13, moment)?;
    props.set_binary(14, &[0x00, 0xFF, 0x7F])?;

    assert!(props.get_bool(0)?);
    assert_eq!(props.get_byte(1)?, -7);
    assert_eq!(props.get_ubyte(2)?, 200);
    assert_eq!(props.get_short(3)?, -12_345);
    assert_eq!(props.get_ushort(4)?, 54_321);
    assert_eq!(props.get_int(5)?, -1_000_000);
    assert_eq!(props.get_uint(6)?, 3_000_000_000);
    assert_eq!(props.get_long(7)?, -5_000_000_000);
    assert_eq!(props.get_ulong(8)?, 18_000_000_000_000_000_000);
    assert_eq!(props.get_float(9)?, 2.5);
    assert_eq!(props.get_double(10)?, -0.125);
    assert_eq!(props.get_string_by_name("string")?, "hello");
    assert_eq!(props.get_json_by_name("json")?, r#"{"a":1}"#);
    assert_eq!(props.get_datetime(13)?, moment);
    assert_eq!(props.get_datetime_string(13)?, "2024-02-29T12:30:00+01:00");
    assert_eq!(props.get_binary(14)?, vec![0x00, 0xFF, 0x7F]);

    for col in 0..schema.len() {
        assert!(props.delete(col), "column {col} had a value");
        assert!(!props.has(col));
    }
    assert_eq!(props.get_value(5), Err(Error::NoValue));
    assert!(props.bytes().is_empty());
    Ok(())
}

#[test]
fn dynamic_round_trip_every_type() -> Result<()> {
    let schema = every_type_schema();
    let mut props = Props::new(&schema);
    let moment = DateTime::parse_from_rfc3339("1999-12-31T23:59:59Z")
        .expect("valid RFC 3339 literal");
    let values = [
        PropValue::Bool(false),
        PropValue::Byte(1),
        PropValue::UByte(2),
        PropValue::Short(3),
        PropValue::UShort(4),
        PropValue::Int(5),
        PropValue::UInt(6),
        PropValue::Long(7),
        PropValue::ULong(8),
        PropValue::Float(9.5),
        PropValue::Double(10.5),
        PropValue::String("eleven".to_string()),
        PropValue::Json("[12]".to_string()),
        PropValue::DateTime(moment),
        PropValue::Binary(vec![13, 13]),
    ];
    for (col, value) in values.iter().enumerate() {
        props.set_value(col, value)?;
    }
    for (col, value) in values.iter().enumerate() {
        assert_eq!(&props.get_value(col)?, value);
    }
    Ok(())
}

#[test]
fn fixed_width_set_is_idempotent() -> Result<()> {
    let schema = city_schema();
    let mut props = Props::new(&schema);
    props.set_int(1, 36)?;
    let once = props.bytes().to_vec();
    props.set_int(1, 36)?;
    assert_eq!(props.bytes(), once.as_slice());
    Ok(())
}

#[test]
fn same_length_overwrite_stays_in_place() -> Result<()> {
    let schema = city_schema();
    let mut props = Props::new(&schema);
    props.set_string(0, "Ada")?;
    props.set_int(1, 36)?;
    let len_before = props.bytes().len();

    props.set_string(0, "Bob")?;
    assert_eq!(props.bytes().len(), len_before);
    // The trailing record kept its position.
    assert_eq!(&props.bytes()[..2], &[0x00, 0x00]);
    assert_eq!(&props.bytes()[6..9], b"Bob");
    assert_eq!(props.get_int(1)?, 36);
    Ok(())
}

#[test]
fn type_policing() {
    let schema = city_schema();
    let mut props = Props::new(&schema);
    assert_eq!(props.set_int(0, 1), Err(Error::TypeMismatch));
    assert_eq!(props.set_string(1, "x"), Err(Error::TypeMismatch));
    assert_eq!(props.set_long(1, 1), Err(Error::TypeMismatch));
    props.set_int(1, 36).expect("int column accepts i32");
    assert_eq!(props.get_string(1), Err(Error::TypeMismatch));
    assert_eq!(props.get_double(1), Err(Error::TypeMismatch));
}

#[test]
fn out_of_range_and_unknown_names() {
    let schema = city_schema();
    let mut props = Props::new(&schema);
    assert_eq!(props.get_int(9), Err(Error::NoColumn));
    assert_eq!(props.set_int(9, 1), Err(Error::NoColumn));
    assert_eq!(props.get_int_by_name("nope"), Err(Error::NoColumn));
    assert!(!props.has(9));
    assert!(!props.has_by_name("nope"));
    assert!(!props.delete(9));
    assert!(!props.delete_by_name("nope"));
}

#[test]
fn later_duplicate_record_wins() {
    let schema = city_schema();
    let payload: &[u8] = &[
        0x01, 0x00, 0x24, 0x00, 0x00, 0x00, // age: 36
        0x01, 0x00, 0x63, 0x00, 0x00, 0x00, // age again: 99
    ];
    let props = Props::from_payload(&schema, payload);
    assert_eq!(props.get_int(1), Ok(99));
}

#[test]
fn unknown_column_index_stops_scan() {
    let schema = city_schema();
    let payload: &[u8] = &[
        0x01, 0x00, 0x24, 0x00, 0x00, 0x00, // age: 36
        0x07, 0x00, // no such column
        0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // height, unreachable
    ];
    let props = Props::from_payload(&schema, payload);
    assert_eq!(props.get_int(1), Ok(36));
    assert!(!props.has(2));
}

#[test]
fn empty_payload() {
    let schema = city_schema();
    let props = Props::from_payload(&schema, &[][..]);
    for col in 0..schema.len() {
        assert!(!props.has(col));
    }
    assert_eq!(props.get_int(1), Err(Error::NoValue));
    assert_eq!(props.to_string(), "Props{}");
}

#[test]
fn deleting_leading_record_renumbers_offsets() -> Result<()> {
    let schema = city_schema();
    let mut props = Props::new(&schema);
    props.set_string(0, "Ada")?;
    props.set_int(1, 36)?;
    props.set_double(2, 1.72)?;

    assert!(props.delete(0));
    assert_eq!(props.get_string(0), Err(Error::NoValue));
    assert_eq!(props.get_int(1)?, 36);
    assert_eq!(props.get_double(2)?, 1.72);
    assert!(!props.delete(0));

    let mut expected = vec![0x01, 0x00, 0x24, 0x00, 0x00, 0x00, 0x02, 0x00];
    expected.extend_from_slice(&1.72f64.to_le_bytes());
    assert_eq!(props.bytes(), expected.as_slice());
    Ok(())
}

#[test]
fn write_order_is_preserved_on_the_wire() -> Result<()> {
    let schema = city_schema();
    let mut props = Props::new(&schema);
    props.set_int(1, 36)?;
    props.set_double(2, 1.72)?;
    props.set_string(0, "Ada")?;

    let mut expected = vec![0x01, 0x00, 0x24, 0x00, 0x00, 0x00, 0x02, 0x00];
    expected.extend_from_slice(&1.72f64.to_le_bytes());
    expected.extend_from_slice(&[0x00, 0x00, 0x03, 0x00, 0x00, 0x00]);
    expected.extend_from_slice(b"Ada");
    assert_eq!(props.bytes(), expected.as_slice());
    Ok(())
}

#[test]
fn display_skips_absent_values() -> Result<()> {
    let schema = city_schema();
    let mut props = Props::new(&schema);
    props.set_string(0, "Ada")?;
    props.set_int(1, 36)?;
    assert_eq!(props.to_string(), "Props{name:Ada,age:36}");
    Ok(())
}

#[test]
fn datetime_parse_failure_falls_back_to_text() -> Result<()> {
    let schema = every_type_schema();
    let mut props = Props::new(&schema);
    props.set_datetime_string(13, "not a timestamp")?;
    assert!(matches!(
        props.get_datetime(13),
        Err(Error::DateTimeParse(_))
    ));
    assert_eq!(
        props.get_value(13)?,
        PropValue::String("not a timestamp".to_string())
    );
    Ok(())
}

#[test]
fn invalid_utf8_is_rejected() {
    let schema = city_schema();
    let payload: &[u8] = &[0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0xFF, 0xFE];
    let props = Props::from_payload(&schema, payload);
    assert!(matches!(props.get_string(0), Err(Error::InvalidUtf8(_))));
}

#[test]
fn streams_properties_into_a_sink() -> Result<()> {
    let schema = city_schema();
    let mut source = Props::new(&schema);
    source.set_string(0, "Ada")?;
    source.set_int(1, 36)?;
    source.set_double(2, 1.72)?;

    let mut sink = Props::new(&schema);
    let finish = source
        .process_properties(&mut sink)
        .expect("property stream");
    assert!(!finish);
    assert_eq!(sink.bytes(), source.bytes());

    let table = source.properties().expect("property map");
    assert_eq!(table["name"], "Ada");
    assert_eq!(table["age"], "36");
    Ok(())
}

#[test]
fn payload_survives_disk_verbatim() -> Result<()> {
    let schema = city_schema();
    let mut props = Props::new(&schema);
    props.set_string(0, "Ada")?;
    props.set_int(1, 36)?;

    let mut file = tempfile::tempfile().expect("tempfile");
    file.write_all(props.bytes()).expect("write payload");
    file.seek(SeekFrom::Start(0)).expect("rewind");
    let mut payload = Vec::new();
    file.read_to_end(&mut payload).expect("read payload");

    assert_eq!(payload.as_slice(), props.bytes());
    let view = Props::from_payload(&schema, payload.as_slice());
    assert_eq!(view.get_string(0)?, "Ada");
    assert_eq!(view.get_int(1)?, 36);
    Ok(())
}
