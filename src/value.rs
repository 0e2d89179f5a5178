use chrono::{DateTime, FixedOffset, SecondsFormat};
use std::fmt;

/// A dynamically typed property value, tagged over the column type
/// domain.
///
/// [`crate::Props::get_value`] returns the variant matching the
/// schema's declared column type; a `DateTime` column whose stored text
/// fails RFC 3339 parsing comes back as `String` instead.
///
/// `Null` has no FlatGeobuf column representation. It exists so that
/// dynamic sources with a null notion can flow through
/// [`crate::Props::set_value`], which rejects it as unmappable; absence
/// is expressed by deleting the value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Bool(bool),
    Byte(i8),
    UByte(u8),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Float(f32),
    Double(f64),
    String(String),
    Json(String),
    DateTime(DateTime<FixedOffset>),
    Binary(Vec<u8>),
    Null,
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Bool(v) => v.fmt(f),
            PropValue::Byte(v) => v.fmt(f),
            PropValue::UByte(v) => v.fmt(f),
            PropValue::Short(v) => v.fmt(f),
            PropValue::UShort(v) => v.fmt(f),
            PropValue::Int(v) => v.fmt(f),
            PropValue::UInt(v) => v.fmt(f),
            PropValue::Long(v) => v.fmt(f),
            PropValue::ULong(v) => v.fmt(f),
            PropValue::Float(v) => v.fmt(f),
            PropValue::Double(v) => v.fmt(f),
            PropValue::String(v) => f.write_str(v),
            PropValue::Json(v) => f.write_str(v),
            PropValue::DateTime(v) => {
                f.write_str(&v.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            PropValue::Binary(v) => write!(f, "{v:?}"),
            PropValue::Null => f.write_str("null"),
        }
    }
}
