use flatgeobuf::ColumnType;
use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq)]
pub enum Error {
    /// Column index out of range, or name not present in the schema.
    NoColumn,
    /// The column exists but no value is stored for it.
    NoValue,
    /// The requested value type disagrees with the schema's column type.
    TypeMismatch,
    /// A dynamically supplied value has no FlatGeobuf column type.
    UnmappableValue,
    /// A variable-size value's length prefix is missing or truncated.
    StringSizeCorrupt,
    /// A variable-size value's stored length is not representable.
    StringSizeOverflows,
    /// The schema reports a column type outside the known enumeration.
    UnknownColumnType(ColumnType),
    /// Stored text is not valid UTF-8.
    InvalidUtf8(std::str::Utf8Error),
    /// A DateTime value is not in RFC 3339 form.
    DateTimeParse(chrono::ParseError),
    /// A panic arose inside the FlatBuffer-backed schema view.
    ForeignDecode(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NoColumn => f.write_str("no such column"),
            Error::NoValue => f.write_str("no value for column"),
            Error::TypeMismatch => f.write_str("value type does not match column type"),
            Error::UnmappableValue => f.write_str("value does not map to a column type"),
            Error::StringSizeCorrupt => f.write_str("value size prefix missing or truncated"),
            Error::StringSizeOverflows => f.write_str("value size overflows"),
            Error::UnknownColumnType(column_type) => {
                write!(f, "unknown column type {}", column_type.0)
            }
            Error::InvalidUtf8(utf8) => utf8.fmt(f),
            Error::DateTimeParse(parse) => parse.fmt(f),
            Error::ForeignDecode(description) => write!(f, "flatbuffers: {description}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::str::Utf8Error> for Error {
    fn from(value: std::str::Utf8Error) -> Self {
        Error::InvalidUtf8(value)
    }
}

impl From<chrono::ParseError> for Error {
    fn from(value: chrono::ParseError) -> Self {
        Error::DateTimeParse(value)
    }
}
