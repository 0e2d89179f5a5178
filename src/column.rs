use crate::error::Result;
use crate::interop::flatbuffer_safe;
use flatbuffers::{FlatBufferBuilder, WIPOffset};
use flatgeobuf::{Column as FlatColumn, ColumnArgs, ColumnType};

/// A column definition, decoupled from its FlatBuffer representation.
///
/// `required` is the inverse of the on-wire `nullable` flag, so the
/// default of `false` matches the wire default. `width`, `precision`
/// and `scale` default to `-1`, the FlatBuffers "unset" value.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub type_: ColumnType,
    pub title: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<String>,
    pub width: i32,
    pub precision: i32,
    pub scale: i32,
    pub required: bool,
    pub unique: bool,
    pub primary_key: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, type_: ColumnType) -> Column {
        Column {
            name: name.into(),
            type_,
            title: None,
            description: None,
            metadata: None,
            width: -1,
            precision: -1,
            scale: -1,
            required: false,
            unique: false,
            primary_key: false,
        }
    }

    /// Decode a FlatBuffer column record, guarding against panics from
    /// the foreign decoder.
    pub fn from_flat(column: FlatColumn) -> Result<Column> {
        flatbuffer_safe(|| Column::copy_flat(column))
    }

    pub(crate) fn copy_flat(column: FlatColumn) -> Column {
        Column {
            name: column.name().to_string(),
            type_: column.type_(),
            title: column.title().map(str::to_string),
            description: column.description().map(str::to_string),
            metadata: column.metadata().map(str::to_string),
            width: column.width(),
            precision: column.precision(),
            scale: column.scale(),
            required: !column.nullable(),
            unique: column.unique(),
            primary_key: column.primary_key(),
        }
    }

    pub fn to_builder<'a>(&self, fbb: &mut FlatBufferBuilder<'a>) -> WIPOffset<FlatColumn<'a>> {
        let name = fbb.create_string(&self.name);
        let title = self.title.as_deref().map(|s| fbb.create_string(s));
        let description = self.description.as_deref().map(|s| fbb.create_string(s));
        let metadata = self.metadata.as_deref().map(|s| fbb.create_string(s));
        FlatColumn::create(
            fbb,
            &ColumnArgs {
                name: Some(name),
                type_: self.type_,
                title,
                description,
                metadata,
                width: self.width,
                precision: self.precision,
                scale: self.scale,
                nullable: !self.required,
                unique: self.unique,
                primary_key: self.primary_key,
            },
        )
    }
}

impl Default for Column {
    fn default() -> Self {
        Column::new("", ColumnType::Byte)
    }
}
