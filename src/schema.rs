use crate::column::Column;
use crate::error::Result;
use crate::interop::flatbuffer_safe;
use flatbuffers::{FlatBufferBuilder, ForwardsUOffset, Vector, WIPOffset};
use flatgeobuf::{Column as FlatColumn, ColumnType, Header as FlatHeader};
use std::cell::OnceCell;
use std::collections::HashMap;

/// Name and type of a single column, as seen through a [`SchemaView`].
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub type_: ColumnType,
}

/// Read-only schema capability consumed by the property codec.
///
/// Two operations are required: the column count and a column-by-index
/// lookup returning name and type. [`Schema`] implements the capability
/// natively; [`crate::HeaderSchema`] implements it over FlatBuffer-backed
/// schema bytes with every call guarded against foreign panics.
pub trait SchemaView {
    fn column_count(&self) -> usize;

    /// Name and type of the column at `index`, `None` when out of range.
    fn column_info(&self, index: usize) -> Result<Option<ColumnInfo>>;

    fn column_type(&self, index: usize) -> Result<ColumnType> {
        Ok(self
            .column_info(index)?
            .map_or(ColumnType::Byte, |info| info.type_))
    }

    fn column_name(&self, index: usize) -> Result<Option<String>> {
        Ok(self.column_info(index)?.map(|info| info.name))
    }

    fn index_of(&self, name: &str) -> Result<Option<usize>> {
        for index in 0..self.column_count() {
            if let Some(info) = self.column_info(index)? {
                if info.name == name {
                    return Ok(Some(index));
                }
            }
        }
        Ok(None)
    }
}

/// Schemas below this width are scanned linearly; wider schemas build
/// the name map on first lookup.
const NAME_INDEX_THRESHOLD: usize = 6;

/// An ordered, immutable list of column definitions with lazy
/// name-to-index lookup.
///
/// The lookup map is built at most once and only for schemas wide
/// enough that a linear scan stops paying off. Column indices are
/// stable for the lifetime of the schema.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    cols: Vec<Column>,
    name_to_index: OnceCell<HashMap<String, usize>>,
}

impl Schema {
    pub fn new(cols: Vec<Column>) -> Schema {
        Schema {
            cols,
            name_to_index: OnceCell::new(),
        }
    }

    /// Decode the column list of a FlatBuffer header into an owned
    /// schema. Returns `ForeignDecode` if the foreign decoder panics.
    pub fn from_header(header: FlatHeader) -> Result<Schema> {
        flatbuffer_safe(|| {
            let cols = header.columns().map_or_else(Vec::new, |columns| {
                columns.iter().map(Column::copy_flat).collect()
            });
            Schema::new(cols)
        })
    }

    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.cols
    }

    /// The column at `index`, or `None` when out of range.
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.cols.get(index)
    }

    /// The name of the column at `index`, `""` when out of range.
    pub fn name(&self, index: usize) -> &str {
        self.column(index).map_or("", |col| col.name.as_str())
    }

    /// The type of the column at `index`, the zero type when out of range.
    pub fn column_type(&self, index: usize) -> ColumnType {
        self.column(index).map_or(ColumnType::Byte, |col| col.type_)
    }

    /// Resolve a column name to its index.
    ///
    /// Consults the map if it exists; otherwise scans linearly below
    /// the threshold and builds the map in one pass above it. For
    /// duplicate names, the map keeps the last occurrence.
    pub fn index(&self, name: &str) -> Option<usize> {
        if let Some(map) = self.name_to_index.get() {
            return map.get(name).copied();
        }
        if self.cols.len() < NAME_INDEX_THRESHOLD {
            return self.cols.iter().position(|col| col.name == name);
        }
        let map = self.name_to_index.get_or_init(|| {
            let mut map = HashMap::with_capacity(self.cols.len());
            for (index, col) in self.cols.iter().enumerate() {
                map.insert(col.name.clone(), index);
            }
            map
        });
        map.get(name).copied()
    }

    /// Encode every column and then the columns vector, mirroring the
    /// in-memory column order on the wire.
    pub fn to_builder<'a>(
        &self,
        fbb: &mut FlatBufferBuilder<'a>,
    ) -> WIPOffset<Vector<'a, ForwardsUOffset<FlatColumn<'a>>>> {
        let offsets: Vec<_> = self.cols.iter().map(|col| col.to_builder(fbb)).collect();
        fbb.create_vector(&offsets)
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        // The lazily built lookup map is derived state.
        self.cols == other.cols
    }
}

impl SchemaView for Schema {
    fn column_count(&self) -> usize {
        self.cols.len()
    }

    fn column_info(&self, index: usize) -> Result<Option<ColumnInfo>> {
        Ok(self.column(index).map(|col| ColumnInfo {
            name: col.name.clone(),
            type_: col.type_,
        }))
    }

    fn column_type(&self, index: usize) -> Result<ColumnType> {
        Ok(Schema::column_type(self, index))
    }

    fn index_of(&self, name: &str) -> Result<Option<usize>> {
        Ok(self.index(name))
    }
}
