use crate::error::{Error, Result};
use crate::schema::{ColumnInfo, SchemaView};
use flatgeobuf::{ColumnType, Header as FlatHeader};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Run a closure that touches FlatBuffer-backed data, converting any
/// panic from the foreign decoder into [`Error::ForeignDecode`].
///
/// Generated accessor code trusts its buffer; over bytes that were
/// never verified it may panic instead of returning an error. Nothing
/// in this crate lets such a panic unwind through the codec.
pub fn flatbuffer_safe<T>(f: impl FnOnce() -> T) -> Result<T> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|panic| {
        let description = if let Some(s) = panic.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else {
            "panic".to_string()
        };
        Error::ForeignDecode(description)
    })
}

/// A [`SchemaView`] over the column list of a FlatBuffer header.
///
/// Every access goes through [`flatbuffer_safe`]; the column count is
/// taken once at construction so that later count queries are
/// infallible.
#[derive(Clone, Copy)]
pub struct HeaderSchema<'a> {
    header: FlatHeader<'a>,
    columns_len: usize,
}

impl<'a> HeaderSchema<'a> {
    pub fn new(header: FlatHeader<'a>) -> Result<HeaderSchema<'a>> {
        let columns_len = flatbuffer_safe(|| header.columns().map_or(0, |cols| cols.len()))?;
        Ok(HeaderSchema {
            header,
            columns_len,
        })
    }

    pub fn header(&self) -> FlatHeader<'a> {
        self.header
    }
}

impl SchemaView for HeaderSchema<'_> {
    fn column_count(&self) -> usize {
        self.columns_len
    }

    fn column_info(&self, index: usize) -> Result<Option<ColumnInfo>> {
        if index >= self.columns_len {
            return Ok(None);
        }
        flatbuffer_safe(|| {
            self.header.columns().map(|cols| {
                let col = cols.get(index);
                ColumnInfo {
                    name: col.name().to_string(),
                    type_: col.type_(),
                }
            })
        })
    }

    fn column_type(&self, index: usize) -> Result<ColumnType> {
        if index >= self.columns_len {
            return Ok(ColumnType::Byte);
        }
        flatbuffer_safe(|| {
            self.header
                .columns()
                .map_or(ColumnType::Byte, |cols| cols.get(index).type_())
        })
    }

    fn index_of(&self, name: &str) -> Result<Option<usize>> {
        flatbuffer_safe(|| {
            self.header
                .columns()
                .and_then(|cols| cols.iter().position(|col| col.name() == name))
        })
    }
}
