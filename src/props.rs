use crate::error::{Error, Result};
use crate::interop::{flatbuffer_safe, HeaderSchema};
use crate::schema::{Schema, SchemaView};
use crate::value::PropValue;
use byteorder::{ByteOrder, LittleEndian};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use flatgeobuf::{ColumnType, Feature, Header as FlatHeader};
use geozero::error::GeozeroError;
use geozero::{ColumnValue, PropertyProcessor};
use log::debug;
use std::borrow::Cow;
use std::cell::OnceCell;
use std::fmt;

/// Width of the column index tag preceding every value.
const COLUMN_TAG_SIZE: usize = 2;
/// Width of the length prefix preceding every variable-size value.
const LEN_PREFIX_SIZE: usize = 4;

enum SchemaRef<'a> {
    /// Schema constructed in this crate; lookups are direct.
    Fast(&'a Schema),
    /// FlatBuffer-backed schema; every lookup is guarded.
    Flat(HeaderSchema<'a>),
}

/// A property set: a schema view over a packed property payload.
///
/// The payload is the FlatGeobuf per-feature property format, a
/// concatenation of `⟨col_idx:u16 LE⟩ ⟨value⟩` records where
/// variable-size values carry a `u32 LE` length prefix. [`Props::bytes`]
/// is that wire form verbatim, at all times.
///
/// A set built by [`Props::from_payload`] or [`Props::from_flat`] over a
/// borrowed slice never writes to it: the first mutation copies the
/// bytes and all further writes go to the exclusively owned copy.
///
/// The reverse index from column to value offset is built lazily, once,
/// on first access. `Props` is confined to a single task; it is
/// deliberately not `Sync`.
pub struct Props<'a> {
    schema: SchemaRef<'a>,
    data: Cow<'a, [u8]>,
    /// `offsets[col]` is the byte offset of the value for `col` (the
    /// length prefix for variable-size types), 0 when no value is
    /// stored. The column tag lives at `offsets[col] - 2`.
    offsets: OnceCell<Vec<usize>>,
}

impl<'a> Props<'a> {
    /// An empty, mutable property set under a local schema.
    pub fn new(schema: &'a Schema) -> Props<'a> {
        Props {
            schema: SchemaRef::Fast(schema),
            data: Cow::Owned(Vec::new()),
            offsets: OnceCell::new(),
        }
    }

    /// A property set over an existing payload under a local schema.
    ///
    /// A borrowed payload is read in place and copied on first write.
    pub fn from_payload(schema: &'a Schema, data: impl Into<Cow<'a, [u8]>>) -> Props<'a> {
        Props {
            schema: SchemaRef::Fast(schema),
            data: data.into(),
            offsets: OnceCell::new(),
        }
    }

    /// A property set over an existing payload under a FlatBuffer-backed
    /// schema view.
    pub fn from_flat(schema: HeaderSchema<'a>, data: impl Into<Cow<'a, [u8]>>) -> Props<'a> {
        Props {
            schema: SchemaRef::Flat(schema),
            data: data.into(),
            offsets: OnceCell::new(),
        }
    }

    /// A read view over a feature's property bytes under its header's
    /// column list.
    pub fn from_feature(header: FlatHeader<'a>, feature: Feature<'a>) -> Result<Props<'a>> {
        let schema = HeaderSchema::new(header)?;
        let data = flatbuffer_safe(|| feature.properties().map(|p| p.bytes()))?.unwrap_or(&[]);
        Ok(Props::from_flat(schema, data))
    }

    /// The payload in wire form, suitable for writing out verbatim.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn column_count(&self) -> usize {
        self.view().column_count()
    }

    fn view(&self) -> &dyn SchemaView {
        match &self.schema {
            SchemaRef::Fast(schema) => *schema,
            SchemaRef::Flat(schema) => schema,
        }
    }

    /// Byte size of the value for `col` whose encoding starts at `pos`
    /// (at the length prefix for variable-size types).
    fn size_of_value(&self, col: usize, pos: usize) -> Result<usize> {
        match self.view().column_type(col)? {
            ColumnType::Bool | ColumnType::Byte | ColumnType::UByte => Ok(1),
            ColumnType::Short | ColumnType::UShort => Ok(2),
            ColumnType::Int | ColumnType::UInt | ColumnType::Float => Ok(4),
            ColumnType::Long | ColumnType::ULong | ColumnType::Double => Ok(8),
            ColumnType::String | ColumnType::Json | ColumnType::DateTime | ColumnType::Binary => {
                if self.data.len().saturating_sub(pos) < LEN_PREFIX_SIZE {
                    return Err(Error::StringSizeCorrupt);
                }
                let len = LittleEndian::read_u32(&self.data[pos..pos + LEN_PREFIX_SIZE]);
                usize::try_from(len)
                    .ok()
                    .and_then(|len| len.checked_add(LEN_PREFIX_SIZE))
                    .ok_or(Error::StringSizeOverflows)
            }
            other => Err(Error::UnknownColumnType(other)),
        }
    }

    /// One-shot scan of the payload into the reverse index.
    ///
    /// Stops silently at the first anomaly (unknown column index or
    /// truncated value); records indexed up to that point are kept. A
    /// later record for the same column shadows an earlier one.
    fn build_offsets(&self) -> Vec<usize> {
        let count = self.column_count();
        let mut table = vec![0; count];
        let data = self.data.as_ref();
        let mut pos = 0;
        while pos + COLUMN_TAG_SIZE <= data.len() {
            let col = LittleEndian::read_u16(&data[pos..pos + COLUMN_TAG_SIZE]) as usize;
            pos += COLUMN_TAG_SIZE;
            if col >= count {
                debug!("property scan stopped at unknown column index {col}");
                break;
            }
            match self.size_of_value(col, pos) {
                Ok(size) if pos + size <= data.len() => {
                    table[col] = pos;
                    pos += size;
                }
                _ => {
                    debug!("property scan stopped at truncated value for column {col}");
                    break;
                }
            }
        }
        table
    }

    fn offsets(&self) -> &[usize] {
        self.offsets.get_or_init(|| self.build_offsets())
    }

    fn offsets_mut(&mut self) -> &mut Vec<usize> {
        if self.offsets.get().is_none() {
            let table = self.build_offsets();
            let _ = self.offsets.set(table);
        }
        self.offsets.get_mut().expect("offset table initialized")
    }

    /// Value offset for `col`, 0 when absent, `NoColumn` when out of
    /// range.
    fn col_offset(&self, col: usize) -> Result<usize> {
        if col >= self.column_count() {
            return Err(Error::NoColumn);
        }
        Ok(self.offsets()[col])
    }

    fn name_to_col(&self, name: &str) -> Result<usize> {
        self.view().index_of(name)?.ok_or(Error::NoColumn)
    }

    fn check(&self, col: usize, expected: ColumnType) -> Result<()> {
        if self.view().column_type(col)? != expected {
            return Err(Error::TypeMismatch);
        }
        Ok(())
    }

    /// True if the column exists and a value is stored for it.
    pub fn has(&self, col: usize) -> bool {
        matches!(self.col_offset(col), Ok(offset) if offset > 0)
    }

    pub fn has_by_name(&self, name: &str) -> bool {
        matches!(self.name_to_col(name), Ok(col) if self.has(col))
    }

    /// Remove the stored value for `col`. Returns whether a value was
    /// removed.
    pub fn delete(&mut self, col: usize) -> bool {
        match self.col_offset(col) {
            Ok(offset) if offset > 0 => {
                self.remove_record(col, offset);
                true
            }
            _ => false,
        }
    }

    pub fn delete_by_name(&mut self, name: &str) -> bool {
        match self.name_to_col(name) {
            Ok(col) => self.delete(col),
            Err(_) => false,
        }
    }

    /// Excise the record for `col` (tag and value) and renumber every
    /// surviving offset past it.
    fn remove_record(&mut self, col: usize, offset: usize) {
        let Ok(size) = self.size_of_value(col, offset) else {
            return;
        };
        let start = offset - COLUMN_TAG_SIZE;
        let end = offset + size;
        self.data.to_mut().drain(start..end);
        let removed = end - start;
        let offsets = self.offsets_mut();
        offsets[col] = 0;
        for entry in offsets.iter_mut() {
            if *entry >= end {
                *entry -= removed;
            }
        }
    }

    /// Append a `⟨tag⟩ ⟨len?⟩ ⟨value⟩` record at the tail and point the
    /// column's offset at it.
    fn append(&mut self, col: usize, len_prefix: Option<u32>, value: &[u8]) -> Result<()> {
        let tag = u16::try_from(col).map_err(|_| Error::NoColumn)?;
        let data = self.data.to_mut();
        data.extend_from_slice(&tag.to_le_bytes());
        let value_at = data.len();
        if let Some(len) = len_prefix {
            data.extend_from_slice(&len.to_le_bytes());
        }
        data.extend_from_slice(value);
        self.offsets_mut()[col] = value_at;
        Ok(())
    }

    /// Store a fixed-width value: overwrite in place when present,
    /// append otherwise. `value` is the little-endian encoding.
    fn set_fixed(&mut self, col: usize, expected: ColumnType, value: &[u8]) -> Result<()> {
        let offset = self.col_offset(col)?;
        self.check(col, expected)?;
        if offset > 0 {
            let data = self.data.to_mut();
            data[offset..offset + value.len()].copy_from_slice(value);
            return Ok(());
        }
        self.append(col, None, value)
    }

    /// Store a variable-size value: overwrite in place when the length
    /// is unchanged, otherwise delete the old record and append.
    fn set_var(&mut self, col: usize, expected: ColumnType, value: &[u8]) -> Result<()> {
        let len = u32::try_from(value.len()).map_err(|_| Error::StringSizeOverflows)?;
        let offset = self.col_offset(col)?;
        self.check(col, expected)?;
        if offset > 0 {
            let stored = LittleEndian::read_u32(&self.data[offset..offset + LEN_PREFIX_SIZE]);
            if stored == len {
                let data = self.data.to_mut();
                data[offset + LEN_PREFIX_SIZE..offset + LEN_PREFIX_SIZE + value.len()]
                    .copy_from_slice(value);
                return Ok(());
            }
            self.remove_record(col, offset);
        }
        self.append(col, Some(len), value)
    }

    /// Fixed-width value bytes for `col`, after type and presence
    /// checks.
    fn fixed_slice(&self, col: usize, expected: ColumnType, width: usize) -> Result<&[u8]> {
        let offset = self.col_offset(col)?;
        self.check(col, expected)?;
        if offset == 0 {
            return Err(Error::NoValue);
        }
        Ok(&self.data[offset..offset + width])
    }

    /// Variable-size value bytes for `col`, without the length prefix.
    fn var_slice(&self, col: usize, expected: ColumnType) -> Result<&[u8]> {
        let offset = self.col_offset(col)?;
        self.check(col, expected)?;
        if offset == 0 {
            return Err(Error::NoValue);
        }
        let len = LittleEndian::read_u32(&self.data[offset..offset + LEN_PREFIX_SIZE]);
        let start = offset + LEN_PREFIX_SIZE;
        let end = usize::try_from(len)
            .ok()
            .and_then(|len| start.checked_add(len))
            .ok_or(Error::StringSizeOverflows)?;
        Ok(&self.data[start..end])
    }

    fn var_str(&self, col: usize, expected: ColumnType) -> Result<&str> {
        Ok(std::str::from_utf8(self.var_slice(col, expected)?)?)
    }

    pub fn get_bool(&self, col: usize) -> Result<bool> {
        Ok(self.fixed_slice(col, ColumnType::Bool, 1)?[0] != 0)
    }

    pub fn set_bool(&mut self, col: usize, value: bool) -> Result<()> {
        self.set_fixed(col, ColumnType::Bool, &[u8::from(value)])
    }

    pub fn get_byte(&self, col: usize) -> Result<i8> {
        Ok(self.fixed_slice(col, ColumnType::Byte, 1)?[0] as i8)
    }

    pub fn set_byte(&mut self, col: usize, value: i8) -> Result<()> {
        self.set_fixed(col, ColumnType::Byte, &value.to_le_bytes())
    }

    pub fn get_ubyte(&self, col: usize) -> Result<u8> {
        Ok(self.fixed_slice(col, ColumnType::UByte, 1)?[0])
    }

    pub fn set_ubyte(&mut self, col: usize, value: u8) -> Result<()> {
        self.set_fixed(col, ColumnType::UByte, &value.to_le_bytes())
    }

    pub fn get_short(&self, col: usize) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.fixed_slice(
            col,
            ColumnType::Short,
            2,
        )?))
    }

    pub fn set_short(&mut self, col: usize, value: i16) -> Result<()> {
        self.set_fixed(col, ColumnType::Short, &value.to_le_bytes())
    }

    pub fn get_ushort(&self, col: usize) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.fixed_slice(
            col,
            ColumnType::UShort,
            2,
        )?))
    }

    pub fn set_ushort(&mut self, col: usize, value: u16) -> Result<()> {
        self.set_fixed(col, ColumnType::UShort, &value.to_le_bytes())
    }

    pub fn get_int(&self, col: usize) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.fixed_slice(
            col,
            ColumnType::Int,
            4,
        )?))
    }

    pub fn set_int(&mut self, col: usize, value: i32) -> Result<()> {
        self.set_fixed(col, ColumnType::Int, &value.to_le_bytes())
    }

    pub fn get_uint(&self, col: usize) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.fixed_slice(
            col,
            ColumnType::UInt,
            4,
        )?))
    }

    pub fn set_uint(&mut self, col: usize, value: u32) -> Result<()> {
        self.set_fixed(col, ColumnType::UInt, &value.to_le_bytes())
    }

    pub fn get_long(&self, col: usize) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.fixed_slice(
            col,
            ColumnType::Long,
            8,
        )?))
    }

    pub fn set_long(&mut self, col: usize, value: i64) -> Result<()> {
        self.set_fixed(col, ColumnType::Long, &value.to_le_bytes())
    }

    pub fn get_ulong(&self, col: usize) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.fixed_slice(
            col,
            ColumnType::ULong,
            8,
        )?))
    }

    pub fn set_ulong(&mut self, col: usize, value: u64) -> Result<()> {
        self.set_fixed(col, ColumnType::ULong, &value.to_le_bytes())
    }

    pub fn get_float(&self, col: usize) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.fixed_slice(
            col,
            ColumnType::Float,
            4,
        )?))
    }

    pub fn set_float(&mut self, col: usize, value: f32) -> Result<()> {
        self.set_fixed(col, ColumnType::Float, &value.to_le_bytes())
    }

    pub fn get_double(&self, col: usize) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.fixed_slice(
            col,
            ColumnType::Double,
            8,
        )?))
    }

    pub fn set_double(&mut self, col: usize, value: f64) -> Result<()> {
        self.set_fixed(col, ColumnType::Double, &value.to_le_bytes())
    }

    pub fn get_string(&self, col: usize) -> Result<String> {
        Ok(self.var_str(col, ColumnType::String)?.to_string())
    }

    pub fn set_string(&mut self, col: usize, value: &str) -> Result<()> {
        self.set_var(col, ColumnType::String, value.as_bytes())
    }

    pub fn get_json(&self, col: usize) -> Result<String> {
        Ok(self.var_str(col, ColumnType::Json)?.to_string())
    }

    pub fn set_json(&mut self, col: usize, value: &str) -> Result<()> {
        self.set_var(col, ColumnType::Json, value.as_bytes())
    }

    /// The stored binary value, as a fresh copy.
    pub fn get_binary(&self, col: usize) -> Result<Vec<u8>> {
        Ok(self.var_slice(col, ColumnType::Binary)?.to_vec())
    }

    pub fn set_binary(&mut self, col: usize, value: &[u8]) -> Result<()> {
        self.set_var(col, ColumnType::Binary, value)
    }

    /// The stored DateTime value parsed as RFC 3339. On a parse failure
    /// the raw text remains reachable through
    /// [`Props::get_datetime_string`].
    pub fn get_datetime(&self, col: usize) -> Result<DateTime<FixedOffset>> {
        let text = self.var_str(col, ColumnType::DateTime)?;
        Ok(DateTime::parse_from_rfc3339(text)?)
    }

    pub fn set_datetime(&mut self, col: usize, value: DateTime<FixedOffset>) -> Result<()> {
        let text = value.to_rfc3339_opts(SecondsFormat::Secs, true);
        self.set_var(col, ColumnType::DateTime, text.as_bytes())
    }

    /// The stored DateTime value as raw text, bypassing RFC 3339
    /// parsing.
    pub fn get_datetime_string(&self, col: usize) -> Result<String> {
        Ok(self.var_str(col, ColumnType::DateTime)?.to_string())
    }

    pub fn set_datetime_string(&mut self, col: usize, value: &str) -> Result<()> {
        self.set_var(col, ColumnType::DateTime, value.as_bytes())
    }

    /// Read the value for `col` as a tagged variant, dispatching on the
    /// schema's declared column type.
    pub fn get_value(&self, col: usize) -> Result<PropValue> {
        let value = match self.view().column_type(col)? {
            ColumnType::Bool => PropValue::Bool(self.get_bool(col)?),
            ColumnType::Byte => PropValue::Byte(self.get_byte(col)?),
            ColumnType::UByte => PropValue::UByte(self.get_ubyte(col)?),
            ColumnType::Short => PropValue::Short(self.get_short(col)?),
            ColumnType::UShort => PropValue::UShort(self.get_ushort(col)?),
            ColumnType::Int => PropValue::Int(self.get_int(col)?),
            ColumnType::UInt => PropValue::UInt(self.get_uint(col)?),
            ColumnType::Long => PropValue::Long(self.get_long(col)?),
            ColumnType::ULong => PropValue::ULong(self.get_ulong(col)?),
            ColumnType::Float => PropValue::Float(self.get_float(col)?),
            ColumnType::Double => PropValue::Double(self.get_double(col)?),
            ColumnType::String => PropValue::String(self.get_string(col)?),
            ColumnType::Json => PropValue::Json(self.get_json(col)?),
            ColumnType::Binary => PropValue::Binary(self.get_binary(col)?),
            ColumnType::DateTime => match self.get_datetime(col) {
                Ok(value) => PropValue::DateTime(value),
                Err(Error::DateTimeParse(_)) => {
                    PropValue::String(self.get_datetime_string(col)?)
                }
                Err(error) => return Err(error),
            },
            other => return Err(Error::UnknownColumnType(other)),
        };
        Ok(value)
    }

    pub fn get_value_by_name(&self, name: &str) -> Result<PropValue> {
        self.get_value(self.name_to_col(name)?)
    }

    /// Store a tagged value, dispatching on its runtime tag. Agreement
    /// with the column type is enforced by the typed setter it lands
    /// on; `Null` maps to no column type and is rejected.
    pub fn set_value(&mut self, col: usize, value: &PropValue) -> Result<()> {
        match value {
            PropValue::Bool(v) => self.set_bool(col, *v),
            PropValue::Byte(v) => self.set_byte(col, *v),
            PropValue::UByte(v) => self.set_ubyte(col, *v),
            PropValue::Short(v) => self.set_short(col, *v),
            PropValue::UShort(v) => self.set_ushort(col, *v),
            PropValue::Int(v) => self.set_int(col, *v),
            PropValue::UInt(v) => self.set_uint(col, *v),
            PropValue::Long(v) => self.set_long(col, *v),
            PropValue::ULong(v) => self.set_ulong(col, *v),
            PropValue::Float(v) => self.set_float(col, *v),
            PropValue::Double(v) => self.set_double(col, *v),
            PropValue::String(v) => self.set_string(col, v),
            PropValue::Json(v) => self.set_json(col, v),
            PropValue::DateTime(v) => self.set_datetime(col, *v),
            PropValue::Binary(v) => self.set_binary(col, v),
            PropValue::Null => Err(Error::UnmappableValue),
        }
    }

    pub fn set_value_by_name(&mut self, name: &str, value: &PropValue) -> Result<()> {
        self.set_value(self.name_to_col(name)?, value)
    }

    /// Store one geozero column value, dispatching to the matching
    /// typed setter. DateTime text is stored raw.
    pub fn set_column_value(&mut self, col: usize, value: &ColumnValue) -> Result<()> {
        match value {
            ColumnValue::Bool(v) => self.set_bool(col, *v),
            ColumnValue::Byte(v) => self.set_byte(col, *v),
            ColumnValue::UByte(v) => self.set_ubyte(col, *v),
            ColumnValue::Short(v) => self.set_short(col, *v),
            ColumnValue::UShort(v) => self.set_ushort(col, *v),
            ColumnValue::Int(v) => self.set_int(col, *v),
            ColumnValue::UInt(v) => self.set_uint(col, *v),
            ColumnValue::Long(v) => self.set_long(col, *v),
            ColumnValue::ULong(v) => self.set_ulong(col, *v),
            ColumnValue::Float(v) => self.set_float(col, *v),
            ColumnValue::Double(v) => self.set_double(col, *v),
            ColumnValue::String(v) => self.set_string(col, v),
            ColumnValue::Json(v) => self.set_json(col, v),
            ColumnValue::DateTime(v) => self.set_datetime_string(col, v),
            ColumnValue::Binary(v) => self.set_binary(col, v),
        }
    }

    pub fn get_bool_by_name(&self, name: &str) -> Result<bool> {
        self.get_bool(self.name_to_col(name)?)
    }

    pub fn set_bool_by_name(&mut self, name: &str, value: bool) -> Result<()> {
        self.set_bool(self.name_to_col(name)?, value)
    }

    pub fn get_byte_by_name(&self, name: &str) -> Result<i8> {
        self.get_byte(self.name_to_col(name)?)
    }

    pub fn set_byte_by_name(&mut self, name: &str, value: i8) -> Result<()> {
        self.set_byte(self.name_to_col(name)?, value)
    }

    pub fn get_ubyte_by_name(&self, name: &str) -> Result<u8> {
        self.get_ubyte(self.name_to_col(name)?)
    }

    pub fn set_ubyte_by_name(&mut self, name: &str, value: u8) -> Result<()> {
        self.set_ubyte(self.name_to_col(name)?, value)
    }

    pub fn get_short_by_name(&self, name: &str) -> Result<i16> {
        self.get_short(self.name_to_col(name)?)
    }

    pub fn set_short_by_name(&mut self, name: &str, value: i16) -> Result<()> {
        self.set_short(self.name_to_col(name)?, value)
    }

    pub fn get_ushort_by_name(&self, name: &str) -> Result<u16> {
        self.get_ushort(self.name_to_col(name)?)
    }

    pub fn set_ushort_by_name(&mut self, name: &str, value: u16) -> Result<()> {
        self.set_ushort(self.name_to_col(name)?, value)
    }

    pub fn get_int_by_name(&self, name: &str) -> Result<i32> {
        self.get_int(self.name_to_col(name)?)
    }

    pub fn set_int_by_name(&mut self, name: &str, value: i32) -> Result<()> {
        self.set_int(self.name_to_col(name)?, value)
    }

    pub fn get_uint_by_name(&self, name: &str) -> Result<u32> {
        self.get_uint(self.name_to_col(name)?)
    }

    pub fn set_uint_by_name(&mut self, name: &str, value: u32) -> Result<()> {
        self.set_uint(self.name_to_col(name)?, value)
    }

    pub fn get_long_by_name(&self, name: &str) -> Result<i64> {
        self.get_long(self.name_to_col(name)?)
    }

    pub fn set_long_by_name(&mut self, name: &str, value: i64) -> Result<()> {
        self.set_long(self.name_to_col(name)?, value)
    }

    pub fn get_ulong_by_name(&self, name: &str) -> Result<u64> {
        self.get_ulong(self.name_to_col(name)?)
    }

    pub fn set_ulong_by_name(&mut self, name: &str, value: u64) -> Result<()> {
        self.set_ulong(self.name_to_col(name)?, value)
    }

    pub fn get_float_by_name(&self, name: &str) -> Result<f32> {
        self.get_float(self.name_to_col(name)?)
    }

    pub fn set_float_by_name(&mut self, name: &str, value: f32) -> Result<()> {
        self.set_float(self.name_to_col(name)?, value)
    }

    pub fn get_double_by_name(&self, name: &str) -> Result<f64> {
        self.get_double(self.name_to_col(name)?)
    }

    pub fn set_double_by_name(&mut self, name: &str, value: f64) -> Result<()> {
        self.set_double(self.name_to_col(name)?, value)
    }

    pub fn get_string_by_name(&self, name: &str) -> Result<String> {
        self.get_string(self.name_to_col(name)?)
    }

    pub fn set_string_by_name(&mut self, name: &str, value: &str) -> Result<()> {
        self.set_string(self.name_to_col(name)?, value)
    }

    pub fn get_json_by_name(&self, name: &str) -> Result<String> {
        self.get_json(self.name_to_col(name)?)
    }

    pub fn set_json_by_name(&mut self, name: &str, value: &str) -> Result<()> {
        self.set_json(self.name_to_col(name)?, value)
    }

    pub fn get_binary_by_name(&self, name: &str) -> Result<Vec<u8>> {
        self.get_binary(self.name_to_col(name)?)
    }

    pub fn set_binary_by_name(&mut self, name: &str, value: &[u8]) -> Result<()> {
        self.set_binary(self.name_to_col(name)?, value)
    }

    pub fn get_datetime_by_name(&self, name: &str) -> Result<DateTime<FixedOffset>> {
        self.get_datetime(self.name_to_col(name)?)
    }

    pub fn set_datetime_by_name(&mut self, name: &str, value: DateTime<FixedOffset>) -> Result<()> {
        self.set_datetime(self.name_to_col(name)?, value)
    }

    pub fn get_datetime_string_by_name(&self, name: &str) -> Result<String> {
        self.get_datetime_string(self.name_to_col(name)?)
    }

    pub fn set_datetime_string_by_name(&mut self, name: &str, value: &str) -> Result<()> {
        self.set_datetime_string(self.name_to_col(name)?, value)
    }
}

/// `Props{name1:v1,name2:v2}` in column order, skipping columns without
/// a value.
impl fmt::Display for Props<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Props{")?;
        let mut printed = false;
        for col in 0..self.column_count() {
            let Ok(value) = self.get_value(col) else {
                continue;
            };
            let name = self.view().column_name(col).ok().flatten().unwrap_or_default();
            if printed {
                f.write_str(",")?;
            }
            write!(f, "{name}:{value}")?;
            printed = true;
        }
        f.write_str("}")
    }
}

fn property_error(error: Error) -> GeozeroError {
    GeozeroError::Property(error.to_string())
}

impl geozero::FeatureProperties for Props<'_> {
    /// Stream present values in column order to `processor`, borrowing
    /// text and binary payloads from the underlying buffer.
    fn process_properties<P: PropertyProcessor>(
        &self,
        processor: &mut P,
    ) -> geozero::error::Result<bool> {
        let mut finish = false;
        for col in 0..self.column_count() {
            if !self.has(col) {
                continue;
            }
            let column_type = self.view().column_type(col).map_err(property_error)?;
            let name = self
                .view()
                .column_name(col)
                .map_err(property_error)?
                .unwrap_or_default();
            finish = match column_type {
                ColumnType::Bool => processor.property(
                    col,
                    &name,
                    &ColumnValue::Bool(self.get_bool(col).map_err(property_error)?),
                )?,
                ColumnType::Byte => processor.property(
                    col,
                    &name,
                    &ColumnValue::Byte(self.get_byte(col).map_err(property_error)?),
                )?,
                ColumnType::UByte => processor.property(
                    col,
                    &name,
                    &ColumnValue::UByte(self.get_ubyte(col).map_err(property_error)?),
                )?,
                ColumnType::Short => processor.property(
                    col,
                    &name,
                    &ColumnValue::Short(self.get_short(col).map_err(property_error)?),
                )?,
                ColumnType::UShort => processor.property(
                    col,
                    &name,
                    &ColumnValue::UShort(self.get_ushort(col).map_err(property_error)?),
                )?,
                ColumnType::Int => processor.property(
                    col,
                    &name,
                    &ColumnValue::Int(self.get_int(col).map_err(property_error)?),
                )?,
                ColumnType::UInt => processor.property(
                    col,
                    &name,
                    &ColumnValue::UInt(self.get_uint(col).map_err(property_error)?),
                )?,
                ColumnType::Long => processor.property(
                    col,
                    &name,
                    &ColumnValue::Long(self.get_long(col).map_err(property_error)?),
                )?,
                ColumnType::ULong => processor.property(
                    col,
                    &name,
                    &ColumnValue::ULong(self.get_ulong(col).map_err(property_error)?),
                )?,
                ColumnType::Float => processor.property(
                    col,
                    &name,
                    &ColumnValue::Float(self.get_float(col).map_err(property_error)?),
                )?,
                ColumnType::Double => processor.property(
                    col,
                    &name,
                    &ColumnValue::Double(self.get_double(col).map_err(property_error)?),
                )?,
                ColumnType::String => processor.property(
                    col,
                    &name,
                    &ColumnValue::String(
                        self.var_str(col, ColumnType::String)
                            .map_err(property_error)?,
                    ),
                )?,
                ColumnType::Json => processor.property(
                    col,
                    &name,
                    &ColumnValue::Json(
                        self.var_str(col, ColumnType::Json).map_err(property_error)?,
                    ),
                )?,
                ColumnType::DateTime => processor.property(
                    col,
                    &name,
                    &ColumnValue::DateTime(
                        self.var_str(col, ColumnType::DateTime)
                            .map_err(property_error)?,
                    ),
                )?,
                ColumnType::Binary => processor.property(
                    col,
                    &name,
                    &ColumnValue::Binary(
                        self.var_slice(col, ColumnType::Binary)
                            .map_err(property_error)?,
                    ),
                )?,
                other => {
                    return Err(property_error(Error::UnknownColumnType(other)));
                }
            };
            if finish {
                break;
            }
        }
        Ok(finish)
    }
}

impl PropertyProcessor for Props<'_> {
    /// Accept one property from a geozero source, making `Props` a
    /// sink for any property stream.
    fn property(
        &mut self,
        i: usize,
        _colname: &str,
        colval: &ColumnValue,
    ) -> geozero::error::Result<bool> {
        self.set_column_value(i, colval).map_err(property_error)?;
        Ok(false)
    }
}
