//! Conversion and mutable property access layer for
//! [FlatGeobuf](https://flatgeobuf.org/), sitting above the format's
//! FlatBuffer records.
//!
//! The core is the property codec: [`Props`] parses a feature's packed
//! property payload lazily against a schema and offers typed, named and
//! dynamic access, with copy-on-write semantics over borrowed payloads
//! and byte-exact wire output. Around it sit plain-data translators for
//! the definitional records ([`Column`], [`Header`], [`Crs`]) and a
//! guarded capability view over FlatBuffer-backed schemas
//! ([`HeaderSchema`]).
//!
//! ## Building a property set
//!
//! ```rust
//! use flatgeobuf_convert::{Column, ColumnType, Props, Schema};
//!
//! # fn main() -> flatgeobuf_convert::Result<()> {
//! let schema = Schema::new(vec![
//!     Column::new("name", ColumnType::String),
//!     Column::new("population", ColumnType::Long),
//! ]);
//! let mut props = Props::new(&schema);
//! props.set_string(0, "Oslo")?;
//! props.set_long_by_name("population", 709_037)?;
//! assert_eq!(props.get_string_by_name("name")?, "Oslo");
//! assert_eq!(props.to_string(), "Props{name:Oslo,population:709037}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Reading a payload in place
//!
//! ```rust
//! use flatgeobuf_convert::{Column, ColumnType, Props, Schema};
//!
//! # fn main() -> flatgeobuf_convert::Result<()> {
//! let schema = Schema::new(vec![Column::new("age", ColumnType::Int)]);
//! let mut props = Props::new(&schema);
//! props.set_int(0, 36)?;
//! let payload = props.bytes().to_vec();
//!
//! // A borrowed payload is only copied if it gets written to.
//! let view = Props::from_payload(&schema, payload.as_slice());
//! assert_eq!(view.get_int(0)?, 36);
//! # Ok(())
//! # }
//! ```

mod column;
mod crs;
mod error;
mod header;
mod interop;
mod props;
mod schema;
mod value;

pub use column::Column;
pub use crs::Crs;
pub use error::{Error, Result};
pub use header::Header;
pub use interop::{flatbuffer_safe, HeaderSchema};
pub use props::Props;
pub use schema::{ColumnInfo, Schema, SchemaView};
pub use value::PropValue;

// Re-export the wire-level types the API surfaces.
pub use flatgeobuf::{ColumnType, GeometryType};
pub use geozero::{ColumnValue, FeatureProperties, PropertyProcessor};
