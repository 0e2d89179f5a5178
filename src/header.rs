use crate::column::Column;
use crate::crs::Crs;
use crate::error::Result;
use crate::interop::flatbuffer_safe;
use crate::schema::Schema;
use flatbuffers::{FlatBufferBuilder, WIPOffset};
use flatgeobuf::{GeometryType, Header as FlatHeader, HeaderArgs};

/// A dataset header record, decoupled from its FlatBuffer
/// representation.
///
/// `schema` is `None` when the header carries no columns vector, which
/// is distinct from an empty one. `index_node_size` of `None` encodes
/// as the FlatGeobuf default of 16.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    pub name: Option<String>,
    pub envelope: Vec<f64>,
    pub geometry_type: GeometryType,
    pub has_z: bool,
    pub has_m: bool,
    pub has_t: bool,
    pub has_tm: bool,
    pub schema: Option<Schema>,
    pub features_count: u64,
    pub index_node_size: Option<u16>,
    pub crs: Option<Crs>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<String>,
}

impl Default for Header {
    fn default() -> Self {
        Header {
            name: None,
            envelope: Vec::new(),
            geometry_type: GeometryType::Unknown,
            has_z: false,
            has_m: false,
            has_t: false,
            has_tm: false,
            schema: None,
            features_count: 0,
            index_node_size: None,
            crs: None,
            title: None,
            description: None,
            metadata: None,
        }
    }
}

impl Header {
    pub fn from_flat(header: FlatHeader) -> Result<Header> {
        flatbuffer_safe(|| Header {
            name: header.name().map(str::to_string),
            envelope: header
                .envelope()
                .map_or_else(Vec::new, |envelope| envelope.iter().collect()),
            geometry_type: header.geometry_type(),
            has_z: header.has_z(),
            has_m: header.has_m(),
            has_t: header.has_t(),
            has_tm: header.has_tm(),
            schema: header
                .columns()
                .map(|columns| Schema::new(columns.iter().map(Column::copy_flat).collect())),
            features_count: header.features_count(),
            index_node_size: Some(header.index_node_size()),
            crs: header.crs().map(Crs::copy_flat),
            title: header.title().map(str::to_string),
            description: header.description().map(str::to_string),
            metadata: header.metadata().map(str::to_string),
        })
    }

    pub fn to_builder<'a>(&self, fbb: &mut FlatBufferBuilder<'a>) -> WIPOffset<FlatHeader<'a>> {
        let name = self.name.as_deref().map(|s| fbb.create_string(s));
        let envelope = (!self.envelope.is_empty()).then(|| fbb.create_vector(&self.envelope));
        let columns = self.schema.as_ref().map(|schema| schema.to_builder(fbb));
        let crs = self.crs.as_ref().map(|crs| crs.to_builder(fbb));
        let title = self.title.as_deref().map(|s| fbb.create_string(s));
        let description = self.description.as_deref().map(|s| fbb.create_string(s));
        let metadata = self.metadata.as_deref().map(|s| fbb.create_string(s));
        FlatHeader::create(
            fbb,
            &HeaderArgs {
                name,
                envelope,
                geometry_type: self.geometry_type,
                has_z: self.has_z,
                has_m: self.has_m,
                has_t: self.has_t,
                has_tm: self.has_tm,
                columns,
                features_count: self.features_count,
                index_node_size: self.index_node_size.unwrap_or(16),
                crs,
                title,
                description,
                metadata,
            },
        )
    }
}
