use crate::error::Result;
use crate::interop::flatbuffer_safe;
use flatbuffers::{FlatBufferBuilder, WIPOffset};
use flatgeobuf::{Crs as FlatCrs, CrsArgs};

/// A coordinate reference system record, decoupled from its FlatBuffer
/// representation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Crs {
    pub org: Option<String>,
    pub code: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub wkt: Option<String>,
    pub code_string: Option<String>,
}

impl Crs {
    pub fn from_flat(crs: FlatCrs) -> Result<Crs> {
        flatbuffer_safe(|| Crs::copy_flat(crs))
    }

    pub(crate) fn copy_flat(crs: FlatCrs) -> Crs {
        Crs {
            org: crs.org().map(str::to_string),
            code: crs.code(),
            name: crs.name().map(str::to_string),
            description: crs.description().map(str::to_string),
            wkt: crs.wkt().map(str::to_string),
            code_string: crs.code_string().map(str::to_string),
        }
    }

    pub fn to_builder<'a>(&self, fbb: &mut FlatBufferBuilder<'a>) -> WIPOffset<FlatCrs<'a>> {
        let org = self.org.as_deref().map(|s| fbb.create_string(s));
        let name = self.name.as_deref().map(|s| fbb.create_string(s));
        let description = self.description.as_deref().map(|s| fbb.create_string(s));
        let wkt = self.wkt.as_deref().map(|s| fbb.create_string(s));
        let code_string = self.code_string.as_deref().map(|s| fbb.create_string(s));
        FlatCrs::create(
            fbb,
            &CrsArgs {
                org,
                code: self.code,
                name,
                description,
                wkt,
                code_string,
            },
        )
    }
}
