mod areas;
mod bsp;
mod cam;
mod clip;
mod config;
mod csv;
mod decode;
mod errors;
mod face;
mod level;
mod map;
mod mesh;
mod post;
mod reader;
mod sf;
mod triangulate;
mod tunes;
mod world;

pub mod types;
pub mod util;

pub use self::areas::{Area, AreaPortal, Areas};
pub use self::cam::{CameraFrame, CameraRecord};
pub use self::clip::{area, signed_area, ClipOp, ClipPolygon, Clipper};
pub use self::config::{DecoderConfig, GeometryConfig, WorldConfig};
pub use self::csv::{ObjectEntry, ObjectTable};
pub use self::errors::{Error, ErrorKind, Result};
pub use self::face::{
    BspNode, Face, FaceKind, FaceMesh, LeafIndices, Portal, Sector, SectorHeader,
};
pub use self::level::Level;
pub use self::map::{
    Illumination, Map, MapLimits, MapSector, Surface, SurfaceShape, TextureEntry, Wall,
};
pub use self::mesh::{MeshOffset, MeshVertex, TangentSpace, TriangleTangents};
pub use self::reader::Reader;
pub use self::sf::{GhostSector, GhostSectors};
pub use self::triangulate::{triangulate, Triangulation};
pub use self::tunes::Tunables;
pub use self::types::{Atmosphere, TextureProjection};
pub use self::world::World;
