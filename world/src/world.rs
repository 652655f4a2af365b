use super::config::WorldConfig;
use super::decode::Decoder;
use super::errors::{ErrorKind, Result};
use super::face::{BspNode, Face, Portal, Sector};
use super::mesh::{MeshOffset, MeshVertex, TangentSpace, TriangleTangents};
use super::post;
use super::reader::Reader;
use super::types::{Atmosphere, FaceId};
use log::{error, info, warn};
use math::{Aabb3, Pnt3d};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use time;

/// A decoded level: the object graph read from a `.bw` file plus the flattened mesh built from
/// it. Faces, portals and BSP nodes live in flat lists and refer to each other by index.
#[derive(Debug, Default)]
pub struct World {
    pub atmospheres: Vec<Atmosphere>,
    pub vertices: Vec<Pnt3d>,
    pub sectors: Vec<Sector>,
    pub faces: Vec<Face>,
    pub portals: Vec<Portal>,
    pub nodes: Vec<BspNode>,

    pub mesh_vertices: Vec<MeshVertex>,
    pub mesh_indices: Vec<u32>,
    pub mesh_offsets: Vec<MeshOffset>,
    /// The face each of `mesh_offsets` was built from.
    pub mesh_faces: Vec<FaceId>,
    /// Index range covering every shadow casting face. Casters are emitted last, so the range is
    /// contiguous.
    pub shadow_caster_offset: MeshOffset,
    pub bounds: Aabb3<f32>,
    pub has_sky: bool,

    /// Set when decoding stopped early at a corrupt sector. The sectors before it are kept.
    pub truncated_by: Option<ErrorKind>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: &P, config: &WorldConfig) -> Result<World> {
        Self::load_with(path, config, &TriangleTangents)
    }

    pub fn load_with<P: AsRef<Path>>(
        path: &P,
        config: &WorldConfig,
        tangents: &dyn TangentSpace,
    ) -> Result<World> {
        let path = path.as_ref();
        info!("Loading world from {:?}...", path);
        let start_time = time::precise_time_s();
        let file = File::open(path).map_err(ErrorKind::on_file_open(path))?;
        let world = Self::decode(BufReader::new(file), config, tangents).map_err(|error| {
            error!("Failed to load world {:?}: {}", path, error);
            error
        })?;
        info!(
            "Done loading world in {:.4}s.",
            time::precise_time_s() - start_time
        );
        world.log_summary();
        Ok(world)
    }

    /// Decodes and post-processes a world from any seekable stream.
    pub fn decode<R: Read + Seek>(
        reader: R,
        config: &WorldConfig,
        tangents: &dyn TangentSpace,
    ) -> Result<World> {
        let reader = Reader::new(reader, config.decoder.dump_log);
        let mut world = Decoder::new(reader, &config.decoder).decode()?;
        if let Some(ref kind) = world.truncated_by {
            warn!(
                "World truncated to {} sectors: {}",
                world.sectors.len(),
                kind
            );
        }
        post::post_process(&mut world, &config.geometry, tangents);
        Ok(world)
    }

    /// Replaces this world with the one in `path`. On failure the world is left empty.
    pub fn reload<P: AsRef<Path>>(&mut self, path: &P, config: &WorldConfig) -> Result<()> {
        self.free();
        *self = Self::load(path, config)?;
        Ok(())
    }

    /// Drops everything, leaving an empty world.
    pub fn free(&mut self) {
        self.atmospheres.clear();
        self.vertices.clear();
        self.sectors.clear();
        self.faces.clear();
        self.portals.clear();
        self.nodes.clear();
        self.mesh_vertices.clear();
        self.mesh_indices.clear();
        self.mesh_offsets.clear();
        self.mesh_faces.clear();
        self.shadow_caster_offset = MeshOffset::default();
        self.bounds = Aabb3::empty();
        self.has_sky = false;
        self.truncated_by = None;
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty() && self.faces.is_empty() && self.vertices.is_empty()
    }

    pub fn num_shadow_casters(&self) -> usize {
        self.mesh_faces
            .iter()
            .filter(|&&face| self.faces[face].cast_shadows)
            .count()
    }

    pub fn log_summary(&self) {
        info!("World summary:");
        info!("    {:6} atmospheres", self.atmospheres.len());
        info!("    {:6} vertices", self.vertices.len());
        info!("    {:6} sectors", self.sectors.len());
        info!("    {:6} faces", self.faces.len());
        info!("    {:6} portals", self.portals.len());
        info!("    {:6} bsp nodes", self.nodes.len());
        info!("    {:6} mesh vertices", self.mesh_vertices.len());
        info!("    {:6} mesh triangles", self.mesh_indices.len() / 3);
        info!("    {:6} draw ranges", self.mesh_offsets.len());
        info!("    {:6} shadow casters", self.num_shadow_casters());
    }
}
