use super::errors::{ErrorKind, Result};
use super::reader::Reader;
use super::types::Atmosphere;
use log::{debug, info, warn};
use math::prelude::*;
use math::{Pnt2d, Pnt3d, Vec3d};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// Each wall carries this many bytes per trailing unknown entry.
const WALL_EXTRA_ENTRY_SIZE: u64 = 28;
const SECTOR_EXTRA_ENTRY_SIZE: u64 = 43;
const SECTOR_TRAILER_SIZE: u64 = 138;

#[derive(Clone, Debug, PartialEq)]
pub struct TextureEntry {
    pub name: String,
    pub path: String,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MapLimits {
    pub left: f64,
    pub right: f64,
    pub upper: f64,
    pub lower: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SurfaceShape {
    Elliptic,
    Spherical,
    Flat,
    Other(u8),
}

impl From<u8> for SurfaceShape {
    fn from(value: u8) -> Self {
        match value {
            0 => SurfaceShape::Elliptic,
            1 => SurfaceShape::Spherical,
            2 => SurfaceShape::Flat,
            other => SurfaceShape::Other(other),
        }
    }
}

/// Floor or ceiling of an editor sector.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    pub base_height: f64,
    pub texture: String,
    pub scale: f32,
    pub rotation: f32,
    pub offset: [f32; 2],
    pub height: f64,
    pub shape: SurfaceShape,
    pub spherical_radius: f64,
    pub num_segments: i32,
    pub ellipse: [f64; 2],
}

#[derive(Clone, Debug, PartialEq)]
pub struct Illumination {
    pub environment: [u8; 3],
    pub internal: [u8; 3],
    pub external: [u8; 3],
    pub final_environment: [u8; 3],
    pub final_internal: [u8; 3],
    pub internal_position: Vec3d,
    pub external_position: Vec3d,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    pub color: [u8; 4],
    pub include_floor: bool,
    pub include_ceiling: bool,
    pub texture: String,
    pub scale: f32,
    pub rotation: f32,
    pub offset: [f32; 2],
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapSector {
    pub name: String,
    pub floor: Surface,
    pub ceiling: Surface,
    pub illumination: Illumination,
    pub atmosphere: String,
    pub attribute: String,
    pub vertices: Vec<Pnt2d>,
    pub walls: Vec<Wall>,
}

/// Editor-side level description (`.mp`): a 2D sector plan with extruded floors and ceilings.
#[derive(Clone, Debug, PartialEq)]
pub struct Map {
    pub header: String,
    pub textures: Vec<TextureEntry>,
    pub atmospheres: Vec<Atmosphere>,
    pub initial_position: Pnt3d,
    pub initial_orientation: Vec3d,
    pub grid_step: [f64; 2],
    pub limits: MapLimits,
    pub sectors: Vec<MapSector>,
}

impl Map {
    pub fn from_file<P: AsRef<Path>>(path: &P) -> Result<Map> {
        let path = path.as_ref();
        let file = File::open(path).map_err(ErrorKind::on_file_open(path))?;
        let map = Map::decode(&mut Reader::new(BufReader::new(file), false))?;
        info!(
            "Loaded map {:?}: {} textures, {} atmospheres, {} sectors.",
            path,
            map.textures.len(),
            map.atmospheres.len(),
            map.sectors.len()
        );
        Ok(map)
    }

    pub fn decode<R: Read + Seek>(reader: &mut Reader<R>) -> Result<Map> {
        let header = reader.read_string()?;
        let _ = reader.read_u8()?;
        reader.expect_bytes(0, 9, "map header padding")?;
        let _ = reader.read_i32()?;

        let num_textures = read_short_count(reader, "map texture")?;
        let mut textures = Vec::with_capacity(num_textures);
        for _ in 0..num_textures {
            let name = reader.read_string()?;
            let path = reader.read_string()?;
            let _ = reader.read_u8()?;
            reader.expect_bytes(0, 31, "map texture padding")?;
            textures.push(TextureEntry { name, path });
        }

        let num_atmospheres = read_short_count(reader, "map atmosphere")?;
        let mut atmospheres = Vec::with_capacity(num_atmospheres);
        for _ in 0..num_atmospheres {
            atmospheres.push(Atmosphere {
                name: reader.read_string()?,
                color: reader.read_rgb()?,
                intensity: reader.read_f32()?,
            });
        }

        let initial_position = Pnt3d::from_vec(reader.read_vector3()?);
        let initial_orientation = reader.read_vector3()?;
        let grid_step = [reader.read_f64()?, reader.read_f64()?];
        let limits = MapLimits {
            left: reader.read_f64()?,
            right: reader.read_f64()?,
            upper: reader.read_f64()?,
            lower: reader.read_f64()?,
        };

        let num_sectors = read_short_count(reader, "map sector")?;
        let unknown = reader.read_i16()?;
        if unknown != 1 {
            debug!("Map sector table marker is {}, expected 1.", unknown);
        }
        let mut sectors = Vec::with_capacity(num_sectors);
        for _ in 0..num_sectors {
            sectors.push(read_sector(reader)?);
        }

        Ok(Map {
            header,
            textures,
            atmospheres,
            initial_position,
            initial_orientation,
            grid_step,
            limits,
            sectors,
        })
    }

    pub fn texture(&self, name: &str) -> Option<&TextureEntry> {
        self.textures
            .iter()
            .find(|texture| texture.name.eq_ignore_ascii_case(name))
    }
}

fn read_short_count<R: Read + Seek>(reader: &mut Reader<R>, what: &'static str) -> Result<usize> {
    let count = reader.read_i16()?;
    if count < 0 {
        return Err(ErrorKind::CorruptCount {
            what,
            count: i64::from(count),
        }
        .into());
    }
    Ok(count as usize)
}

fn read_sector<R: Read + Seek>(reader: &mut Reader<R>) -> Result<MapSector> {
    let name = reader.read_string()?;
    let floor = read_surface(reader)?;
    let ceiling = read_surface(reader)?;

    let illumination = Illumination {
        environment: reader.read_rgb()?,
        internal: reader.read_rgb()?,
        external: reader.read_rgb()?,
        final_environment: reader.read_rgb()?,
        final_internal: reader.read_rgb()?,
        internal_position: reader.read_vector3()?,
        external_position: reader.read_vector3()?,
    };

    let atmosphere = reader.read_string()?;
    let num_attributes = reader.read_i32()?;
    if num_attributes != 2 {
        debug!("Sector {:?} attribute marker is {}.", name, num_attributes);
    }
    let attribute = reader.read_string()?;

    let num_vertices = read_short_count(reader, "map sector vertex")?;
    let mut vertices = Vec::with_capacity(num_vertices);
    for _ in 0..num_vertices {
        vertices.push(Pnt2d::new(reader.read_f64()?, reader.read_f64()?));
    }

    let num_walls = read_short_count(reader, "map wall")?;
    let mut walls = Vec::with_capacity(num_walls);
    for _ in 0..num_walls {
        let mut color = [0u8; 4];
        color.copy_from_slice(&reader.read_bytes(4)?);
        walls.push(Wall {
            color,
            include_floor: reader.read_i32()? != 0,
            include_ceiling: reader.read_i32()? != 0,
            texture: reader.read_string()?,
            scale: reader.read_f32()?,
            rotation: reader.read_f32()?,
            offset: [reader.read_f32()?, reader.read_f32()?],
        });
        let num_extra = read_short_count(reader, "map wall entry")?;
        reader.discard(num_extra as u64 * WALL_EXTRA_ENTRY_SIZE)?;
    }

    let num_extra = read_short_count(reader, "map sector entry")?;
    reader.discard(num_extra as u64 * SECTOR_EXTRA_ENTRY_SIZE)?;
    reader.discard(SECTOR_TRAILER_SIZE)?;

    Ok(MapSector {
        name,
        floor,
        ceiling,
        illumination,
        atmosphere,
        attribute,
        vertices,
        walls,
    })
}

fn read_surface<R: Read + Seek>(reader: &mut Reader<R>) -> Result<Surface> {
    // 14 zero bytes, a two byte marker (0xF0 0xBF before floors, 0xF0 0x3F before ceilings) and
    // 8 more zero bytes.
    reader.expect_bytes(0, 14, "surface prefix")?;
    let _ = reader.read_bytes(2)?;
    reader.expect_bytes(0, 8, "surface prefix")?;

    let base_height = reader.read_f64()?;
    let texture = reader.read_string()?;
    let scale = reader.read_f32()?;
    let rotation = reader.read_f32()?;
    let offset = [reader.read_f32()?, reader.read_f32()?];
    let height = reader.read_f64()?;
    let shape = SurfaceShape::from(reader.read_u8()?);
    let _ = reader.read_u8()?;
    reader.expect_bytes(0, 3, "surface shape padding")?;
    if let SurfaceShape::Other(value) = shape {
        warn!("Unknown surface shape {} for texture {:?}.", value, texture);
    }

    Ok(Surface {
        base_height,
        texture,
        scale,
        rotation,
        offset,
        height,
        shape,
        spherical_radius: reader.read_f64()?,
        num_segments: reader.read_i32()?,
        ellipse: [reader.read_f64()?, reader.read_f64()?],
    })
}
