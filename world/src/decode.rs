use super::bsp::{self, HoleMesher};
use super::clip::{ClipOp, ClipPolygon, Clipper};
use super::config::DecoderConfig;
use super::errors::{ErrorKind, Result};
use super::face::{BspNode, Face, FaceKind, LeafIndices, Portal, Sector, SectorHeader};
use super::reader::Reader;
use super::types::{
    Atmosphere, FaceId, NodeId, PortalId, SectorId, TextureProjection, VertexIndex, FACE_BSP,
    FACE_PORTAL, FACE_SIMPLE, FACE_SKYDOME, FACE_WITH_HOLE, NODE_LEAF, NODE_SPLIT, NODE_TEX_INFO,
    TEXTURE_SIGNATURE,
};
use super::util::to_render_direction;
use super::world::World;
use log::{debug, info, warn};
use math::prelude::*;
use math::{PlaneD, Pnt3d, PolygonD};
use std::io::{Read, Seek};

const MAX_BSP_DEPTH: usize = 512;
const MAX_LEAF_INDICES: u32 = 1 << 16;

/// Reads a `.bw` world file into a `World`, resolving holed and BSP faces into triangle meshes
/// as it goes. Mesh assembly is left to post-processing.
pub(crate) struct Decoder<'a, R> {
    reader: Reader<R>,
    config: &'a DecoderConfig,
    world: World,
    num_sectors: usize,
}

impl<'a, R: Read + Seek> Decoder<'a, R> {
    pub fn new(reader: Reader<R>, config: &'a DecoderConfig) -> Self {
        Decoder {
            reader,
            config,
            world: World::new(),
            num_sectors: 0,
        }
    }

    pub fn decode(mut self) -> Result<World> {
        self.read_atmospheres()?;
        self.read_vertices()?;
        self.num_sectors = self.reader.read_count("sector")?;
        info!(
            "Decoding {} atmospheres, {} vertices, {} sectors.",
            self.world.atmospheres.len(),
            self.world.vertices.len(),
            self.num_sectors
        );

        for i_sector in 0..self.num_sectors {
            self.read_sector(i_sector)?;
            if self.world.truncated_by.is_some() {
                break;
            }
        }
        Ok(self.world)
    }

    fn read_atmospheres(&mut self) -> Result<()> {
        let count = self.reader.read_count("atmosphere")?;
        self.world.atmospheres.reserve(count.min(1024));
        for _ in 0..count {
            let name = self.reader.read_string()?;
            let color = self.reader.read_rgb()?;
            let intensity = self.reader.read_f32()?;
            self.world.atmospheres.push(Atmosphere {
                name,
                color,
                intensity,
            });
        }
        Ok(())
    }

    fn read_vertices(&mut self) -> Result<()> {
        let count = self.reader.read_count("vertex")?;
        self.world.vertices.reserve(count.min(1 << 20));
        for _ in 0..count {
            let position = self.reader.read_vector3()?;
            self.world.vertices.push(Pnt3d::from_vec(position));
        }
        Ok(())
    }

    /// Reads one sector with its faces. A face count outside the configured bounds drops the
    /// sector and records the problem in `truncated_by`; decoding stops there.
    fn read_sector(&mut self, i_sector: usize) -> Result<()> {
        let offset = self.reader.tell()?;
        let name = self.reader.read_string()?;
        debug!("Sector {} `{}` at {:#x}.", i_sector, name, offset);
        let mut sector = Sector::new(name);
        sector.ambient_color = self.reader.read_rgb()?;
        sector.ambient_intensity = self.reader.read_f32()?;

        let dump = self.reader.set_dump(false);
        let mut header = SectorHeader::default();
        header.unknown_scalar = self.reader.read_f32()?;
        self.read_sentinels()?;
        header.unknown_color = self.reader.read_rgb()?;
        header.unknown_pair = [self.reader.read_f32()?, self.reader.read_f32()?];
        self.read_sentinels()?;
        let light_direction = to_render_direction(self.reader.read_vector3()?);
        self.reader.set_dump(dump);
        sector.header = header;
        sector.light_direction = if light_direction.magnitude2() > 0.0 {
            Some(light_direction.normalize())
        } else {
            None
        };

        let num_faces = self.reader.read_i32()?;
        if num_faces < self.config.min_face_count || num_faces > self.config.max_face_count {
            let kind = ErrorKind::CorruptFaceCount {
                sector: i_sector,
                count: num_faces,
                min: self.config.min_face_count,
                max: self.config.max_face_count,
            };
            warn!("Stopping at sector {}: {}", i_sector, kind);
            self.world.truncated_by = Some(kind);
            return Ok(());
        }

        self.world.sectors.push(sector);
        for _ in 0..num_faces {
            let face = self.read_face(i_sector)?;
            self.world.sectors[i_sector].faces.push(face);
        }
        Ok(())
    }

    /// 24 zero bytes, 8 bytes of 0xCD, 4 zero bytes.
    fn read_sentinels(&mut self) -> Result<()> {
        self.reader.expect_bytes(0, 24, "sector header zeros")?;
        self.reader.expect_bytes(0xcd, 8, "sector header fill")?;
        self.reader.expect_bytes(0, 4, "sector header zeros")?;
        Ok(())
    }

    fn read_face(&mut self, sector: SectorId) -> Result<FaceId> {
        let offset = self.reader.tell()?;
        let tag = self.reader.read_u32()?;
        let id = self.world.faces.len();
        let plane = self.reader.read_plane()?;

        let (kind, sub_faces) = match tag {
            FACE_SIMPLE => (self.read_simple_face()?, Vec::new()),
            FACE_PORTAL => (self.read_portal_face(id, sector)?, Vec::new()),
            FACE_WITH_HOLE => (self.read_face_with_hole(id, sector, &plane)?, Vec::new()),
            FACE_BSP => self.read_bsp_face(id, sector, &plane)?,
            FACE_SKYDOME => (
                FaceKind::Skydome {
                    winding: self.read_indices()?,
                },
                Vec::new(),
            ),
            _ => return Err(ErrorKind::UnknownFaceType { tag, offset }.into()),
        };

        let face = Face::new(sector, plane, kind);
        debug!("Face {} ({}) at {:#x}.", id, face.kind_name(), offset);
        self.world.faces.push(face);
        self.world.faces.extend(sub_faces);
        Ok(id)
    }

    fn read_simple_face(&mut self) -> Result<FaceKind> {
        let texture = self.read_texture(true)?;
        let winding = self.read_indices()?;
        Ok(FaceKind::Simple { texture, winding })
    }

    fn read_portal_face(&mut self, id: FaceId, sector: SectorId) -> Result<FaceKind> {
        let winding = self.read_indices()?;
        let to_sector = self.read_sector_index()?;
        let hole = self.dereference(&winding).reversed();
        let portal = self.add_portal(id, sector, to_sector, hole, Vec::new());

        let dump = self.reader.set_dump(false);
        let mut unknown = [0u8; 8];
        unknown.copy_from_slice(&self.reader.read_bytes(8)?);
        self.reader.set_dump(dump);

        let texture = self.read_texture(false)?;
        Ok(FaceKind::Portal {
            texture,
            winding,
            portal,
            unknown,
        })
    }

    fn read_face_with_hole(
        &mut self,
        id: FaceId,
        sector: SectorId,
        plane: &PlaneD,
    ) -> Result<FaceKind> {
        let texture = self.read_texture(true)?;
        let outer = self.read_hole_winding()?;
        let hole = self.read_hole_winding()?;

        let mut clipper = Clipper::new(plane.normal);
        clipper.add_contour_3d(&outer, true);
        clipper.add_contour_3d(&hole, false);
        let mesh = HoleMesher::new(clipper.frame(), &outer).mesh(&clipper)?;

        let to_sector = self.read_sector_index()?;
        let planes = self.read_portal_planes()?;
        let portal = self.add_portal(id, sector, to_sector, hole, planes);
        Ok(FaceKind::WithHole {
            texture,
            mesh,
            portal,
        })
    }

    fn read_bsp_face(
        &mut self,
        id: FaceId,
        sector: SectorId,
        plane: &PlaneD,
    ) -> Result<(FaceKind, Vec<Face>)> {
        let texture = self.read_texture(true)?;
        let winding = self.read_indices()?;
        let outer = self.dereference(&winding).reversed();

        let num_holes = self.reader.read_count("hole")?;
        let mut holes_union = Clipper::new(plane.normal);
        let mut portals = Vec::with_capacity(num_holes.min(64));
        for _ in 0..num_holes {
            let hole = self.read_hole_winding()?;
            holes_union.add_contour_3d(&hole, false);
            let to_sector = self.read_sector_index()?;
            let planes = self.read_portal_planes()?;
            portals.push(self.add_portal(id, sector, to_sector, hole, planes));
        }
        let holes: Vec<ClipPolygon> = if num_holes > 0 {
            holes_union.execute(ClipOp::Union)
        } else {
            Vec::new()
        };

        let root = self.read_node(0)?;

        let mesher = HoleMesher::new(holes_union.frame(), &outer);
        let mut leaves = Vec::new();
        bsp::resolve_leaves(
            &mut self.world.nodes,
            root,
            Some(outer),
            &holes,
            &mesher,
            &mut leaves,
        )?;

        let mut sub_faces = Vec::with_capacity(leaves.len());
        for leaf in leaves {
            let mesh = match self.world.nodes[leaf] {
                BspNode::Leaf {
                    mesh: Some(ref mesh),
                    ..
                } if !mesh.is_empty() => mesh.clone(),
                _ => {
                    warn!("Leaf {} of face {} has no vertices.", leaf, id);
                    continue;
                }
            };
            let mut leaf_texture = texture.clone();
            bsp::inherit_texture(&self.world.nodes, root, &mesh.vertices, &mut leaf_texture);
            sub_faces.push(Face::new(
                sector,
                *plane,
                FaceKind::SubFace {
                    texture: leaf_texture,
                    mesh,
                    parent: id,
                    leaf,
                },
            ));
        }
        debug!("Face {} resolved into {} sub-faces.", id, sub_faces.len());

        let kind = FaceKind::Bsp {
            texture,
            winding,
            root,
            portals,
            sub_faces: (id + 1..id + 1 + sub_faces.len()).collect(),
        };
        Ok((kind, sub_faces))
    }

    fn read_node(&mut self, depth: usize) -> Result<NodeId> {
        if depth > MAX_BSP_DEPTH {
            return Err(ErrorKind::CorruptCount {
                what: "BSP depth",
                count: depth as i64,
            }
            .into());
        }
        let offset = self.reader.tell()?;
        let tag = self.reader.read_u32()?;
        let node = match tag {
            NODE_LEAF => {
                let count = self.reader.read_count("leaf index list")?;
                let mut unknown = Vec::with_capacity(count.min(256));
                for _ in 0..count {
                    let unknown_index = self.reader.read_u32()?;
                    let num_indices = self.reader.read_u32()?;
                    if num_indices > MAX_LEAF_INDICES {
                        return Err(ErrorKind::CorruptCount {
                            what: "leaf index",
                            count: i64::from(num_indices),
                        }
                        .into());
                    }
                    let indices = (0..num_indices)
                        .map(|_| self.reader.read_u32())
                        .collect::<Result<Vec<_>>>()?;
                    unknown.push(LeafIndices {
                        unknown: unknown_index,
                        indices,
                    });
                }
                BspNode::Leaf {
                    unknown,
                    mesh: None,
                }
            }
            NODE_SPLIT | NODE_TEX_INFO => {
                let front = self.read_node(depth + 1)?;
                let back = self.read_node(depth + 1)?;
                let plane = self.reader.read_plane()?;
                let children = [front, back];
                if tag == NODE_TEX_INFO {
                    BspNode::TexInfo {
                        plane,
                        children,
                        texture: self.read_texture(true)?,
                    }
                } else {
                    BspNode::Split { plane, children }
                }
            }
            _ => return Err(ErrorKind::UnknownNodeType { tag, offset }.into()),
        };
        self.world.nodes.push(node);
        Ok(self.world.nodes.len() - 1)
    }

    /// Texture block. Offsets are stored negated. Portal faces lack the leading signature.
    fn read_texture(&mut self, signed: bool) -> Result<TextureProjection> {
        let signature = if signed {
            let offset = self.reader.tell()?;
            let signature = self.reader.read_u64()?;
            if signature != TEXTURE_SIGNATURE {
                warn!(
                    "Unexpected face signature {} at offset {:#x}.",
                    signature, offset
                );
            }
            Some(signature)
        } else {
            None
        };
        let name = self.reader.read_string()?;
        let axes = [self.reader.read_vector3()?, self.reader.read_vector3()?];
        let offsets = [-self.reader.read_f32()?, -self.reader.read_f32()?];

        let dump = self.reader.set_dump(false);
        self.reader.expect_bytes(0, 8, "texture padding")?;
        self.reader.set_dump(dump);

        Ok(TextureProjection {
            name,
            axes,
            offsets,
            signature,
        })
    }

    fn read_indices(&mut self) -> Result<Vec<VertexIndex>> {
        let count = self.reader.read_count("winding index")?;
        let mut indices = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let index = self.reader.read_u32()?;
            self.check_vertex_index(i64::from(index))?;
            indices.push(index);
        }
        Ok(indices)
    }

    /// Hole and outer contours of holed faces, stored in reverse.
    fn read_hole_winding(&mut self) -> Result<PolygonD> {
        let offset = self.reader.tell()?;
        let count = self.reader.read_count("hole winding")?;
        if count == 0 || count > self.config.max_winding_vertices {
            warn!(
                "Suspicious winding with {} vertices at offset {:#x}.",
                count, offset
            );
        }
        let mut points = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let index = self.reader.read_i32()?;
            let index = self.check_vertex_index(i64::from(index))?;
            points.push(self.world.vertices[index]);
        }
        Ok(PolygonD::from_points(points).reversed())
    }

    fn read_sector_index(&mut self) -> Result<SectorId> {
        let index = self.reader.read_i32()?;
        if index < 0 || index as usize >= self.num_sectors {
            return Err(ErrorKind::BadSectorIndex {
                index: i64::from(index),
                sectors: self.num_sectors,
            }
            .into());
        }
        Ok(index as usize)
    }

    fn read_portal_planes(&mut self) -> Result<Vec<PlaneD>> {
        let count = self.reader.read_count("portal plane")?;
        (0..count).map(|_| self.reader.read_plane()).collect()
    }

    fn check_vertex_index(&self, index: i64) -> Result<usize> {
        let pool = self.world.vertices.len();
        if index < 0 || index as usize >= pool {
            return Err(ErrorKind::BadVertexIndex { index, pool }.into());
        }
        Ok(index as usize)
    }

    fn dereference(&self, indices: &[VertexIndex]) -> PolygonD {
        PolygonD::from_points(
            indices
                .iter()
                .map(|&index| self.world.vertices[index as usize])
                .collect(),
        )
    }

    fn add_portal(
        &mut self,
        face: FaceId,
        sector: SectorId,
        to_sector: SectorId,
        winding: PolygonD,
        planes: Vec<PlaneD>,
    ) -> PortalId {
        let id = self.world.portals.len();
        self.world.portals.push(Portal {
            face,
            to_sector,
            winding,
            planes,
            marked: false,
        });
        self.world.sectors[sector].portals.push(id);
        id
    }
}
