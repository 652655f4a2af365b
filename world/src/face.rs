use super::types::{FaceId, NodeId, PortalId, SectorId, TextureProjection, VertexIndex};
use math::{Aabb3, PlaneD, Pnt3d, Pnt3f, PolygonD, Vec3d};

/// Triangulated geometry generated while decoding: file-space vertices and a triangle list
/// indexing into them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaceMesh {
    pub vertices: Vec<Pnt3d>,
    pub indices: Vec<u32>,
}

impl FaceMesh {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FaceKind {
    Simple {
        texture: TextureProjection,
        winding: Vec<VertexIndex>,
    },
    Portal {
        texture: TextureProjection,
        winding: Vec<VertexIndex>,
        portal: PortalId,
        unknown: [u8; 8],
    },
    WithHole {
        texture: TextureProjection,
        mesh: FaceMesh,
        portal: PortalId,
    },
    /// Never drawn itself; its geometry lives in `sub_faces`.
    Bsp {
        texture: TextureProjection,
        winding: Vec<VertexIndex>,
        root: NodeId,
        portals: Vec<PortalId>,
        sub_faces: Vec<FaceId>,
    },
    Skydome {
        winding: Vec<VertexIndex>,
    },
    /// A resolved leaf of a `Bsp` face.
    SubFace {
        texture: TextureProjection,
        mesh: FaceMesh,
        parent: FaceId,
        leaf: NodeId,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub sector: SectorId,
    /// Read from the file; converted to renderer coordinates by post-processing.
    pub plane: PlaneD,
    pub kind: FaceKind,
    pub cast_shadows: bool,
}

impl Face {
    pub fn new(sector: SectorId, plane: PlaneD, kind: FaceKind) -> Self {
        Face {
            sector,
            plane,
            kind,
            cast_shadows: false,
        }
    }

    pub fn texture(&self) -> Option<&TextureProjection> {
        match self.kind {
            FaceKind::Simple { ref texture, .. }
            | FaceKind::Portal { ref texture, .. }
            | FaceKind::WithHole { ref texture, .. }
            | FaceKind::Bsp { ref texture, .. }
            | FaceKind::SubFace { ref texture, .. } => Some(texture),
            FaceKind::Skydome { .. } => None,
        }
    }

    /// Raw vertex pool winding, for faces that are drawn straight from the pool.
    pub fn winding(&self) -> Option<&[VertexIndex]> {
        match self.kind {
            FaceKind::Simple { ref winding, .. }
            | FaceKind::Portal { ref winding, .. }
            | FaceKind::Bsp { ref winding, .. }
            | FaceKind::Skydome { ref winding } => Some(winding),
            FaceKind::WithHole { .. } | FaceKind::SubFace { .. } => None,
        }
    }

    /// Geometry generated by clipping and triangulation.
    pub fn mesh(&self) -> Option<&FaceMesh> {
        match self.kind {
            FaceKind::WithHole { ref mesh, .. } | FaceKind::SubFace { ref mesh, .. } => Some(mesh),
            _ => None,
        }
    }

    pub fn is_skydome(&self) -> bool {
        matches!(self.kind, FaceKind::Skydome { .. })
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            FaceKind::Simple { .. } => "simple",
            FaceKind::Portal { .. } => "portal",
            FaceKind::WithHole { .. } => "with-hole",
            FaceKind::Bsp { .. } => "bsp",
            FaceKind::Skydome { .. } => "skydome",
            FaceKind::SubFace { .. } => "sub-face",
        }
    }
}

/// An opening from the owning face's sector into `to_sector`.
#[derive(Clone, Debug, PartialEq)]
pub struct Portal {
    pub face: FaceId,
    pub to_sector: SectorId,
    /// File-space hole contour.
    pub winding: PolygonD,
    /// Stored alongside holes; their meaning is unknown.
    pub planes: Vec<PlaneD>,
    /// Scratch flag used to emit each mirrored portal pair once.
    pub marked: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LeafIndices {
    pub unknown: u32,
    pub indices: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BspNode {
    Split {
        plane: PlaneD,
        children: [NodeId; 2],
    },
    /// A split which overrides the texture projection of leaves behind it.
    TexInfo {
        plane: PlaneD,
        children: [NodeId; 2],
        texture: TextureProjection,
    },
    Leaf {
        unknown: Vec<LeafIndices>,
        mesh: Option<FaceMesh>,
    },
}

impl BspNode {
    pub fn plane(&self) -> Option<&PlaneD> {
        match *self {
            BspNode::Split { ref plane, .. } | BspNode::TexInfo { ref plane, .. } => Some(plane),
            BspNode::Leaf { .. } => None,
        }
    }

    pub fn children(&self) -> Option<[NodeId; 2]> {
        match *self {
            BspNode::Split { children, .. } | BspNode::TexInfo { children, .. } => Some(children),
            BspNode::Leaf { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(*self, BspNode::Leaf { .. })
    }
}

/// Values in the sector header whose meaning is unknown, kept as read.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SectorHeader {
    pub unknown_scalar: f32,
    pub unknown_color: [u8; 3],
    pub unknown_pair: [f32; 2],
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sector {
    pub name: String,
    pub ambient_color: [u8; 3],
    pub ambient_intensity: f32,
    /// Renderer-space direction, absent when the file stores a zero vector.
    pub light_direction: Option<Vec3d>,
    pub header: SectorHeader,
    pub faces: Vec<FaceId>,
    pub portals: Vec<PortalId>,
    pub bounds: Aabb3<f32>,
    pub centroid: Pnt3f,
}

impl Sector {
    pub fn new(name: String) -> Self {
        Sector {
            name,
            ambient_color: [0; 3],
            ambient_intensity: 0.0,
            light_direction: None,
            header: SectorHeader::default(),
            faces: Vec::new(),
            portals: Vec::new(),
            bounds: Aabb3::empty(),
            centroid: Pnt3f::new(0.0, 0.0, 0.0),
        }
    }
}
