use math::prelude::*;
use math::{Pnt3d, Vec3d};

pub type SectorId = usize;
pub type FaceId = usize;
pub type PortalId = usize;
pub type NodeId = usize;
pub type VertexIndex = u32;

pub const FACE_SIMPLE: u32 = 7001;
pub const FACE_PORTAL: u32 = 7002;
pub const FACE_WITH_HOLE: u32 = 7003;
pub const FACE_BSP: u32 = 7004;
pub const FACE_SKYDOME: u32 = 7005;

pub const NODE_SPLIT: u32 = 8001;
pub const NODE_TEX_INFO: u32 = 8002;
pub const NODE_LEAF: u32 = 8003;

/// Signature expected in front of every texture block.
pub const TEXTURE_SIGNATURE: u64 = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct Atmosphere {
    pub name: String,
    pub color: [u8; 3],
    pub intensity: f32,
}

/// Planar texture mapping: `u = axes[0] . p + offsets[0]`, likewise for `v`, in texels.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureProjection {
    pub name: String,
    pub axes: [Vec3d; 2],
    pub offsets: [f32; 2],
    /// Absent for portal faces, whose texture block has no signature.
    pub signature: Option<u64>,
}

impl TextureProjection {
    pub fn is_untextured(&self) -> bool {
        self.name.is_empty()
    }

    /// Texel-space coordinates of `position`, divided by the texture `resolution`.
    pub fn project(&self, position: Pnt3d, resolution: [f64; 2]) -> [f64; 2] {
        let position = position.to_vec();
        [
            (self.axes[0].dot(position) + f64::from(self.offsets[0])) / resolution[0],
            (self.axes[1].dot(position) + f64::from(self.offsets[1])) / resolution[1],
        ]
    }
}
