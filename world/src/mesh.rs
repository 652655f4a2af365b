use bytemuck::{Pod, Zeroable};
use math::prelude::*;
use math::{Vec2f, Vec3f};

/// Vertex of the flattened world mesh, in renderer coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

/// Draw range into the shared vertex and index buffers. Indices are absolute, so `base_vertex`
/// is always zero for world geometry.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct MeshOffset {
    pub start_index: u32,
    pub index_count: u32,
    pub base_vertex: u32,
}

impl MeshOffset {
    pub fn end_index(&self) -> u32 {
        self.start_index + self.index_count
    }
}

/// Fills in tangent frames for a finished mesh.
pub trait TangentSpace {
    fn compute(&self, vertices: &mut [MeshVertex], indices: &[u32]);
}

/// Flat per-triangle tangents derived from positions and texture coordinates. Vertices shared by
/// several triangles keep the last triangle's frame, which is fine for planar faces.
#[derive(Copy, Clone, Debug, Default)]
pub struct TriangleTangents;

impl TangentSpace for TriangleTangents {
    fn compute(&self, vertices: &mut [MeshVertex], indices: &[u32]) {
        for triangle in indices.chunks(3) {
            if triangle.len() < 3 {
                break;
            }
            let (i0, i1, i2) = (
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            );
            let (v0, v1, v2) = (vertices[i0], vertices[i1], vertices[i2]);

            let delta_pos1 = Vec3f::from(v1.position) - Vec3f::from(v0.position);
            let delta_pos2 = Vec3f::from(v2.position) - Vec3f::from(v0.position);
            let delta_uv1 = Vec2f::from(v1.tex_coord) - Vec2f::from(v0.tex_coord);
            let delta_uv2 = Vec2f::from(v2.tex_coord) - Vec2f::from(v0.tex_coord);

            let determinant = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
            if determinant.abs() <= std::f32::EPSILON {
                continue;
            }
            let r = 1.0 / determinant;
            let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
            let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * r;
            let (tangent, bitangent) = (tangent.normalize(), bitangent.normalize());

            for &index in &[i0, i1, i2] {
                vertices[index].tangent = tangent.into();
                vertices[index].bitangent = bitangent.into();
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::{MeshVertex, TangentSpace, TriangleTangents};

    fn vertex(position: [f32; 3], tex_coord: [f32; 2]) -> MeshVertex {
        MeshVertex {
            position,
            tex_coord,
            normal: [0.0, 0.0, 1.0],
            ..MeshVertex::default()
        }
    }

    #[test]
    fn tangents_follow_texture_axes() {
        let mut vertices = vec![
            vertex([0.0, 0.0, 0.0], [0.0, 0.0]),
            vertex([2.0, 0.0, 0.0], [1.0, 0.0]),
            vertex([0.0, 2.0, 0.0], [0.0, 1.0]),
        ];
        TriangleTangents.compute(&mut vertices, &[0, 1, 2]);
        for vertex in &vertices {
            assert_eq!(vertex.tangent, [1.0, 0.0, 0.0]);
            assert_eq!(vertex.bitangent, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn degenerate_uvs_are_skipped() {
        let mut vertices = vec![
            vertex([0.0, 0.0, 0.0], [0.5, 0.5]),
            vertex([1.0, 0.0, 0.0], [0.5, 0.5]),
            vertex([0.0, 1.0, 0.0], [0.5, 0.5]),
        ];
        TriangleTangents.compute(&mut vertices, &[0, 1, 2]);
        assert!(vertices.iter().all(|vertex| vertex.tangent == [0.0; 3]));
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 14 * 4);
        let vertices = [MeshVertex::default(); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 2 * 14 * 4);
    }
}
