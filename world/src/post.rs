use super::config::GeometryConfig;
use super::face::{Face, FaceKind};
use super::mesh::{MeshOffset, MeshVertex, TangentSpace};
use super::types::{FaceId, TextureProjection};
use super::util::{to_render_plane, to_render_point_f};
use super::world::World;
use log::{debug, info};
use math::{Aabb3, Pnt3d, Pnt3f, Vec3f};

/// Shadow casting rules, in order: skydomes and sky stand-ins never cast and mark the world as
/// having a sky; neither do untextured faces nor faces of sectors without portals.
fn classify(world: &mut World, config: &GeometryConfig) {
    let World {
        ref mut faces,
        ref sectors,
        ref mut has_sky,
        ..
    } = *world;
    for face in faces.iter_mut() {
        face.cast_shadows = match face.kind {
            FaceKind::Skydome { .. } => {
                *has_sky = true;
                false
            }
            _ => match face.texture() {
                None => false,
                Some(texture) if texture.is_untextured() => false,
                Some(texture) if config.is_sky_surrogate(&texture.name) => {
                    *has_sky = true;
                    false
                }
                Some(_) => !sectors[face.sector].portals.is_empty(),
            },
        };
    }
}

struct MeshBuilder<'a> {
    config: &'a GeometryConfig,
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
    offsets: Vec<MeshOffset>,
    faces: Vec<FaceId>,
    shadow_casters: MeshOffset,
    bounds: Vec<Aabb3<f32>>,
    centroid_sums: Vec<(Vec3f, usize)>,
}

impl<'a> MeshBuilder<'a> {
    fn new(config: &'a GeometryConfig, num_sectors: usize) -> Self {
        MeshBuilder {
            config,
            vertices: Vec::new(),
            indices: Vec::new(),
            offsets: Vec::new(),
            faces: Vec::new(),
            shadow_casters: MeshOffset::default(),
            bounds: vec![Aabb3::empty(); num_sectors],
            centroid_sums: vec![(Vec3f::new(0.0, 0.0, 0.0), 0); num_sectors],
        }
    }

    fn add_face(&mut self, id: FaceId, face: &Face, pool: &[Pnt3d]) {
        let start_index = self.indices.len() as u32;
        let first_vertex = self.vertices.len() as u32;
        match face.kind {
            FaceKind::Portal { .. } | FaceKind::Bsp { .. } => return,
            FaceKind::WithHole { ref mesh, .. } | FaceKind::SubFace { ref mesh, .. } => {
                if mesh.indices.len() < 3 {
                    return;
                }
                self.add_vertices(face, mesh.vertices.iter().cloned());
                self.indices
                    .extend(mesh.indices.iter().map(|&index| first_vertex + index));
            }
            FaceKind::Simple { ref winding, .. } | FaceKind::Skydome { ref winding } => {
                let len = winding.len() as u32;
                if len < 3 {
                    return;
                }
                self.add_vertices(face, winding.iter().map(|&index| pool[index as usize]));
                for j in 0..len - 2 {
                    self.indices.extend_from_slice(&[
                        first_vertex,
                        first_vertex + len - j - 2,
                        first_vertex + len - j - 1,
                    ]);
                }
            }
        }

        let offset = MeshOffset {
            start_index,
            index_count: self.indices.len() as u32 - start_index,
            base_vertex: 0,
        };
        if face.cast_shadows {
            if self.shadow_casters.index_count == 0 {
                self.shadow_casters.start_index = offset.start_index;
            }
            self.shadow_casters.index_count += offset.index_count;
        }
        self.offsets.push(offset);
        self.faces.push(id);
    }

    /// Emits file-space `positions` with texture coordinates, accumulating the sector's bounds.
    fn add_vertices<I: Iterator<Item = Pnt3d>>(&mut self, face: &Face, positions: I) {
        let first_vertex = self.vertices.len();
        let normal = face.plane.normal;
        let normal = [normal.x as f32, normal.y as f32, normal.z as f32];
        let texture = face.texture();
        let (resolution, unit_scale) = (self.config.texture_resolution, self.config.unit_scale);
        let (bounds, centroid_sum) = (
            &mut self.bounds[face.sector],
            &mut self.centroid_sums[face.sector],
        );
        for position in positions {
            let tex_coord = texture.map_or([0.0, 0.0], |texture| {
                tex_coord(texture, position, resolution)
            });
            let position = to_render_point_f(position, unit_scale);
            bounds.add_point(position);
            centroid_sum.0 += Vec3f::new(position.x, position.y, position.z);
            centroid_sum.1 += 1;
            self.vertices.push(MeshVertex {
                position: position.into(),
                tex_coord,
                normal,
                ..MeshVertex::default()
            });
        }

        if self.config.texcoord_correction {
            correct_tex_coords(&mut self.vertices[first_vertex..]);
        }
    }
}

fn tex_coord(texture: &TextureProjection, position: Pnt3d, resolution: [f64; 2]) -> [f32; 2] {
    let [u, v] = texture.project(position, resolution);
    [u as f32, v as f32]
}

/// Shifts a face's texture coordinates by whole tiles so the smallest lands in `[0, 1)`.
fn correct_tex_coords(vertices: &mut [MeshVertex]) {
    let mut mins = [std::f32::MAX; 2];
    for vertex in vertices.iter() {
        mins[0] = mins[0].min(vertex.tex_coord[0]);
        mins[1] = mins[1].min(vertex.tex_coord[1]);
    }
    let mins = [mins[0].floor(), mins[1].floor()];
    for vertex in vertices {
        vertex.tex_coord[0] -= mins[0];
        vertex.tex_coord[1] -= mins[1];
    }
}

/// Builds the flat mesh of a freshly decoded world: classifies shadow casters, converts face
/// planes to renderer coordinates, then emits non-casters followed by casters.
pub(crate) fn post_process(
    world: &mut World,
    config: &GeometryConfig,
    tangents: &dyn TangentSpace,
) {
    world.has_sky = false;
    world.bounds = Aabb3::empty();
    classify(world, config);

    let mut order: Vec<FaceId> = (0..world.faces.len()).collect();
    order.sort_by_key(|&id| world.faces[id].cast_shadows);

    for face in &mut world.faces {
        face.plane = to_render_plane(&face.plane, config.unit_scale);
    }

    let mut builder = MeshBuilder::new(config, world.sectors.len());
    for &id in &order {
        builder.add_face(id, &world.faces[id], &world.vertices);
    }
    tangents.compute(&mut builder.vertices, &builder.indices);

    let MeshBuilder {
        vertices,
        indices,
        offsets,
        faces,
        shadow_casters,
        bounds,
        centroid_sums,
        ..
    } = builder;
    for ((sector, bounds), (sum, count)) in world
        .sectors
        .iter_mut()
        .zip(bounds)
        .zip(centroid_sums)
    {
        sector.bounds = bounds;
        sector.centroid = if count > 0 {
            Pnt3f::new(0.0, 0.0, 0.0) + sum / count as f32
        } else {
            debug!("Sector `{}` has no geometry.", sector.name);
            Pnt3f::new(0.0, 0.0, 0.0)
        };
        world.bounds.add_aabb(&sector.bounds);
    }

    world.mesh_vertices = vertices;
    world.mesh_indices = indices;
    world.mesh_offsets = offsets;
    world.mesh_faces = faces;
    world.shadow_caster_offset = shadow_casters;
    info!(
        "Built world mesh: {} vertices, {} triangles, {} shadow casting indices.",
        world.mesh_vertices.len(),
        world.mesh_indices.len() / 3,
        world.shadow_caster_offset.index_count
    );
}
