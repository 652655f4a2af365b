use super::clip::{signed_area, ClipOp, ClipPolygon, Clipper};
use super::errors::Result;
use super::face::{BspNode, FaceMesh};
use super::triangulate::triangulate;
use super::types::{NodeId, TextureProjection};
use log::debug;
use math::{PlaneD, PlaneFrame, Pnt2d, Pnt3d, PolygonD, Side};

/// Turns clipped contours of one face into a 3D triangle mesh lying on the face.
///
/// Outer contours of holed faces are stored in reverse; triangles are wound like the contour in
/// file order, which is also the order simple faces are fanned in.
pub(crate) struct HoleMesher {
    frame: PlaneFrame<f64>,
    depth: f64,
    counter_clockwise: bool,
}

impl HoleMesher {
    pub fn new(frame: &PlaneFrame<f64>, reversed_outer: &PolygonD) -> Self {
        let depth = if reversed_outer.is_empty() {
            0.0
        } else {
            reversed_outer
                .iter()
                .map(|&point| frame.depth(point))
                .sum::<f64>()
                / reversed_outer.len() as f64
        };
        let projected: Vec<Pnt2d> = reversed_outer
            .iter()
            .map(|&point| frame.to_2d(point))
            .collect();
        HoleMesher {
            frame: *frame,
            depth,
            counter_clockwise: signed_area(&projected) < 0.0,
        }
    }

    pub fn clipper(&self) -> Clipper {
        Clipper::new(self.frame.normal)
    }

    /// Subtracts the clipper's holes from its outer contours and triangulates what's left.
    pub fn mesh(&self, clipper: &Clipper) -> Result<FaceMesh> {
        let polygons = clipper.execute(ClipOp::Difference);
        let triangulation = triangulate(&polygons, self.counter_clockwise)?;
        let frame = clipper.frame();
        Ok(FaceMesh {
            vertices: triangulation
                .vertices
                .iter()
                .map(|&point| frame.to_3d(point, self.depth))
                .collect(),
            indices: triangulation.indices,
        })
    }
}

/// Pushes `winding` down the tree rooted at `node`, splitting it by every node plane. Each leaf
/// reached gets the piece minus `holes`, triangulated, and is appended to `leaves`.
pub(crate) fn resolve_leaves(
    nodes: &mut [BspNode],
    node: NodeId,
    winding: Option<PolygonD>,
    holes: &[ClipPolygon],
    mesher: &HoleMesher,
    leaves: &mut Vec<NodeId>,
) -> Result<()> {
    let winding = match winding {
        Some(winding) => winding,
        None => {
            debug!("Nothing of the face reaches node {}.", node);
            return Ok(());
        }
    };

    let split = match nodes[node] {
        BspNode::Split { plane, children } | BspNode::TexInfo { plane, children, .. } => {
            Some((plane, children))
        }
        BspNode::Leaf { .. } => None,
    };

    if let Some((plane, children)) = split {
        let (front, back) = winding.split(&plane, 0.0);
        resolve_leaves(nodes, children[0], front, holes, mesher, leaves)?;
        return resolve_leaves(nodes, children[1], back, holes, mesher, leaves);
    }

    let mut clipper = mesher.clipper();
    clipper.add_contour_3d(&winding, true);
    clipper.add_polygons(holes, false);
    let mesh = mesher.mesh(&clipper)?;
    if let BspNode::Leaf {
        mesh: ref mut leaf_mesh,
        ..
    } = nodes[node]
    {
        *leaf_mesh = Some(mesh);
    }
    leaves.push(node);
    Ok(())
}

/// Which side of `plane` most of `vertices` are on. Ties go to the back.
fn leaf_side(plane: &PlaneD, vertices: &[Pnt3d]) -> Side {
    let (mut front, mut back) = (0, 0);
    for &vertex in vertices {
        match plane.side_offset(vertex, 0.0) {
            Side::Front => front += 1,
            Side::Back => back += 1,
            Side::On => {}
        }
    }
    if front > back {
        Side::Front
    } else {
        Side::Back
    }
}

/// Walks from `root` towards the leaf holding `vertices`, taking texture overrides from the
/// `TexInfo` nodes on the way. Only back sides are followed: the walk stops at the first node the
/// leaf is in front of.
pub(crate) fn inherit_texture(
    nodes: &[BspNode],
    root: NodeId,
    vertices: &[Pnt3d],
    texture: &mut TextureProjection,
) {
    let mut node = root;
    loop {
        let children = match nodes[node] {
            BspNode::Leaf { .. } => return,
            BspNode::Split {
                ref plane,
                children,
            } => {
                if leaf_side(plane, vertices) != Side::Back {
                    return;
                }
                children
            }
            BspNode::TexInfo {
                ref plane,
                children,
                texture: ref override_texture,
            } => {
                if leaf_side(plane, vertices) != Side::Back {
                    return;
                }
                *texture = override_texture.clone();
                children
            }
        };
        node = children[1];
    }
}
