use super::clip::{dedup_contour, ClipPolygon};
use super::errors::{ErrorKind, Result};
use log::debug;
use math::Pnt2d;

/// Indexed triangle list in a clipper's 2D frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Triangulation {
    pub vertices: Vec<Pnt2d>,
    pub indices: Vec<u32>,
}

impl Triangulation {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn area(&self) -> f64 {
        self.indices
            .chunks(3)
            .map(|triangle| {
                triangle_area(
                    self.vertices[triangle[0] as usize],
                    self.vertices[triangle[1] as usize],
                    self.vertices[triangle[2] as usize],
                )
                .abs()
            })
            .sum()
    }
}

/// Triangulates clip results, holes included. Every triangle is wound counter-clockwise if
/// `counter_clockwise` is set, clockwise otherwise.
pub fn triangulate(polygons: &[ClipPolygon], counter_clockwise: bool) -> Result<Triangulation> {
    let mut triangulation = Triangulation::default();
    for polygon in polygons {
        let mut rings = Vec::with_capacity(polygon.holes.len() + 1);
        let outer = ring(&polygon.outer);
        if outer.len() < 3 {
            debug!("Skipping degenerate polygon with {} points.", outer.len());
            continue;
        }
        rings.push(outer);
        rings.extend(
            polygon
                .holes
                .iter()
                .map(|hole| ring(hole))
                .filter(|hole| hole.len() >= 3),
        );

        let (data, holes, dimensions) = earcutr::flatten(&rings);
        let indices = earcutr::earcut(&data, &holes, dimensions)
            .map_err(|error| ErrorKind::Triangulation(format!("{:?}", error)))?;

        let first_vertex = triangulation.vertices.len() as u32;
        triangulation.vertices.extend(
            data.chunks(dimensions)
                .map(|point| Pnt2d::new(point[0], point[1])),
        );
        for triangle in indices.chunks(3) {
            if triangle.len() < 3 {
                break;
            }
            let (a, b, c) = (triangle[0], triangle[1], triangle[2]);
            let point = |index: usize| {
                Pnt2d::new(data[index * dimensions], data[index * dimensions + 1])
            };
            let area = triangle_area(point(a), point(b), point(c));
            let (b, c) = if (area >= 0.0) == counter_clockwise {
                (b, c)
            } else {
                (c, b)
            };
            triangulation.indices.extend_from_slice(&[
                first_vertex + a as u32,
                first_vertex + b as u32,
                first_vertex + c as u32,
            ]);
        }
    }
    Ok(triangulation)
}

fn ring(contour: &[Pnt2d]) -> Vec<Vec<f64>> {
    dedup_contour(contour.iter().map(|point| (point.x, point.y)))
        .into_iter()
        .map(|(x, y)| vec![x, y])
        .collect()
}

fn triangle_area(a: Pnt2d, b: Pnt2d, c: Pnt2d) -> f64 {
    ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)) * 0.5
}

#[cfg(test)]
mod test {
    use super::super::clip::{area, ClipOp, ClipPolygon, Clipper};
    use super::{triangle_area, triangulate};
    use math::{Pnt2d, Vec3d};

    fn square(min: f64, max: f64) -> Vec<Pnt2d> {
        vec![
            Pnt2d::new(min, min),
            Pnt2d::new(max, min),
            Pnt2d::new(max, max),
            Pnt2d::new(min, max),
        ]
    }

    #[test]
    fn convex_polygon() {
        let polygon = ClipPolygon {
            outer: square(0.0, 2.0),
            holes: Vec::new(),
        };
        let triangulation = triangulate(&[polygon], true).unwrap();
        assert_eq!(triangulation.num_triangles(), 2);
        assert_eq!(triangulation.vertices.len(), 4);
        assert!((triangulation.area() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn holes_are_honoured_and_winding_is_forced() {
        let mut clipper = Clipper::new(Vec3d::new(0.0, 0.0, 1.0));
        clipper.add_contour_2d(&square(0.0, 10.0), true);
        clipper.add_contour_2d(&square(3.0, 5.0), false);
        clipper.add_contour_2d(&square(6.0, 8.0), false);
        let polygons = clipper.execute(ClipOp::Difference);

        for &counter_clockwise in &[true, false] {
            let triangulation = triangulate(&polygons, counter_clockwise).unwrap();
            assert!((triangulation.area() - area(&polygons)).abs() < 1e-6);
            assert!((triangulation.area() - 92.0).abs() < 1e-6);
            for triangle in triangulation.indices.chunks(3) {
                let signed = triangle_area(
                    triangulation.vertices[triangle[0] as usize],
                    triangulation.vertices[triangle[1] as usize],
                    triangulation.vertices[triangle[2] as usize],
                );
                if signed.abs() > 1e-12 {
                    assert_eq!(signed > 0.0, counter_clockwise);
                }
            }
        }
    }

    #[test]
    fn repeated_points_do_not_break_triangulation() {
        let mut outer = square(0.0, 1.0);
        outer.insert(1, Pnt2d::new(0.0, 0.0));
        outer.push(Pnt2d::new(0.0, 0.0));
        let triangulation = triangulate(
            &[ClipPolygon {
                outer,
                holes: vec![vec![Pnt2d::new(0.5, 0.5)]],
            }],
            true,
        )
        .unwrap();
        assert_eq!(triangulation.num_triangles(), 2);
    }

    #[test]
    fn degenerate_polygons_produce_nothing() {
        let triangulation = triangulate(
            &[ClipPolygon {
                outer: vec![Pnt2d::new(0.0, 0.0), Pnt2d::new(1.0, 0.0)],
                holes: Vec::new(),
            }],
            true,
        )
        .unwrap();
        assert!(triangulation.is_empty());
    }
}
