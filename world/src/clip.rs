use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon};
use log::debug;
use math::{PlaneFrame, Pnt2d, Pnt3d, PolygonD, Vec3d};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClipOp {
    /// Everything added, outer and hole contours alike, merged.
    Union,
    /// The union of the outer contours minus the union of the hole contours.
    Difference,
}

/// One polygon of a clip result: an outer contour and the holes cut into it, in the clipper's
/// 2D frame. Contours are open (the first point is not repeated).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClipPolygon {
    pub outer: Vec<Pnt2d>,
    pub holes: Vec<Vec<Pnt2d>>,
}

/// Boolean operations on planar contours. Contours are flattened into the frame of the normal the
/// clipper was created with; `frame()` maps results back to 3D.
pub struct Clipper {
    frame: PlaneFrame<f64>,
    outers: Vec<Polygon<f64>>,
    holes: Vec<Polygon<f64>>,
}

impl Clipper {
    pub fn new(normal: Vec3d) -> Self {
        Clipper {
            frame: PlaneFrame::from_normal(normal),
            outers: Vec::new(),
            holes: Vec::new(),
        }
    }

    pub fn frame(&self) -> &PlaneFrame<f64> {
        &self.frame
    }

    pub fn project(&self, point: Pnt3d) -> Pnt2d {
        self.frame.to_2d(point)
    }

    pub fn add_contour_3d(&mut self, contour: &PolygonD, outer: bool) {
        let points: Vec<_> = contour.iter().map(|&point| self.frame.to_2d(point)).collect();
        self.add_contour_2d(&points, outer);
    }

    pub fn add_contour_2d(&mut self, contour: &[Pnt2d], outer: bool) {
        if let Some(ring) = to_ring(contour) {
            self.add(Polygon::new(ring, Vec::new()), outer);
        } else {
            debug!("Dropping degenerate contour with {} points.", contour.len());
        }
    }

    /// Adds previous results (typically from a `Union`), holes included.
    pub fn add_polygons(&mut self, polygons: &[ClipPolygon], outer: bool) {
        for polygon in polygons {
            let exterior = match to_ring(&polygon.outer) {
                Some(exterior) => exterior,
                None => continue,
            };
            let interiors = polygon.holes.iter().filter_map(|hole| to_ring(hole)).collect();
            self.add(Polygon::new(exterior, interiors), outer);
        }
    }

    fn add(&mut self, polygon: Polygon<f64>, outer: bool) {
        if outer {
            self.outers.push(polygon);
        } else {
            self.holes.push(polygon);
        }
    }

    pub fn execute(&self, op: ClipOp) -> Vec<ClipPolygon> {
        let result = match op {
            ClipOp::Union => union_all(self.outers.iter().chain(self.holes.iter())),
            ClipOp::Difference => {
                let outers = union_all(self.outers.iter());
                if self.holes.is_empty() {
                    outers
                } else {
                    outers.difference(&union_all(self.holes.iter()))
                }
            }
        };
        result.0.iter().filter_map(from_geo).collect()
    }
}

fn union_all<'a, I: Iterator<Item = &'a Polygon<f64>>>(polygons: I) -> MultiPolygon<f64> {
    polygons.fold(MultiPolygon::new(Vec::new()), |union, polygon| {
        if union.0.is_empty() {
            MultiPolygon::new(vec![polygon.clone()])
        } else {
            union.union(&MultiPolygon::new(vec![polygon.clone()]))
        }
    })
}

fn to_ring(contour: &[Pnt2d]) -> Option<LineString<f64>> {
    let points = dedup_contour(contour.iter().map(|point| (point.x, point.y)));
    if points.len() < 3 {
        return None;
    }
    Some(LineString::from(points))
}

fn from_ring(ring: &LineString<f64>) -> Vec<Pnt2d> {
    dedup_contour(ring.coords().map(|&Coord { x, y }| (x, y)))
        .into_iter()
        .map(|(x, y)| Pnt2d::new(x, y))
        .collect()
}

fn from_geo(polygon: &Polygon<f64>) -> Option<ClipPolygon> {
    let outer = from_ring(polygon.exterior());
    if outer.len() < 3 {
        return None;
    }
    let holes = polygon
        .interiors()
        .iter()
        .map(from_ring)
        .filter(|hole| hole.len() >= 3)
        .collect();
    Some(ClipPolygon { outer, holes })
}

/// Drops repeated consecutive points, including a closing point equal to the first.
pub(crate) fn dedup_contour<I: Iterator<Item = (f64, f64)>>(points: I) -> Vec<(f64, f64)> {
    let mut contour: Vec<(f64, f64)> = Vec::new();
    for point in points {
        if contour.last() != Some(&point) {
            contour.push(point);
        }
    }
    while contour.len() > 1 && contour.first() == contour.last() {
        contour.pop();
    }
    contour
}

/// Signed area of an open 2D contour, positive when counter-clockwise.
pub fn signed_area(contour: &[Pnt2d]) -> f64 {
    let len = contour.len();
    (0..len)
        .map(|i_point| {
            let current = contour[i_point];
            let next = contour[(i_point + 1) % len];
            current.x * next.y - next.x * current.y
        })
        .sum::<f64>()
        * 0.5
}

/// Area enclosed by a clip result.
pub fn area(polygons: &[ClipPolygon]) -> f64 {
    polygons
        .iter()
        .map(|polygon| {
            signed_area(&polygon.outer).abs()
                - polygon
                    .holes
                    .iter()
                    .map(|hole| signed_area(hole).abs())
                    .sum::<f64>()
        })
        .sum()
}
