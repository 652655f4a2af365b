use super::plane::{Plane, Side};
use cgmath::prelude::*;
use cgmath::{BaseFloat, Point3, Vector3};
use std::ops::{Index, IndexMut};
use std::slice;

pub type PolygonD = Polygon<f64>;

/// A closed planar polygon; the last point connects back to the first.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Polygon<S: BaseFloat> {
    points: Vec<Point3<S>>,
}

impl<S: BaseFloat> Polygon<S> {
    pub fn new() -> Self {
        Polygon { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Point3<S>>) -> Self {
        Polygon { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Point3<S>] {
        &self.points
    }

    pub fn iter(&self) -> slice::Iter<Point3<S>> {
        self.points.iter()
    }

    pub fn push(&mut self, point: Point3<S>) {
        self.points.push(point);
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    pub fn reversed(mut self) -> Self {
        self.reverse();
        self
    }

    /// Newell normal scaled by twice the polygon's area. Counter-clockwise windings (looking down
    /// the normal) produce a normal pointing towards the viewer.
    pub fn area_normal(&self) -> Vector3<S> {
        let mut normal = Vector3::zero();
        let len = self.points.len();
        for i_point in 0..len {
            let current = self.points[i_point];
            let next = self.points[(i_point + 1) % len];
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
        }
        normal
    }

    pub fn area(&self) -> S {
        self.area_normal().magnitude() / (S::one() + S::one())
    }

    pub fn normal(&self) -> Option<Vector3<S>> {
        let normal = self.area_normal();
        let magnitude = normal.magnitude();
        if magnitude > S::epsilon() {
            Some(normal / magnitude)
        } else {
            None
        }
    }

    /// Splits the polygon by `plane`, returning the `(front, back)` parts. Points within
    /// `epsilon` of the plane belong to both parts. A polygon lying entirely on the plane is
    /// returned as the front part. Parts with fewer than three points are dropped.
    pub fn split(&self, plane: &Plane<S>, epsilon: S) -> (Option<Self>, Option<Self>) {
        let len = self.points.len();
        let mut distances = Vec::with_capacity(len);
        let mut sides = Vec::with_capacity(len);
        let (mut num_front, mut num_back) = (0, 0);
        for &point in &self.points {
            let distance = plane.distance(point);
            let side = if distance > epsilon {
                num_front += 1;
                Side::Front
            } else if distance < -epsilon {
                num_back += 1;
                Side::Back
            } else {
                Side::On
            };
            distances.push(distance);
            sides.push(side);
        }

        if num_back == 0 {
            return (Self::non_degenerate(self.clone()), None);
        }
        if num_front == 0 {
            return (None, Self::non_degenerate(self.clone()));
        }

        let mut front = Polygon::new();
        let mut back = Polygon::new();
        for i_point in 0..len {
            let point = self.points[i_point];
            match sides[i_point] {
                Side::On => {
                    front.push(point);
                    back.push(point);
                    continue;
                }
                Side::Front => front.push(point),
                Side::Back => back.push(point),
            }

            let i_next = (i_point + 1) % len;
            let next_side = sides[i_next];
            if next_side == Side::On || next_side == sides[i_point] {
                continue;
            }

            let t = distances[i_point] / (distances[i_point] - distances[i_next]);
            let mid = point + (self.points[i_next] - point) * t;
            front.push(mid);
            back.push(mid);
        }

        (Self::non_degenerate(front), Self::non_degenerate(back))
    }

    fn non_degenerate(polygon: Self) -> Option<Self> {
        if polygon.len() >= 3 {
            Some(polygon)
        } else {
            None
        }
    }
}

impl<S: BaseFloat> Index<usize> for Polygon<S> {
    type Output = Point3<S>;

    fn index(&self, index: usize) -> &Point3<S> {
        &self.points[index]
    }
}

impl<S: BaseFloat> IndexMut<usize> for Polygon<S> {
    fn index_mut(&mut self, index: usize) -> &mut Point3<S> {
        &mut self.points[index]
    }
}

impl<'a, S: BaseFloat> IntoIterator for &'a Polygon<S> {
    type Item = &'a Point3<S>;
    type IntoIter = slice::Iter<'a, Point3<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
