use cgmath::prelude::*;
use cgmath::{BaseFloat, Point3, Vector3};

pub type PlaneD = Plane<f64>;

/// Which side of a plane a point lies on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
    On,
}

/// A plane `normal . p + d = 0`. The normal is expected to be unit length (or close to it), but
/// nothing here relies on it beyond the scale of the distances returned.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane<S: BaseFloat> {
    pub normal: Vector3<S>,
    pub d: S,
}

impl<S: BaseFloat> Plane<S> {
    pub fn new(normal: Vector3<S>, d: S) -> Self {
        Plane { normal, d }
    }

    pub fn from_point_normal(point: Point3<S>, normal: Vector3<S>) -> Self {
        Plane {
            normal,
            d: -normal.dot(point.to_vec()),
        }
    }

    /// Signed distance from the plane, positive in front.
    #[inline]
    pub fn distance(&self, point: Point3<S>) -> S {
        self.normal.dot(point.to_vec()) + self.d
    }

    /// Offset of the plane from the origin along its normal.
    #[inline]
    pub fn dist(&self) -> S {
        -self.d
    }

    pub fn side_offset(&self, point: Point3<S>, epsilon: S) -> Side {
        let distance = self.distance(point);
        if distance > epsilon {
            Side::Front
        } else if distance < -epsilon {
            Side::Back
        } else {
            Side::On
        }
    }

    pub fn flipped(&self) -> Self {
        Plane {
            normal: -self.normal,
            d: -self.d,
        }
    }

    pub fn cast<T: BaseFloat>(&self) -> Option<Plane<T>> {
        Some(Plane {
            normal: self.normal.cast()?,
            d: T::from(self.d)?,
        })
    }
}
