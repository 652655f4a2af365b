use cgmath::prelude::*;
use cgmath::{BaseFloat, Matrix3, Point2, Point3, Vector3};

/// Orthonormal basis `(u, v, normal)` of a plane, used to flatten planar polygons into 2D and
/// lift them back. The basis is right-handed, so counter-clockwise windings around the normal stay
/// counter-clockwise in 2D.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneFrame<S: BaseFloat> {
    pub u: Vector3<S>,
    pub v: Vector3<S>,
    pub normal: Vector3<S>,
}

impl<S: BaseFloat> PlaneFrame<S> {
    pub fn from_normal(normal: Vector3<S>) -> Self {
        let normal = normal.normalize();
        let (x, y, z) = (normal.x.abs(), normal.y.abs(), normal.z.abs());
        let axis = if x <= y && x <= z {
            Vector3::unit_x()
        } else if y <= z {
            Vector3::unit_y()
        } else {
            Vector3::unit_z()
        };
        let u = axis.cross(normal).normalize();
        let v = normal.cross(u);
        PlaneFrame { u, v, normal }
    }

    #[inline]
    pub fn to_2d(&self, point: Point3<S>) -> Point2<S> {
        let point = point.to_vec();
        Point2::new(self.u.dot(point), self.v.dot(point))
    }

    /// Distance of `point` along the frame normal.
    #[inline]
    pub fn depth(&self, point: Point3<S>) -> S {
        self.normal.dot(point.to_vec())
    }

    #[inline]
    pub fn to_3d(&self, point: Point2<S>, depth: S) -> Point3<S> {
        Point3::from_vec(self.u * point.x + self.v * point.y + self.normal * depth)
    }

    /// Matrix mapping `(x, y, depth)` frame coordinates to 3D.
    pub fn transform_3d(&self) -> Matrix3<S> {
        Matrix3::from_cols(self.u, self.v, self.normal)
    }

    /// Matrix mapping 3D points to `(x, y, depth)` frame coordinates.
    pub fn transform_2d(&self) -> Matrix3<S> {
        self.transform_3d().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::PlaneFrame;
    use cgmath::prelude::*;
    use cgmath::{Point3, Vector3};

    #[test]
    fn frame_is_orthonormal_and_right_handed() {
        for normal in &[
            Vector3::<f64>::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(1.0, 2.0, -3.0),
        ] {
            let frame = PlaneFrame::from_normal(*normal);
            assert!((frame.u.magnitude() - 1.0).abs() < 1e-12);
            assert!((frame.v.magnitude() - 1.0).abs() < 1e-12);
            assert!(frame.u.dot(frame.normal).abs() < 1e-12);
            assert!(frame.v.dot(frame.normal).abs() < 1e-12);
            assert!((frame.transform_3d().determinant() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn round_trip_through_frame() {
        let frame = PlaneFrame::from_normal(Vector3::<f64>::new(1.0, 1.0, 0.0));
        let point = Point3::new(3.0, -1.0, 7.5);
        let flat = frame.to_2d(point);
        let back = frame.to_3d(flat, frame.depth(point));
        assert!((back - point).magnitude() < 1e-12);

        let matrix = frame.transform_3d() * Vector3::new(flat.x, flat.y, frame.depth(point));
        assert!((matrix - point.to_vec()).magnitude() < 1e-12);
        let local = frame.transform_2d() * point.to_vec();
        assert!((local.x - flat.x).abs() < 1e-12);
    }
}
