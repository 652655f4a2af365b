mod aabb;
mod frame;
mod plane;
mod polygon;

pub use self::aabb::Aabb3;
pub use self::frame::PlaneFrame;
pub use self::plane::{Plane, PlaneD, Side};
pub use self::polygon::{Polygon, PolygonD};

pub use cgmath::{BaseFloat, Matrix3, Point2, Point3, Quaternion, Rad, Vector2, Vector3};

pub type Vec2d = Vector2<f64>;
pub type Vec2f = Vector2<f32>;
pub type Vec3d = Vector3<f64>;
pub type Vec3f = Vector3<f32>;
pub type Pnt2d = Point2<f64>;
pub type Pnt2f = Point2<f32>;
pub type Pnt3d = Point3<f64>;
pub type Pnt3f = Point3<f32>;
pub type Mat3d = Matrix3<f64>;
pub type Mat3f = Matrix3<f32>;
pub type Quatf = Quaternion<f32>;

pub mod prelude {
    pub use cgmath::prelude::*;
}
