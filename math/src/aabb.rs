use cgmath::prelude::*;
use cgmath::{BaseFloat, Point3, Vector3};

/// Axis-aligned bounding box. Starts out empty (inverted) and grows to fit what's added to it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3<S: BaseFloat> {
    pub mins: Point3<S>,
    pub maxs: Point3<S>,
}

impl<S: BaseFloat> Aabb3<S> {
    pub fn empty() -> Self {
        Aabb3 {
            mins: Point3::new(S::max_value(), S::max_value(), S::max_value()),
            maxs: Point3::new(S::min_value(), S::min_value(), S::min_value()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mins.x > self.maxs.x || self.mins.y > self.maxs.y || self.mins.z > self.maxs.z
    }

    pub fn add_point(&mut self, point: Point3<S>) {
        self.mins.x = self.mins.x.min(point.x);
        self.mins.y = self.mins.y.min(point.y);
        self.mins.z = self.mins.z.min(point.z);
        self.maxs.x = self.maxs.x.max(point.x);
        self.maxs.y = self.maxs.y.max(point.y);
        self.maxs.z = self.maxs.z.max(point.z);
    }

    pub fn add_aabb(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        self.add_point(other.mins);
        self.add_point(other.maxs);
    }

    pub fn center(&self) -> Point3<S> {
        self.mins.midpoint(self.maxs)
    }

    pub fn size(&self) -> Vector3<S> {
        self.maxs - self.mins
    }

    pub fn contains(&self, point: Point3<S>) -> bool {
        point.x >= self.mins.x
            && point.y >= self.mins.y
            && point.z >= self.mins.z
            && point.x <= self.maxs.x
            && point.y <= self.maxs.y
            && point.z <= self.maxs.z
    }
}

impl<S: BaseFloat> Default for Aabb3<S> {
    fn default() -> Self {
        Self::empty()
    }
}
