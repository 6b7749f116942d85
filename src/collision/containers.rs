//! Handle lists used by the tree build and the tick driver.

use glam::Vec3;

use crate::{
    core::{aabb::Aabb, object::CollisionObject},
    utils::allocator::{Arena, ObjectId},
};

/// Ordered list of object handles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectVector {
    ids: Vec<ObjectId>,
}

impl ObjectVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: ObjectId) {
        self.ids.push(id);
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn sort_dedup(&mut self) {
        self.ids.sort_unstable();
        self.ids.dedup();
    }

    /// Per-axis minimum of the referenced objects' bounding boxes.
    pub fn min_point(&self, objects: &Arena<CollisionObject>) -> Option<Vec3> {
        self.boxes(objects).map(|b| b.min).reduce(Vec3::min)
    }

    /// Per-axis maximum of the referenced objects' bounding boxes.
    pub fn max_point(&self, objects: &Arena<CollisionObject>) -> Option<Vec3> {
        self.boxes(objects).map(|b| b.max).reduce(Vec3::max)
    }

    /// Box enclosing every referenced object, `None` when nothing resolves.
    pub fn bounds(&self, objects: &Arena<CollisionObject>) -> Option<Aabb> {
        Some(Aabb::new(self.min_point(objects)?, self.max_point(objects)?))
    }

    fn boxes<'a>(&'a self, objects: &'a Arena<CollisionObject>) -> impl Iterator<Item = Aabb> + 'a {
        self.ids
            .iter()
            .filter_map(|id| objects.get(*id))
            .map(CollisionObject::bounding_box)
    }
}

impl FromIterator<ObjectId> for ObjectVector {
    fn from_iter<I: IntoIterator<Item = ObjectId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Handles in push order; the tick driver stacks the objects a mover has
/// collided with during one resolve pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectStack {
    ids: Vec<ObjectId>,
}

impl ObjectStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: ObjectId) {
        self.ids.push(id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Handles from the bottom of the stack to the top.
    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
