//! Broad phase: a quadtree over the court floor, rebuilt every tick.
//!
//! Only the X/Y footprint is indexed; the court is flat, so height rarely
//! separates candidates.

use glam::Vec2;
use log::{debug, warn};
use thiserror::Error;

use super::containers::ObjectVector;
use crate::{
    config::CollisionConfig,
    core::{aabb::Aabb, object::CollisionObject},
    utils::{
        allocator::{Arena, ObjectId},
        math::xy,
    },
};

/// Spatial-index invariant violations, kept until the caller takes them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("object {0:?} is missing from its own tree query")]
    MissingObject(ObjectId),
}

/// Axis-aligned rectangle of the court floor covered by a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrant {
    pub min: Vec2,
    pub max: Vec2,
}

impl Quadrant {
    pub fn from_aabb(bounds: &Aabb) -> Self {
        Self {
            min: xy(bounds.min),
            max: xy(bounds.max),
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Closed overlap test against the footprint of `bounds`.
    pub fn intersects(&self, bounds: &Aabb) -> bool {
        self.min.x <= bounds.max.x
            && self.max.x >= bounds.min.x
            && self.min.y <= bounds.max.y
            && self.max.y >= bounds.min.y
    }

    /// Children in SW, SE, NW, NE order.
    pub fn split(&self) -> [Quadrant; 4] {
        let c = self.center();
        [
            Quadrant { min: self.min, max: c },
            Quadrant {
                min: Vec2::new(c.x, self.min.y),
                max: Vec2::new(self.max.x, c.y),
            },
            Quadrant {
                min: Vec2::new(self.min.x, c.y),
                max: Vec2::new(c.x, self.max.y),
            },
            Quadrant { min: c, max: self.max },
        ]
    }
}

#[derive(Debug, Clone, Copy)]
struct TreeEntry {
    id: ObjectId,
    bounds: Aabb,
    ignored: bool,
}

#[derive(Debug, Clone, Copy)]
struct TreeLimits {
    max_depth: u32,
    leaf_capacity: usize,
}

/// One quadtree node: either four children or a leaf list of entries.
#[derive(Debug)]
pub struct CollisionNode {
    quadrant: Quadrant,
    depth: u32,
    children: Option<Box<[CollisionNode; 4]>>,
    entries: Vec<TreeEntry>,
}

impl CollisionNode {
    fn leaf(quadrant: Quadrant, depth: u32, entries: Vec<TreeEntry>) -> Self {
        Self {
            quadrant,
            depth,
            children: None,
            entries,
        }
    }

    fn build(quadrant: Quadrant, depth: u32, entries: Vec<TreeEntry>, limits: TreeLimits) -> Self {
        if depth >= limits.max_depth || entries.len() <= limits.leaf_capacity {
            return Self::leaf(quadrant, depth, entries);
        }

        let quadrants = quadrant.split();
        let buckets = quadrants.map(|q| {
            entries
                .iter()
                .filter(|entry| q.intersects(&entry.bounds))
                .copied()
                .collect::<Vec<_>>()
        });

        // Every child would receive every entry: splitting further gains nothing.
        if buckets.iter().all(|bucket| bucket.len() == entries.len()) {
            return Self::leaf(quadrant, depth, entries);
        }

        let children = Self::build_children(quadrants, depth + 1, buckets, limits);
        Self {
            quadrant,
            depth,
            children: Some(Box::new(children)),
            entries: Vec::new(),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn build_children(
        quadrants: [Quadrant; 4],
        depth: u32,
        buckets: [Vec<TreeEntry>; 4],
        limits: TreeLimits,
    ) -> [CollisionNode; 4] {
        let [q0, q1, q2, q3] = quadrants;
        let [b0, b1, b2, b3] = buckets;
        [
            Self::build(q0, depth, b0, limits),
            Self::build(q1, depth, b1, limits),
            Self::build(q2, depth, b2, limits),
            Self::build(q3, depth, b3, limits),
        ]
    }

    #[cfg(feature = "parallel")]
    fn build_children(
        quadrants: [Quadrant; 4],
        depth: u32,
        buckets: [Vec<TreeEntry>; 4],
        limits: TreeLimits,
    ) -> [CollisionNode; 4] {
        let [q0, q1, q2, q3] = quadrants;
        let [b0, b1, b2, b3] = buckets;
        let ((c0, c1), (c2, c3)) = rayon::join(
            || {
                rayon::join(
                    || Self::build(q0, depth, b0, limits),
                    || Self::build(q1, depth, b1, limits),
                )
            },
            || {
                rayon::join(
                    || Self::build(q2, depth, b2, limits),
                    || Self::build(q3, depth, b3, limits),
                )
            },
        );
        [c0, c1, c2, c3]
    }

    fn query(&self, bounds: &Aabb, out: &mut ObjectVector) {
        if !self.quadrant.intersects(bounds) {
            return;
        }
        match &self.children {
            Some(children) => {
                for child in children.iter() {
                    child.query(bounds, out);
                }
            }
            None => {
                for entry in &self.entries {
                    if !entry.ignored && entry.bounds.intersects_xy(bounds) {
                        out.push(entry.id);
                    }
                }
            }
        }
    }

    pub fn quadrant(&self) -> Quadrant {
        self.quadrant
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    fn max_depth(&self) -> u32 {
        match &self.children {
            Some(children) => children.iter().map(CollisionNode::max_depth).max().unwrap_or(self.depth),
            None => self.depth,
        }
    }

    fn leaf_count(&self) -> usize {
        match &self.children {
            Some(children) => children.iter().map(CollisionNode::leaf_count).sum(),
            None => 1,
        }
    }
}

/// Quadtree over every object in the world.
#[derive(Debug)]
pub struct CollisionObjectTree {
    root: Option<CollisionNode>,
    limits: TreeLimits,
    object_count: usize,
    error: Option<TreeError>,
}

impl Default for CollisionObjectTree {
    fn default() -> Self {
        Self::new(&CollisionConfig::default())
    }
}

impl CollisionObjectTree {
    pub fn new(config: &CollisionConfig) -> Self {
        Self {
            root: None,
            limits: TreeLimits {
                max_depth: config.tree_max_depth,
                leaf_capacity: config.tree_leaf_capacity.max(1),
            },
            object_count: 0,
            error: None,
        }
    }

    /// Rebuilds the tree from scratch over every object in `objects`.
    pub fn build(&mut self, objects: &Arena<CollisionObject>) {
        let ids: ObjectVector = objects.ids().collect();
        self.object_count = ids.len();
        let Some(bounds) = ids.bounds(objects) else {
            self.root = None;
            return;
        };

        let entries = objects
            .iter()
            .map(|(id, object)| TreeEntry {
                id,
                bounds: object.bounding_box(),
                ignored: object.ignore,
            })
            .collect();
        let root = CollisionNode::build(Quadrant::from_aabb(&bounds), 0, entries, self.limits);
        debug!(
            "quadtree rebuilt: {} objects, {} leaves, depth {}",
            self.object_count,
            root.leaf_count(),
            root.max_depth()
        );
        self.root = Some(root);
    }

    /// Non-ignored objects whose footprint overlaps `bounds`, sorted and
    /// without duplicates.
    pub fn query(&self, bounds: &Aabb) -> ObjectVector {
        let mut found = ObjectVector::new();
        if let Some(root) = &self.root {
            root.query(bounds, &mut found);
        }
        found.sort_dedup();
        found
    }

    /// Candidates for `object` over its velocity-inflated box.
    ///
    /// A non-ignored object must at least find itself; when it does not, the
    /// sticky error is set and also returned.
    pub fn query_object(&mut self, object: &CollisionObject) -> Result<ObjectVector, TreeError> {
        let found = self.query(&object.big_bounding_box());
        if !object.ignore && !found.contains(object.id) {
            let error = TreeError::MissingObject(object.id);
            warn!("{error}");
            self.error = Some(error.clone());
            return Err(error);
        }
        Ok(found)
    }

    pub fn error(&self) -> Option<&TreeError> {
        self.error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<TreeError> {
        self.error.take()
    }

    pub fn root(&self) -> Option<&CollisionNode> {
        self.root.as_ref()
    }

    pub fn len(&self) -> usize {
        self.object_count
    }

    pub fn is_empty(&self) -> bool {
        self.object_count == 0
    }

    pub fn depth(&self) -> u32 {
        self.root.as_ref().map_or(0, CollisionNode::max_depth)
    }

    pub fn leaf_count(&self) -> usize {
        self.root.as_ref().map_or(0, CollisionNode::leaf_count)
    }
}
