//! Spatial index port.
//!
//! The render tree is owned by the host renderer. screenspace only needs to
//! create nodes, attach and detach them, push transforms, and hit-test screen
//! points against bounding volumes. [`SpatialIndex`] is that narrow surface;
//! [`crate::SceneTree`] is an in-memory implementation.

use std::fmt;
use std::time::Duration;

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Opaque handle for a node in the render tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Wraps a raw node index issued by a spatial index.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw node index.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned bounding volume in a node's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Creates bounds from two corners.
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Bounds of the given size centered on the local origin.
    #[must_use]
    pub fn centered(size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self::new(-half, half)
    }

    /// Returns the size along each axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Slab test. Returns the ray parameter of the entry point, or `None`.
    ///
    /// A ray starting inside the box reports `0.0`.
    #[must_use]
    pub fn intersect_ray(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let (mut t0, mut t1) = ((lo - o) * inv, (hi - o) * inv);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

/// Options for a hit test query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTestOptions {
    /// Test against bounding volumes only, skipping precise geometry.
    pub bounding_box_only: bool,
}

impl HitTestOptions {
    /// Bounding-volume-only hit testing.
    #[must_use]
    pub const fn bounding_volume() -> Self {
        Self {
            bounding_box_only: true,
        }
    }
}

impl Default for HitTestOptions {
    fn default() -> Self {
        Self::bounding_volume()
    }
}

/// A single hit test result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// The node whose geometry was hit.
    pub node: NodeId,
    /// Distance from the ray origin in world units.
    pub distance: f32,
}

/// The render tree as seen by screenspace.
///
/// Nodes attached with [`SpatialIndex::add_child`] hang directly off the scene
/// root. The scene root itself is not addressable: [`SpatialIndex::parent`]
/// returns `None` for top-level and detached nodes.
pub trait SpatialIndex {
    /// Allocates a node. With a parent, the node is created as its child;
    /// without one, it is created detached.
    fn create_node(&mut self, parent: Option<NodeId>, bounds: Option<Bounds>) -> NodeId;

    /// Attaches a detached node to the scene root.
    fn add_child(&mut self, node: NodeId);

    /// Detaches a node (and its subtree) from its parent.
    fn remove_from_parent(&mut self, node: NodeId);

    /// Returns the parent of a node, or `None` at the top of the tree.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Sets a node's local transform. `transition` requests a smoothed change
    /// over the given duration; renderers without animation apply it directly.
    fn set_transform(&mut self, node: NodeId, transform: Mat4, transition: Option<Duration>);

    /// Hit-tests a point in screen coordinates. Results are ordered nearest first.
    fn hit_test(&self, point: Vec2, options: HitTestOptions) -> Vec<Hit>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_hits_box_front_face() {
        let bounds = Bounds::centered(Vec3::new(2.0, 2.0, 2.0));
        let t = bounds
            .intersect_ray(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z)
            .unwrap();
        assert!((t - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_ray_misses_box() {
        let bounds = Bounds::centered(Vec3::ONE);
        assert!(bounds
            .intersect_ray(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z)
            .is_none());
        // Pointing away.
        assert!(bounds
            .intersect_ray(Vec3::new(0.0, 0.0, 5.0), Vec3::Z)
            .is_none());
    }

    #[test]
    fn test_ray_inside_box_reports_zero() {
        let bounds = Bounds::centered(Vec3::ONE);
        assert_eq!(bounds.intersect_ray(Vec3::ZERO, Vec3::X), Some(0.0));
    }

    #[test]
    fn test_flat_plane_is_hittable() {
        let bounds = Bounds::centered(Vec3::new(0.64, 0.36, 0.0));
        let t = bounds
            .intersect_ray(Vec3::new(0.1, 0.1, 1.0), Vec3::NEG_Z)
            .unwrap();
        assert!((t - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::new(7).to_string(), "#7");
    }
}
