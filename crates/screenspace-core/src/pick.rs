//! Resolving screen-space points to screens.

use glam::Vec2;

use crate::registry::ScreenRegistry;
use crate::scene::{HitTestOptions, NodeId, SpatialIndex};

/// Result of resolving a point to a screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    /// The screen that owns the hit geometry.
    pub screen: NodeId,

    /// The node whose bounding volume was actually hit.
    pub node: NodeId,

    /// Distance from the camera to the hit.
    pub distance: f32,
}

/// Walks from `node` up through its ancestors and returns the first one that
/// is a registered screen.
pub fn owning_screen(
    node: NodeId,
    scene: &dyn SpatialIndex,
    registry: &ScreenRegistry,
) -> Option<NodeId> {
    let mut current = Some(node);
    while let Some(id) = current {
        if registry.contains(id) {
            return Some(id);
        }
        current = scene.parent(id);
    }
    None
}

/// Hit-tests `point` against bounding volumes and resolves the nearest hit
/// that belongs to a screen.
///
/// Hits are tried nearest first; geometry that belongs to no screen does not
/// block a screen behind it.
pub fn pick_screen(
    point: Vec2,
    scene: &dyn SpatialIndex,
    registry: &ScreenRegistry,
) -> Option<PickResult> {
    scene
        .hit_test(point, HitTestOptions::bounding_volume())
        .into_iter()
        .find_map(|hit| {
            owning_screen(hit.node, scene, registry).map(|screen| PickResult {
                screen,
                node: hit.node,
                distance: hit.distance,
            })
        })
}
