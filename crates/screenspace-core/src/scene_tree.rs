//! In-memory render tree.
//!
//! [`SceneTree`] is an arena of nodes with parent indices. It implements
//! [`SpatialIndex`] with ray casts against node bounding boxes, using a
//! configurable [`View`] to turn screen points into world rays. Hosts without
//! their own scene graph (tests, headless runs) use it directly.

use std::collections::HashMap;
use std::time::Duration;

use glam::{Mat4, Vec2, Vec3};

use crate::scene::{Bounds, Hit, HitTestOptions, NodeId, SpatialIndex};

/// Camera parameters used to unproject screen points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    /// Camera-to-world transform.
    pub camera: Mat4,
    /// Projection matrix with `[0, 1]` depth.
    pub projection: Mat4,
    /// Viewport size in pixels.
    pub viewport: Vec2,
}

impl View {
    /// Perspective view. `fov_y` is in radians.
    #[must_use]
    pub fn perspective(camera: Mat4, fov_y: f32, viewport: Vec2) -> Self {
        let aspect = if viewport.y > 0.0 {
            viewport.x / viewport.y
        } else {
            1.0
        };
        Self {
            camera,
            projection: Mat4::perspective_rh(fov_y, aspect, 0.01, 100.0),
            viewport,
        }
    }

    /// World-space ray through a screen point, as (origin on the near plane,
    /// unit direction). `None` for an empty viewport or a degenerate view.
    #[must_use]
    pub fn screen_ray(&self, point: Vec2) -> Option<(Vec3, Vec3)> {
        if self.viewport.cmple(Vec2::ZERO).any() {
            return None;
        }
        let ndc = Vec2::new(
            2.0 * point.x / self.viewport.x - 1.0,
            1.0 - 2.0 * point.y / self.viewport.y,
        );
        let clip_to_world = self.camera * self.projection.inverse();
        let near = clip_to_world.project_point3(ndc.extend(0.0));
        let far = clip_to_world.project_point3(ndc.extend(1.0));
        let dir = (far - near).try_normalize()?;
        near.is_finite().then_some((near, dir))
    }

    /// Projects a world point to screen coordinates.
    #[must_use]
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.projection * self.camera.inverse() * world.extend(1.0);
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * self.viewport.x / 2.0,
            (1.0 - ndc.y) * self.viewport.y / 2.0,
        ))
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: Mat4,
    bounds: Option<Bounds>,
    /// Only meaningful for top-level nodes.
    in_scene: bool,
    last_transition: Option<Duration>,
}

/// Arena-backed render tree.
#[derive(Debug, Default)]
pub struct SceneTree {
    nodes: HashMap<NodeId, Node>,
    next_id: u64,
    view: Option<View>,
}

impl SceneTree {
    /// Creates an empty tree with no view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the view used for hit testing.
    pub fn set_view(&mut self, view: View) {
        self.view = Some(view);
    }

    /// Moves the view's camera, keeping projection and viewport.
    pub fn set_camera(&mut self, camera: Mat4) {
        if let Some(view) = &mut self.view {
            view.camera = camera;
        }
    }

    /// Returns the current view.
    pub fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    /// Returns the number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns whether a node exists.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Returns the number of nodes hanging directly off the scene root.
    pub fn num_attached_roots(&self) -> usize {
        self.nodes
            .values()
            .filter(|n| n.parent.is_none() && n.in_scene)
            .count()
    }

    /// Returns whether a node is reachable from the scene root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            let Some(n) = self.nodes.get(&current) else {
                return false;
            };
            match n.parent {
                Some(parent) => current = parent,
                None => return n.in_scene,
            }
        }
    }

    /// Returns a node's local transform.
    pub fn local_transform(&self, node: NodeId) -> Option<Mat4> {
        self.nodes.get(&node).map(|n| n.local)
    }

    /// Returns the transition requested with the node's last transform update.
    pub fn last_transition(&self, node: NodeId) -> Option<Duration> {
        self.nodes.get(&node).and_then(|n| n.last_transition)
    }

    /// Returns the children of a node.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(&node).map_or(&[], |n| n.children.as_slice())
    }

    /// Composes local transforms from the top of the tree down to `node`.
    pub fn world_transform(&self, node: NodeId) -> Option<Mat4> {
        let mut world = self.nodes.get(&node)?.local;
        let mut current = self.nodes.get(&node)?.parent;
        while let Some(parent) = current {
            let n = self.nodes.get(&parent)?;
            world = n.local * world;
            current = n.parent;
        }
        Some(world)
    }

    fn release_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.remove(&id) {
                stack.extend(n.children);
            }
        }
    }
}

impl SpatialIndex for SceneTree {
    fn create_node(&mut self, parent: Option<NodeId>, bounds: Option<Bounds>) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;

        let parent = parent.filter(|p| self.nodes.contains_key(p));
        if let Some(p) = parent {
            if let Some(pn) = self.nodes.get_mut(&p) {
                pn.children.push(id);
            }
        }

        self.nodes.insert(
            id,
            Node {
                parent,
                children: Vec::new(),
                local: Mat4::IDENTITY,
                bounds,
                in_scene: false,
                last_transition: None,
            },
        );
        id
    }

    fn add_child(&mut self, node: NodeId) {
        match self.nodes.get_mut(&node) {
            Some(n) if n.parent.is_none() => n.in_scene = true,
            Some(_) => log::warn!("node {node} already has a parent"),
            None => log::warn!("add_child on unknown node {node}"),
        }
    }

    /// Detaches the node and releases its subtree from the arena.
    fn remove_from_parent(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(&node).map(|n| n.parent) else {
            return;
        };
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.retain(|c| *c != node);
        }
        self.release_subtree(node);
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node)?.parent
    }

    fn set_transform(&mut self, node: NodeId, transform: Mat4, transition: Option<Duration>) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.local = transform;
            n.last_transition = transition;
        }
    }

    /// Only bounding volumes are stored, so precise and bounding-volume
    /// queries give the same answer.
    fn hit_test(&self, point: Vec2, _options: HitTestOptions) -> Vec<Hit> {
        let Some((origin, dir)) = self.view.and_then(|v| v.screen_ray(point)) else {
            return Vec::new();
        };

        let mut hits: Vec<Hit> = self
            .nodes
            .iter()
            .filter_map(|(id, n)| n.bounds.map(|b| (*id, b)))
            .filter(|(id, _)| self.is_attached(*id))
            .filter_map(|(id, bounds)| {
                let world = self.world_transform(id)?;
                if world.determinant().abs() < 1e-12 {
                    return None;
                }
                let inv = world.inverse();
                let t = bounds.intersect_ray(
                    inv.transform_point3(origin),
                    inv.transform_vector3(dir),
                )?;
                Some(Hit { node: id, distance: t })
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.node.cmp(&b.node))
        });
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn looking_down_neg_z() -> View {
        View::perspective(Mat4::IDENTITY, 60f32.to_radians(), Vec2::new(800.0, 600.0))
    }

    fn center() -> Vec2 {
        Vec2::new(400.0, 300.0)
    }

    #[test]
    fn test_center_ray_points_forward() {
        let (origin, dir) = looking_down_neg_z().screen_ray(center()).unwrap();
        assert!(origin.z <= 0.0);
        assert!((dir - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn test_ray_follows_camera() {
        let camera = Mat4::from_rotation_translation(
            glam::Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let view = View::perspective(camera, 60f32.to_radians(), Vec2::new(800.0, 600.0));
        let (origin, dir) = view.screen_ray(center()).unwrap();
        assert!((origin - Vec3::new(1.0, 2.0, 3.0)).length() < 0.05);
        assert!((dir - Vec3::NEG_X).length() < 1e-4);
    }

    #[test]
    fn test_empty_viewport_has_no_ray() {
        let view = View::perspective(Mat4::IDENTITY, 1.0, Vec2::new(800.0, 0.0));
        assert!(view.screen_ray(center()).is_none());
    }

    #[test]
    fn test_project_inverts_screen_ray() {
        let view = looking_down_neg_z();
        let p = view.project(Vec3::new(0.2, -0.1, -2.0)).unwrap();
        let (origin, dir) = view.screen_ray(p).unwrap();
        let t = (-2.0 - origin.z) / dir.z;
        let hit = origin + dir * t;
        assert!((hit - Vec3::new(0.2, -0.1, -2.0)).length() < 1e-3);
    }

    #[test]
    fn test_hit_test_orders_nearest_first() {
        let mut tree = SceneTree::new();
        tree.set_view(looking_down_neg_z());

        let far = tree.create_node(None, Some(Bounds::centered(Vec3::splat(0.5))));
        tree.set_transform(far, Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0)), None);
        tree.add_child(far);

        let near = tree.create_node(None, Some(Bounds::centered(Vec3::splat(0.5))));
        tree.set_transform(near, Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0)), None);
        tree.add_child(near);

        let hits = tree.hit_test(center(), HitTestOptions::bounding_volume());
        let nodes: Vec<_> = hits.iter().map(|h| h.node).collect();
        assert_eq!(nodes, vec![near, far]);
        assert!(hits[0].distance < hits[1].distance);
    }

    #[test]
    fn test_detached_nodes_are_not_hit() {
        let mut tree = SceneTree::new();
        tree.set_view(looking_down_neg_z());

        let node = tree.create_node(None, Some(Bounds::centered(Vec3::ONE)));
        tree.set_transform(node, Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0)), None);
        assert!(tree.hit_test(center(), HitTestOptions::default()).is_empty());

        tree.add_child(node);
        assert_eq!(tree.hit_test(center(), HitTestOptions::default()).len(), 1);
    }

    #[test]
    fn test_child_inherits_parent_transform() {
        let mut tree = SceneTree::new();
        let root = tree.create_node(None, None);
        let child = tree.create_node(Some(root), None);
        tree.set_transform(root, Mat4::from_translation(Vec3::X), None);
        tree.set_transform(child, Mat4::from_translation(Vec3::Y), None);

        let world = tree.world_transform(child).unwrap();
        assert_eq!(world.transform_point3(Vec3::ZERO), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(tree.parent(child), Some(root));
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn test_remove_from_parent_releases_subtree() {
        let mut tree = SceneTree::new();
        let root = tree.create_node(None, None);
        let child = tree.create_node(Some(root), None);
        let grandchild = tree.create_node(Some(child), None);
        tree.add_child(root);
        assert_eq!(tree.num_attached_roots(), 1);

        tree.remove_from_parent(root);
        assert!(tree.is_empty());
        assert!(!tree.contains(grandchild));
        assert_eq!(tree.num_attached_roots(), 0);
    }

    #[test]
    fn test_no_view_means_no_hits() {
        let mut tree = SceneTree::new();
        let node = tree.create_node(None, Some(Bounds::centered(Vec3::ONE)));
        tree.add_child(node);
        assert!(tree.hit_test(center(), HitTestOptions::default()).is_empty());
    }
}
