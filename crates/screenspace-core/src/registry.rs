//! Registry of live screens.

use std::collections::HashMap;

use glam::Mat4;

use crate::media::MediaSink;
use crate::options::Options;
use crate::pose::ahead_of_camera;
use crate::scene::{NodeId, SpatialIndex};
use crate::screen::Screen;

/// Registry for all screens placed in the scene.
///
/// Screens are keyed by their root node. A screen is in the registry exactly
/// when its root node is attached to the render tree.
#[derive(Debug, Default)]
pub struct ScreenRegistry {
    screens: HashMap<NodeId, Screen>,
}

impl ScreenRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a screen `options.placement_distance` ahead of the camera,
    /// attaches it to the render tree, and records it.
    pub fn add_screen(
        &mut self,
        mut screen: Screen,
        camera_pose: Mat4,
        scene: &mut dyn SpatialIndex,
        options: &Options,
    ) -> NodeId {
        let id = screen.id();
        screen.set_pose(ahead_of_camera(camera_pose, options.placement_distance), scene);
        scene.add_child(id);
        self.screens.insert(id, screen);
        log::info!("added screen {id} ({} live)", self.screens.len());
        id
    }

    /// Destroys and forgets one screen. Returns false if it was not registered.
    pub fn remove(
        &mut self,
        id: NodeId,
        scene: &mut dyn SpatialIndex,
        media: &mut dyn MediaSink,
    ) -> bool {
        let Some(screen) = self.screens.remove(&id) else {
            return false;
        };
        screen.destroy(scene, media);
        log::info!("removed screen {id} ({} live)", self.screens.len());
        true
    }

    /// Destroys every screen and clears the registry.
    ///
    /// Returns the removed identities, sorted, so the caller can end any
    /// tracking session that referenced one of them.
    pub fn remove_all(
        &mut self,
        scene: &mut dyn SpatialIndex,
        media: &mut dyn MediaSink,
    ) -> Vec<NodeId> {
        let mut removed: Vec<NodeId> = Vec::with_capacity(self.screens.len());
        for (id, screen) in self.screens.drain() {
            screen.destroy(scene, media);
            removed.push(id);
        }
        removed.sort_unstable();
        if !removed.is_empty() {
            log::info!("removed all {} screens", removed.len());
        }
        removed
    }

    /// Mutes every screen, then unmutes `target` if it is registered.
    ///
    /// Runs under one exclusive borrow, so no observer sees two audible
    /// screens.
    pub fn mute_all_except(&mut self, target: Option<NodeId>, media: &mut dyn MediaSink) {
        for screen in self.screens.values_mut() {
            screen.mute(media);
        }
        if let Some(screen) = target.and_then(|id| self.screens.get_mut(&id)) {
            screen.unmute(media);
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Screen> {
        self.screens.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Screen> {
        self.screens.get_mut(&id)
    }

    /// Returns whether `id` is the root node of a registered screen.
    pub fn contains(&self, id: NodeId) -> bool {
        self.screens.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Iterates over all screens in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Screen> {
        self.screens.values()
    }

    /// All registered identities, sorted.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.screens.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Identities of screens currently playing sound, sorted.
    pub fn audible(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .screens
            .values()
            .filter(|s| s.is_audible())
            .map(Screen::id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ContentSource;
    use crate::scene_tree::SceneTree;
    use crate::test_support::RecordingMedia;
    use glam::Vec3;

    struct Fixture {
        registry: ScreenRegistry,
        scene: SceneTree,
        media: RecordingMedia,
        options: Options,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: ScreenRegistry::new(),
                scene: SceneTree::new(),
                media: RecordingMedia::default(),
                options: Options::default(),
            }
        }

        fn add(&mut self, camera: Mat4) -> NodeId {
            let screen = Screen::create(
                ContentSource::from("s"),
                &mut self.media,
                &mut self.scene,
                &self.options,
            )
            .unwrap();
            self.registry
                .add_screen(screen, camera, &mut self.scene, &self.options)
        }
    }

    #[test]
    fn test_add_places_screen_ahead_of_camera() {
        let mut fx = Fixture::new();
        let camera = Mat4::from_translation(Vec3::new(0.0, 1.6, 0.0));
        let id = fx.add(camera);

        let screen = fx.registry.get(id).unwrap();
        assert!((screen.position() - Vec3::new(0.0, 1.6, -1.0)).length() < 1e-6);
        assert!(fx.scene.is_attached(id));
        assert_eq!(fx.scene.num_attached_roots(), 1);
    }

    #[test]
    fn test_remove_one() {
        let mut fx = Fixture::new();
        let a = fx.add(Mat4::IDENTITY);
        let b = fx.add(Mat4::IDENTITY);

        assert!(fx.registry.remove(a, &mut fx.scene, &mut fx.media));
        assert!(!fx.registry.remove(a, &mut fx.scene, &mut fx.media));
        assert_eq!(fx.registry.ids(), vec![b]);
        assert!(!fx.scene.contains(a));
        assert!(fx.scene.is_attached(b));
    }

    #[test]
    fn test_remove_all_clears_registry_and_tree() {
        let mut fx = Fixture::new();
        let a = fx.add(Mat4::IDENTITY);
        let b = fx.add(Mat4::IDENTITY);

        let removed = fx.registry.remove_all(&mut fx.scene, &mut fx.media);
        let mut expected = vec![a, b];
        expected.sort_unstable();
        assert_eq!(removed, expected);
        assert!(fx.registry.is_empty());
        assert!(fx.scene.is_empty());
    }

    #[test]
    fn test_mute_all_except_leaves_exactly_one_audible() {
        let mut fx = Fixture::new();
        let ids: Vec<_> = (0..3).map(|_| fx.add(Mat4::IDENTITY)).collect();
        assert_eq!(fx.registry.audible().len(), 3);

        fx.registry.mute_all_except(Some(ids[1]), &mut fx.media);
        assert_eq!(fx.registry.audible(), vec![ids[1]]);

        fx.registry.mute_all_except(Some(ids[2]), &mut fx.media);
        assert_eq!(fx.registry.audible(), vec![ids[2]]);
    }

    #[test]
    fn test_mute_all_except_none_mutes_everything() {
        let mut fx = Fixture::new();
        fx.add(Mat4::IDENTITY);
        fx.add(Mat4::IDENTITY);
        fx.registry.mute_all_except(None, &mut fx.media);
        assert!(fx.registry.audible().is_empty());
    }

    #[test]
    fn test_mute_all_except_unknown_target_mutes_everything() {
        let mut fx = Fixture::new();
        fx.add(Mat4::IDENTITY);
        fx.registry
            .mute_all_except(Some(NodeId::new(999)), &mut fx.media);
        assert!(fx.registry.audible().is_empty());
    }
}
