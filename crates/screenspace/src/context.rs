//! Borrowed view of the collaborators a gesture or lifecycle step touches.

use screenspace_core::{MediaSink, PoseSource, ScreenRegistry, SpatialIndex};

use crate::tick::TickScheduler;

/// Everything a gesture handler may read or mutate, borrowed for one call.
pub struct SceneContext<'a> {
    pub registry: &'a mut ScreenRegistry,
    pub poses: &'a mut dyn PoseSource,
    pub scene: &'a mut dyn SpatialIndex,
    pub media: &'a mut dyn MediaSink,
    pub scheduler: &'a mut dyn TickScheduler,
}
