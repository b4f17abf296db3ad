//! Headless walkthrough of screenspace.
//!
//! Places a few screens around a scripted camera, picks one up and walks it
//! across the room, pinches it larger, moves the audio with a tap, and
//! finally resets the session. Run with `RUST_LOG=debug` to see every step.

use std::f32::consts::FRAC_PI_4;
use std::time::{Duration, Instant};

use screenspace::*;

const VIEWPORT: Vec2 = Vec2::new(1170.0, 2532.0);

fn look(space: &mut ScreenSpace<ScriptedPoseSource, HeadlessMedia>, camera: Mat4) {
    space.poses_mut().set_pose(camera);
    space.scene_mut().set_camera(camera);
}

fn report(space: &ScreenSpace<ScriptedPoseSource, HeadlessMedia>) {
    for id in space.registry().ids() {
        if let Some(screen) = space.registry().get(id) {
            let p = screen.position();
            log::info!(
                "  screen {id}: {} at ({:.2}, {:.2}, {:.2}) scale {:.2}{}",
                screen.source(),
                p.x,
                p.y,
                p.z,
                screen.scale().x,
                if screen.is_audible() { " [audio]" } else { "" }
            );
        }
    }
}

fn main() -> Result<()> {
    init_logging();

    let mut scene = SceneTree::new();
    scene.set_view(View::perspective(Mat4::IDENTITY, 60f32.to_radians(), VIEWPORT));

    let mut space = ScreenSpace::new(
        Options::default(),
        ScriptedPoseSource::at(Mat4::IDENTITY),
        HeadlessMedia::new(),
        scene,
        IntervalScheduler::new(),
    )?;
    space.start()?;

    // One screen straight ahead, then one to each side.
    for yaw in [0.0, FRAC_PI_4, -FRAC_PI_4] {
        look(&mut space, Mat4::from_rotation_y(yaw));
        space.add_screen()?;
    }
    log::info!("placed {} screens", space.registry().len());
    report(&space);

    // Face the first screen and pick it up.
    look(&mut space, Mat4::IDENTITY);
    let center = VIEWPORT * 0.5;
    space.handle_touch(&TouchEvent::began(center));
    let Some(held) = space.gestures().tracked_screen() else {
        log::warn!("nothing under the finger");
        return Ok(());
    };

    // Walk two meters to the right while holding it.
    let mut now = Instant::now();
    for step in 1..=20u8 {
        let x = f32::from(step) * 0.1;
        look(&mut space, Mat4::from_translation(Vec3::new(x, 0.0, 0.0)));
        now += Duration::from_millis(17);
        space.advance(now);
    }
    space.handle_touch(&TouchEvent::ended(center));
    log::info!("dropped screen {held}");

    // Grow it, then give it the audio.
    let mut pinch = PinchGesture::new(center - Vec2::X * 100.0, center + Vec2::X * 100.0, 1.5);
    space.handle_pinch(&mut pinch);
    space.handle_tap(center);
    report(&space);

    space.reset()?;
    log::info!(
        "after reset: {} screens, next source {}",
        space.registry().len(),
        space
            .rotation()
            .front()
            .map_or_else(|| "<none>".to_string(), ToString::to_string)
    );
    Ok(())
}
