//! Gesture events delivered by the host's input layer.

use glam::Vec2;

/// Phase of a raw touch sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// A raw touch event with the screen-space location of every touch in it.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub touches: Vec<Vec2>,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, touches: Vec<Vec2>) -> Self {
        Self { phase, touches }
    }

    /// A single-finger touch-down.
    pub fn began(point: Vec2) -> Self {
        Self::new(TouchPhase::Began, vec![point])
    }

    pub fn moved(point: Vec2) -> Self {
        Self::new(TouchPhase::Moved, vec![point])
    }

    pub fn ended(point: Vec2) -> Self {
        Self::new(TouchPhase::Ended, vec![point])
    }

    pub fn cancelled() -> Self {
        Self::new(TouchPhase::Cancelled, Vec::new())
    }

    /// The touch location when exactly one finger is down.
    pub fn single_touch(&self) -> Option<Vec2> {
        match self.touches.as_slice() {
            [point] => Some(*point),
            _ => None,
        }
    }
}

/// A continuous pinch recognizer's state.
///
/// `scale` accumulates the relative change since it was last reset. The
/// controller resets it to `1.0` after applying it, so each update carries an
/// incremental delta.
#[derive(Debug, Clone, PartialEq)]
pub struct PinchGesture {
    pub touches: Vec<Vec2>,
    pub scale: f32,
}

impl PinchGesture {
    pub fn new(a: Vec2, b: Vec2, scale: f32) -> Self {
        Self {
            touches: vec![a, b],
            scale,
        }
    }

    /// Midpoint of the two touches, or `None` unless exactly two are down.
    pub fn midpoint(&self) -> Option<Vec2> {
        match self.touches.as_slice() {
            [a, b] => Some((*a + *b) * 0.5),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_touch() {
        assert_eq!(
            TouchEvent::began(Vec2::new(1.0, 2.0)).single_touch(),
            Some(Vec2::new(1.0, 2.0))
        );
        let two = TouchEvent::new(TouchPhase::Began, vec![Vec2::ZERO, Vec2::ONE]);
        assert_eq!(two.single_touch(), None);
        assert_eq!(TouchEvent::cancelled().single_touch(), None);
    }

    #[test]
    fn test_pinch_midpoint() {
        let pinch = PinchGesture::new(Vec2::new(100.0, 100.0), Vec2::new(300.0, 200.0), 1.2);
        assert_eq!(pinch.midpoint(), Some(Vec2::new(200.0, 150.0)));

        let lifted = PinchGesture {
            touches: vec![Vec2::ZERO],
            scale: 1.0,
        };
        assert_eq!(lifted.midpoint(), None);
    }
}
