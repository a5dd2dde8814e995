//! Input event stream to [`TransformState`] mutations.
//!
//! Pointer and touch input share the drag anchor: a single active touch behaves like a
//! held mouse button. Two active touches switch to pinch-zoom, where the scale is the
//! ratio of the current finger distance to the distance at pinch start, times the scale
//! captured at pinch start.

use std::collections::BTreeMap;

use crate::{
    foundation::core::Point,
    gesture::event::{InputEvent, TouchId, TouchPoint},
    transform::state::TransformState,
};

/// Wheel step applied when scrolling towards the user (`delta_y <= 0`).
pub const WHEEL_ZOOM_IN: f64 = 1.1;
/// Wheel step applied when scrolling away from the user (`delta_y > 0`).
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Result of feeding one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureResponse {
    /// The transform changed; the preview must be rendered once.
    Render,
    /// Bookkeeping only.
    Idle,
}

impl GestureResponse {
    /// Whether the caller should re-render.
    pub fn needs_render(self) -> bool {
        self == Self::Render
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pinch {
    initial_distance: f64,
    initial_scale: f64,
}

/// Stateful interpreter; one per session.
#[derive(Clone, Debug, Default)]
pub struct GestureInterpreter {
    anchor: Option<Point>,
    touches: BTreeMap<TouchId, Point>,
    pinch: Option<Pinch>,
}

impl GestureInterpreter {
    /// Interpreter with no active drag, touches or pinch.
    pub fn new() -> Self {
        Self::default()
    }

    /// A pointer or single-touch drag has an anchor.
    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// A two-touch pinch reference is captured.
    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    /// Number of tracked touch contacts.
    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    /// Drop all interaction state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Feed one event, mutating `transform` when the event implies a pan or zoom.
    pub fn apply(&mut self, event: &InputEvent, transform: &mut TransformState) -> GestureResponse {
        match event {
            InputEvent::PointerDown { pos } => {
                self.anchor = Some(*pos);
                GestureResponse::Idle
            }
            InputEvent::PointerMove { pos } => self.drag_to(*pos, transform),
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                self.anchor = None;
                GestureResponse::Idle
            }
            InputEvent::Wheel { delta_y } => {
                let factor = if *delta_y > 0.0 {
                    WHEEL_ZOOM_OUT
                } else {
                    WHEEL_ZOOM_IN
                };
                transform.zoom_by(factor);
                GestureResponse::Render
            }
            InputEvent::TouchStart { touches } => {
                self.track(touches);
                self.settle(transform);
                GestureResponse::Idle
            }
            InputEvent::TouchMove { touches } => {
                self.track(touches);
                self.touch_moved(transform)
            }
            InputEvent::TouchEnd { ended } => {
                for id in ended {
                    self.touches.remove(id);
                }
                self.settle(transform);
                GestureResponse::Idle
            }
            InputEvent::TouchCancel => {
                self.clear();
                GestureResponse::Idle
            }
        }
    }

    fn track(&mut self, touches: &[TouchPoint]) {
        for t in touches {
            self.touches.insert(t.id, t.pos);
        }
    }

    /// Re-derive drag/pinch mode from the number of active touches.
    fn settle(&mut self, transform: &TransformState) {
        self.anchor = None;
        self.pinch = None;
        match self.touches.len() {
            1 => self.anchor = self.touches.values().next().copied(),
            2 => {
                self.pinch = self.pair_distance().filter(|d| *d > 0.0).map(|d| Pinch {
                    initial_distance: d,
                    initial_scale: transform.scale(),
                });
            }
            _ => {}
        }
    }

    fn touch_moved(&mut self, transform: &mut TransformState) -> GestureResponse {
        match self.touches.len() {
            1 => match self.touches.values().next().copied() {
                Some(pos) => self.drag_to(pos, transform),
                None => GestureResponse::Idle,
            },
            2 => {
                let (Some(pinch), Some(distance)) = (self.pinch, self.pair_distance()) else {
                    return GestureResponse::Idle;
                };
                transform.zoom_to(pinch.initial_scale * distance / pinch.initial_distance);
                GestureResponse::Render
            }
            _ => GestureResponse::Idle,
        }
    }

    fn drag_to(&mut self, pos: Point, transform: &mut TransformState) -> GestureResponse {
        let Some(last) = self.anchor else {
            return GestureResponse::Idle;
        };
        let delta = pos - last;
        transform.pan_by(delta.x, delta.y);
        self.anchor = Some(pos);
        tracing::trace!(dx = delta.x, dy = delta.y, "drag");
        GestureResponse::Render
    }

    fn pair_distance(&self) -> Option<f64> {
        let mut it = self.touches.values();
        let a = it.next()?;
        let b = it.next()?;
        Some(a.distance(*b))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gesture/interpreter.rs"]
mod tests;
