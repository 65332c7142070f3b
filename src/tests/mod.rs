//! Scenario tests driving the viewer through device-space input events.
//!
//! These cover whole gestures across the tool controller, viewport and scene,
//! as a host event loop would deliver them.


use crate::input::{Modifiers, PointerEvent};
use crate::viewer::ImageViewer;

pub(crate) fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

/// Press at `from`, move through `path`, release at the last point.
pub(crate) fn drag(viewer: &mut ImageViewer, from: (f32, f32), path: &[(f32, f32)], modifiers: Modifiers) {
    viewer.handle_pointer(PointerEvent::press(from.0, from.1, modifiers));
    let mut last = from;
    for &(x, y) in path {
        viewer.handle_pointer(PointerEvent::moved(x, y, modifiers));
        last = (x, y);
    }
    viewer.handle_pointer(PointerEvent::release(last.0, last.1, modifiers));
}

pub(crate) fn click(viewer: &mut ImageViewer, x: f32, y: f32, modifiers: Modifiers) {
    drag(viewer, (x, y), &[], modifiers);
}
