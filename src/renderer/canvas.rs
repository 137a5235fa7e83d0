use crate::interaction::{NodeState, PointerEvent};

pub const LINK_COLOR: &str = "#999";
pub const LINK_OPACITY: f64 = 0.6;
pub const NODE_STROKE: &str = "#fff";
pub const LABEL_COLOR: &str = "#333";
pub const LABEL_FONT: &str = "12px sans-serif";

pub fn node_color(state: NodeState) -> &'static str {
    match state {
        NodeState::Free => "#1f77b4",
        NodeState::Hovered => "#ff7f0e",
        NodeState::Dragging => "#d62728",
    }
}

/// Maps mouse client coordinates onto the layout plane of a canvas that may
/// be scaled by CSS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Viewport {
    /// `canvas` is the drawing buffer size, `rect` the on-screen bounding
    /// box as `(left, top, width, height)`.
    pub fn new(canvas: (f64, f64), rect: (f64, f64, f64, f64)) -> Self {
        let (left, top, width, height) = rect;
        let ratio = |buffer: f64, shown: f64| if shown > 0.0 { buffer / shown } else { 1.0 };
        Viewport {
            left,
            top,
            scale_x: ratio(canvas.0, width),
            scale_y: ratio(canvas.1, height),
        }
    }

    pub fn to_layout(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        (
            (client_x - self.left) * self.scale_x,
            (client_y - self.top) * self.scale_y,
        )
    }
}

/// The DOM mouse events the canvas listens for
pub const POINTER_EVENTS: [&str; 4] = ["mousemove", "mousedown", "mouseup", "mouseleave"];

/// Translate a DOM mouse event type into a pointer event at `(x, y)`.
pub fn pointer_event(kind: &str, x: f64, y: f64) -> Option<PointerEvent> {
    match kind {
        "mousemove" => Some(PointerEvent::Move { x, y }),
        "mousedown" => Some(PointerEvent::Down { x, y }),
        "mouseup" => Some(PointerEvent::Up { x, y }),
        "mouseleave" => Some(PointerEvent::Leave),
        _ => None,
    }
}
