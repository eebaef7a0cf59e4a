// Screen-to-grid projection
// Keeps the gesture machinery independent of host-UI geometry queries

#[cfg(test)]
use mockall::automock;

/// Pointer position in host screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPoint {
    pub x: f32,
    pub y: f32,
}

impl PointerPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point, used for the click-vs-drag
    /// threshold.
    pub fn distance_to(&self, other: PointerPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Screen rectangle of a rendered event block; echoed back to the host so a
/// popover can anchor to the clicked block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Converts a screen-space pointer position into a grid-local vertical
/// offset (px from 00:00 of the day column).
///
/// The host owns the container geometry and scroll position; the controller
/// only ever sees projected offsets.
#[cfg_attr(test, automock)]
pub trait ScreenToGridProjector {
    fn project(&self, pointer: PointerPoint) -> f32;
}

/// Projector for hosts that scroll a fixed-height day column: grid offset is
/// the pointer's distance below the container top plus the scroll offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetProjector {
    pub container_top: f32,
    pub scroll_top: f32,
}

impl ScreenToGridProjector for OffsetProjector {
    fn project(&self, pointer: PointerPoint) -> f32 {
        pointer.y - self.container_top + self.scroll_top
    }
}
