// Gesture state types
// One pointer-down -> move... -> pointer-up sequence, interpreted as
// create / move / resize

use chrono::{DateTime, Local, NaiveDate};

use crate::grid::projector::{PointerPoint, ScreenRect};
use crate::models::event::Event;

/// Placeholder title shown on a creation draft until the dialog takes over.
pub const DRAFT_TITLE: &str = "(New Event)";

/// What an active gesture is doing to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Create,
    Move,
    ResizeStart,
    ResizeEnd,
}

impl GestureKind {
    pub fn is_resize(&self) -> bool {
        matches!(self, GestureKind::ResizeStart | GestureKind::ResizeEnd)
    }
}

/// Which edge of an event block a resize handle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    /// Top handle - adjusts start time
    Start,
    /// Bottom handle - adjusts end time
    End,
}

impl ResizeEdge {
    pub fn gesture_kind(&self) -> GestureKind {
        match self {
            ResizeEdge::Start => GestureKind::ResizeStart,
            ResizeEdge::End => GestureKind::ResizeEnd,
        }
    }
}

/// A pointer press that has not yet crossed the drag threshold.
///
/// Released before the threshold it resolves as a plain click; past the
/// threshold it promotes to an [`GestureState`].
#[derive(Debug, Clone, PartialEq)]
pub struct PendingGesture {
    pub kind: GestureKind,
    /// Screen position of the pointer-down, for threshold distance checks.
    pub pressed_at: PointerPoint,
    /// Anchor event for move/resize; `None` for create.
    pub event: Option<Event>,
    /// Screen rect of the pressed event block, echoed on click for popover
    /// anchoring.
    pub rect: Option<ScreenRect>,
    /// Day column the press is bound to.
    pub day: NaiveDate,
    /// Create only: tick-floored minutes under the pointer at press time.
    pub start_minutes: i64,
}

/// An active gesture past the drag threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureState {
    pub kind: GestureKind,
    pub day: NaiveDate,
    /// Event being moved or resized; `None` for create.
    pub anchor_event: Option<Event>,
    /// Grid-local minute reference captured at gesture start, used to
    /// compute deltas. For create this is the tick-floored press slot; for
    /// move it is the raw (unsnapped) minutes under the press point.
    pub anchor_minutes: f32,
}

/// Live preview of the event under modification.
///
/// Substituted into the rendered day in place of its anchor (or appended,
/// for create) and discarded when the gesture ends.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftEvent {
    /// Id of the shadowed event; `None` for a creation draft.
    pub anchor_id: Option<i64>,
    pub title: String,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl DraftEvent {
    /// Synthesize an id-less event for rendering a creation draft.
    pub fn to_new_event(&self) -> Event {
        Event {
            id: None,
            title: self.title.clone(),
            description: None,
            location: None,
            start: self.start,
            end: self.end,
            all_day: false,
        }
    }
}

/// What a completed gesture asks of the surrounding application.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Nothing to do (e.g. pointer-up with no recognized press).
    None,
    /// Click-without-drag on an event block; open an edit popover anchored
    /// to `rect`.
    Click {
        event: Event,
        rect: Option<ScreenRect>,
    },
    /// Hand this time window to the creation dialog; the dialog owns the
    /// actual create call.
    CreateRequest {
        start: DateTime<Local>,
        end: DateTime<Local>,
    },
    /// Move/resize committed to the store; caller should refresh its event
    /// list.
    Committed { event: Event },
    /// Move/resize rejected by the store; already logged, the next refresh
    /// reverts to the last persisted state.
    CommitFailed { event_id: i64 },
}
