// Interaction controller
// Turns raw pointer sequences into create / move / resize operations with
// live draft preview and an eventual commit to the remote store

use chrono::{Duration, NaiveDate};
use log::{debug, error};

use crate::grid::gesture::{
    DraftEvent, GestureKind, GestureOutcome, GestureState, PendingGesture, ResizeEdge, DRAFT_TITLE,
};
use crate::grid::layout::{position_events, substitute_draft, PositionedEvent};
use crate::grid::projector::{PointerPoint, ScreenRect, ScreenToGridProjector};
use crate::grid::time::{
    clamp_minutes, datetime_at, minutes_of_day, snap_minutes, GridMetrics, MINUTES_PER_DAY,
};
use crate::models::event::{Event, EventPatch};
use crate::models::settings::GridSettings;
use crate::services::event::EventGateway;

/// Gesture phase: `Idle -> Pending -> Active -> Idle`.
#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Pending(PendingGesture),
    Active(GestureState),
}

/// Stateful owner of the gesture state machine for one time grid.
///
/// The host forwards raw pointer events through the `on_*` handlers; the
/// controller maintains at most one gesture and one draft at a time. All
/// transitions are synchronous; the only suspension point is the store
/// update awaited by [`GridController::on_pointer_up`] after the machine
/// has already returned to idle.
///
/// Single-pointer model: a second pointer-down during an active gesture is
/// ignored, not supported.
pub struct GridController {
    settings: GridSettings,
    metrics: GridMetrics,
    phase: Phase,
    draft: Option<DraftEvent>,
    last_gesture_was_drag: bool,
}

impl GridController {
    pub fn new(settings: GridSettings) -> Self {
        let metrics = GridMetrics::from_settings(&settings);
        Self {
            settings,
            metrics,
            phase: Phase::Idle,
            draft: None,
            last_gesture_was_drag: false,
        }
    }

    pub fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    /// The live preview, if a gesture is past the drag threshold.
    pub fn draft(&self) -> Option<&DraftEvent> {
        self.draft.as_ref()
    }

    /// True once a press has been promoted to an actual drag.
    pub fn is_gesture_active(&self) -> bool {
        matches!(self.phase, Phase::Active(_))
    }

    /// True if the most recent completed gesture was a drag rather than a
    /// click.
    pub fn last_gesture_was_drag(&self) -> bool {
        self.last_gesture_was_drag
    }

    /// Consume the drag flag. Hosts whose click events fire independently of
    /// pointer-up call this from their click handler and drop the click when
    /// it returns true, so the release of a drag does not also open a
    /// popover. Cleared synchronously, no timers involved.
    pub fn suppress_click(&mut self) -> bool {
        std::mem::take(&mut self.last_gesture_was_drag)
    }

    /// Day layout with the active draft substituted in.
    pub fn positioned_events(&self, events: &[Event], day: NaiveDate) -> Vec<PositionedEvent> {
        let display = substitute_draft(events, self.draft.as_ref(), day);
        position_events(&display, day, &self.metrics)
    }

    /// Pointer-down on an empty day cell: provisional creation gesture
    /// anchored at the tick-floored slot under the pointer.
    pub fn on_day_pointer_down(
        &mut self,
        pointer: PointerPoint,
        day: NaiveDate,
        projector: &dyn ScreenToGridProjector,
    ) {
        if self.phase != Phase::Idle {
            return;
        }

        let offset = projector.project(pointer);
        let start_minutes = self.metrics.floor_tick_minutes_at_offset(offset);
        self.draft = None;
        self.phase = Phase::Pending(PendingGesture {
            kind: GestureKind::Create,
            pressed_at: pointer,
            event: None,
            rect: None,
            day,
            start_minutes,
        });
    }

    /// Pointer-down on an event body: provisional move gesture.
    pub fn on_event_pointer_down(&mut self, pointer: PointerPoint, event: &Event, rect: ScreenRect) {
        if self.phase != Phase::Idle {
            return;
        }

        self.draft = None;
        self.phase = Phase::Pending(PendingGesture {
            kind: GestureKind::Move,
            pressed_at: pointer,
            event: Some(event.clone()),
            rect: Some(rect),
            day: event.start.date_naive(),
            start_minutes: 0,
        });
    }

    /// Pointer-down on a resize handle: provisional resize gesture for the
    /// given edge.
    pub fn on_resize_pointer_down(
        &mut self,
        pointer: PointerPoint,
        event: &Event,
        edge: ResizeEdge,
    ) {
        if self.phase != Phase::Idle {
            return;
        }

        self.draft = None;
        self.phase = Phase::Pending(PendingGesture {
            kind: edge.gesture_kind(),
            pressed_at: pointer,
            event: Some(event.clone()),
            rect: None,
            day: event.start.date_naive(),
            start_minutes: 0,
        });
    }

    /// Pointer-move: promotes a pending press past the drag threshold, then
    /// recomputes the draft on every subsequent move.
    pub fn on_pointer_move(&mut self, pointer: PointerPoint, projector: &dyn ScreenToGridProjector) {
        match &self.phase {
            Phase::Idle => {}
            Phase::Pending(pending) => {
                if pending.pressed_at.distance_to(pointer) <= self.settings.drag_threshold_px {
                    return;
                }
                let pending = pending.clone();
                self.promote(pending, projector);
            }
            Phase::Active(state) => {
                let state = state.clone();
                self.update_draft(&state, pointer, projector);
            }
        }
    }

    /// Pointer-up: resolves the gesture.
    ///
    /// Pending presses resolve as clicks (edit popover for events, default
    /// creation window for day cells). Active creates hand their window to
    /// the dialog collaborator; active moves/resizes commit the new window
    /// to the store. The draft is discarded before the commit is awaited,
    /// so a rejected update simply reverts to the last persisted state on
    /// the next render.
    pub async fn on_pointer_up<G: EventGateway>(&mut self, gateway: &G) -> GestureOutcome {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        let draft = self.draft.take();

        match phase {
            Phase::Idle => GestureOutcome::None,
            Phase::Pending(pending) => {
                self.last_gesture_was_drag = false;
                self.resolve_click(pending)
            }
            Phase::Active(state) => {
                self.last_gesture_was_drag = true;
                match state.kind {
                    GestureKind::Create => match draft {
                        Some(d) => GestureOutcome::CreateRequest {
                            start: d.start,
                            end: d.end,
                        },
                        None => GestureOutcome::None,
                    },
                    GestureKind::Move | GestureKind::ResizeStart | GestureKind::ResizeEnd => {
                        // Gesture state is already cleared; the await below
                        // happens outside the state machine.
                        let (Some(event), Some(d)) = (state.anchor_event, draft) else {
                            return GestureOutcome::None;
                        };
                        let Some(id) = event.id else {
                            return GestureOutcome::None;
                        };
                        self.commit(gateway, id, &d).await
                    }
                }
            }
        }
    }

    fn resolve_click(&self, pending: PendingGesture) -> GestureOutcome {
        match pending.kind {
            GestureKind::Create => {
                let start_m = pending.start_minutes;
                let end_m = clamp_minutes(start_m + self.settings.default_create_minutes);
                match (
                    datetime_at(pending.day, start_m),
                    datetime_at(pending.day, end_m),
                ) {
                    (Some(start), Some(end)) => GestureOutcome::CreateRequest { start, end },
                    _ => GestureOutcome::None,
                }
            }
            _ => match pending.event {
                Some(event) => GestureOutcome::Click {
                    event,
                    rect: pending.rect,
                },
                None => GestureOutcome::None,
            },
        }
    }

    async fn commit<G: EventGateway>(
        &self,
        gateway: &G,
        id: i64,
        draft: &DraftEvent,
    ) -> GestureOutcome {
        let patch = EventPatch {
            start: draft.start,
            end: draft.end,
        };
        match gateway.update(id, &patch).await {
            Ok(updated) => {
                debug!("Committed event {} to {} - {}", id, patch.start, patch.end);
                GestureOutcome::Committed { event: updated }
            }
            Err(err) => {
                // Not retried; the caller's next refresh restores the last
                // persisted state.
                error!("Failed to update event {}: {:#}", id, err);
                GestureOutcome::CommitFailed { event_id: id }
            }
        }
    }

    fn promote(&mut self, pending: PendingGesture, projector: &dyn ScreenToGridProjector) {
        debug!("Gesture promoted to drag: {:?}", pending.kind);
        let anchor_minutes = match pending.kind {
            GestureKind::Create => pending.start_minutes as f32,
            _ => self
                .metrics
                .minutes_at_offset(projector.project(pending.pressed_at)),
        };

        // The first draft mirrors the press: a default-length window for
        // create, the untouched event window for move/resize.
        self.draft = match pending.kind {
            GestureKind::Create => {
                let start_m = pending.start_minutes;
                let end_m = clamp_minutes(start_m + self.settings.default_create_minutes);
                match (
                    datetime_at(pending.day, start_m),
                    datetime_at(pending.day, end_m),
                ) {
                    (Some(start), Some(end)) => Some(DraftEvent {
                        anchor_id: None,
                        title: DRAFT_TITLE.to_string(),
                        start,
                        end,
                    }),
                    _ => None,
                }
            }
            _ => pending.event.as_ref().map(|event| DraftEvent {
                anchor_id: event.id,
                title: event.title.clone(),
                start: event.start,
                end: event.end,
            }),
        };

        self.phase = Phase::Active(GestureState {
            kind: pending.kind,
            day: pending.day,
            anchor_event: pending.event,
            anchor_minutes,
        });
    }

    fn update_draft(
        &mut self,
        state: &GestureState,
        pointer: PointerPoint,
        projector: &dyn ScreenToGridProjector,
    ) {
        let snapped = self
            .metrics
            .tick_minutes_at_offset(projector.project(pointer));

        match state.kind {
            GestureKind::Create => {
                let anchor = state.anchor_minutes as i64;
                let start_m = anchor.min(snapped);
                let end_m = anchor.max(snapped);
                if let (Some(start), Some(end)) =
                    (datetime_at(state.day, start_m), datetime_at(state.day, end_m))
                {
                    self.draft = Some(DraftEvent {
                        anchor_id: None,
                        title: DRAFT_TITLE.to_string(),
                        start,
                        end,
                    });
                }
            }
            GestureKind::Move => {
                let Some(event) = state.anchor_event.as_ref() else {
                    return;
                };
                let duration = event.duration().num_minutes();
                let delta = (snapped as f32 - state.anchor_minutes).round() as i64;

                // Snap the start only; the end is re-derived from the
                // original duration so it never drifts. Arithmetic stays in
                // signed minutes-of-day so a drag above hour 0 clamps
                // instead of wrapping into the previous day.
                let shifted = minutes_of_day(event.start) + delta;
                let snapped_start = snap_minutes(shifted, self.settings.snap_minutes);
                let clamped_start = snapped_start.clamp(0, (MINUTES_PER_DAY - duration).max(0));

                if let Some(start) = datetime_at(event.start.date_naive(), clamped_start) {
                    self.draft = Some(DraftEvent {
                        anchor_id: event.id,
                        title: event.title.clone(),
                        start,
                        end: start + Duration::minutes(duration),
                    });
                }
            }
            GestureKind::ResizeEnd => {
                let Some(event) = state.anchor_event.as_ref() else {
                    return;
                };
                let start_m = minutes_of_day(event.start);
                let mut end_m = snapped;
                if end_m - start_m < self.settings.min_duration_minutes {
                    end_m = start_m + self.settings.min_duration_minutes;
                }
                if let Some(end) = datetime_at(event.start.date_naive(), end_m) {
                    self.draft = Some(DraftEvent {
                        anchor_id: event.id,
                        title: event.title.clone(),
                        start: event.start,
                        end,
                    });
                }
            }
            GestureKind::ResizeStart => {
                let Some(event) = state.anchor_event.as_ref() else {
                    return;
                };
                let end_m = minutes_of_day(event.end);
                let mut start_m = snapped;
                // Clamp by pulling the start back from the end, never by
                // pushing the end forward.
                if end_m - start_m < self.settings.min_duration_minutes {
                    start_m = end_m - self.settings.min_duration_minutes;
                }
                if let Some(start) = datetime_at(event.end.date_naive(), start_m) {
                    self.draft = Some(DraftEvent {
                        anchor_id: event.id,
                        title: event.title.clone(),
                        start,
                        end: event.end,
                    });
                }
            }
        }
    }
}
