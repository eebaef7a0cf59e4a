// Integration tests for complete gesture flows
// Drives the controller with raw pointer sequences against an in-memory
// event store and checks what the store and the rendered layout end up as

mod fixtures;

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use pretty_assertions::assert_eq;

use daygrid::grid::controller::GridController;
use daygrid::grid::gesture::{GestureOutcome, ResizeEdge};
use daygrid::grid::projector::{OffsetProjector, PointerPoint, ScreenRect};
use daygrid::models::event::{Event, EventPatch};
use daygrid::models::settings::GridSettings;
use daygrid::services::event::EventGateway;

use fixtures::{at, grid_day, init_logging, timed_event, y};

/// In-memory event store that records calls and applies updates, or rejects
/// everything when `fail` is set.
struct MemoryStore {
    fail: bool,
    events: Mutex<Vec<Event>>,
    update_calls: Mutex<Vec<(i64, EventPatch)>>,
}

impl MemoryStore {
    fn with_events(events: Vec<Event>) -> Self {
        Self {
            fail: false,
            events: Mutex::new(events),
            update_calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(events: Vec<Event>) -> Self {
        Self {
            fail: true,
            ..Self::with_events(events)
        }
    }

    fn update_count(&self) -> usize {
        self.update_calls.lock().unwrap().len()
    }
}

impl EventGateway for MemoryStore {
    async fn list(&self) -> Result<Vec<Event>> {
        Ok(self.events.lock().unwrap().clone())
    }

    async fn create(&self, event: &Event) -> Result<Event> {
        if self.fail {
            return Err(anyhow!("server returned 500: boom"));
        }
        let mut events = self.events.lock().unwrap();
        let mut created = event.clone();
        created.id = Some(events.len() as i64 + 1);
        events.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, patch: &EventPatch) -> Result<Event> {
        self.update_calls.lock().unwrap().push((id, patch.clone()));
        if self.fail {
            return Err(anyhow!("server returned 500: boom"));
        }
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| e.id == Some(id))
            .ok_or_else(|| anyhow!("event {} not found", id))?;
        event.start = patch.start;
        event.end = patch.end;
        Ok(event.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        if self.fail {
            return Err(anyhow!("server returned 500: boom"));
        }
        self.events.lock().unwrap().retain(|e| e.id != Some(id));
        Ok(())
    }
}

fn controller() -> GridController {
    init_logging();
    GridController::new(GridSettings::default())
}

fn grid() -> OffsetProjector {
    OffsetProjector::default()
}

#[tokio::test]
async fn overlapping_events_share_the_column() {
    // 09:00-10:00 and 09:30-10:30 form one group of two
    let store = MemoryStore::with_events(vec![
        timed_event(1, "Standup", 540, 600),
        timed_event(2, "Planning", 570, 630),
    ]);
    let ctl = controller();

    let events = store.list().await.unwrap();
    let positioned = ctl.positioned_events(&events, grid_day());

    assert_eq!(positioned.len(), 2);
    assert_eq!(positioned[0].width_fraction, 0.5);
    assert_eq!(positioned[0].left_fraction, 0.0);
    assert_eq!(positioned[1].width_fraction, 0.5);
    assert_eq!(positioned[1].left_fraction, 0.5);
}

#[tokio::test]
async fn move_gesture_commits_and_store_reflects_it() {
    let store = MemoryStore::with_events(vec![timed_event(7, "Review", 540, 600)]);
    let mut ctl = controller();
    let events = store.list().await.unwrap();

    // Grab the event at 09:30, drag to 11:30
    ctl.on_event_pointer_down(
        PointerPoint::new(40.0, y(570.0)),
        &events[0],
        ScreenRect::default(),
    );
    ctl.on_pointer_move(PointerPoint::new(40.0, y(570.0) + 20.0), &grid());
    ctl.on_pointer_move(PointerPoint::new(40.0, y(690.0)), &grid());

    // Preview follows the pointer while the store is untouched
    let preview = ctl.positioned_events(&events, grid_day());
    assert_eq!(preview[0].top, y(660.0));
    assert_eq!(store.update_count(), 0);

    let outcome = ctl.on_pointer_up(&store).await;
    match outcome {
        GestureOutcome::Committed { event } => {
            assert_eq!(event.id, Some(7));
            assert_eq!(event.start, at(660));
            assert_eq!(event.end, at(720));
        }
        other => panic!("expected Committed, got {:?}", other),
    }

    // Refresh sees the moved event; the draft is gone
    assert!(ctl.draft().is_none());
    let refreshed = store.list().await.unwrap();
    let positioned = ctl.positioned_events(&refreshed, grid_day());
    assert_eq!(positioned[0].top, y(660.0));
    assert_eq!(positioned[0].event.start, at(660));
}

#[tokio::test]
async fn rejected_update_reverts_to_persisted_state() {
    // update() rejects -> no draft remains, next refresh shows the
    // pre-gesture positions
    let store = MemoryStore::failing(vec![timed_event(7, "Review", 540, 600)]);
    let mut ctl = controller();
    let events = store.list().await.unwrap();

    ctl.on_event_pointer_down(
        PointerPoint::new(40.0, y(570.0)),
        &events[0],
        ScreenRect::default(),
    );
    ctl.on_pointer_move(PointerPoint::new(40.0, y(570.0) + 20.0), &grid());
    ctl.on_pointer_move(PointerPoint::new(40.0, y(690.0)), &grid());

    let outcome = ctl.on_pointer_up(&store).await;
    assert_eq!(outcome, GestureOutcome::CommitFailed { event_id: 7 });
    assert_eq!(store.update_count(), 1);

    assert!(ctl.draft().is_none());
    let refreshed = store.list().await.unwrap();
    let positioned = ctl.positioned_events(&refreshed, grid_day());
    assert_eq!(positioned[0].top, y(540.0));
    assert_eq!(positioned[0].event.start, at(540));
}

#[tokio::test]
async fn create_drag_lands_on_tick_boundaries() {
    // Drag-create from 10:05 to 10:22 with 12 px ticks
    let store = MemoryStore::with_events(Vec::new());
    let mut ctl = controller();

    ctl.on_day_pointer_down(PointerPoint::new(40.0, y(605.0)), grid_day(), &grid());
    ctl.on_pointer_move(PointerPoint::new(40.0, y(605.0) + 10.0), &grid());
    ctl.on_pointer_move(PointerPoint::new(40.0, y(622.0)), &grid());

    // The creation draft renders in the day even though nothing is stored
    let positioned = ctl.positioned_events(&[], grid_day());
    assert_eq!(positioned.len(), 1);
    assert_eq!(positioned[0].event.id, None);

    let outcome = ctl.on_pointer_up(&store).await;
    assert_eq!(
        outcome,
        GestureOutcome::CreateRequest {
            start: at(600),
            end: at(615)
        }
    );
    // The dialog owns the create call; the gesture made no store calls
    assert_eq!(store.update_count(), 0);
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn dialog_follows_up_create_request_through_gateway() {
    let store = MemoryStore::with_events(Vec::new());
    let mut ctl = controller();

    ctl.on_day_pointer_down(PointerPoint::new(40.0, y(605.0)), grid_day(), &grid());
    ctl.on_pointer_move(PointerPoint::new(40.0, y(605.0) + 10.0), &grid());
    ctl.on_pointer_move(PointerPoint::new(40.0, y(680.0)), &grid());

    let GestureOutcome::CreateRequest { start, end } = ctl.on_pointer_up(&store).await else {
        panic!("expected CreateRequest");
    };

    // What the dialog collaborator would do with the handed-off window
    let draft = Event::new("1:1 with Sam", start, end).unwrap();
    let created = store.create(&draft).await.unwrap();
    assert_eq!(created.id, Some(1));

    let refreshed = store.list().await.unwrap();
    let positioned = ctl.positioned_events(&refreshed, grid_day());
    assert_eq!(positioned.len(), 1);
    assert_eq!(positioned[0].event.title, "1:1 with Sam");
}

#[tokio::test]
async fn resize_below_minimum_clamps_to_fifteen_minutes() {
    // A resize-end drag that would produce 5 minutes
    let store = MemoryStore::with_events(vec![timed_event(3, "Focus", 540, 600)]);
    let mut ctl = controller();
    let events = store.list().await.unwrap();

    ctl.on_resize_pointer_down(
        PointerPoint::new(40.0, y(600.0)),
        &events[0],
        ResizeEdge::End,
    );
    ctl.on_pointer_move(PointerPoint::new(40.0, y(600.0) - 20.0), &grid());
    ctl.on_pointer_move(PointerPoint::new(40.0, y(545.0)), &grid());

    let outcome = ctl.on_pointer_up(&store).await;
    match outcome {
        GestureOutcome::Committed { event } => {
            assert_eq!(event.start, at(540));
            assert_eq!(event.end, at(555));
        }
        other => panic!("expected Committed, got {:?}", other),
    }

    let refreshed = store.list().await.unwrap();
    assert_eq!(refreshed[0].duration(), chrono::Duration::minutes(15));
}

#[tokio::test]
async fn sub_threshold_press_is_a_click_not_a_gesture() {
    let store = MemoryStore::with_events(vec![timed_event(1, "Standup", 540, 600)]);
    let mut ctl = controller();
    let events = store.list().await.unwrap();
    let rect = ScreenRect {
        left: 60.0,
        top: y(540.0),
        width: 180.0,
        height: 48.0,
    };

    ctl.on_event_pointer_down(PointerPoint::new(70.0, y(560.0)), &events[0], rect);
    // 3 px of travel stays under the 5 px threshold
    ctl.on_pointer_move(PointerPoint::new(73.0, y(560.0)), &grid());
    assert!(ctl.draft().is_none());

    let outcome = ctl.on_pointer_up(&store).await;
    assert_eq!(
        outcome,
        GestureOutcome::Click {
            event: events[0].clone(),
            rect: Some(rect)
        }
    );
    assert_eq!(store.update_count(), 0);
    // A click never arms the drag suppression flag
    assert!(!ctl.suppress_click());
}

#[tokio::test]
async fn completed_drag_suppresses_the_release_click_once() {
    let store = MemoryStore::with_events(vec![timed_event(7, "Review", 540, 600)]);
    let mut ctl = controller();
    let events = store.list().await.unwrap();

    ctl.on_event_pointer_down(
        PointerPoint::new(40.0, y(570.0)),
        &events[0],
        ScreenRect::default(),
    );
    ctl.on_pointer_move(PointerPoint::new(40.0, y(570.0) + 20.0), &grid());
    ctl.on_pointer_up(&store).await;

    assert!(ctl.last_gesture_was_drag());
    assert!(ctl.suppress_click());
    // Cleared synchronously by the consuming click, not by a timer
    assert!(!ctl.suppress_click());
}
