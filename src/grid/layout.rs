// Layout engine
// Resolves a day's timed events into non-overlapping visual columns

use chrono::NaiveDate;

use crate::grid::gesture::DraftEvent;
use crate::grid::time::{minutes_of_day, GridMetrics};
use crate::models::event::Event;

/// An event with its computed geometry in the day column.
///
/// `top`/`height` are pixels from 00:00; `left_fraction`/`width_fraction`
/// are horizontal fractions of the column width in `[0, 1]`. Derived data:
/// recomputed from the event set on every render, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedEvent {
    pub event: Event,
    pub top: f32,
    pub height: f32,
    pub left_fraction: f32,
    pub width_fraction: f32,
}

/// Lay out the timed events of a single day.
///
/// Events are filtered to those starting on `day` (all-day events live in a
/// separate ribbon and are excluded), sorted by start time, positioned
/// vertically, then clustered into overlap groups that share the column
/// width equally.
///
/// Pure and deterministic: identical input yields identical output.
pub fn position_events(
    events: &[Event],
    day: NaiveDate,
    metrics: &GridMetrics,
) -> Vec<PositionedEvent> {
    let mut day_events: Vec<&Event> = events
        .iter()
        .filter(|e| e.start.date_naive() == day && !e.all_day)
        .collect();
    // Stable sort keeps original order for identical starts, which keeps
    // column assignment deterministic.
    day_events.sort_by_key(|e| e.start);

    if day_events.is_empty() {
        return Vec::new();
    }

    let mut positioned: Vec<PositionedEvent> = day_events
        .into_iter()
        .map(|event| {
            let start_min = minutes_of_day(event.start) as f32;
            let end_min = minutes_of_day(event.end) as f32;
            let top = metrics.offset_for_minutes(start_min);
            let height = metrics
                .offset_for_minutes(end_min - start_min)
                .max(metrics.min_event_height);
            PositionedEvent {
                event: event.clone(),
                top,
                height,
                left_fraction: 0.0,
                width_fraction: 1.0,
            }
        })
        .collect();

    let spans: Vec<(f32, f32)> = positioned.iter().map(|p| (p.top, p.height)).collect();
    for group in overlap_groups(&spans) {
        let width = 1.0 / group.len() as f32;
        for (index, &member) in group.iter().enumerate() {
            positioned[member].left_fraction = index as f32 * width;
            positioned[member].width_fraction = width;
        }
    }

    positioned
}

/// Cluster vertical spans `(top, height)` into overlap groups.
///
/// Single-pass greedy clustering: each span joins the first existing group
/// it overlaps with, in input order. This can over-merge chains of
/// transitively-overlapping spans into one wide group; that is the intended
/// layout, kept deliberately in place of exact interval-graph coloring
/// because consumers depend on the resulting column widths.
pub fn overlap_groups(spans: &[(f32, f32)]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for (index, &(top, height)) in spans.iter().enumerate() {
        let joined = groups.iter_mut().find(|group| {
            group.iter().any(|&other| {
                let (other_top, other_height) = spans[other];
                top < other_top + other_height && top + height > other_top
            })
        });

        match joined {
            Some(group) => group.push(index),
            None => groups.push(vec![index]),
        }
    }

    groups
}

/// Build the render set for a day, substituting the active draft.
///
/// A creation draft is appended as a synthetic id-less event; a move/resize
/// draft shadows its anchor by id, replacing only the time window.
pub fn substitute_draft(
    events: &[Event],
    draft: Option<&DraftEvent>,
    day: NaiveDate,
) -> Vec<Event> {
    let Some(draft) = draft else {
        return events.to_vec();
    };

    match draft.anchor_id {
        None => {
            let mut display = events.to_vec();
            if draft.start.date_naive() == day {
                display.push(draft.to_new_event());
            }
            display
        }
        Some(id) => events
            .iter()
            .map(|event| {
                if event.id == Some(id) {
                    let mut shadowed = event.clone();
                    shadowed.start = draft.start;
                    shadowed.end = draft.end;
                    shadowed
                } else {
                    event.clone()
                }
            })
            .collect(),
    }
}
