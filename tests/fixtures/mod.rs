// Test fixtures - reusable test data
// Provides consistent grid days and events across test files

use chrono::{DateTime, Local, NaiveDate};
use daygrid::grid::time::datetime_at;
use daygrid::models::event::Event;

/// Route log output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fixed day every grid test runs against (a Monday).
pub fn grid_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

/// Local timestamp at `minutes` past midnight of the fixture day.
pub fn at(minutes: i64) -> DateTime<Local> {
    datetime_at(grid_day(), minutes).unwrap()
}

/// A stored timed event on the fixture day.
pub fn timed_event(id: i64, title: &str, start_min: i64, end_min: i64) -> Event {
    let mut event = Event::new(title, at(start_min), at(end_min)).unwrap();
    event.id = Some(id);
    event
}

/// Screen y for a grid minute at the default 48 px/hour scale, assuming an
/// identity projector.
pub fn y(minutes: f32) -> f32 {
    minutes / 60.0 * 48.0
}
