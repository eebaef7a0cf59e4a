// Time model
// Conversions between wall-clock time and vertical pixel offsets in a day column

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, Timelike};

use crate::models::settings::GridSettings;

/// Default pixels per hour.
pub const HOUR_HEIGHT: f32 = 48.0;
/// Total height of a 24-hour day column at the default scale.
pub const GRID_HEIGHT: f32 = 24.0 * HOUR_HEIGHT;
/// Minutes in one day; offsets are clamped so gestures cannot leave the column.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Pixel scale of one day column.
///
/// All conversions are pure arithmetic over the per-hour pixel constant and
/// the coarse creation tick; there are no error conditions for finite inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub hour_height: f32,
    pub tick_px: f32,
    /// Height floor for very short events; cosmetic, never affects stored
    /// durations.
    pub min_event_height: f32,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            hour_height: HOUR_HEIGHT,
            tick_px: 12.0,
            min_event_height: 20.0,
        }
    }
}

impl GridMetrics {
    pub fn from_settings(settings: &GridSettings) -> Self {
        Self {
            hour_height: settings.hour_height,
            tick_px: settings.tick_px,
            min_event_height: settings.min_event_height,
        }
    }

    /// Vertical offset (px) of a minutes-since-midnight value.
    pub fn offset_for_minutes(&self, minutes: f32) -> f32 {
        minutes / 60.0 * self.hour_height
    }

    /// Vertical offset (px) of a wall-clock time.
    pub fn offset_for_time(&self, time: NaiveTime) -> f32 {
        let minutes = (time.hour() * 60 + time.minute()) as f32;
        self.offset_for_minutes(minutes)
    }

    /// Minutes since midnight at a grid-local vertical offset. Unsnapped.
    pub fn minutes_at_offset(&self, offset: f32) -> f32 {
        offset / self.hour_height * 60.0
    }

    /// Minutes under the pointer, rounded to the nearest coarse tick and
    /// clamped to the day. Used while a drag is in flight.
    pub fn tick_minutes_at_offset(&self, offset: f32) -> i64 {
        let snapped = (offset / self.tick_px).round() * self.tick_px;
        clamp_minutes(self.minutes_at_offset(snapped).round() as i64)
    }

    /// Minutes under the pointer, floored to the previous tick. Used for the
    /// pointer-down anchor of a creation drag so the draft starts at the
    /// pressed slot rather than the nearest one.
    pub fn floor_tick_minutes_at_offset(&self, offset: f32) -> i64 {
        let snapped = (offset / self.tick_px).floor() * self.tick_px;
        clamp_minutes(self.minutes_at_offset(snapped).round() as i64)
    }
}

/// Round minutes to the nearest multiple of `granularity`. Idempotent.
pub fn snap_minutes(minutes: i64, granularity: i64) -> i64 {
    debug_assert!(granularity > 0);
    ((minutes as f64 / granularity as f64).round() as i64) * granularity
}

/// Clamp a minutes-since-midnight value into `[0, 1440]`.
pub fn clamp_minutes(minutes: i64) -> i64 {
    minutes.clamp(0, MINUTES_PER_DAY)
}

/// Local timestamp at `minutes` past midnight of `day`.
///
/// Minutes past 1440 roll into the next day (a resize clamped to the
/// minimum duration near midnight may land there). Returns `None` for
/// local times skipped by a DST transition.
pub fn datetime_at(day: NaiveDate, minutes: i64) -> Option<DateTime<Local>> {
    let midnight = day.and_hms_opt(0, 0, 0)?;
    midnight
        .and_local_timezone(Local)
        .single()
        .map(|dt| dt + Duration::minutes(minutes))
}

/// Minutes since midnight of a timestamp's own day.
pub fn minutes_of_day(dt: DateTime<Local>) -> i64 {
    (dt.time().hour() * 60 + dt.time().minute()) as i64
}
