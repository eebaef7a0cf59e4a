// Settings module
// Tunable geometry and gesture thresholds for the time grid

use serde::{Deserialize, Serialize};

/// Grid geometry and gesture tuning.
///
/// Defaults reproduce the stock layout: 48 px per hour, 12 px creation
/// ticks (one tick = 15 minutes), 15-minute boundary snapping, and a
/// 5 px click-vs-drag threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Pixels per hour in the day column.
    pub hour_height: f32,
    /// Coarse pixel tick used while dragging the creation rectangle.
    pub tick_px: f32,
    /// Minute granularity for final move/resize boundaries.
    pub snap_minutes: i64,
    /// Shortest duration a resize gesture may produce.
    pub min_duration_minutes: i64,
    /// Pointer travel (px) before a press becomes a drag instead of a click.
    pub drag_threshold_px: f32,
    /// Height floor for very short events; cosmetic only.
    pub min_event_height: f32,
    /// Duration of the draft created by a plain click on an empty slot.
    pub default_create_minutes: i64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            hour_height: 48.0,
            tick_px: 12.0,
            snap_minutes: 15,
            min_duration_minutes: 15,
            drag_threshold_px: 5.0,
            min_event_height: 20.0,
            default_create_minutes: 30,
        }
    }
}

impl GridSettings {
    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.hour_height <= 0.0 {
            return Err("hour_height must be positive".to_string());
        }
        if self.tick_px <= 0.0 {
            return Err("tick_px must be positive".to_string());
        }
        if self.snap_minutes <= 0 {
            return Err("snap_minutes must be positive".to_string());
        }
        if self.min_duration_minutes <= 0 {
            return Err("min_duration_minutes must be positive".to_string());
        }
        if self.drag_threshold_px < 0.0 {
            return Err("drag_threshold_px cannot be negative".to_string());
        }
        if self.default_create_minutes <= 0 {
            return Err("default_create_minutes must be positive".to_string());
        }
        Ok(())
    }
}
