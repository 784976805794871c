use serde::{Deserialize, Serialize};

/// Shared layout constants.
///
/// Grid-line drawing and task-rectangle computation must read the same
/// values, or bars drift off their day columns; both go through
/// [`DateGrid`](super::grid::DateGrid), which captures a copy of this
/// config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Width of one day column, at scale 1.0.
    pub day_width: f32,
    /// Height of one lane row, including spacing around the bar.
    pub lane_height: f32,
    /// Height of a task bar inside its lane.
    pub bar_height: f32,
    /// Outer padding around the whole chart content.
    pub padding: f32,
    /// Horizontal space reserved left of the grid for labels.
    pub left_label_area: f32,
    /// Bars never render narrower than this, regardless of duration.
    pub min_bar_width: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub default_zoom: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            day_width: 26.0,
            lane_height: 30.0,
            bar_height: 20.0,
            padding: 8.0,
            left_label_area: 160.0,
            min_bar_width: 6.0,
            min_zoom: 0.25,
            max_zoom: 4.0,
            default_zoom: 1.0,
        }
    }
}
