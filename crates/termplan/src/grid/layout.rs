//! Wall-clock time parsing and weekly-grid geometry.
//!
//! The grid is a linear mapping from minutes-since-midnight to vertical
//! layout units. Sections whose times cannot be placed are omitted from the
//! grid; they still appear in tabular views.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$").unwrap());

/// Parses `HH:MM` or `HH:MM:SS` text into minutes since midnight.
///
/// Seconds are accepted but ignored; the grid works at minute precision.
/// Returns `None` for anything malformed or out of range.
pub fn parse_time_minutes(text: &str) -> Option<u32> {
    let caps = TIME_REGEX.captures(text.trim())?;
    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Geometry of the weekly grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// First hour shown on the grid.
    pub start_hour: u32,
    /// Last hour shown on the grid.
    pub end_hour: u32,
    /// Vertical layout units per hour.
    pub hour_height: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 18,
            hour_height: 50.0,
        }
    }
}

/// An hour gridline, for drawing the time axis.
#[derive(Debug, Clone, Serialize)]
pub struct HourMark {
    pub label: String,
    pub offset: f64,
}

impl GridConfig {
    /// Layout units per minute.
    pub fn unit_per_minute(&self) -> f64 {
        self.hour_height / 60.0
    }

    /// Total height of a day column.
    pub fn total_height(&self) -> f64 {
        (self.end_hour.saturating_sub(self.start_hour) * 60) as f64 * self.unit_per_minute()
    }

    /// Gridlines for every full hour in the configured span.
    pub fn hour_marks(&self) -> Vec<HourMark> {
        (self.start_hour..=self.end_hour)
            .map(|hour| HourMark {
                label: format!("{hour:02}:00"),
                offset: ((hour - self.start_hour) * 60) as f64 * self.unit_per_minute(),
            })
            .collect()
    }

    /// Computes `(top, height)` for a section spanning `start`..`end`.
    ///
    /// Returns `None` when either time fails to parse or the span is not
    /// strictly positive; such a section is omitted from the grid. Spans
    /// outside the configured hour range are not clipped.
    pub fn layout_span(&self, start: &str, end: &str) -> Option<(f64, f64)> {
        let start_min = parse_time_minutes(start)?;
        let end_min = parse_time_minutes(end)?;
        if end_min <= start_min {
            return None;
        }

        let scale = self.unit_per_minute();
        let top = (start_min as f64 - (self.start_hour * 60) as f64) * scale;
        let height = (end_min - start_min) as f64 * scale;
        if height <= 0.0 {
            return None;
        }
        Some((top, height))
    }
}

/// Horizontal placement of a block among time-coincident neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LaneSlot {
    /// Zero-based lane within the overlap cluster.
    pub lane: usize,
    /// Number of lanes in the cluster; block width is `column / lane_count`.
    pub lane_count: usize,
}

/// Assigns lanes to time spans so overlapping blocks render side by side.
///
/// Sweep line over spans ordered by start time: each span takes the lowest
/// lane whose previous occupant has ended. Every span in an overlap cluster
/// shares the cluster's maximum concurrency as its `lane_count`.
pub fn assign_lanes(spans: &[(u32, u32)]) -> Vec<LaneSlot> {
    let mut order: Vec<usize> = (0..spans.len()).collect();
    order.sort_by_key(|&i| (spans[i].0, spans[i].1));

    let mut slots = vec![
        LaneSlot {
            lane: 0,
            lane_count: 1,
        };
        spans.len()
    ];
    // End minute of the latest block in each lane of the current cluster.
    let mut lane_busy_until: Vec<u32> = Vec::new();
    let mut cluster: Vec<usize> = Vec::new();
    let mut cluster_width = 0usize;

    for &idx in &order {
        let (start, end) = spans[idx];

        if !cluster.is_empty() && lane_busy_until.iter().all(|&until| until <= start) {
            // Every lane has drained: the cluster is complete.
            for &member in &cluster {
                slots[member].lane_count = cluster_width;
            }
            cluster.clear();
            cluster_width = 0;
            lane_busy_until.clear();
        }

        let lane = match lane_busy_until.iter().position(|&until| until <= start) {
            Some(free) => free,
            None => {
                lane_busy_until.push(0);
                lane_busy_until.len() - 1
            }
        };
        lane_busy_until[lane] = end;
        slots[idx].lane = lane;
        cluster.push(idx);
        cluster_width = cluster_width.max(lane + 1);
    }

    for &member in &cluster {
        slots[member].lane_count = cluster_width;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_minutes() {
        assert_eq!(parse_time_minutes("09:00"), Some(540));
        assert_eq!(parse_time_minutes("9:05"), Some(545));
        assert_eq!(parse_time_minutes("10:15:00"), Some(615));
        assert_eq!(parse_time_minutes(" 23:59 "), Some(1439));
    }

    #[test]
    fn test_parse_time_rejects_malformed() {
        assert_eq!(parse_time_minutes(""), None);
        assert_eq!(parse_time_minutes("noon"), None);
        assert_eq!(parse_time_minutes("24:00"), None);
        assert_eq!(parse_time_minutes("10:60"), None);
        assert_eq!(parse_time_minutes("10"), None);
        assert_eq!(parse_time_minutes("10:5"), None);
    }

    #[test]
    fn test_layout_span_is_linear() {
        // 50 units per hour starting at 08:00.
        let grid = GridConfig::default();
        let (top, height) = grid.layout_span("09:00", "10:15").unwrap();
        assert_eq!(top, 50.0);
        assert_eq!(height, 62.5);
    }

    #[test]
    fn test_layout_span_omits_inverted_and_zero_length() {
        let grid = GridConfig::default();
        assert_eq!(grid.layout_span("10:00", "09:00"), None);
        assert_eq!(grid.layout_span("10:00", "10:00"), None);
        assert_eq!(grid.layout_span("bogus", "10:00"), None);
        assert_eq!(grid.layout_span("09:00", ""), None);
    }

    #[test]
    fn test_layout_span_does_not_clip_out_of_range() {
        let grid = GridConfig::default();
        // Starts before the grid; top goes negative rather than clipping.
        let (top, _) = grid.layout_span("07:00", "09:00").unwrap();
        assert_eq!(top, -50.0);
    }

    #[test]
    fn test_hour_marks_span_grid() {
        let grid = GridConfig::default();
        let marks = grid.hour_marks();
        assert_eq!(marks.len(), 11);
        assert_eq!(marks[0].label, "08:00");
        assert_eq!(marks[0].offset, 0.0);
        assert_eq!(marks[10].label, "18:00");
        assert_eq!(marks[10].offset, grid.total_height());
    }

    #[test]
    fn test_assign_lanes_disjoint_spans_share_lane_zero() {
        let slots = assign_lanes(&[(540, 600), (600, 660), (720, 780)]);
        for slot in &slots {
            assert_eq!(slot.lane, 0);
            assert_eq!(slot.lane_count, 1);
        }
    }

    #[test]
    fn test_assign_lanes_overlap_pair() {
        let slots = assign_lanes(&[(540, 600), (570, 630)]);
        assert_eq!(slots[0], LaneSlot { lane: 0, lane_count: 2 });
        assert_eq!(slots[1], LaneSlot { lane: 1, lane_count: 2 });
    }

    #[test]
    fn test_assign_lanes_chained_cluster_reuses_freed_lane() {
        // A 9-10, B 9:30-10:30, C 10-11: C fits back into A's lane, but the
        // whole chain is one cluster two lanes wide.
        let slots = assign_lanes(&[(540, 600), (570, 630), (600, 660)]);
        assert_eq!(slots[0], LaneSlot { lane: 0, lane_count: 2 });
        assert_eq!(slots[1], LaneSlot { lane: 1, lane_count: 2 });
        assert_eq!(slots[2], LaneSlot { lane: 0, lane_count: 2 });
    }

    #[test]
    fn test_assign_lanes_identical_spans_stack() {
        let slots = assign_lanes(&[(540, 600), (540, 600), (540, 600)]);
        let lanes: Vec<usize> = slots.iter().map(|s| s.lane).collect();
        assert_eq!(lanes, [0, 1, 2]);
        assert!(slots.iter().all(|s| s.lane_count == 3));
    }

    #[test]
    fn test_assign_lanes_independent_clusters() {
        // Morning overlap pair, then a lone afternoon block.
        let slots = assign_lanes(&[(540, 600), (570, 630), (780, 840)]);
        assert_eq!(slots[2], LaneSlot { lane: 0, lane_count: 1 });
    }
}
