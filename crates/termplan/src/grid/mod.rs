//! Schedule normalization and weekly-grid layout.

mod days;
mod layout;
mod render;

pub use days::{display_days, normalize_days, DayCode, DayToken};
pub use layout::{assign_lanes, parse_time_minutes, GridConfig, HourMark, LaneSlot};
pub use render::{DayColumn, SectionBlock, TableRow, WeekRenderModel};
