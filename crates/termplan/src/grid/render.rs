//! Render-ready structures for the weekly calendar and tabular views.
//!
//! A [`WeekRenderModel`] is everything a view needs to draw a schedule:
//! five day columns of positioned blocks plus a flat table of all sections.
//! Sections the grid cannot place (bad times) stay in the table.

use serde::Serialize;

use crate::grid::days::{display_days, normalize_days, DayCode, DayToken};
use crate::grid::layout::{assign_lanes, parse_time_minutes, GridConfig, HourMark};
use crate::solver::{Schedule, Section};

/// A positioned section block within one day column.
#[derive(Debug, Clone, Serialize)]
pub struct SectionBlock {
    pub section_id: i64,
    pub course_code: String,
    pub section_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    pub start_time: String,
    pub end_time: String,
    /// Vertical offset in grid units.
    pub top: f64,
    /// Vertical extent in grid units.
    pub height: f64,
    /// Zero-based lane among time-coincident neighbors.
    pub lane: usize,
    /// Lanes in this block's overlap cluster; width is `column / lane_count`.
    pub lane_count: usize,
}

/// One weekday column of the calendar.
#[derive(Debug, Clone, Serialize)]
pub struct DayColumn {
    /// Wire code of the day (`M`..`F`).
    pub day: String,
    /// Display label (`Mon`..`Fri`).
    pub label: String,
    pub blocks: Vec<SectionBlock>,
}

/// One row of the tabular view. Every section of the schedule appears here,
/// renderable on the grid or not.
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub section_id: i64,
    pub course_code: String,
    pub course_title: String,
    pub section_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    pub days: String,
    pub time: String,
}

/// A complete, render-ready weekly schedule.
#[derive(Debug, Clone, Serialize)]
pub struct WeekRenderModel {
    pub total_credits: u32,
    pub grid_height: f64,
    pub hour_marks: Vec<HourMark>,
    pub days: Vec<DayColumn>,
    pub table: Vec<TableRow>,
}

impl WeekRenderModel {
    /// Builds the render model for one schedule.
    ///
    /// Day columns hold only sections that meet on that day and have a
    /// placeable time span; the table holds every section in course-list
    /// order. Time-coincident sections are kept separate and laned, never
    /// merged.
    pub fn build(schedule: &Schedule, grid: &GridConfig) -> Self {
        let normalized: Vec<(&Section, Vec<DayToken>)> = schedule
            .sections
            .iter()
            .map(|section| (section, normalize_days(section.days.as_ref())))
            .collect();

        let days = DayCode::ALL
            .iter()
            .map(|day| build_day_column(*day, &normalized, grid))
            .collect();

        let table = normalized
            .iter()
            .map(|(section, tokens)| TableRow {
                section_id: section.id,
                course_code: section.course.code.clone(),
                course_title: section.course.title.clone(),
                section_number: section.section_number.clone(),
                instructor: section.instructor.clone(),
                days: display_days(tokens),
                time: format!("{} - {}", section.start_time, section.end_time),
            })
            .collect();

        Self {
            total_credits: schedule.total_credits,
            grid_height: grid.total_height(),
            hour_marks: grid.hour_marks(),
            days,
            table,
        }
    }
}

fn build_day_column(
    day: DayCode,
    normalized: &[(&Section, Vec<DayToken>)],
    grid: &GridConfig,
) -> DayColumn {
    // Sections meeting this day that the grid can actually place.
    let mut placed: Vec<(&Section, f64, f64, (u32, u32))> = Vec::new();
    for (section, tokens) in normalized {
        if !tokens.contains(&DayToken::Day(day)) {
            continue;
        }
        let Some((top, height)) = grid.layout_span(&section.start_time, &section.end_time) else {
            continue;
        };
        // layout_span succeeded, so both parses succeed here too.
        let start = parse_time_minutes(&section.start_time).unwrap_or(0);
        let end = parse_time_minutes(&section.end_time).unwrap_or(start);
        placed.push((*section, top, height, (start, end)));
    }

    let spans: Vec<(u32, u32)> = placed.iter().map(|(_, _, _, span)| *span).collect();
    let slots = assign_lanes(&spans);

    let blocks = placed
        .into_iter()
        .zip(slots)
        .map(|((section, top, height, _), slot)| SectionBlock {
            section_id: section.id,
            course_code: section.course.code.clone(),
            section_number: section.section_number.clone(),
            instructor: section.instructor.clone(),
            start_time: section.start_time.clone(),
            end_time: section.end_time.clone(),
            top,
            height,
            lane: slot.lane,
            lane_count: slot.lane_count,
        })
        .collect();

    DayColumn {
        day: day.code().to_string(),
        label: day.label().to_string(),
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{Course, DaysField};

    fn course(id: i64, code: &str, credits: u32) -> Course {
        Course {
            id,
            code: code.to_string(),
            title: format!("{code} title"),
            credits,
        }
    }

    fn section(id: i64, days: DaysField, start: &str, end: &str) -> Section {
        Section {
            id,
            course: course(id * 10, "CSCI-210", 3),
            section_number: format!("{id:02}"),
            instructor: None,
            days: Some(days),
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    fn day_column<'a>(model: &'a WeekRenderModel, code: &str) -> &'a DayColumn {
        model.days.iter().find(|d| d.day == code).unwrap()
    }

    #[test]
    fn test_sections_land_on_their_days() {
        let schedule = Schedule {
            total_credits: 7,
            sections: vec![
                section(1, DaysField::List(vec!["M".into(), "W".into()]), "09:00", "10:00"),
                section(2, DaysField::Text("T,Th".into()), "11:00", "12:15"),
            ],
        };
        let model = WeekRenderModel::build(&schedule, &GridConfig::default());

        assert_eq!(model.total_credits, 7);
        assert_eq!(day_column(&model, "M").blocks.len(), 1);
        assert_eq!(day_column(&model, "W").blocks.len(), 1);
        assert_eq!(day_column(&model, "T").blocks.len(), 1);
        assert_eq!(day_column(&model, "Th").blocks.len(), 1);
        assert!(day_column(&model, "F").blocks.is_empty());

        let monday = &day_column(&model, "M").blocks[0];
        assert_eq!(monday.top, 50.0);
        assert_eq!(monday.height, 50.0);
    }

    #[test]
    fn test_unrenderable_section_kept_in_table_only() {
        // End before start: off the grid, still listed.
        let schedule = Schedule {
            total_credits: 3,
            sections: vec![section(1, DaysField::Text("M".into()), "10:00", "09:00")],
        };
        let model = WeekRenderModel::build(&schedule, &GridConfig::default());

        assert!(model.days.iter().all(|d| d.blocks.is_empty()));
        assert_eq!(model.table.len(), 1);
        assert_eq!(model.table[0].days, "Mon");
        assert_eq!(model.table[0].time, "10:00 - 09:00");
    }

    #[test]
    fn test_unparsable_time_kept_in_table_only() {
        let schedule = Schedule {
            total_credits: 3,
            sections: vec![section(1, DaysField::Text("W".into()), "noon", "13:00")],
        };
        let model = WeekRenderModel::build(&schedule, &GridConfig::default());

        assert!(day_column(&model, "W").blocks.is_empty());
        assert_eq!(model.table.len(), 1);
    }

    #[test]
    fn test_table_preserves_course_list_order() {
        let schedule = Schedule {
            total_credits: 6,
            sections: vec![
                section(5, DaysField::Text("F".into()), "14:00", "15:00"),
                section(2, DaysField::Text("M".into()), "09:00", "10:00"),
            ],
        };
        let model = WeekRenderModel::build(&schedule, &GridConfig::default());
        let ids: Vec<i64> = model.table.iter().map(|r| r.section_id).collect();
        assert_eq!(ids, [5, 2]);
    }

    #[test]
    fn test_coincident_sections_are_laned_not_merged() {
        let schedule = Schedule {
            total_credits: 6,
            sections: vec![
                section(1, DaysField::Text("M".into()), "09:00", "10:00"),
                section(2, DaysField::Text("M".into()), "09:30", "10:30"),
            ],
        };
        let model = WeekRenderModel::build(&schedule, &GridConfig::default());
        let blocks = &day_column(&model, "M").blocks;

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lane, 0);
        assert_eq!(blocks[1].lane, 1);
        assert!(blocks.iter().all(|b| b.lane_count == 2));
    }

    #[test]
    fn test_empty_schedule_renders_empty_model() {
        let schedule = Schedule {
            total_credits: 0,
            sections: Vec::new(),
        };
        let model = WeekRenderModel::build(&schedule, &GridConfig::default());
        assert!(model.table.is_empty());
        assert_eq!(model.days.len(), 5);
        assert!(model.days.iter().all(|d| d.blocks.is_empty()));
    }
}
