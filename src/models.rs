use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the daily activity log, as it appears in the input CSV.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Course_Load_Min")]
    pub course_load_minutes: f64,
    #[serde(rename = "Homework_Count")]
    pub homework_count: u32,
    #[serde(rename = "Project_Count")]
    pub project_count: u32,
    #[serde(rename = "Exam_Count")]
    pub exam_count: u32,
    #[serde(rename = "Exam_Number_Week")]
    pub exam_number_week: u32,
    #[serde(rename = "Calories")]
    pub calories: Option<f64>,
}

/// ISO week-numbering key. Keyed by (ISO year, week) so that a log spanning a
/// year boundary never merges late-December with early-January records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WeekKey {
    pub iso_year: i32,
    pub week: u32,
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.iso_year, self.week)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyAggregate {
    pub week: WeekKey,
    pub exam_count_sum: u32,
    pub homework_count_sum: u32,
    pub project_count_sum: u32,
    pub fatigue_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Weekday => "Weekday",
            DayType::Weekend => "Weekend",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum WorkloadLevel {
    Low,
    Medium,
    High,
}

impl WorkloadLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadLevel::Low => "Low",
            WorkloadLevel::Medium => "Medium",
            WorkloadLevel::High => "High",
        }
    }
}

/// A fully scored day: the input fields plus every derived column.
/// `workload_level` is `None` when the score fell outside all level buckets
/// and the out-of-range policy keeps such days unclassified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub date: NaiveDate,
    pub day_of_week: &'static str,
    pub day_type: DayType,
    pub week: WeekKey,
    pub course_load_minutes: f64,
    pub homework_count: u32,
    pub project_count: u32,
    pub exam_count: u32,
    pub exam_number_week: u32,
    pub calories: Option<f64>,
    pub fatigue_factor: f64,
    pub base_workload: f64,
    pub workload_score: f64,
    pub workload_level: Option<WorkloadLevel>,
}
