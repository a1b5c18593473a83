use std::collections::BTreeMap;

use clap::ValueEnum;
use log::debug;

use crate::calendar;
use crate::errors::ScoreError;
use crate::models::{DailyRecord, ScoredRecord, WeekKey, WeeklyAggregate, WorkloadLevel};

// Fixed model parameters, not configurable.
const EXAM_FATIGUE: f64 = 0.15;
const HOMEWORK_FATIGUE: f64 = 0.05;
const PROJECT_FATIGUE: f64 = 0.10;

const CLASS_UNIT_MINUTES: f64 = 50.0;
const HOMEWORK_EXAM_WEIGHT: f64 = 1.5;
const PROJECT_BASE_WEIGHT: f64 = 1.5;
const PROJECT_EXAM_WEIGHT: f64 = 2.0;
const EXAM_BASE_COST: f64 = 2.5;
const EXAM_NUMBER_COST: f64 = 0.7;
const TRIPLE_OVERLAP_BONUS: f64 = 2.0;

// Level buckets: lower edge exclusive, upper edge inclusive.
const LOW_FLOOR: f64 = -1.0;
const LOW_CEIL: f64 = 5.0;
const MEDIUM_CEIL: f64 = 12.0;
const HIGH_CEIL: f64 = 30.0;

/// What to do with a score that falls outside every level bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutOfRangePolicy {
    /// Keep the day but leave it unclassified.
    Unclassified,
    /// Clamp to the nearest bucket.
    Clamp,
    /// Fail the whole run.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredLog {
    pub records: Vec<ScoredRecord>,
    pub weeks: Vec<WeeklyAggregate>,
}

pub fn fatigue_factor(exam_sum: u32, homework_sum: u32, project_sum: u32) -> f64 {
    1.0 + EXAM_FATIGUE * f64::from(exam_sum)
        + HOMEWORK_FATIGUE * f64::from(homework_sum)
        + PROJECT_FATIGUE * f64::from(project_sum)
}

/// Groups the log by ISO week and sums the three academic load counts.
/// Weeks with no records are absent from the map, not present as zeros.
pub fn aggregate_weeks(records: &[DailyRecord]) -> BTreeMap<WeekKey, WeeklyAggregate> {
    let mut weeks: BTreeMap<WeekKey, WeeklyAggregate> = BTreeMap::new();

    for record in records {
        let key = calendar::week_key(record.date);
        let entry = weeks.entry(key).or_insert_with(|| WeeklyAggregate {
            week: key,
            exam_count_sum: 0,
            homework_count_sum: 0,
            project_count_sum: 0,
            fatigue_factor: 1.0,
        });
        entry.exam_count_sum += record.exam_count;
        entry.homework_count_sum += record.homework_count;
        entry.project_count_sum += record.project_count;
    }

    for aggregate in weeks.values_mut() {
        aggregate.fatigue_factor = fatigue_factor(
            aggregate.exam_count_sum,
            aggregate.homework_count_sum,
            aggregate.project_count_sum,
        );
        debug!(
            "week {}: fatigue factor {:.2}",
            aggregate.week, aggregate.fatigue_factor
        );
    }

    weeks
}

/// Daily base workload: a pure function of one record, five additive terms.
pub fn base_workload(record: &DailyRecord) -> f64 {
    let attendance = record.course_load_minutes / CLASS_UNIT_MINUTES;
    let homework = f64::from(record.homework_count)
        * if record.exam_count > 0 {
            HOMEWORK_EXAM_WEIGHT
        } else {
            1.0
        };
    let project = f64::from(record.project_count)
        * if record.exam_count > 0 {
            PROJECT_EXAM_WEIGHT
        } else {
            PROJECT_BASE_WEIGHT
        };
    let exam = f64::from(record.exam_count)
        * (EXAM_BASE_COST + EXAM_NUMBER_COST * f64::from(record.exam_number_week));
    let combo = if record.homework_count > 0 && record.project_count > 0 && record.exam_count > 0
    {
        TRIPLE_OVERLAP_BONUS
    } else {
        0.0
    };

    attendance + homework + project + exam + combo
}

pub fn classify(score: f64) -> Option<WorkloadLevel> {
    if score <= LOW_FLOOR {
        None
    } else if score <= LOW_CEIL {
        Some(WorkloadLevel::Low)
    } else if score <= MEDIUM_CEIL {
        Some(WorkloadLevel::Medium)
    } else if score <= HIGH_CEIL {
        Some(WorkloadLevel::High)
    } else {
        None
    }
}

/// Runs the full scoring pipeline over the log: weekly aggregation, per-day
/// base workload, score composition, and level classification.
pub fn score_log(
    records: &[DailyRecord],
    policy: OutOfRangePolicy,
) -> Result<ScoredLog, ScoreError> {
    let weeks = aggregate_weeks(records);
    let mut scored = Vec::with_capacity(records.len());

    for record in records {
        let key = calendar::week_key(record.date);
        let aggregate = weeks
            .get(&key)
            .ok_or(ScoreError::MissingAggregate { week: key })?;

        let base = base_workload(record);
        let score = base * aggregate.fatigue_factor;
        let level = match classify(score) {
            Some(level) => Some(level),
            None => match policy {
                OutOfRangePolicy::Unclassified => None,
                OutOfRangePolicy::Clamp => Some(if score > HIGH_CEIL {
                    WorkloadLevel::High
                } else {
                    WorkloadLevel::Low
                }),
                OutOfRangePolicy::Error => {
                    return Err(ScoreError::UnclassifiableScore {
                        date: record.date,
                        score,
                    })
                }
            },
        };

        scored.push(ScoredRecord {
            date: record.date,
            day_of_week: calendar::day_name(record.date),
            day_type: calendar::day_type(record.date),
            week: key,
            course_load_minutes: record.course_load_minutes,
            homework_count: record.homework_count,
            project_count: record.project_count,
            exam_count: record.exam_count,
            exam_number_week: record.exam_number_week,
            calories: record.calories,
            fatigue_factor: aggregate.fatigue_factor,
            base_workload: base,
            workload_score: score,
            workload_level: level,
        });
    }

    Ok(ScoredLog {
        records: scored,
        weeks: weeks.into_values().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(
        date: &str,
        minutes: f64,
        homework: u32,
        projects: u32,
        exams: u32,
        exam_number_week: u32,
    ) -> DailyRecord {
        DailyRecord {
            date: date.parse::<NaiveDate>().unwrap(),
            course_load_minutes: minutes,
            homework_count: homework,
            project_count: projects,
            exam_count: exams,
            exam_number_week,
            calories: Some(2200.0),
        }
    }

    #[test]
    fn exam_day_scenario() {
        // One exam day alone in its week: fatigue 1.20, base 6.7, score 8.04.
        let records = vec![record("2025-11-03", 100.0, 1, 0, 1, 1)];
        let log = score_log(&records, OutOfRangePolicy::Unclassified).unwrap();

        assert_eq!(log.weeks.len(), 1);
        assert!((log.weeks[0].fatigue_factor - 1.20).abs() < 1e-9);

        let day = &log.records[0];
        assert!((day.base_workload - 6.7).abs() < 1e-9);
        assert!((day.workload_score - 8.04).abs() < 1e-9);
        assert_eq!(day.workload_level, Some(WorkloadLevel::Medium));
        assert_eq!(day.day_of_week, "Monday");
    }

    #[test]
    fn empty_day_scores_zero_and_low() {
        let records = vec![record("2025-11-04", 0.0, 0, 0, 0, 0)];
        let log = score_log(&records, OutOfRangePolicy::Unclassified).unwrap();

        let day = &log.records[0];
        assert_eq!(day.fatigue_factor, 1.0);
        assert_eq!(day.base_workload, 0.0);
        assert_eq!(day.workload_score, 0.0);
        assert_eq!(day.workload_level, Some(WorkloadLevel::Low));
    }

    #[test]
    fn triple_overlap_adds_the_combo_bonus() {
        let with_combo = record("2025-11-05", 0.0, 1, 1, 1, 1);
        let without_combo = record("2025-11-05", 0.0, 1, 0, 1, 1);

        // hw 1.5 + project 2.0 + exam 3.2 + combo 2.0
        assert!((base_workload(&with_combo) - 8.7).abs() < 1e-9);
        // hw 1.5 + exam 3.2
        assert!((base_workload(&without_combo) - 4.7).abs() < 1e-9);
    }

    #[test]
    fn homework_and_projects_weigh_more_under_exams() {
        let quiet = record("2025-11-05", 0.0, 2, 1, 0, 0);
        assert!((base_workload(&quiet) - (2.0 + 1.5)).abs() < 1e-9);
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(classify(-1.0), None);
        assert_eq!(classify(0.0), Some(WorkloadLevel::Low));
        assert_eq!(classify(5.0), Some(WorkloadLevel::Low));
        assert_eq!(classify(5.0001), Some(WorkloadLevel::Medium));
        assert_eq!(classify(12.0), Some(WorkloadLevel::Medium));
        assert_eq!(classify(12.0001), Some(WorkloadLevel::High));
        assert_eq!(classify(30.0), Some(WorkloadLevel::High));
        assert_eq!(classify(30.0001), None);
    }

    #[test]
    fn out_of_range_policies() {
        // 2000 minutes alone: base 40, fatigue 1.0, score 40 > 30.
        let records = vec![record("2025-11-06", 2000.0, 0, 0, 0, 0)];

        let kept = score_log(&records, OutOfRangePolicy::Unclassified).unwrap();
        assert_eq!(kept.records[0].workload_level, None);

        let clamped = score_log(&records, OutOfRangePolicy::Clamp).unwrap();
        assert_eq!(clamped.records[0].workload_level, Some(WorkloadLevel::High));

        let failed = score_log(&records, OutOfRangePolicy::Error);
        assert!(matches!(
            failed,
            Err(ScoreError::UnclassifiableScore { .. })
        ));
    }

    #[test]
    fn fatigue_sums_span_the_whole_week() {
        let records = vec![
            record("2025-11-03", 50.0, 2, 0, 1, 1),
            record("2025-11-05", 50.0, 1, 1, 0, 0),
            record("2025-11-10", 50.0, 0, 0, 0, 0),
        ];
        let log = score_log(&records, OutOfRangePolicy::Unclassified).unwrap();

        assert_eq!(log.weeks.len(), 2);
        let first = &log.weeks[0];
        assert_eq!(first.exam_count_sum, 1);
        assert_eq!(first.homework_count_sum, 3);
        assert_eq!(first.project_count_sum, 1);
        // 1 + 0.15 + 3*0.05 + 0.10
        assert!((first.fatigue_factor - 1.40).abs() < 1e-9);
        assert_eq!(log.weeks[1].fatigue_factor, 1.0);

        // Both days of the first week share its factor.
        assert_eq!(log.records[0].fatigue_factor, log.records[1].fatigue_factor);
    }

    #[test]
    fn score_composition_and_non_negativity_hold() {
        let records = vec![
            record("2025-11-03", 120.0, 3, 1, 2, 2),
            record("2025-11-04", 0.0, 0, 0, 0, 0),
            record("2025-11-08", 200.0, 1, 2, 0, 0),
        ];
        let log = score_log(&records, OutOfRangePolicy::Unclassified).unwrap();

        for day in &log.records {
            assert!(day.workload_score >= 0.0);
            assert_eq!(day.workload_score, day.base_workload * day.fatigue_factor);
        }
        for week in &log.weeks {
            assert!(week.fatigue_factor >= 1.0);
        }
    }

    #[test]
    fn year_boundary_weeks_do_not_merge() {
        let records = vec![
            record("2024-12-30", 50.0, 0, 0, 1, 1),
            record("2025-12-29", 50.0, 0, 0, 1, 1),
        ];
        let log = score_log(&records, OutOfRangePolicy::Unclassified).unwrap();

        assert_eq!(log.weeks.len(), 2);
        assert!((log.weeks[0].fatigue_factor - 1.15).abs() < 1e-9);
        assert!((log.weeks[1].fatigue_factor - 1.15).abs() < 1e-9);
    }

    #[test]
    fn scoring_is_deterministic() {
        let records = vec![
            record("2025-11-03", 100.0, 1, 0, 1, 1),
            record("2025-11-08", 150.0, 2, 1, 0, 0),
        ];
        let first = score_log(&records, OutOfRangePolicy::Unclassified).unwrap();
        let second = score_log(&records, OutOfRangePolicy::Unclassified).unwrap();
        assert_eq!(first, second);
    }
}
