use std::fs::File;
use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;

use crate::models::ScoredRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

const HEADER: [&str; 9] = [
    "Date",
    "DayOfWeek",
    "DayType",
    "Week",
    "Weekly_Fatigue_Factor",
    "Daily_Base_Workload",
    "Workload_Score",
    "Workload_Level",
    "Calories",
];

/// Writes the scored table as CSV. Missing calories and unclassified levels
/// become empty cells.
pub fn write_csv(path: &Path, records: &[ScoredRecord]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record(&[
            record.date.to_string(),
            record.day_of_week.to_string(),
            record.day_type.as_str().to_string(),
            record.week.week.to_string(),
            record.fatigue_factor.to_string(),
            record.base_workload.to_string(),
            record.workload_score.to_string(),
            record
                .workload_level
                .map(|level| level.as_str())
                .unwrap_or("")
                .to_string(),
            record
                .calories
                .map(|c| c.to_string())
                .unwrap_or_default(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}

pub fn write_json(path: &Path, records: &[ScoredRecord]) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, records)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyRecord;
    use crate::workload::{score_log, OutOfRangePolicy};
    use chrono::NaiveDate;

    fn scored() -> Vec<ScoredRecord> {
        let records = vec![
            DailyRecord {
                date: NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
                course_load_minutes: 100.0,
                homework_count: 1,
                project_count: 0,
                exam_count: 1,
                exam_number_week: 1,
                calories: Some(2150.0),
            },
            DailyRecord {
                date: NaiveDate::from_ymd_opt(2025, 11, 4).unwrap(),
                course_load_minutes: 0.0,
                homework_count: 0,
                project_count: 0,
                exam_count: 0,
                exam_number_week: 0,
                calories: None,
            },
        ];
        score_log(&records, OutOfRangePolicy::Unclassified)
            .unwrap()
            .records
    }

    #[test]
    fn csv_round_trips_the_column_contract() {
        let dir = std::env::temp_dir().join("workload-correlation-export-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scored.csv");

        write_csv(&path, &scored()).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Date,DayOfWeek,DayType,Week,Weekly_Fatigue_Factor,\
             Daily_Base_Workload,Workload_Score,Workload_Level,Calories"
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("2025-11-03,Monday,Weekday,45,"));
        assert!(first.contains("Medium"));
        // Missing calories export as an empty trailing cell.
        let second = lines.next().unwrap();
        assert!(second.ends_with(","));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn json_export_keeps_derived_fields() {
        let dir = std::env::temp_dir().join("workload-correlation-export-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scored.json");

        write_json(&path, &scored()).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();

        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["workload_level"], "Medium");
        assert_eq!(parsed[0]["week"]["week"], 45);
        assert!(parsed[1]["calories"].is_null());

        std::fs::remove_file(&path).ok();
    }
}
