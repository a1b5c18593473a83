use std::fmt::Write;

use crate::models::{DayType, ScoredRecord, WorkloadLevel};
use crate::stats::{self, TestOutcome};
use crate::workload::ScoredLog;

const DAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub fn build_report(log: &ScoredLog) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Workload-Calorie Correlation Report");
    if log.records.is_empty() {
        let _ = writeln!(output, "No records in the log.");
        return output;
    }

    let first = log.records.iter().map(|r| r.date).min().unwrap_or_default();
    let last = log.records.iter().map(|r| r.date).max().unwrap_or_default();
    let _ = writeln!(
        output,
        "{} days from {} to {}",
        log.records.len(),
        first,
        last
    );

    write_weekly_fatigue(&mut output, log);
    write_level_summary(&mut output, &log.records);
    write_day_patterns(&mut output, &log.records);
    write_weekly_calories(&mut output, log);
    write_correlations(&mut output, &log.records);
    write_hypothesis_tests(&mut output, &log.records);

    output
}

fn write_weekly_fatigue(output: &mut String, log: &ScoredLog) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekly Fatigue");

    for week in &log.weeks {
        let _ = writeln!(
            output,
            "- {}: {} exams, {} homework, {} projects -> fatigue factor {:.2}",
            week.week,
            week.exam_count_sum,
            week.homework_count_sum,
            week.project_count_sum,
            week.fatigue_factor
        );
    }
}

fn write_level_summary(output: &mut String, records: &[ScoredRecord]) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## Workload Levels");

    for level in [
        WorkloadLevel::Low,
        WorkloadLevel::Medium,
        WorkloadLevel::High,
    ] {
        let days: Vec<&ScoredRecord> = records
            .iter()
            .filter(|r| r.workload_level == Some(level))
            .collect();
        let calories: Vec<f64> = days.iter().filter_map(|r| r.calories).collect();

        match stats::mean(&calories) {
            Some(avg) => {
                let _ = writeln!(
                    output,
                    "- {}: {} days, avg calories {:.1}",
                    level.as_str(),
                    days.len(),
                    avg
                );
            }
            None => {
                let _ = writeln!(
                    output,
                    "- {}: {} days, no calorie data",
                    level.as_str(),
                    days.len()
                );
            }
        }
    }

    let unclassified = records
        .iter()
        .filter(|r| r.workload_level.is_none())
        .count();
    if unclassified > 0 {
        let _ = writeln!(output, "- Unclassified: {unclassified} days");
    }
}

fn write_day_patterns(output: &mut String, records: &[ScoredRecord]) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## Day Patterns");

    for day_type in [DayType::Weekday, DayType::Weekend] {
        let days: Vec<&ScoredRecord> = records
            .iter()
            .filter(|r| r.day_type == day_type)
            .collect();
        let calories: Vec<f64> = days.iter().filter_map(|r| r.calories).collect();
        match stats::mean(&calories) {
            Some(avg) => {
                let _ = writeln!(
                    output,
                    "- {}: avg calories {:.1} across {} days",
                    day_type.as_str(),
                    avg,
                    days.len()
                );
            }
            None => {
                let _ = writeln!(
                    output,
                    "- {}: no calorie data across {} days",
                    day_type.as_str(),
                    days.len()
                );
            }
        }
    }

    for name in DAY_ORDER {
        let days: Vec<&ScoredRecord> =
            records.iter().filter(|r| r.day_of_week == name).collect();
        if days.is_empty() {
            continue;
        }
        let calories: Vec<f64> = days.iter().filter_map(|r| r.calories).collect();
        let scores: Vec<f64> = days.iter().map(|r| r.workload_score).collect();
        let calorie_label = match stats::mean(&calories) {
            Some(avg) => format!("{avg:.1}"),
            None => "n/a".to_string(),
        };
        let _ = writeln!(
            output,
            "- {}: avg calories {}, avg workload score {:.2}",
            name,
            calorie_label,
            stats::mean(&scores).unwrap_or(0.0)
        );
    }
}

fn write_weekly_calories(output: &mut String, log: &ScoredLog) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekly Average Calories");

    for week in &log.weeks {
        let calories: Vec<f64> = log
            .records
            .iter()
            .filter(|r| r.week == week.week)
            .filter_map(|r| r.calories)
            .collect();
        match stats::mean(&calories) {
            Some(avg) => {
                let _ = writeln!(output, "- {}: {:.1}", week.week, avg);
            }
            None => {
                let _ = writeln!(output, "- {}: no calorie data", week.week);
            }
        }
    }
}

fn write_correlations(output: &mut String, records: &[ScoredRecord]) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## Correlations");
    let _ = writeln!(output, "Pearson r, pairwise-complete observations.");
    let _ = writeln!(output);

    let matrix = stats::correlation_matrix(records);

    let mut header = String::from("| |");
    for name in stats::CORRELATION_VARIABLES {
        let _ = write!(header, " {name} |");
    }
    let _ = writeln!(output, "{header}");
    let _ = writeln!(
        output,
        "|---|{}",
        "---|".repeat(stats::CORRELATION_VARIABLES.len())
    );

    for (name, row) in stats::CORRELATION_VARIABLES.iter().zip(matrix.iter()) {
        let mut line = format!("| {name} |");
        for cell in row {
            match cell {
                Some(r) => {
                    let _ = write!(line, " {r:.2} |");
                }
                None => {
                    let _ = write!(line, " n/a |");
                }
            }
        }
        let _ = writeln!(output, "{line}");
    }
}

fn write_hypothesis_tests(output: &mut String, records: &[ScoredRecord]) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## Hypothesis Tests");

    let (low, high) = stats::extreme_calorie_groups(records);
    let _ = writeln!(
        output,
        "Welch t-test, calories of days scoring <= {:.0} vs >= {:.0}:",
        stats::LOW_SCORE_CUTOFF,
        stats::HIGH_SCORE_CUTOFF
    );
    match stats::welch_t_test(&low, &high) {
        TestOutcome::Computed(result) => {
            let _ = writeln!(
                output,
                "- t = {:.4}, df = {:.2}, p = {:.4} ({} low days, {} high days)",
                result.t_statistic,
                result.degrees_of_freedom,
                result.p_value,
                result.low_n,
                result.high_n
            );
        }
        TestOutcome::Skipped { reason } => {
            let _ = writeln!(output, "- skipped: {reason}");
        }
    }

    let _ = writeln!(
        output,
        "One-way ANOVA, calories across Low/Medium/High days:"
    );
    match stats::one_way_anova(&stats::level_calorie_groups(records)) {
        TestOutcome::Computed(result) => {
            let _ = writeln!(
                output,
                "- F = {:.4}, df = ({:.0}, {:.0}), p = {:.4} (group sizes {:?})",
                result.f_statistic,
                result.df_between,
                result.df_within,
                result.p_value,
                result.group_sizes
            );
        }
        TestOutcome::Skipped { reason } => {
            let _ = writeln!(output, "- skipped: {reason}");
        }
    }
}
