use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

use crate::models::{ScoredRecord, WorkloadLevel};

/// Score cutoffs for the two-sample comparison: days scoring at or below the
/// low cutoff vs days at or above the high cutoff.
pub const LOW_SCORE_CUTOFF: f64 = 3.0;
pub const HIGH_SCORE_CUTOFF: f64 = 8.0;

pub const CORRELATION_VARIABLES: [&str; 4] =
    ["Calories", "Workload_Score", "Exam_Count", "Homework_Count"];

#[derive(Debug, Clone)]
pub enum TestOutcome<T> {
    Computed(T),
    Skipped { reason: String },
}

#[derive(Debug, Clone)]
pub struct TTestResult {
    pub t_statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
    pub low_n: usize,
    pub high_n: usize,
}

#[derive(Debug, Clone)]
pub struct AnovaResult {
    pub f_statistic: f64,
    pub df_between: f64,
    pub df_within: f64,
    pub p_value: f64,
    pub group_sizes: Vec<usize>,
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(mean_of(values))
    }
}

fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// Unbiased (n-1) variance; callers guarantee len >= 2.
fn sample_variance_of(values: &[f64]) -> f64 {
    let m = mean_of(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Pearson correlation coefficient over paired samples. `None` when fewer
/// than two pairs exist or either side has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mx = mean_of(x);
    let my = mean_of(y);

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        covariance += (a - mx) * (b - my);
        var_x += (a - mx).powi(2);
        var_y += (b - my).powi(2);
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(covariance / (var_x * var_y).sqrt())
}

/// Welch's two-sample t-test (unequal variances), two-sided p-value.
/// Skipped with a diagnostic when either group has fewer than 2 samples.
pub fn welch_t_test(low: &[f64], high: &[f64]) -> TestOutcome<TTestResult> {
    if low.len() < 2 || high.len() < 2 {
        return TestOutcome::Skipped {
            reason: format!(
                "need at least 2 samples per group, got {} low and {} high",
                low.len(),
                high.len()
            ),
        };
    }

    let (n_low, n_high) = (low.len() as f64, high.len() as f64);
    let (var_low, var_high) = (sample_variance_of(low), sample_variance_of(high));
    let standard_error_sq = var_low / n_low + var_high / n_high;
    if standard_error_sq == 0.0 {
        return TestOutcome::Skipped {
            reason: "both groups have zero variance".to_string(),
        };
    }

    let t_statistic = (mean_of(low) - mean_of(high)) / standard_error_sq.sqrt();
    // Welch-Satterthwaite approximation.
    let degrees_of_freedom = standard_error_sq.powi(2)
        / ((var_low / n_low).powi(2) / (n_low - 1.0)
            + (var_high / n_high).powi(2) / (n_high - 1.0));

    let p_value = match StudentsT::new(0.0, 1.0, degrees_of_freedom) {
        Ok(distribution) => 2.0 * (1.0 - distribution.cdf(t_statistic.abs())),
        Err(_) => {
            return TestOutcome::Skipped {
                reason: format!("invalid degrees of freedom {degrees_of_freedom:.2}"),
            }
        }
    };

    TestOutcome::Computed(TTestResult {
        t_statistic,
        degrees_of_freedom,
        p_value,
        low_n: low.len(),
        high_n: high.len(),
    })
}

/// One-way ANOVA across the given groups. Skipped with a diagnostic when any
/// group has fewer than 2 samples or fewer than 2 groups are present.
pub fn one_way_anova(groups: &[Vec<f64>]) -> TestOutcome<AnovaResult> {
    let group_sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
    if groups.len() < 2 || group_sizes.iter().any(|&n| n < 2) {
        return TestOutcome::Skipped {
            reason: format!("need 2+ samples in every group, sizes are {group_sizes:?}"),
        };
    }

    let total_n: f64 = group_sizes.iter().sum::<usize>() as f64;
    let k = groups.len() as f64;
    let grand_mean =
        groups.iter().flatten().sum::<f64>() / total_n;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in groups {
        let group_mean = mean_of(group);
        ss_between += group.len() as f64 * (group_mean - grand_mean).powi(2);
        ss_within += group.iter().map(|v| (v - group_mean).powi(2)).sum::<f64>();
    }

    let df_between = k - 1.0;
    let df_within = total_n - k;
    if ss_within == 0.0 {
        return TestOutcome::Skipped {
            reason: "zero within-group variance".to_string(),
        };
    }

    let f_statistic = (ss_between / df_between) / (ss_within / df_within);
    let p_value = match FisherSnedecor::new(df_between, df_within) {
        Ok(distribution) => 1.0 - distribution.cdf(f_statistic),
        Err(_) => {
            return TestOutcome::Skipped {
                reason: format!("invalid degrees of freedom ({df_between:.0}, {df_within:.0})"),
            }
        }
    };

    TestOutcome::Computed(AnovaResult {
        f_statistic,
        df_between,
        df_within,
        p_value,
        group_sizes,
    })
}

/// Calories of the scoring extremes: (score <= low cutoff, score >= high
/// cutoff). Days without calorie data are excluded.
pub fn extreme_calorie_groups(records: &[ScoredRecord]) -> (Vec<f64>, Vec<f64>) {
    let mut low = Vec::new();
    let mut high = Vec::new();
    for record in records {
        let Some(calories) = record.calories else {
            continue;
        };
        if record.workload_score <= LOW_SCORE_CUTOFF {
            low.push(calories);
        } else if record.workload_score >= HIGH_SCORE_CUTOFF {
            high.push(calories);
        }
    }
    (low, high)
}

/// Calorie groups by workload level, Low/Medium/High order. Unclassified
/// days and days without calorie data are excluded.
pub fn level_calorie_groups(records: &[ScoredRecord]) -> Vec<Vec<f64>> {
    let levels = [
        WorkloadLevel::Low,
        WorkloadLevel::Medium,
        WorkloadLevel::High,
    ];
    levels
        .iter()
        .map(|level| {
            records
                .iter()
                .filter(|r| r.workload_level == Some(*level))
                .filter_map(|r| r.calories)
                .collect()
        })
        .collect()
}

/// Pairwise-complete correlation matrix over the core variables:
/// Calories, Workload_Score, Exam_Count, Homework_Count.
pub fn correlation_matrix(records: &[ScoredRecord]) -> Vec<Vec<Option<f64>>> {
    let columns: Vec<Vec<Option<f64>>> = vec![
        records.iter().map(|r| r.calories).collect(),
        records
            .iter()
            .map(|r| Some(r.workload_score))
            .collect(),
        records
            .iter()
            .map(|r| Some(f64::from(r.exam_count)))
            .collect(),
        records
            .iter()
            .map(|r| Some(f64::from(r.homework_count)))
            .collect(),
    ];

    let n = columns.len();
    let mut matrix = vec![vec![None; n]; n];
    for i in 0..n {
        for j in 0..n {
            let mut x = Vec::new();
            let mut y = Vec::new();
            for (a, b) in columns[i].iter().zip(columns[j].iter()) {
                if let (Some(a), Some(b)) = (a, b) {
                    x.push(*a);
                    y.push(*b);
                }
            }
            matrix[i][j] = if i == j && !x.is_empty() {
                Some(1.0)
            } else {
                pearson(&x, &y)
            };
        }
    }
    matrix
}
