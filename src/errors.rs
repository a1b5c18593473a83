use chrono::NaiveDate;
use thiserror::Error;

use crate::models::WeekKey;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("missing weekly aggregate for week {week}")]
    MissingAggregate { week: WeekKey },

    #[error("workload score {score:.2} on {date} falls outside every level bucket")]
    UnclassifiableScore { date: NaiveDate, score: f64 },
}
