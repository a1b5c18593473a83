use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use log::info;

use crate::models::DailyRecord;

pub fn load_records(path: &Path) -> anyhow::Result<Vec<DailyRecord>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let records = read_records(file)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    info!("loaded {} daily records from {}", records.len(), path.display());
    Ok(records)
}

pub fn read_records<R: Read>(reader: R) -> anyhow::Result<Vec<DailyRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<DailyRecord>().enumerate() {
        let record = row.with_context(|| format!("invalid record on data row {}", index + 1))?;
        records.push(record);
    }

    Ok(records)
}

/// Fills missing calorie values with the mean of the present ones. Returns
/// how many values were filled; a no-op when no calories are recorded at all.
pub fn impute_missing_calories(records: &mut [DailyRecord]) -> usize {
    let present: Vec<f64> = records.iter().filter_map(|r| r.calories).collect();
    if present.is_empty() {
        return 0;
    }
    let mean = present.iter().sum::<f64>() / present.len() as f64;

    let mut filled = 0;
    for record in records.iter_mut() {
        if record.calories.is_none() {
            record.calories = Some(mean);
            filled += 1;
        }
    }
    filled
}
