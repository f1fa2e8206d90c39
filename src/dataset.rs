use serde::Serialize;
use std::collections::HashSet;

/// One record of the loaded CSV file.
///
/// The observation value is kept as raw text; numeric coercion happens in
/// the cleaning stage and rows that fail to parse are dropped there.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub country: String,
    pub indicator: String,
    pub time_period: String,
    pub value: String,
}

/// The full dataset held in process-wide state for the process lifetime.
///
/// Loaded once at startup and never mutated afterwards, so it can be shared
/// across requests without locking.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub rows: Vec<Observation>,
}

/// Distinct-count summary shown on the dashboard header.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct DataSummary {
    pub total_records: usize,
    pub countries: usize,
    pub time_periods: usize,
    pub indicators: usize,
}

impl Dataset {
    pub fn new(rows: Vec<Observation>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Summary statistics for the header tiles. An empty dataset reports
    /// zero across the board.
    pub fn summary(&self) -> DataSummary {
        let mut countries = HashSet::new();
        let mut time_periods = HashSet::new();
        let mut indicators = HashSet::new();

        for row in &self.rows {
            countries.insert(row.country.as_str());
            time_periods.insert(row.time_period.as_str());
            indicators.insert(row.indicator.as_str());
        }

        DataSummary {
            total_records: self.rows.len(),
            countries: countries.len(),
            time_periods: time_periods.len(),
            indicators: indicators.len(),
        }
    }
}
