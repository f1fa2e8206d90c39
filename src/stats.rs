use crate::dataset::Dataset;
use std::collections::BTreeMap;

/// One observation that survived cleaning: finite numeric value, non-empty
/// trimmed country.
#[derive(Clone, Debug, PartialEq)]
pub struct CleanRow {
    pub country: String,
    pub time_period: String,
    pub value: f64,
}

/// Bar-chart aggregate: mean observation value per country.
#[derive(Clone, Debug, PartialEq)]
pub struct CountryMean {
    pub country: String,
    pub mean: f64,
}

/// Box-plot aggregate: five-number summary plus mean and spread, with
/// 1.5×IQR whiskers clipped to the observed extremes.
#[derive(Clone, Debug, PartialEq)]
pub struct CountryStats {
    pub country: String,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub iqr: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
}

/// One country's line across the ordinal time-period axis. `values` is
/// aligned to the shared period list; `None` marks periods without a valid
/// observation for this country.
#[derive(Clone, Debug, PartialEq)]
pub struct CountrySeries {
    pub country: String,
    pub values: Vec<Option<f64>>,
}

/// Line-chart aggregate. When the dataset carries no time dimension the
/// chart falls back to a single line across countries ordered by ascending
/// mean.
#[derive(Clone, Debug, PartialEq)]
pub enum TimeSeries {
    ByPeriod {
        periods: Vec<String>,
        series: Vec<CountrySeries>,
    },
    ByCountry(Vec<CountryMean>),
}

/// Filter the dataset down to valid numeric observations for one indicator.
///
/// Unparsable or non-finite observation values are dropped, not treated as
/// errors; the country field is trimmed and rows without a country are
/// dropped too. The indicator code is not validated against the catalog
/// here — an unknown code simply yields an empty result. No ordering
/// guarantee; each aggregation applies its own.
pub fn filter_and_clean(dataset: &Dataset, indicator_code: &str) -> Vec<CleanRow> {
    dataset
        .rows
        .iter()
        .filter(|row| row.indicator == indicator_code)
        .filter_map(|row| {
            let value: f64 = row.value.trim().parse().ok()?;
            if !value.is_finite() {
                return None;
            }
            let country = row.country.trim();
            if country.is_empty() {
                return None;
            }
            Some(CleanRow {
                country: country.to_string(),
                time_period: row.time_period.trim().to_string(),
                value,
            })
        })
        .collect()
}

/// Mean per country, sorted by mean descending. Every country appearing in
/// the output has at least one valid observation, and appears exactly once.
pub fn aggregate_by_country(rows: &[CleanRow]) -> Vec<CountryMean> {
    let mut means: Vec<CountryMean> = group_by_country(rows)
        .into_iter()
        .map(|(country, values)| CountryMean {
            country,
            mean: mean(&values),
        })
        .collect();

    means.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    means
}

/// Per-country summary statistics, sorted by median descending.
///
/// The sample standard deviation needs at least two observations; countries
/// with a single valid row are omitted rather than reported with a hole in
/// the summary.
pub fn aggregate_stats(rows: &[CleanRow]) -> Vec<CountryStats> {
    let mut stats: Vec<CountryStats> = group_by_country(rows)
        .into_iter()
        .filter_map(|(country, mut values)| {
            if values.len() < 2 {
                return None;
            }
            values.sort_by(f64::total_cmp);

            let q1 = quantile(&values, 0.25);
            let median = quantile(&values, 0.5);
            let q3 = quantile(&values, 0.75);
            let min = values[0];
            let max = values[values.len() - 1];
            let iqr = q3 - q1;

            Some(CountryStats {
                mean: mean(&values),
                std: sample_std(&values),
                upper_whisker: (q3 + 1.5 * iqr).min(max),
                lower_whisker: (q1 - 1.5 * iqr).max(min),
                country,
                q1,
                median,
                q3,
                min,
                max,
                iqr,
            })
        })
        .collect();

    stats.sort_by(|a, b| b.median.total_cmp(&a.median));
    stats
}

/// Mean value per (country, time period), with the period axis collected as
/// the sorted set of distinct periods across the whole cleaned table.
///
/// Returns `None` for empty input. When no row carries a time period the
/// result degrades to [`TimeSeries::ByCountry`] with countries ordered by
/// ascending mean.
pub fn aggregate_time_series(rows: &[CleanRow]) -> Option<TimeSeries> {
    if rows.is_empty() {
        return None;
    }

    if rows.iter().all(|row| row.time_period.is_empty()) {
        let mut means = aggregate_by_country(rows);
        means.reverse(); // descending -> ascending
        return Some(TimeSeries::ByCountry(means));
    }

    let mut periods: Vec<String> = rows.iter().map(|row| row.time_period.clone()).collect();
    periods.sort();
    periods.dedup();

    // (country, period) -> running values
    let mut groups: BTreeMap<(String, String), Vec<f64>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.country.clone(), row.time_period.clone()))
            .or_default()
            .push(row.value);
    }

    let mut series: BTreeMap<String, Vec<Option<f64>>> = BTreeMap::new();
    for ((country, period), values) in groups {
        let slot = periods.iter().position(|p| *p == period)?;
        series
            .entry(country)
            .or_insert_with(|| vec![None; periods.len()])[slot] = Some(mean(&values));
    }

    Some(TimeSeries::ByPeriod {
        periods,
        series: series
            .into_iter()
            .map(|(country, values)| CountrySeries { country, values })
            .collect(),
    })
}

fn group_by_country(rows: &[CleanRow]) -> BTreeMap<String, Vec<f64>> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.country.clone()).or_default().push(row.value);
    }
    groups
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// Sample standard deviation (ddof = 1). Caller guarantees len >= 2.
fn sample_std(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

// Linear-interpolation quantile over an ascending-sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, Observation};

    fn obs(country: &str, indicator: &str, period: &str, value: &str) -> Observation {
        Observation {
            country: country.to_string(),
            indicator: indicator.to_string(),
            time_period: period.to_string(),
            value: value.to_string(),
        }
    }

    fn scenario_a() -> Dataset {
        Dataset::new(vec![
            obs("Fiji", "X", "2019", "10"),
            obs("Fiji", "X", "2020", "20"),
            obs("Tonga", "X", "2019", "abc"),
        ])
    }

    #[test]
    fn unknown_indicator_yields_empty_result() {
        let rows = filter_and_clean(&scenario_a(), "MISSING");
        assert!(rows.is_empty());
    }

    #[test]
    fn non_numeric_values_are_dropped_numeric_text_is_kept() {
        let dataset = Dataset::new(vec![
            obs("Fiji", "X", "2019", "12.5"),
            obs("Fiji", "X", "2020", "n/a"),
            obs("Fiji", "X", "2021", ""),
            obs("Fiji", "X", "2022", "NaN"),
            obs("Fiji", "X", "2023", " 7 "),
        ]);
        let rows = filter_and_clean(&dataset, "X");
        let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![12.5, 7.0]);
    }

    #[test]
    fn country_field_is_trimmed_and_empty_countries_dropped() {
        let dataset = Dataset::new(vec![
            obs("  Fiji ", "X", "2019", "1"),
            obs("   ", "X", "2019", "2"),
        ]);
        let rows = filter_and_clean(&dataset, "X");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].country, "Fiji");
    }

    #[test]
    fn scenario_a_bar_aggregation() {
        let rows = filter_and_clean(&scenario_a(), "X");
        assert_eq!(rows.len(), 2);

        let means = aggregate_by_country(&rows);
        assert_eq!(means.len(), 1);
        assert_eq!(means[0].country, "Fiji");
        assert_eq!(means[0].mean, 15.0);
    }

    #[test]
    fn bar_aggregation_sorts_descending_with_unique_countries() {
        let dataset = Dataset::new(vec![
            obs("Fiji", "X", "2019", "1"),
            obs("Tonga", "X", "2019", "9"),
            obs("Samoa", "X", "2019", "5"),
            obs("Fiji", "X", "2020", "3"),
        ]);
        let means = aggregate_by_country(&filter_and_clean(&dataset, "X"));

        let countries: Vec<&str> = means.iter().map(|m| m.country.as_str()).collect();
        assert_eq!(countries, vec!["Tonga", "Samoa", "Fiji"]);
        for pair in means.windows(2) {
            assert!(pair[0].mean >= pair[1].mean);
        }
    }

    #[test]
    fn stats_whiskers_clip_to_observed_extremes() {
        let rows: Vec<CleanRow> = [1.0, 2.0, 3.0, 4.0, 100.0]
            .iter()
            .map(|v| CleanRow {
                country: "Fiji".to_string(),
                time_period: String::new(),
                value: *v,
            })
            .collect();

        let stats = aggregate_stats(&rows);
        assert_eq!(stats.len(), 1);
        let s = &stats[0];

        assert_eq!(s.q1, 2.0);
        assert_eq!(s.median, 3.0);
        assert_eq!(s.q3, 4.0);
        assert_eq!(s.iqr, 2.0);
        // q3 + 1.5*iqr = 7 < max = 100; q1 - 1.5*iqr = -1 > ... min = 1 wins
        assert_eq!(s.upper_whisker, 7.0);
        assert_eq!(s.lower_whisker, 1.0);
        assert!(s.upper_whisker <= s.max);
        assert!(s.lower_whisker >= s.min);
    }

    #[test]
    fn stats_sorted_by_median_descending_and_singletons_omitted() {
        let dataset = Dataset::new(vec![
            obs("Fiji", "X", "2019", "1"),
            obs("Fiji", "X", "2020", "2"),
            obs("Tonga", "X", "2019", "10"),
            obs("Tonga", "X", "2020", "20"),
            obs("Samoa", "X", "2019", "99"),
        ]);
        let stats = aggregate_stats(&filter_and_clean(&dataset, "X"));

        let countries: Vec<&str> = stats.iter().map(|s| s.country.as_str()).collect();
        // Samoa has a single observation and no defined sample std
        assert_eq!(countries, vec!["Tonga", "Fiji"]);
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.25), 1.75);
        assert_eq!(quantile(&values, 0.5), 2.5);
        assert_eq!(quantile(&values, 0.75), 3.25);
    }

    #[test]
    fn time_series_collects_sorted_periods_and_aligned_values() {
        let dataset = Dataset::new(vec![
            obs("Fiji", "X", "2020", "2"),
            obs("Fiji", "X", "2019", "1"),
            obs("Tonga", "X", "2020", "5"),
        ]);
        let series = aggregate_time_series(&filter_and_clean(&dataset, "X")).unwrap();

        match series {
            TimeSeries::ByPeriod { periods, series } => {
                assert_eq!(periods, vec!["2019", "2020"]);
                assert_eq!(series.len(), 2);
                assert_eq!(series[0].country, "Fiji");
                assert_eq!(series[0].values, vec![Some(1.0), Some(2.0)]);
                assert_eq!(series[1].country, "Tonga");
                assert_eq!(series[1].values, vec![None, Some(5.0)]);
            }
            TimeSeries::ByCountry(_) => panic!("expected period axis"),
        }
    }

    #[test]
    fn time_series_averages_duplicate_period_observations() {
        let dataset = Dataset::new(vec![
            obs("Fiji", "X", "2019", "1"),
            obs("Fiji", "X", "2019", "3"),
        ]);
        let series = aggregate_time_series(&filter_and_clean(&dataset, "X")).unwrap();
        match series {
            TimeSeries::ByPeriod { series, .. } => {
                assert_eq!(series[0].values, vec![Some(2.0)]);
            }
            TimeSeries::ByCountry(_) => panic!("expected period axis"),
        }
    }

    #[test]
    fn time_series_falls_back_to_countries_sorted_ascending() {
        let dataset = Dataset::new(vec![
            obs("Fiji", "X", "", "9"),
            obs("Tonga", "X", "", "1"),
        ]);
        let series = aggregate_time_series(&filter_and_clean(&dataset, "X")).unwrap();
        match series {
            TimeSeries::ByCountry(means) => {
                let countries: Vec<&str> = means.iter().map(|m| m.country.as_str()).collect();
                assert_eq!(countries, vec!["Tonga", "Fiji"]);
            }
            TimeSeries::ByPeriod { .. } => panic!("expected country fallback"),
        }
    }

    #[test]
    fn empty_input_yields_no_time_series() {
        assert_eq!(aggregate_time_series(&[]), None);
    }

    #[test]
    fn pipeline_is_idempotent() {
        let dataset = scenario_a();
        let first = aggregate_by_country(&filter_and_clean(&dataset, "X"));
        let second = aggregate_by_country(&filter_and_clean(&dataset, "X"));
        assert_eq!(first, second);
    }
}
