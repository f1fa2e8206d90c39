use pacific_dashboard::loader::load_dataset;
use pacific_dashboard::stats::{aggregate_by_country, aggregate_stats, filter_and_clean};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str =
    "Pacific Island Countries and territories,INDICATOR,TIME_PERIOD,OBS_VALUE";

fn write_csv(path: &Path, header: &str, rows: &[&str]) {
    let mut out = String::new();
    out.push_str(header);
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    fs::write(path, out).unwrap();
}

#[test]
fn missing_file_degrades_to_empty_dataset() {
    let dataset = load_dataset("/no/such/path/data.csv");
    assert!(dataset.is_empty());
    assert_eq!(dataset.summary().total_records, 0);
}

#[test]
fn missing_required_column_degrades_to_empty_dataset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.csv");
    write_csv(&path, "REF_AREA,INDICATOR,TIME_PERIOD,OBS_VALUE", &["FJ,X,2019,1"]);

    let dataset = load_dataset(&path);
    assert!(dataset.is_empty());
}

#[test]
fn loads_canonical_columns_and_ignores_extras() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.csv");
    write_csv(
        &path,
        "STRUCTURE,Pacific Island Countries and territories,INDICATOR,TIME_PERIOD,OBS_VALUE,OBS_STATUS",
        &[
            "DF,Fiji,X,2019,10,A",
            "DF,\"Micronesia (Federated States of)\",X,2020,12.5,A",
        ],
    );

    let dataset = load_dataset(&path);
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.rows[0].country, "Fiji");
    assert_eq!(dataset.rows[1].country, "Micronesia (Federated States of)");
    assert_eq!(dataset.rows[1].value, "12.5");
}

#[test]
fn bom_on_header_line_is_tolerated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bom.csv");
    write_csv(&path, "\u{feff}Pacific Island Countries and territories,INDICATOR,TIME_PERIOD,OBS_VALUE", &["Fiji,X,2019,1"]);

    let dataset = load_dataset(&path);
    assert_eq!(dataset.len(), 1);
}

#[test]
fn scenario_a_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scenario_a.csv");
    write_csv(
        &path,
        HEADER,
        &["Fiji,X,2019,10", "Fiji,X,2020,20", "Tonga,X,2019,abc"],
    );

    let dataset = load_dataset(&path);
    let rows = filter_and_clean(&dataset, "X");
    assert_eq!(rows.len(), 2);

    let means = aggregate_by_country(&rows);
    assert_eq!(means.len(), 1);
    assert_eq!(means[0].country, "Fiji");
    assert_eq!(means[0].mean, 15.0);
}

#[test]
fn pipeline_is_deterministic_across_runs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("repeat.csv");
    write_csv(
        &path,
        HEADER,
        &[
            "Fiji,X,2019,1",
            "Fiji,X,2020,2",
            "Tonga,X,2019,9",
            "Tonga,X,2020,11",
        ],
    );

    let dataset = load_dataset(&path);
    let first = aggregate_stats(&filter_and_clean(&dataset, "X"));
    let second = aggregate_stats(&filter_and_clean(&dataset, "X"));
    assert_eq!(first, second);
}

#[test]
fn shipped_dataset_loads_and_aggregates() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data/Sustainable Development Goal 08 - Decent Work and Economic Growth data.csv");
    let dataset = load_dataset(&path);
    assert!(!dataset.is_empty());

    let rows = filter_and_clean(&dataset, "SL_TLF_UEM");
    assert!(!rows.is_empty());
    // ".." placeholder rows never survive cleaning
    assert!(rows.iter().all(|r| r.value.is_finite()));

    let means = aggregate_by_country(&rows);
    for pair in means.windows(2) {
        assert!(pair[0].mean >= pair[1].mean);
    }
}
