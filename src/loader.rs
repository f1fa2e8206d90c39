use crate::dataset::{Dataset, Observation};
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Canonical column names of the SDG 8 dataset export.
pub const COUNTRY_COLUMN: &str = "Pacific Island Countries and territories";
pub const INDICATOR_COLUMN: &str = "INDICATOR";
pub const TIME_PERIOD_COLUMN: &str = "TIME_PERIOD";
pub const OBS_VALUE_COLUMN: &str = "OBS_VALUE";

/// Load the dataset from a CSV file.
///
/// This never returns an error to its caller: a missing or unreadable file,
/// or a file without the required columns, degrades to an empty dataset and
/// the process keeps serving. The outcome is logged either way.
///
/// # Examples
/// ```no_run
/// use pacific_dashboard::loader::load_dataset;
///
/// let dataset = load_dataset("data/indicators.csv");
/// println!("loaded {} rows", dataset.len());
/// ```
pub fn load_dataset(filepath: impl AsRef<Path>) -> Dataset {
    let path = filepath.as_ref();
    match from_csv(path) {
        Ok(dataset) => {
            log::info!(
                "Dataset loaded successfully with {} rows from {}",
                dataset.len(),
                path.display()
            );
            dataset
        }
        Err(e) => {
            log::error!("Error loading dataset from {}: {}", path.display(), e);
            Dataset::default()
        }
    }
}

/// Parse a CSV file into a [`Dataset`].
///
/// The header row is matched against the canonical column names; columns
/// beyond the four this dashboard reads are ignored. Rows shorter than the
/// header are padded with empty fields rather than rejected.
pub fn from_csv(filepath: impl AsRef<Path>) -> Result<Dataset, Box<dyn Error>> {
    let file = File::open(filepath)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header_line = match lines.next() {
        Some(line) => line?,
        None => return Err("CSV file is empty".into()),
    };
    // Spreadsheet exports often carry a UTF-8 BOM on the first line.
    let header_line = header_line.trim_start_matches('\u{feff}');
    let columns = ColumnIndex::from_header(&parse_csv_row(header_line))?;

    let mut rows = Vec::new();
    for line in lines {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let fields = parse_csv_row(&line);
        rows.push(Observation {
            country: columns.field(&fields, columns.country),
            indicator: columns.field(&fields, columns.indicator),
            time_period: columns.field(&fields, columns.time_period),
            value: columns.field(&fields, columns.value),
        });
    }

    Ok(Dataset::new(rows))
}

struct ColumnIndex {
    country: usize,
    indicator: usize,
    time_period: usize,
    value: usize,
}

impl ColumnIndex {
    fn from_header(header: &[String]) -> Result<Self, Box<dyn Error>> {
        let position = |name: &str| -> Result<usize, Box<dyn Error>> {
            header
                .iter()
                .position(|column| column.trim() == name)
                .ok_or_else(|| format!("missing required column: {}", name).into())
        };

        Ok(Self {
            country: position(COUNTRY_COLUMN)?,
            indicator: position(INDICATOR_COLUMN)?,
            time_period: position(TIME_PERIOD_COLUMN)?,
            value: position(OBS_VALUE_COLUMN)?,
        })
    }

    fn field(&self, fields: &[String], index: usize) -> String {
        fields.get(index).cloned().unwrap_or_default()
    }
}

// Parse a CSV row into a vector of fields, honoring quoted fields and
// doubled quotes inside them.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if let Some(&next) = chars.peek() {
                    if next == '"' && in_quotes {
                        // Doubled quote inside a quoted field
                        current_field.push('"');
                        chars.next();
                    } else {
                        in_quotes = !in_quotes;
                    }
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                result.push(current_field);
                current_field = String::new();
            }
            _ => {
                current_field.push(c);
            }
        }
    }

    result.push(current_field);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_fields() {
        assert_eq!(parse_csv_row("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn parses_quoted_fields_with_commas() {
        assert_eq!(
            parse_csv_row(r#""Wallis and Futuna, France",X,1"#),
            vec!["Wallis and Futuna, France", "X", "1"]
        );
    }

    #[test]
    fn parses_doubled_quotes() {
        assert_eq!(parse_csv_row(r#""say ""hi""",2"#), vec![r#"say "hi""#, "2"]);
    }

    #[test]
    fn trailing_empty_field_is_kept() {
        assert_eq!(parse_csv_row("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let header: Vec<String> = ["INDICATOR", "TIME_PERIOD", "OBS_VALUE"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(ColumnIndex::from_header(&header).is_err());
    }
}
