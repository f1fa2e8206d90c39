use crate::stats::{CountryMean, CountryStats, TimeSeries};
use plotters::prelude::*;
use std::error::Error;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const BOX_FILL: RGBColor = RGBColor(53, 183, 121);

/// Render the bar aggregate to a PNG for download.
///
/// The interactive charts live in the browser; this is the static image
/// counterpart served by the export endpoint. Returns the PNG bytes.
pub fn render_bar_png(
    means: &[CountryMean],
    indicator_label: &str,
) -> Result<Vec<u8>, Box<dyn Error>> {
    if means.is_empty() {
        return Err("no data to render".into());
    }

    let countries: Vec<String> = means.iter().map(|m| m.country.clone()).collect();
    let values: Vec<f64> = means.iter().map(|m| m.mean).collect();
    let (y_min, y_max) = value_range(&values);

    let file = tempfile::Builder::new().suffix(".png").tempfile()?;
    {
        let root = BitMapBackend::new(file.path(), (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Statistical Analysis: {}", indicator_label),
                ("sans-serif", 24).into_font(),
            )
            .margin(10)
            .x_label_area_size(90)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..countries.len() as f64, y_min..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(countries.len())
            .x_label_formatter(&|x| axis_label(&countries, *x))
            .x_desc("Country/Territory")
            .y_desc("Average Value")
            .draw()?;

        chart.draw_series(values.iter().enumerate().map(|(i, v)| {
            let color = Palette99::pick(i).mix(0.9);
            Rectangle::new(
                [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, *v)],
                color.filled(),
            )
        }))?;

        root.present()?;
    }

    Ok(std::fs::read(file.path())?)
}

/// Render the box-plot aggregate to a PNG: whisker span, interquartile
/// box, median line, and a mean marker per country.
pub fn render_box_png(
    stats: &[CountryStats],
    indicator_label: &str,
) -> Result<Vec<u8>, Box<dyn Error>> {
    if stats.is_empty() {
        return Err("no data to render".into());
    }

    let countries: Vec<String> = stats.iter().map(|s| s.country.clone()).collect();
    let lows: Vec<f64> = stats.iter().map(|s| s.lower_whisker.min(s.mean)).collect();
    let highs: Vec<f64> = stats.iter().map(|s| s.upper_whisker.max(s.mean)).collect();
    let (y_min, y_max) = span_range(&lows, &highs);

    let file = tempfile::Builder::new().suffix(".png").tempfile()?;
    {
        let root = BitMapBackend::new(file.path(), (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Geographic Distribution: {}", indicator_label),
                ("sans-serif", 24).into_font(),
            )
            .margin(10)
            .x_label_area_size(90)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..countries.len() as f64, y_min..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(countries.len())
            .x_label_formatter(&|x| axis_label(&countries, *x))
            .x_desc("Country/Territory")
            .y_desc("Value Distribution")
            .draw()?;

        for (i, s) in stats.iter().enumerate() {
            let x = i as f64 + 0.5;
            // Whisker span
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(x, s.lower_whisker), (x, s.upper_whisker)],
                BLACK.stroke_width(2),
            )))?;
            // Interquartile box
            chart.draw_series(std::iter::once(Rectangle::new(
                [(i as f64 + 0.2, s.q1), (i as f64 + 0.8, s.q3)],
                BOX_FILL.mix(0.7).filled(),
            )))?;
            // Median line
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(i as f64 + 0.2, s.median), (i as f64 + 0.8, s.median)],
                BLACK.stroke_width(3),
            )))?;
            // Mean marker
            chart.draw_series(std::iter::once(Circle::new((x, s.mean), 4, RED.filled())))?;
        }

        root.present()?;
    }

    Ok(std::fs::read(file.path())?)
}

/// Render the line aggregate to a PNG, one series per country, or the
/// single country-axis line when there is no time dimension.
pub fn render_line_png(
    series: &TimeSeries,
    indicator_label: &str,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let caption = format!("Temporal Trends: {}", indicator_label);

    let file = tempfile::Builder::new().suffix(".png").tempfile()?;
    {
        let root = BitMapBackend::new(file.path(), (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        match series {
            TimeSeries::ByPeriod { periods, series } => {
                if series.is_empty() {
                    return Err("no data to render".into());
                }
                let all_values: Vec<f64> = series
                    .iter()
                    .flat_map(|s| s.values.iter().flatten().copied())
                    .collect();
                let (y_min, y_max) = value_range(&all_values);

                let mut chart = ChartBuilder::on(&root)
                    .caption(&caption, ("sans-serif", 24).into_font())
                    .margin(10)
                    .x_label_area_size(60)
                    .y_label_area_size(50)
                    .build_cartesian_2d(-0.5f64..periods.len() as f64 - 0.5, y_min..y_max)?;

                chart
                    .configure_mesh()
                    .disable_x_mesh()
                    .x_labels(periods.len())
                    .x_label_formatter(&|x| axis_label(periods, *x + 0.5))
                    .x_desc("Time Period")
                    .y_desc("Value")
                    .draw()?;

                for (i, s) in series.iter().enumerate() {
                    let color = Palette99::pick(i).mix(0.9);
                    let points: Vec<(f64, f64)> = s
                        .values
                        .iter()
                        .enumerate()
                        .filter_map(|(idx, v)| v.map(|v| (idx as f64, v)))
                        .collect();

                    chart
                        .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
                        .label(s.country.clone())
                        .legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
                        });
                    chart
                        .draw_series(points.iter().map(|p| Circle::new(*p, 3, color.filled())))?;
                }

                chart
                    .configure_series_labels()
                    .position(SeriesLabelPosition::UpperLeft)
                    .background_style(WHITE.mix(0.8))
                    .border_style(BLACK)
                    .draw()?;
            }
            TimeSeries::ByCountry(means) => {
                if means.is_empty() {
                    return Err("no data to render".into());
                }
                let countries: Vec<String> = means.iter().map(|m| m.country.clone()).collect();
                let values: Vec<f64> = means.iter().map(|m| m.mean).collect();
                let (y_min, y_max) = value_range(&values);

                let mut chart = ChartBuilder::on(&root)
                    .caption(&caption, ("sans-serif", 24).into_font())
                    .margin(10)
                    .x_label_area_size(90)
                    .y_label_area_size(50)
                    .build_cartesian_2d(-0.5f64..countries.len() as f64 - 0.5, y_min..y_max)?;

                chart
                    .configure_mesh()
                    .disable_x_mesh()
                    .x_labels(countries.len())
                    .x_label_formatter(&|x| axis_label(&countries, *x + 0.5))
                    .x_desc("Country/Territory")
                    .y_desc("Value")
                    .draw()?;

                let points: Vec<(f64, f64)> = values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (i as f64, *v))
                    .collect();
                chart.draw_series(LineSeries::new(points.clone(), GREEN.stroke_width(2)))?;
                chart.draw_series(points.iter().map(|p| Circle::new(*p, 4, GREEN.filled())))?;
            }
        }

        root.present()?;
    }

    Ok(std::fs::read(file.path())?)
}

// Tick label for slot coordinates: the slot's name, shortened so long
// territory names stay legible.
fn axis_label(names: &[String], x: f64) -> String {
    let index = x.floor();
    if index < 0.0 {
        return String::new();
    }
    match names.get(index as usize) {
        Some(name) if name.chars().count() > 18 => {
            let short: String = name.chars().take(15).collect();
            format!("{}...", short)
        }
        Some(name) => name.clone(),
        None => String::new(),
    }
}

// Always spans zero so bars anchored at the axis stay in frame.
fn value_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min).min(0.0);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max).max(0.0);
    pad_range(min, max)
}

fn span_range(lows: &[f64], highs: &[f64]) -> (f64, f64) {
    let min = lows.iter().copied().fold(f64::INFINITY, f64::min);
    let max = highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    pad_range(min, max)
}

fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}
