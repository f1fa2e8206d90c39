use crate::stats::{CountryMean, CountryStats, TimeSeries};
use serde::Serialize;
use serde_json::json;

/// Bar palette, cycled when there are more countries than colors.
const SPECTRAL: [&str; 6] = [
    "#3288bd", "#99d594", "#e6f598", "#fee08b", "#fc8d59", "#d53e4f",
];

/// Line palette, one color per country series.
const CATEGORY20: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728",
    "#ff9896", "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2",
    "#7f7f7f", "#c7c7c7", "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

const BOX_FILL: &str = "#35b779";
const WHISKER_COLOR: &str = "#4b5563";
const MEAN_COLOR: &str = "#ef4444";
const FALLBACK_LINE_COLOR: &str = "#10b981";

/// The markup + script pair needed to embed one rendered chart in a page.
///
/// The `div` holds the canvas container; the `script` carries the generated
/// Chart.js configuration, including tooltip formatting. Both are injected
/// into the template unescaped.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartArtifact {
    pub div: String,
    pub script: String,
}

fn container(id: &str, title: &str) -> String {
    format!(
        r#"<div class="chart-panel"><h3>{}</h3><canvas id="{}" height="400"></canvas></div>"#,
        title, id
    )
}

// JSON-encode a string for safe splicing into generated JavaScript.
fn js_str(s: &str) -> String {
    json!(s).to_string()
}

/// Build the bar chart: one bar per country at its mean value, descending.
///
/// Returns `None` for an empty aggregate instead of an empty chart.
pub fn bar_chart(means: &[CountryMean], indicator_label: &str) -> Option<ChartArtifact> {
    if means.is_empty() {
        return None;
    }

    let labels = json!(means.iter().map(|m| m.country.as_str()).collect::<Vec<_>>());
    let values = json!(means.iter().map(|m| m.mean).collect::<Vec<_>>());
    let colors = json!(
        (0..means.len())
            .map(|i| SPECTRAL[i % SPECTRAL.len()])
            .collect::<Vec<_>>()
    );

    let script = format!(
        r##"<script>
(function () {{
  new Chart(document.getElementById("chart-bar"), {{
    type: "bar",
    data: {{
      labels: {labels},
      datasets: [{{
        data: {values},
        backgroundColor: {colors},
        borderColor: "#ffffff",
        borderWidth: 2
      }}]
    }},
    options: {{
      responsive: true,
      maintainAspectRatio: false,
      plugins: {{
        legend: {{ display: false }},
        tooltip: {{
          callbacks: {{
            title: (items) => "Country/Territory: " + items[0].label,
            label: (ctx) => [
              "Average Value: " + ctx.parsed.y.toFixed(2),
              "Indicator: " + {label}
            ]
          }}
        }}
      }},
      scales: {{
        x: {{ ticks: {{ maxRotation: 45, minRotation: 45 }}, grid: {{ display: false }} }},
        y: {{ beginAtZero: true }}
      }}
    }}
  }});
}})();
</script>"##,
        labels = labels,
        values = values,
        colors = colors,
        label = js_str(indicator_label),
    );

    Some(ChartArtifact {
        div: container(
            "chart-bar",
            &format!("Statistical Analysis: {}", indicator_label),
        ),
        script,
    })
}

/// Build the box-plot summary: one box/whisker glyph per country, ordered
/// by descending median. The glyph is composed from floating bars (whisker
/// span and interquartile box) plus point marks for median and mean; the
/// tooltip reports all seven statistics to two decimals.
pub fn box_chart(stats: &[CountryStats], indicator_label: &str) -> Option<ChartArtifact> {
    if stats.is_empty() {
        return None;
    }

    let labels = json!(stats.iter().map(|s| s.country.as_str()).collect::<Vec<_>>());
    let whiskers = json!(
        stats
            .iter()
            .map(|s| [s.lower_whisker, s.upper_whisker])
            .collect::<Vec<_>>()
    );
    let boxes = json!(stats.iter().map(|s| [s.q1, s.q3]).collect::<Vec<_>>());
    let medians = json!(stats.iter().map(|s| s.median).collect::<Vec<_>>());
    let means = json!(stats.iter().map(|s| s.mean).collect::<Vec<_>>());
    let tooltip_stats = json!(
        stats
            .iter()
            .map(|s| {
                json!({
                    "median": s.median,
                    "mean": s.mean,
                    "q1": s.q1,
                    "q3": s.q3,
                    "min": s.min,
                    "max": s.max,
                    "std": s.std,
                })
            })
            .collect::<Vec<_>>()
    );

    let script = format!(
        r##"<script>
(function () {{
  const stats = {tooltip_stats};
  new Chart(document.getElementById("chart-box"), {{
    data: {{
      labels: {labels},
      datasets: [
        {{ type: "bar", data: {whiskers}, barPercentage: 0.12,
          backgroundColor: "{whisker_color}" }},
        {{ type: "bar", data: {boxes}, barPercentage: 0.6,
          backgroundColor: "{box_fill}", borderColor: "#000000", borderWidth: 1 }},
        {{ type: "scatter", data: {medians}, pointStyle: "line",
          radius: 14, borderWidth: 3, borderColor: "#ffffff" }},
        {{ type: "scatter", data: {means}, radius: 5,
          backgroundColor: "{mean_color}" }}
      ]
    }},
    options: {{
      responsive: true,
      maintainAspectRatio: false,
      plugins: {{
        legend: {{ display: false }},
        tooltip: {{
          callbacks: {{
            title: (items) => "Country/Territory: " + items[0].label,
            label: (ctx) => {{
              const s = stats[ctx.dataIndex];
              return [
                "Median: " + s.median.toFixed(2),
                "Mean: " + s.mean.toFixed(2),
                "Q1: " + s.q1.toFixed(2),
                "Q3: " + s.q3.toFixed(2),
                "Min: " + s.min.toFixed(2),
                "Max: " + s.max.toFixed(2),
                "Std Dev: " + s.std.toFixed(2)
              ];
            }}
          }}
        }}
      }},
      scales: {{
        x: {{ ticks: {{ maxRotation: 45, minRotation: 45 }}, grid: {{ display: false }} }}
      }}
    }}
  }});
}})();
</script>"##,
        tooltip_stats = tooltip_stats,
        labels = labels,
        whiskers = whiskers,
        boxes = boxes,
        medians = medians,
        means = means,
        whisker_color = WHISKER_COLOR,
        box_fill = BOX_FILL,
        mean_color = MEAN_COLOR,
    );

    Some(ChartArtifact {
        div: container(
            "chart-box",
            &format!("Geographic Distribution: {}", indicator_label),
        ),
        script,
    })
}

/// Build the line chart across ordinal time-period positions, one line per
/// country with legend-click visibility toggling. Without a time dimension
/// a single line runs across countries ordered by ascending mean.
pub fn line_chart(series: &TimeSeries, indicator_label: &str) -> Option<ChartArtifact> {
    let (labels, datasets, show_legend) = match series {
        TimeSeries::ByPeriod { periods, series } => {
            if series.is_empty() {
                return None;
            }
            let datasets: Vec<serde_json::Value> = series
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let color = CATEGORY20[i % CATEGORY20.len()];
                    json!({
                        "label": s.country,
                        "data": s.values,
                        "borderColor": color,
                        "backgroundColor": color,
                        "pointRadius": 3,
                        "borderWidth": 2,
                        "spanGaps": true,
                    })
                })
                .collect();
            (json!(periods), json!(datasets), true)
        }
        TimeSeries::ByCountry(means) => {
            if means.is_empty() {
                return None;
            }
            let labels = json!(means.iter().map(|m| m.country.as_str()).collect::<Vec<_>>());
            let dataset = json!([{
                "label": indicator_label,
                "data": means.iter().map(|m| m.mean).collect::<Vec<_>>(),
                "borderColor": FALLBACK_LINE_COLOR,
                "backgroundColor": FALLBACK_LINE_COLOR,
                "pointRadius": 4,
                "borderWidth": 2,
            }]);
            (labels, dataset, false)
        }
    };

    let script = format!(
        r#"<script>
(function () {{
  new Chart(document.getElementById("chart-line"), {{
    type: "line",
    data: {{
      labels: {labels},
      datasets: {datasets}
    }},
    options: {{
      responsive: true,
      maintainAspectRatio: false,
      plugins: {{
        legend: {{ display: {legend}, position: "top", align: "start" }},
        tooltip: {{
          callbacks: {{
            title: (items) => items[0].label,
            label: (ctx) => (ctx.dataset.label || "") + ": " + ctx.parsed.y.toFixed(2)
          }}
        }}
      }},
      scales: {{
        x: {{ ticks: {{ maxRotation: 45, minRotation: 45 }}, grid: {{ display: false }} }}
      }}
    }}
  }});
}})();
</script>"#,
        labels = labels,
        datasets = datasets,
        legend = show_legend,
    );

    Some(ChartArtifact {
        div: container(
            "chart-line",
            &format!("Temporal Trends: {}", indicator_label),
        ),
        script,
    })
}
