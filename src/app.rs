use axum::{
    Json, Router,
    extract::{Form, Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::catalog::{self, Category};
use crate::chart::{self, ChartArtifact};
use crate::config::Config;
use crate::dataset::{DataSummary, Dataset};
use crate::export;
use crate::loader;
use crate::stats::{self, CleanRow};

const PAGE_TITLE: &str = "Pacific Economy Data Visualization Dashboard";
const DEFAULT_CATEGORY: &str = "economy";

pub struct AppState {
    dataset: Dataset,
    templates: Handlebars<'static>,
}

#[derive(Deserialize)]
pub struct VisualizeForm {
    #[serde(default)]
    category: String,
    #[serde(default)]
    indicator: String,
}

#[derive(Deserialize)]
struct ExportQuery {
    indicator: Option<String>,
}

#[derive(Serialize)]
struct Flash {
    level: &'static str,
    message: String,
}

/// Everything the dashboard template needs for one response. Every
/// terminal state of the request state machine renders through this.
#[derive(Serialize)]
struct PageContext {
    title: &'static str,
    categories: &'static [Category],
    selected_category: String,
    selected_indicator: String,
    selected_indicator_label: Option<String>,
    summary: DataSummary,
    flashes: Vec<Flash>,
    bar: Option<ChartArtifact>,
    #[serde(rename = "box")]
    box_chart: Option<ChartArtifact>,
    line: Option<ChartArtifact>,
}

impl PageContext {
    fn bare(state: &AppState) -> Self {
        Self {
            title: PAGE_TITLE,
            categories: catalog::categories(),
            selected_category: DEFAULT_CATEGORY.to_string(),
            selected_indicator: String::new(),
            selected_indicator_label: None,
            summary: state.dataset.summary(),
            flashes: Vec::new(),
            bar: None,
            box_chart: None,
            line: None,
        }
    }

    fn flash(mut self, level: &'static str, message: impl Into<String>) -> Self {
        self.flashes.push(Flash {
            level,
            message: message.into(),
        });
        self
    }
}

/// Build the shared application state: the loaded dataset plus the
/// compiled page template.
pub fn build_state(dataset: Dataset) -> Result<Arc<AppState>, Box<dyn std::error::Error>> {
    let mut templates = Handlebars::new();
    templates.register_template_string("index", include_str!("../templates/index.hbs"))?;

    Ok(Arc::new(AppState { dataset, templates }))
}

/// The full route table. Split out from [`run`] so tests can drive the
/// router with a fixture dataset.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/visualize", post(visualize))
        .route("/api/indicators/:category", get(api_indicators))
        .route("/api/export/:kind", get(export_chart))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(not_found)
        .with_state(state)
}

/// Load the dataset, then serve until shutdown.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = loader::load_dataset(&config.data_file);

    log::info!("Starting application on {}", config.bind_addr());
    log::info!("Debug mode: {}", config.debug);
    log::info!(
        "Dataset status: {}",
        if dataset.is_empty() {
            "Empty/Failed to load"
        } else {
            "Loaded"
        }
    );

    let addr = config.bind_addr();
    let state = build_state(dataset)?;
    let app = router(state);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    render_page(&state, &PageContext::bare(&state))
}

async fn visualize(
    State(state): State<Arc<AppState>>,
    Form(form): Form<VisualizeForm>,
) -> Html<String> {
    let category = form.category.trim().to_string();
    let indicator = form.indicator.trim().to_string();

    if category.is_empty() || indicator.is_empty() {
        let context = PageContext {
            selected_category: if category.is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category
            },
            ..PageContext::bare(&state)
        }
        .flash("error", "Please select both a category and an indicator.");
        return render_page(&state, &context);
    }

    if catalog::find_category(&category).is_none() {
        let context =
            PageContext::bare(&state).flash("error", "Invalid category selected.");
        return render_page(&state, &context);
    }

    let label = catalog::indicator_label(&category, &indicator);
    let rows = stats::filter_and_clean(&state.dataset, &indicator);

    if rows.is_empty() {
        log::warn!("No data found for indicator {}", indicator);
        let context = PageContext {
            selected_category: category,
            selected_indicator: indicator,
            selected_indicator_label: Some(label.clone()),
            ..PageContext::bare(&state)
        }
        .flash(
            "warning",
            format!("No data found for the selected indicator: {}", label),
        );
        return render_page(&state, &context);
    }

    log::info!(
        "Generating visualizations for {} with {} records",
        label,
        rows.len()
    );

    let bar = chart::bar_chart(&stats::aggregate_by_country(&rows), &label);
    let box_chart = chart::box_chart(&stats::aggregate_stats(&rows), &label);
    let line = stats::aggregate_time_series(&rows)
        .and_then(|series| chart::line_chart(&series, &label));

    let context = PageContext {
        selected_category: category,
        selected_indicator: indicator,
        selected_indicator_label: Some(label.clone()),
        summary: clean_summary(&rows),
        bar,
        box_chart,
        line,
        ..PageContext::bare(&state)
    }
    .flash(
        "success",
        format!("Visualizations generated successfully for: {}", label),
    );
    render_page(&state, &context)
}

async fn api_indicators(Path(category): Path<String>) -> impl IntoResponse {
    match catalog::find_category(&category) {
        Some(category) => {
            let mut mapping = serde_json::Map::new();
            for indicator in &category.indicators {
                mapping.insert(
                    indicator.code.to_string(),
                    serde_json::Value::String(indicator.label.to_string()),
                );
            }
            (StatusCode::OK, Json(serde_json::Value::Object(mapping)))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::Value::Object(serde_json::Map::new())),
        ),
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "data_loaded": !state.dataset.is_empty(),
        "data_rows": state.dataset.len(),
    }))
}

async fn export_chart(
    Path(kind): Path<String>,
    Query(query): Query<ExportQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let indicator = match query.indicator.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => code.to_string(),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };

    let rows = stats::filter_and_clean(&state.dataset, &indicator);
    if rows.is_empty() {
        return StatusCode::NOT_FOUND.into_response();
    }
    let label = catalog::label_for_code(&indicator);

    let rendered = match kind.as_str() {
        "bar" => export::render_bar_png(&stats::aggregate_by_country(&rows), &label),
        "box" => export::render_box_png(&stats::aggregate_stats(&rows), &label),
        "line" => match stats::aggregate_time_series(&rows) {
            Some(series) => export::render_line_png(&series, &label),
            None => return StatusCode::NOT_FOUND.into_response(),
        },
        _ => return StatusCode::NOT_FOUND.into_response(),
    };

    match rendered {
        Ok(png) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "image/png")
            .header(
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}-{}.png\"", kind, indicator),
            )
            .body(axum::body::Body::from(png))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        Err(e) => {
            log::error!("Error rendering {} chart for {}: {}", kind, indicator, e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn not_found(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let context = PageContext::bare(&state).flash("warning", "Page not found.");
    (StatusCode::NOT_FOUND, render_page(&state, &context))
}

// Render the dashboard template; a rendering failure degrades to a static
// error shell instead of surfacing a 5xx.
fn render_page(state: &AppState, context: &PageContext) -> Html<String> {
    match state.templates.render("index", context) {
        Ok(html) => Html(html),
        Err(e) => {
            log::error!("Template rendering failed: {}", e);
            Html(format!(
                "<!doctype html><html><body><h1>{}</h1>\
                 <p>An error occurred while generating visualizations. Please try again.</p>\
                 </body></html>",
                PAGE_TITLE
            ))
        }
    }
}

// Summary of the rows that survived cleaning, shown instead of the full
// dataset summary once a visualization was produced.
fn clean_summary(rows: &[CleanRow]) -> DataSummary {
    use std::collections::HashSet;

    let countries: HashSet<&str> = rows.iter().map(|r| r.country.as_str()).collect();
    let periods: HashSet<&str> = rows.iter().map(|r| r.time_period.as_str()).collect();

    DataSummary {
        total_records: rows.len(),
        countries: countries.len(),
        time_periods: periods.len(),
        indicators: if rows.is_empty() { 0 } else { 1 },
    }
}
