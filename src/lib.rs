/*!
# Pacific Economy Data Visualization Dashboard

A web dashboard for exploring UN Sustainable Development Goal 8 ("Decent
Work and Economic Growth") indicators across Pacific Island countries and
territories, built in Rust.

## Overview

The application loads a CSV dataset of economic indicators once at startup,
lets a user pick a category and an indicator, and renders three chart types
summarizing that indicator across countries/territories and time periods:

- **Bar** - mean observation value per country, descending
- **Box plot** - five-number summary plus mean per country, with 1.5×IQR
  whiskers clipped to the observed extremes
- **Line** - per-country trends across ordinal time-period positions

## Architecture

The application follows a request/response architecture over a shared,
read-only dataset:

### Data Layer
- Dataset loaded once from CSV into typed records; load failures degrade
  to an empty dataset so the process keeps serving
- Static indicator catalog grouping indicator codes into display
  categories

### Aggregation Layer
- Per-request filter/clean pipeline: filter by indicator, coerce the
  observation value to a number, drop unusable rows
- Grouping by country (and time period for the line chart) with summary
  statistics

### Presentation Layer
- Chart builders emit a markup + script pair per chart, rendered in the
  browser by Chart.js; empty aggregates yield no artifact instead of an
  empty chart
- Handlebars template for the dashboard shell, flash messages for every
  validation and no-data path
- Optional PNG export of each chart rendered server-side with plotters

## Modules

- **config**: environment-driven process configuration
- **dataset**: observation records and dataset summary
- **loader**: CSV loading with degrade-to-empty error handling
- **catalog**: category → indicator configuration data
- **stats**: cleaning and aggregation pipeline
- **chart**: Chart.js artifact builders (bar, box, line)
- **export**: server-side PNG rendering for downloads
- **app**: routing, handlers, and template rendering

## REST API Endpoints

- `GET /` - dashboard shell with catalog and dataset summary
- `POST /visualize` - render the three charts for a category/indicator
- `GET /api/indicators/{category}` - indicator code → label mapping
- `GET /api/export/{kind}?indicator=` - PNG download (bar, box, line)
- `GET /health` - liveness plus dataset status
*/

pub mod app;
pub mod catalog;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod export;
pub mod loader;
pub mod stats;

/// Re-export the common types so binaries and tests can use them directly
pub use chart::ChartArtifact;
pub use config::Config;
pub use dataset::{DataSummary, Dataset, Observation};
pub use stats::{CleanRow, CountryMean, CountryStats, TimeSeries};
