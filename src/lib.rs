/*!
# GSS Dashboard

A single-page dashboard over the 2018 General Social Survey, served from Rust.

## Overview

The survey file is loaded once at startup into an immutable [`Dataset`]. A
[`DashboardContext`] derives everything the page needs from it: the
per-sex summary table, the binned occupational prestige categories and the
complete-cases subset behind the interactive chart. Static charts are drawn
once; the interactive grouped bar chart is recomputed for every dropdown
change.

## Architecture

### Data Layer
- **loader**: fetch or read the CSV, decode Windows-1252, select and rename
  columns, map survey placeholders (`IAP`, `DK`, `CAN'T CHOOSE`, ...) to
  missing values and coerce `89 or older` to 89
- **dataset**: the `Respondent` record and the immutable table
- **selection**: the closed set of dropdown columns

### Derived Views
- **crosstab**: dense contingency table of one attitude column against one
  demographic column, in long format
- **summary**: mean socioeconomic index, income, education and prestige
  per sex
- **binning**: six equal-width occupational prestige categories
- **stats**: means, quantiles, least squares and kernel density

### Web Layer (feature `web`)
- **charts**: PNG rendering with plotters
- **page**: handlebars page template
- **app**: axum routes and request handling
- **config**: command-line and environment configuration

## REST API Endpoints

- `/` - The dashboard page
- `/api/options` - Dropdown whitelists and defaults
- `/api/crosstab?x=&y=` - Long-format cross-tab as JSON
- `/api/crosstab/export?x=&y=&format=csv|xlsx` - Cross-tab download
- `/api/summary` - Per-sex summary as JSON
- `/charts/crosstab.png?x=&y=` - The interactive grouped bar chart
- `/charts/static/{name}.png` - Static charts
*/

pub mod binning;
pub mod context;
pub mod crosstab;
pub mod dataset;
pub mod downloader;
pub mod error;
pub mod loader;
pub mod selection;
pub mod stats;
pub mod summary;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod charts;
#[cfg(feature = "web")]
pub mod config;
#[cfg(feature = "web")]
pub mod page;

pub use context::DashboardContext;
pub use crosstab::{CompleteCases, CrossTab, CrossTabRow, cross_tabulate};
pub use dataset::{Dataset, Respondent};
pub use error::{Error, LoadError, Result};
pub use selection::{Categorical, XColumn, YColumn};
