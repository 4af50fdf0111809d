use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::charts::{self, RenderedCharts, StaticChart};
use crate::config::Config;
use crate::context::DashboardContext;
use crate::downloader::ExportFormat;
use crate::crosstab::CrossTab;
use crate::error::{Axis, Error, Result};
use crate::page;
use crate::selection::{Categorical, XColumn, YColumn};

/// Shared, read-only state of the running dashboard.
pub struct AppState {
    ctx: Arc<DashboardContext>,
    charts: RenderedCharts,
    page: String,
}

impl AppState {
    pub fn new(ctx: DashboardContext, charts: RenderedCharts) -> Result<Self> {
        Ok(AppState {
            ctx: Arc::new(ctx),
            charts,
            page: page::render_page()?,
        })
    }
}

#[derive(Deserialize)]
struct SelectionQuery {
    x: Option<String>,
    y: Option<String>,
}

impl SelectionQuery {
    /// Cross-tab for the submitted names. Both names are required; the
    /// defaults live in the page's dropdowns.
    fn cross_tab(&self, ctx: &DashboardContext) -> Result<CrossTab> {
        let x = self.x.as_deref().ok_or_else(|| missing(Axis::X))?;
        let y = self.y.as_deref().ok_or_else(|| missing(Axis::Y))?;
        ctx.cross_tab_by_name(x, y)
    }
}

fn missing(axis: Axis) -> Error {
    Error::InvalidSelection {
        axis,
        name: String::new(),
    }
}

#[derive(Deserialize)]
struct ExportQuery {
    x: Option<String>,
    y: Option<String>,
    format: Option<ExportFormat>,
}

#[derive(Serialize)]
struct OptionsResponse {
    x_options: Vec<&'static str>,
    y_options: Vec<&'static str>,
    x_default: &'static str,
    y_default: &'static str,
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    message: Option<String>,
}

/// Error wrapper turning [`Error`] into a JSON response.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            Error::InvalidSelection { .. } => {
                warn!("rejected selection: {}", self.0);
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = StatusResponse {
            status: "error".to_string(),
            message: Some(self.0.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

/// Build the dashboard's routes.
pub fn router(state: Arc<AppState>, static_dir: &std::path::Path) -> Router {
    Router::new()
        .route("/", get(serve_page))
        .route("/api/options", get(get_options))
        .route("/api/summary", get(get_summary))
        .route("/api/crosstab", get(get_crosstab))
        .route("/api/crosstab/export", get(export_crosstab))
        .route("/charts/crosstab.png", get(crosstab_chart))
        .route("/charts/static/:file", get(static_chart))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

pub async fn run(
    config: &Config,
    ctx: DashboardContext,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Static charts are drawn once, before accepting requests
    let charts = RenderedCharts::render_all(&ctx)?;
    let app_state = Arc::new(AppState::new(ctx, charts)?);

    let app = router(app_state, &config.static_dir);

    let listener = TcpListener::bind(config.bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.clone())
}

async fn get_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        x_options: XColumn::ALL.iter().map(|c| c.name()).collect(),
        y_options: YColumn::ALL.iter().map(|c| c.name()).collect(),
        x_default: XColumn::DEFAULT.name(),
        y_default: YColumn::DEFAULT.name(),
    })
}

async fn get_summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.ctx.summary().to_vec())
}

async fn get_crosstab(
    Query(params): Query<SelectionQuery>,
    State(state): State<Arc<AppState>>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let table = params.cross_tab(&state.ctx)?;
    info!(
        "crosstab {} x {}: {} rows",
        table.x.name(),
        table.y.name(),
        table.rows.len()
    );
    Ok(Json(table))
}

async fn export_crosstab(
    Query(params): Query<ExportQuery>,
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Response, ApiError> {
    let selection = SelectionQuery {
        x: params.x,
        y: params.y,
    };
    let table = selection.cross_tab(&state.ctx)?;
    let format = params.format.unwrap_or(ExportFormat::Csv);
    let bytes = format.export(&table)?;

    let disposition = format!(
        "attachment; filename=\"{}_by_{}.{}\"",
        table.x.name(),
        table.y.name(),
        format.extension()
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(bytes),
    )
        .into_response())
}

async fn crosstab_chart(
    Query(params): Query<SelectionQuery>,
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Response, ApiError> {
    let table = params.cross_tab(&state.ctx)?;

    // Rendering is CPU bound; keep it off the async workers
    let png = tokio::task::spawn_blocking(move || charts::crosstab_chart(&table))
    .await
    .map_err(|e| Error::Render(e.to_string()))??;

    Ok(png_response(png))
}

async fn static_chart(
    Path(file): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match StaticChart::from_file_name(&file).and_then(|c| state.charts.get(c)) {
        Some(png) => png_response(png.to_vec()),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn png_response(png: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "image/png")],
        Body::from(png),
    )
        .into_response()
}
