//! HTTP Server - serves the dashboard page and its figure API
//!
//! Endpoints:
//! - GET  /                    → Dashboard page
//! - GET  /api/health          → Liveness + record count
//! - GET  /api/layout          → Title, dropdown options, slider config
//! - GET  /api/charts          → Every figure for a selection (first paint)
//! - GET  /api/charts/pie      → Pie figure for ?site=
//! - GET  /api/charts/scatter  → Scatter figure for ?site=&min=&max=
//! - POST /api/update          → Re-run the callbacks bound to a changed control

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::charts::ChartSpec;
use crate::dashboard::{PIE_CHART, SCATTER_CHART};
use crate::error::AppError;
use crate::selection::Selection;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../web/index.html");

type HandlerResult<T> = Result<Json<T>, AppError>;

/// Build the router with all routes and middleware
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(health))
        .route("/layout", get(get_layout))
        .route("/charts", get(get_charts))
        .route("/charts/pie", get(get_pie))
        .route("/charts/scatter", get(get_scatter))
        .route("/update", post(update));

    Router::new()
        .route("/", get(index))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    tracing::info!("Initializing HTTP server on {}:{}", host, port);
    let records = state.dashboard.dataset().len();
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Dashboard running on http://{}/ ({} records)", addr, records);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> impl IntoResponse {
    tracing::debug!("GET /");
    Html(INDEX_HTML)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    records: usize,
}

/// GET /api/health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        records: state.dashboard.dataset().len(),
    })
}

/// GET /api/layout
async fn get_layout(State(state): State<AppState>) -> impl IntoResponse {
    tracing::debug!("GET /api/layout");
    Json(state.dashboard.layout())
}

/// Query string shared by the chart endpoints
#[derive(Debug, Default, Deserialize)]
struct ChartQuery {
    site: Option<String>,
    min: Option<f64>,
    max: Option<f64>,
}

impl ChartQuery {
    fn selection(self, state: &AppState) -> Result<Selection, AppError> {
        let defaults = state.selection(None, None)?;
        let payload = match (self.min, self.max) {
            (None, None) => None,
            (min, max) => Some([
                min.unwrap_or(defaults.payload.min()),
                max.unwrap_or(defaults.payload.max()),
            ]),
        };
        state.selection(self.site, payload).map_err(AppError::from)
    }
}

#[derive(Serialize)]
struct FiguresResponse {
    outputs: BTreeMap<&'static str, ChartSpec>,
}

/// GET /api/charts - every figure, as on first page load
async fn get_charts(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> HandlerResult<FiguresResponse> {
    tracing::info!("GET /api/charts {:?}", query);
    let selection = query.selection(&state)?;
    let outputs = state.dashboard.render_all(&selection).into_iter().collect();
    Ok(Json(FiguresResponse { outputs }))
}

/// GET /api/charts/pie
async fn get_pie(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> HandlerResult<Option<ChartSpec>> {
    tracing::info!("GET /api/charts/pie site={:?}", query.site);
    // the pie only reads the dropdown, so slider values are not validated here
    let selection = state.selection(query.site, None)?;
    Ok(Json(state.dashboard.render(PIE_CHART, &selection)))
}

/// GET /api/charts/scatter
async fn get_scatter(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> HandlerResult<Option<ChartSpec>> {
    tracing::info!(
        "GET /api/charts/scatter site={:?} min={:?} max={:?}",
        query.site,
        query.min,
        query.max
    );
    let selection = query.selection(&state)?;
    Ok(Json(state.dashboard.render(SCATTER_CHART, &selection)))
}

/// Body of POST /api/update: the control that changed plus every control's value
#[derive(Debug, Deserialize)]
struct UpdateRequest {
    changed: String,
    site: Option<String>,
    payload: Option<[f64; 2]>,
}

/// POST /api/update
async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateRequest>,
) -> HandlerResult<FiguresResponse> {
    tracing::info!(
        "POST /api/update changed={} site={:?} payload={:?}",
        request.changed,
        request.site,
        request.payload
    );
    let selection = state.selection(request.site, request.payload)?;
    let outputs = state
        .dashboard
        .dispatch(&request.changed, &selection)?
        .into_iter()
        .collect();
    Ok(Json(FiguresResponse { outputs }))
}
