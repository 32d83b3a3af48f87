use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use ratiotutor_core::calculator::{self, AuxiliarySeries};
use ratiotutor_core::domain::ratio::{RatioCategory, RatioDefinition};
use ratiotutor_core::domain::result::{RatioName, RatioResult};
use ratiotutor_core::error::CalcError;
use ratiotutor_core::quiz::{self, GradeError, Question, Verdict};
use ratiotutor_core::{knowledge, statement, trend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = ratiotutor_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let state = AppState {
        header_rows: settings.statement_header_rows,
        periods: settings.periods.clone(),
    };
    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!(%addr, periods = ?settings.periods, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/ratios/catalog", get(get_catalog))
        .route("/ratios/lookup", get(lookup_ratio))
        .route("/ratios/calculate", post(calculate_ratios))
        .route("/ratios/trend", post(ratio_trend))
        .route("/quiz", get(get_quiz))
        .route("/quiz/:id/answer", post(answer_quiz))
        .route("/feedback", post(submit_feedback))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Clone)]
struct AppState {
    header_rows: usize,
    periods: Vec<String>,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<CalcError> for ApiError {
    fn from(err: CalcError) -> Self {
        let message = match &err {
            CalcError::MissingLineItem(item) => format!("Missing expected row: {item}"),
            CalcError::Processing(detail) => {
                sentry_anyhow::capture_anyhow(&anyhow::Error::new(err.clone()));
                format!("Error processing the file: {detail}")
            }
        };
        tracing::warn!(error = %err, "ratio calculation rejected");
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }
}

impl From<GradeError> for ApiError {
    fn from(err: GradeError) -> Self {
        let status = match err {
            GradeError::UnknownQuestion(_) => StatusCode::NOT_FOUND,
            GradeError::UnknownOption { .. } => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
struct ApiDefinition {
    name: &'static str,
    title: String,
    category: &'static str,
    formula: &'static str,
    description: &'static str,
}

impl From<&RatioDefinition> for ApiDefinition {
    fn from(def: &RatioDefinition) -> Self {
        Self {
            name: def.name,
            title: def.title(),
            category: def.category.display_name(),
            formula: def.formula,
            description: def.description,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogParams {
    category: Option<String>,
}

async fn get_catalog(
    Query(params): Query<CatalogParams>,
) -> Result<Json<Vec<ApiDefinition>>, ApiError> {
    let defs: Vec<ApiDefinition> = match params.category.as_deref() {
        None => knowledge::catalog().iter().map(ApiDefinition::from).collect(),
        Some(name) => {
            let category = RatioCategory::from_name(name).ok_or_else(|| {
                ApiError::new(StatusCode::BAD_REQUEST, format!("unknown category '{name}'"))
            })?;
            knowledge::by_category(category).map(ApiDefinition::from).collect()
        }
    };
    Ok(Json(defs))
}

#[derive(Debug, Deserialize)]
struct LookupParams {
    q: String,
}

async fn lookup_ratio(Query(params): Query<LookupParams>) -> Result<Json<ApiDefinition>, ApiError> {
    knowledge::lookup(&params.q)
        .map(|def| Json(ApiDefinition::from(def)))
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, knowledge::NOT_FOUND_HINT))
}

#[derive(Debug, Deserialize)]
struct CalculateRequest {
    csv: String,
    periods: Option<Vec<String>>,
    header_rows: Option<usize>,
    auxiliary: Option<AuxiliarySeries>,
}

#[derive(Debug, Serialize)]
struct DisplayTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct CalculateResponse {
    ratios: RatioResult,
    table: DisplayTable,
    reference_assumptions: bool,
}

async fn calculate_ratios(
    State(state): State<AppState>,
    Json(req): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>, ApiError> {
    let header_rows = req.header_rows.unwrap_or(state.header_rows);
    let periods = req.periods.unwrap_or(state.periods);
    let reference_assumptions = req.auxiliary.is_none();
    let auxiliary = req.auxiliary.unwrap_or_else(AuxiliarySeries::reference);

    let statement = statement::read_statement(req.csv.as_bytes(), header_rows)?;
    let ratios = calculator::compute(&statement, &periods, &auxiliary)?;

    tracing::info!(
        periods = ratios.rows.len(),
        line_items = statement.line_items().len(),
        reference_assumptions,
        "ratios calculated"
    );

    Ok(Json(CalculateResponse {
        table: display_table(&ratios),
        ratios,
        reference_assumptions,
    }))
}

fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

fn display_table(ratios: &RatioResult) -> DisplayTable {
    let mut columns = vec!["Period".to_string()];
    columns.extend(RatioName::ALL.iter().map(|r| r.label().to_string()));

    let rows = ratios
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.period.clone()];
            cells.extend(RatioName::ALL.iter().map(|r| format_ratio(row.get(*r))));
            cells
        })
        .collect();

    DisplayTable { columns, rows }
}

#[derive(Debug, Deserialize)]
struct TrendRequest {
    ratios: RatioResult,
    selected: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct TrendResponse {
    available: Vec<RatioName>,
    series: Vec<trend::TrendSeries>,
    points: Vec<trend::TrendPoint>,
}

async fn ratio_trend(Json(req): Json<TrendRequest>) -> Result<Json<TrendResponse>, ApiError> {
    if req.ratios.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Please calculate ratios first in the Ratio Calculator.",
        ));
    }

    let selected = match req.selected {
        None => trend::DEFAULT_SELECTION.to_vec(),
        Some(labels) => labels
            .iter()
            .map(|l| {
                RatioName::from_label(l).ok_or_else(|| {
                    ApiError::new(StatusCode::BAD_REQUEST, format!("unknown ratio '{l}'"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
    };

    let series = trend::select(&req.ratios, &selected).map_err(|_| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "Please select at least one ratio to visualize.",
        )
    })?;

    let points = trend::melt(&req.ratios)
        .into_iter()
        .filter(|p| selected.contains(&p.ratio))
        .collect();

    Ok(Json(TrendResponse {
        available: trend::available_ratios(),
        series,
        points,
    }))
}

async fn get_quiz() -> Json<&'static [Question]> {
    Json(quiz::questions())
}

#[derive(Debug, Deserialize)]
struct AnswerRequest {
    answer: String,
}

async fn answer_quiz(
    Path(id): Path<u8>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<Verdict>, ApiError> {
    Ok(Json(quiz::grade(id, &req.answer)?))
}

#[derive(Debug, Deserialize)]
struct FeedbackRequest {
    name: Option<String>,
    feedback: String,
}

#[derive(Debug, Serialize)]
struct FeedbackReceipt {
    id: Uuid,
    received_at: DateTime<Utc>,
    message: &'static str,
}

async fn submit_feedback(Json(req): Json<FeedbackRequest>) -> Result<Json<FeedbackReceipt>, ApiError> {
    let feedback = req.feedback.trim();
    if feedback.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Please enter feedback before submitting.",
        ));
    }

    let receipt = FeedbackReceipt {
        id: Uuid::new_v4(),
        received_at: Utc::now(),
        message: "Thank you for your feedback!",
    };
    let name = req.name.as_deref().map(str::trim).filter(|s| !s.is_empty());
    tracing::info!(
        feedback_id = %receipt.id,
        name = name.unwrap_or("anonymous"),
        chars = feedback.chars().count(),
        "feedback received"
    );

    Ok(Json(receipt))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &ratiotutor_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
