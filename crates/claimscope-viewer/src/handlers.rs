//! HTTP request handlers for the Viewer service.
//!
//! Read-only endpoints over the artifact corpus, plus the browser page.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router as AxumRouter,
};
use claimscope_corpus::{
    claim_distribution, compute_statistics, ClaimSupport, Corpus, CorpusCache, CorpusError,
    CorpusStatistics, PaperQuery, PaperRecord,
};
use claimscope_domain::{Claim, ModelVariant, Strength, CLAIMS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Corpus snapshots for the configured results directory
    pub cache: Arc<CorpusCache>,
}

/// Raw `/api/papers` query parameters
///
/// Everything arrives as text so bad values become a 400 with a readable
/// message rather than a bare query rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PapersParams {
    /// Comma-separated strengths
    pub strength: Option<String>,
    /// `paper` or `evidence`
    pub strength_mode: Option<String>,
    /// Inclusive minimum claim count
    pub min_claims: Option<String>,
    /// Inclusive maximum claim count
    pub max_claims: Option<String>,
    /// `standard`, `mini`, `nano` or a model id
    pub model: Option<String>,
    /// `true` / `false`
    pub has_insights: Option<String>,
    /// Search text or claim number
    pub q: Option<String>,
    /// Sort key
    pub sort: Option<String>,
    /// `asc` / `desc`
    pub direction: Option<String>,
}

impl PapersParams {
    /// Convert into a validated [`PaperQuery`]
    pub fn into_query(self) -> Result<PaperQuery, AppError> {
        let mut query = PaperQuery::default();

        if let Some(list) = non_empty(self.strength) {
            query.strengths = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<Strength>())
                .collect::<Result<BTreeSet<_>, _>>()
                .map_err(AppError::BadRequest)?;
        }
        if let Some(mode) = non_empty(self.strength_mode) {
            query.strength_mode = mode.parse()?;
        }
        query.min_claims = non_empty(self.min_claims)
            .map(|v| parse_count("min_claims", &v))
            .transpose()?;
        query.max_claims = non_empty(self.max_claims)
            .map(|v| parse_count("max_claims", &v))
            .transpose()?;
        if let Some(model) = non_empty(self.model) {
            query.model = Some(
                model
                    .parse::<ModelVariant>()
                    .map_err(AppError::BadRequest)?,
            );
        }
        if let Some(flag) = non_empty(self.has_insights) {
            query.has_insights = parse_flag(&flag)?;
        }
        query.search = non_empty(self.q);
        if let Some(sort) = non_empty(self.sort) {
            query.sort = Some(sort.parse()?);
        }
        if let Some(direction) = non_empty(self.direction) {
            query.direction = direction.parse()?;
        }

        query.validate()?;
        Ok(query)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_count(name: &str, value: &str) -> Result<usize, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{} must be a non-negative integer, got '{}'", name, value)))
}

fn parse_flag(value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(AppError::BadRequest(format!(
            "has_insights must be true or false, got '{}'",
            other
        ))),
    }
}

/// Paper listing response
#[derive(Debug, Serialize)]
pub struct PapersResponse {
    /// Number of matching papers
    pub total: usize,
    /// Matching papers
    pub papers: Vec<PaperRecord>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Papers in the current snapshot
    pub papers: usize,
    /// Files that failed to load
    pub load_errors: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Invalid query parameter
    BadRequest(String),
    /// Internal server error
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<CorpusError> for AppError {
    fn from(e: CorpusError) -> Self {
        match e {
            CorpusError::InvalidQuery(msg) => AppError::BadRequest(msg),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

/// Fetch the current snapshot off the async executor
async fn snapshot(state: &AppState) -> Result<Arc<Corpus>, AppError> {
    let cache = Arc::clone(&state.cache);
    tokio::task::spawn_blocking(move || cache.snapshot())
        .await
        .map_err(|e| AppError::InternalError(format!("Corpus load task failed: {}", e)))
}

/// GET / - Browser page
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /api/papers - Filtered, searched and sorted papers
async fn list_papers(
    State(state): State<AppState>,
    Query(params): Query<PapersParams>,
) -> Result<Json<PapersResponse>, AppError> {
    let query = params.into_query()?;
    let corpus = snapshot(&state).await?;

    let papers = query.run(&corpus.records);
    debug!(matched = papers.len(), of = corpus.len(), "Paper query");

    Ok(Json(PapersResponse {
        total: papers.len(),
        papers,
    }))
}

/// GET /api/statistics - Aggregate counts for the current snapshot
async fn statistics(State(state): State<AppState>) -> Result<Json<CorpusStatistics>, AppError> {
    let corpus = snapshot(&state).await?;
    Ok(Json(compute_statistics(&corpus.records)))
}

/// GET /api/claim-distribution - Support count per claim
async fn distribution(State(state): State<AppState>) -> Result<Json<Vec<ClaimSupport>>, AppError> {
    let corpus = snapshot(&state).await?;
    Ok(Json(claim_distribution(&corpus.records)))
}

/// GET /api/claims - Reference claim table
async fn claims() -> Json<&'static [Claim]> {
    Json(CLAIMS.as_slice())
}

/// GET /health - Snapshot summary
async fn health_check(State(state): State<AppState>) -> Result<Json<HealthCheckResponse>, AppError> {
    let corpus = snapshot(&state).await?;

    let status = if corpus.errors.is_empty() { "healthy" } else { "degraded" };

    Ok(Json(HealthCheckResponse {
        status: status.to_string(),
        papers: corpus.len(),
        load_errors: corpus.errors.len(),
    }))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/", get(index))
        .route("/api/papers", get(list_papers))
        .route("/api/statistics", get(statistics))
        .route("/api/claim-distribution", get(distribution))
        .route("/api/claims", get(claims))
        .route("/health", get(health_check))
        .with_state(state)
}
