// Expense Gateway - REST API with Axum
//
// Each handler: extract input → one upstream call → map result. The two aggregate
// endpoints fetch the whole collection and reduce it locally.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::aggregate::{total_for_category, total_in_date_range};
use crate::error::{
    GatewayError, OrGatewayError, CATEGORY_FAILED, CREATE_FAILED, DATE_RANGE_FAILED,
    DELETE_FAILED, FETCH_ALL_FAILED, FETCH_ONE_FAILED, UPDATE_FAILED,
};
use crate::model::{ExpenseDraft, TotalResponse};
use crate::upstream::UpstreamClient;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }
}

/// Query string of the date-range endpoint; both bounds are optional on purpose
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

/// Parse a create/update body; only text that is not JSON at all is rejected
fn read_draft(
    headers: &HeaderMap,
    body: &Bytes,
    message: &'static str,
) -> Result<ExpenseDraft, GatewayError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    ExpenseDraft::from_request_body(content_type, body)
        .map_err(|err| GatewayError::bad_body(message, err))
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /expenses - Upstream collection, verbatim
async fn list_expenses(State(state): State<AppState>) -> Result<Json<Value>, GatewayError> {
    let expenses = state.upstream.list_raw().await.or_gateway_error(FETCH_ALL_FAILED)?;
    Ok(Json(expenses))
}

/// GET /expenses/:id - Single upstream record, verbatim
async fn get_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, GatewayError> {
    let expense = state.upstream.get(&id).await.or_gateway_error(FETCH_ONE_FAILED)?;
    Ok(Json(expense))
}

/// POST /expenses - Create, 201 with the upstream-assigned record
async fn create_expense(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, GatewayError> {
    let draft = read_draft(&headers, &body, CREATE_FAILED)?;
    let created = state.upstream.create(&draft).await.or_gateway_error(CREATE_FAILED)?;
    info!(id = ?created.get("id"), "expense created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /expenses/:id - Replace
async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, GatewayError> {
    let draft = read_draft(&headers, &body, UPDATE_FAILED)?;
    let updated = state
        .upstream
        .replace(&id, &draft)
        .await
        .or_gateway_error(UPDATE_FAILED)?;
    info!(id = %id, "expense updated");
    Ok(Json(updated))
}

/// DELETE /expenses/:id - 204, empty body
async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, GatewayError> {
    state.upstream.delete(&id).await.or_gateway_error(DELETE_FAILED)?;
    info!(id = %id, "expense deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /expenses/date-range?startDate=&endDate= - Inclusive date-range total
async fn total_by_date_range(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<TotalResponse>, GatewayError> {
    let expenses = state.upstream.list().await.or_gateway_error(DATE_RANGE_FAILED)?;

    let total = total_in_date_range(
        &expenses,
        query.start_date.as_deref(),
        query.end_date.as_deref(),
    );

    Ok(Json(TotalResponse { total }))
}

/// GET /expenses/category/:category - Exact-match category total
async fn total_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<TotalResponse>, GatewayError> {
    let expenses = state.upstream.list().await.or_gateway_error(CATEGORY_FAILED)?;
    let total = total_for_category(&expenses, &category);
    Ok(Json(TotalResponse { total }))
}

// ============================================================================
// Router
// ============================================================================

/// Build the gateway router. Static segments win over `/:id`, so
/// `/expenses/date-range` is never treated as a record id (PUT/DELETE there get 405).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/date-range", get(total_by_date_range))
        .route("/expenses/category/:category", get(total_by_category))
        .route(
            "/expenses/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
