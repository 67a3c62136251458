//! Formula, period and cross-dataset query handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use datavision::{CalculationResult, DatasetComparison, Formula, Period, PeriodValue};
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Envelope shared by every query response.
#[derive(Serialize)]
pub struct QueryResponse<T> {
    pub success: bool,
    pub result: T,
}

impl<T> QueryResponse<T> {
    fn ok(result: T) -> Json<Self> {
        Json(Self {
            success: true,
            result,
        })
    }
}

/// Request body for a formula evaluation. Missing fields read as empty.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculateRequest {
    pub dataset_id: String,
    pub formula: String,
    pub column_x: String,
    pub column_y: String,
}

/// Request body for a period rollup. Missing fields read as empty.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregateRequest {
    pub dataset_id: String,
    pub date_column: String,
    pub value_column: String,
    pub period: String,
}

/// Rollup payload.
#[derive(Serialize)]
pub struct AggregateResult {
    pub data: Vec<PeriodValue>,
}

/// Request body for a cross-dataset comparison. Missing fields read as empty.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CompareRequest {
    pub dataset_ids: Vec<String>,
    pub value_column: String,
    pub label_column: String,
}

/// POST /api/calculate
pub async fn calculate(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<QueryResponse<CalculationResult>>, ApiError> {
    let Json(req) = payload?;
    let result = state.service.evaluate_formula(
        &req.dataset_id,
        Formula::from_name(&req.formula),
        &req.column_x,
        &req.column_y,
    )?;
    Ok(QueryResponse::ok(result))
}

/// POST /api/aggregate
pub async fn aggregate(
    State(state): State<AppState>,
    payload: Result<Json<AggregateRequest>, JsonRejection>,
) -> Result<Json<QueryResponse<AggregateResult>>, ApiError> {
    let Json(req) = payload?;
    let data = state.service.aggregate_period(
        &req.dataset_id,
        &req.date_column,
        &req.value_column,
        Period::from_name(&req.period),
    )?;
    Ok(QueryResponse::ok(AggregateResult { data }))
}

/// POST /api/compare-datasets
pub async fn compare_datasets(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<QueryResponse<Vec<DatasetComparison>>>, ApiError> {
    let Json(req) = payload?;
    Ok(QueryResponse::ok(state.service.compare_datasets(
        &req.dataset_ids,
        &req.value_column,
        &req.label_column,
    )))
}
