//! Bill endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;

use super::error::{ApiJson, ApiPath, ApiQuery, AppError};
use crate::app::AppState;
use crate::store::bills::{Bill, BillFilter, CreateBill, UpdateBill};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bills", get(list_bills).post(create_bill))
        .route("/bills/upcoming", get(upcoming_bills))
        .route(
            "/bills/:id",
            get(get_bill).put(update_bill).delete(delete_bill),
        )
}

async fn list_bills(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<BillFilter>,
) -> Result<Json<Vec<Bill>>, AppError> {
    Ok(Json(state.bills.list(&filter).await?))
}

async fn create_bill(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateBill>,
) -> Result<(StatusCode, Json<Bill>), AppError> {
    let bill = state.bills.create(&payload).await?;
    tracing::info!(bill_id = bill.id, name = %bill.name, "Bill created");
    Ok((StatusCode::CREATED, Json(bill)))
}

async fn get_bill(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Bill>, AppError> {
    Ok(Json(state.bills.get(id).await?))
}

async fn update_bill(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(changes): ApiJson<UpdateBill>,
) -> Result<Json<Bill>, AppError> {
    Ok(Json(state.bills.update(id, &changes).await?))
}

async fn delete_bill(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    state.bills.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct UpcomingQuery {
    days: Option<i64>,
}

async fn upcoming_bills(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UpcomingQuery>,
) -> Result<Json<Vec<Bill>>, AppError> {
    let days = query.days.unwrap_or(state.config.upcoming_bill_days);
    Ok(Json(state.bills.upcoming(days, Utc::now()).await?))
}
