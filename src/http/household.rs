//! Household item endpoints, including reminders

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;

use super::error::{ApiJson, ApiPath, ApiQuery, AppError};
use crate::app::AppState;
use crate::reminders::{self, Reminder};
use crate::store::household::{
    CreateHouseholdItem, HouseholdFilter, HouseholdItem, UpdateHouseholdItem,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/household-items", get(list_items).post(create_item))
        .route("/household-items/reminders", get(list_reminders))
        .route(
            "/household-items/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
}

async fn list_items(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<HouseholdFilter>,
) -> Result<Json<Vec<HouseholdItem>>, AppError> {
    Ok(Json(state.household.list(&filter).await?))
}

async fn create_item(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateHouseholdItem>,
) -> Result<(StatusCode, Json<HouseholdItem>), AppError> {
    let item = state.household.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<HouseholdItem>, AppError> {
    Ok(Json(state.household.get(id).await?))
}

async fn update_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(changes): ApiJson<UpdateHouseholdItem>,
) -> Result<Json<HouseholdItem>, AppError> {
    Ok(Json(state.household.update(id, &changes).await?))
}

async fn delete_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    state.household.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_reminders(State(state): State<AppState>) -> Result<Json<Vec<Reminder>>, AppError> {
    let items = state.household.list(&HouseholdFilter::default()).await?;
    Ok(Json(reminders::evaluate(&items, Utc::now())))
}
