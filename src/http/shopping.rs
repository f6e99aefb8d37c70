//! Shopping list endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use super::error::{ApiJson, ApiPath, ApiQuery, AppError};
use crate::app::AppState;
use crate::store::shopping::{CreateShoppingItem, ShoppingFilter, ShoppingItem, UpdateShoppingItem};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shopping", get(list_items).post(create_item))
        .route(
            "/shopping/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
}

async fn list_items(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ShoppingFilter>,
) -> Result<Json<Vec<ShoppingItem>>, AppError> {
    Ok(Json(state.shopping.list(&filter).await?))
}

async fn create_item(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateShoppingItem>,
) -> Result<(StatusCode, Json<ShoppingItem>), AppError> {
    let item = state.shopping.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ShoppingItem>, AppError> {
    Ok(Json(state.shopping.get(id).await?))
}

async fn update_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(changes): ApiJson<UpdateShoppingItem>,
) -> Result<Json<ShoppingItem>, AppError> {
    Ok(Json(state.shopping.update(id, &changes).await?))
}

async fn delete_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    state.shopping.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
