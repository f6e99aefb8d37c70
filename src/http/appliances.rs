//! Smart appliance endpoints

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use super::error::{ApiJson, AppError};
use crate::app::AppState;
use crate::appliances::registry::{ApplianceStatus, SendOutcome};
use crate::appliances::{sync_fridge, ConnectOutcome, ConnectRequest, FridgeItem, SyncReport};
use crate::store::shopping::ShoppingFilter;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/appliances/connect", post(connect))
        .route("/appliances/status", get(status))
        .route("/appliances/fridge/inventory", get(fridge_inventory))
        .route("/appliances/sync", post(sync))
        .route("/appliances/shopping-list", post(send_shopping_list))
}

async fn connect(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ConnectRequest>,
) -> Result<Json<ConnectOutcome>, AppError> {
    if req.appliance_type.trim().is_empty() {
        return Err(AppError::BadRequest("Appliance type must not be blank".to_string()));
    }
    Ok(Json(
        state
            .appliances
            .connect(&req.appliance_type, &req.connection_info),
    ))
}

async fn status(State(state): State<AppState>) -> Json<ApplianceStatus> {
    Json(state.appliances.status())
}

async fn fridge_inventory(State(state): State<AppState>) -> Json<Vec<FridgeItem>> {
    Json(state.appliances.fridge_inventory())
}

async fn sync(State(state): State<AppState>) -> Json<SyncReport> {
    Json(sync_fridge(&state.appliances, &state.household).await)
}

#[derive(Deserialize)]
struct ShoppingListTarget {
    #[serde(rename = "type")]
    appliance_type: String,
}

async fn send_shopping_list(
    State(state): State<AppState>,
    ApiJson(target): ApiJson<ShoppingListTarget>,
) -> Result<Json<SendOutcome>, AppError> {
    let items = state.shopping.list(&ShoppingFilter::default()).await?;
    Ok(Json(
        state
            .appliances
            .send_shopping_list(&target.appliance_type, &items),
    ))
}
