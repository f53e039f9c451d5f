//! Plant list and watering-schedule HTTP handlers.
//!
//! Every mutation holds the store's write lock across validation and update,
//! and checks the index before the body.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use sprinkle_core::{unix_now, PlantError};
use tracing::info;

use crate::dto::{
    parse_body, PlantInfo, RenameRequest, SuccessResponse, UpdateAmountRequest,
    UpdateIntervalRequest,
};
use crate::error::AppError;
use crate::ServerState;

/// Lists all plants in storage order.
pub async fn list(State(state): State<Arc<ServerState>>) -> Json<Vec<PlantInfo>> {
    let now = unix_now();
    let plants = state.plants.read().await;
    Json(plants.plants().iter().map(|p| PlantInfo::new(p, now)).collect())
}

/// Sets the dose dispensed per watering.
pub async fn update_amount(
    State(state): State<Arc<ServerState>>,
    Path(index): Path<String>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, AppError> {
    let req: UpdateAmountRequest = parse_body(&body);

    let mut plants = state.plants.write().await;
    let index = plants.resolve_index(&index)?;
    let oz = req.amount().ok_or(PlantError::InvalidAmount)?;
    plants.set_amount(index, oz)?;

    info!("Plant {} ({}) now gets {} oz per watering", index, plants.plants()[index].name, oz);
    Ok(Json(SuccessResponse::ok()))
}

/// Sets the watering interval from a number of days.
pub async fn update_interval(
    State(state): State<Arc<ServerState>>,
    Path(index): Path<String>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, AppError> {
    let req: UpdateIntervalRequest = parse_body(&body);

    let mut plants = state.plants.write().await;
    let index = plants.resolve_index(&index)?;
    let days = req.days().ok_or(PlantError::InvalidInterval)?;
    let minutes = plants.set_interval_days(index, days)?;

    info!("Plant {} ({}) now waters every {} minutes", index, plants.plants()[index].name, minutes);
    Ok(Json(SuccessResponse::ok()))
}

/// Records an immediate watering with the plant's current dose.
pub async fn water_now(
    State(state): State<Arc<ServerState>>,
    Path(index): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let mut plants = state.plants.write().await;
    let index = plants.resolve_index(&index)?;
    let event = plants.water_now(index, unix_now())?;

    info!("Watered plant {} ({}) with {} oz", index, plants.plants()[index].name, event.amount);
    Ok(Json(SuccessResponse::ok()))
}

/// Renames a plant.
pub async fn rename(
    State(state): State<Arc<ServerState>>,
    Path(index): Path<String>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, AppError> {
    let req: RenameRequest = parse_body(&body);

    let mut plants = state.plants.write().await;
    let index = plants.resolve_index(&index)?;
    let name = req.name().ok_or(PlantError::InvalidName)?;
    let stored = plants.rename(index, name)?;

    info!("Plant {} renamed to {}", index, stored);
    Ok(Json(SuccessResponse::ok()))
}

/// Clears a plant's watering history.
pub async fn reset_history(
    State(state): State<Arc<ServerState>>,
    Path(index): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let mut plants = state.plants.write().await;
    let index = plants.resolve_index(&index)?;
    plants.reset_history(index)?;

    info!("Reset watering history for plant {} ({})", index, plants.plants()[index].name);
    Ok(Json(SuccessResponse::ok()))
}
