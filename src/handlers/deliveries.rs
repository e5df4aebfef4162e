// src/handlers/deliveries.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::deliveries::{Delivery, DeliveryState},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeliveryPayload {
    pub rental_id: Uuid,

    pub scheduled_at: DateTime<Utc>,

    #[validate(length(min = 3, message = "A direção é obrigatória."))]
    #[schema(example = "Av. Córdoba 1234")]
    pub address: String,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeliveryPayload {
    pub state: DeliveryState,
}

#[derive(Debug, Deserialize)]
pub struct DeliveryListQuery {
    pub rental_id: Option<Uuid>,
    pub state: Option<DeliveryState>,
}

#[utoipa::path(
    post,
    path = "/api/deliveries",
    tag = "Deliveries",
    request_body = CreateDeliveryPayload,
    responses((status = 201, description = "Entrega agendada", body = Delivery))
)]
pub async fn create_delivery(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateDeliveryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let delivery = app_state
        .delivery_service
        .create(
            &app_state.db_pool,
            payload.rental_id,
            payload.scheduled_at,
            &payload.address,
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(delivery)))
}

#[utoipa::path(
    get,
    path = "/api/deliveries",
    tag = "Deliveries",
    responses((status = 200, description = "Lista de entregas", body = [Delivery]))
)]
pub async fn list_deliveries(
    State(app_state): State<AppState>,
    Query(query): Query<DeliveryListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let deliveries = app_state
        .delivery_service
        .list(query.rental_id, query.state)
        .await?;
    Ok((StatusCode::OK, Json(deliveries)))
}

#[utoipa::path(
    patch,
    path = "/api/deliveries/{id}",
    tag = "Deliveries",
    request_body = UpdateDeliveryPayload,
    responses((status = 200, description = "Estado atualizado", body = Delivery))
)]
pub async fn update_delivery(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDeliveryPayload>,
) -> Result<impl IntoResponse, AppError> {
    let delivery = app_state
        .delivery_service
        .update_state(&app_state.db_pool, id, payload.state)
        .await?;
    Ok((StatusCode::OK, Json(delivery)))
}
