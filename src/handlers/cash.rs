// src/handlers/cash.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::validate_not_negative,
    models::cash::{CashRegister, CashRegisterSummary},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenRegisterPayload {
    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(example = "1000.00")]
    pub opening_cash: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(example = "0.00")]
    pub opening_transfer: Decimal,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloseRegisterPayload {
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "1250.00")]
    pub counted_cash: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(example = "0.00")]
    pub counted_transfer: Decimal,

    pub notes: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/cash-registers",
    tag = "Cash",
    request_body = OpenRegisterPayload,
    responses(
        (status = 201, description = "Caixa aberto", body = CashRegister),
        (status = 409, description = "Já existe um caixa aberto")
    )
)]
pub async fn open_register(
    State(app_state): State<AppState>,
    Json(payload): Json<OpenRegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let register = app_state
        .cash_service
        .open(
            &app_state.db_pool,
            payload.opening_cash,
            payload.opening_transfer,
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(register)))
}

#[utoipa::path(
    get,
    path = "/api/cash-registers",
    tag = "Cash",
    responses((status = 200, description = "Histórico de caixas", body = [CashRegister]))
)]
pub async fn list_registers(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let registers = app_state.cash_service.list().await?;
    Ok((StatusCode::OK, Json(registers)))
}

#[utoipa::path(
    get,
    path = "/api/cash-registers/current",
    tag = "Cash",
    responses(
        (status = 200, description = "Caixa aberto", body = CashRegister),
        (status = 404, description = "Não há caixa aberto")
    )
)]
pub async fn current_register(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let register = app_state
        .cash_service
        .current(&app_state.db_pool)
        .await?
        .ok_or(AppError::NotFound("Caixa aberto"))?;
    Ok((StatusCode::OK, Json(register)))
}

#[utoipa::path(
    post,
    path = "/api/cash-registers/{id}/close",
    tag = "Cash",
    request_body = CloseRegisterPayload,
    responses(
        (status = 200, description = "Caixa fechado com diferenças calculadas", body = CashRegister),
        (status = 400, description = "Caixa já fechado")
    )
)]
pub async fn close_register(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CloseRegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let register = app_state
        .cash_service
        .close(
            &app_state.db_pool,
            id,
            payload.counted_cash,
            payload.counted_transfer,
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(register)))
}

#[utoipa::path(
    get,
    path = "/api/cash-registers/{id}/summary",
    tag = "Cash",
    responses((status = 200, description = "Resumo do caixa", body = CashRegisterSummary))
)]
pub async fn register_summary(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state
        .cash_service
        .summary(&app_state.db_pool, id)
        .await?;
    Ok((StatusCode::OK, Json(summary)))
}
