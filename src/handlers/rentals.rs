// src/handlers/rentals.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::rentals::{Rental, RentalItem, RentalState, RentalSummary, SettlementSummary},
};

#[derive(Debug, Deserialize)]
pub struct RentalListQuery {
    pub state: Option<RentalState>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalDetailResponse {
    pub rental: Rental,
    pub items: Vec<RentalItem>,
}

#[utoipa::path(
    get,
    path = "/api/rentals",
    tag = "Rentals",
    responses((status = 200, description = "Lista de aluguéis", body = [Rental]))
)]
pub async fn list_rentals(
    State(app_state): State<AppState>,
    Query(query): Query<RentalListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rentals = app_state.rental_service.list(query.state).await?;
    Ok((StatusCode::OK, Json(rentals)))
}

#[utoipa::path(
    get,
    path = "/api/rentals/{id}",
    tag = "Rentals",
    responses(
        (status = 200, description = "Aluguel com itens", body = RentalDetailResponse),
        (status = 404, description = "Aluguel não encontrado")
    )
)]
pub async fn get_rental(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let rental = app_state.rental_service.get(&app_state.db_pool, id).await?;
    let items = app_state
        .rental_service
        .items(&app_state.db_pool, id)
        .await?;
    Ok((StatusCode::OK, Json(RentalDetailResponse { rental, items })))
}

#[utoipa::path(
    post,
    path = "/api/rentals/{id}/deliver",
    tag = "Rentals",
    responses(
        (status = 200, description = "Itens entregues, reservas consumidas", body = Rental),
        (status = 400, description = "Aluguel já entregue, finalizado ou cancelado")
    )
)]
pub async fn deliver_rental(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let rental = app_state
        .rental_service
        .deliver(&app_state.db_pool, id)
        .await?;
    Ok((StatusCode::OK, Json(rental)))
}

#[utoipa::path(
    post,
    path = "/api/rentals/{id}/finalize",
    tag = "Rentals",
    responses(
        (status = 200, description = "Liquidação da garantia", body = SettlementSummary),
        (status = 400, description = "Sem pedido vinculado ou transição inválida")
    )
)]
pub async fn finalize_rental(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    // Pagamentos da liquidação caem no caixa aberto, se houver
    let open_register = app_state.cash_service.current(&app_state.db_pool).await?;

    let summary = app_state
        .rental_service
        .finalize(&app_state.db_pool, id, open_register.as_ref())
        .await?;
    Ok((StatusCode::OK, Json(summary)))
}

#[utoipa::path(
    get,
    path = "/api/rentals/{id}/summary",
    tag = "Rentals",
    responses((status = 200, description = "Resumo do aluguel", body = RentalSummary))
)]
pub async fn rental_summary(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state
        .rental_service
        .summary(&app_state.db_pool, id)
        .await?;
    Ok((StatusCode::OK, Json(summary)))
}

#[utoipa::path(
    delete,
    path = "/api/rentals/{id}",
    tag = "Rentals",
    responses(
        (status = 204, description = "Aluguel removido"),
        (status = 409, description = "Bloqueado por incidentes abertos")
    )
)]
pub async fn delete_rental(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.rental_service.delete(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
