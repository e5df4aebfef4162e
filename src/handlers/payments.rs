// src/handlers/payments.rs

use axum::{
    extract::{Query, State},
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
    models::payments::{Payment, PaymentKind, PaymentMethod, PaymentOrigin},
    services::payment_service::NewPayment,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentPayload {
    #[schema(example = "BALANCE")]
    pub kind: PaymentKind,

    #[schema(example = "150.00")]
    pub amount: Decimal,

    #[schema(example = "CASH")]
    pub method: PaymentMethod,

    // Origem: no máximo um dos dois
    pub order_id: Option<Uuid>,
    pub rental_id: Option<Uuid>,

    // Inferido do pedido/aluguel quando ausente
    pub client_id: Option<Uuid>,

    pub receipt_reference: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    pub cash_register_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub rental_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/payments",
    tag = "Payments",
    request_body = CreatePaymentPayload,
    responses(
        (status = 201, description = "Movimento registrado", body = Payment),
        (status = 400, description = "Tipo/origem incompatíveis")
    )
)]
pub async fn create_payment(
    State(app_state): State<AppState>,
    Json(payload): Json<CreatePaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let origin = PaymentOrigin::from_ids(payload.order_id, payload.rental_id)?;

    // O caixa aberto entra como parâmetro explícito da criação
    let open_register = app_state.cash_service.current(&app_state.db_pool).await?;

    let payment = app_state
        .payment_service
        .register_payment(
            &app_state.db_pool,
            NewPayment {
                kind: payload.kind,
                amount: payload.amount,
                method: payload.method,
                origin,
                client_id: payload.client_id,
                receipt_reference: payload.receipt_reference,
                notes: payload.notes,
            },
            open_register.as_ref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "Payments",
    responses((status = 200, description = "Movimentos", body = [Payment]))
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    Query(query): Query<PaymentListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let payments = app_state
        .payment_service
        .list(query.cash_register_id, query.order_id, query.rental_id)
        .await?;
    Ok((StatusCode::OK, Json(payments)))
}
