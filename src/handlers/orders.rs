// src/handlers/orders.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::validate_not_negative,
    models::orders::{DeliveryKind, DepositKind, Order, OrderItem, OrderState, OrderWithRental},
    services::order_service::{NewOrder, NewOrderItem},
};

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 2)]
    pub quantity: i32,

    // Sobrescreve o preço de catálogo quando presente
    #[validate(custom(function = "validate_not_negative"))]
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub client_id: Uuid,

    #[validate(length(min = 1, message = "O pedido precisa de ao menos um item."), nested)]
    pub items: Vec<OrderItemPayload>,

    pub event_at: DateTime<Utc>,
    pub return_at: DateTime<Utc>,

    pub delivery_kind: Option<DeliveryKind>,
    pub event_address: Option<String>,
    pub delivery_reference: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub shipping_cost: Decimal,

    // Sinal pago na criação; > 0 gera o pagamento de entrada
    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub down_payment: Decimal,

    #[schema(example = "transferencia")]
    pub payment_method: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub deposit_amount: Decimal,

    pub deposit_kind: Option<DepositKind>,
    pub receipt_reference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub state: Option<OrderState>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailResponse {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido + aluguel espelho criados", body = OrderWithRental),
        (status = 400, description = "Datas inválidas, estoque insuficiente ou caixa fechado")
    )
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    // Porta de entrada: sem caixa aberto não se criam pedidos
    let open_register = app_state
        .cash_service
        .current(&app_state.db_pool)
        .await?
        .ok_or(AppError::NoOpenRegister)?;

    let new_order = NewOrder {
        client_id: payload.client_id,
        items: payload
            .items
            .iter()
            .map(|item| NewOrderItem {
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect(),
        event_at: payload.event_at,
        return_at: payload.return_at,
        delivery_kind: payload.delivery_kind.unwrap_or(DeliveryKind::Pickup),
        event_address: payload.event_address,
        delivery_reference: payload.delivery_reference,
        shipping_cost: payload.shipping_cost,
        down_payment: payload.down_payment,
        payment_method: payload.payment_method,
        deposit_amount: payload.deposit_amount,
        deposit_kind: payload.deposit_kind.unwrap_or(DepositKind::Dni),
        receipt_reference: payload.receipt_reference,
    };

    let (order, items, rental) = app_state
        .order_service
        .create_order_with_rental(&app_state.db_pool, new_order, &open_register)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderWithRental { order, items, rental }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    responses((status = 200, description = "Lista de pedidos", body = [Order]))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.order_service.list(query.state).await?;
    Ok((StatusCode::OK, Json(orders)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedido com itens", body = OrderDetailResponse),
        (status = 404, description = "Pedido não encontrado")
    )
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (order, items) = app_state
        .order_service
        .get_with_items(&app_state.db_pool, id)
        .await?;
    Ok((StatusCode::OK, Json(OrderDetailResponse { order, items })))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/confirm",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedido confirmado", body = Order),
        (status = 400, description = "Pedido não está pendente")
    )
)]
pub async fn confirm_order(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .order_service
        .confirm(&app_state.db_pool, id)
        .await?;
    Ok((StatusCode::OK, Json(order)))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/cancel",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedido cancelado, reservas liberadas", body = Order),
        (status = 400, description = "Pedido já entregue")
    )
)]
pub async fn cancel_order(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .order_service
        .cancel(&app_state.db_pool, id)
        .await?;
    Ok((StatusCode::OK, Json(order)))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "Orders",
    responses(
        (status = 204, description = "Pedido removido"),
        (status = 405, description = "Só pedidos cancelados ou entregues podem ser apagados")
    )
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.order_service.delete(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
