// src/handlers/products.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::validate_not_negative,
    models::products::{Product, ProductCategory, RangeAvailability},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Copa de cristal")]
    pub name: String,

    pub description: Option<String>,

    pub category: ProductCategory,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "150.00")]
    pub price: Decimal,

    // Estoque inicial; pode ser zero para itens só de catálogo
    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    #[serde(default)]
    pub stock: i32,

    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductPayload,
    responses((status = 201, description = "Produto criado", body = Product))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .inventory_service
        .create_product(
            &payload.name,
            payload.description.as_deref(),
            payload.category,
            payload.price,
            payload.stock,
            payload.image_url.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses((status = 200, description = "Catálogo", body = [Product]))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state
        .inventory_service
        .list_products(query.search.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(products)))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    responses(
        (status = 200, description = "Produto", body = Product),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state
        .inventory_service
        .get_product(&app_state.db_pool, id)
        .await?;
    Ok((StatusCode::OK, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    request_body = CreateProductPayload,
    responses((status = 200, description = "Produto atualizado", body = Product))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    // O estoque não entra aqui: contadores só mudam pelas operações
    // de reserva/entrega/devolução.
    let product = app_state
        .inventory_service
        .update_product(
            id,
            &payload.name,
            payload.description.as_deref(),
            payload.category,
            payload.price,
            payload.image_url.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}/toggle-active",
    tag = "Products",
    responses((status = 200, description = "Flag invertido", body = Product))
)]
pub async fn toggle_active(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state
        .inventory_service
        .toggle_active(&app_state.db_pool, id)
        .await?;
    Ok((StatusCode::OK, Json(product)))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    responses(
        (status = 204, description = "Produto removido"),
        (status = 409, description = "Bloqueado por incidentes abertos ou referências")
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.inventory_service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/availability",
    tag = "Products",
    params(
        ("start" = String, Query, description = "Início do intervalo (ISO 8601)"),
        ("end" = String, Query, description = "Fim do intervalo (ISO 8601)")
    ),
    responses((status = 200, description = "Disponibilidade no intervalo", body = RangeAvailability))
)]
pub async fn availability(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let availability = app_state
        .inventory_service
        .availability_in_range(&app_state.db_pool, id, query.start, query.end)
        .await?;
    Ok((StatusCode::OK, Json(availability)))
}
