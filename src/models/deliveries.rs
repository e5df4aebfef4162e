// src/models/deliveries.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "delivery_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    Pending,
    EnRoute,
    Delivered,
    NotDelivered,
    Cancelled,
}

// Registro logístico da entrega. O efeito de estoque fica na entrega
// do aluguel (RentalService::deliver), não aqui.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: Uuid,
    pub rental_id: Uuid,

    pub scheduled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,

    pub address: String,
    pub state: DeliveryState,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
}
