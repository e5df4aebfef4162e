// src/models/rentals.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "rental_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RentalState {
    Pending,
    Confirmed,
    Delivered,
    Finalized,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "rental_deposit_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RentalDepositState {
    Pending,
    Returned,
    Applied,
}

// Espelho físico do pedido: acompanha entrega, devolução e o destino
// da garantia. Pode existir sem pedido (aluguel avulso), mas a
// finalização exige o vínculo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: Uuid,
    pub order_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub client_name: Option<String>,

    pub state: RentalState,

    pub deposit_amount: Option<Decimal>,
    pub deposit_state: RentalDepositState,

    pub created_at: DateTime<Utc>,
    pub finalized_at: Option<DateTime<Utc>>,
}

impl Rental {
    pub fn can_finalize(&self) -> bool {
        matches!(
            self.state,
            RentalState::Pending | RentalState::Confirmed | RentalState::Delivered
        )
    }

    pub fn can_deliver(&self) -> bool {
        matches!(self.state, RentalState::Pending | RentalState::Confirmed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalItem {
    pub id: Uuid,
    pub rental_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}


// Resultado estruturado da finalização. Com incidentes abertos não há
// cálculo de custo, então os montantes ficam ausentes da resposta.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettlementSummary {
    pub detail: String,
    pub deposit_state: RentalDepositState,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "30.00")]
    pub deposit_total: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "100.00")]
    pub incident_cost: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "30.00")]
    pub applied: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "0.00")]
    pub returned: Option<Decimal>,
}

// Resumo informativo do aluguel (totais + situação de incidentes).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalSummary {
    pub rental_id: Uuid,
    pub client: Option<String>,
    pub state: RentalState,
    pub deposit_state: RentalDepositState,
    pub rental_total: Decimal,
    pub down_payment: Decimal,
    pub outstanding_balance: Decimal,
    pub deposit_amount: Decimal,
    pub incident_cost: Decimal,
    pub open_incidents: i64,
    pub can_finalize: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rental(state: RentalState) -> Rental {
        Rental {
            id: Uuid::new_v4(),
            order_id: Some(Uuid::new_v4()),
            client_id: None,
            client_name: None,
            state,
            deposit_amount: None,
            deposit_state: RentalDepositState::Pending,
            created_at: Utc::now(),
            finalized_at: None,
        }
    }

    #[test]
    fn finalize_reachable_only_from_active_states() {
        assert!(rental(RentalState::Pending).can_finalize());
        assert!(rental(RentalState::Confirmed).can_finalize());
        assert!(rental(RentalState::Delivered).can_finalize());
        assert!(!rental(RentalState::Finalized).can_finalize());
        assert!(!rental(RentalState::Cancelled).can_finalize());
    }

    #[test]
    fn deliver_only_before_delivery() {
        assert!(rental(RentalState::Pending).can_deliver());
        assert!(rental(RentalState::Confirmed).can_deliver());
        assert!(!rental(RentalState::Delivered).can_deliver());
        assert!(!rental(RentalState::Cancelled).can_deliver());
    }
}
