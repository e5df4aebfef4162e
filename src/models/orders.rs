// src/models/orders.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    Pending,
    Confirmed,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "delivery_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    Pickup,
    HomeDelivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "deposit_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DepositKind {
    Dni,
    Service,
    Other,
}

// Do lado do pedido a garantia consumida chama-se "deducted"
// (no aluguel espelho o mesmo desfecho aparece como "applied").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_deposit_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderDepositState {
    Pending,
    Returned,
    Deducted,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub client_id: Uuid,
    pub state: OrderState,

    pub event_at: Option<DateTime<Utc>>,
    pub return_at: Option<DateTime<Utc>>,

    pub delivery_kind: DeliveryKind,
    pub event_address: Option<String>,
    pub delivery_reference: Option<String>,
    #[schema(example = "0.00")]
    pub shipping_cost: Decimal,

    #[schema(example = "200.00")]
    pub total: Decimal,
    #[schema(example = "50.00")]
    pub down_payment: Decimal,
    pub payment_method: Option<String>,

    // Garantia retida contra danos
    #[schema(example = "30.00")]
    pub deposit_amount: Decimal,
    pub deposit_kind: DepositKind,
    pub deposit_state: OrderDepositState,

    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Só pedidos já encerrados (entregues ou cancelados) podem ser apagados.
    pub fn can_delete(&self) -> bool {
        matches!(self.state, OrderState::Delivered | OrderState::Cancelled)
    }

    pub fn can_cancel(&self) -> bool {
        matches!(self.state, OrderState::Pending | OrderState::Confirmed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    #[schema(example = 2)]
    pub quantity: i32,
    #[schema(example = "100.00")]
    pub unit_price: Decimal,
}

impl OrderItem {
    pub fn subtotal(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

// Resposta composta do POST /api/orders (pedido + espelho)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithRental {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub rental: crate::models::rentals::Rental,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(quantity: i32, unit_price: Decimal) -> OrderItem {
        OrderItem {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn subtotal_multiplies_quantity_by_captured_price() {
        assert_eq!(item(2, dec!(100.00)).subtotal(), dec!(200.00));
        assert_eq!(item(1, dec!(0.50)).subtotal(), dec!(0.50));
    }

    fn order_in(state: OrderState) -> Order {
        Order {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            state,
            event_at: None,
            return_at: None,
            delivery_kind: DeliveryKind::Pickup,
            event_address: None,
            delivery_reference: None,
            shipping_cost: Decimal::ZERO,
            total: Decimal::ZERO,
            down_payment: Decimal::ZERO,
            payment_method: None,
            deposit_amount: Decimal::ZERO,
            deposit_kind: DepositKind::Dni,
            deposit_state: OrderDepositState::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn lifecycle_gates() {
        assert!(order_in(OrderState::Pending).can_cancel());
        assert!(order_in(OrderState::Confirmed).can_cancel());
        assert!(!order_in(OrderState::Delivered).can_cancel());
        assert!(!order_in(OrderState::Cancelled).can_cancel());

        assert!(order_in(OrderState::Delivered).can_delete());
        assert!(order_in(OrderState::Cancelled).can_delete());
        assert!(!order_in(OrderState::Pending).can_delete());
    }
}
