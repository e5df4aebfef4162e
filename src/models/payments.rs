// src/models/payments.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::rentals::RentalDepositState;

// Tipos de movimento. O sentido (entrada/saída) é derivado do tipo,
// nunca informado pelo chamador — montos são sempre positivos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentKind {
    DownPayment,
    Balance,
    SecurityDeposit,
    LateReturnFee,
    OtherIncome,
    DepositRefund,
    DepositApplied,
    OtherExpense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_direction", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentDirection {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Transfer,
}

impl PaymentKind {
    pub fn direction(&self) -> PaymentDirection {
        match self {
            PaymentKind::DownPayment
            | PaymentKind::Balance
            | PaymentKind::SecurityDeposit
            | PaymentKind::LateReturnFee
            | PaymentKind::DepositApplied
            | PaymentKind::OtherIncome => PaymentDirection::Income,
            PaymentKind::DepositRefund | PaymentKind::OtherExpense => PaymentDirection::Expense,
        }
    }

    /// Tipos que exigem vínculo com pedido OU aluguel.
    pub fn requires_origin(&self) -> bool {
        matches!(
            self,
            PaymentKind::DownPayment
                | PaymentKind::Balance
                | PaymentKind::SecurityDeposit
                | PaymentKind::DepositRefund
                | PaymentKind::DepositApplied
        )
    }

    /// Tipos de garantia: só fazem sentido contra um aluguel.
    pub fn requires_rental(&self) -> bool {
        matches!(
            self,
            PaymentKind::SecurityDeposit | PaymentKind::DepositRefund | PaymentKind::DepositApplied
        )
    }

    /// Estado de garantia carimbado automaticamente no pagamento.
    pub fn deposit_state(&self) -> Option<RentalDepositState> {
        match self {
            PaymentKind::SecurityDeposit => Some(RentalDepositState::Pending),
            PaymentKind::DepositRefund => Some(RentalDepositState::Returned),
            PaymentKind::DepositApplied => Some(RentalDepositState::Applied),
            _ => None,
        }
    }
}

// Origem como união etiquetada: pedido OU aluguel, nunca os dois.
// Validada na construção em vez de dois campos nulos soltos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOrigin {
    Order(Uuid),
    Rental(Uuid),
}

impl PaymentOrigin {
    pub fn from_ids(order_id: Option<Uuid>, rental_id: Option<Uuid>) -> Result<Option<Self>, AppError> {
        match (order_id, rental_id) {
            (Some(_), Some(_)) => Err(AppError::Validation(
                "Um pagamento não pode apontar para pedido e aluguel ao mesmo tempo.".into(),
            )),
            (Some(order), None) => Ok(Some(PaymentOrigin::Order(order))),
            (None, Some(rental)) => Ok(Some(PaymentOrigin::Rental(rental))),
            (None, None) => Ok(None),
        }
    }

    pub fn order_id(&self) -> Option<Uuid> {
        match self {
            PaymentOrigin::Order(id) => Some(*id),
            PaymentOrigin::Rental(_) => None,
        }
    }

    pub fn rental_id(&self) -> Option<Uuid> {
        match self {
            PaymentOrigin::Rental(id) => Some(*id),
            PaymentOrigin::Order(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub paid_at: DateTime<Utc>,

    pub order_id: Option<Uuid>,
    pub rental_id: Option<Uuid>,
    pub client_id: Option<Uuid>,

    pub kind: PaymentKind,
    pub direction: PaymentDirection,

    #[schema(example = "50.00")]
    pub amount: Decimal,
    pub method: PaymentMethod,

    pub receipt_reference: Option<String>,
    pub notes: Option<String>,

    pub deposit_state: Option<RentalDepositState>,
    pub cash_register_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_deterministic_per_kind() {
        use PaymentDirection::*;
        use PaymentKind::*;
        for (kind, expected) in [
            (DownPayment, Income),
            (Balance, Income),
            (SecurityDeposit, Income),
            (LateReturnFee, Income),
            (DepositApplied, Income),
            (OtherIncome, Income),
            (DepositRefund, Expense),
            (OtherExpense, Expense),
        ] {
            assert_eq!(kind.direction(), expected, "{kind:?}");
        }
    }

    #[test]
    fn deposit_kinds_demand_a_rental() {
        assert!(PaymentKind::SecurityDeposit.requires_rental());
        assert!(PaymentKind::DepositRefund.requires_rental());
        assert!(PaymentKind::DepositApplied.requires_rental());
        assert!(!PaymentKind::Balance.requires_rental());
        assert!(!PaymentKind::OtherExpense.requires_rental());
    }

    #[test]
    fn origin_rejects_order_and_rental_together() {
        let order = Uuid::new_v4();
        let rental = Uuid::new_v4();
        assert!(PaymentOrigin::from_ids(Some(order), Some(rental)).is_err());

        let origin = PaymentOrigin::from_ids(Some(order), None).unwrap().unwrap();
        assert_eq!(origin.order_id(), Some(order));
        assert_eq!(origin.rental_id(), None);

        assert!(PaymentOrigin::from_ids(None, None).unwrap().is_none());
    }

    #[test]
    fn deposit_state_follows_kind() {
        assert_eq!(
            PaymentKind::SecurityDeposit.deposit_state(),
            Some(RentalDepositState::Pending)
        );
        assert_eq!(
            PaymentKind::DepositRefund.deposit_state(),
            Some(RentalDepositState::Returned)
        );
        assert_eq!(
            PaymentKind::DepositApplied.deposit_state(),
            Some(RentalDepositState::Applied)
        );
        assert_eq!(PaymentKind::Balance.deposit_state(), None);
    }
}
