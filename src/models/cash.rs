// src/models/cash.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "cash_register_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CashRegisterState {
    Open,
    Closed,
}

// Sessão de caixa: delimita os pagamentos para conferência.
// No fechamento o arqueio contado é comparado ao saldo teórico
// (abertura + entradas - saídas) por meio de pagamento.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashRegister {
    pub id: Uuid,
    pub state: CashRegisterState,

    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,

    #[schema(example = "1000.00")]
    pub opening_cash: Decimal,
    #[schema(example = "0.00")]
    pub opening_transfer: Decimal,

    pub counted_cash: Option<Decimal>,
    pub counted_transfer: Option<Decimal>,
    pub variance_cash: Option<Decimal>,
    pub variance_transfer: Option<Decimal>,

    pub opening_notes: Option<String>,
    pub closing_notes: Option<String>,
}

impl CashRegister {
    pub fn can_close(&self) -> bool {
        self.state == CashRegisterState::Open
    }
}

// Entradas/saídas acumuladas de um caixa, separadas por meio.
#[derive(Debug, Clone, Copy, Default, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowTotals {
    pub income_cash: Decimal,
    pub income_transfer: Decimal,
    pub expense_cash: Decimal,
    pub expense_transfer: Decimal,
}

impl CashFlowTotals {
    pub fn total_income(&self) -> Decimal {
        self.income_cash + self.income_transfer
    }

    pub fn total_expense(&self) -> Decimal {
        self.expense_cash + self.expense_transfer
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashRegisterSummary {
    pub register_id: Uuid,
    pub state: CashRegisterState,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,

    pub opening_cash: Decimal,
    pub opening_transfer: Decimal,

    #[serde(flatten)]
    pub totals: CashFlowTotals,
    pub total_income: Decimal,
    pub total_expense: Decimal,

    pub theoretical_cash: Decimal,
    pub theoretical_transfer: Decimal,
    pub theoretical_total: Decimal,

    pub counted_cash: Option<Decimal>,
    pub counted_transfer: Option<Decimal>,
    pub variance_cash: Option<Decimal>,
    pub variance_transfer: Option<Decimal>,
}
