// src/db/payment_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        cash::CashFlowTotals,
        payments::{Payment, PaymentDirection, PaymentKind, PaymentMethod},
        rentals::RentalDepositState,
    },
};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        cash_register_id: Option<Uuid>,
        order_id: Option<Uuid>,
        rental_id: Option<Uuid>,
    ) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE ($1::UUID IS NULL OR cash_register_id = $1)
              AND ($2::UUID IS NULL OR order_id = $2)
              AND ($3::UUID IS NULL OR rental_id = $3)
            ORDER BY paid_at DESC, id DESC
            "#,
        )
        .bind(cash_register_id)
        .bind(order_id)
        .bind(rental_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create<'e, E>(
        &self,
        executor: E,
        order_id: Option<Uuid>,
        rental_id: Option<Uuid>,
        client_id: Option<Uuid>,
        kind: PaymentKind,
        direction: PaymentDirection,
        amount: Decimal,
        method: PaymentMethod,
        receipt_reference: Option<&str>,
        notes: Option<&str>,
        deposit_state: Option<RentalDepositState>,
        cash_register_id: Option<Uuid>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                order_id, rental_id, client_id, kind, direction, amount,
                method, receipt_reference, notes, deposit_state, cash_register_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(rental_id)
        .bind(client_id)
        .bind(kind)
        .bind(direction)
        .bind(amount)
        .bind(method)
        .bind(receipt_reference)
        .bind(notes)
        .bind(deposit_state)
        .bind(cash_register_id)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    /// Entradas e saídas de um caixa, separadas por meio de pagamento.
    pub async fn totals_for_register<'e, E>(
        &self,
        executor: E,
        cash_register_id: Uuid,
    ) -> Result<CashFlowTotals, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let totals = sqlx::query_as::<_, CashFlowTotals>(
            r#"
            SELECT
                COALESCE(SUM(amount) FILTER (WHERE direction = 'INCOME'  AND method = 'CASH'),     0) AS income_cash,
                COALESCE(SUM(amount) FILTER (WHERE direction = 'INCOME'  AND method = 'TRANSFER'), 0) AS income_transfer,
                COALESCE(SUM(amount) FILTER (WHERE direction = 'EXPENSE' AND method = 'CASH'),     0) AS expense_cash,
                COALESCE(SUM(amount) FILTER (WHERE direction = 'EXPENSE' AND method = 'TRANSFER'), 0) AS expense_transfer
            FROM payments
            WHERE cash_register_id = $1
            "#,
        )
        .bind(cash_register_id)
        .fetch_one(executor)
        .await?;

        Ok(totals)
    }
}
