// src/db/cash_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::cash::CashRegister};

#[derive(Clone)]
pub struct CashRegisterRepository {
    pool: PgPool,
}

impl CashRegisterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<CashRegister>, AppError> {
        let registers = sqlx::query_as::<_, CashRegister>(
            "SELECT * FROM cash_registers ORDER BY opened_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(registers)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<CashRegister>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let register = sqlx::query_as::<_, CashRegister>("SELECT * FROM cash_registers WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(register)
    }

    /// O caixa aberto no momento, se houver (nunca há mais de um).
    pub async fn find_open<'e, E>(&self, executor: E) -> Result<Option<CashRegister>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let register = sqlx::query_as::<_, CashRegister>(
            "SELECT * FROM cash_registers WHERE state = 'open' ORDER BY opened_at DESC LIMIT 1",
        )
        .fetch_optional(executor)
        .await?;

        Ok(register)
    }

    pub async fn open<'e, E>(
        &self,
        executor: E,
        opening_cash: Decimal,
        opening_transfer: Decimal,
        opening_notes: Option<&str>,
    ) -> Result<CashRegister, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let register = sqlx::query_as::<_, CashRegister>(
            r#"
            INSERT INTO cash_registers (opening_cash, opening_transfer, opening_notes)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(opening_cash)
        .bind(opening_transfer)
        .bind(opening_notes)
        .fetch_one(executor)
        .await?;

        Ok(register)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn close<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        counted_cash: Decimal,
        counted_transfer: Decimal,
        variance_cash: Decimal,
        variance_transfer: Decimal,
        closing_notes: Option<&str>,
        closed_at: DateTime<Utc>,
    ) -> Result<CashRegister, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let register = sqlx::query_as::<_, CashRegister>(
            r#"
            UPDATE cash_registers
            SET state = 'closed',
                counted_cash = $2,
                counted_transfer = $3,
                variance_cash = $4,
                variance_transfer = $5,
                closing_notes = $6,
                closed_at = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(counted_cash)
        .bind(counted_transfer)
        .bind(variance_cash)
        .bind(variance_transfer)
        .bind(closing_notes)
        .bind(closed_at)
        .fetch_one(executor)
        .await?;

        Ok(register)
    }
}
