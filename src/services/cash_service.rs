// src/services/cash_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CashRegisterRepository, PaymentRepository},
    models::cash::{CashFlowTotals, CashRegister, CashRegisterSummary},
};

/// Saldo teórico de um meio de pagamento: abertura + entradas - saídas.
pub fn theoretical_balance(opening: Decimal, income: Decimal, expense: Decimal) -> Decimal {
    opening + income - expense
}

#[derive(Clone)]
pub struct CashRegisterService {
    cash_repo: CashRegisterRepository,
    payment_repo: PaymentRepository,
}

impl CashRegisterService {
    pub fn new(cash_repo: CashRegisterRepository, payment_repo: PaymentRepository) -> Self {
        Self {
            cash_repo,
            payment_repo,
        }
    }

    pub async fn list(&self) -> Result<Vec<CashRegister>, AppError> {
        self.cash_repo.list().await
    }

    /// O caixa aberto no momento — a dependência explícita que os fluxos
    /// de pedido/liquidação recebem como parâmetro.
    pub async fn current<'e, E>(&self, executor: E) -> Result<Option<CashRegister>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.cash_repo.find_open(executor).await
    }

    pub async fn open<'e, E>(
        &self,
        executor: E,
        opening_cash: Decimal,
        opening_transfer: Decimal,
        opening_notes: Option<&str>,
    ) -> Result<CashRegister, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        if let Some(open) = self.cash_repo.find_open(&mut *tx).await? {
            return Err(AppError::Conflict(format!(
                "Já existe um caixa aberto ({}).",
                open.id
            )));
        }

        let register = self
            .cash_repo
            .open(&mut *tx, opening_cash, opening_transfer, opening_notes)
            .await?;

        tx.commit().await?;
        Ok(register)
    }

    /// Fecha o caixa com o arqueio contado e grava as diferenças contra
    /// o saldo teórico por meio de pagamento.
    pub async fn close<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        counted_cash: Decimal,
        counted_transfer: Decimal,
        closing_notes: Option<&str>,
    ) -> Result<CashRegister, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let register = self
            .cash_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Caixa"))?;
        if !register.can_close() {
            return Err(AppError::InvalidTransition {
                entity: "caixa",
                state: format!("{:?}", register.state).to_lowercase(),
            });
        }

        let totals = self.payment_repo.totals_for_register(&mut *tx, id).await?;
        let theoretical_cash =
            theoretical_balance(register.opening_cash, totals.income_cash, totals.expense_cash);
        let theoretical_transfer = theoretical_balance(
            register.opening_transfer,
            totals.income_transfer,
            totals.expense_transfer,
        );

        let closed = self
            .cash_repo
            .close(
                &mut *tx,
                id,
                counted_cash,
                counted_transfer,
                counted_cash - theoretical_cash,
                counted_transfer - theoretical_transfer,
                closing_notes,
                Utc::now(),
            )
            .await?;

        tx.commit().await?;
        Ok(closed)
    }

    pub async fn summary(&self, pool: &sqlx::PgPool, id: Uuid) -> Result<CashRegisterSummary, AppError> {
        let register = self
            .cash_repo
            .find_by_id(pool, id)
            .await?
            .ok_or(AppError::NotFound("Caixa"))?;
        let totals: CashFlowTotals = self.payment_repo.totals_for_register(pool, id).await?;

        let theoretical_cash =
            theoretical_balance(register.opening_cash, totals.income_cash, totals.expense_cash);
        let theoretical_transfer = theoretical_balance(
            register.opening_transfer,
            totals.income_transfer,
            totals.expense_transfer,
        );

        Ok(CashRegisterSummary {
            register_id: register.id,
            state: register.state,
            opened_at: register.opened_at,
            closed_at: register.closed_at,
            opening_cash: register.opening_cash,
            opening_transfer: register.opening_transfer,
            totals,
            total_income: totals.total_income(),
            total_expense: totals.total_expense(),
            theoretical_cash,
            theoretical_transfer,
            theoretical_total: theoretical_cash + theoretical_transfer,
            counted_cash: register.counted_cash,
            counted_transfer: register.counted_transfer,
            variance_cash: register.variance_cash,
            variance_transfer: register.variance_transfer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn theoretical_balance_is_opening_plus_income_minus_expense() {
        assert_eq!(theoretical_balance(dec!(1000), dec!(250), dec!(80)), dec!(1170));
        assert_eq!(theoretical_balance(dec!(0), dec!(0), dec!(0)), dec!(0));
        // Mais saídas que entradas deixam o teórico abaixo da abertura
        assert_eq!(theoretical_balance(dec!(100), dec!(0), dec!(30)), dec!(70));
    }
}
