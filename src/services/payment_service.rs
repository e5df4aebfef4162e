// src/services/payment_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{OrderRepository, PaymentRepository, RentalRepository},
    models::{
        cash::CashRegister,
        payments::{Payment, PaymentKind, PaymentMethod, PaymentOrigin},
    },
};

// Entrada de criação: o sentido NÃO entra aqui — é derivado do tipo.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub kind: PaymentKind,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub origin: Option<PaymentOrigin>,
    pub client_id: Option<Uuid>,
    pub receipt_reference: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct PaymentService {
    payment_repo: PaymentRepository,
    order_repo: OrderRepository,
    rental_repo: RentalRepository,
}

impl PaymentService {
    pub fn new(
        payment_repo: PaymentRepository,
        order_repo: OrderRepository,
        rental_repo: RentalRepository,
    ) -> Self {
        Self {
            payment_repo,
            order_repo,
            rental_repo,
        }
    }

    /// Regras de origem por tipo: tipos operacionais exigem pedido OU
    /// aluguel; sinal só contra pedido; garantias só contra aluguel.
    pub fn validate_kind_origin(
        kind: PaymentKind,
        origin: Option<&PaymentOrigin>,
    ) -> Result<(), AppError> {
        if kind.requires_origin() && origin.is_none() {
            return Err(AppError::Validation(
                "Este tipo de pagamento deve estar vinculado a um pedido ou aluguel.".into(),
            ));
        }
        if kind == PaymentKind::DownPayment
            && !matches!(origin, Some(PaymentOrigin::Order(_)))
        {
            return Err(AppError::Validation(
                "Sinais devem estar vinculados a um pedido.".into(),
            ));
        }
        if kind.requires_rental() && !matches!(origin, Some(PaymentOrigin::Rental(_))) {
            return Err(AppError::Validation(
                "Pagamentos de garantia devem estar vinculados a um aluguel.".into(),
            ));
        }
        Ok(())
    }

    /// Registra um movimento de dinheiro. O caixa aberto é decidido pelo
    /// chamador e entra como parâmetro — nada de consulta implícita aqui.
    pub async fn register_payment<'e, E>(
        &self,
        executor: E,
        new_payment: NewPayment,
        open_register: Option<&CashRegister>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if new_payment.amount <= Decimal::ZERO {
            return Err(AppError::Validation("O valor do pagamento deve ser positivo.".into()));
        }
        Self::validate_kind_origin(new_payment.kind, new_payment.origin.as_ref())?;

        let mut tx = executor.begin().await?;

        // Checa que a origem existe e infere o cliente quando ausente
        let client_id = match new_payment.origin {
            Some(PaymentOrigin::Order(order_id)) => {
                let order = self
                    .order_repo
                    .find_by_id(&mut *tx, order_id)
                    .await?
                    .ok_or(AppError::NotFound("Pedido"))?;
                new_payment.client_id.or(Some(order.client_id))
            }
            Some(PaymentOrigin::Rental(rental_id)) => {
                let rental = self
                    .rental_repo
                    .find_by_id(&mut *tx, rental_id)
                    .await?
                    .ok_or(AppError::NotFound("Aluguel"))?;
                new_payment.client_id.or(rental.client_id)
            }
            None => new_payment.client_id,
        };

        let payment = self
            .payment_repo
            .create(
                &mut *tx,
                new_payment.origin.as_ref().and_then(PaymentOrigin::order_id),
                new_payment.origin.as_ref().and_then(PaymentOrigin::rental_id),
                client_id,
                new_payment.kind,
                new_payment.kind.direction(),
                new_payment.amount,
                new_payment.method,
                new_payment.receipt_reference.as_deref(),
                new_payment.notes.as_deref(),
                new_payment.kind.deposit_state(),
                open_register.map(|r| r.id),
            )
            .await?;

        tx.commit().await?;
        Ok(payment)
    }

    pub async fn list(
        &self,
        cash_register_id: Option<Uuid>,
        order_id: Option<Uuid>,
        rental_id: Option<Uuid>,
    ) -> Result<Vec<Payment>, AppError> {
        self.payment_repo
            .list(cash_register_id, order_id, rental_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_rules_per_kind() {
        let order = PaymentOrigin::Order(Uuid::new_v4());
        let rental = PaymentOrigin::Rental(Uuid::new_v4());

        // Saldo aceita qualquer origem, mas precisa de uma
        assert!(PaymentService::validate_kind_origin(PaymentKind::Balance, None).is_err());
        assert!(PaymentService::validate_kind_origin(PaymentKind::Balance, Some(&order)).is_ok());
        assert!(PaymentService::validate_kind_origin(PaymentKind::Balance, Some(&rental)).is_ok());

        // Sinal: só pedido
        assert!(PaymentService::validate_kind_origin(PaymentKind::DownPayment, Some(&rental)).is_err());
        assert!(PaymentService::validate_kind_origin(PaymentKind::DownPayment, Some(&order)).is_ok());

        // Garantias: só aluguel
        for kind in [
            PaymentKind::SecurityDeposit,
            PaymentKind::DepositRefund,
            PaymentKind::DepositApplied,
        ] {
            assert!(PaymentService::validate_kind_origin(kind, Some(&order)).is_err(), "{kind:?}");
            assert!(PaymentService::validate_kind_origin(kind, Some(&rental)).is_ok(), "{kind:?}");
            assert!(PaymentService::validate_kind_origin(kind, None).is_err(), "{kind:?}");
        }

        // Movimentos avulsos dispensam origem
        assert!(PaymentService::validate_kind_origin(PaymentKind::OtherIncome, None).is_ok());
        assert!(PaymentService::validate_kind_origin(PaymentKind::OtherExpense, None).is_ok());
        assert!(PaymentService::validate_kind_origin(PaymentKind::LateReturnFee, None).is_ok());
    }
}
