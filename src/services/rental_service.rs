// src/services/rental_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{OrderRepository, ProductRepository, RentalRepository},
    models::{
        cash::CashRegister,
        orders::{OrderDepositState, OrderState},
        payments::{PaymentKind, PaymentMethod, PaymentOrigin},
        rentals::{Rental, RentalDepositState, RentalState, RentalSummary, SettlementSummary},
    },
    services::{
        payment_service::{NewPayment, PaymentService},
        settlement,
    },
};

#[derive(Clone)]
pub struct RentalService {
    rental_repo: RentalRepository,
    order_repo: OrderRepository,
    product_repo: ProductRepository,
    payment_service: PaymentService,
}

impl RentalService {
    pub fn new(
        rental_repo: RentalRepository,
        order_repo: OrderRepository,
        product_repo: ProductRepository,
        payment_service: PaymentService,
    ) -> Self {
        Self {
            rental_repo,
            order_repo,
            product_repo,
            payment_service,
        }
    }

    pub async fn list(&self, state: Option<RentalState>) -> Result<Vec<Rental>, AppError> {
        self.rental_repo.list(state).await
    }

    pub async fn get(&self, pool: &sqlx::PgPool, rental_id: Uuid) -> Result<Rental, AppError> {
        self.rental_repo
            .find_by_id(pool, rental_id)
            .await?
            .ok_or(AppError::NotFound("Aluguel"))
    }

    pub async fn items(
        &self,
        pool: &sqlx::PgPool,
        rental_id: Uuid,
    ) -> Result<Vec<crate::models::rentals::RentalItem>, AppError> {
        self.rental_repo.list_items(pool, rental_id).await
    }

    /// Entrega física: cada item sai do depósito consumindo a reserva.
    /// O pedido vinculado acompanha para "entregue".
    pub async fn deliver<'e, E>(&self, executor: E, rental_id: Uuid) -> Result<Rental, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let rental = self
            .rental_repo
            .find_by_id_for_update(&mut *tx, rental_id)
            .await?
            .ok_or(AppError::NotFound("Aluguel"))?;

        if !rental.can_deliver() {
            return Err(AppError::InvalidTransition {
                entity: "aluguel",
                state: format!("{:?}", rental.state).to_lowercase(),
            });
        }

        for item in self.rental_repo.list_items(&mut *tx, rental_id).await? {
            let mut product = self
                .product_repo
                .find_by_id_for_update(&mut *tx, item.product_id)
                .await?
                .ok_or(AppError::NotFound("Produto"))?;
            product.consume_from_reservation(item.quantity)?;
            self.product_repo
                .update_stock(&mut *tx, product.id, product.stock, product.stock_reserved)
                .await?;
        }

        self.rental_repo
            .set_state(&mut *tx, rental_id, RentalState::Delivered)
            .await?;

        if let Some(order_id) = rental.order_id {
            let order = self
                .order_repo
                .find_by_id(&mut *tx, order_id)
                .await?
                .ok_or(AppError::NotFound("Pedido"))?;
            if matches!(order.state, OrderState::Pending | OrderState::Confirmed) {
                self.order_repo
                    .set_state(&mut *tx, order_id, OrderState::Delivered)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(Rental {
            state: RentalState::Delivered,
            ..rental
        })
    }

    /// Finaliza o aluguel e resolve a garantia.
    ///
    /// Com incidentes abertos a garantia fica pendente e nada é pago.
    /// Caso contrário o custo dos incidentes resolvidos com reposição é
    /// abatido da garantia e os pagamentos de aplicação/devolução são
    /// gerados contra o caixa aberto.
    pub async fn finalize<'e, E>(
        &self,
        executor: E,
        rental_id: Uuid,
        open_register: Option<&CashRegister>,
    ) -> Result<SettlementSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let rental = self
            .rental_repo
            .find_by_id_for_update(&mut *tx, rental_id)
            .await?
            .ok_or(AppError::NotFound("Aluguel"))?;

        let order_id = rental.order_id.ok_or_else(|| {
            AppError::Validation("Este aluguel não está vinculado a um pedido.".into())
        })?;

        if !rental.can_finalize() {
            return Err(AppError::InvalidTransition {
                entity: "aluguel",
                state: format!("{:?}", rental.state).to_lowercase(),
            });
        }

        let order = self
            .order_repo
            .find_by_id(&mut *tx, order_id)
            .await?
            .ok_or(AppError::NotFound("Pedido"))?;

        // Incidentes abertos travam a liquidação: garantia pendente,
        // nenhum pagamento, nenhum custo calculado.
        let open_incidents = self.rental_repo.open_incident_count(&mut *tx, rental_id).await?;
        if open_incidents > 0 {
            self.order_repo
                .set_deposit_state(&mut *tx, order_id, OrderDepositState::Pending)
                .await?;
            self.rental_repo
                .set_deposit_state(&mut *tx, rental_id, RentalDepositState::Pending)
                .await?;
            if rental.state != RentalState::Delivered {
                self.rental_repo
                    .set_state(&mut *tx, rental_id, RentalState::Delivered)
                    .await?;
            }
            tx.commit().await?;

            return Ok(SettlementSummary {
                detail: "Há incidentes abertos; a garantia fica pendente.".into(),
                deposit_state: RentalDepositState::Pending,
                deposit_total: None,
                incident_cost: None,
                applied: None,
                returned: None,
            });
        }

        let charges = self
            .rental_repo
            .resolved_replacement_charges(&mut *tx, rental_id)
            .await?;
        let incident_cost = settlement::total_incident_cost(&charges);
        let deposit_total = order.deposit_amount;

        let outcome = settlement::settle_deposit(deposit_total, incident_cost);

        let client_id = rental.client_id.or(Some(order.client_id));
        if outcome.applied > Decimal::ZERO {
            self.payment_service
                .register_payment(
                    &mut *tx,
                    NewPayment {
                        kind: PaymentKind::DepositApplied,
                        amount: outcome.applied,
                        method: PaymentMethod::Cash,
                        origin: Some(PaymentOrigin::Rental(rental_id)),
                        client_id,
                        receipt_reference: None,
                        notes: Some(format!("Garantia aplicada a incidentes do aluguel {rental_id}.")),
                    },
                    open_register,
                )
                .await?;
        }
        if outcome.returned > Decimal::ZERO {
            self.payment_service
                .register_payment(
                    &mut *tx,
                    NewPayment {
                        kind: PaymentKind::DepositRefund,
                        amount: outcome.returned,
                        method: PaymentMethod::Cash,
                        origin: Some(PaymentOrigin::Rental(rental_id)),
                        client_id,
                        receipt_reference: None,
                        notes: Some(format!("Devolução de garantia do aluguel {rental_id}.")),
                    },
                    open_register,
                )
                .await?;
        }

        self.rental_repo
            .finalize(&mut *tx, rental_id, outcome.deposit_state, Utc::now())
            .await?;
        self.order_repo
            .set_deposit_state(
                &mut *tx,
                order_id,
                settlement::order_deposit_state(outcome.deposit_state),
            )
            .await?;

        tx.commit().await?;

        Ok(SettlementSummary {
            detail: "Aluguel finalizado e garantia resolvida.".into(),
            deposit_state: outcome.deposit_state,
            deposit_total: Some(deposit_total),
            incident_cost: Some(incident_cost),
            applied: Some(outcome.applied),
            returned: Some(outcome.returned),
        })
    }

    /// Resumo informativo (totais, incidentes, saldo) sem efeitos.
    pub async fn summary(&self, pool: &sqlx::PgPool, rental_id: Uuid) -> Result<RentalSummary, AppError> {
        let rental = self.get(pool, rental_id).await?;

        let rental_total = self.rental_repo.rental_total(pool, rental_id).await?;
        let charges = self.rental_repo.resolved_replacement_charges(pool, rental_id).await?;
        let incident_cost = settlement::total_incident_cost(&charges);
        let open_incidents = self.rental_repo.open_incident_count(pool, rental_id).await?;

        let (down_payment, deposit_amount) = match rental.order_id {
            Some(order_id) => {
                let order = self
                    .order_repo
                    .find_by_id(pool, order_id)
                    .await?
                    .ok_or(AppError::NotFound("Pedido"))?;
                (order.down_payment, order.deposit_amount)
            }
            None => (Decimal::ZERO, rental.deposit_amount.unwrap_or(Decimal::ZERO)),
        };

        Ok(RentalSummary {
            rental_id: rental.id,
            client: rental.client_name.clone(),
            state: rental.state,
            deposit_state: rental.deposit_state,
            rental_total,
            down_payment,
            outstanding_balance: (rental_total - down_payment).max(Decimal::ZERO),
            deposit_amount,
            incident_cost,
            open_incidents,
            can_finalize: rental.can_finalize() && open_incidents == 0,
        })
    }

    /// Remoção bloqueada enquanto houver incidentes abertos.
    pub async fn delete(&self, pool: &sqlx::PgPool, rental_id: Uuid) -> Result<(), AppError> {
        let open_incidents = self.rental_repo.open_incident_count(pool, rental_id).await?;
        if open_incidents > 0 {
            return Err(AppError::Conflict(
                "O aluguel não pode ser removido: existem incidentes abertos.".into(),
            ));
        }
        let deleted = self.rental_repo.delete(rental_id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Aluguel"));
        }
        Ok(())
    }
}
