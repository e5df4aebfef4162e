// src/services/incident_service.rs

use chrono::Utc;
use sqlx::{Acquire, Executor, PgConnection, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{IncidentRepository, OrderRepository, ProductRepository, RentalRepository},
    models::{
        incidents::{Incident, IncidentKind, IncidentOutcome, IncidentState},
        orders::OrderDepositState,
        rentals::{RentalDepositState, RentalState},
    },
};

/// Teto para um novo incidente: o que o item tem alugado menos o que os
/// incidentes ABERTOS do mesmo item já reivindicaram.
pub fn incident_cap(line_quantity: i32, open_claims: i64) -> i64 {
    (i64::from(line_quantity) - open_claims).max(0)
}

/// Estado provisório da garantia a partir da foto dos incidentes:
/// aberto pendura, custo desconta, nada devolve.
pub fn interim_deposit_states(
    open_count: i64,
    with_cost_count: i64,
) -> (RentalDepositState, OrderDepositState) {
    if open_count > 0 {
        (RentalDepositState::Pending, OrderDepositState::Pending)
    } else if with_cost_count > 0 {
        (RentalDepositState::Applied, OrderDepositState::Deducted)
    } else {
        (RentalDepositState::Returned, OrderDepositState::Returned)
    }
}

#[derive(Clone)]
pub struct IncidentService {
    incident_repo: IncidentRepository,
    rental_repo: RentalRepository,
    order_repo: OrderRepository,
    product_repo: ProductRepository,
}

impl IncidentService {
    pub fn new(
        incident_repo: IncidentRepository,
        rental_repo: RentalRepository,
        order_repo: OrderRepository,
        product_repo: ProductRepository,
    ) -> Self {
        Self {
            incident_repo,
            rental_repo,
            order_repo,
            product_repo,
        }
    }

    pub async fn list(
        &self,
        state: Option<IncidentState>,
        rental_item_id: Option<Uuid>,
    ) -> Result<Vec<Incident>, AppError> {
        self.incident_repo.list(state, rental_item_id).await
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        rental_item_id: Uuid,
        description: Option<&str>,
        kind: IncidentKind,
        quantity_affected: i32,
    ) -> Result<Incident, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if quantity_affected <= 0 {
            return Err(AppError::Validation(
                "cantidad_afectada deve ser um inteiro maior que zero.".into(),
            ));
        }

        let mut tx = executor.begin().await?;

        let item = self
            .rental_repo
            .find_item(&mut *tx, rental_item_id)
            .await?
            .ok_or_else(|| AppError::Validation("Detalhe de aluguel inválido.".into()))?;
        let rental = self
            .rental_repo
            .find_by_id(&mut *tx, item.rental_id)
            .await?
            .ok_or(AppError::NotFound("Aluguel"))?;

        if matches!(rental.state, RentalState::Finalized | RentalState::Cancelled) {
            return Err(AppError::InvalidTransition {
                entity: "aluguel",
                state: format!("{:?}", rental.state).to_lowercase(),
            });
        }

        let open_claims = self
            .incident_repo
            .open_claims_for_item(&mut *tx, rental_item_id, None)
            .await?;
        let cap = incident_cap(item.quantity, open_claims);
        if i64::from(quantity_affected) > cap {
            return Err(AppError::Validation(format!(
                "cantidad_afectada não pode superar {cap}. (Alugado: {}, reivindicado por outros incidentes abertos: {open_claims})",
                item.quantity
            )));
        }

        let incident = self
            .incident_repo
            .create(&mut *tx, rental_item_id, description, kind, quantity_affected)
            .await?;

        self.recompute_interim_deposit(&mut *tx, item.rental_id).await?;

        tx.commit().await?;
        Ok(incident)
    }

    /// Transição aberto → resolvido, com o efeito de estoque do desfecho:
    /// reintegrado devolve o afetado intacto; reposto devolve o reposto e
    /// gera custo para a liquidação.
    pub async fn resolve<'e, E>(
        &self,
        executor: E,
        incident_id: Uuid,
        outcome: IncidentOutcome,
        quantity_replaced: Option<i32>,
    ) -> Result<Incident, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let incident = self
            .incident_repo
            .find_by_id(&mut *tx, incident_id)
            .await?
            .ok_or(AppError::NotFound("Incidente"))?;

        if incident.state != IncidentState::Open {
            return Err(AppError::InvalidTransition {
                entity: "incidente",
                state: format!("{:?}", incident.state).to_lowercase(),
            });
        }

        // (unidades cobradas, unidades que voltam ao estoque)
        let (replaced_units, restored) = match outcome {
            IncidentOutcome::NoAction => {
                return Err(AppError::Validation(
                    "Informe 'replaced' ou 'reintegrated' para resolver o incidente.".into(),
                ));
            }
            IncidentOutcome::Reintegrated => {
                if incident.kind == IncidentKind::Irreparable {
                    return Err(AppError::Validation(
                        "Um incidente irreparável não pode ser marcado como reintegrado.".into(),
                    ));
                }
                // O item voltou inteiro: devolve o afetado, sem custo
                (0, incident.quantity_affected)
            }
            IncidentOutcome::Replaced => {
                // Sem valor explícito assume-se reposição integral
                let units = quantity_replaced.unwrap_or(incident.quantity_affected);
                if units <= 0 {
                    return Err(AppError::Validation(
                        "Informe cantidad_repuesta maior que zero para 'replaced'.".into(),
                    ));
                }
                if units > incident.quantity_affected {
                    return Err(AppError::Validation(
                        "Não se pode repor mais do que o afetado.".into(),
                    ));
                }
                (units, units)
            }
        };

        // Efeito de estoque do desfecho
        let item = self
            .rental_repo
            .find_item(&mut *tx, incident.rental_item_id)
            .await?
            .ok_or(AppError::NotFound("Item de aluguel"))?;
        let mut product = self
            .product_repo
            .find_by_id_for_update(&mut *tx, item.product_id)
            .await?
            .ok_or(AppError::NotFound("Produto"))?;
        product.return_to_stock(restored)?;
        self.product_repo
            .update_stock(&mut *tx, product.id, product.stock, product.stock_reserved)
            .await?;

        let incident = self
            .incident_repo
            .resolve(&mut *tx, incident_id, outcome, replaced_units, Utc::now())
            .await?;

        self.recompute_interim_deposit(&mut *tx, item.rental_id).await?;

        tx.commit().await?;
        Ok(incident)
    }

    /// Anula um incidente aberto (registro errado); sem efeito de estoque.
    pub async fn void<'e, E>(&self, executor: E, incident_id: Uuid) -> Result<Incident, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let incident = self
            .incident_repo
            .find_by_id(&mut *tx, incident_id)
            .await?
            .ok_or(AppError::NotFound("Incidente"))?;
        if incident.state != IncidentState::Open {
            return Err(AppError::InvalidTransition {
                entity: "incidente",
                state: format!("{:?}", incident.state).to_lowercase(),
            });
        }

        let incident = self
            .incident_repo
            .set_state(&mut *tx, incident_id, IncidentState::Voided)
            .await?;

        let item = self
            .rental_repo
            .find_item(&mut *tx, incident.rental_item_id)
            .await?
            .ok_or(AppError::NotFound("Item de aluguel"))?;
        self.recompute_interim_deposit(&mut *tx, item.rental_id).await?;

        tx.commit().await?;
        Ok(incident)
    }

    /// Apagar só é permitido depois de resolvido — protege reclamações
    /// de dano ainda em aberto.
    pub async fn delete<'e, E>(&self, executor: E, incident_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let incident = self
            .incident_repo
            .find_by_id(&mut *tx, incident_id)
            .await?
            .ok_or(AppError::NotFound("Incidente"))?;
        if incident.state != IncidentState::Resolved {
            return Err(AppError::Validation(
                "Não se pode eliminar um incidente que não está resolvido.".into(),
            ));
        }

        let item = self
            .rental_repo
            .find_item(&mut *tx, incident.rental_item_id)
            .await?
            .ok_or(AppError::NotFound("Item de aluguel"))?;

        self.incident_repo.delete(&mut *tx, incident_id).await?;
        self.recompute_interim_deposit(&mut *tx, item.rental_id).await?;

        tx.commit().await?;
        Ok(())
    }

    // Recalcula o estado provisório da garantia do aluguel (e do pedido
    // vinculado). Chamada direta e síncrona em toda mutação de incidente;
    // a liquidação da finalização é quem dá a palavra final.
    async fn recompute_interim_deposit(
        &self,
        conn: &mut PgConnection,
        rental_id: Uuid,
    ) -> Result<(), AppError> {
        let rental = self
            .rental_repo
            .find_by_id(&mut *conn, rental_id)
            .await?
            .ok_or(AppError::NotFound("Aluguel"))?;

        // Depois de finalizado o estado é definitivo
        if rental.state == RentalState::Finalized {
            return Ok(());
        }

        let (open_count, with_cost_count) = self
            .incident_repo
            .deposit_relevant_counts(&mut *conn, rental_id)
            .await?;
        let (rental_state, order_state) = interim_deposit_states(open_count, with_cost_count);

        self.rental_repo
            .set_deposit_state(&mut *conn, rental_id, rental_state)
            .await?;
        if let Some(order_id) = rental.order_id {
            self.order_repo
                .set_deposit_state(&mut *conn, order_id, order_state)
                .await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_subtracts_open_claims_and_floors_at_zero() {
        assert_eq!(incident_cap(5, 0), 5);
        assert_eq!(incident_cap(5, 3), 2);
        assert_eq!(incident_cap(5, 5), 0);
        // Reivindicações acima do alugado não geram teto negativo
        assert_eq!(incident_cap(5, 9), 0);
    }

    #[test]
    fn interim_state_prefers_open_then_cost() {
        assert_eq!(
            interim_deposit_states(2, 1),
            (RentalDepositState::Pending, OrderDepositState::Pending)
        );
        assert_eq!(
            interim_deposit_states(0, 1),
            (RentalDepositState::Applied, OrderDepositState::Deducted)
        );
        assert_eq!(
            interim_deposit_states(0, 0),
            (RentalDepositState::Returned, OrderDepositState::Returned)
        );
    }
}
