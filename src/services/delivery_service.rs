// src/services/delivery_service.rs

use chrono::{DateTime, Utc};
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DeliveryRepository, RentalRepository},
    models::deliveries::{Delivery, DeliveryState},
};

#[derive(Clone)]
pub struct DeliveryService {
    delivery_repo: DeliveryRepository,
    rental_repo: RentalRepository,
}

impl DeliveryService {
    pub fn new(delivery_repo: DeliveryRepository, rental_repo: RentalRepository) -> Self {
        Self {
            delivery_repo,
            rental_repo,
        }
    }

    pub async fn list(
        &self,
        rental_id: Option<Uuid>,
        state: Option<DeliveryState>,
    ) -> Result<Vec<Delivery>, AppError> {
        self.delivery_repo.list(rental_id, state).await
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        rental_id: Uuid,
        scheduled_at: DateTime<Utc>,
        address: &str,
        notes: Option<&str>,
    ) -> Result<Delivery, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.rental_repo
            .find_by_id(&mut *tx, rental_id)
            .await?
            .ok_or(AppError::NotFound("Aluguel"))?;

        let delivery = self
            .delivery_repo
            .create(&mut *tx, rental_id, scheduled_at, address, notes)
            .await?;

        tx.commit().await?;
        Ok(delivery)
    }

    /// Atualiza o estado logístico; "delivered" carimba a hora real.
    pub async fn update_state<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        state: DeliveryState,
    ) -> Result<Delivery, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.delivery_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Entrega"))?;

        let completed_at = (state == DeliveryState::Delivered).then(Utc::now);
        let delivery = self
            .delivery_repo
            .update_state(&mut *tx, id, state, completed_at)
            .await?;

        tx.commit().await?;
        Ok(delivery)
    }
}
