// src/db/delivery_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::deliveries::{Delivery, DeliveryState},
};

#[derive(Clone)]
pub struct DeliveryRepository {
    pool: PgPool,
}

impl DeliveryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        rental_id: Option<Uuid>,
        state: Option<DeliveryState>,
    ) -> Result<Vec<Delivery>, AppError> {
        let deliveries = sqlx::query_as::<_, Delivery>(
            r#"
            SELECT * FROM deliveries
            WHERE ($1::UUID IS NULL OR rental_id = $1)
              AND ($2::delivery_state IS NULL OR state = $2)
            ORDER BY scheduled_at DESC, id DESC
            "#,
        )
        .bind(rental_id)
        .bind(state)
        .fetch_all(&self.pool)
        .await?;

        Ok(deliveries)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Delivery>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let delivery = sqlx::query_as::<_, Delivery>("SELECT * FROM deliveries WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(delivery)
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
        E: Executor<'e, Database = Postgres>,
    {
        let delivery = sqlx::query_as::<_, Delivery>(
            r#"
            INSERT INTO deliveries (rental_id, scheduled_at, address, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(rental_id)
        .bind(scheduled_at)
        .bind(address)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(delivery)
    }

    pub async fn update_state<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        state: DeliveryState,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Delivery, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let delivery = sqlx::query_as::<_, Delivery>(
            r#"
            UPDATE deliveries
            SET state = $2, completed_at = COALESCE($3, completed_at)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(state)
        .bind(completed_at)
        .fetch_one(executor)
        .await?;

        Ok(delivery)
    }
}
