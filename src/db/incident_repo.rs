// src/db/incident_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::incidents::{Incident, IncidentKind, IncidentOutcome, IncidentState},
};

#[derive(Clone)]
pub struct IncidentRepository {
    pool: PgPool,
}

impl IncidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        state: Option<IncidentState>,
        rental_item_id: Option<Uuid>,
    ) -> Result<Vec<Incident>, AppError> {
        let incidents = sqlx::query_as::<_, Incident>(
            r#"
            SELECT * FROM incidents
            WHERE ($1::incident_state IS NULL OR state = $1)
              AND ($2::UUID IS NULL OR rental_item_id = $2)
            ORDER BY occurred_at DESC, id DESC
            "#,
        )
        .bind(state)
        .bind(rental_item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(incidents)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Incident>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let incident = sqlx::query_as::<_, Incident>("SELECT * FROM incidents WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(incident)
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
        E: Executor<'e, Database = Postgres>,
    {
        let incident = sqlx::query_as::<_, Incident>(
            r#"
            INSERT INTO incidents (rental_item_id, description, kind, quantity_affected)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(rental_item_id)
        .bind(description)
        .bind(kind)
        .bind(quantity_affected)
        .fetch_one(executor)
        .await?;

        Ok(incident)
    }

    pub async fn resolve<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        outcome: IncidentOutcome,
        quantity_replaced: i32,
        resolved_at: DateTime<Utc>,
    ) -> Result<Incident, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let incident = sqlx::query_as::<_, Incident>(
            r#"
            UPDATE incidents
            SET state = 'resolved', outcome = $2, quantity_replaced = $3, resolved_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(outcome)
        .bind(quantity_replaced)
        .bind(resolved_at)
        .fetch_one(executor)
        .await?;

        Ok(incident)
    }

    pub async fn set_state<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        state: IncidentState,
    ) -> Result<Incident, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let incident = sqlx::query_as::<_, Incident>(
            "UPDATE incidents SET state = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(state)
        .fetch_one(executor)
        .await?;

        Ok(incident)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM incidents WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Unidades já reivindicadas por incidentes ABERTOS do mesmo item,
    /// excluindo opcionalmente o próprio incidente (em atualizações).
    pub async fn open_claims_for_item<'e, E>(
        &self,
        executor: E,
        rental_item_id: Uuid,
        exclude_id: Option<Uuid>,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let claimed = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(quantity_affected), 0)
            FROM incidents
            WHERE rental_item_id = $1
              AND state = 'open'
              AND ($2::UUID IS NULL OR id <> $2)
            "#,
        )
        .bind(rental_item_id)
        .bind(exclude_id)
        .fetch_one(executor)
        .await?;

        Ok(claimed)
    }

    /// Contagens usadas no recálculo do estado provisório da garantia:
    /// (abertos, resolvidos com custo).
    pub async fn deposit_relevant_counts<'e, E>(
        &self,
        executor: E,
        rental_id: Uuid,
    ) -> Result<(i64, i64), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let counts = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE i.state = 'open'),
                COUNT(*) FILTER (WHERE i.state = 'resolved' AND i.outcome = 'replaced')
            FROM incidents i
            JOIN rental_items ri ON ri.id = i.rental_item_id
            WHERE ri.rental_id = $1
            "#,
        )
        .bind(rental_id)
        .fetch_one(executor)
        .await?;

        Ok(counts)
    }
}
