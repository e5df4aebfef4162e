// src/db/rental_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::rentals::{Rental, RentalDepositState, RentalItem, RentalState},
    services::settlement::IncidentCharge,
};

#[derive(Clone)]
pub struct RentalRepository {
    pool: PgPool,
}

impl RentalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    pub async fn list(&self, state: Option<RentalState>) -> Result<Vec<Rental>, AppError> {
        let rentals = sqlx::query_as::<_, Rental>(
            r#"
            SELECT * FROM rentals
            WHERE $1::rental_state IS NULL OR state = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(state)
        .fetch_all(&self.pool)
        .await?;

        Ok(rentals)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Rental>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rental = sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(rental)
    }

    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Rental>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rental = sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(rental)
    }

    pub async fn find_by_order<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Option<Rental>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rental = sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE order_id = $1")
            .bind(order_id)
            .fetch_optional(executor)
            .await?;

        Ok(rental)
    }

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        rental_id: Uuid,
    ) -> Result<Vec<RentalItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, RentalItem>(
            "SELECT * FROM rental_items WHERE rental_id = $1 ORDER BY id",
        )
        .bind(rental_id)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }

    pub async fn find_item<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
    ) -> Result<Option<RentalItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, RentalItem>("SELECT * FROM rental_items WHERE id = $1")
            .bind(item_id)
            .fetch_optional(executor)
            .await?;

        Ok(item)
    }

    // ---
    // Escritas (transacionais)
    // ---

    pub async fn create<'e, E>(
        &self,
        executor: E,
        order_id: Option<Uuid>,
        client_id: Option<Uuid>,
        client_name: Option<&str>,
        deposit_amount: Option<Decimal>,
    ) -> Result<Rental, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rental = sqlx::query_as::<_, Rental>(
            r#"
            INSERT INTO rentals (order_id, client_id, client_name, deposit_amount)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(client_id)
        .bind(client_name)
        .bind(deposit_amount)
        .fetch_one(executor)
        .await?;

        Ok(rental)
    }

    pub async fn add_item<'e, E>(
        &self,
        executor: E,
        rental_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<RentalItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, RentalItem>(
            r#"
            INSERT INTO rental_items (rental_id, product_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(rental_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    pub async fn set_state<'e, E>(&self, executor: E, id: Uuid, state: RentalState) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE rentals SET state = $2 WHERE id = $1")
            .bind(id)
            .bind(state)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn set_deposit_state<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        deposit_state: RentalDepositState,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE rentals SET deposit_state = $2 WHERE id = $1")
            .bind(id)
            .bind(deposit_state)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn finalize<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        deposit_state: RentalDepositState,
        finalized_at: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE rentals SET state = 'finalized', deposit_state = $2, finalized_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(deposit_state)
        .bind(finalized_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM rentals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::Conflict(
                            "O aluguel não pode ser removido: há registros vinculados.".into(),
                        );
                    }
                }
                e.into()
            })?;

        Ok(result.rows_affected())
    }

    // ---
    // Consultas de apoio à liquidação
    // ---

    pub async fn open_incident_count<'e, E>(&self, executor: E, rental_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM incidents i
            JOIN rental_items ri ON ri.id = i.rental_item_id
            WHERE ri.rental_id = $1 AND i.state = 'open'
            "#,
        )
        .bind(rental_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    /// Incidentes resolvidos com reposição, já com o preço do item —
    /// a entrada do cálculo de custo da liquidação.
    pub async fn resolved_replacement_charges<'e, E>(
        &self,
        executor: E,
        rental_id: Uuid,
    ) -> Result<Vec<IncidentCharge>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let charges = sqlx::query_as::<_, IncidentCharge>(
            r#"
            SELECT i.quantity_affected, i.quantity_replaced, ri.unit_price
            FROM incidents i
            JOIN rental_items ri ON ri.id = i.rental_item_id
            WHERE ri.rental_id = $1
              AND i.state = 'resolved'
              AND i.outcome = 'replaced'
            "#,
        )
        .bind(rental_id)
        .fetch_all(executor)
        .await?;

        Ok(charges)
    }

    pub async fn rental_total<'e, E>(&self, executor: E, rental_id: Uuid) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(quantity * unit_price), 0)
            FROM rental_items
            WHERE rental_id = $1
            "#,
        )
        .bind(rental_id)
        .fetch_one(executor)
        .await?;

        Ok(total)
    }
}
