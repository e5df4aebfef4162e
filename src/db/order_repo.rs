// src/db/order_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::orders::{DeliveryKind, DepositKind, Order, OrderDepositState, OrderItem, OrderState},
};

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    pub async fn list(&self, state: Option<OrderState>) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE $1::order_state IS NULL OR state = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(state)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(order)
    }

    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(order)
    }

    pub async fn list_items<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Vec<OrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }

    // ---
    // Escritas (transacionais)
    // ---

    #[allow(clippy::too_many_arguments)]
    pub async fn create<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        event_at: DateTime<Utc>,
        return_at: DateTime<Utc>,
        delivery_kind: DeliveryKind,
        event_address: Option<&str>,
        delivery_reference: Option<&str>,
        shipping_cost: Decimal,
        down_payment: Decimal,
        payment_method: Option<&str>,
        deposit_amount: Decimal,
        deposit_kind: DepositKind,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (
                client_id, event_at, return_at, delivery_kind, event_address,
                delivery_reference, shipping_cost, down_payment, payment_method,
                deposit_amount, deposit_kind
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(event_at)
        .bind(return_at)
        .bind(delivery_kind)
        .bind(event_address)
        .bind(delivery_reference)
        .bind(shipping_cost)
        .bind(down_payment)
        .bind(payment_method)
        .bind(deposit_amount)
        .bind(deposit_kind)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }

    pub async fn add_item<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<OrderItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items (order_id, product_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    pub async fn set_total<'e, E>(&self, executor: E, id: Uuid, total: Decimal) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE orders SET total = $2 WHERE id = $1")
            .bind(id)
            .bind(total)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn set_state<'e, E>(&self, executor: E, id: Uuid, state: OrderState) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE orders SET state = $2 WHERE id = $1")
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
        deposit_state: OrderDepositState,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE orders SET deposit_state = $2 WHERE id = $1")
            .bind(id)
            .bind(deposit_state)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::Conflict(
                            "O pedido não pode ser removido: há pagamentos vinculados.".into(),
                        );
                    }
                }
                e.into()
            })?;

        Ok(result.rows_affected())
    }
}
