// src/db/product_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::products::{Product, ProductCategory},
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE $1::TEXT IS NULL OR name ILIKE '%' || $1 || '%'
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(product)
    }

    /// Trava a linha do produto dentro da transação corrente.
    /// Todas as mutações de contadores passam por aqui.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product =
            sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(product)
    }

    // ---
    // Escritas
    // ---

    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        category: ProductCategory,
        price: Decimal,
        stock: i32,
        image_url: Option<&str>,
    ) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, category, price, stock, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(category)
        .bind(price)
        .bind(stock)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn update_catalog(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        category: ProductCategory,
        price: Decimal,
        image_url: Option<&str>,
    ) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $2, description = $3, category = $4, price = $5, image_url = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(category)
        .bind(price)
        .bind(image_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Persiste os contadores calculados pelo modelo (reserve/consume/...).
    pub async fn update_stock<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        stock: i32,
        stock_reserved: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE products SET stock = $2, stock_reserved = $3 WHERE id = $1")
            .bind(id)
            .bind(stock)
            .bind(stock_reserved)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(
            "UPDATE products SET active = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::Conflict(
                            "O produto não pode ser removido: há pedidos ou aluguéis que o referenciam."
                                .into(),
                        );
                    }
                }
                e.into()
            })?;

        Ok(result.rows_affected())
    }

    // ---
    // Consultas de apoio
    // ---

    /// Incidentes abertos que referenciam o produto (bloqueiam remoção).
    pub async fn open_incident_count(&self, id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM incidents i
            JOIN rental_items ri ON ri.id = i.rental_item_id
            WHERE ri.product_id = $1 AND i.state = 'open'
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Unidades reservadas por OUTROS pedidos ativos cujo intervalo se
    /// sobrepõe a [start, end). Datas ausentes contam como sobreposição.
    pub async fn reserved_in_range(
        &self,
        id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let reserved = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(oi.quantity), 0)
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            WHERE oi.product_id = $1
              AND o.state IN ('pending', 'confirmed')
              AND NOT (
                    (o.return_at IS NOT NULL AND o.return_at <= $2)
                 OR (o.event_at IS NOT NULL AND o.event_at >= $3)
              )
            "#,
        )
        .bind(id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(reserved)
    }
}
