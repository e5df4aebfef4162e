// src/services/inventory_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::products::{Product, ProductCategory, RangeAvailability},
};

#[derive(Clone)]
pub struct InventoryService {
    product_repo: ProductRepository,
}

impl InventoryService {
    pub fn new(product_repo: ProductRepository) -> Self {
        Self { product_repo }
    }

    pub async fn create_product(
        &self,
        name: &str,
        description: Option<&str>,
        category: ProductCategory,
        price: Decimal,
        stock: i32,
        image_url: Option<&str>,
    ) -> Result<Product, AppError> {
        if stock < 0 {
            return Err(AppError::Validation("O estoque inicial não pode ser negativo.".into()));
        }
        self.product_repo
            .create(name, description, category, price, stock, image_url)
            .await
    }

    pub async fn list_products(&self, search: Option<&str>) -> Result<Vec<Product>, AppError> {
        self.product_repo.list(search).await
    }

    pub async fn get_product(&self, pool: &sqlx::PgPool, id: Uuid) -> Result<Product, AppError> {
        self.product_repo
            .find_by_id(pool, id)
            .await?
            .ok_or(AppError::NotFound("Produto"))
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        category: ProductCategory,
        price: Decimal,
        image_url: Option<&str>,
    ) -> Result<Product, AppError> {
        self.product_repo
            .update_catalog(id, name, description, category, price, image_url)
            .await?
            .ok_or(AppError::NotFound("Produto"))
    }

    /// Inverte o flag `active` (desativar em vez de apagar).
    pub async fn toggle_active(&self, pool: &sqlx::PgPool, id: Uuid) -> Result<Product, AppError> {
        let product = self.get_product(pool, id).await?;
        self.product_repo
            .set_active(id, !product.active)
            .await?
            .ok_or(AppError::NotFound("Produto"))
    }

    /// Remoção bloqueada enquanto houver incidentes abertos sobre o
    /// produto, e pelo banco quando pedidos/aluguéis o referenciam.
    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        let open_incidents = self.product_repo.open_incident_count(id).await?;
        if open_incidents > 0 {
            return Err(AppError::Conflict(
                "O produto não pode ser removido: existem incidentes abertos associados.".into(),
            ));
        }
        let deleted = self.product_repo.delete(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Produto"));
        }
        Ok(())
    }

    /// Disponibilidade teórica para um novo pedido em [start, end):
    /// estoque atual menos o reservado por pedidos ativos no intervalo.
    pub async fn availability_in_range(
        &self,
        pool: &sqlx::PgPool,
        id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<RangeAvailability, AppError> {
        if end <= start {
            return Err(AppError::Validation(
                "O fim do intervalo deve ser posterior ao início.".into(),
            ));
        }
        let product = self.get_product(pool, id).await?;
        let reserved = self.product_repo.reserved_in_range(id, start, end).await?;
        let available = (i64::from(product.stock) - reserved).max(0);

        Ok(RangeAvailability {
            product_id: product.id,
            start,
            end,
            stock: product.stock,
            reserved_in_range: reserved,
            available,
        })
    }
}
