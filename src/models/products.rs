// src/models/products.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Tableware,
    Glassware,
    Linens,
    Decor,
    Lounge,
    Furniture,
}

// O catálogo carrega os dois contadores de estoque:
// `stock` é o que a empresa possui, `stock_reserved` o que está
// comprometido com pedidos ativos (sempre 0 <= reserved <= stock).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,

    #[schema(example = "Copa de cristal")]
    pub name: String,
    pub description: Option<String>,

    pub category: ProductCategory,

    #[schema(example = "150.00")]
    pub price: Decimal,

    #[schema(example = 40)]
    pub stock: i32,
    #[schema(example = 12)]
    pub stock_reserved: i32,

    pub image_url: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Unidades livres para um novo pedido neste instante.
    pub fn available(&self) -> i32 {
        (self.stock - self.stock_reserved).max(0)
    }

    /// Reserva unidades para um pedido (não toca o estoque físico).
    pub fn reserve(&mut self, quantity: i32) -> Result<(), AppError> {
        if quantity <= 0 {
            return Err(AppError::Validation("Quantidade a reservar inválida.".into()));
        }
        if quantity > self.available() {
            return Err(AppError::InsufficientStock {
                product: self.name.clone(),
                available: self.available(),
            });
        }
        self.stock_reserved += quantity;
        Ok(())
    }

    /// Libera reserva (cancelamento de pedido). Limitada em zero:
    /// liberar além do reservado é limpeza best-effort, nunca erro.
    pub fn release_reservation(&mut self, quantity: i32) -> Result<(), AppError> {
        if quantity <= 0 {
            return Err(AppError::Validation("Quantidade a liberar inválida.".into()));
        }
        self.stock_reserved = (self.stock_reserved - quantity).max(0);
        Ok(())
    }

    /// Na entrega do aluguel: a reserva vira saída física do depósito.
    pub fn consume_from_reservation(&mut self, quantity: i32) -> Result<(), AppError> {
        if quantity <= 0 {
            return Err(AppError::Validation("Quantidade a consumir inválida.".into()));
        }
        if quantity > self.stock_reserved {
            return Err(AppError::Validation(format!(
                "Não há reserva suficiente de {} para consumir.",
                self.name
            )));
        }
        if quantity > self.stock {
            return Err(AppError::InsufficientStock {
                product: self.name.clone(),
                available: self.stock,
            });
        }
        self.stock -= quantity;
        self.stock_reserved -= quantity;
        Ok(())
    }

    /// Soma unidades devolvidas sãs (ou repostas) ao estoque.
    pub fn return_to_stock(&mut self, quantity: i32) -> Result<(), AppError> {
        if quantity <= 0 {
            return Err(AppError::Validation("Quantidade a devolver inválida.".into()));
        }
        self.stock += quantity;
        Ok(())
    }
}

// Disponibilidade por intervalo de datas (GET /products/{id}/availability)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RangeAvailability {
    pub product_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub stock: i32,
    pub reserved_in_range: i64,
    pub available: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(stock: i32, reserved: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Copa de cristal".into(),
            description: None,
            category: ProductCategory::Glassware,
            price: dec!(150.00),
            stock,
            stock_reserved: reserved,
            image_url: None,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn invariant_holds(p: &Product) -> bool {
        0 <= p.stock_reserved && p.stock_reserved <= p.stock && p.stock >= 0
    }

    #[test]
    fn reserve_moves_units_to_reserved() {
        let mut p = product(10, 3);
        p.reserve(5).unwrap();
        assert_eq!(p.stock_reserved, 8);
        assert_eq!(p.stock, 10);
        assert_eq!(p.available(), 2);
    }

    #[test]
    fn reserve_rejects_more_than_available() {
        let mut p = product(10, 8);
        let err = p.reserve(3).unwrap_err();
        match err {
            AppError::InsufficientStock { available, .. } => assert_eq!(available, 2),
            other => panic!("esperava InsufficientStock, veio {other:?}"),
        }
        // Nada mudou
        assert_eq!(p.stock_reserved, 8);
    }

    #[test]
    fn reserve_rejects_non_positive_quantity() {
        let mut p = product(10, 0);
        assert!(matches!(p.reserve(0), Err(AppError::Validation(_))));
        assert!(matches!(p.reserve(-2), Err(AppError::Validation(_))));
    }

    #[test]
    fn release_is_clamped_at_zero() {
        let mut p = product(10, 4);
        p.release_reservation(4).unwrap();
        assert_eq!(p.stock_reserved, 0);
        // Liberar de novo a mesma quantidade não deixa o contador negativo
        p.release_reservation(4).unwrap();
        assert_eq!(p.stock_reserved, 0);
    }

    #[test]
    fn consume_moves_reserved_out_of_depot() {
        let mut p = product(10, 6);
        p.consume_from_reservation(6).unwrap();
        assert_eq!(p.stock, 4);
        assert_eq!(p.stock_reserved, 0);
    }

    #[test]
    fn consume_rejects_more_than_reserved() {
        let mut p = product(10, 2);
        assert!(p.consume_from_reservation(3).is_err());
        assert_eq!(p.stock, 10);
        assert_eq!(p.stock_reserved, 2);
    }

    #[test]
    fn return_to_stock_adds_units() {
        let mut p = product(4, 0);
        p.return_to_stock(2).unwrap();
        assert_eq!(p.stock, 6);
    }

    // Sequências pseudo-aleatórias de operações válidas nunca quebram
    // 0 <= stock_reserved <= stock.
    #[test]
    fn invariant_survives_random_operation_sequences() {
        let mut seed: u64 = 0x5eed_cafe;
        let mut next = move || {
            // xorshift simples, determinístico entre execuções
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };

        let mut p = product(50, 0);
        for _ in 0..10_000 {
            let qty = (next() % 7) as i32 + 1;
            match next() % 4 {
                0 => {
                    let _ = p.reserve(qty);
                }
                1 => {
                    let _ = p.release_reservation(qty);
                }
                2 => {
                    let _ = p.consume_from_reservation(qty);
                }
                _ => {
                    let _ = p.return_to_stock(qty);
                }
            }
            assert!(invariant_holds(&p), "invariante quebrada: {p:?}");
        }
    }
}
