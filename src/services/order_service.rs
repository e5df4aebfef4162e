// src/services/order_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, OrderRepository, ProductRepository, RentalRepository},
    models::{
        cash::CashRegister,
        orders::{DeliveryKind, DepositKind, Order, OrderItem, OrderState},
        payments::{PaymentKind, PaymentMethod, PaymentOrigin},
        products::Product,
        rentals::{Rental, RentalState},
    },
    services::payment_service::{NewPayment, PaymentService},
};

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Uuid,
    pub quantity: i32,
    // Sobrescreve o preço de catálogo quando presente
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub client_id: Uuid,
    pub items: Vec<NewOrderItem>,
    pub event_at: DateTime<Utc>,
    pub return_at: DateTime<Utc>,
    pub delivery_kind: DeliveryKind,
    pub event_address: Option<String>,
    pub delivery_reference: Option<String>,
    pub shipping_cost: Decimal,
    pub down_payment: Decimal,
    pub payment_method: Option<String>,
    pub deposit_amount: Decimal,
    pub deposit_kind: DepositKind,
    pub receipt_reference: Option<String>,
}

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    rental_repo: RentalRepository,
    product_repo: ProductRepository,
    client_repo: ClientRepository,
    payment_service: PaymentService,
}

impl OrderService {
    pub fn new(
        order_repo: OrderRepository,
        rental_repo: RentalRepository,
        product_repo: ProductRepository,
        client_repo: ClientRepository,
        payment_service: PaymentService,
    ) -> Self {
        Self {
            order_repo,
            rental_repo,
            product_repo,
            client_repo,
            payment_service,
        }
    }

    fn validate_dates(event_at: DateTime<Utc>, return_at: DateTime<Utc>) -> Result<(), AppError> {
        if return_at <= event_at {
            return Err(AppError::Validation(
                "A devolução deve ser posterior ao evento.".into(),
            ));
        }
        Ok(())
    }

    /// Checagem prévia de todos os itens: nada é reservado se qualquer
    /// linha estiver inválida ou sem estoque.
    fn ensure_requested_available(requests: &[(i32, &Product)]) -> Result<(), AppError> {
        for (quantity, product) in requests {
            if *quantity <= 0 {
                return Err(AppError::Validation("Quantidade inválida.".into()));
            }
            if *quantity > product.available() {
                return Err(AppError::InsufficientStock {
                    product: product.name.clone(),
                    available: product.available(),
                });
            }
        }
        Ok(())
    }

    // "TRANSFERENCIA", "transferência bancária" etc. viram TRANSFER;
    // qualquer outra coisa é tratada como dinheiro.
    fn normalize_method(raw: Option<&str>) -> PaymentMethod {
        match raw {
            Some(value) if value.to_uppercase().contains("TRANS") => PaymentMethod::Transfer,
            _ => PaymentMethod::Cash,
        }
    }

    /// Cria pedido + detalhes, reserva estoque, calcula o total e gera o
    /// aluguel espelho com os itens copiados. Tudo em uma transação.
    pub async fn create_order_with_rental<'e, E>(
        &self,
        executor: E,
        new_order: NewOrder,
        open_register: &CashRegister,
    ) -> Result<(Order, Vec<OrderItem>, Rental), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        Self::validate_dates(new_order.event_at, new_order.return_at)?;
        if new_order.items.is_empty() {
            return Err(AppError::Validation("O pedido precisa de ao menos um item.".into()));
        }

        let mut tx = executor.begin().await?;

        let client = self
            .client_repo
            .find_by_id(&mut *tx, new_order.client_id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))?;

        // 1. Trava e valida todos os produtos antes de reservar qualquer um
        let mut products: Vec<Product> = Vec::with_capacity(new_order.items.len());
        for item in &new_order.items {
            let product = self
                .product_repo
                .find_by_id_for_update(&mut *tx, item.product_id)
                .await?
                .ok_or_else(|| AppError::Validation("Produto inexistente.".into()))?;
            products.push(product);
        }
        let requests: Vec<(i32, &Product)> = new_order
            .items
            .iter()
            .zip(products.iter())
            .map(|(item, product)| (item.quantity, product))
            .collect();
        Self::ensure_requested_available(&requests)?;

        // 2. Cabeçalho do pedido
        let order = self
            .order_repo
            .create(
                &mut *tx,
                client.id,
                new_order.event_at,
                new_order.return_at,
                new_order.delivery_kind,
                new_order.event_address.as_deref(),
                new_order.delivery_reference.as_deref(),
                new_order.shipping_cost,
                new_order.down_payment,
                new_order.payment_method.as_deref(),
                new_order.deposit_amount,
                new_order.deposit_kind,
            )
            .await?;

        // 3. Detalhes + reserva, linha a linha
        let mut total = Decimal::ZERO;
        let mut items_out: Vec<OrderItem> = Vec::with_capacity(new_order.items.len());
        for (input, product) in new_order.items.iter().zip(products.iter_mut()) {
            let unit_price = input.unit_price.unwrap_or(product.price);
            product.reserve(input.quantity)?;
            self.product_repo
                .update_stock(&mut *tx, product.id, product.stock, product.stock_reserved)
                .await?;

            let item = self
                .order_repo
                .add_item(&mut *tx, order.id, product.id, input.quantity, unit_price)
                .await?;
            total += item.subtotal();
            items_out.push(item);
        }
        self.order_repo.set_total(&mut *tx, order.id, total).await?;

        // 4. Aluguel espelho com os itens copiados 1:1
        let client_name = client.full_name();
        let rental = self
            .rental_repo
            .create(
                &mut *tx,
                Some(order.id),
                Some(client.id),
                Some(&client_name),
                Some(new_order.deposit_amount),
            )
            .await?;
        for item in &items_out {
            self.rental_repo
                .add_item(&mut *tx, rental.id, item.product_id, item.quantity, item.unit_price)
                .await?;
        }

        // 5. Sinal pago na criação vira movimento de caixa
        if new_order.down_payment > Decimal::ZERO {
            let method = Self::normalize_method(new_order.payment_method.as_deref());
            self.payment_service
                .register_payment(
                    &mut *tx,
                    NewPayment {
                        kind: PaymentKind::DownPayment,
                        amount: new_order.down_payment,
                        method,
                        origin: Some(PaymentOrigin::Order(order.id)),
                        client_id: Some(client.id),
                        receipt_reference: new_order.receipt_reference.clone(),
                        notes: Some("Sinal registrado automaticamente na criação do pedido.".into()),
                    },
                    Some(open_register),
                )
                .await?;
        }

        tx.commit().await?;

        let order = Order { total, ..order };
        Ok((order, items_out, rental))
    }

    /// Confirma um pedido pendente; o aluguel espelho acompanha.
    pub async fn confirm<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let order = self
            .order_repo
            .find_by_id_for_update(&mut *tx, order_id)
            .await?
            .ok_or(AppError::NotFound("Pedido"))?;
        if order.state != OrderState::Pending {
            return Err(AppError::InvalidTransition {
                entity: "pedido",
                state: format!("{:?}", order.state).to_lowercase(),
            });
        }

        self.order_repo
            .set_state(&mut *tx, order_id, OrderState::Confirmed)
            .await?;
        if let Some(rental) = self.rental_repo.find_by_order(&mut *tx, order_id).await? {
            if rental.state == RentalState::Pending {
                self.rental_repo
                    .set_state(&mut *tx, rental.id, RentalState::Confirmed)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(Order {
            state: OrderState::Confirmed,
            ..order
        })
    }

    /// Marca o pedido como cancelado e libera as reservas; o espelho
    /// acompanha. Chamada repetida não libera duas vezes.
    pub async fn cancel<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let order = self
            .order_repo
            .find_by_id_for_update(&mut *tx, order_id)
            .await?
            .ok_or(AppError::NotFound("Pedido"))?;

        if order.state == OrderState::Cancelled {
            tx.commit().await?;
            return Ok(order);
        }
        if !order.can_cancel() {
            return Err(AppError::InvalidTransition {
                entity: "pedido",
                state: format!("{:?}", order.state).to_lowercase(),
            });
        }

        for item in self.order_repo.list_items(&mut *tx, order_id).await? {
            let mut product = self
                .product_repo
                .find_by_id_for_update(&mut *tx, item.product_id)
                .await?
                .ok_or(AppError::NotFound("Produto"))?;
            product.release_reservation(item.quantity)?;
            self.product_repo
                .update_stock(&mut *tx, product.id, product.stock, product.stock_reserved)
                .await?;
        }

        self.order_repo
            .set_state(&mut *tx, order_id, OrderState::Cancelled)
            .await?;
        if let Some(rental) = self.rental_repo.find_by_order(&mut *tx, order_id).await? {
            self.rental_repo
                .set_state(&mut *tx, rental.id, RentalState::Cancelled)
                .await?;
        }

        tx.commit().await?;
        Ok(Order {
            state: OrderState::Cancelled,
            ..order
        })
    }

    pub async fn list(&self, state: Option<OrderState>) -> Result<Vec<Order>, AppError> {
        self.order_repo.list(state).await
    }

    pub async fn get_with_items(
        &self,
        pool: &sqlx::PgPool,
        order_id: Uuid,
    ) -> Result<(Order, Vec<OrderItem>), AppError> {
        let order = self
            .order_repo
            .find_by_id(pool, order_id)
            .await?
            .ok_or(AppError::NotFound("Pedido"))?;
        let items = self.order_repo.list_items(pool, order_id).await?;
        Ok((order, items))
    }

    /// Só pedidos cancelados ou entregues podem ser apagados.
    pub async fn delete(&self, pool: &sqlx::PgPool, order_id: Uuid) -> Result<(), AppError> {
        let order = self
            .order_repo
            .find_by_id(pool, order_id)
            .await?
            .ok_or(AppError::NotFound("Pedido"))?;
        if !order.can_delete() {
            return Err(AppError::NotAllowed(
                "Este pedido não pode ser eliminado. Apenas pedidos cancelados ou entregues podem ser apagados."
                    .into(),
            ));
        }
        self.order_repo.delete(order_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::products::ProductCategory;
    use rust_decimal_macros::dec;

    fn product(name: &str, stock: i32, reserved: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            category: ProductCategory::Tableware,
            price: dec!(100.00),
            stock,
            stock_reserved: reserved,
            image_url: None,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn return_must_come_after_event() {
        let event = Utc::now();
        let earlier = event - chrono::Duration::hours(2);
        assert!(OrderService::validate_dates(event, earlier).is_err());
        assert!(OrderService::validate_dates(event, event).is_err());
        assert!(OrderService::validate_dates(event, event + chrono::Duration::hours(4)).is_ok());
    }

    // Porta do tudo-ou-nada: basta uma linha sem estoque para a checagem
    // prévia rejeitar o pedido inteiro, antes de qualquer reserva.
    #[test]
    fn availability_check_rejects_whole_order_on_one_short_line() {
        let plates = product("Prato", 10, 0);
        let cups = product("Taça", 2, 1);

        let err = OrderService::ensure_requested_available(&[(5, &plates), (2, &cups)]).unwrap_err();
        match err {
            AppError::InsufficientStock { product, available } => {
                assert_eq!(product, "Taça");
                assert_eq!(available, 1);
            }
            other => panic!("esperava InsufficientStock, veio {other:?}"),
        }

        assert!(OrderService::ensure_requested_available(&[(5, &plates), (1, &cups)]).is_ok());
        assert!(OrderService::ensure_requested_available(&[(0, &plates)]).is_err());
    }

    #[test]
    fn payment_method_normalization() {
        assert_eq!(OrderService::normalize_method(None), PaymentMethod::Cash);
        assert_eq!(OrderService::normalize_method(Some("efectivo")), PaymentMethod::Cash);
        assert_eq!(
            OrderService::normalize_method(Some("transferencia")),
            PaymentMethod::Transfer
        );
        assert_eq!(
            OrderService::normalize_method(Some("Transferência bancária")),
            PaymentMethod::Transfer
        );
    }
}
