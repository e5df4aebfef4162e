// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::db::{
    CashRegisterRepository, ClientRepository, DeliveryRepository, IncidentRepository,
    OrderRepository, PaymentRepository, ProductRepository, RentalRepository,
};
use crate::services::{
    CashRegisterService, ClientService, DeliveryService, IncidentService, InventoryService,
    OrderService, PaymentService, RentalService,
};

// O estado compartilhado acessível em toda a aplicação: a pool e os
// serviços já montados sobre os repositórios.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub client_service: ClientService,
    pub inventory_service: InventoryService,
    pub order_service: OrderService,
    pub rental_service: RentalService,
    pub incident_service: IncidentService,
    pub payment_service: PaymentService,
    pub cash_service: CashRegisterService,
    pub delivery_service: DeliveryService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // Repositórios
        let client_repo = ClientRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let rental_repo = RentalRepository::new(db_pool.clone());
        let incident_repo = IncidentRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let cash_repo = CashRegisterRepository::new(db_pool.clone());
        let delivery_repo = DeliveryRepository::new(db_pool.clone());

        // Serviços (o de pagamentos é compartilhado pelos fluxos de
        // pedido e de liquidação)
        let payment_service =
            PaymentService::new(payment_repo.clone(), order_repo.clone(), rental_repo.clone());
        let client_service = ClientService::new(client_repo.clone());
        let inventory_service = InventoryService::new(product_repo.clone());
        let order_service = OrderService::new(
            order_repo.clone(),
            rental_repo.clone(),
            product_repo.clone(),
            client_repo,
            payment_service.clone(),
        );
        let rental_service = RentalService::new(
            rental_repo.clone(),
            order_repo.clone(),
            product_repo.clone(),
            payment_service.clone(),
        );
        let incident_service = IncidentService::new(
            incident_repo,
            rental_repo.clone(),
            order_repo,
            product_repo,
        );
        let cash_service = CashRegisterService::new(cash_repo, payment_repo);
        let delivery_service = DeliveryService::new(delivery_repo, rental_repo);

        Ok(Self {
            db_pool,
            client_service,
            inventory_service,
            order_service,
            rental_service,
            incident_service,
            payment_service,
            cash_service,
            delivery_service,
        })
    }
}
