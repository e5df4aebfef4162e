// src/main.rs

use axum::{
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let client_routes = Router::new()
        .route(
            "/",
            post(handlers::clients::create_client).get(handlers::clients::list_clients),
        )
        .route("/{id}", get(handlers::clients::get_client));

    let product_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route("/{id}/toggle-active", patch(handlers::products::toggle_active))
        .route("/{id}/availability", get(handlers::products::availability));

    let order_routes = Router::new()
        .route(
            "/",
            post(handlers::orders::create_order).get(handlers::orders::list_orders),
        )
        .route(
            "/{id}",
            get(handlers::orders::get_order).delete(handlers::orders::delete_order),
        )
        .route("/{id}/confirm", post(handlers::orders::confirm_order))
        .route("/{id}/cancel", post(handlers::orders::cancel_order));

    let rental_routes = Router::new()
        .route("/", get(handlers::rentals::list_rentals))
        .route(
            "/{id}",
            get(handlers::rentals::get_rental).delete(handlers::rentals::delete_rental),
        )
        .route("/{id}/deliver", post(handlers::rentals::deliver_rental))
        .route("/{id}/finalize", post(handlers::rentals::finalize_rental))
        .route("/{id}/summary", get(handlers::rentals::rental_summary));

    let incident_routes = Router::new()
        .route(
            "/",
            post(handlers::incidents::create_incident).get(handlers::incidents::list_incidents),
        )
        .route(
            "/{id}",
            patch(handlers::incidents::update_incident).delete(handlers::incidents::delete_incident),
        );

    let payment_routes = Router::new().route(
        "/",
        post(handlers::payments::create_payment).get(handlers::payments::list_payments),
    );

    let cash_routes = Router::new()
        .route(
            "/",
            post(handlers::cash::open_register).get(handlers::cash::list_registers),
        )
        .route("/current", get(handlers::cash::current_register))
        .route("/{id}/close", post(handlers::cash::close_register))
        .route("/{id}/summary", get(handlers::cash::register_summary));

    let delivery_routes = Router::new()
        .route(
            "/",
            post(handlers::deliveries::create_delivery).get(handlers::deliveries::list_deliveries),
        )
        .route("/{id}", patch(handlers::deliveries::update_delivery));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/clients", client_routes)
        .nest("/api/products", product_routes)
        .nest("/api/orders", order_routes)
        .nest("/api/rentals", rental_routes)
        .nest("/api/incidents", incident_routes)
        .nest("/api/payments", payment_routes)
        .nest("/api/cash-registers", cash_routes)
        .nest("/api/deliveries", delivery_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
