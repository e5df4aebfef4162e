// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Clients ---
        handlers::clients::create_client,
        handlers::clients::list_clients,
        handlers::clients::get_client,

        // --- Products ---
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::toggle_active,
        handlers::products::delete_product,
        handlers::products::availability,

        // --- Orders ---
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::confirm_order,
        handlers::orders::cancel_order,
        handlers::orders::delete_order,

        // --- Rentals ---
        handlers::rentals::list_rentals,
        handlers::rentals::get_rental,
        handlers::rentals::deliver_rental,
        handlers::rentals::finalize_rental,
        handlers::rentals::rental_summary,
        handlers::rentals::delete_rental,

        // --- Incidents ---
        handlers::incidents::create_incident,
        handlers::incidents::list_incidents,
        handlers::incidents::update_incident,
        handlers::incidents::delete_incident,

        // --- Payments ---
        handlers::payments::create_payment,
        handlers::payments::list_payments,

        // --- Cash ---
        handlers::cash::open_register,
        handlers::cash::list_registers,
        handlers::cash::current_register,
        handlers::cash::close_register,
        handlers::cash::register_summary,

        // --- Deliveries ---
        handlers::deliveries::create_delivery,
        handlers::deliveries::list_deliveries,
        handlers::deliveries::update_delivery,
    ),
    components(
        schemas(
            handlers::clients::CreateClientPayload,
            handlers::products::CreateProductPayload,
            handlers::orders::CreateOrderPayload,
            handlers::orders::OrderItemPayload,
            handlers::orders::OrderDetailResponse,
            handlers::rentals::RentalDetailResponse,
            handlers::incidents::CreateIncidentPayload,
            handlers::incidents::UpdateIncidentPayload,
            handlers::payments::CreatePaymentPayload,
            handlers::cash::OpenRegisterPayload,
            handlers::cash::CloseRegisterPayload,
            handlers::deliveries::CreateDeliveryPayload,
            handlers::deliveries::UpdateDeliveryPayload,
            models::clients::Client,
            models::products::Product,
            models::products::ProductCategory,
            models::products::RangeAvailability,
            models::orders::Order,
            models::orders::OrderItem,
            models::orders::OrderState,
            models::orders::OrderDepositState,
            models::orders::DeliveryKind,
            models::orders::DepositKind,
            models::orders::OrderWithRental,
            models::rentals::Rental,
            models::rentals::RentalItem,
            models::rentals::RentalState,
            models::rentals::RentalDepositState,
            models::rentals::SettlementSummary,
            models::rentals::RentalSummary,
            models::incidents::Incident,
            models::incidents::IncidentState,
            models::incidents::IncidentKind,
            models::incidents::IncidentOutcome,
            models::payments::Payment,
            models::payments::PaymentKind,
            models::payments::PaymentDirection,
            models::payments::PaymentMethod,
            models::cash::CashRegister,
            models::cash::CashRegisterState,
            models::cash::CashFlowTotals,
            models::cash::CashRegisterSummary,
            models::deliveries::Delivery,
            models::deliveries::DeliveryState,
        )
    ),
    tags(
        (name = "Clients", description = "Cadastro de clientes"),
        (name = "Products", description = "Catálogo e estoque reservável"),
        (name = "Orders", description = "Pedidos e reservas"),
        (name = "Rentals", description = "Aluguéis, entrega e liquidação de garantia"),
        (name = "Incidents", description = "Danos e perdas sobre itens alugados"),
        (name = "Payments", description = "Livro de movimentos de dinheiro"),
        (name = "Cash", description = "Sessões de caixa"),
        (name = "Deliveries", description = "Logística de entregas")
    )
)]
pub struct ApiDoc;
