pub mod cash_service;
pub mod client_service;
pub mod delivery_service;
pub mod incident_service;
pub mod inventory_service;
pub mod order_service;
pub mod payment_service;
pub mod rental_service;
pub mod settlement;

pub use cash_service::CashRegisterService;
pub use client_service::ClientService;
pub use delivery_service::DeliveryService;
pub use incident_service::IncidentService;
pub use inventory_service::InventoryService;
pub use order_service::OrderService;
pub use payment_service::PaymentService;
pub use rental_service::RentalService;
