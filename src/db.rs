pub mod cash_repo;
pub mod client_repo;
pub mod delivery_repo;
pub mod incident_repo;
pub mod order_repo;
pub mod payment_repo;
pub mod product_repo;
pub mod rental_repo;

pub use cash_repo::CashRegisterRepository;
pub use client_repo::ClientRepository;
pub use delivery_repo::DeliveryRepository;
pub use incident_repo::IncidentRepository;
pub use order_repo::OrderRepository;
pub use payment_repo::PaymentRepository;
pub use product_repo::ProductRepository;
pub use rental_repo::RentalRepository;
