pub mod cash;
pub mod clients;
pub mod deliveries;
pub mod incidents;
pub mod orders;
pub mod payments;
pub mod products;
pub mod rentals;
