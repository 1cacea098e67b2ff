pub mod kots;
pub mod orders;
pub mod reports;
pub mod stock;
