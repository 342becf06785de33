//! Domain entities and value objects shared by every layer.

pub mod customer;
pub mod types;
