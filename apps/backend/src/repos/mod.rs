//! Repository layer: domain structs over the SeaORM adapters, errors as `DomainError`.

pub mod items;
pub mod users;
