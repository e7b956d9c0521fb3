//! SeaORM adapters. Functions here return `DbErr`; repos map it to `DomainError`.

pub mod items_sea;
pub mod users_sea;
