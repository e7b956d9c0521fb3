#![allow(dead_code, unused_imports)]

pub mod app_builder;
pub mod factory;

pub use app_builder::{state_with_clock, test_db, test_state};
pub use factory::{seed_item, seed_user, SEED_PASSWORD};
