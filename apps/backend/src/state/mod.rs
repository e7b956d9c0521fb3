pub mod app_state;
pub mod security_config;

pub use crate::infra::state::{build_state, StateBuilder};
pub use app_state::AppState;
pub use security_config::SecurityConfig;
