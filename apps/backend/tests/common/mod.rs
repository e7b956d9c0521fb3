#![allow(dead_code, unused_imports)]

// Logging is auto-installed for every test binary that declares `mod common;`
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

pub use backend_test_support::problem_details::assert_problem_details_from_service_response;
pub use backend_test_support::unique_helpers::{unique_email, unique_str};
