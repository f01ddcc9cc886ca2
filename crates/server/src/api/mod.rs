pub mod errors;
pub mod json;
pub mod metrics;
pub mod pages;
pub mod server;

pub use server::{AppState, build_api_router, run_api};
