pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod services;
pub mod startup;

use std::sync::Arc;

use services::CardProcessor;

pub use startup::Application;

/// Service identifier reported by `/health`.
pub const SERVICE_NAME: &str = "kanizsa-billing";

/// Shared application state.
///
/// The processor handle is configured once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<dyn CardProcessor>,
}

impl AppState {
    pub fn new(processor: Arc<dyn CardProcessor>) -> Self {
        Self { processor }
    }
}
