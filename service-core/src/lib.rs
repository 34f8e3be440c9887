//! service-core: shared HTTP service infrastructure (tracing setup and middleware).
pub mod middleware;
pub mod observability;
