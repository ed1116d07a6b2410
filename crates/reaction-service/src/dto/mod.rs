//! Data transfer objects for API requests and responses

pub mod requests;
pub mod responses;

pub use requests::ReactionRequest;
pub use responses::{HealthChecks, HealthResponse, ReactionResponse, ReadinessResponse};
