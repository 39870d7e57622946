//! API route definitions.
//!
//! This module organizes all HTTP routes for the Logpulse API server.

mod error;
mod health;
mod logs;
mod stream;

pub use error::{ApiError, ErrorResponse};
pub use health::health_routes;
pub use logs::{logs_routes, LogQueryParams, LogQueryResponse};
pub use stream::stream_routes;
