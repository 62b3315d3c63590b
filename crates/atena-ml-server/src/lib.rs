//! HTTP front end for the Atena ML recommendation service.
//!
//! Serves `/health` and the `/api/pomodoro/*` endpoints over axum, in either
//! the full or the minimal (mock) variant.

pub mod error;
pub mod responses;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
