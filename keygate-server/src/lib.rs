//! Keygate server library: configuration, state, handlers, and routes.

pub mod infra;
pub mod routes;
pub mod users;

pub use infra::app_state::AppState;
