//! HTTP API for the spy cats service.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /cats` - Hire a cat
//! - `GET /cats` - List cats
//! - `GET /cats/{id}` - Get a cat
//! - `PATCH /cats/{id}/salary` - Update a cat's salary
//! - `DELETE /cats/{id}` - Remove a cat
//! - `POST /missions` - Create a mission with its targets
//! - `GET /missions` - List missions with their targets
//! - `GET /missions/{id}` - Get a mission
//! - `DELETE /missions/{id}` - Delete an unassigned mission
//! - `PUT /missions/{id}/assign` - Assign a cat to a mission
//! - `PATCH /missions/{id}/complete` - Mark a mission complete
//! - `POST /missions/{id}/targets` - Add a target to an open mission
//! - `GET /missions/targets/{targetId}` - Get a target
//! - `PATCH /missions/targets/{targetId}` - Update a target
//! - `DELETE /missions/targets/{targetId}` - Delete a pending target

mod cats;
pub mod error;
mod missions;
mod routes;
pub mod types;

pub use routes::{app, serve, AppState};
pub use types::*;
