//! # Spy Cats
//!
//! Agency service that manages spy cats, the missions they are assigned to,
//! and the targets within each mission.
//!
//! ## Modules
//! - `api`: HTTP routes and error mapping
//! - `cats`: Cat records, salary updates and breed-checked hiring
//! - `missions`: Missions, targets and their lifecycle rules
//! - `breeds`: Breed registry client with a cached catalog
//! - `db`: SQLite connection and schema
//! - `config`: Environment configuration

pub mod api;
pub mod breeds;
pub mod cats;
pub mod config;
pub mod db;
pub mod error;
pub mod missions;

pub use config::Config;
pub use error::{ErrorKind, ServiceError};
