//! Shared types, errors, and configuration for Kendra.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe hierarchy references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT claims carrying the caller's role and home-hierarchy context

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
