//! Modica Core Library
//!
//! This crate provides the domain types shared by the Modica API client:
//! backend location configuration, paginated list responses, upload progress
//! events, and model instance identifiers.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{ApiContext, ApiLocation, Scheme};
pub use error::ConfigError;
pub use models::{Filter, ModelId, PaginatedResponse, UploadEvent, UploadProgress};
