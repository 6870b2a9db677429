//! RecipeHub Core — domain models, repository traits, authorization
//! evaluator, and the uniform response envelope.
//!
//! This crate has no database or transport dependency; it defines the
//! contracts the other crates implement.

pub mod authz;
pub mod error;
pub mod models;
pub mod repository;
pub mod response;

pub use error::{HubError, HubResult};
pub use response::ApiResponse;
