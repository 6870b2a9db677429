//! Domain models for RecipeHub.
//!
//! These are the core types shared across all crates.

pub mod category;
pub mod comment;
pub mod favorite;
pub mod permission;
pub mod recipe;
pub mod role;
pub mod user;
