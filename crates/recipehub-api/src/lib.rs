//! RecipeHub API — request validation, the permission guard, and the
//! transport-agnostic handlers.
//!
//! Every handler takes a typed request struct and returns a
//! [`HandlerReply`](recipehub_core::response::HandlerReply): the
//! uniform envelope plus the error category a transport maps to a
//! status code. Nothing in this crate knows about HTTP.

pub mod guard;
pub mod handlers;
pub mod validate;
pub mod view;

pub use guard::{current_user, with_permission};
pub use handlers::interactions::InteractionHandlers;
pub use handlers::recipes::RecipeHandlers;
pub use handlers::roles::RoleHandlers;
pub use handlers::users::UserHandlers;
