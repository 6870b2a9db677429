//! Handler groups, one per resource family.
//!
//! Handlers validate first, then call services/repositories, and
//! always come back with a [`HandlerReply`]: errors are folded into
//! the envelope at this boundary, never propagated past it.

pub mod interactions;
pub mod recipes;
pub mod roles;
pub mod users;

use recipehub_core::error::HubResult;
use recipehub_core::response::HandlerReply;

pub(crate) fn finish(result: HubResult<HandlerReply>) -> HandlerReply {
    result.unwrap_or_else(|e| HandlerReply::failure(&e))
}
