//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the summary pipeline so route handlers can stay
//! focused on protocol translation and status mapping.

pub mod normalize;
pub mod summary;
