//! Use-case services called by the presentation layer.
//!
//! # Responsibility
//! - Authorize, validate and orchestrate repository calls per business operation.
//! - Normalize expected failures into result values instead of errors.
//!
//! # Invariants
//! - Services borrow one `CoreContext`; none of them holds global state.
//! - Every mutating operation commits exactly once on success.

pub mod auth_service;
pub mod catalog_service;
pub mod manufacturer_service;
