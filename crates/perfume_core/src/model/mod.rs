//! Domain model for the perfume back office.
//!
//! # Responsibility
//! - Define the catalog entities (`Perfume`, `Manufacturer`) and staff `Account`.
//! - Define read models handed to the presentation layer.
//!
//! # Invariants
//! - Perfume and manufacturer identity is the natural string key.
//! - A `Session` is a plain value; there is no process-wide current user.

pub mod account;
pub mod manufacturer;
pub mod perfume;
pub mod session;
