//! `pawshop-core` — shared domain building blocks.
//!
//! Identifiers, the domain error model and the `Entity` trait. This crate
//! contains **pure domain** primitives (no IO).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{find_entity, position_of, Entity};
pub use error::{DomainError, DomainResult};
pub use id::{ItemId, TransactionId};
