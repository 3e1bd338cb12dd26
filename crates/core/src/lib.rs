//! `stockledger-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, the `Money` value object and the entity/value-object traits.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{MovementId, ProductId};
pub use money::Money;
pub use value_object::ValueObject;
