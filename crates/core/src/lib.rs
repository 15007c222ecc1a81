//! `catalog-core`: catalog domain foundation.
//!
//! This crate contains the **pure domain** types shared by the fetcher and the
//! filter engine: the product record, its gender classification and the wire
//! validation rules (no IO, no HTTP).

pub mod entity;
pub mod error;
pub mod gender;
pub mod id;
pub mod product;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use gender::Gender;
pub use id::ProductId;
pub use product::{FALLBACK_IMAGE, Product};
