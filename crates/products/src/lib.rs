//! Catalog browsing rules.
//!
//! This crate derives what the catalog page shows from a fetched product
//! snapshot and the user's current selection, implemented purely as
//! deterministic logic (no IO, no HTTP, no clock reads).

pub mod collation;
pub mod contact;
pub mod criteria;
pub mod engine;
pub mod presentation;

pub use collation::compare_names;
pub use contact::ContactChannel;
pub use criteria::{
    CategoryFilter, DEFAULT_MAX_PRICE, FilterCriteria, GenderFilter, PRICE_RANGE, PriceRange,
    SortKey,
};
pub use engine::{available_categories, derive_view, derive_view_refs};
pub use presentation::{GridDensity, ProductCard, format_price};
