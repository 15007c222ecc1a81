//! View-models handed to the rendering layer.

use catalog_core::{Product, ProductId};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::contact::ContactChannel;

/// How long after creation a product carries the "new" badge.
const NEW_BADGE_WINDOW_DAYS: i64 = 30;

/// `$ 41.77`
pub fn format_price(price: f64) -> String {
    format!("$ {price:.2}")
}

/// Grid density toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GridDensity {
    #[default]
    Standard,
    Dense,
}

impl GridDensity {
    pub fn toggle(self) -> Self {
        match self {
            GridDensity::Standard => GridDensity::Dense,
            GridDensity::Dense => GridDensity::Standard,
        }
    }

    pub fn is_dense(self) -> bool {
        self == GridDensity::Dense
    }
}

/// Everything one product tile displays, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category_name: String,
    pub price_label: String,
    pub gender_label: &'static str,
    pub image: String,
    pub featured: bool,
    pub is_new: bool,
    pub contact_url: String,
}

impl ProductCard {
    /// `now` is passed in so the "new" badge stays deterministic.
    pub fn build(product: &Product, contact: &ContactChannel, now: DateTime<Utc>) -> Self {
        let is_new = product
            .created_at
            .is_some_and(|created| now - created < Duration::days(NEW_BADGE_WINDOW_DAYS));

        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            category_name: product.category_name.clone(),
            price_label: format_price(product.base_price),
            gender_label: product.gender.label(),
            image: product.primary_image().to_string(),
            featured: product.is_featured,
            is_new,
            contact_url: contact.link_for(product),
        }
    }
}
