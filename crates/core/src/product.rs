//! The product record as published by the catalog API.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::gender::Gender;
use crate::id::ProductId;

/// Image shown when a product has no images of its own.
pub const FALLBACK_IMAGE: &str = "https://picsum.photos/seed/p/800/600";

/// Immutable catalog item (read model; matches the API response shape).
///
/// Only `id`, `name` and `basePrice` are required on the wire. Everything else
/// falls back to an empty/false default so a sparse record still renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub gender: Gender,
    pub base_price: f64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Creates an active, non-featured product with empty optional fields.
    pub fn new(id: ProductId, name: impl Into<String>, base_price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            slug: String::new(),
            category_id: String::new(),
            category_name: String::new(),
            gender: Gender::default(),
            base_price,
            is_active: true,
            is_featured: false,
            created_at: None,
            images: Vec::new(),
        }
    }

    /// Validates one element of the API's product array and decodes it.
    ///
    /// Rejects records without a non-empty string `id`, a non-empty string
    /// `name`, or a numeric `basePrice`, as well as negative prices.
    pub fn from_json(value: Value) -> DomainResult<Self> {
        let Value::Object(fields) = &value else {
            return Err(DomainError::validation("product record is not an object"));
        };

        let non_empty_str = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.trim().is_empty())
        };
        if !non_empty_str("id") {
            return Err(DomainError::MissingField("id"));
        }
        if !non_empty_str("name") {
            return Err(DomainError::MissingField("name"));
        }
        let price = fields
            .get("basePrice")
            .and_then(Value::as_f64)
            .ok_or(DomainError::MissingField("basePrice"))?;
        if price < 0.0 {
            return Err(DomainError::validation(format!(
                "basePrice must be non-negative, got {price}"
            )));
        }

        serde_json::from_value(value).map_err(|e| DomainError::validation(e.to_string()))
    }

    /// First image, or the shared fallback.
    pub fn primary_image(&self) -> &str {
        self.images.first().map(String::as_str).unwrap_or(FALLBACK_IMAGE)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &ProductId {
        &self.id
    }
}

/// Accepts RFC 3339 or a zone-less ISO 8601 timestamp (read as UTC); anything
/// else becomes `None` rather than failing the whole record.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
