//! The user's current filter/sort selection.

use core::str::FromStr;

use catalog_core::{DomainError, Gender, Product};
use serde::{Deserialize, Serialize};

/// Price ceiling applied before the user touches the slider.
pub const DEFAULT_MAX_PRICE: f64 = 200.0;

/// Bounds and granularity of the price slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

pub const PRICE_RANGE: PriceRange = PriceRange {
    min: 10.0,
    max: 300.0,
    step: 5.0,
};

impl PriceRange {
    /// Clamps `value` into the range and rounds it to the nearest step.
    pub fn snap(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.max;
        }
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).min(self.max)
    }
}

/// Sort order of the rendered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Most recently created first.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    /// Locale-aware A→Z.
    Name,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::PriceAsc => "priceAsc",
            SortKey::PriceDesc => "priceDesc",
            SortKey::Name => "name",
        }
    }
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortKey::Newest),
            "priceAsc" => Ok(SortKey::PriceAsc),
            "priceDesc" => Ok(SortKey::PriceDesc),
            "name" => Ok(SortKey::Name),
            other => Err(DomainError::unknown("sort key", other)),
        }
    }
}

/// Category selector: everything, or one category name matched exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => product.category_name == *name,
        }
    }
}

/// `"all"` and the empty string select every category.
impl FromStr for CategoryFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | "all" => CategoryFilter::All,
            name => CategoryFilter::Named(name.to_string()),
        })
    }
}

/// Gender selector: everything, or one gender matched by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenderFilter {
    #[default]
    All,
    Only(Gender),
}

impl GenderFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            GenderFilter::All => true,
            GenderFilter::Only(gender) => product.gender.label() == gender.label(),
        }
    }
}

impl FromStr for GenderFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(GenderFilter::All),
            label => label.parse().map(GenderFilter::Only),
        }
    }
}

/// Transient filter/sort selection. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Free text; matched case-insensitively against name, description and slug.
    pub query: String,
    pub category: CategoryFilter,
    pub gender: GenderFilter,
    /// Inclusive price ceiling.
    pub max_price: f64,
    pub featured_only: bool,
    pub sort: SortKey,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: CategoryFilter::All,
            gender: GenderFilter::All,
            max_price: DEFAULT_MAX_PRICE,
            featured_only: false,
            sort: SortKey::Newest,
        }
    }
}

impl FilterCriteria {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn with_gender(mut self, gender: GenderFilter) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_max_price(mut self, max_price: f64) -> Self {
        self.max_price = max_price;
        self
    }

    /// Like [`with_max_price`](Self::with_max_price), but the value comes from
    /// the slider and is snapped onto [`PRICE_RANGE`].
    pub fn with_max_price_snapped(self, raw: f64) -> Self {
        self.with_max_price(PRICE_RANGE.snap(raw))
    }

    pub fn with_featured_only(mut self, featured_only: bool) -> Self {
        self.featured_only = featured_only;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Lowercased query; `None` when it is blank. Surrounding spaces stay part
    /// of the search text.
    pub fn normalized_query(&self) -> Option<String> {
        (!self.query.trim().is_empty()).then(|| self.query.to_lowercase())
    }

    /// Whether the user has narrowed the catalog in any way (sort aside).
    pub fn is_narrowing(&self) -> bool {
        self.normalized_query().is_some()
            || self.category != CategoryFilter::All
            || self.gender != GenderFilter::All
            || self.featured_only
    }
}
