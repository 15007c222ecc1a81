//! What the catalog page should render right now.

use catalog_products::ProductCard;

use crate::error::FetchError;

/// Why a successfully loaded catalog shows nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The API returned no active products at all.
    NoProducts,
    /// Products exist but the current criteria exclude every one.
    NoMatches,
}

/// Render state. An empty result and a failed fetch are different states.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Failed { error: FetchError, retryable: bool },
    Empty(EmptyReason),
    Ready(Vec<ProductCard>),
}

impl ViewState {
    pub fn failed(error: FetchError) -> Self {
        let retryable = error.user_can_retry();
        ViewState::Failed { error, retryable }
    }

    pub fn cards(&self) -> &[ProductCard] {
        match self {
            ViewState::Ready(cards) => cards,
            _ => &[],
        }
    }
}
