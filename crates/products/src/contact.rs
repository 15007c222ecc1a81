//! WhatsApp contact deep links.

use catalog_core::Product;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left unescaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The store's WhatsApp number, digits only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactChannel {
    phone: String,
}

impl Default for ContactChannel {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PHONE)
    }
}

impl ContactChannel {
    pub const DEFAULT_PHONE: &'static str = "5581999999999";

    /// `wa.me` wants bare digits; `+`, spaces and dashes are dropped.
    pub fn new(phone: &str) -> Self {
        Self {
            phone: phone.chars().filter(char::is_ascii_digit).collect(),
        }
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn message(name: &str, slug: &str) -> String {
        format!(
            "Hi! I'm interested in the product {name} (slug: {slug}). Could you give me more details?"
        )
    }

    pub fn link(&self, name: &str, slug: &str) -> String {
        let text = Self::message(name, slug);
        format!(
            "https://wa.me/{}?text={}",
            self.phone,
            utf8_percent_encode(&text, URI_COMPONENT)
        )
    }

    pub fn link_for(&self, product: &Product) -> String {
        self.link(&product.name, &product.slug)
    }
}
