use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::form::{optional_text, parse_amount};
use crate::error::BudgetError;

/// Category a purchased item is filed under unless another is named.
pub const PURCHASE_CATEGORY: &str = "Shopping";

#[derive(Debug, Clone, PartialEq)]
pub struct WishlistItem {
    pub id: Option<i64>,
    pub item_name: String,
    pub price: Decimal,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub notes: Option<String>,
}

impl WishlistItem {
    pub fn new(item_name: String, price: Decimal) -> Self {
        Self {
            id: None,
            item_name,
            price,
            url: None,
            image_url: None,
            notes: None,
        }
    }

    /// Description of the expense recorded when the item is bought.
    pub fn purchase_description(&self) -> String {
        match &self.notes {
            Some(notes) => format!("Purchased: {} - {notes}", self.item_name),
            None => format!("Purchased: {}", self.item_name),
        }
    }
}

/// A validated wishlist form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWishlistItem {
    pub item_name: String,
    pub price: Decimal,
    pub url: Option<String>,
    pub notes: Option<String>,
}

impl NewWishlistItem {
    pub fn parse(item_name: &str, price: &str, url: &str, notes: &str) -> Result<Self, BudgetError> {
        let (item_name, price) = (item_name.trim(), price.trim());
        if item_name.is_empty() || price.is_empty() {
            return Err(BudgetError::Validation(
                "Please complete item name and price.".into(),
            ));
        }

        Ok(Self {
            item_name: item_name.to_string(),
            price: parse_amount(price)?,
            url: optional_text(url),
            notes: optional_text(notes),
        })
    }
}

/// Fields to change on a wishlist item. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WishlistPatch {
    pub item_name: Option<String>,
    pub price: Option<Decimal>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

impl WishlistPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// A new link drops the preview image taken from the old one.
    pub(crate) fn apply(&self, item: &mut WishlistItem) {
        if let Some(item_name) = &self.item_name {
            item.item_name = item_name.clone();
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(url) = &self.url {
            if item.url.as_ref() != Some(url) {
                item.image_url = None;
            }
            item.url = Some(url.clone());
        }
        if let Some(notes) = &self.notes {
            item.notes = Some(notes.clone());
        }
    }
}

/// How a wishlist item was bought.
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub date: NaiveDate,
    pub category: String,
}

impl Purchase {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date,
            category: PURCHASE_CATEGORY.to_string(),
        }
    }

    pub fn in_category(mut self, category: &str) -> Self {
        if let Some(category) = optional_text(category) {
            self.category = category;
        }
        self
    }
}
