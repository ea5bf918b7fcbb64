use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{ForecastError, Result};

const MAX_NAME_LEN: usize = 256;

fn default_priority() -> u32 {
    1
}

/// Something a user is saving toward. Lower priority values come first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WishlistItem {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default)]
    pub is_bought: bool,
}

impl WishlistItem {
    pub fn new(id: i64, name: impl Into<String>, price: Decimal) -> Result<Self> {
        let item = Self {
            id,
            name: name.into().trim().to_string(),
            price,
            priority: default_priority(),
            is_bought: false,
        };
        item.validate()?;
        Ok(item)
    }

    pub fn with_priority(mut self, priority: u32) -> Result<Self> {
        self.priority = priority;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ForecastError::Validation(
                "wishlist item name cannot be empty".into(),
            ));
        }
        if self.name.len() > MAX_NAME_LEN {
            return Err(ForecastError::Validation(format!(
                "wishlist item name cannot exceed {MAX_NAME_LEN} characters"
            )));
        }
        if self.price < Decimal::ZERO {
            return Err(ForecastError::NegativeAmount(self.price));
        }
        if self.priority == 0 {
            return Err(ForecastError::Validation(
                "wishlist priority starts at 1".into(),
            ));
        }
        Ok(())
    }

    /// Flips the bought flag and returns the new state.
    pub fn toggle_bought(&mut self) -> bool {
        self.is_bought = !self.is_bought;
        self.is_bought
    }

    /// Sort key: unbought first, then by priority, then by id.
    pub fn display_order(&self) -> (bool, u32, i64) {
        (self.is_bought, self.priority, self.id)
    }
}

/// Partial update; absent fields leave the item untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WishlistPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bought: Option<bool>,
}

impl WishlistPatch {
    pub fn has_effect(&self) -> bool {
        self.name.is_some()
            || self.price.is_some()
            || self.priority.is_some()
            || self.is_bought.is_some()
    }

    /// Applies the patch, leaving `item` unchanged if the result would be invalid.
    pub fn apply(&self, item: &mut WishlistItem) -> Result<()> {
        let mut updated = item.clone();
        if let Some(name) = &self.name {
            updated.name = name.trim().to_string();
        }
        if let Some(price) = self.price {
            updated.price = price;
        }
        if let Some(priority) = self.priority {
            updated.priority = priority;
        }
        if let Some(is_bought) = self.is_bought {
            updated.is_bought = is_bought;
        }
        updated.validate()?;
        *item = updated;
        Ok(())
    }
}
