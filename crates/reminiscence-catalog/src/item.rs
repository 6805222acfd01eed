//! Item definitions

use indexmap::IndexMap;
use reminiscence_core::ItemId;
use serde::{Deserialize, Serialize};

/// Ingredient name -> required count
pub type Recipe = IndexMap<ItemId, u32>;

/// Item name -> held count, the shape stored in a save slot
pub type Inventory = IndexMap<ItemId, u32>;

/// Properties of a sellable or craftable item
///
/// Recipe presence separates products from raw ingredients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Category labels (e.g. "ingredient", "bread", "nut")
    #[serde(default)]
    pub tags: Vec<String>,
    /// Price per unit when selling, per batch when buying
    pub price: f64,
    /// Units received per purchase (ingredients only)
    #[serde(default)]
    pub buy_count: Option<u32>,
    /// Ingredients consumed by one craft (products only)
    #[serde(default)]
    pub recipe: Option<Recipe>,
    /// Units produced by one craft (products only)
    #[serde(default)]
    pub craft_count: Option<u32>,
}

impl Item {
    /// Create a raw ingredient
    pub fn ingredient(price: f64, buy_count: u32) -> Self {
        Self {
            tags: vec!["ingredient".to_string()],
            price,
            buy_count: Some(buy_count),
            recipe: None,
            craft_count: None,
        }
    }

    /// Create a crafted product
    pub fn product(price: f64, recipe: Recipe, craft_count: u32) -> Self {
        Self {
            tags: vec!["product".to_string()],
            price,
            buy_count: None,
            recipe: Some(recipe),
            craft_count: Some(craft_count),
        }
    }

    /// Add a category label
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Whether this item is crafted rather than bought
    pub fn is_product(&self) -> bool {
        self.recipe.is_some()
    }

    /// Whether this item carries the given label
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Units received per purchase; a missing batch size means one
    pub fn batch_size(&self) -> u32 {
        self.buy_count.unwrap_or(1)
    }

    /// Units produced per craft; a missing yield means one
    pub fn yield_count(&self) -> u32 {
        self.craft_count.unwrap_or(1)
    }

    /// Check whether `inventory` holds every ingredient of the recipe.
    ///
    /// Raw ingredients have no recipe and are never craftable.
    pub fn can_craft(&self, inventory: &Inventory) -> bool {
        match &self.recipe {
            Some(recipe) => recipe.iter().all(|(ingredient, required)| {
                inventory.get(ingredient).copied().unwrap_or(0) >= *required
            }),
            None => false,
        }
    }
}
