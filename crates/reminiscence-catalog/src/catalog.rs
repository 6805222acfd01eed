//! Item catalog and its RON loader

use crate::error::{Error, Result};
use crate::item::{Inventory, Item};
use indexmap::IndexMap;
use reminiscence_core::ItemId;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const BAKERY_RON: &str = include_str!("../assets/items.ron");

/// Lookup table from item name to properties
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: IndexMap<ItemId, Item>,
}

#[derive(Deserialize)]
struct CatalogFile {
    items: IndexMap<ItemId, Item>,
}

impl ItemCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in bakery catalog
    pub fn bakery() -> Result<Self> {
        let mut catalog = Self::new();
        catalog.load_str(BAKERY_RON)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load items from a RON string of the form `(items: { "name": (...) })`
    pub fn load_str(&mut self, content: &str) -> Result<()> {
        let file: CatalogFile = ron::from_str(content)?;
        for (id, item) in file.items {
            self.insert(id, item)?;
        }
        Ok(())
    }

    /// Load items from a RON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let content = fs::read_to_string(path)?;
        self.load_str(&content)
    }

    /// Register a single item
    pub fn insert(&mut self, id: impl Into<ItemId>, item: Item) -> Result<()> {
        let id = id.into();
        if self.items.contains_key(&id) {
            return Err(Error::DuplicateItem(id.to_string()));
        }
        self.items.insert(id, item);
        Ok(())
    }

    /// Check that every recipe only references known items
    pub fn validate(&self) -> Result<()> {
        for (id, item) in &self.items {
            if let Some(recipe) = &item.recipe {
                if let Some(missing) = recipe.keys().find(|i| !self.items.contains_key(*i)) {
                    return Err(Error::UnknownIngredient {
                        item: id.to_string(),
                        ingredient: missing.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Get an item by name
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Get an item by name, failing on unknown names
    pub fn require(&self, id: &str) -> Result<&Item> {
        self.get(id).ok_or_else(|| Error::UnknownItem(id.to_string()))
    }

    /// Check a recipe against an inventory; unknown items are not craftable
    pub fn can_craft(&self, id: &str, inventory: &Inventory) -> bool {
        self.get(id).is_some_and(|item| item.can_craft(inventory))
    }

    /// All items in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &Item)> {
        self.items.iter()
    }

    /// Items without a recipe
    pub fn ingredients(&self) -> impl Iterator<Item = (&ItemId, &Item)> {
        self.items.iter().filter(|(_, item)| !item.is_product())
    }

    /// Items with a recipe
    pub fn products(&self) -> impl Iterator<Item = (&ItemId, &Item)> {
        self.items.iter().filter(|(_, item)| item.is_product())
    }

    /// Items carrying a label
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = (&'a ItemId, &'a Item)> {
        self.items.iter().filter(move |(_, item)| item.has_tag(tag))
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bakery_catalog_loads() {
        let catalog = ItemCatalog::bakery().unwrap();
        assert_eq!(catalog.len(), 19);
        assert_eq!(catalog.ingredients().count(), 14);
        assert_eq!(catalog.products().count(), 5);

        let sesame = catalog.get("sesame").unwrap();
        assert_eq!(sesame.price, 1.2);
        assert_eq!(sesame.buy_count, Some(10));

        let toast = catalog.get("toast").unwrap();
        assert_eq!(toast.craft_count, Some(9));
        assert_eq!(toast.recipe.as_ref().unwrap().get("milk"), Some(&3));
    }

    #[test]
    fn test_tag_queries() {
        let catalog = ItemCatalog::bakery().unwrap();
        let nuts: Vec<_> = catalog.with_tag("nut").map(|(id, _)| id.as_str()).collect();
        assert_eq!(nuts, vec!["peanut", "almond"]);
        assert_eq!(catalog.with_tag("bread").count(), 4);
    }

    #[test]
    fn test_can_craft_by_name() {
        let catalog = ItemCatalog::bakery().unwrap();
        let mut inventory = Inventory::new();
        inventory.insert("flour".into(), 1);

        assert!(catalog.can_craft("whiteBread", &inventory));
        assert!(!catalog.can_craft("bagel", &inventory));
        assert!(!catalog.can_craft("flour", &inventory));
        assert!(!catalog.can_craft("croissant", &inventory));
    }

    #[test]
    fn test_duplicate_items_are_rejected() {
        let mut catalog = ItemCatalog::new();
        catalog.insert("flour", Item::ingredient(4.0, 1)).unwrap();
        let err = catalog.insert("flour", Item::ingredient(5.0, 1)).unwrap_err();
        assert!(matches!(err, Error::DuplicateItem(_)));
    }

    #[test]
    fn test_validate_finds_unknown_ingredient() {
        let mut catalog = ItemCatalog::new();
        catalog
            .load_str(r#"(items: { "scone": (price: 3.0, recipe: Some({"cream": 1}), craft_count: Some(2)) })"#)
            .unwrap();
        assert!(matches!(
            catalog.validate(),
            Err(Error::UnknownIngredient { .. })
        ));
        assert!(catalog.require("cream").is_err());
    }
}
