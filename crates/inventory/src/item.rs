use serde::{Deserialize, Serialize};

use pawshop_core::{DomainError, DomainResult, Entity, ItemId};

/// Filter value that matches every category.
pub const ALL_CATEGORIES: &str = "all";

/// A purchasable item and its stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub stock: u32,
    /// Price in smallest currency unit.
    pub price: u64,
    /// Free-text tag (e.g. "kucing", "anjing").
    pub category: String,
}

/// Stock status shown next to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Ready,
    SoldOut,
}

impl CatalogItem {
    pub fn availability(&self) -> Availability {
        if self.stock > 0 {
            Availability::Ready
        } else {
            Availability::SoldOut
        }
    }

    /// Case-insensitive category match; `"all"` matches every item.
    pub fn in_category(&self, category: &str) -> bool {
        let wanted = category.trim();
        wanted.eq_ignore_ascii_case(ALL_CATEGORIES)
            || self.category.trim().to_lowercase() == wanted.to_lowercase()
    }

    /// Merge the fields present in `patch` into this item.
    pub fn merge(&mut self, patch: &ItemPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
    }
}

impl Entity for CatalogItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Creation request for a catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    /// Identifier to use; one is generated when absent.
    #[serde(default)]
    pub id: Option<ItemId>,
    pub name: String,
    pub stock: u32,
    pub price: u64,
    pub category: String,
}

impl NewItem {
    pub fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name)?;
        require_text("category", &self.category)
    }

    /// Validate and turn the request into a catalog item.
    pub fn into_item(self) -> DomainResult<CatalogItem> {
        self.validate()?;
        Ok(CatalogItem {
            id: self.id.unwrap_or_else(ItemId::generate),
            name: self.name.trim().to_string(),
            stock: self.stock,
            price: self.price,
            category: self.category.trim().to_string(),
        })
    }
}

/// Partial update of a catalog item. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ItemPatch {
    /// Patch that only sets the stock level.
    pub fn stock(stock: u32) -> Self {
        Self {
            stock: Some(stock),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.stock.is_none() && self.price.is_none() && self.category.is_none()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.is_empty() {
            return Err(DomainError::validation("patch must change at least one field"));
        }
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(category) = &self.category {
            require_text("category", category)?;
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(stock: u32) -> CatalogItem {
        CatalogItem {
            id: ItemId::new("a").unwrap(),
            name: "Whiskas".to_string(),
            stock,
            price: 100,
            category: "Kucing".to_string(),
        }
    }

    #[test]
    fn availability_follows_stock() {
        assert_eq!(item(3).availability(), Availability::Ready);
        assert_eq!(item(0).availability(), Availability::SoldOut);
    }

    #[test]
    fn category_match_is_case_insensitive() {
        let it = item(1);
        assert!(it.in_category("kucing"));
        assert!(it.in_category(" KUCING "));
        assert!(it.in_category("All"));
        assert!(!it.in_category("anjing"));
    }

    #[test]
    fn merge_only_touches_present_fields() {
        let mut it = item(5);
        it.merge(&ItemPatch {
            price: Some(250),
            ..ItemPatch::default()
        });
        assert_eq!(it.price, 250);
        assert_eq!(it.stock, 5);
        assert_eq!(it.name, "Whiskas");
    }

    #[test]
    fn new_item_requires_name_and_category() {
        let req = NewItem {
            id: None,
            name: " ".to_string(),
            stock: 1,
            price: 1,
            category: "kucing".to_string(),
        };
        match req.into_item().unwrap_err() {
            DomainError::Validation(msg) if msg.contains("name") => {}
            other => panic!("Expected name validation error, got {other:?}"),
        }
    }

    #[test]
    fn new_item_without_id_gets_generated_one() {
        let req = NewItem {
            id: None,
            name: "Pedigree".to_string(),
            stock: 2,
            price: 50,
            category: "anjing".to_string(),
        };
        let created = req.into_item().unwrap();
        assert!(!created.id.as_str().is_empty());
        assert_eq!(created.stock, 2);
    }

    #[test]
    fn empty_patch_is_rejected() {
        assert!(ItemPatch::default().validate().is_err());
        assert!(ItemPatch::stock(0).validate().is_ok());
        let blank = ItemPatch {
            category: Some(String::new()),
            ..ItemPatch::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let json = serde_json::to_value(ItemPatch::stock(7)).unwrap();
        assert_eq!(json, serde_json::json!({ "stock": 7 }));
    }
}
