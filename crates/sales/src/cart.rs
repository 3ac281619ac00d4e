use serde::{Deserialize, Serialize};

use pawshop_core::{find_entity, position_of, Entity, ItemId};
use pawshop_inventory::{Catalog, CatalogItem};

use crate::transaction::lines_total;

/// Cart line: catalog item snapshot + requested quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub quantity: u32,
}

impl CartLine {
    pub fn item_id(&self) -> &ItemId {
        &self.item.id
    }

    /// price × quantity.
    pub fn subtotal(&self) -> u64 {
        self.item.price.saturating_mul(u64::from(self.quantity))
    }
}

impl Entity for CartLine {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.item.id
    }
}

/// Result of an add-to-cart request.
///
/// Only `Accepted` changes the cart; the other variants are silent no-ops for
/// the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum AddToCartOutcome {
    /// Line created or incremented; `quantity` is the new line quantity.
    Accepted { quantity: u32 },
    /// Incrementing would exceed current stock; line left at `quantity`.
    Capped { quantity: u32 },
    /// Nothing was added.
    Rejected { reason: AddRejection },
}

impl AddToCartOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AddToCartOutcome::Accepted { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddRejection {
    /// Item has no stock and is not in the cart yet.
    OutOfStock,
    /// Item is not in the catalog.
    UnknownItem,
}

/// Transient shopping cart, one line per catalog item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, id: &ItemId) -> Option<&CartLine> {
        find_entity(&self.lines, id)
    }

    pub fn quantity_of(&self, id: &ItemId) -> u32 {
        self.line(id).map(|line| line.quantity).unwrap_or(0)
    }

    /// Running total of the cart.
    pub fn total(&self) -> u64 {
        lines_total(&self.lines)
    }

    /// Add one unit of `id`, bounded by the item's current stock in `catalog`.
    pub fn add(&mut self, catalog: &Catalog, id: &ItemId) -> AddToCartOutcome {
        let Some(item) = catalog.get(id) else {
            return AddToCartOutcome::Rejected {
                reason: AddRejection::UnknownItem,
            };
        };

        if let Some(idx) = position_of(&self.lines, id) {
            let line = &mut self.lines[idx];
            if line.quantity >= item.stock {
                return AddToCartOutcome::Capped {
                    quantity: line.quantity,
                };
            }
            line.quantity += 1;
            return AddToCartOutcome::Accepted {
                quantity: line.quantity,
            };
        }

        if item.stock == 0 {
            return AddToCartOutcome::Rejected {
                reason: AddRejection::OutOfStock,
            };
        }

        self.lines.push(CartLine {
            item: item.clone(),
            quantity: 1,
        });
        AddToCartOutcome::Accepted { quantity: 1 }
    }

    /// Remove the line for `id`. Returns `false` if there was none.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        match position_of(&self.lines, id) {
            Some(idx) => {
                self.lines.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Keep only the lines whose item id satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&ItemId) -> bool) {
        self.lines.retain(|line| keep(line.item_id()));
    }
}
