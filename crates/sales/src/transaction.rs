use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pawshop_core::{find_entity, position_of, Entity, ItemId, TransactionId};

use crate::cart::CartLine;

/// Sum of price × quantity over `lines`.
pub fn lines_total(lines: &[CartLine]) -> u64 {
    lines
        .iter()
        .fold(0u64, |sum, line| sum.saturating_add(line.subtotal()))
}

/// Committed checkout: immutable snapshot of the cart lines it consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub items: Vec<CartLine>,
    /// Price in smallest currency unit.
    pub total: u64,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(id: TransactionId, items: Vec<CartLine>, created_at: DateTime<Utc>) -> Self {
        let total = lines_total(&items);
        Self {
            id,
            items,
            total,
            created_at,
        }
    }

    pub fn quantity_of(&self, id: &ItemId) -> u32 {
        find_entity(&self.items, id).map(|line| line.quantity).unwrap_or(0)
    }
}

impl Entity for Transaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Append-only log of committed transactions (entries are only ever removed
/// whole, by a stock restore).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionLog {
    transactions: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        find_entity(&self.transactions, id)
    }

    /// Timestamp-derived id for a checkout at `at`, unique within this log.
    ///
    /// Two checkouts in the same millisecond take the next free millisecond.
    pub fn next_id(&self, at: DateTime<Utc>) -> TransactionId {
        let mut millis = at.timestamp_millis();
        loop {
            let candidate = TransactionId::from_millis(millis);
            if self.get(&candidate).is_none() {
                return candidate;
            }
            millis += 1;
        }
    }

    /// Record a checkout of `lines` at `at` and return the stored transaction.
    pub fn record(&mut self, lines: Vec<CartLine>, at: DateTime<Utc>) -> Transaction {
        let transaction = Transaction::new(self.next_id(at), lines, at);
        self.transactions.push(transaction.clone());
        transaction
    }

    pub fn remove(&mut self, id: &TransactionId) -> Option<Transaction> {
        position_of(&self.transactions, id).map(|idx| self.transactions.remove(idx))
    }

    /// Sum of all recorded totals.
    pub fn revenue(&self) -> u64 {
        self.transactions
            .iter()
            .fold(0u64, |sum, t| sum.saturating_add(t.total))
    }
}
