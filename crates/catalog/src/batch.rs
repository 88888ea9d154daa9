use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelflife_core::{BatchId, DomainError, DomainResult, Entity, ProductId};

/// Draft batch, not yet assigned an identity by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBatch {
    pub product_id: ProductId,
    pub qty_total: u32,
    pub expiry_ts: DateTime<Utc>,
    pub store_id: String,
}

/// A finite quantity of one product nearing expiry, sold at a store.
///
/// `qty_available` starts at `qty_total` and is decremented by reservations
/// only; offer creation never touches it. A lapsed reservation does NOT
/// return quantity (see the no-show sweeper).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub product_id: ProductId,
    pub qty_total: u32,
    pub qty_available: u32,
    pub expiry_ts: DateTime<Utc>,
    pub store_id: String,
}

impl Batch {
    /// Validate a draft and bind it to its store-assigned identity.
    pub fn new(id: BatchId, draft: NewBatch) -> DomainResult<Self> {
        if draft.qty_total == 0 {
            return Err(DomainError::validation("qty_total must be positive"));
        }

        Ok(Self {
            id,
            product_id: draft.product_id,
            qty_total: draft.qty_total,
            qty_available: draft.qty_total,
            expiry_ts: draft.expiry_ts,
            store_id: draft.store_id,
        })
    }

    /// A batch already past expiry is not eligible for new offers.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_ts <= now
    }

    /// Commit `qty` units against this batch.
    pub fn reserve(&mut self, qty: u32) -> DomainResult<()> {
        if qty == 0 {
            return Err(DomainError::validation("qty_reserved must be positive"));
        }
        if qty > self.qty_available {
            return Err(DomainError::CapacityExceeded {
                requested: qty,
                available: self.qty_available,
            });
        }
        self.qty_available -= qty;
        Ok(())
    }
}

impl Entity for Batch {
    type Id = BatchId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
