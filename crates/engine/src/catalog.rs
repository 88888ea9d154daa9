//! Catalog intake and read paths used by the outer layer and by tests.

use shelflife_catalog::{Batch, NewBatch, NewProduct, Product};
use shelflife_core::{Clock, DomainResult};
use shelflife_reservations::CodeGenerator;
use shelflife_store::{Repository, StoreTx};

use crate::Engine;

impl<R, C, G> Engine<R, C, G>
where
    R: Repository,
    C: Clock,
    G: CodeGenerator,
{
    pub fn add_product(&self, draft: NewProduct) -> DomainResult<Product> {
        let product = self.repo.transaction(|tx| tx.insert_product(draft))?;
        tracing::debug!(product = %product.id, sku = %product.sku, "product added");
        Ok(product)
    }

    pub fn add_batch(&self, draft: NewBatch) -> DomainResult<Batch> {
        let batch = self.repo.transaction(|tx| tx.insert_batch(draft))?;
        tracing::debug!(batch = %batch.id, qty = batch.qty_total, "batch added");
        Ok(batch)
    }

    pub fn products(&self) -> DomainResult<Vec<Product>> {
        self.repo.transaction(|tx| Ok(tx.products()))
    }

    pub fn batches(&self) -> DomainResult<Vec<Batch>> {
        self.repo.transaction(|tx| Ok(tx.batches()))
    }
}
