use chrono::{DateTime, Utc};

use shelflife_catalog::{Batch, NewBatch, NewProduct, Product};
use shelflife_core::{BatchId, DomainResult, OfferId, ProductId, ReservationId};
use shelflife_impact::{Impact, NewImpact};
use shelflife_offers::{Audience, NewOffer, Offer};
use shelflife_reservations::{ConfirmationCode, NewPickup, NewReservation, Pickup, Reservation};

/// Transactional view over the six record types.
///
/// All reads return owned copies: mutations go back through the `update_*` /
/// `insert_*` intents so the transaction can be discarded wholesale on error.
/// Inserts assign the surrogate id and enforce uniqueness constraints
/// (product sku, reservation confirmation code) with
/// `DomainError::UniquenessConflict`.
pub trait StoreTx {
    // Products.
    fn insert_product(&mut self, draft: NewProduct) -> DomainResult<Product>;
    fn product(&self, id: ProductId) -> Option<Product>;
    fn products(&self) -> Vec<Product>;

    // Batches. `insert_batch` requires the referenced product to exist.
    fn insert_batch(&mut self, draft: NewBatch) -> DomainResult<Batch>;
    fn batch(&self, id: BatchId) -> Option<Batch>;
    fn batches(&self) -> Vec<Batch>;
    /// Batches still eligible for markdown: expiry strictly after `now`.
    fn batches_expiring_after(&self, now: DateTime<Utc>) -> Vec<Batch>;
    fn update_batch(&mut self, batch: Batch) -> DomainResult<()>;

    // Offers. `insert_offer` requires the referenced batch to exist.
    fn insert_offer(&mut self, draft: NewOffer) -> DomainResult<Offer>;
    fn offer(&self, id: OfferId) -> Option<Offer>;
    /// Idempotence guard for the markdown engine: any nonprofit offer on the
    /// batch counts, regardless of its window or expiry state.
    fn has_nonprofit_offer(&self, batch_id: BatchId) -> bool;
    /// Offers for one audience whose window has not yet closed.
    fn offers_ending_after(&self, audience: Audience, now: DateTime<Utc>) -> Vec<Offer>;

    // Reservations.
    fn insert_reservation(&mut self, draft: NewReservation) -> DomainResult<Reservation>;
    fn reservation(&self, id: ReservationId) -> Option<Reservation>;
    fn reservations_for_user(&self, user_id: &str) -> Vec<Reservation>;
    /// Still `reserved`, pickup window already closed.
    fn lapsed_reservations(&self, now: DateTime<Utc>) -> Vec<Reservation>;
    fn update_reservation(&mut self, reservation: Reservation) -> DomainResult<()>;
    fn confirmation_code_taken(&self, code: &ConfirmationCode) -> bool;

    // Pickups. `insert_pickup` requires the referenced reservation to exist.
    fn insert_pickup(&mut self, draft: NewPickup) -> DomainResult<Pickup>;

    // Impact. Append-only; `insert_impact` requires the referenced batch.
    fn insert_impact(&mut self, draft: NewImpact) -> DomainResult<Impact>;
    fn impact_records(&self) -> Vec<Impact>;
}

/// Durable store collaborator.
///
/// `transaction` runs the closure against a transactional view and commits
/// only on `Ok`; on `Err` no write survives (all-or-nothing). Implementations
/// must not let two concurrent transactions observe or produce an
/// over-subscribed batch.
pub trait Repository: Send + Sync {
    type Tx: StoreTx;

    fn transaction<T>(
        &self,
        f: impl FnOnce(&mut Self::Tx) -> DomainResult<T>,
    ) -> DomainResult<T>;
}

impl<R> Repository for std::sync::Arc<R>
where
    R: Repository + ?Sized,
{
    type Tx = R::Tx;

    fn transaction<T>(
        &self,
        f: impl FnOnce(&mut Self::Tx) -> DomainResult<T>,
    ) -> DomainResult<T> {
        (**self).transaction(f)
    }
}
