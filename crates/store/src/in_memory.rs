use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use shelflife_catalog::{Batch, NewBatch, NewProduct, Product};
use shelflife_core::{
    BatchId, DomainError, DomainResult, ImpactId, OfferId, PickupId, ProductId, ReservationId,
};
use shelflife_impact::{Impact, NewImpact};
use shelflife_offers::{Audience, NewOffer, Offer};
use shelflife_reservations::{ConfirmationCode, NewPickup, NewReservation, Pickup, Reservation};

use crate::repository::{Repository, StoreTx};

/// Backing state for [`InMemoryStore`]; doubles as the transactional view.
#[derive(Debug, Default, Clone)]
pub struct MemoryTx {
    next_id: u64,
    products: BTreeMap<ProductId, Product>,
    skus: HashSet<String>,
    batches: BTreeMap<BatchId, Batch>,
    offers: BTreeMap<OfferId, Offer>,
    reservations: BTreeMap<ReservationId, Reservation>,
    codes: HashSet<ConfirmationCode>,
    pickups: BTreeMap<PickupId, Pickup>,
    impacts: BTreeMap<ImpactId, Impact>,
}

impl MemoryTx {
    fn bump_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl StoreTx for MemoryTx {
    fn insert_product(&mut self, draft: NewProduct) -> DomainResult<Product> {
        if self.skus.contains(&draft.sku) {
            return Err(DomainError::uniqueness_conflict(format!(
                "sku '{}' already exists",
                draft.sku
            )));
        }
        let product = Product::new(ProductId::new(self.bump_id()), draft)?;
        self.skus.insert(product.sku.clone());
        self.products.insert(product.id, product.clone());
        Ok(product)
    }

    fn product(&self, id: ProductId) -> Option<Product> {
        self.products.get(&id).cloned()
    }

    fn products(&self) -> Vec<Product> {
        self.products.values().cloned().collect()
    }

    fn insert_batch(&mut self, draft: NewBatch) -> DomainResult<Batch> {
        if !self.products.contains_key(&draft.product_id) {
            return Err(DomainError::not_found("product"));
        }
        let batch = Batch::new(BatchId::new(self.bump_id()), draft)?;
        self.batches.insert(batch.id, batch.clone());
        Ok(batch)
    }

    fn batch(&self, id: BatchId) -> Option<Batch> {
        self.batches.get(&id).cloned()
    }

    fn batches(&self) -> Vec<Batch> {
        self.batches.values().cloned().collect()
    }

    fn batches_expiring_after(&self, now: DateTime<Utc>) -> Vec<Batch> {
        self.batches
            .values()
            .filter(|b| b.expiry_ts > now)
            .cloned()
            .collect()
    }

    fn update_batch(&mut self, batch: Batch) -> DomainResult<()> {
        match self.batches.get_mut(&batch.id) {
            Some(slot) => {
                *slot = batch;
                Ok(())
            }
            None => Err(DomainError::not_found("batch")),
        }
    }

    fn insert_offer(&mut self, draft: NewOffer) -> DomainResult<Offer> {
        if !self.batches.contains_key(&draft.batch_id) {
            return Err(DomainError::not_found("batch"));
        }
        let offer = Offer::new(OfferId::new(self.bump_id()), draft)?;
        self.offers.insert(offer.id, offer.clone());
        Ok(offer)
    }

    fn offer(&self, id: OfferId) -> Option<Offer> {
        self.offers.get(&id).cloned()
    }

    fn has_nonprofit_offer(&self, batch_id: BatchId) -> bool {
        self.offers
            .values()
            .any(|o| o.batch_id == batch_id && o.audience == Audience::Nonprofit)
    }

    fn offers_ending_after(&self, audience: Audience, now: DateTime<Utc>) -> Vec<Offer> {
        self.offers
            .values()
            .filter(|o| o.audience == audience && o.end_ts > now)
            .cloned()
            .collect()
    }

    fn insert_reservation(&mut self, draft: NewReservation) -> DomainResult<Reservation> {
        if !self.offers.contains_key(&draft.offer_id) {
            return Err(DomainError::not_found("offer"));
        }
        if self.codes.contains(&draft.confirmation_code) {
            return Err(DomainError::uniqueness_conflict(format!(
                "confirmation code {} already issued",
                draft.confirmation_code
            )));
        }
        let reservation = Reservation::new(ReservationId::new(self.bump_id()), draft)?;
        self.codes.insert(reservation.confirmation_code.clone());
        self.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    fn reservation(&self, id: ReservationId) -> Option<Reservation> {
        self.reservations.get(&id).cloned()
    }

    fn reservations_for_user(&self, user_id: &str) -> Vec<Reservation> {
        self.reservations
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    fn lapsed_reservations(&self, now: DateTime<Utc>) -> Vec<Reservation> {
        self.reservations
            .values()
            .filter(|r| r.is_lapsed(now))
            .cloned()
            .collect()
    }

    fn update_reservation(&mut self, reservation: Reservation) -> DomainResult<()> {
        match self.reservations.get_mut(&reservation.id) {
            Some(slot) => {
                *slot = reservation;
                Ok(())
            }
            None => Err(DomainError::not_found("reservation")),
        }
    }

    fn confirmation_code_taken(&self, code: &ConfirmationCode) -> bool {
        self.codes.contains(code)
    }

    fn insert_pickup(&mut self, draft: NewPickup) -> DomainResult<Pickup> {
        if !self.reservations.contains_key(&draft.reservation_id) {
            return Err(DomainError::not_found("reservation"));
        }
        let pickup = Pickup::new(PickupId::new(self.bump_id()), draft);
        self.pickups.insert(pickup.id, pickup.clone());
        Ok(pickup)
    }

    fn insert_impact(&mut self, draft: NewImpact) -> DomainResult<Impact> {
        if !self.batches.contains_key(&draft.batch_id) {
            return Err(DomainError::not_found("batch"));
        }
        let impact = Impact::new(ImpactId::new(self.bump_id()), draft);
        self.impacts.insert(impact.id, impact.clone());
        Ok(impact)
    }

    fn impact_records(&self) -> Vec<Impact> {
        self.impacts.values().cloned().collect()
    }
}

/// In-memory repository.
///
/// Intended for tests/dev. Transactions are serialized behind one lock and
/// run against a working copy of the state; the copy replaces the shared
/// state only on `Ok`, so a failed operation leaves no partial writes.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryTx>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for InMemoryStore {
    type Tx = MemoryTx;

    fn transaction<T>(
        &self,
        f: impl FnOnce(&mut Self::Tx) -> DomainResult<T>,
    ) -> DomainResult<T> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| DomainError::validation("store lock poisoned"))?;

        let mut working = state.clone();
        let value = f(&mut working)?;
        *state = working;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn product_draft(sku: &str) -> NewProduct {
        NewProduct {
            sku: sku.to_string(),
            name: "Whole Milk".to_string(),
            category: "dairy".to_string(),
            size: "1L".to_string(),
            base_price: 4.99,
            weight_grams: 1030.0,
        }
    }

    fn seed(store: &InMemoryStore) -> (Product, Batch, Offer) {
        store
            .transaction(|tx| {
                let product = tx.insert_product(product_draft("MILK-1L"))?;
                let batch = tx.insert_batch(NewBatch {
                    product_id: product.id,
                    qty_total: 10,
                    expiry_ts: t0() + Duration::hours(5),
                    store_id: "store-7".to_string(),
                })?;
                let offer = tx.insert_offer(NewOffer {
                    batch_id: batch.id,
                    discount_pct: 60,
                    start_ts: t0(),
                    end_ts: t0() + Duration::hours(2),
                    audience: Audience::Nonprofit,
                })?;
                Ok((product, batch, offer))
            })
            .unwrap()
    }

    fn reservation_draft(offer_id: OfferId, code: &str) -> NewReservation {
        NewReservation {
            offer_id,
            user_id: "user-12".to_string(),
            qty_reserved: 2,
            pickup_start_ts: t0(),
            pickup_end_ts: t0() + Duration::hours(1),
            confirmation_code: ConfirmationCode::parse(code).unwrap(),
        }
    }

    #[test]
    fn inserts_assign_increasing_ids() {
        let store = InMemoryStore::new();
        let (product, batch, offer) = seed(&store);

        assert!(u64::from(product.id) < u64::from(batch.id));
        assert!(u64::from(batch.id) < u64::from(offer.id));
    }

    #[test]
    fn duplicate_sku_is_a_uniqueness_conflict() {
        let store = InMemoryStore::new();
        seed(&store);

        let err = store
            .transaction(|tx| tx.insert_product(product_draft("MILK-1L")))
            .unwrap_err();
        assert!(matches!(err, DomainError::UniquenessConflict(_)));
    }

    #[test]
    fn duplicate_confirmation_code_is_a_uniqueness_conflict() {
        let store = InMemoryStore::new();
        let (_, _, offer) = seed(&store);

        store
            .transaction(|tx| tx.insert_reservation(reservation_draft(offer.id, "111111")))
            .unwrap();
        let err = store
            .transaction(|tx| tx.insert_reservation(reservation_draft(offer.id, "111111")))
            .unwrap_err();
        assert!(matches!(err, DomainError::UniquenessConflict(_)));
    }

    #[test]
    fn failed_transaction_leaves_no_partial_writes() {
        let store = InMemoryStore::new();
        let (product, _, _) = seed(&store);

        // Insert a batch, then fail the same transaction.
        let err = store
            .transaction(|tx| {
                tx.insert_batch(NewBatch {
                    product_id: product.id,
                    qty_total: 4,
                    expiry_ts: t0() + Duration::hours(8),
                    store_id: "store-9".to_string(),
                })?;
                Err::<(), _>(DomainError::validation("forced failure"))
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let batches = store.transaction(|tx| Ok(tx.batches())).unwrap();
        assert_eq!(batches.len(), 1, "rolled-back batch must not be visible");
    }

    #[test]
    fn batch_fk_is_enforced_on_offers() {
        let store = InMemoryStore::new();
        seed(&store);

        let err = store
            .transaction(|tx| {
                tx.insert_offer(NewOffer {
                    batch_id: BatchId::new(999),
                    discount_pct: 20,
                    start_ts: t0(),
                    end_ts: t0() + Duration::hours(1),
                    audience: Audience::Public,
                })
            })
            .unwrap_err();
        assert_eq!(err, DomainError::not_found("batch"));
    }

    #[test]
    fn lapsed_reservations_filters_by_status_and_window() {
        let store = InMemoryStore::new();
        let (_, _, offer) = seed(&store);

        let lapsed = store
            .transaction(|tx| tx.insert_reservation(reservation_draft(offer.id, "222222")))
            .unwrap();
        store
            .transaction(|tx| {
                let mut confirmed =
                    tx.insert_reservation(reservation_draft(offer.id, "333333"))?;
                confirmed.mark_picked_up()?;
                tx.update_reservation(confirmed)
            })
            .unwrap();

        let after_window = t0() + Duration::hours(2);
        let found = store
            .transaction(|tx| Ok(tx.lapsed_reservations(after_window)))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, lapsed.id);
    }

    #[test]
    fn nonprofit_guard_sees_expired_offers_too() {
        let store = InMemoryStore::new();
        let (_, batch, _) = seed(&store);

        let long_after = t0() + Duration::days(30);
        let guard = store
            .transaction(|tx| Ok(tx.has_nonprofit_offer(batch.id)))
            .unwrap();
        assert!(guard);

        // The active-offer read, by contrast, is window-filtered.
        let visible = store
            .transaction(|tx| Ok(tx.offers_ending_after(Audience::Nonprofit, long_after)))
            .unwrap();
        assert!(visible.is_empty());
    }
}
