//! Reservation lifecycle: creation against an active offer, and pickup
//! confirmation feeding the impact ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelflife_core::{Clock, DomainError, DomainResult, OfferId, ReservationId};
use shelflife_impact::{assess_pickup, NewImpact};
use shelflife_reservations::{
    validate_pickup_window, CodeGenerator, NewPickup, NewReservation, Pickup, Reservation,
};
use shelflife_store::{Repository, StoreTx};

use crate::Engine;

/// Attempts at a unique confirmation code before giving up.
///
/// The code space is 10^6; with realistic reservation counts a second
/// collision in a row is already unlikely, so a small bound suffices.
pub const MAX_CODE_ATTEMPTS: u32 = 10;

/// Client intent to reserve quantity from an offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub offer_id: OfferId,
    pub user_id: String,
    pub qty: u32,
    pub pickup_start_ts: DateTime<Utc>,
    pub pickup_end_ts: DateTime<Utc>,
}

impl<R, C, G> Engine<R, C, G>
where
    R: Repository,
    C: Clock,
    G: CodeGenerator,
{
    /// Reserve quantity from an offer.
    ///
    /// The offer must be inside its active window at call time and the
    /// underlying batch must have the quantity left; the decrement and the
    /// insert commit together or not at all.
    pub fn create_reservation(&self, request: ReservationRequest) -> DomainResult<Reservation> {
        validate_pickup_window(request.pickup_start_ts, request.pickup_end_ts)?;
        let now = self.clock.now();

        let reservation = self.repo.transaction(|tx| {
            let offer = tx
                .offer(request.offer_id)
                .ok_or(DomainError::not_found("offer"))?;
            if !offer.is_active(now) {
                return Err(DomainError::offer_inactive(format!(
                    "offer {} is open [{}, {}), requested at {}",
                    offer.id, offer.start_ts, offer.end_ts, now
                )));
            }

            let mut batch = tx
                .batch(offer.batch_id)
                .ok_or(DomainError::not_found("batch"))?;
            batch.reserve(request.qty)?;
            tx.update_batch(batch)?;

            // Generate-and-check loop against the store's uniqueness
            // constraint; collisions are retried, never accepted.
            for _ in 0..MAX_CODE_ATTEMPTS {
                let code = self.codes.generate();
                if tx.confirmation_code_taken(&code) {
                    continue;
                }
                return tx.insert_reservation(NewReservation {
                    offer_id: offer.id,
                    user_id: request.user_id.clone(),
                    qty_reserved: request.qty,
                    pickup_start_ts: request.pickup_start_ts,
                    pickup_end_ts: request.pickup_end_ts,
                    confirmation_code: code,
                });
            }

            Err(DomainError::uniqueness_conflict(format!(
                "no unique confirmation code after {MAX_CODE_ATTEMPTS} attempts"
            )))
        })?;

        tracing::info!(
            reservation = %reservation.id,
            offer = %reservation.offer_id,
            qty = reservation.qty_reserved,
            "reservation created"
        );
        Ok(reservation)
    }

    /// Confirm that a reservation was collected.
    ///
    /// Legal only while the reservation is still `reserved`; the status
    /// change, the pickup record, and the impact append commit as one
    /// transaction, so impact is never double-counted.
    pub fn confirm_pickup(
        &self,
        reservation_id: ReservationId,
        staff_id: &str,
    ) -> DomainResult<Pickup> {
        let now = self.clock.now();

        let pickup = self.repo.transaction(|tx| {
            let mut reservation = tx
                .reservation(reservation_id)
                .ok_or(DomainError::not_found("reservation"))?;
            reservation.mark_picked_up()?;
            tx.update_reservation(reservation.clone())?;

            let pickup = tx.insert_pickup(NewPickup {
                reservation_id,
                staff_id: staff_id.to_string(),
                pickup_ts: now,
            })?;

            let offer = tx
                .offer(reservation.offer_id)
                .ok_or(DomainError::not_found("offer"))?;
            let batch = tx
                .batch(offer.batch_id)
                .ok_or(DomainError::not_found("batch"))?;
            let product = tx
                .product(batch.product_id)
                .ok_or(DomainError::not_found("product"))?;

            let figures = assess_pickup(&product, offer.discount_pct, reservation.qty_reserved);
            tx.insert_impact(NewImpact {
                batch_id: batch.id,
                qty_picked_up: reservation.qty_reserved,
                co2e_saved_kg: figures.co2e_saved_kg,
                revenue_recovered: figures.revenue_recovered,
            })?;

            Ok(pickup)
        })?;

        tracing::info!(
            reservation = %reservation_id,
            pickup = %pickup.id,
            staff = staff_id,
            "pickup confirmed"
        );
        Ok(pickup)
    }

    pub fn user_reservations(&self, user_id: &str) -> DomainResult<Vec<Reservation>> {
        self.repo
            .transaction(|tx| Ok(tx.reservations_for_user(user_id)))
    }
}
