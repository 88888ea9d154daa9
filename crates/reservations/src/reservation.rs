use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelflife_core::{DomainError, DomainResult, Entity, OfferId, ReservationId};

use crate::code::ConfirmationCode;

/// Reservation lifecycle.
///
/// `Reserved` is the only initial state; `PickedUp` and `NoShow` are
/// terminal. There is no path out of a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Reserved,
    PickedUp,
    NoShow,
}

impl ReservationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::PickedUp | Self::NoShow)
    }
}

/// Draft reservation, not yet assigned an identity by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReservation {
    pub offer_id: OfferId,
    pub user_id: String,
    pub qty_reserved: u32,
    pub pickup_start_ts: DateTime<Utc>,
    pub pickup_end_ts: DateTime<Utc>,
    pub confirmation_code: ConfirmationCode,
}

/// A claim on quantity from an offer, with a promised pickup window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub offer_id: OfferId,
    pub user_id: String,
    pub qty_reserved: u32,
    pub pickup_start_ts: DateTime<Utc>,
    pub pickup_end_ts: DateTime<Utc>,
    pub status: ReservationStatus,
    pub confirmation_code: ConfirmationCode,
}

/// Check a pickup window before any quantity is committed.
pub fn validate_pickup_window(
    start_ts: DateTime<Utc>,
    end_ts: DateTime<Utc>,
) -> DomainResult<()> {
    if start_ts >= end_ts {
        return Err(DomainError::invalid_window(format!(
            "pickup window start {start_ts} must precede end {end_ts}"
        )));
    }
    Ok(())
}

impl Reservation {
    /// Validate a draft and bind it to its store-assigned identity.
    ///
    /// New reservations always enter the `Reserved` state.
    pub fn new(id: ReservationId, draft: NewReservation) -> DomainResult<Self> {
        if draft.qty_reserved == 0 {
            return Err(DomainError::validation("qty_reserved must be positive"));
        }
        validate_pickup_window(draft.pickup_start_ts, draft.pickup_end_ts)?;

        Ok(Self {
            id,
            offer_id: draft.offer_id,
            user_id: draft.user_id,
            qty_reserved: draft.qty_reserved,
            pickup_start_ts: draft.pickup_start_ts,
            pickup_end_ts: draft.pickup_end_ts,
            status: ReservationStatus::Reserved,
            confirmation_code: draft.confirmation_code,
        })
    }

    /// The pickup window lapsed without confirmation.
    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.status == ReservationStatus::Reserved && self.pickup_end_ts < now
    }

    /// Transition `Reserved -> PickedUp`.
    pub fn mark_picked_up(&mut self) -> DomainResult<()> {
        self.transition_to(ReservationStatus::PickedUp)
    }

    /// Transition `Reserved -> NoShow`. Only the sweeper calls this.
    pub fn mark_no_show(&mut self) -> DomainResult<()> {
        self.transition_to(ReservationStatus::NoShow)
    }

    fn transition_to(&mut self, next: ReservationStatus) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::invalid_state(format!(
                "reservation {} already finalized as {:?}",
                self.id, self.status
            )));
        }
        self.status = next;
        Ok(())
    }
}

impl Entity for Reservation {
    type Id = ReservationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
