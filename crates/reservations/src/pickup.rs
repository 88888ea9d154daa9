use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelflife_core::{Entity, PickupId, ReservationId};

/// Draft pickup record, not yet assigned an identity by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPickup {
    pub reservation_id: ReservationId,
    pub staff_id: String,
    pub pickup_ts: DateTime<Utc>,
}

/// Confirmation that a reservation was collected.
///
/// At most one pickup exists per reservation: confirmation transitions the
/// reservation out of `Reserved`, and terminal reservations cannot be
/// confirmed again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub id: PickupId,
    pub reservation_id: ReservationId,
    pub staff_id: String,
    pub pickup_ts: DateTime<Utc>,
}

impl Pickup {
    pub fn new(id: PickupId, draft: NewPickup) -> Self {
        Self {
            id,
            reservation_id: draft.reservation_id,
            staff_id: draft.staff_id,
            pickup_ts: draft.pickup_ts,
        }
    }
}

impl Entity for Pickup {
    type Id = PickupId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
