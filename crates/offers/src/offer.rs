use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelflife_core::{BatchId, DomainError, DomainResult, Entity, OfferId};

/// Who may reserve against an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Nonprofit,
    Public,
}

/// Draft offer, not yet assigned an identity by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOffer {
    pub batch_id: BatchId,
    pub discount_pct: u8,
    pub start_ts: DateTime<Utc>,
    pub end_ts: DateTime<Utc>,
    pub audience: Audience,
}

/// A time-bounded discount on a batch, scoped to an audience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub batch_id: BatchId,
    pub discount_pct: u8,
    pub start_ts: DateTime<Utc>,
    pub end_ts: DateTime<Utc>,
    pub audience: Audience,
}

impl Offer {
    /// Validate a draft and bind it to its store-assigned identity.
    pub fn new(id: OfferId, draft: NewOffer) -> DomainResult<Self> {
        if draft.discount_pct > 100 {
            return Err(DomainError::validation("discount_pct must be within 0..=100"));
        }
        if draft.start_ts >= draft.end_ts {
            return Err(DomainError::invalid_window(format!(
                "offer window start {} must precede end {}",
                draft.start_ts, draft.end_ts
            )));
        }

        Ok(Self {
            id,
            batch_id: draft.batch_id,
            discount_pct: draft.discount_pct,
            start_ts: draft.start_ts,
            end_ts: draft.end_ts,
            audience: draft.audience,
        })
    }

    /// Reservations are accepted while `start_ts <= now < end_ts`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.start_ts <= now && now < self.end_ts
    }
}

impl Entity for Offer {
    type Id = OfferId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
