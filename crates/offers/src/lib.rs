//! Offers domain module: time-bounded, audience-scoped discounts on batches.
//!
//! This crate contains the markdown rules (discount tiers, the nonprofit
//! priority window, no-show escalation), implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage).

pub mod markdown;
pub mod offer;

pub use markdown::{
    discount_for_hours_left, escalated_discount, plan_offers, OfferPlan, ESCALATION_CAP_PCT,
    ESCALATION_STEP_PCT, NONPROFIT_WINDOW_HOURS,
};
pub use offer::{Audience, NewOffer, Offer};
