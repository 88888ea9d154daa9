//! Markdown rules: shelf-life to discount tier, offer-pair planning, and
//! no-show escalation.

use chrono::{DateTime, Duration, Utc};

use shelflife_catalog::Batch;
use shelflife_core::{DomainError, DomainResult};

use crate::offer::{Audience, NewOffer};

/// Length of the nonprofit priority window, in hours.
pub const NONPROFIT_WINDOW_HOURS: i64 = 2;

/// Extra discount granted each time a reservation lapses.
pub const ESCALATION_STEP_PCT: u8 = 10;

/// Ceiling for escalated discounts.
pub const ESCALATION_CAP_PCT: u8 = 80;

/// Map remaining shelf-life to a discount tier.
///
/// Ordered first-match table; a boundary belongs to the lower-discount tier
/// (exactly 6.0 hours left is 40, not 60).
pub fn discount_for_hours_left(hours_left: f64) -> u8 {
    if hours_left < 6.0 {
        60
    } else if hours_left < 12.0 {
        40
    } else if hours_left < 18.0 {
        30
    } else {
        20
    }
}

/// Discount for an offer re-listed after a no-show.
pub fn escalated_discount(discount_pct: u8) -> u8 {
    (discount_pct + ESCALATION_STEP_PCT).min(ESCALATION_CAP_PCT)
}

/// The offer pair a markdown pass writes for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferPlan {
    pub nonprofit: NewOffer,
    /// Absent when the nonprofit priority window already reaches the batch's
    /// expiry; an empty public window is never planned.
    pub public: Option<NewOffer>,
}

/// Plan the nonprofit/public offer pair for a batch.
///
/// The nonprofit window spans `[now, now + 2h)`, clamped to the batch's
/// expiry; the public window takes over from there until expiry. Both carry
/// the same tier discount.
pub fn plan_offers(batch: &Batch, now: DateTime<Utc>) -> DomainResult<OfferPlan> {
    if batch.is_expired(now) {
        return Err(DomainError::invalid_window(format!(
            "batch {} expired at {}",
            batch.id, batch.expiry_ts
        )));
    }

    let hours_left = (batch.expiry_ts - now).num_milliseconds() as f64 / 3_600_000.0;
    let discount_pct = discount_for_hours_left(hours_left);

    let priority_end = (now + Duration::hours(NONPROFIT_WINDOW_HOURS)).min(batch.expiry_ts);

    let nonprofit = NewOffer {
        batch_id: batch.id,
        discount_pct,
        start_ts: now,
        end_ts: priority_end,
        audience: Audience::Nonprofit,
    };

    let public = (priority_end < batch.expiry_ts).then(|| NewOffer {
        batch_id: batch.id,
        discount_pct,
        start_ts: priority_end,
        end_ts: batch.expiry_ts,
        audience: Audience::Public,
    });

    Ok(OfferPlan { nonprofit, public })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use shelflife_catalog::NewBatch;
    use shelflife_core::{BatchId, ProductId};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn batch_expiring_in(hours: i64) -> Batch {
        Batch::new(
            BatchId::new(7),
            NewBatch {
                product_id: ProductId::new(1),
                qty_total: 20,
                expiry_ts: t0() + Duration::hours(hours),
                store_id: "store-7".to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn tier_table_first_match() {
        assert_eq!(discount_for_hours_left(0.5), 60);
        assert_eq!(discount_for_hours_left(5.99), 60);
        assert_eq!(discount_for_hours_left(7.0), 40);
        assert_eq!(discount_for_hours_left(13.0), 30);
        assert_eq!(discount_for_hours_left(40.0), 20);
    }

    #[test]
    fn tier_boundaries_belong_to_the_lower_tier() {
        assert_eq!(discount_for_hours_left(6.0), 40);
        assert_eq!(discount_for_hours_left(12.0), 30);
        assert_eq!(discount_for_hours_left(18.0), 20);
    }

    #[test]
    fn five_hour_batch_plans_sixty_pct_pair() {
        let batch = batch_expiring_in(5);
        let plan = plan_offers(&batch, t0()).unwrap();

        assert_eq!(plan.nonprofit.discount_pct, 60);
        assert_eq!(plan.nonprofit.audience, Audience::Nonprofit);
        assert_eq!(plan.nonprofit.start_ts, t0());
        assert_eq!(plan.nonprofit.end_ts, t0() + Duration::hours(2));

        let public = plan.public.unwrap();
        assert_eq!(public.discount_pct, 60);
        assert_eq!(public.audience, Audience::Public);
        assert_eq!(public.start_ts, t0() + Duration::hours(2));
        assert_eq!(public.end_ts, batch.expiry_ts);
    }

    #[test]
    fn short_expiry_clamps_nonprofit_window_and_skips_public() {
        let batch = batch_expiring_in(1);
        let plan = plan_offers(&batch, t0()).unwrap();

        assert_eq!(plan.nonprofit.end_ts, batch.expiry_ts);
        assert!(plan.public.is_none());
    }

    #[test]
    fn expiry_exactly_at_priority_end_skips_public() {
        let batch = batch_expiring_in(2);
        let plan = plan_offers(&batch, t0()).unwrap();

        assert_eq!(plan.nonprofit.end_ts, batch.expiry_ts);
        assert!(plan.public.is_none());
    }

    #[test]
    fn expired_batch_is_rejected() {
        let batch = batch_expiring_in(5);
        let err = plan_offers(&batch, t0() + Duration::hours(5)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidWindow(_)));
    }

    #[test]
    fn escalation_steps_by_ten_and_caps_at_eighty() {
        assert_eq!(escalated_discount(20), 30);
        assert_eq!(escalated_discount(60), 70);
        assert_eq!(escalated_discount(70), 80);
        assert_eq!(escalated_discount(80), 80);
        assert_eq!(escalated_discount(100), 80);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: every shelf-life maps to exactly one published tier.
        #[test]
        fn every_shelf_life_maps_to_a_published_tier(hours in 0.0f64..200.0) {
            let pct = discount_for_hours_left(hours);
            prop_assert!([20u8, 30, 40, 60].contains(&pct));
        }

        /// Property: discounts never increase as shelf-life grows.
        #[test]
        fn discount_is_monotone_in_shelf_life(a in 0.0f64..200.0, b in 0.0f64..200.0) {
            let (shorter, longer) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(discount_for_hours_left(shorter) >= discount_for_hours_left(longer));
        }

        /// Property: planned windows are always non-empty and contiguous.
        #[test]
        fn planned_windows_are_valid_and_contiguous(minutes_left in 1i64..72 * 60) {
            let batch = Batch::new(
                BatchId::new(7),
                NewBatch {
                    product_id: ProductId::new(1),
                    qty_total: 20,
                    expiry_ts: t0() + Duration::minutes(minutes_left),
                    store_id: "store-7".to_string(),
                },
            )
            .unwrap();

            let plan = plan_offers(&batch, t0()).unwrap();
            prop_assert!(plan.nonprofit.start_ts < plan.nonprofit.end_ts);

            match plan.public {
                Some(public) => {
                    prop_assert_eq!(public.start_ts, plan.nonprofit.end_ts);
                    prop_assert!(public.start_ts < public.end_ts);
                    prop_assert_eq!(public.end_ts, batch.expiry_ts);
                }
                None => prop_assert_eq!(plan.nonprofit.end_ts, batch.expiry_ts),
            }
        }
    }
}
