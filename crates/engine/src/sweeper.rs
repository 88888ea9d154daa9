//! No-show sweeper: finalize lapsed reservations and re-list their batches
//! at an escalated discount.

use shelflife_core::{Clock, DomainResult};
use shelflife_offers::{escalated_discount, Audience, NewOffer};
use shelflife_reservations::CodeGenerator;
use shelflife_store::{Repository, StoreTx};

use crate::{Engine, SweepReport};

impl<R, C, G> Engine<R, C, G>
where
    R: Repository,
    C: Clock,
    G: CodeGenerator,
{
    /// Sweep reservations whose pickup window lapsed without confirmation.
    ///
    /// Each one transitions to `no_show` (one-way). Where the original offer
    /// still resolves and has window left, a fresh public offer goes up on
    /// the same batch at `min(original + 10, 80)` percent. The reserved
    /// quantity stays committed against the batch: no-show does NOT return
    /// stock.
    ///
    /// Escalation offers are intentionally not deduplicated against the
    /// markdown pass or earlier sweeps; the 80% cap is the only bound.
    pub fn sweep_no_shows(&self) -> DomainResult<SweepReport> {
        let now = self.clock.now();

        let relisted = self.repo.transaction(|tx| {
            let mut relisted = 0u32;

            for mut reservation in tx.lapsed_reservations(now) {
                reservation.mark_no_show()?;
                tx.update_reservation(reservation.clone())?;
                tracing::debug!(reservation = %reservation.id, "reservation lapsed to no_show");

                let Some(offer) = tx.offer(reservation.offer_id) else {
                    continue;
                };
                // Original window already closed: a re-listing would be an
                // empty offer, so skip it.
                if offer.end_ts <= now {
                    continue;
                }

                tx.insert_offer(NewOffer {
                    batch_id: offer.batch_id,
                    discount_pct: escalated_discount(offer.discount_pct),
                    start_ts: now,
                    end_ts: offer.end_ts,
                    audience: Audience::Public,
                })?;
                relisted += 1;
            }

            Ok(relisted)
        })?;

        tracing::info!(relisted, "no-show sweep complete");
        Ok(SweepReport { relisted })
    }
}
