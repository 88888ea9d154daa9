//! Markdown pass: refresh the offer pair on every non-expired batch.

use shelflife_core::{Clock, DomainResult};
use shelflife_offers::{plan_offers, Audience, Offer};
use shelflife_reservations::CodeGenerator;
use shelflife_store::{Repository, StoreTx};

use crate::{Engine, MarkdownReport};

impl<R, C, G> Engine<R, C, G>
where
    R: Repository,
    C: Clock,
    G: CodeGenerator,
{
    /// Apply tiered markdowns to every batch with shelf-life remaining.
    ///
    /// A batch that already carries a nonprofit offer is skipped, so
    /// re-running the pass against unchanged state creates nothing.
    pub fn apply_markdowns(&self) -> DomainResult<MarkdownReport> {
        let now = self.clock.now();

        let offers_created = self.repo.transaction(|tx| {
            let mut created = 0u32;

            for batch in tx.batches_expiring_after(now) {
                if tx.has_nonprofit_offer(batch.id) {
                    continue;
                }

                let plan = plan_offers(&batch, now)?;
                let discount_pct = plan.nonprofit.discount_pct;

                tx.insert_offer(plan.nonprofit)?;
                created += 1;
                if let Some(public) = plan.public {
                    tx.insert_offer(public)?;
                    created += 1;
                }

                tracing::debug!(batch = %batch.id, discount_pct, "batch marked down");
            }

            Ok(created)
        })?;

        tracing::info!(offers_created, "markdown pass complete");
        Ok(MarkdownReport { offers_created })
    }

    /// Offers visible to one audience: window not yet closed at the current
    /// instant.
    pub fn offers(&self, audience: Audience) -> DomainResult<Vec<Offer>> {
        let now = self.clock.now();
        self.repo
            .transaction(|tx| Ok(tx.offers_ending_after(audience, now)))
    }
}
