//! Impact read path: rolled-up totals over the append-only impact ledger.

use shelflife_core::{Clock, DomainResult};
use shelflife_impact::ImpactSummary;
use shelflife_reservations::CodeGenerator;
use shelflife_store::{Repository, StoreTx};

use crate::Engine;

impl<R, C, G> Engine<R, C, G>
where
    R: Repository,
    C: Clock,
    G: CodeGenerator,
{
    /// Totals across all recorded pickups; all zeros when nothing has been
    /// rescued yet.
    pub fn impact_summary(&self) -> DomainResult<ImpactSummary> {
        self.repo
            .transaction(|tx| Ok(ImpactSummary::from_records(&tx.impact_records())))
    }
}
