//! `shelflife-engine` — the markdown & reservation lifecycle engine.
//!
//! Binds the injected collaborators (Repository, Clock, confirmation-code
//! generator) into the operations the outer request layer calls:
//!
//! - [`Engine::apply_markdowns`] — tiered discounting of non-expired batches
//! - [`Engine::create_reservation`] / [`Engine::confirm_pickup`] — the
//!   reservation lifecycle
//! - [`Engine::sweep_no_shows`] — lapsed-reservation re-listing
//! - [`Engine::impact_summary`] — rolled-up rescue impact
//!
//! Each operation executes as exactly one repository transaction: it either
//! completes atomically or fails with no surviving writes.

use serde::Serialize;

use shelflife_core::Clock;
use shelflife_reservations::CodeGenerator;
use shelflife_store::Repository;

mod catalog;
mod impact;
mod markdown;
mod reservations;
mod sweeper;

pub use reservations::{ReservationRequest, MAX_CODE_ATTEMPTS};

/// Outcome of one markdown pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkdownReport {
    pub offers_created: u32,
}

/// Outcome of one no-show sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub relisted: u32,
}

/// The lifecycle engine. Cheap to construct; all state lives in the
/// repository.
#[derive(Debug)]
pub struct Engine<R, C, G> {
    repo: R,
    clock: C,
    codes: G,
}

impl<R, C, G> Engine<R, C, G>
where
    R: Repository,
    C: Clock,
    G: CodeGenerator,
{
    pub fn new(repo: R, clock: C, codes: G) -> Self {
        Self { repo, clock, codes }
    }
}
