//! Impact domain module: environmental/financial benefit attributed to
//! confirmed pickups.
//!
//! Records are append-only facts keyed by batch; totals are computed on read.

pub mod record;

pub use record::{
    assess_pickup, Impact, ImpactFigures, ImpactSummary, NewImpact, AVG_ITEM_WEIGHT_KG,
    CO2E_PER_KG, LBS_PER_KG,
};
